//! Standalone diagnostic for the STK-push payment gateway.
//!
//! Exercises the gateway's OAuth token endpoint and the STK-push endpoint
//! with a throwaway transaction reference, printing pass/fail per check.
//! Exits 1 if any check fails. Not part of the app runtime.

use std::{env, process::ExitCode};

use api_payments::services::pay::{build_push_payload, get_access_token, send_stk_push};
use chrono::Utc;
use colored::Colorize;
use common::{env_config::PaymentGatewayConfig, misc::normalize_msisdn};

fn gateway_from_env() -> PaymentGatewayConfig {
    PaymentGatewayConfig {
        client_id: env::var("PAYMENT_CLIENT_ID").unwrap_or_default(),
        client_secret: env::var("PAYMENT_CLIENT_SECRET").unwrap_or_default(),
        auth_url: env::var("PAYMENT_AUTH_URL")
            .unwrap_or_else(|_| "https://gateway.example.com/oauth2/token".to_string()),
        push_url: env::var("PAYMENT_PUSH_URL")
            .unwrap_or_else(|_| "https://gateway.example.com/payments/stk-push".to_string()),
        business_short_code: env::var("PAYMENT_SHORT_CODE")
            .unwrap_or_else(|_| "174379".to_string()),
        callback_url: env::var("PAYMENT_CALLBACK_URL")
            .unwrap_or_else(|_| "http://localhost:8080/api/pay/webhook".to_string()),
        onboarding_fee: 1,
    }
}

fn report(name: &str, result: Result<String, String>) -> bool {
    match result {
        Ok(detail) => {
            println!("{} {} — {}", "PASS".green().bold(), name, detail);
            true
        }
        Err(detail) => {
            println!("{} {} — {}", "FAIL".red().bold(), name, detail);
            false
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let gateway = gateway_from_env();
    let phone = env::var("STK_TEST_PHONE").unwrap_or_else(|_| "0712345678".to_string());

    println!("STK gateway check against {}", gateway.push_url.bold());

    let Some(msisdn) = normalize_msisdn(&phone) else {
        report(
            "phone",
            Err(format!("STK_TEST_PHONE {:?} is not a valid number", phone)),
        );
        return ExitCode::from(1);
    };

    let mut all_ok = true;

    let token = match get_access_token(&gateway).await {
        Ok(token) => {
            all_ok &= report("auth", Ok("bearer token issued".to_string()));
            Some(token)
        }
        Err(e) => {
            all_ok &= report("auth", Err(e.to_string()));
            None
        }
    };

    if let Some(token) = token {
        let reference = format!("CHECK-{}", Utc::now().timestamp());
        let payload = build_push_payload(&gateway, &msisdn, &reference, Utc::now());
        let outcome = match send_stk_push(&gateway, &token, &payload).await {
            Ok(()) => Ok(format!("push accepted (reference {})", reference)),
            Err(e) => Err(e.to_string()),
        };
        all_ok &= report("stk-push", outcome);
    } else {
        all_ok &= report("stk-push", Err("skipped: no token".to_string()));
    }

    if all_ok {
        println!("{}", "All checks passed".green());
        ExitCode::SUCCESS
    } else {
        println!("{}", "One or more checks failed".red());
        ExitCode::from(1)
    }
}

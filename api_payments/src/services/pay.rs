use chrono::{DateTime, Utc};
use common::{
    env_config::{Config, PaymentGatewayConfig},
    error::{AppError, Res},
    misc::normalize_msisdn,
};
use db::models::onboarding::OnboardingProgress;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::pay::{StkPushPayload, TokenResponse, WebhookPayload};

/// Obtains a bearer token from the gateway's client-credentials endpoint.
pub async fn get_access_token(gateway: &PaymentGatewayConfig) -> Res<String> {
    let client = reqwest::Client::new();
    let response = client
        .post(&gateway.auth_url)
        .basic_auth(&gateway.client_id, Some(&gateway.client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(AppError::Internal(format!(
            "Payment gateway auth failed with status {}",
            response.status()
        )));
    }

    let token: TokenResponse = response.json().await?;
    Ok(token.access_token)
}

pub fn new_payment_reference() -> String {
    format!("KZP-{}", Uuid::new_v4().simple())
}

pub fn build_push_payload(
    gateway: &PaymentGatewayConfig,
    msisdn: &str,
    reference: &str,
    at: DateTime<Utc>,
) -> StkPushPayload {
    StkPushPayload {
        account_reference: reference.to_string(),
        business_short_code: gateway.business_short_code.clone(),
        phone_number: msisdn.to_string(),
        request_date: at.format("%Y%m%d%H%M%S").to_string(),
        trans_amount: gateway.onboarding_fee,
        transaction_desc: "Kazipert onboarding fee".to_string(),
        transaction_reference: reference.to_string(),
        callback_url: gateway.callback_url.clone(),
    }
}

/// Sends the STK push to the user's phone.
pub async fn send_stk_push(
    gateway: &PaymentGatewayConfig,
    token: &str,
    payload: &StkPushPayload,
) -> Res<()> {
    let client = reqwest::Client::new();
    let response = client
        .post(&gateway.push_url)
        .bearer_auth(token)
        .json(payload)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        log::error!("STK push rejected: {} {}", status, body);
        return Err(AppError::Internal(format!(
            "Payment gateway rejected the STK push ({})",
            status
        )));
    }

    Ok(())
}

/// Kicks off the onboarding-fee payment: resolves the phone number,
/// persists a fresh transaction reference, then asks the gateway to push
/// the confirmation prompt. `payment_verified` stays false until the
/// webhook confirms.
pub async fn initiate(
    pool: &PgPool,
    config: &Config,
    user_id: Uuid,
    phone_override: Option<String>,
) -> Res<(String, OnboardingProgress)> {
    db::onboarding::get_progress(pool, user_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Start onboarding first".to_string()))?;

    let personal = db::onboarding::get_personal_info(pool, user_id).await?;
    let phone = phone_override
        .or_else(|| personal.and_then(|p| p.phone_number))
        .ok_or_else(|| {
            AppError::BadRequest("No phone number on file; provide one in the request".to_string())
        })?;
    let msisdn = normalize_msisdn(&phone)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid phone number: {}", phone)))?;

    // Persisted before the push so a webhook racing the response still
    // finds its reference.
    let reference = new_payment_reference();
    let progress = db::onboarding::set_payment_reference(pool, user_id, &reference).await?;

    let token = get_access_token(&config.payment_gateway).await?;
    let payload = build_push_payload(&config.payment_gateway, &msisdn, &reference, Utc::now());
    send_stk_push(&config.payment_gateway, &token, &payload).await?;

    log::info!("STK push sent for user {} (reference {})", user_id, reference);
    Ok((reference, progress))
}

/// Processes the gateway callback. Unknown references and failed statuses
/// are acknowledged without touching any progress row.
pub async fn process_webhook(
    pool: &PgPool,
    payload: &WebhookPayload,
) -> Res<Option<OnboardingProgress>> {
    log::info!(
        "Payment webhook for {}: {}",
        payload.transaction_reference,
        payload.status
    );

    if !is_success_status(&payload.status) {
        log::warn!(
            "Payment {} failed: {}",
            payload.transaction_reference,
            payload.result_desc.as_deref().unwrap_or("no detail")
        );
        return Ok(None);
    }

    let updated =
        db::onboarding::mark_payment_verified_by_reference(pool, &payload.transaction_reference)
            .await?;
    if updated.is_none() {
        log::warn!(
            "Webhook for unknown transaction reference {}",
            payload.transaction_reference
        );
    }
    Ok(updated)
}

fn is_success_status(status: &str) -> bool {
    // the gateway has been seen reporting both words and the M-Pesa
    // numeric result code
    matches!(
        status.to_ascii_lowercase().as_str(),
        "success" | "completed" | "0"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> PaymentGatewayConfig {
        PaymentGatewayConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            auth_url: "https://gateway.test/oauth2/token".to_string(),
            push_url: "https://gateway.test/payments/stk-push".to_string(),
            business_short_code: "174379".to_string(),
            callback_url: "https://app.test/api/pay/webhook".to_string(),
            onboarding_fee: 2000,
        }
    }

    #[test]
    fn payload_matches_gateway_contract() {
        let at = DateTime::parse_from_rfc3339("2025-03-04T05:06:07Z")
            .unwrap()
            .with_timezone(&Utc);
        let payload = build_push_payload(&gateway(), "254712345678", "KZP-abc123", at);

        assert_eq!(payload.request_date, "20250304050607");
        assert_eq!(payload.trans_amount, 2000);
        assert_eq!(payload.account_reference, "KZP-abc123");
        assert_eq!(payload.transaction_reference, "KZP-abc123");

        let json = serde_json::to_value(&payload).unwrap();
        for field in [
            "accountReference",
            "businessShortCode",
            "phoneNumber",
            "requestDate",
            "transAmount",
            "transactionDesc",
            "transactionReference",
            "callbackurl",
        ] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }
        assert_eq!(json["callbackurl"], "https://app.test/api/pay/webhook");
    }

    #[test]
    fn references_are_unique_and_prefixed() {
        let a = new_payment_reference();
        let b = new_payment_reference();
        assert!(a.starts_with("KZP-"));
        assert_eq!(a.len(), 4 + 32);
        assert_ne!(a, b);
    }

    #[test]
    fn success_statuses() {
        assert!(is_success_status("SUCCESS"));
        assert!(is_success_status("completed"));
        assert!(is_success_status("0"));
        assert!(!is_success_status("FAILED"));
        assert!(!is_success_status("cancelled"));
        assert!(!is_success_status(""));
    }

    #[test]
    fn webhook_payload_parses_gateway_casing() {
        let payload: WebhookPayload = serde_json::from_str(
            r#"{"transactionReference":"KZP-abc","status":"SUCCESS","resultDesc":"Processed"}"#,
        )
        .unwrap();
        assert_eq!(payload.transaction_reference, "KZP-abc");
        assert_eq!(payload.result_desc.as_deref(), Some("Processed"));

        let bare: WebhookPayload =
            serde_json::from_str(r#"{"transactionReference":"KZP-abc","status":"FAILED"}"#)
                .unwrap();
        assert!(bare.result_desc.is_none());
    }
}

use db::models::onboarding::OnboardingProgress;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct StkPushRequest {
    /// Optional override; defaults to the phone number on the caller's
    /// personal info section.
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StkPushResponse {
    pub transaction_reference: String,
    pub progress: OnboardingProgress,
}

/// Token endpoint reply from the gateway's client-credentials flow.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Body POSTed to the gateway's STK-push endpoint. Field names follow the
/// gateway's wire contract, including the all-lowercase `callbackurl`.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StkPushPayload {
    pub account_reference: String,
    pub business_short_code: String,
    pub phone_number: String,
    pub request_date: String,
    pub trans_amount: u32,
    pub transaction_desc: String,
    pub transaction_reference: String,
    #[serde(rename = "callbackurl")]
    pub callback_url: String,
}

/// Payment result the gateway posts back to the webhook.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub transaction_reference: String,
    pub status: String,
    #[serde(default)]
    pub result_desc: Option<String>,
}

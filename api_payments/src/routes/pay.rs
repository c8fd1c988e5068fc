use std::sync::Arc;

use actix_web::{Responder, post, web};
use common::{env_config::Config, error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;

use crate::{
    dtos::pay::{StkPushRequest, StkPushResponse, WebhookPayload},
    services,
};

/// Initiates the onboarding-fee STK push to the caller's phone and
/// returns the transaction reference to poll against.
#[post("/stk")]
pub async fn post_stk(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
    req: web::Json<StkPushRequest>,
) -> Res<impl Responder> {
    let (transaction_reference, progress) =
        services::pay::initiate(&pool, &config, claims.user_id, req.into_inner().phone).await?;
    Success::ok(StkPushResponse {
        transaction_reference,
        progress,
    })
}

/// Gateway callback with the payment result. Always acknowledged with
/// 200 so the gateway stops retrying; only a successful status flips
/// `payment_verified`.
#[post("/webhook")]
pub async fn post_webhook(
    pool: web::Data<Arc<PgPool>>,
    payload: web::Json<WebhookPayload>,
) -> Res<impl Responder> {
    services::pay::process_webhook(&pool, &payload).await?;
    Success::ok(serde_json::json!({ "received": true }))
}

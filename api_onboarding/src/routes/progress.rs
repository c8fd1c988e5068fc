use std::sync::Arc;

use actix_web::{Responder, get, post, put, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use sqlx::PgPool;

use crate::{dtos::onboarding::GotoStepRequest, services};

/// Returns the caller's full wizard state, creating the default progress
/// row on first access.
#[get("/progress")]
pub async fn get_progress(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let view = services::progress::load_view(&pool, &claims).await?;
    Success::ok(view)
}

/// Lists the caller's role-specific step sequence.
#[get("/steps")]
pub async fn get_steps(claims: web::ReqData<JwtClaims>) -> Res<impl Responder> {
    Success::ok(services::progress::step_list(claims.role))
}

/// Shallow-merges a partial update into one section of the onboarding
/// data. The response carries the merged section as persisted.
///
/// # Input
/// - `section`: one of `kyc_details`, `personal_info`, `terms`
/// - body: JSON object with any subset of the section's fields
///
/// # Output
/// - Success: the merged section
/// - Error: 400 for an unknown section or a malformed payload
#[put("/sections/{section}")]
pub async fn put_section(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    path: web::Path<String>,
    body: web::Json<serde_json::Value>,
) -> Res<impl Responder> {
    let section =
        services::progress::update_section(&pool, &claims, path.as_str(), body.into_inner())
            .await?;
    Success::ok(section)
}

/// Advances the wizard by one step after validating the current one.
/// Returns 400 with `{ "errors": [...] }` when validation fails; the
/// stored step does not move in that case.
#[post("/steps/next")]
pub async fn post_next_step(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let progress = services::progress::advance(&pool, &claims).await?;
    Success::ok(progress)
}

/// Steps back one step. Back navigation never validates.
#[post("/steps/prev")]
pub async fn post_prev_step(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let progress = services::progress::step_back(&pool, &claims).await?;
    Success::ok(progress)
}

/// Jumps to an arbitrary step, clamped into the valid range.
#[post("/steps/goto")]
pub async fn post_goto_step(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    req: web::Json<GotoStepRequest>,
) -> Res<impl Responder> {
    let progress = services::progress::go_to(&pool, &claims, req.step).await?;
    Success::ok(progress)
}

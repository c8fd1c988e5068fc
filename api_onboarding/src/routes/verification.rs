use std::sync::Arc;

use actix_web::{Responder, post, web};
use common::{
    env_config::Config,
    error::{AppError, Res},
    http::Success,
    jwt::JwtClaims,
    misc::UserRole,
};
use sqlx::PgPool;

use crate::{
    dtos::onboarding::{SessionResponse, VerifyRequest, VerifyResponse},
    services::{
        self,
        verification::{VerificationSessions, evaluate_face_scan, evaluate_medical_scan},
    },
};

/// Opens a verification session correlating the upcoming document
/// submissions to one attempt against the external service.
#[post("/verification/session")]
pub async fn post_session(
    claims: web::ReqData<JwtClaims>,
    sessions: web::Data<VerificationSessions>,
) -> Res<impl Responder> {
    let session_id = sessions.create(claims.user_id);
    Success::created(SessionResponse { session_id })
}

/// Runs face verification over the caller's stored selfie.
///
/// Both signals of the scan must be positive — a detected face and
/// readable document text. A missing signal returns 422 with a
/// remediation message naming what failed; the verified flag stays false
/// and the user may retake or re-upload. Nothing is retried
/// automatically.
#[post("/verification/face")]
pub async fn post_verify_face(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
    sessions: web::Data<VerificationSessions>,
    req: web::Json<VerifyRequest>,
) -> Res<impl Responder> {
    sessions.validate(req.session_id, claims.user_id)?;

    let documents = db::onboarding::get_documents(&***pool, claims.user_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Upload a selfie first".to_string()))?;
    let selfie_url = documents
        .selfie_url
        .ok_or_else(|| AppError::BadRequest("Upload a selfie first".to_string()))?;

    let path = services::upload::local_path_for(&config, &selfie_url)?;
    let image = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read stored selfie: {}", e)))?;
    let file_name = path.rsplit('/').next().unwrap_or("selfie").to_string();

    let scan = services::verification::process_image(&config, image, file_name, req.session_id)
        .await?;
    evaluate_face_scan(&scan).map_err(AppError::UnprocessableEntity)?;

    let progress = db::onboarding::set_face_verified(&***pool, claims.user_id).await?;
    sessions.consume(req.session_id);
    Success::ok(VerifyResponse {
        verified: true,
        face_location: scan.face_location,
        progress,
    })
}

/// Runs the medical certificate check (workers only). Only the OCR
/// signal is required; the certificate carries no face.
#[post("/verification/medical")]
pub async fn post_verify_medical(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
    sessions: web::Data<VerificationSessions>,
    req: web::Json<VerifyRequest>,
) -> Res<impl Responder> {
    if claims.role != UserRole::Employee {
        return Err(AppError::BadRequest(
            "Medical verification only applies to workers".to_string(),
        ));
    }
    sessions.validate(req.session_id, claims.user_id)?;

    let documents = db::onboarding::get_documents(&***pool, claims.user_id)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest("Upload a medical certificate first".to_string())
        })?;
    let certificate_url = documents.medical_certificate_url.ok_or_else(|| {
        AppError::BadRequest("Upload a medical certificate first".to_string())
    })?;

    let path = services::upload::local_path_for(&config, &certificate_url)?;
    let image = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read stored certificate: {}", e)))?;
    let file_name = path.rsplit('/').next().unwrap_or("certificate").to_string();

    let scan = services::verification::process_image(&config, image, file_name, req.session_id)
        .await?;
    evaluate_medical_scan(&scan).map_err(AppError::UnprocessableEntity)?;

    let progress = db::onboarding::set_medical_verified(&***pool, claims.user_id).await?;
    sessions.consume(req.session_id);
    Success::ok(VerifyResponse {
        verified: true,
        face_location: None,
        progress,
    })
}

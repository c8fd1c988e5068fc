use std::sync::Arc;

use actix_multipart::form::{MultipartForm, bytes::Bytes, text::Text};
use actix_web::{Responder, post, web};
use common::{
    env_config::Config,
    error::{AppError, Res},
    http::Success,
    jwt::JwtClaims,
};
use db::dtos::onboarding::DocumentKind;
use sqlx::PgPool;

use crate::{dtos::onboarding::UploadResponse, services};

#[derive(Debug, MultipartForm)]
pub struct DocumentUploadForm {
    pub document_type: Text<String>,
    // generous transport cap; the 5MB business rule is checked in the
    // service so the rejection carries a proper message
    #[multipart(limit = "10MB")]
    pub file: Bytes,
}

/// Accepts one onboarding document (ID front/back, selfie, medical
/// certificate) as multipart form data.
///
/// The file is validated (type in {JPEG, PNG, WebP, PDF}, size <= 5MB)
/// before anything is written; a rejected upload changes no state. On
/// success the stored file's URL lands in the matching documents slot.
#[post("/documents")]
pub async fn post_document(
    claims: web::ReqData<JwtClaims>,
    pool: web::Data<Arc<PgPool>>,
    config: web::Data<Arc<Config>>,
    MultipartForm(form): MultipartForm<DocumentUploadForm>,
) -> Res<impl Responder> {
    let kind = DocumentKind::from_str(form.document_type.as_str()).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unknown document type: {}",
            form.document_type.as_str()
        ))
    })?;

    if kind == DocumentKind::MedicalCertificate && claims.role != common::misc::UserRole::Employee
    {
        return Err(AppError::BadRequest(
            "Only workers upload a medical certificate".to_string(),
        ));
    }

    let content_type = form
        .file
        .content_type
        .as_ref()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_default();

    let file_url = services::upload::store_document(
        &pool,
        &config,
        claims.user_id,
        kind,
        &content_type,
        &form.file.data,
    )
    .await?;

    Success::created(UploadResponse {
        file_url,
        document_type: kind.as_str().to_string(),
    })
}

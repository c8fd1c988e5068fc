use common::{
    env_config::Config,
    error::{AppError, Res},
};
use db::{
    dtos::onboarding::DocumentKind,
    models::onboarding::OnboardingDocuments,
};
use sqlx::PgPool;
use uuid::Uuid;

/// Uploads above this size are rejected before anything is written.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Maps an accepted content type to the stored file extension.
/// Returns `None` for anything outside the allowed set.
pub fn accepted_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "application/pdf" => Some("pdf"),
        _ => None,
    }
}

/// Validates the upload, then writes it to disk and records its URL in the
/// matching `onboarding_documents` slot. Rejections happen before any file
/// or row is touched.
pub async fn store_document(
    pool: &PgPool,
    config: &Config,
    user_id: Uuid,
    kind: DocumentKind,
    content_type: &str,
    data: &[u8],
) -> Res<String> {
    let ext = accepted_extension(content_type).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unsupported file type: {}. Allowed: JPEG, PNG, WebP, PDF",
            content_type
        ))
    })?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::BadRequest(
            "File is too large. The maximum size is 5MB".to_string(),
        ));
    }

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {}", e)))?;

    let file_name = format!("{}_{}_{}.{}", user_id, kind.as_str(), Uuid::new_v4(), ext);
    let path = format!("{}/{}", config.upload_dir.trim_end_matches('/'), file_name);
    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store file: {}", e)))?;

    let file_url = format!(
        "{}/{}",
        config.upload_base_url.trim_end_matches('/'),
        file_name
    );

    let mut tx = pool.begin().await?;
    let mut documents = db::onboarding::get_documents(&mut *tx, user_id)
        .await?
        .unwrap_or_else(|| OnboardingDocuments::empty(user_id));
    let slot = match kind {
        DocumentKind::IdFront => &mut documents.id_front_url,
        DocumentKind::IdBack => &mut documents.id_back_url,
        DocumentKind::Selfie => &mut documents.selfie_url,
        DocumentKind::MedicalCertificate => &mut documents.medical_certificate_url,
    };
    *slot = Some(file_url.clone());
    db::onboarding::upsert_documents(&mut *tx, &documents).await?;
    tx.commit().await?;

    Ok(file_url)
}

/// Resolves a stored document URL back to its path under the upload dir.
pub fn local_path_for(config: &Config, file_url: &str) -> Res<String> {
    let file_name = file_url
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && !s.contains(".."))
        .ok_or_else(|| AppError::Internal(format!("Malformed document URL: {}", file_url)))?;
    Ok(format!(
        "{}/{}",
        config.upload_dir.trim_end_matches('/'),
        file_name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::env_config::{JwtConfig, PaymentGatewayConfig};

    fn test_config(upload_dir: &str) -> Config {
        Config {
            environment: "development".to_string(),
            database_url: String::new(),
            jwt_config: JwtConfig {
                secret: "test".to_string(),
                expiration_hours: 24,
            },
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            num_workers: 1,
            rate_limit_per_sec: 10,
            cors_allowed_origin: "http://localhost:3000".to_string(),
            console_logging_enabled: false,
            upload_dir: upload_dir.to_string(),
            upload_base_url: "http://localhost:8080/uploads".to_string(),
            verification_service_url: "http://localhost:9000".to_string(),
            payment_gateway: PaymentGatewayConfig {
                client_id: String::new(),
                client_secret: String::new(),
                auth_url: String::new(),
                push_url: String::new(),
                business_short_code: "174379".to_string(),
                callback_url: String::new(),
                onboarding_fee: 2000,
            },
        }
    }

    #[test]
    fn accepts_only_the_allowed_content_types() {
        assert_eq!(accepted_extension("image/jpeg"), Some("jpg"));
        assert_eq!(accepted_extension("image/png"), Some("png"));
        assert_eq!(accepted_extension("image/webp"), Some("webp"));
        assert_eq!(accepted_extension("application/pdf"), Some("pdf"));
        assert_eq!(accepted_extension("image/gif"), None);
        assert_eq!(accepted_extension("video/mp4"), None);
        assert_eq!(accepted_extension("text/html"), None);
    }

    #[test]
    fn resolves_stored_urls_to_the_upload_dir() {
        let config = test_config("/var/kazipert/uploads/");

        let path =
            local_path_for(&config, "http://localhost:8080/uploads/abc_id_front_x.jpg").unwrap();
        assert_eq!(path, "/var/kazipert/uploads/abc_id_front_x.jpg");

        assert!(local_path_for(&config, "http://host/uploads/../etc/passwd").is_err());
        assert!(local_path_for(&config, "http://host/uploads/").is_err());
    }
}

use std::time::{Duration, Instant};

use common::{
    env_config::Config,
    error::{AppError, Res},
};
use dashmap::DashMap;
use uuid::Uuid;

use crate::dtos::onboarding::ScanResult;

/// Sessions older than this are treated as expired on access.
const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

pub struct VerificationSession {
    pub user_id: Uuid,
    pub created_at: Instant,
}

/// In-process store correlating a sequence of document submissions to one
/// verification attempt. Sessions are ephemeral and never persisted; a
/// session lives until it expires, or until `consume` removes it after a
/// successful verification.
pub struct VerificationSessions {
    inner: DashMap<Uuid, VerificationSession>,
    ttl: Duration,
}

impl VerificationSessions {
    pub fn new() -> Self {
        Self::with_ttl(SESSION_TTL)
    }

    fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: DashMap::new(),
            ttl,
        }
    }

    /// Opens a session. Expired entries are swept here so abandoned
    /// attempts do not accumulate for the life of the process.
    pub fn create(&self, user_id: Uuid) -> Uuid {
        let ttl = self.ttl;
        self.inner
            .retain(|_, session| session.created_at.elapsed() <= ttl);

        let session_id = Uuid::new_v4();
        self.inner.insert(
            session_id,
            VerificationSession {
                user_id,
                created_at: Instant::now(),
            },
        );
        session_id
    }

    /// Checks the session exists, belongs to the caller, and has not
    /// expired. Expired sessions are removed on access.
    pub fn validate(&self, session_id: Uuid, user_id: Uuid) -> Res<()> {
        let Some(session) = self.inner.get(&session_id) else {
            return Err(AppError::NotFound(
                "Verification session not found".to_string(),
            ));
        };
        if session.user_id != user_id {
            return Err(AppError::Forbidden(
                "Verification session belongs to another user".to_string(),
            ));
        }
        if session.created_at.elapsed() > self.ttl {
            drop(session);
            self.inner.remove(&session_id);
            return Err(AppError::BadRequest(
                "Verification session expired. Start a new one".to_string(),
            ));
        }
        Ok(())
    }

    /// Removes a session once its verification attempt has succeeded.
    pub fn consume(&self, session_id: Uuid) {
        self.inner.remove(&session_id);
    }
}

impl Default for VerificationSessions {
    fn default() -> Self {
        Self::new()
    }
}

/// Submits an image to the external verification service.
/// The service answers with the `processImage` contract:
/// `{ faceDetected, ocrText, faceLocation?, error? }`.
pub async fn process_image(
    config: &Config,
    image: Vec<u8>,
    file_name: String,
    session_id: Uuid,
) -> Res<ScanResult> {
    let part = reqwest::multipart::Part::bytes(image)
        .file_name(file_name)
        .mime_str("application/octet-stream")
        .map_err(|e| AppError::Internal(format!("Failed to build image part: {}", e)))?;
    let form = reqwest::multipart::Form::new()
        .part("image", part)
        .text("session_id", session_id.to_string());

    let client = reqwest::Client::new();
    let response = client
        .post(format!(
            "{}/api/verification/process-image",
            config.verification_service_url.trim_end_matches('/')
        ))
        .multipart(form)
        .send()
        .await
        .map_err(|e| AppError::Internal(format!("Verification service unreachable: {}", e)))?;

    if response.status().is_success() {
        response
            .json::<ScanResult>()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to parse scan result: {}", e)))
    } else {
        Err(AppError::Internal(format!(
            "Verification service returned error status: {}",
            response.status()
        )))
    }
}

/// Gate for the face verification step: both signals must be positive.
/// The remediation message names the missing signal so the user knows
/// whether to retake the photo or upload a sharper one.
pub fn evaluate_face_scan(scan: &ScanResult) -> Result<(), String> {
    if let Some(error) = &scan.error {
        return Err(error.clone());
    }
    if !scan.face_detected {
        return Err(
            "No face detected in the photo. Retake it with your face clearly visible".to_string(),
        );
    }
    if scan.ocr_text.as_deref().is_none_or(|t| t.trim().is_empty()) {
        return Err(
            "Could not read the text on your document. Upload a clearer image".to_string(),
        );
    }
    Ok(())
}

/// Gate for the medical certificate: only readable text is required.
pub fn evaluate_medical_scan(scan: &ScanResult) -> Result<(), String> {
    if let Some(error) = &scan.error {
        return Err(error.clone());
    }
    if scan.ocr_text.as_deref().is_none_or(|t| t.trim().is_empty()) {
        return Err(
            "Could not read the text on the certificate. Upload a clearer scan".to_string(),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(face: bool, ocr: Option<&str>) -> ScanResult {
        ScanResult {
            face_detected: face,
            ocr_text: ocr.map(String::from),
            face_location: None,
            error: None,
        }
    }

    #[test]
    fn passes_with_face_and_text() {
        assert!(evaluate_face_scan(&scan(true, Some("REPUBLIC OF KENYA"))).is_ok());
    }

    #[test]
    fn missing_face_names_the_face_signal() {
        let err = evaluate_face_scan(&scan(false, Some("REPUBLIC OF KENYA"))).unwrap_err();
        assert!(err.contains("No face detected"), "{}", err);
    }

    #[test]
    fn missing_text_names_the_ocr_signal() {
        let err = evaluate_face_scan(&scan(true, None)).unwrap_err();
        assert!(err.contains("read the text"), "{}", err);

        let err = evaluate_face_scan(&scan(true, Some("   "))).unwrap_err();
        assert!(err.contains("read the text"), "{}", err);
    }

    #[test]
    fn service_error_wins_over_signals() {
        let mut s = scan(true, Some("text"));
        s.error = Some("Image corrupted".to_string());
        assert_eq!(evaluate_face_scan(&s).unwrap_err(), "Image corrupted");
    }

    #[test]
    fn medical_gate_ignores_face_signal() {
        assert!(evaluate_medical_scan(&scan(false, Some("FIT FOR WORK"))).is_ok());
        assert!(evaluate_medical_scan(&scan(false, None)).is_err());
    }

    #[test]
    fn sessions_are_owner_bound() {
        let sessions = VerificationSessions::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let id = sessions.create(owner);

        assert!(sessions.validate(id, owner).is_ok());
        assert!(sessions.validate(id, stranger).is_err());
        assert!(sessions.validate(Uuid::new_v4(), owner).is_err());
    }

    #[test]
    fn consumed_sessions_are_gone() {
        let sessions = VerificationSessions::new();
        let owner = Uuid::new_v4();
        let id = sessions.create(owner);

        assert!(sessions.validate(id, owner).is_ok());
        sessions.consume(id);
        assert!(matches!(
            sessions.validate(id, owner),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn expired_sessions_are_removed_on_access() {
        let sessions = VerificationSessions::with_ttl(Duration::ZERO);
        let owner = Uuid::new_v4();
        let id = sessions.create(owner);

        // first access reports expiry and drops the entry
        assert!(matches!(
            sessions.validate(id, owner),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            sessions.validate(id, owner),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn create_sweeps_expired_sessions() {
        let sessions = VerificationSessions::with_ttl(Duration::ZERO);
        let owner = Uuid::new_v4();
        let stale = sessions.create(owner);
        let fresh = sessions.create(owner);

        // the stale entry was swept, not just flagged as expired
        assert!(matches!(
            sessions.validate(stale, owner),
            Err(AppError::NotFound(_))
        ));
        assert_ne!(stale, fresh);
    }
}

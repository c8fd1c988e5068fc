use db::models::onboarding::{
    KycDetails, OnboardingDocuments, OnboardingProgress, PersonalInfo,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::steps::StepKind;

/// Full wizard view returned by `GET /progress` and after every mutation.
#[derive(Debug, Serialize)]
pub struct ProgressView {
    pub progress: OnboardingProgress,
    pub kyc_details: KycDetails,
    pub personal_info: PersonalInfo,
    pub documents: OnboardingDocuments,
    pub steps: Vec<StepInfo>,
}

#[derive(Debug, Serialize)]
pub struct StepInfo {
    pub step: i32,
    pub kind: StepKind,
    pub label: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct GotoStepRequest {
    pub step: i32,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_url: String,
    pub document_type: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub session_id: Uuid,
}

/// `processImage` contract of the external verification service.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanResult {
    #[serde(rename = "faceDetected")]
    pub face_detected: bool,
    #[serde(rename = "ocrText")]
    pub ocr_text: Option<String>,
    #[serde(rename = "faceLocation")]
    pub face_location: Option<FaceLocation>,
    pub error: Option<String>,
}

/// Bounding box of the detected face, forwarded for the client overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceLocation {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub verified: bool,
    pub face_location: Option<FaceLocation>,
    pub progress: OnboardingProgress,
}

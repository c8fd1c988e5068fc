use common::{
    error::{AppError, Res},
    jwt::JwtClaims,
    misc::UserRole,
};
use db::{
    dtos::onboarding::{KycDetailsUpdate, PersonalInfoUpdate, TermsUpdate},
    models::onboarding::{KycDetails, OnboardingDocuments, OnboardingProgress, PersonalInfo},
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dtos::onboarding::{ProgressView, StepInfo},
    steps::{advance_step, clamp_step, step_count, steps_for},
    validation::{StepContext, validate_step},
};

/// Fetches the progress row, creating the default one on first access.
/// Progress rows are never deleted afterwards.
pub async fn ensure_progress(pool: &PgPool, user_id: Uuid) -> Res<OnboardingProgress> {
    if let Some(progress) = db::onboarding::get_progress(pool, user_id).await? {
        return Ok(progress);
    }
    if let Some(created) = db::onboarding::create_progress(pool, user_id).await? {
        return Ok(created);
    }
    // lost the insert race; the row exists now
    db::onboarding::get_progress(pool, user_id)
        .await?
        .ok_or_else(|| AppError::Internal("Onboarding progress row disappeared".to_string()))
}

async fn load_sections(
    pool: &PgPool,
    user_id: Uuid,
) -> Res<(KycDetails, PersonalInfo, OnboardingDocuments)> {
    let kyc = db::onboarding::get_kyc_details(pool, user_id)
        .await?
        .unwrap_or_else(|| KycDetails::empty(user_id));
    let personal = db::onboarding::get_personal_info(pool, user_id)
        .await?
        .unwrap_or_else(|| PersonalInfo::empty(user_id));
    let documents = db::onboarding::get_documents(pool, user_id)
        .await?
        .unwrap_or_else(|| OnboardingDocuments::empty(user_id));
    Ok((kyc, personal, documents))
}

pub fn step_list(role: UserRole) -> Vec<StepInfo> {
    steps_for(role)
        .iter()
        .enumerate()
        .map(|(i, kind)| StepInfo {
            step: (i + 1) as i32,
            kind: *kind,
            label: kind.label(),
        })
        .collect()
}

pub async fn load_view(pool: &PgPool, claims: &JwtClaims) -> Res<ProgressView> {
    let progress = ensure_progress(pool, claims.user_id).await?;
    let (kyc, personal, documents) = load_sections(pool, claims.user_id).await?;
    Ok(ProgressView {
        progress,
        kyc_details: kyc,
        personal_info: personal,
        documents,
        steps: step_list(claims.role),
    })
}

/// Shallow-merges a partial update into the named section and persists it.
/// The read-merge-write runs inside one transaction so overlapping saves
/// for the same user serialize instead of clobbering each other.
pub async fn update_section(
    pool: &PgPool,
    claims: &JwtClaims,
    section: &str,
    body: serde_json::Value,
) -> Res<serde_json::Value> {
    ensure_progress(pool, claims.user_id).await?;

    match section {
        "kyc_details" => {
            let update: KycDetailsUpdate = serde_json::from_value(body)
                .map_err(|e| AppError::BadRequest(format!("Invalid kyc_details payload: {}", e)))?;
            let mut tx = pool.begin().await?;
            let mut current = db::onboarding::get_kyc_details(&mut *tx, claims.user_id)
                .await?
                .unwrap_or_else(|| KycDetails::empty(claims.user_id));
            update.merge_into(&mut current);
            let saved = db::onboarding::upsert_kyc_details(&mut *tx, &current).await?;
            tx.commit().await?;
            Ok(serde_json::to_value(saved)
                .map_err(|e| AppError::Internal(format!("Failed to serialize section: {}", e)))?)
        }
        "personal_info" => {
            let update: PersonalInfoUpdate = serde_json::from_value(body).map_err(|e| {
                AppError::BadRequest(format!("Invalid personal_info payload: {}", e))
            })?;
            let mut tx = pool.begin().await?;
            let mut current = db::onboarding::get_personal_info(&mut *tx, claims.user_id)
                .await?
                .unwrap_or_else(|| PersonalInfo::empty(claims.user_id));
            update.merge_into(&mut current);
            let saved = db::onboarding::upsert_personal_info(&mut *tx, &current).await?;
            tx.commit().await?;
            Ok(serde_json::to_value(saved)
                .map_err(|e| AppError::Internal(format!("Failed to serialize section: {}", e)))?)
        }
        "terms" => {
            let update: TermsUpdate = serde_json::from_value(body)
                .map_err(|e| AppError::BadRequest(format!("Invalid terms payload: {}", e)))?;
            let saved =
                db::onboarding::set_terms_accepted(pool, claims.user_id, update.accepted).await?;
            Ok(serde_json::to_value(saved)
                .map_err(|e| AppError::Internal(format!("Failed to serialize section: {}", e)))?)
        }
        other => Err(AppError::BadRequest(format!(
            "Unknown onboarding section: {}",
            other
        ))),
    }
}

/// `nextStep`: validates the current step and only then moves forward,
/// clamped to the final step. Reaching the final step a second time (with
/// its own validation passing) marks the whole onboarding completed. The
/// response is sent only after the new step is durable.
pub async fn advance(pool: &PgPool, claims: &JwtClaims) -> Res<OnboardingProgress> {
    let progress = ensure_progress(pool, claims.user_id).await?;
    let (kyc, personal, documents) = load_sections(pool, claims.user_id).await?;

    let ctx = StepContext {
        role: claims.role,
        progress: &progress,
        kyc: &kyc,
        personal: &personal,
        documents: &documents,
    };
    let errors = validate_step(progress.current_step, &ctx);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let (next, completed) = advance_step(claims.role, progress.current_step);

    let updated = db::onboarding::set_step(pool, claims.user_id, next, completed).await?;
    if completed && !progress.completed {
        db::user::mark_user_verified(pool, claims.user_id).await?;
        log::info!("User {} completed onboarding", claims.user_id);
    }
    Ok(updated)
}

/// Back navigation is always permitted and skips validation.
pub async fn step_back(pool: &PgPool, claims: &JwtClaims) -> Res<OnboardingProgress> {
    let progress = ensure_progress(pool, claims.user_id).await?;
    go_to(pool, claims, progress.current_step - 1).await
}

/// Direct navigation, clamped to the valid range, no validation.
/// `completed` only survives while the user stays on the final step.
pub async fn go_to(pool: &PgPool, claims: &JwtClaims, step: i32) -> Res<OnboardingProgress> {
    let progress = ensure_progress(pool, claims.user_id).await?;
    let target = clamp_step(claims.role, step);
    let completed = progress.completed && target == step_count(claims.role);
    db::onboarding::set_step(pool, claims.user_id, target, completed).await
}

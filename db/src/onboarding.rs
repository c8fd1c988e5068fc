use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::onboarding::{
    KycDetails, OnboardingDocuments, OnboardingProgress, PersonalInfo,
};

pub async fn get_progress<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<OnboardingProgress>> {
    sqlx::query_as::<_, OnboardingProgress>(
        "SELECT * FROM onboarding_progress WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

/// Creates the default progress row (step 1, nothing verified). Returns
/// `None` if another request created it first.
pub async fn create_progress<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<OnboardingProgress>> {
    sqlx::query_as::<_, OnboardingProgress>(
        r#"
        INSERT INTO onboarding_progress (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn set_step<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    step: i32,
    completed: bool,
) -> Res<OnboardingProgress> {
    sqlx::query_as::<_, OnboardingProgress>(
        r#"
        UPDATE onboarding_progress
        SET current_step = $2, completed = $3, updated_at = now()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(step)
    .bind(completed)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn set_terms_accepted<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    accepted: bool,
) -> Res<OnboardingProgress> {
    sqlx::query_as::<_, OnboardingProgress>(
        r#"
        UPDATE onboarding_progress
        SET terms_accepted = $2, updated_at = now()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(accepted)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn set_face_verified<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<OnboardingProgress> {
    sqlx::query_as::<_, OnboardingProgress>(
        r#"
        UPDATE onboarding_progress
        SET face_verified = TRUE, updated_at = now()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn set_medical_verified<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<OnboardingProgress> {
    sqlx::query_as::<_, OnboardingProgress>(
        r#"
        UPDATE onboarding_progress
        SET medical_verified = TRUE, updated_at = now()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn set_payment_reference<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    reference: &str,
) -> Res<OnboardingProgress> {
    sqlx::query_as::<_, OnboardingProgress>(
        r#"
        UPDATE onboarding_progress
        SET payment_reference = $2, updated_at = now()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(reference)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Called from the payment webhook. Returns the updated row, or `None`
/// when no progress row carries the reference.
pub async fn mark_payment_verified_by_reference<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    reference: &str,
) -> Res<Option<OnboardingProgress>> {
    sqlx::query_as::<_, OnboardingProgress>(
        r#"
        UPDATE onboarding_progress
        SET payment_verified = TRUE, updated_at = now()
        WHERE payment_reference = $1
        RETURNING *
        "#,
    )
    .bind(reference)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_kyc_details<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<KycDetails>> {
    sqlx::query_as::<_, KycDetails>("SELECT * FROM kyc_details WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn upsert_kyc_details<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    row: &KycDetails,
) -> Res<KycDetails> {
    sqlx::query_as::<_, KycDetails>(
        r#"
        INSERT INTO kyc_details
            (user_id, full_name, gender, date_of_birth, region, id_number, address, marital_status, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now())
        ON CONFLICT (user_id) DO UPDATE SET
            full_name = EXCLUDED.full_name,
            gender = EXCLUDED.gender,
            date_of_birth = EXCLUDED.date_of_birth,
            region = EXCLUDED.region,
            id_number = EXCLUDED.id_number,
            address = EXCLUDED.address,
            marital_status = EXCLUDED.marital_status,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(row.user_id)
    .bind(&row.full_name)
    .bind(&row.gender)
    .bind(row.date_of_birth)
    .bind(&row.region)
    .bind(&row.id_number)
    .bind(&row.address)
    .bind(&row.marital_status)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_personal_info<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<PersonalInfo>> {
    sqlx::query_as::<_, PersonalInfo>("SELECT * FROM personal_info WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn upsert_personal_info<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    row: &PersonalInfo,
) -> Res<PersonalInfo> {
    sqlx::query_as::<_, PersonalInfo>(
        r#"
        INSERT INTO personal_info
            (user_id, phone_number, nationality, next_of_kin_name, next_of_kin_phone, updated_at)
        VALUES ($1, $2, $3, $4, $5, now())
        ON CONFLICT (user_id) DO UPDATE SET
            phone_number = EXCLUDED.phone_number,
            nationality = EXCLUDED.nationality,
            next_of_kin_name = EXCLUDED.next_of_kin_name,
            next_of_kin_phone = EXCLUDED.next_of_kin_phone,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(row.user_id)
    .bind(&row.phone_number)
    .bind(&row.nationality)
    .bind(&row.next_of_kin_name)
    .bind(&row.next_of_kin_phone)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_documents<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<OnboardingDocuments>> {
    sqlx::query_as::<_, OnboardingDocuments>(
        "SELECT * FROM onboarding_documents WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn upsert_documents<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    row: &OnboardingDocuments,
) -> Res<OnboardingDocuments> {
    sqlx::query_as::<_, OnboardingDocuments>(
        r#"
        INSERT INTO onboarding_documents
            (user_id, id_front_url, id_back_url, selfie_url, medical_certificate_url, updated_at)
        VALUES ($1, $2, $3, $4, $5, now())
        ON CONFLICT (user_id) DO UPDATE SET
            id_front_url = EXCLUDED.id_front_url,
            id_back_url = EXCLUDED.id_back_url,
            selfie_url = EXCLUDED.selfie_url,
            medical_certificate_url = EXCLUDED.medical_certificate_url,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(row.user_id)
    .bind(&row.id_front_url)
    .bind(&row.id_back_url)
    .bind(&row.selfie_url)
    .bind(&row.medical_certificate_url)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

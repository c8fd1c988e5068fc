use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The wizard's durable state. `current_step` is kept inside the valid
/// per-role range by the service layer; `completed` is only set when the
/// final step is reached.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct OnboardingProgress {
    pub user_id: Uuid,
    pub current_step: i32,
    pub completed: bool,
    pub face_verified: bool,
    pub medical_verified: bool,
    pub payment_verified: bool,
    pub terms_accepted: bool,
    pub payment_reference: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct KycDetails {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub region: Option<String>,
    pub id_number: Option<String>,
    pub address: Option<String>,
    pub marital_status: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub user_id: Uuid,
    pub phone_number: Option<String>,
    pub nationality: Option<String>,
    pub next_of_kin_name: Option<String>,
    pub next_of_kin_phone: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct OnboardingDocuments {
    pub user_id: Uuid,
    pub id_front_url: Option<String>,
    pub id_back_url: Option<String>,
    pub selfie_url: Option<String>,
    pub medical_certificate_url: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl KycDetails {
    pub fn empty(user_id: Uuid) -> Self {
        KycDetails {
            user_id,
            full_name: None,
            gender: None,
            date_of_birth: None,
            region: None,
            id_number: None,
            address: None,
            marital_status: None,
            updated_at: NaiveDateTime::default(),
        }
    }
}

impl PersonalInfo {
    pub fn empty(user_id: Uuid) -> Self {
        PersonalInfo {
            user_id,
            phone_number: None,
            nationality: None,
            next_of_kin_name: None,
            next_of_kin_phone: None,
            updated_at: NaiveDateTime::default(),
        }
    }
}

impl OnboardingDocuments {
    pub fn empty(user_id: Uuid) -> Self {
        OnboardingDocuments {
            user_id,
            id_front_url: None,
            id_back_url: None,
            selfie_url: None,
            medical_certificate_url: None,
            updated_at: NaiveDateTime::default(),
        }
    }
}

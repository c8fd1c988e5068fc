use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::onboarding::{KycDetails, PersonalInfo};

/// Partial update for the KYC section. Absent fields keep their stored
/// values (shallow merge, never a replace).
#[derive(Debug, Default, Clone, Deserialize)]
pub struct KycDetailsUpdate {
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub region: Option<String>,
    pub id_number: Option<String>,
    pub address: Option<String>,
    pub marital_status: Option<String>,
}

impl KycDetailsUpdate {
    pub fn merge_into(self, current: &mut KycDetails) {
        if self.full_name.is_some() {
            current.full_name = self.full_name;
        }
        if self.gender.is_some() {
            current.gender = self.gender;
        }
        if self.date_of_birth.is_some() {
            current.date_of_birth = self.date_of_birth;
        }
        if self.region.is_some() {
            current.region = self.region;
        }
        if self.id_number.is_some() {
            current.id_number = self.id_number;
        }
        if self.address.is_some() {
            current.address = self.address;
        }
        if self.marital_status.is_some() {
            current.marital_status = self.marital_status;
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PersonalInfoUpdate {
    pub phone_number: Option<String>,
    pub nationality: Option<String>,
    pub next_of_kin_name: Option<String>,
    pub next_of_kin_phone: Option<String>,
}

impl PersonalInfoUpdate {
    pub fn merge_into(self, current: &mut PersonalInfo) {
        if self.phone_number.is_some() {
            current.phone_number = self.phone_number;
        }
        if self.nationality.is_some() {
            current.nationality = self.nationality;
        }
        if self.next_of_kin_name.is_some() {
            current.next_of_kin_name = self.next_of_kin_name;
        }
        if self.next_of_kin_phone.is_some() {
            current.next_of_kin_phone = self.next_of_kin_phone;
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TermsUpdate {
    pub accepted: bool,
}

/// Which slot of `onboarding_documents` an upload fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    IdFront,
    IdBack,
    Selfie,
    MedicalCertificate,
}

impl DocumentKind {
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "id_front" => Some(DocumentKind::IdFront),
            "id_back" => Some(DocumentKind::IdBack),
            "selfie" => Some(DocumentKind::Selfie),
            "medical_certificate" => Some(DocumentKind::MedicalCertificate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::IdFront => "id_front",
            DocumentKind::IdBack => "id_back",
            DocumentKind::Selfie => "selfie",
            DocumentKind::MedicalCertificate => "medical_certificate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn sequential_updates_merge_instead_of_replacing() {
        let mut kyc = KycDetails::empty(Uuid::new_v4());

        KycDetailsUpdate {
            id_number: Some("12345678".to_string()),
            ..Default::default()
        }
        .merge_into(&mut kyc);

        KycDetailsUpdate {
            marital_status: Some("single".to_string()),
            ..Default::default()
        }
        .merge_into(&mut kyc);

        assert_eq!(kyc.id_number.as_deref(), Some("12345678"));
        assert_eq!(kyc.marital_status.as_deref(), Some("single"));
    }

    #[test]
    fn absent_fields_keep_stored_values() {
        let mut info = PersonalInfo::empty(Uuid::new_v4());
        info.phone_number = Some("254712345678".to_string());

        PersonalInfoUpdate {
            nationality: Some("Kenyan".to_string()),
            ..Default::default()
        }
        .merge_into(&mut info);

        assert_eq!(info.phone_number.as_deref(), Some("254712345678"));
        assert_eq!(info.nationality.as_deref(), Some("Kenyan"));
    }

    #[test]
    fn document_kind_round_trips_known_names() {
        for name in ["id_front", "id_back", "selfie", "medical_certificate"] {
            let kind = DocumentKind::from_str(name).unwrap();
            assert_eq!(kind.as_str(), name);
        }
        assert!(DocumentKind::from_str("passport_photo").is_none());
    }
}

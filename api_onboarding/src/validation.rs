use chrono::{NaiveDate, Utc};
use common::misc::{UserRole, normalize_msisdn};
use db::models::onboarding::{KycDetails, OnboardingDocuments, OnboardingProgress, PersonalInfo};

use crate::steps::{StepKind, step_kind};

/// Workers must be at least this old to register on the platform.
pub const MINIMUM_AGE_YEARS: u32 = 22;

/// The 47 Kenyan counties accepted as a worker's region of residence.
pub const KENYAN_COUNTIES: [&str; 47] = [
    "Baringo",
    "Bomet",
    "Bungoma",
    "Busia",
    "Elgeyo-Marakwet",
    "Embu",
    "Garissa",
    "Homa Bay",
    "Isiolo",
    "Kajiado",
    "Kakamega",
    "Kericho",
    "Kiambu",
    "Kilifi",
    "Kirinyaga",
    "Kisii",
    "Kisumu",
    "Kitui",
    "Kwale",
    "Laikipia",
    "Lamu",
    "Machakos",
    "Makueni",
    "Mandera",
    "Marsabit",
    "Meru",
    "Migori",
    "Mombasa",
    "Murang'a",
    "Nairobi",
    "Nakuru",
    "Nandi",
    "Narok",
    "Nyamira",
    "Nyandarua",
    "Nyeri",
    "Samburu",
    "Siaya",
    "Taita-Taveta",
    "Tana River",
    "Tharaka-Nithi",
    "Trans Nzoia",
    "Turkana",
    "Uasin Gishu",
    "Vihiga",
    "Wajir",
    "West Pokot",
];

/// The 11 Omani governorates accepted as an employer's region.
pub const OMANI_GOVERNORATES: [&str; 11] = [
    "Ad Dakhiliyah",
    "Ad Dhahirah",
    "Al Batinah North",
    "Al Batinah South",
    "Al Buraimi",
    "Al Wusta",
    "Ash Sharqiyah North",
    "Ash Sharqiyah South",
    "Dhofar",
    "Muscat",
    "Musandam",
];

/// Everything `validate_step` needs to judge one step.
pub struct StepContext<'a> {
    pub role: UserRole,
    pub progress: &'a OnboardingProgress,
    pub kyc: &'a KycDetails,
    pub personal: &'a PersonalInfo,
    pub documents: &'a OnboardingDocuments,
}

/// Pure per-step validation. Returns human-readable error strings for the
/// given step's required fields; empty when the step may be advanced past.
pub fn validate_step(step: i32, ctx: &StepContext) -> Vec<String> {
    match step_kind(ctx.role, step) {
        StepKind::Instructions => validate_instructions(ctx.progress),
        StepKind::KycDetails => validate_kyc(ctx.role, ctx.kyc),
        StepKind::PersonalInfo => validate_personal_info(ctx.personal),
        StepKind::IdFront => require_document(
            ctx.documents.id_front_url.as_deref(),
            "Upload the front of your ID document",
        ),
        StepKind::IdBack => require_document(
            ctx.documents.id_back_url.as_deref(),
            "Upload the back of your ID document",
        ),
        StepKind::FaceVerification => validate_face(ctx.progress, ctx.documents),
        StepKind::MedicalCertificate => validate_medical(ctx.progress, ctx.documents),
        StepKind::Payment => validate_payment(ctx.progress),
    }
}

fn validate_instructions(progress: &OnboardingProgress) -> Vec<String> {
    let mut errors = Vec::new();
    if !progress.terms_accepted {
        errors.push("You must accept the terms and conditions".to_string());
    }
    errors
}

fn validate_kyc(role: UserRole, kyc: &KycDetails) -> Vec<String> {
    let mut errors = Vec::new();

    if kyc.full_name.as_deref().is_none_or(|s| s.trim().is_empty()) {
        errors.push("Full name is required".to_string());
    }
    if kyc.gender.as_deref().is_none_or(|s| s.trim().is_empty()) {
        errors.push("Gender is required".to_string());
    }

    match kyc.date_of_birth {
        None => errors.push("Date of birth is required".to_string()),
        Some(dob) => {
            if age_in_years(dob) < MINIMUM_AGE_YEARS {
                errors.push(format!(
                    "You must be at least {} years of age",
                    MINIMUM_AGE_YEARS
                ));
            }
        }
    }

    match kyc.region.as_deref() {
        None => errors.push(region_error(role)),
        Some(region) if !is_valid_region(role, region) => errors.push(region_error(role)),
        Some(_) => {}
    }

    match kyc.id_number.as_deref() {
        None => errors.push("ID number is required".to_string()),
        Some(id) if !is_valid_id_number(role, id) => errors.push(id_number_error(role)),
        Some(_) => {}
    }

    if kyc.address.as_deref().is_none_or(|s| s.trim().is_empty()) {
        errors.push("Address is required".to_string());
    }

    errors
}

fn validate_personal_info(personal: &PersonalInfo) -> Vec<String> {
    let mut errors = Vec::new();
    match personal.phone_number.as_deref() {
        None => errors.push("Phone number is required".to_string()),
        Some(phone) if normalize_msisdn(phone).is_none() => {
            errors.push("Enter a valid mobile phone number".to_string());
        }
        Some(_) => {}
    }
    errors
}

fn require_document(url: Option<&str>, message: &str) -> Vec<String> {
    if url.is_none_or(|s| s.is_empty()) {
        vec![message.to_string()]
    } else {
        Vec::new()
    }
}

fn validate_face(progress: &OnboardingProgress, documents: &OnboardingDocuments) -> Vec<String> {
    let mut errors = require_document(
        documents.selfie_url.as_deref(),
        "Upload or capture a selfie photo",
    );
    if !progress.face_verified {
        errors.push("Face verification has not passed yet".to_string());
    }
    errors
}

fn validate_medical(progress: &OnboardingProgress, documents: &OnboardingDocuments) -> Vec<String> {
    let mut errors = require_document(
        documents.medical_certificate_url.as_deref(),
        "Upload your medical certificate",
    );
    if !progress.medical_verified {
        errors.push("Medical certificate has not been verified yet".to_string());
    }
    errors
}

fn validate_payment(progress: &OnboardingProgress) -> Vec<String> {
    let mut errors = Vec::new();
    if !progress.payment_verified {
        errors.push("The onboarding fee has not been paid yet".to_string());
    }
    errors
}

/// Whole years between the date of birth and today.
pub fn age_in_years(dob: NaiveDate) -> u32 {
    Utc::now().date_naive().years_since(dob).unwrap_or(0)
}

pub fn is_valid_region(role: UserRole, region: &str) -> bool {
    let list: &[&str] = match role {
        UserRole::Employee => &KENYAN_COUNTIES,
        UserRole::Employer => &OMANI_GOVERNORATES,
    };
    list.iter().any(|r| r.eq_ignore_ascii_case(region))
}

fn region_error(role: UserRole) -> String {
    match role {
        UserRole::Employee => "Select a valid county of residence".to_string(),
        UserRole::Employer => "Select a valid governorate of residence".to_string(),
    }
}

/// Kenyan national IDs are exactly 8 digits. Employer/passport IDs are
/// looser: 6 to 12 alphanumeric characters.
pub fn is_valid_id_number(role: UserRole, id: &str) -> bool {
    match role {
        UserRole::Employee => id.len() == 8 && id.chars().all(|c| c.is_ascii_digit()),
        UserRole::Employer => {
            (6..=12).contains(&id.len()) && id.chars().all(|c| c.is_ascii_alphanumeric())
        }
    }
}

fn id_number_error(role: UserRole) -> String {
    match role {
        UserRole::Employee => "National ID number must be exactly 8 digits".to_string(),
        UserRole::Employer => "ID or passport number must be 6-12 letters and digits".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn context_fixtures() -> (KycDetails, PersonalInfo, OnboardingDocuments, OnboardingProgress)
    {
        let user_id = Uuid::new_v4();
        let progress = OnboardingProgress {
            user_id,
            current_step: 1,
            completed: false,
            face_verified: false,
            medical_verified: false,
            payment_verified: false,
            terms_accepted: false,
            payment_reference: None,
            created_at: Default::default(),
            updated_at: Default::default(),
        };
        (
            KycDetails::empty(user_id),
            PersonalInfo::empty(user_id),
            OnboardingDocuments::empty(user_id),
            progress,
        )
    }

    fn dob_years_ago(years: i64) -> NaiveDate {
        // 100 extra days so leap years never push the age under the target
        Utc::now().date_naive() - Duration::days(years * 365 + 100)
    }

    fn valid_employee_kyc(user_id: Uuid) -> KycDetails {
        KycDetails {
            user_id,
            full_name: Some("Amina Wanjiku".to_string()),
            gender: Some("female".to_string()),
            date_of_birth: Some(dob_years_ago(30)),
            region: Some("Nairobi".to_string()),
            id_number: Some("12345678".to_string()),
            address: Some("Kibera Drive 14".to_string()),
            marital_status: Some("single".to_string()),
            updated_at: Default::default(),
        }
    }

    #[test]
    fn kyc_step_passes_with_valid_employee_fields() {
        let (_, personal, documents, progress) = context_fixtures();
        let kyc = valid_employee_kyc(progress.user_id);
        let ctx = StepContext {
            role: UserRole::Employee,
            progress: &progress,
            kyc: &kyc,
            personal: &personal,
            documents: &documents,
        };
        assert!(validate_step(2, &ctx).is_empty());
    }

    #[test]
    fn dob_twenty_years_ago_yields_age_error() {
        let (_, personal, documents, progress) = context_fixtures();
        let mut kyc = valid_employee_kyc(progress.user_id);
        kyc.date_of_birth = Some(dob_years_ago(20));
        let ctx = StepContext {
            role: UserRole::Employee,
            progress: &progress,
            kyc: &kyc,
            personal: &personal,
            documents: &documents,
        };
        let errors = validate_step(2, &ctx);
        assert!(errors.iter().any(|e| e.contains("22 years")), "{:?}", errors);
    }

    #[test]
    fn dob_twenty_three_years_ago_yields_no_age_error() {
        let (_, personal, documents, progress) = context_fixtures();
        let mut kyc = valid_employee_kyc(progress.user_id);
        kyc.date_of_birth = Some(dob_years_ago(23));
        let ctx = StepContext {
            role: UserRole::Employee,
            progress: &progress,
            kyc: &kyc,
            personal: &personal,
            documents: &documents,
        };
        let errors = validate_step(2, &ctx);
        assert!(!errors.iter().any(|e| e.contains("years")), "{:?}", errors);
    }

    #[test]
    fn employee_id_number_must_be_eight_digits() {
        assert!(is_valid_id_number(UserRole::Employee, "12345678"));
        assert!(!is_valid_id_number(UserRole::Employee, "1234567"));
        assert!(!is_valid_id_number(UserRole::Employee, "123456789"));
        assert!(!is_valid_id_number(UserRole::Employee, "1234567a"));
    }

    #[test]
    fn employer_id_number_is_alphanumeric() {
        assert!(is_valid_id_number(UserRole::Employer, "OM123456"));
        assert!(is_valid_id_number(UserRole::Employer, "P1234567"));
        assert!(!is_valid_id_number(UserRole::Employer, "OM-123"));
        assert!(!is_valid_id_number(UserRole::Employer, "AB1"));
    }

    #[test]
    fn region_lists_are_role_specific() {
        assert!(is_valid_region(UserRole::Employee, "Mombasa"));
        assert!(is_valid_region(UserRole::Employee, "nairobi"));
        assert!(!is_valid_region(UserRole::Employee, "Muscat"));
        assert!(is_valid_region(UserRole::Employer, "Muscat"));
        assert!(!is_valid_region(UserRole::Employer, "Nairobi"));
    }

    #[test]
    fn instructions_step_requires_accepted_terms() {
        let (kyc, personal, documents, mut progress) = context_fixtures();
        let ctx = StepContext {
            role: UserRole::Employee,
            progress: &progress,
            kyc: &kyc,
            personal: &personal,
            documents: &documents,
        };
        assert_eq!(validate_step(1, &ctx).len(), 1);

        progress.terms_accepted = true;
        let ctx = StepContext {
            role: UserRole::Employee,
            progress: &progress,
            kyc: &kyc,
            personal: &personal,
            documents: &documents,
        };
        assert!(validate_step(1, &ctx).is_empty());
    }

    #[test]
    fn face_step_requires_selfie_and_passed_verification() {
        let (kyc, personal, mut documents, mut progress) = context_fixtures();
        documents.selfie_url = Some("http://localhost/uploads/selfie.jpg".to_string());
        let ctx = StepContext {
            role: UserRole::Employer,
            progress: &progress,
            kyc: &kyc,
            personal: &personal,
            documents: &documents,
        };
        // employer step 6 is face verification
        assert_eq!(validate_step(6, &ctx).len(), 1);

        progress.face_verified = true;
        let ctx = StepContext {
            role: UserRole::Employer,
            progress: &progress,
            kyc: &kyc,
            personal: &personal,
            documents: &documents,
        };
        assert!(validate_step(6, &ctx).is_empty());
    }

}

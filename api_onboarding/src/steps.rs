use common::misc::UserRole;
use serde::Serialize;

/// What a wizard step asks of the user. Both roles walk the same linear
/// shape; employers skip the medical certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Instructions,
    KycDetails,
    PersonalInfo,
    IdFront,
    IdBack,
    FaceVerification,
    MedicalCertificate,
    Payment,
}

impl StepKind {
    pub fn label(&self) -> &'static str {
        match self {
            StepKind::Instructions => "Instructions & terms",
            StepKind::KycDetails => "Identity details",
            StepKind::PersonalInfo => "Personal information",
            StepKind::IdFront => "ID document (front)",
            StepKind::IdBack => "ID document (back)",
            StepKind::FaceVerification => "Selfie & face verification",
            StepKind::MedicalCertificate => "Medical certificate",
            StepKind::Payment => "Payment & completion",
        }
    }
}

const EMPLOYEE_STEPS: [StepKind; 8] = [
    StepKind::Instructions,
    StepKind::KycDetails,
    StepKind::PersonalInfo,
    StepKind::IdFront,
    StepKind::IdBack,
    StepKind::FaceVerification,
    StepKind::MedicalCertificate,
    StepKind::Payment,
];

const EMPLOYER_STEPS: [StepKind; 7] = [
    StepKind::Instructions,
    StepKind::KycDetails,
    StepKind::PersonalInfo,
    StepKind::IdFront,
    StepKind::IdBack,
    StepKind::FaceVerification,
    StepKind::Payment,
];

/// The single source of the role-to-step mapping.
pub fn steps_for(role: UserRole) -> &'static [StepKind] {
    match role {
        UserRole::Employee => &EMPLOYEE_STEPS,
        UserRole::Employer => &EMPLOYER_STEPS,
    }
}

pub fn step_count(role: UserRole) -> i32 {
    steps_for(role).len() as i32
}

/// Steps are 1-based; any input is forced into `[1, N]`.
pub fn clamp_step(role: UserRole, step: i32) -> i32 {
    step.clamp(1, step_count(role))
}

pub fn step_kind(role: UserRole, step: i32) -> StepKind {
    let clamped = clamp_step(role, step);
    steps_for(role)[(clamped - 1) as usize]
}

/// Decides a forward move: the step to persist and whether the wizard is
/// now complete. Completion fires when the move starts from the final
/// step; the step itself never goes past it.
pub fn advance_step(role: UserRole, current_step: i32) -> (i32, bool) {
    let current = clamp_step(role, current_step);
    (clamp_step(role, current + 1), current == step_count(role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_step_counts() {
        assert_eq!(step_count(UserRole::Employee), 8);
        assert_eq!(step_count(UserRole::Employer), 7);
    }

    #[test]
    fn clamp_fixes_any_input_into_range() {
        for role in [UserRole::Employee, UserRole::Employer] {
            let n = step_count(role);
            assert_eq!(clamp_step(role, 0), 1);
            assert_eq!(clamp_step(role, -5), 1);
            assert_eq!(clamp_step(role, 1), 1);
            assert_eq!(clamp_step(role, n), n);
            assert_eq!(clamp_step(role, n + 1), n);
            assert_eq!(clamp_step(role, 100), n);
        }
    }

    #[test]
    fn employer_has_no_medical_step() {
        assert!(!steps_for(UserRole::Employer).contains(&StepKind::MedicalCertificate));
        assert!(steps_for(UserRole::Employee).contains(&StepKind::MedicalCertificate));
    }

    #[test]
    fn forward_move_completes_only_on_the_final_step() {
        for role in [UserRole::Employee, UserRole::Employer] {
            let n = step_count(role);
            assert_eq!(advance_step(role, 1), (2, false));
            assert_eq!(advance_step(role, n - 1), (n, false));
            // next while standing on the final step completes and stays
            assert_eq!(advance_step(role, n), (n, true));
            // repeating it reports completion again, never step n + 1
            assert_eq!(advance_step(role, n), (n, true));
        }
    }

    #[test]
    fn both_roles_end_with_payment() {
        for role in [UserRole::Employee, UserRole::Employer] {
            assert_eq!(step_kind(role, step_count(role)), StepKind::Payment);
        }
    }
}

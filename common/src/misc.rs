use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Which portal the account belongs to. Workers onboard from Kenya,
/// employers from Oman; the two roles see different step sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Employee,
    Employer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Employee => "employee",
            UserRole::Employer => "employer",
        }
    }

    pub fn from_str(value: &str) -> Result<Self, AppError> {
        match value {
            "employee" => Ok(UserRole::Employee),
            "employer" => Ok(UserRole::Employer),
            other => Err(AppError::Internal(format!("Unknown user role: {}", other))),
        }
    }
}

impl ToString for UserRole {
    fn to_string(&self) -> String {
        self.as_str().to_string()
    }
}

/// Normalizes a phone number to MSISDN form (e.g. 254712345678).
/// Accepts `+254...`, `254...`, local Kenyan `07...`/`01...` forms, and
/// Omani `968...` numbers.
pub fn normalize_msisdn(phone: &str) -> Option<String> {
    let cleaned: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let msisdn = if digits.starts_with("254") || digits.starts_with("968") {
        digits.to_string()
    } else if digits.starts_with('0') && digits.len() == 10 {
        format!("254{}", &digits[1..])
    } else {
        return None;
    };

    if (11..=13).contains(&msisdn.len()) {
        Some(msisdn)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msisdn_normalization() {
        assert_eq!(
            normalize_msisdn("0712 345 678").as_deref(),
            Some("254712345678")
        );
        assert_eq!(
            normalize_msisdn("+254712345678").as_deref(),
            Some("254712345678")
        );
        assert_eq!(
            normalize_msisdn("96891234567").as_deref(),
            Some("96891234567")
        );
        assert!(normalize_msisdn("12345").is_none());
        assert!(normalize_msisdn("07x2345678").is_none());
    }
}

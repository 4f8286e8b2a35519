//! Client-side form validation
//!
//! Mirrors the server's basic rules so obvious mistakes are caught before a
//! request is sent. The server still validates everything.

use once_cell::sync::Lazy;
use regex::Regex;

/// Minimum password length accepted by the API
pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Collects validation messages for a form
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Validator {
    issues: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field must not be blank
    pub fn required(&mut self, label: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.issues.push(format!("{label} is required"));
        }
        self
    }

    /// Field must look like an email address
    pub fn email(&mut self, label: &str, value: &str) -> &mut Self {
        let value = value.trim();
        if value.is_empty() {
            self.issues.push(format!("{label} is required"));
        } else if !EMAIL.is_match(value) {
            self.issues.push(format!("{label} must be a valid email address"));
        }
        self
    }

    /// Password must meet the minimum length
    pub fn password(&mut self, label: &str, value: &str) -> &mut Self {
        if value.chars().count() < MIN_PASSWORD_LEN {
            self.issues
                .push(format!("{label} must be at least {MIN_PASSWORD_LEN} characters"));
        }
        self
    }

    /// Confirmation must equal the original
    pub fn matches(&mut self, label: &str, value: &str, original: &str) -> &mut Self {
        if value != original {
            self.issues.push(format!("{label} does not match"));
        }
        self
    }

    /// `Ok` when no rule failed, otherwise every message in order
    pub fn finish(&mut self) -> Result<(), Vec<String>> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.issues))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("  ada@example.com ", true)]
    #[case("ada@example", false)]
    #[case("ada example.com", false)]
    #[case("@example.com", false)]
    fn test_email(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(Validator::new().email("Email", value).finish().is_ok(), ok);
    }

    #[test]
    fn test_collects_all_issues() {
        let issues = Validator::new()
            .required("Name", " ")
            .email("Email", "")
            .password("Password", "short")
            .matches("Confirm password", "shorter", "short")
            .finish()
            .unwrap_err();

        assert_eq!(
            issues,
            vec![
                "Name is required".to_string(),
                "Email is required".to_string(),
                "Password must be at least 8 characters".to_string(),
                "Confirm password does not match".to_string(),
            ]
        );
    }

    #[test]
    fn test_valid_form() {
        assert!(Validator::new()
            .required("Name", "Ada")
            .email("Email", "ada@example.com")
            .password("Password", "correct horse")
            .matches("Confirm password", "correct horse", "correct horse")
            .finish()
            .is_ok());
    }
}

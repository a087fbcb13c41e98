//! Form validation helpers

use std::sync::LazyLock;

use imobi_common::ImobiError;
use imobi_common::utils::digits_only;
use validator::{Validate, ValidationError};

/// Maximum length for titles shown on cards and banners
pub const MAX_TITLE_LENGTH: u64 = 150;

/// Maximum length for image and link URLs
pub const MAX_URL_LENGTH: u64 = 500;

static SLUG_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Invalid regex pattern"));

/// Run the derived validators and turn a failure into `InvalidData`
pub fn validate_form<T: Validate>(form: &T) -> Result<(), ImobiError> {
    form.validate()
        .map_err(|e| ImobiError::InvalidData(e.to_string()))
}

/// Slugs are lowercase ASCII words joined by single dashes
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if SLUG_REGEX.is_match(slug) {
        Ok(())
    } else {
        Err(ValidationError::new("slug_invalid").with_message(
            "slug must contain only lowercase letters, digits and dashes".into(),
        ))
    }
}

/// Brazilian phone number: 10 to 13 digits once punctuation is removed
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = digits_only(phone).len();
    if (10..=13).contains(&digits) {
        Ok(())
    } else {
        Err(ValidationError::new("phone_invalid")
            .with_message("telefone must have between 10 and 13 digits".into()))
    }
}

/// Required text must have something besides whitespace
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("must not be blank".into()))
    } else {
        Ok(())
    }
}

/// Treat an empty or whitespace-only optional field as absent
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn default_status() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("quem-somos").is_ok());
        assert!(validate_slug("faq2").is_ok());
        assert!(validate_slug("Quem-Somos").is_err());
        assert!(validate_slug("quem--somos").is_err());
        assert!(validate_slug("-inicio").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("(19) 3422-0000").is_ok());
        assert!(validate_phone("+55 19 99999-0000").is_ok());
        assert!(validate_phone("3422-0000").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Lançamento").is_ok());
        assert!(not_blank(" x ").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("\t\n").is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some(" x ".to_string())), Some("x".to_string()));
        assert_eq!(non_blank(None), None);
    }
}

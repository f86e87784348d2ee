//! Field checks shared by services, errors name the offending field.

use crate::server::error::domain::DomainError;

/// Trims a required text field, rejecting blank values
pub fn required_text(field: &str, value: &str) -> Result<String, DomainError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(DomainError::validation(format!("{}: must not be blank", field)));
    }

    Ok(value.to_string())
}

/// Like [`required_text`] for fields of partial updates, `None` stays `None`
pub fn updated_text(field: &str, value: Option<String>) -> Result<Option<String>, DomainError> {
    value.map(|value| required_text(field, &value)).transpose()
}

/// Trims optional free text, blank values become `None`
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn at_least<T>(field: &str, value: T, min: T) -> Result<T, DomainError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min {
        return Err(DomainError::validation(format!(
            "{}: must be at least {}",
            field, min
        )));
    }

    Ok(value)
}

/// Rejects negative and non finite amounts
pub fn amount(field: &str, value: f64) -> Result<f64, DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(format!(
            "{}: must be a non-negative amount",
            field
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expect trimmed text and an error naming the field for blank values
    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("name", "  Loft ").unwrap(), "Loft");

        match required_text("name", "   ") {
            Err(DomainError::Validation(msg)) => assert!(msg.starts_with("name:")),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(optional_text(Some("  ".to_string())), None);
        assert_eq!(optional_text(Some(" a ".to_string())), Some("a".to_string()));
    }

    #[test]
    fn amount_rejects_negative_and_nan() {
        assert!(amount("nightly_rate", -1.0).is_err());
        assert!(amount("nightly_rate", f64::NAN).is_err());
        assert_eq!(amount("nightly_rate", 0.0).unwrap(), 0.0);
    }
}

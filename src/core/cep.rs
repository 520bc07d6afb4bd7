use thiserror::Error;

/// Digits in a Brazilian CEP after separator removal
pub const CEP_LENGTH: usize = 8;

/// Error returned when the postal code fails validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn invalid() -> Self {
        Self {
            message: "invalid zipcode".to_string(),
        }
    }
}

/// Normalize and validate a raw postal code
///
/// Strips hyphen separators and requires the remainder to be exactly
/// 8 characters. Length is the only constraint: the upstream contract
/// does not enforce digits-only input, and that permissive behavior is
/// preserved here.
///
/// # Arguments
/// * `raw` - Postal code as received from the client, e.g. "01001-000"
///
/// # Returns
/// The normalized 8-character code, e.g. "01001000"
pub fn normalize_cep(raw: &str) -> Result<String, ValidationError> {
    let normalized: String = raw.chars().filter(|c| *c != '-').collect();

    if normalized.is_empty() || normalized.chars().count() != CEP_LENGTH {
        return Err(ValidationError::invalid());
    }

    Ok(normalized)
}

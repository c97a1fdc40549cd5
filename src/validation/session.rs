use crate::error::{AppError, Result};

/// The maximum length of any issue-session field.
const MAX_FIELD_LEN: usize = 256;

/// Validates a course or lesson identifier.
///
/// # Arguments
///
/// * `field` - The field name, used in the rejection message.
/// * `value` - The identifier to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the identifier is valid.
pub fn validate_identifier(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }

    if value.len() > MAX_FIELD_LEN {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, MAX_FIELD_LEN
        )));
    }

    Ok(())
}

/// Validates a video reference.
///
/// References are interpolated into markup and upstream URLs, so the charset
/// is restricted to identifier characters.
pub fn validate_reference(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AppError::Validation("reference is required".to_string()));
    }

    if value.len() > MAX_FIELD_LEN {
        return Err(AppError::Validation(format!(
            "reference must be at most {} characters",
            MAX_FIELD_LEN
        )));
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::Validation(
            "reference may only contain letters, numbers, underscores, and hyphens".to_string(),
        ));
    }

    Ok(())
}

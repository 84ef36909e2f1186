use time::Date;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::core;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn validate_payload<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload.validate().map_err(|errors| {
        let message = errors
            .field_errors()
            .into_iter()
            .flat_map(|(_, field_errors)| field_errors.iter())
            .filter_map(|error| error.message.as_ref().map(|message| message.to_string()))
            .next()
            .unwrap_or_else(|| "Invalid request payload".to_string());
        ApiError::Validation(message)
    })
}

pub(crate) fn validate_password_len(password: &str) -> Result<(), ApiError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )))
    }
}

pub(crate) fn parse_date_field(value: &str, field: &str) -> Result<Date, ApiError> {
    core::time::parse_date(value.trim())
        .map_err(|_| ApiError::Validation(format!("Invalid {field}, expected YYYY-MM-DD")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_length_boundary() {
        assert!(validate_password_len("12345678").is_ok());
        assert!(validate_password_len("1234567").is_err());
    }

    #[test]
    fn parse_date_field_reports_field_name() {
        let err = parse_date_field("not-a-date", "start date").unwrap_err();
        assert!(err.message().contains("start date"));
    }
}

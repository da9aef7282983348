//! Request payload checks shared by the resource routers.

use super::response::ApiError;

/// Rejects empty or whitespace-only values for a required text field.
pub fn require_non_empty(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{field} is required")));
    }
    Ok(())
}

pub fn validate_age_bounds(min_age: i32, max_age: i32) -> Result<(), ApiError> {
    if min_age < 0 || max_age < 0 {
        return Err(ApiError::bad_request("Ages must not be negative"));
    }
    if min_age > max_age {
        return Err(ApiError::bad_request("min_age must not exceed max_age"));
    }
    Ok(())
}

/// Accepts wall-clock times in "HH:MM" form.
pub fn validate_time(value: &str, field: &str) -> Result<(), ApiError> {
    let valid = match value.split_once(':') {
        Some((h, m)) => {
            h.len() == 2
                && m.len() == 2
                && h.parse::<u32>().is_ok_and(|h| h < 24)
                && m.parse::<u32>().is_ok_and(|m| m < 60)
        }
        None => false,
    };

    if !valid {
        return Err(ApiError::bad_request(format!(
            "{field} must use HH:MM format"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("Eagles", "name").is_ok());
        assert!(require_non_empty("", "name").is_err());
        assert!(require_non_empty("   ", "name").is_err());
    }

    #[test]
    fn test_age_bounds() {
        assert!(validate_age_bounds(8, 10).is_ok());
        assert!(validate_age_bounds(10, 10).is_ok());
        assert!(validate_age_bounds(11, 10).is_err());
        assert!(validate_age_bounds(-1, 10).is_err());
    }

    #[test]
    fn test_time_format() {
        assert!(validate_time("09:30", "start_time").is_ok());
        assert!(validate_time("23:59", "start_time").is_ok());
        assert!(validate_time("24:00", "start_time").is_err());
        assert!(validate_time("9:30", "start_time").is_err());
        assert!(validate_time("morning", "start_time").is_err());
    }
}

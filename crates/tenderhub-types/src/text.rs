//! length limits for free-text fields.
//!
//! limits are counted in characters, not bytes, so cyrillic names get the
//! same budget as ascii ones.

use crate::Error;

/// maximum length of a tender or bid name.
pub const MAX_NAME_LEN: usize = 100;

/// maximum length of a tender or bid description.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// maximum length of a review left on a bid.
pub const MAX_REVIEW_LEN: usize = 1000;

/// check a required text field: non-empty and at most `max` characters.
pub fn check_required(field: &'static str, value: &str, max: usize) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::EmptyField { field });
    }
    check_max_len(field, value, max)
}

/// check an optional text field: at most `max` characters, empty allowed.
pub fn check_max_len(field: &'static str, value: &str, max: usize) -> Result<(), Error> {
    if value.chars().count() > max {
        return Err(Error::FieldTooLong { field, max });
    }
    Ok(())
}

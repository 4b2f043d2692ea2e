//! Task time-window rules.
//!
//! A configuration (task) books a robot, and optionally a piece of
//! equipment, over `[start_date, end_date]`. Two windows overlap when
//! `a.start <= b.end AND a.end >= b.start`; that rule lives in the
//! availability queries. This module only checks window shape.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Validate that a booking window is non-empty.
pub fn validate_window(start: Timestamp, end: Timestamp) -> Result<(), CoreError> {
    if end <= start {
        return Err(CoreError::Validation(format!(
            "end_date ({end}) must be after start_date ({start})"
        )));
    }
    Ok(())
}

/// Validate a partially updated window against the stored one.
///
/// Either bound may be absent from the update; the missing side is taken
/// from the current record before checking.
pub fn validate_window_update(
    current_start: Timestamp,
    current_end: Timestamp,
    new_start: Option<Timestamp>,
    new_end: Option<Timestamp>,
) -> Result<(), CoreError> {
    validate_window(
        new_start.unwrap_or(current_start),
        new_end.unwrap_or(current_end),
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(hour: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 8, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn window_must_be_forward() {
        assert!(validate_window(at(8), at(10)).is_ok());
        assert_matches!(validate_window(at(10), at(8)), Err(CoreError::Validation(_)));
        assert_matches!(validate_window(at(8), at(8)), Err(CoreError::Validation(_)));
    }

    #[test]
    fn update_merges_with_current_bounds() {
        assert!(validate_window_update(at(8), at(10), None, Some(at(12))).is_ok());
        assert_matches!(
            validate_window_update(at(8), at(10), Some(at(11)), None),
            Err(CoreError::Validation(_))
        );
    }
}

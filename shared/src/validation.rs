use validator::ValidationError;

use crate::constants::{MAX_SEGMENTS, MAX_LABEL_LENGTH, MAX_TEAM_NAME_LENGTH};
use crate::profanity::ProfanityFilter;

/// Storage-layer precondition: a configuration is a non-empty list of
/// non-blank labels, none overlong, and not more than the wheel can draw.
pub fn validate_segment_labels(names: &[String]) -> Result<(), ValidationError> {
    if names.is_empty() {
        return Err(ValidationError::new("empty_name_list"));
    }
    if names.len() > MAX_SEGMENTS {
        return Err(ValidationError::new("too_many_names"));
    }
    for name in names {
        if name.trim().is_empty() {
            return Err(ValidationError::new("blank_name"));
        }
        if name.chars().count() > MAX_LABEL_LENGTH {
            return Err(ValidationError::new("name_too_long"));
        }
    }
    Ok(())
}

/// Team names end up in public share slugs, so they get the profanity
/// screen on top of the length check.
pub fn validate_team_name(team_name: &str) -> Result<(), ValidationError> {
    if team_name.trim().is_empty() {
        return Err(ValidationError::new("blank_team_name"));
    }
    if team_name.chars().count() > MAX_TEAM_NAME_LENGTH {
        return Err(ValidationError::new("team_name_too_long"));
    }
    if ProfanityFilter::contains_profanity(team_name) {
        return Err(ValidationError::new("inappropriate_team_name"));
    }
    Ok(())
}

pub fn validate_power(power: f64) -> Result<(), ValidationError> {
    if !power.is_finite() || !(0.0..=1.0).contains(&power) {
        return Err(ValidationError::new("power_out_of_range"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_list_fails_fast() {
        assert!(validate_segment_labels(&[]).is_err());
    }

    #[test]
    fn blank_and_overlong_labels_are_rejected() {
        assert!(validate_segment_labels(&names(&["Ada", "   "])).is_err());
        assert!(validate_segment_labels(&["x".repeat(MAX_LABEL_LENGTH + 1)]).is_err());
        assert!(validate_segment_labels(&names(&["Ada", "Grace", "RESPIN"])).is_ok());
    }

    #[test]
    fn segment_ceiling_is_enforced() {
        let too_many: Vec<String> = (0..=MAX_SEGMENTS).map(|i| format!("n{}", i)).collect();
        assert!(validate_segment_labels(&too_many).is_err());
    }

    #[test]
    fn power_bounds() {
        assert!(validate_power(0.0).is_ok());
        assert!(validate_power(1.0).is_ok());
        assert!(validate_power(1.01).is_err());
        assert!(validate_power(-0.5).is_err());
        assert!(validate_power(f64::NAN).is_err());
    }
}

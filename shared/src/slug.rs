use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use validator::ValidationError;

pub const SLUG_MIN_LENGTH: usize = 5;
pub const SLUG_MAX_LENGTH: usize = 60;
const SUFFIX_LENGTH: usize = 4;
const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const FALLBACK_BASE: &str = "wheel";

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap());

/// Builds a sharable slug from an optional team name plus a random
/// four-character suffix, e.g. "design-standup-x4kq".
pub fn generate_slug<R: Rng + ?Sized>(team_name: Option<&str>, rng: &mut R) -> String {
    let base = team_name.map(slugify).filter(|s| !s.is_empty());
    let mut base = base.unwrap_or_else(|| FALLBACK_BASE.to_string());
    base.truncate(SLUG_MAX_LENGTH - SUFFIX_LENGTH - 1);
    let base = base.trim_end_matches('-');

    let suffix: String = (0..SUFFIX_LENGTH)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect();

    format!("{}-{}", base, suffix)
}

/// Lowercases and collapses every non-alphanumeric run into a single hyphen.
fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.len() < SLUG_MIN_LENGTH || slug.len() > SLUG_MAX_LENGTH {
        return Err(ValidationError::new("invalid_slug_length"));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(ValidationError::new("invalid_slug_format"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_slugs_validate() {
        let mut rng = StdRng::seed_from_u64(1);
        for team in [
            None,
            Some("Design Standup"),
            Some("  !!  "),
            Some("ÜBER lange Namen mit   vielen   Zeichen und noch mehr dahinter 1234567890"),
        ] {
            let slug = generate_slug(team, &mut rng);
            assert!(validate_slug(&slug).is_ok(), "bad slug {:?}", slug);
            assert!(slug.len() >= SLUG_MIN_LENGTH && slug.len() <= SLUG_MAX_LENGTH);
        }
    }

    #[test]
    fn slug_carries_team_name() {
        let mut rng = StdRng::seed_from_u64(2);
        let slug = generate_slug(Some("Team Rocket!"), &mut rng);
        assert!(slug.starts_with("team-rocket-"));
        assert_eq!(slug.len(), "team-rocket-".len() + 4);
    }

    #[test]
    fn suffix_varies_between_draws() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = generate_slug(Some("retro"), &mut rng);
        let b = generate_slug(Some("retro"), &mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn validate_rejects_bad_shapes() {
        assert!(validate_slug("abcd").is_err()); // too short
        assert!(validate_slug(&"a".repeat(61)).is_err());
        assert!(validate_slug("Has-Upper").is_err());
        assert!(validate_slug("double--hyphen").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("trailing-").is_err());
        assert!(validate_slug("ok-slug-1").is_ok());
    }
}

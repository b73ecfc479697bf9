//! Pattern-based string generator.
//!
//! Supports placeholders:
//! - `{index}` - index of the instance within its batch
//! - `{uuid}` - random UUID
//! - `{rand:N}` - random N-digit number

use super::uuid::random_uuid;
use forge_core::Value;
use rand::Rng;

/// Generate a string based on a pattern with placeholders.
pub fn generate_pattern<R: Rng>(pattern: &str, rng: &mut R, index: u64) -> Value {
    let mut result = pattern.replace("{index}", &index.to_string());

    while result.contains("{uuid}") {
        result = result.replacen("{uuid}", &random_uuid(rng).to_string(), 1);
    }

    // Placeholders are resolved left to right; an unparsable `{rand:..}`
    // stops substitution and stays in the output verbatim.
    let mut resolved = String::with_capacity(result.len());
    let mut rest = result.as_str();
    while let Some(start) = rest.find("{rand:") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let end = start + len;
        let Ok(digits) = rest[start + 6..end].parse::<usize>() else {
            break;
        };
        resolved.push_str(&rest[..start]);
        resolved.push_str(&generate_random_digits(rng, digits));
        rest = &rest[end + 1..];
    }
    resolved.push_str(rest);

    Value::String(resolved)
}

/// Generate a random number with exactly N digits.
fn generate_random_digits<R: Rng>(rng: &mut R, digits: usize) -> String {
    (0..digits)
        .map(|position| {
            // No leading zero
            let low = if position == 0 { 1 } else { 0 };
            char::from(b'0' + rng.random_range(low..10u8))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_pattern_index() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_pattern("user_{index}@example.com", &mut rng, 123);

        assert_eq!(value, Value::String("user_123@example.com".to_string()));
    }

    #[test]
    fn test_generate_pattern_uuid() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_pattern("id-{uuid}", &mut rng, 0);

        if let Value::String(s) = value {
            assert!(s.starts_with("id-"));
            assert_eq!(s.len(), 3 + 36); // "id-" + UUID
        } else {
            panic!("Expected String value");
        }
    }

    #[test]
    fn test_generate_pattern_random_digits() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_pattern("code-{rand:6}", &mut rng, 0);

        if let Value::String(s) = value {
            assert!(s.starts_with("code-"));
            assert_eq!(s.len(), 5 + 6);
            let random_part = &s[5..];
            assert!(random_part.chars().all(|c| c.is_ascii_digit()));
            assert!(!random_part.starts_with('0'));
        } else {
            panic!("Expected String value");
        }
    }

    #[test]
    fn test_generate_pattern_multiple_placeholders() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_pattern("user_{index}_code_{rand:4}_{rand:2}", &mut rng, 42);

        if let Value::String(s) = value {
            assert!(s.starts_with("user_42_code_"));
            assert_eq!(s.len(), 13 + 4 + 1 + 2);
        } else {
            panic!("Expected String value");
        }
    }

    #[test]
    fn test_invalid_placeholder_kept() {
        let mut rng = StdRng::seed_from_u64(42);
        let value = generate_pattern("x-{rand:abc}", &mut rng, 0);

        assert_eq!(value, Value::String("x-{rand:abc}".to_string()));
    }
}

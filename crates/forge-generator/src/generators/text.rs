//! String value generators.

use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Word;
use fake::Fake;
use forge_core::{Case, Value};
use rand::seq::IndexedRandom;
use rand::Rng;

/// Generate a random string with a length in `min_length..=max_length`.
///
/// Letters are drawn from `A-Z` in the requested case unless a charset is
/// given, in which case characters come from the charset unchanged.
pub fn generate_text<R: Rng>(
    rng: &mut R,
    min_length: usize,
    max_length: usize,
    case: Case,
    charset: Option<&str>,
) -> Value {
    let length = if min_length >= max_length {
        max_length
    } else {
        rng.random_range(min_length..=max_length)
    };

    let text: String = match charset {
        Some(charset) => {
            let chars: Vec<char> = charset.chars().collect();
            (0..length)
                .filter_map(|_| chars.choose(rng).copied())
                .collect()
        }
        None => (0..length).map(|_| random_letter(rng, case)).collect(),
    };

    Value::String(text)
}

fn random_letter<R: Rng>(rng: &mut R, case: Case) -> char {
    let letter = char::from(b'a' + rng.random_range(0..26u8));
    let upper = match case {
        Case::Upper => true,
        Case::Lower => false,
        Case::Mixed => rng.random_bool(0.5),
    };
    if upper {
        letter.to_ascii_uppercase()
    } else {
        letter
    }
}

/// Generate a single lorem ipsum word.
pub fn generate_word<R: Rng>(rng: &mut R) -> Value {
    let word: String = Word().fake_with_rng(rng);
    Value::String(word)
}

/// Generate an email address on a reserved example domain.
pub fn generate_email<R: Rng>(rng: &mut R) -> Value {
    let email: String = SafeEmail().fake_with_rng(rng);
    Value::String(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn text(value: Value) -> String {
        match value {
            Value::String(s) => s,
            other => panic!("Expected String value, got {other:?}"),
        }
    }

    #[test]
    fn test_length_bounds() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let s = text(generate_text(&mut rng, 2, 6, Case::Upper, None));
            assert!((2..=6).contains(&s.len()), "{s}");
        }
    }

    #[test]
    fn test_exact_and_zero_length() {
        let mut rng = StdRng::seed_from_u64(42);

        assert_eq!(text(generate_text(&mut rng, 15, 15, Case::Upper, None)).len(), 15);
        assert_eq!(text(generate_text(&mut rng, 0, 0, Case::Upper, None)), "");
    }

    #[test]
    fn test_case() {
        let mut rng = StdRng::seed_from_u64(42);

        let upper = text(generate_text(&mut rng, 20, 20, Case::Upper, None));
        assert!(upper.chars().all(|c| c.is_ascii_uppercase()));

        let lower = text(generate_text(&mut rng, 20, 20, Case::Lower, None));
        assert!(lower.chars().all(|c| c.is_ascii_lowercase()));

        let mixed = text(generate_text(&mut rng, 200, 200, Case::Mixed, None));
        assert!(mixed.chars().any(|c| c.is_ascii_uppercase()));
        assert!(mixed.chars().any(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_charset() {
        let mut rng = StdRng::seed_from_u64(42);

        let digits = text(generate_text(&mut rng, 30, 30, Case::Upper, Some("0123456789")));
        assert_eq!(digits.len(), 30);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_email_shape() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let email = text(generate_email(&mut rng));
            assert!(email.contains('@'), "{email}");
        }
    }

    #[test]
    fn test_word_is_not_empty() {
        let mut rng = StdRng::seed_from_u64(42);
        let word = text(generate_word(&mut rng));
        assert!(!word.is_empty());
        assert!(!word.contains(' '));
    }
}

//! Numeric value generators.

use forge_core::Value;
use rand::Rng;

/// Generate a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng>(rng: &mut R, min: i64, max: i64) -> Value {
    if min >= max {
        return Value::Int64(min);
    }
    Value::Int64(rng.random_range(min..=max))
}

/// Generate a random float in the given range (inclusive).
///
/// Interpolates between the bounds so ranges wider than `f64::MAX` do not
/// overflow.
pub fn generate_float_range<R: Rng>(rng: &mut R, min: f64, max: f64) -> Value {
    if min >= max {
        return Value::Float64(min);
    }
    let t: f64 = rng.random();
    let value = min * (1.0 - t) + max * t;
    Value::Float64(value.clamp(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_int_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let value = generate_int_range(&mut rng, 10, 20);
            if let Value::Int64(v) = value {
                assert!((10..=20).contains(&v));
            } else {
                panic!("Expected Int64 value");
            }
        }
    }

    #[test]
    fn test_generate_float_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let value = generate_float_range(&mut rng, 0.0, 100.0);
            if let Value::Float64(v) = value {
                assert!((0.0..=100.0).contains(&v));
            } else {
                panic!("Expected Float64 value");
            }
        }
    }

    #[test]
    fn test_generate_float_full_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let value = generate_float_range(&mut rng, f64::MIN, f64::MAX);
            if let Value::Float64(v) = value {
                assert!(v.is_finite());
            } else {
                panic!("Expected Float64 value");
            }
        }
    }

    #[test]
    fn test_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(42);
        assert_eq!(generate_int_range(&mut rng, 5, 5), Value::Int64(5));
        assert_eq!(generate_float_range(&mut rng, 2.5, 2.5), Value::Float64(2.5));
    }
}

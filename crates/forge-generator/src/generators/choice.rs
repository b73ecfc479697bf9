//! Selection from an enumerated set of values.

use forge_core::Value;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Pick one of `values` uniformly; `Null` when there is nothing to pick.
pub fn generate_one_of<R: Rng>(rng: &mut R, values: &[Value]) -> Value {
    values.choose(rng).cloned().unwrap_or(Value::Null)
}

//! Collection size generator.

use rand::Rng;

/// Draw the number of elements for a collection (inclusive bounds).
pub fn draw_size<R: Rng>(rng: &mut R, min_size: usize, max_size: usize) -> usize {
    if min_size >= max_size {
        return max_size;
    }
    rng.random_range(min_size..=max_size)
}

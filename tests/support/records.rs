use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Linearly separable records: label 1 when feature 0 outweighs feature 1.
///
/// Every record also carries a bias feature at index 2 and one noise feature
/// drawn from `3..n_feature`.
pub fn separable_records(count: usize, n_feature: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let a: f64 = rng.random_range(0.0..1.0);
            let b: f64 = rng.random_range(0.0..1.0);
            let noise_index = rng.random_range(3..n_feature);
            let label = if a > b { 1 } else { 0 };
            format!("{label} 0:{a} 1:{b} 2:1 {noise_index}:0.1")
        })
        .collect()
}

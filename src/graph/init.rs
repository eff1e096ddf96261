//! Parameter initialization
//!
//! Glorot-uniform initialization with a fixed seed so repeated conversions of
//! the same source model produce byte-identical artifacts. Weight fidelity is
//! out of scope: these parameters are placeholders that satisfy the target
//! format, not the trained MobileFaceNet weights.

use ndarray::{ArrayD, IxDyn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const INIT_SEED: u64 = 0x6d66_6e65; // "mfne"

/// Seeded RNG used for all parameter initialization.
pub(crate) struct InitRng(StdRng);

impl InitRng {
    pub(crate) fn fixed() -> Self {
        InitRng(StdRng::seed_from_u64(INIT_SEED))
    }
}

/// Glorot-uniform sample: U(-limit, limit) with limit = sqrt(6 / (fan_in + fan_out)).
pub(crate) fn glorot_uniform(
    rng: &mut InitRng,
    shape: &[usize],
    fan_in: usize,
    fan_out: usize,
) -> ArrayD<f32> {
    let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
    let len: usize = shape.iter().product();
    let data: Vec<f32> = (0..len).map(|_| rng.0.gen_range(-limit..limit)).collect();
    ArrayD::from_shape_vec(IxDyn(shape), data)
        .unwrap_or_else(|_| ArrayD::zeros(IxDyn(shape)))
}

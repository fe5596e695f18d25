//! Laplace noise for ε-differential privacy.
//!
//! For a count with L1 sensitivity Δ, adding `Lap(0, Δ/ε)` noise gives
//! ε-differential privacy.  Samples are drawn by inverse CDF:
//!
//! ```text
//! u ~ Uniform(-1/2, 1/2)
//! x = -b * sign(u) * ln(1 - 2|u|)
//! ```

use rand::Rng;
use rand::distributions::Open01;

/// One draw from `Laplace(0, scale)`.  A zero scale yields zero noise.
pub fn laplace_noise<R: Rng + ?Sized>(scale: f64, rng: &mut R) -> f64 {
    if scale == 0.0 {
        return 0.0;
    }
    let open: f64 = rng.sample(Open01);
    let u = open - 0.5;
    -scale * u.signum() * (1.0 - 2.0 * u.abs()).ln()
}

/// `count + Lap(0, sensitivity / epsilon)`.
#[inline]
pub fn add_laplace_noise<R: Rng + ?Sized>(
    count:       f64,
    epsilon:     f64,
    sensitivity: f64,
    rng:         &mut R,
) -> f64 {
    count + laplace_noise(sensitivity / epsilon, rng)
}

/// Variance of the noise added by [`add_laplace_noise`]: `2 (Δ/ε)²`.
#[inline]
pub fn laplace_variance(epsilon: f64, sensitivity: f64) -> f64 {
    let b = sensitivity / epsilon;
    2.0 * b * b
}

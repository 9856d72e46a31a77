use rand::Rng;

use crate::error::{Error, Result};

use super::distribution::Distribution;

/// Below this temperature the sampler decodes greedily.
pub const GREEDY_TEMPERATURE: f64 = 0.05;

/// Temperature-controlled categorical sampler.
///
/// # Behavior
/// - `temperature < GREEDY_TEMPERATURE`: arg-max (lowest index on ties),
///   which avoids raising probabilities to huge powers
/// - `temperature == 1.0`: the distribution is sampled as is
/// - otherwise every probability is raised to `1 / temperature` and the
///   weights are re-normalized (sharper below 1, flatter above 1)
///
/// The draw itself is a binary search over the cumulative weights, so the
/// result only depends on the single `f64` taken from the RNG.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sampler {
	temperature: f64,
}

impl Sampler {
	/// # Errors
	/// Returns `InvalidParameter` if `temperature` is not a finite positive number.
	pub fn new(temperature: f64) -> Result<Self> {
		check_temperature(temperature)?;
		Ok(Self { temperature })
	}

	pub fn is_greedy(&self) -> bool {
		self.temperature < GREEDY_TEMPERATURE
	}

	/// Applies the temperature to `distribution` and re-normalizes.
	///
	/// Returns `None` when the scaled weights underflow to zero, in which
	/// case only greedy decoding is meaningful.
	pub fn scale(&self, distribution: &Distribution) -> Option<Vec<f64>> {
		let probabilities = distribution.probabilities();
		if self.temperature == 1.0 {
			return Some(probabilities.to_vec());
		}

		let exponent = 1.0 / self.temperature;
		let mut weights: Vec<f64> = probabilities.iter().map(|p| p.powf(exponent)).collect();
		let total: f64 = weights.iter().sum();
		if !total.is_finite() || total <= 0.0 {
			return None;
		}
		for w in weights.iter_mut() {
			*w /= total;
		}
		Some(weights)
	}

	/// Draws one token index from `distribution`.
	///
	/// # Errors
	/// Returns `InvalidParameter` if the distribution is empty.
	pub fn sample<R: Rng + ?Sized>(&self, distribution: &Distribution, rng: &mut R) -> Result<u32> {
		let Some(greedy) = distribution.argmax() else {
			return Err(Error::InvalidParameter("cannot sample from an empty distribution".to_owned()));
		};
		if self.is_greedy() {
			return Ok(greedy);
		}

		match self.scale(distribution) {
			Some(weights) => Ok(draw(&weights, rng)),
			None => Ok(greedy),
		}
	}
}

pub(crate) fn check_temperature(temperature: f64) -> Result<()> {
	if !temperature.is_finite() || temperature <= 0.0 {
		return Err(Error::InvalidParameter(format!("temperature must be > 0, got {temperature}")));
	}
	Ok(())
}

/// Weighted draw over non-negative `weights` (at least one positive).
///
/// Builds the prefix sums and binary-searches the first bucket whose
/// cumulative weight exceeds a uniform point in `[0, total)`.
fn draw<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> u32 {
	let mut cumulative = Vec::with_capacity(weights.len());
	let mut total = 0.0;
	for w in weights {
		total += w;
		cumulative.push(total);
	}

	let point = rng.random::<f64>() * total;
	let index = cumulative.partition_point(|c| *c <= point);
	// Rounding can push the point onto the last prefix sum
	index.min(weights.len() - 1) as u32
}

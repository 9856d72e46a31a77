use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::multigram_model::check_alpha;
use super::sampler::check_temperature;

/// Longest continuation a single request may ask for.
pub const MAX_LENGTH: usize = 100;

/// What to do with a seed phrase whose tokens are all missing from the
/// vocabulary (an empty seed included).
///
/// # Variants
/// - `Substitute`: start from one uniformly drawn vocabulary token instead.
///   The seed is replaced, so the output starts with that single token.
/// - `Reject`: fail with `Error::UnseenSeed`.
///
/// A seed with at least one known token is always used as given.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnseenSeedPolicy {
	#[default]
	Substitute,
	Reject,
}

/// Parameters of one generation request.
///
/// `GenerationInput` only holds values that passed validation; every
/// setter checks its argument and leaves the input untouched on error.
///
/// # Invariants
/// - `length <= MAX_LENGTH`
/// - `temperature` and `alpha` are finite and strictly positive
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationInput {
	/// Number of tokens appended after the seed.
	length: usize,

	/// Sampling temperature (see `Sampler`).
	temperature: f64,

	/// Additive smoothing constant.
	alpha: f64,

	/// Fallback for a seed made only of unknown tokens.
	pub unseen_seed: UnseenSeedPolicy,
}

impl GenerationInput {
	/// Creates a validated input.
	///
	/// # Errors
	/// Returns `InvalidParameter` if any value is out of range.
	pub fn new(length: usize, temperature: f64, alpha: f64) -> Result<Self> {
		let mut input = Self::default();
		input.set_length(length)?;
		input.set_temperature(temperature)?;
		input.set_alpha(alpha)?;
		Ok(input)
	}

	pub fn length(&self) -> usize {
		self.length
	}

	pub fn temperature(&self) -> f64 {
		self.temperature
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Sets the number of generated tokens (0..=MAX_LENGTH).
	///
	/// A length of 0 returns the normalized seed unchanged.
	pub fn set_length(&mut self, length: usize) -> Result<()> {
		if length > MAX_LENGTH {
			return Err(Error::InvalidParameter(format!("length must be at most {MAX_LENGTH}, got {length}")));
		}
		self.length = length;
		Ok(())
	}

	/// Sets the sampling temperature (> 0).
	pub fn set_temperature(&mut self, temperature: f64) -> Result<()> {
		check_temperature(temperature)?;
		self.temperature = temperature;
		Ok(())
	}

	/// Sets the smoothing constant (> 0).
	pub fn set_alpha(&mut self, alpha: f64) -> Result<()> {
		check_alpha(alpha)?;
		self.alpha = alpha;
		Ok(())
	}

	/// Builder-style variant of the policy field.
	pub fn with_unseen_seed(mut self, policy: UnseenSeedPolicy) -> Self {
		self.unseen_seed = policy;
		self
	}
}

impl Default for GenerationInput {
	/// 20 tokens, temperature 1, alpha 0.01, substitution of unseen seeds.
	fn default() -> Self {
		Self {
			length: 20,
			temperature: 1.0,
			alpha: 0.01,
			unseen_seed: UnseenSeedPolicy::Substitute,
		}
	}
}

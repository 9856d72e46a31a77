use crate::error::{Error, Result};

use super::distribution::Distribution;
use super::ngram_model::NGramModel;

/// Largest n-gram order accepted by the builder.
pub const MAX_ORDER: usize = 8;

/// The multi-order transition model and its probability estimator.
///
/// This struct manages:
/// - `ngrams`: one `NGramModel` per order, `ngrams[n - 1]` holding order `n`
/// - `vocab_size`: the size of the distributions it produces
///
/// The model is built once from the encoded corpus and is read-only
/// afterwards, so it can be shared freely between threads.
#[derive(Clone, Debug)]
pub struct MultiGramModel {
	ngrams: Vec<NGramModel>,
	vocab_size: usize,
}

impl MultiGramModel {
	/// Builds every order from 1 to `max_order` over the encoded corpus.
	///
	/// # Errors
	/// Returns `InvalidParameter` if `max_order` is outside `[1, MAX_ORDER]`.
	///
	/// # Notes
	/// - Memory and time grow with `max_order × corpus length`; rare
	///   histories are never pruned.
	pub fn build(corpus: &[u32], vocab_size: usize, max_order: usize) -> Result<Self> {
		if !(1..=MAX_ORDER).contains(&max_order) {
			return Err(Error::InvalidParameter(format!(
				"max_order must be between 1 and {MAX_ORDER}, got {max_order}"
			)));
		}

		let ngrams = (1..=max_order)
			.map(|n| NGramModel::build(n, corpus))
			.collect::<Result<Vec<_>>>()?;

		Ok(Self { ngrams, vocab_size })
	}

	pub fn max_order(&self) -> usize {
		self.ngrams.len()
	}

	/// Transition table of order `n`.
	pub fn ngram(&self, n: usize) -> Option<&NGramModel> {
		n.checked_sub(1).and_then(|i| self.ngrams.get(i))
	}

	/// Estimates the next-token distribution after `history`.
	///
	/// `history` holds vocabulary indices, `None` standing for a token
	/// missing from the vocabulary. It may be longer than `max_order`:
	/// only its tail is looked at.
	///
	/// # Behavior
	/// - Backoff: for `n` from `min(history.len(), max_order)` down to 1, the
	///   last `n` tokens are looked up in the order-`n` table. The first
	///   match wins; orders are never blended ("stupid backoff").
	/// - On a match, every token starts at `alpha` and receives its
	///   observed count, then the vector is normalized.
	/// - Without any match, the distribution is uniform.
	///
	/// # Errors
	/// Returns `InvalidParameter` if `alpha` is not a finite positive number.
	pub fn estimate(&self, history: &[Option<u32>], alpha: f64) -> Result<Distribution> {
		check_alpha(alpha)?;

		let longest = history.len().min(self.max_order());
		for n in (1..=longest).rev() {
			let window = &history[history.len() - n..];
			// A key with an unknown token cannot exist in the table
			let Some(key) = window.iter().copied().collect::<Option<Vec<u32>>>() else {
				continue;
			};
			let Some(state) = self.ngrams[n - 1].state(&key) else {
				continue;
			};

			let mut probabilities = vec![alpha; self.vocab_size];
			for (next, count) in state.transitions() {
				probabilities[next as usize] += count as f64;
			}
			let total = alpha * self.vocab_size as f64 + state.total() as f64;
			for p in probabilities.iter_mut() {
				*p /= total;
			}
			return Ok(Distribution::new(probabilities, Some(n)));
		}

		Ok(Distribution::uniform(self.vocab_size))
	}
}

pub(crate) fn check_alpha(alpha: f64) -> Result<()> {
	if !alpha.is_finite() || alpha <= 0.0 {
		return Err(Error::InvalidParameter(format!("alpha must be > 0, got {alpha}")));
	}
	Ok(())
}

use std::collections::HashMap;

use super::state::State;
use crate::error::{Error, Result};

/// Transition table of a single order `n`.
///
/// The `NGramModel` stores one `State` per history of exactly `n` tokens
/// and counts which token followed it in the corpus.
///
/// # Responsibilities
/// - Slide a window of `n + 1` tokens over the corpus and count transitions
/// - Look up the state of a history
///
/// # Invariants
/// - `n` is always >= 1
/// - Every key has exactly `n` token indices
/// - All state transitions have occurrence counts >= 1
#[derive(Clone, Debug)]
pub struct NGramModel {
	/// The order of the model (number of history tokens)
	n: usize,

	/// Mapping from a history (n vocabulary indices) to its state
	states: HashMap<Box<[u32]>, State>,
}

impl NGramModel {
	/// Creates a new, empty model of order `n`.
	///
	/// # Errors
	/// Returns an error if `n < 1`.
	pub fn new(n: usize) -> Result<Self> {
		if n < 1 {
			return Err(Error::InvalidParameter("n must be >= 1".to_owned()));
		}
		Ok(Self { n, states: HashMap::new() })
	}

	/// Builds the order-`n` table of an encoded corpus.
	///
	/// The last `n` tokens never act as a history since nothing follows them.
	pub fn build(n: usize, corpus: &[u32]) -> Result<Self> {
		let mut model = Self::new(n)?;
		for window in corpus.windows(n + 1) {
			model.add_transition(&window[..n], window[n]);
		}
		Ok(model)
	}

	/// Records one occurrence of `next` after `history`.
	///
	/// Histories whose length differs from `n` are ignored; only `build`
	/// feeds this, always with `n`-token windows.
	pub(crate) fn add_transition(&mut self, history: &[u32], next: u32) {
		if history.len() != self.n {
			return;
		}
		match self.states.get_mut(history) {
			Some(state) => state.add_transition(next),
			None => {
				let mut state = State::new();
				state.add_transition(next);
				self.states.insert(history.into(), state);
			}
		}
	}

	/// Returns the state of `history`, if it was observed.
	pub fn state(&self, history: &[u32]) -> Option<&State> {
		self.states.get(history)
	}

	/// Order of the model.
	pub fn order(&self) -> usize {
		self.n
	}

	/// Number of distinct histories.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}
}

use std::collections::HashMap;

/// Represents a state in an n-gram model.
///
/// A `State` corresponds to one history (the key under which it is stored
/// in its `NGramModel`) and records every token observed right after it.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Invariants
/// - Each transition occurrence count is strictly positive
/// - `total` is the sum of all occurrence counts
#[derive(Clone, Debug, Default)]
pub struct State {
	/// Outgoing transitions indexed by the next token's vocabulary index.
	/// Example: { 12 => 42, 7 => 3 }
	transitions: HashMap<u32, usize>,
	total: usize,
}

impl State {
	/// Creates a new empty state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records an occurrence of a transition toward `next`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is created with an initial count of 1.
	pub fn add_transition(&mut self, next: u32) {
		*self.transitions.entry(next).or_insert(0) += 1;
		self.total += 1;
	}

	/// Number of times `next` followed this history.
	pub fn count(&self, next: u32) -> usize {
		self.transitions.get(&next).copied().unwrap_or(0)
	}

	/// Sum of all transition counts.
	pub fn total(&self) -> usize {
		self.total
	}

	/// Number of distinct next tokens.
	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Iterates over `(next token index, count)` pairs, in no particular order.
	pub fn transitions(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
		self.transitions.iter().map(|(next, count)| (*next, *count))
	}
}

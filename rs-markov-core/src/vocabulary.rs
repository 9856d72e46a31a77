use std::collections::HashMap;

/// Sorted set of unique tokens with dense `u32` indices.
///
/// # Invariants
/// - `tokens` is sorted lexicographically and holds no duplicate
/// - `indices[tokens[i]] == i` for every `i`
///
/// Sorting makes the indices stable across runs for the same corpus.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
	tokens: Vec<String>,
	indices: HashMap<String, u32>,
}

impl Vocabulary {
	/// Builds the vocabulary of a token sequence.
	pub fn build<S: AsRef<str>>(tokens: &[S]) -> Self {
		let mut sorted: Vec<String> = tokens.iter().map(|t| t.as_ref().to_owned()).collect();
		sorted.sort_unstable();
		sorted.dedup();

		let indices = sorted
			.iter()
			.enumerate()
			.map(|(i, token)| (token.clone(), i as u32))
			.collect();

		Self { tokens: sorted, indices }
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	/// Index of `token`, or `None` if it was never observed.
	pub fn index_of(&self, token: &str) -> Option<u32> {
		self.indices.get(token).copied()
	}

	/// Token stored at `index`.
	pub fn token(&self, index: u32) -> Option<&str> {
		self.tokens.get(index as usize).map(String::as_str)
	}

	pub fn contains(&self, token: &str) -> bool {
		self.indices.contains_key(token)
	}

	/// All tokens, in index order.
	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	/// Maps each token to its index, keeping unknown tokens as `None`.
	pub fn encode<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<Option<u32>> {
		tokens.iter().map(|t| self.index_of(t.as_ref())).collect()
	}
}

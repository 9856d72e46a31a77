/// Probability distribution over the vocabulary, produced for one
/// generation step.
///
/// # Invariants
/// - One non-negative probability per vocabulary token, in index order
/// - Probabilities sum to 1 (up to floating-point error)
#[derive(Clone, Debug, PartialEq)]
pub struct Distribution {
	probabilities: Vec<f64>,
	/// Order of the history that matched, `None` for the uniform fallback.
	order: Option<usize>,
}

impl Distribution {
	/// Wraps already normalized probabilities.
	pub(crate) fn new(probabilities: Vec<f64>, order: Option<usize>) -> Self {
		Self { probabilities, order }
	}

	/// Uniform distribution over `size` tokens.
	pub fn uniform(size: usize) -> Self {
		let p = if size == 0 { 0.0 } else { 1.0 / size as f64 };
		Self { probabilities: vec![p; size], order: None }
	}

	pub fn probabilities(&self) -> &[f64] {
		&self.probabilities
	}

	/// Probability of the token at `index` (0 if out of range).
	pub fn probability(&self, index: u32) -> f64 {
		self.probabilities.get(index as usize).copied().unwrap_or(0.0)
	}

	/// Order used by the backoff search, `None` if no history matched.
	pub fn matched_order(&self) -> Option<usize> {
		self.order
	}

	pub fn len(&self) -> usize {
		self.probabilities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.probabilities.is_empty()
	}

	/// Index of the most probable token, lowest index on ties.
	pub fn argmax(&self) -> Option<u32> {
		argmax(&self.probabilities)
	}

	/// The `n` most probable `(index, probability)` pairs, descending.
	///
	/// The sort is stable over index order, so equal probabilities keep
	/// ascending vocabulary order.
	pub fn top(&self, n: usize) -> Vec<(u32, f64)> {
		let mut ranked: Vec<(u32, f64)> = self
			.probabilities
			.iter()
			.enumerate()
			.map(|(i, p)| (i as u32, *p))
			.collect();
		ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
		ranked.truncate(n);
		ranked
	}
}

fn argmax(weights: &[f64]) -> Option<u32> {
	let mut best: Option<(usize, f64)> = None;
	for (i, w) in weights.iter().enumerate() {
		match best {
			Some((_, b)) if *w <= b => {}
			_ => best = Some((i, *w)),
		}
	}
	best.map(|(i, _)| i as u32)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_uniform() {
		let d = Distribution::uniform(4);
		assert_eq!(d.probabilities(), &[0.25; 4]);
		assert_eq!(d.matched_order(), None);
	}

	#[test]
	fn test_argmax_ties_pick_lowest_index() {
		let d = Distribution::new(vec![0.1, 0.4, 0.4, 0.1], Some(1));
		assert_eq!(d.argmax(), Some(1));
		assert_eq!(Distribution::uniform(0).argmax(), None);
	}

	#[test]
	fn test_top_descending_with_stable_ties() {
		let d = Distribution::new(vec![0.2, 0.1, 0.5, 0.2], Some(2));
		assert_eq!(d.top(3), vec![(2, 0.5), (0, 0.2), (3, 0.2)]);
		assert_eq!(d.top(10).len(), 4);
	}

	#[test]
	fn test_probability_out_of_range() {
		let d = Distribution::uniform(2);
		assert_eq!(d.probability(1), 0.5);
		assert_eq!(d.probability(9), 0.0);
	}
}

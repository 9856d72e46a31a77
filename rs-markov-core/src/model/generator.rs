use std::path::Path;

use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::{Error, Result};
use crate::io;
use crate::tokenizer::Tokenizer;
use crate::vocabulary::Vocabulary;

use super::distribution::Distribution;
use super::generation_input::{GenerationInput, UnseenSeedPolicy};
use super::multigram_model::MultiGramModel;
use super::sampler::Sampler;

/// One candidate of a top-transitions query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
	pub token: String,
	pub probability: f64,
}

/// Size figures of a loaded model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStats {
	/// Tokens in the corpus after cleaning.
	pub tokens: usize,
	/// Distinct tokens.
	pub vocabulary: usize,
	pub max_order: usize,
	/// Distinct histories per order, `histories[n - 1]` for order `n`.
	pub histories: Vec<usize>,
}

/// High-level word generator over a single corpus.
///
/// # Responsibilities
/// - Tokenize the corpus, build the vocabulary and every transition table
/// - Generate continuations of a seed phrase with temperature sampling
/// - Report the most probable next tokens after a history
///
/// The generator is built once by the host and never mutated afterwards;
/// all request state is local to each call, so a shared reference can
/// serve concurrent requests.
#[derive(Clone, Debug)]
pub struct Generator {
	tokenizer: Tokenizer,
	vocabulary: Vocabulary,
	model: MultiGramModel,
	corpus_len: usize,
}

impl Generator {
	/// Loads and trains a generator from a UTF-8 corpus file.
	///
	/// # Errors
	/// - `CorpusLoad` if the file cannot be read
	/// - any error of [`Generator::from_text`]
	pub fn from_file<P: AsRef<Path>>(filepath: P, config: &ModelConfig) -> Result<Self> {
		config.validate()?;
		let text = io::read_file(&filepath)?;
		info!("read corpus {} ({} bytes)", filepath.as_ref().display(), text.len());
		Self::from_text(&text, config)
	}

	/// Trains a generator from corpus text.
	///
	/// # Behavior
	/// - Drops the first `skip_prefix_lines` lines (the whole text is kept
	///   if it is not longer than that)
	/// - Tokenizes, builds the sorted vocabulary, then orders 1..=max_order
	///
	/// # Errors
	/// - `InvalidParameter` if `max_order` is out of range
	/// - `EmptyCorpus` if no token is left after cleaning
	pub fn from_text(text: &str, config: &ModelConfig) -> Result<Self> {
		config.validate()?;

		let tokenizer = Tokenizer::new(config.keep_punctuation);
		let tokens = tokenizer.tokenize(io::skip_lines(text, config.skip_prefix_lines));
		if tokens.is_empty() {
			return Err(Error::EmptyCorpus);
		}

		let vocabulary = Vocabulary::build(&tokens);
		// Every corpus token is in the vocabulary
		let encoded: Vec<u32> = tokens.iter().filter_map(|t| vocabulary.index_of(t)).collect();
		let model = MultiGramModel::build(&encoded, vocabulary.len(), config.max_order)?;

		let generator = Self {
			tokenizer,
			vocabulary,
			model,
			corpus_len: encoded.len(),
		};

		let stats = generator.stats();
		info!(
			"model ready: {} tokens, {} distinct, order {}, histories per order {:?}",
			stats.tokens, stats.vocabulary, stats.max_order, stats.histories
		);
		Ok(generator)
	}

	pub fn tokenizer(&self) -> &Tokenizer {
		&self.tokenizer
	}

	pub fn vocabulary(&self) -> &Vocabulary {
		&self.vocabulary
	}

	pub fn model(&self) -> &MultiGramModel {
		&self.model
	}

	pub fn stats(&self) -> ModelStats {
		ModelStats {
			tokens: self.corpus_len,
			vocabulary: self.vocabulary.len(),
			max_order: self.model.max_order(),
			histories: (1..=self.model.max_order())
				.map(|n| self.model.ngram(n).map_or(0, |m| m.len()))
				.collect(),
		}
	}

	/// Next-token distribution after `history` (normalized with the corpus tokenizer).
	pub fn estimate(&self, history: &str, alpha: f64) -> Result<Distribution> {
		let tokens = self.tokenizer.tokenize(history);
		self.model.estimate(&self.vocabulary.encode(&tokens), alpha)
	}

	/// Generates `input.length()` tokens after `seed` and returns the seed
	/// words followed by the generated tokens.
	///
	/// # Behavior
	/// - The output starts with the seed split on whitespace and lowercased,
	///   so it always holds `seed.split_whitespace().count() + length` tokens.
	/// - The lookup history is the seed run through the corpus tokenizer
	///   (`"millet, ve"` is looked up as `millet , ve`).
	/// - At each step, the trailing `max_order` tokens feed the estimator,
	///   then the sampler picks the next token, which joins the history.
	/// - If no seed token is known, `input.unseen_seed` decides between
	///   looking up from a random vocabulary token and `Error::UnseenSeed`.
	///   The seed words stay in the output either way.
	///
	/// # Errors
	/// - `UnseenSeed` under `UnseenSeedPolicy::Reject`
	pub fn generate_tokens<R: Rng + ?Sized>(
		&self,
		seed: &str,
		input: &GenerationInput,
		rng: &mut R,
	) -> Result<Vec<String>> {
		let sampler = Sampler::new(input.temperature())?;

		let mut output: Vec<String> = seed.split_whitespace().map(str::to_lowercase).collect();
		let mut history = self.vocabulary.encode(&self.tokenizer.tokenize(seed));

		if history.iter().all(Option::is_none) {
			match input.unseen_seed {
				UnseenSeedPolicy::Reject => return Err(Error::UnseenSeed(seed.to_owned())),
				UnseenSeedPolicy::Substitute => {
					let index = rng.random_range(0..self.vocabulary.len()) as u32;
					warn!(
						"seed '{seed}' has no known token, looking up from '{}'",
						self.vocabulary.tokens()[index as usize]
					);
					history = vec![Some(index)];
				}
			}
		}

		debug!(
			"generating {} tokens after {:?} (temperature {}, alpha {})",
			input.length(),
			output,
			input.temperature(),
			input.alpha()
		);

		let max_order = self.model.max_order();
		output.reserve(input.length());
		for _ in 0..input.length() {
			let start = history.len().saturating_sub(max_order);
			let distribution = self.model.estimate(&history[start..], input.alpha())?;
			let next = sampler.sample(&distribution, rng)?;
			output.push(self.vocabulary.tokens()[next as usize].clone());
			history.push(Some(next));
		}

		Ok(output)
	}

	/// Same as [`Generator::generate_tokens`], joined with single spaces.
	pub fn generate_text<R: Rng + ?Sized>(&self, seed: &str, input: &GenerationInput, rng: &mut R) -> Result<String> {
		Ok(self.generate_tokens(seed, input, rng)?.join(" "))
	}

	/// Generates text with the thread-local RNG.
	pub fn predict(&self, seed: &str, input: &GenerationInput) -> Result<String> {
		self.generate_text(seed, input, &mut rand::rng())
	}

	/// Returns the `top_n` most probable tokens after `history`, descending.
	///
	/// Equal probabilities are listed in vocabulary (alphabetical) order.
	/// Asking for more tokens than the vocabulary holds returns all of them.
	///
	/// # Errors
	/// Returns `InvalidParameter` if `top_n` is 0 or `alpha` is not > 0.
	pub fn top_transitions(&self, history: &str, top_n: usize, alpha: f64) -> Result<Vec<Transition>> {
		let tokens = self.tokenizer.tokenize(history);
		self.top_transitions_for_tokens(&tokens, top_n, alpha)
	}

	/// [`Generator::top_transitions`] over an already split history.
	///
	/// Tokens are still lowercased and cleaned one by one.
	pub fn top_transitions_for_tokens<S: AsRef<str>>(
		&self,
		history: &[S],
		top_n: usize,
		alpha: f64,
	) -> Result<Vec<Transition>> {
		if top_n == 0 {
			return Err(Error::InvalidParameter("top_n must be >= 1".to_owned()));
		}

		let tokens: Vec<String> = history
			.iter()
			.flat_map(|t| self.tokenizer.tokenize(t.as_ref()))
			.collect();
		let distribution = self.model.estimate(&self.vocabulary.encode(&tokens), alpha)?;

		Ok(distribution
			.top(top_n)
			.into_iter()
			.map(|(index, probability)| Transition {
				token: self.vocabulary.tokens()[index as usize].clone(),
				probability,
			})
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	const CORPUS: &str = "millet ve ordu millet ve devlet";

	fn unigram() -> Generator {
		let config = ModelConfig { max_order: 1, ..ModelConfig::default() };
		Generator::from_text(CORPUS, &config).unwrap()
	}

	#[test]
	fn test_stats() {
		let config = ModelConfig { max_order: 3, ..ModelConfig::default() };
		let stats = Generator::from_text(CORPUS, &config).unwrap().stats();
		assert_eq!(stats.tokens, 6);
		assert_eq!(stats.vocabulary, 4);
		assert_eq!(stats.max_order, 3);
		// order 1: millet ve ordu / order 2: (millet ve) (ve ordu) (ordu millet)
		assert_eq!(stats.histories, vec![3, 3, 3]);
	}

	#[test]
	fn test_empty_corpus() {
		let err = Generator::from_text("  ?!  ", &ModelConfig { keep_punctuation: false, ..ModelConfig::default() });
		assert!(matches!(err, Err(Error::EmptyCorpus)));
	}

	#[test]
	fn test_invalid_order() {
		let config = ModelConfig { max_order: 0, ..ModelConfig::default() };
		assert!(matches!(Generator::from_text(CORPUS, &config), Err(Error::InvalidParameter(_))));
	}

	#[test]
	fn test_skip_prefix_lines() {
		let text = "NUTUK\nCilt 1\nmillet ve ordu";
		let config = ModelConfig { skip_prefix_lines: 2, ..ModelConfig::default() };
		let generator = Generator::from_text(text, &config).unwrap();
		assert!(!generator.vocabulary().contains("nutuk"));
		assert_eq!(generator.stats().tokens, 3);
	}

	#[test]
	fn test_zero_length_returns_seed() {
		let input = GenerationInput::new(0, 1.0, 0.001).unwrap();
		let mut rng = StdRng::seed_from_u64(1);
		assert_eq!(unigram().generate_text("Millet", &input, &mut rng).unwrap(), "millet");
	}

	#[test]
	fn test_greedy_generation() {
		let input = GenerationInput::new(3, 0.01, 0.001).unwrap();
		let mut rng = StdRng::seed_from_u64(1);
		// millet -> ve -> (ordu | devlet: tie, lowest index) devlet -> uniform, lowest index devlet
		assert_eq!(
			unigram().generate_text("millet", &input, &mut rng).unwrap(),
			"millet ve devlet devlet"
		);
	}

	#[test]
	fn test_top_transitions_scenario() {
		let top = unigram().top_transitions("millet", 1, 0.001).unwrap();
		assert_eq!(top.len(), 1);
		assert_eq!(top[0].token, "ve");
		assert!(top[0].probability > 0.9);
	}

	#[test]
	fn test_top_transitions_tie_break() {
		let top = unigram().top_transitions("ve", 4, 1.0).unwrap();
		let tokens: Vec<&str> = top.iter().map(|t| t.token.as_str()).collect();
		// ordu and devlet are tied, then the floor in alphabetical order
		assert_eq!(tokens, vec!["devlet", "ordu", "millet", "ve"]);
	}

	#[test]
	fn test_top_transitions_zero() {
		assert!(matches!(unigram().top_transitions("millet", 0, 1.0), Err(Error::InvalidParameter(_))));
	}

	#[test]
	fn test_top_transitions_for_tokens_normalizes() {
		let generator = unigram();
		assert_eq!(
			generator.top_transitions_for_tokens(&["MILLET"], 2, 0.1).unwrap(),
			generator.top_transitions("millet", 2, 0.1).unwrap()
		);
	}
}

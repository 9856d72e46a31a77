/// Punctuation marks kept as standalone tokens when punctuation is enabled.
pub const PUNCTUATION: [char; 5] = ['.', ',', '!', '?', ';'];

/// Word-level tokenizer.
///
/// Lowercases the text, removes every character that is neither a word
/// character (alphanumeric or `_`) nor whitespace, and splits on whitespace.
/// When `keep_punctuation` is set, the marks of [`PUNCTUATION`] survive as
/// their own tokens (`"Millet, ve"` → `["millet", ",", "ve"]`).
///
/// The same tokenizer is used for the corpus, seed phrases and analysed
/// histories, so every lookup sees identically normalized tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tokenizer {
	keep_punctuation: bool,
}

impl Tokenizer {
	pub fn new(keep_punctuation: bool) -> Self {
		Self { keep_punctuation }
	}

	/// Splits `text` into normalized tokens, in reading order.
	pub fn tokenize(&self, text: &str) -> Vec<String> {
		let mut cleaned = String::with_capacity(text.len());

		for c in text.chars().flat_map(char::to_lowercase) {
			if PUNCTUATION.contains(&c) {
				if self.keep_punctuation {
					cleaned.push(' ');
					cleaned.push(c);
					cleaned.push(' ');
				}
			} else if c.is_whitespace() {
				// Newlines collapse like any other separator
				cleaned.push(' ');
			} else if is_word_char(c) {
				cleaned.push(c);
			}
		}

		cleaned.split_whitespace().map(str::to_owned).collect()
	}
}

impl Default for Tokenizer {
	fn default() -> Self {
		Self::new(true)
	}
}

fn is_word_char(c: char) -> bool {
	c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_lowercase_and_split() {
		let tokenizer = Tokenizer::new(false);
		assert_eq!(tokenizer.tokenize("Millet  VE\nordu"), vec!["millet", "ve", "ordu"]);
	}

	#[test]
	fn test_punctuation_dropped() {
		let tokenizer = Tokenizer::new(false);
		assert_eq!(tokenizer.tokenize("Millet, ve ordu! (1919)"), vec!["millet", "ve", "ordu", "1919"]);
	}

	#[test]
	fn test_punctuation_kept_as_tokens() {
		let tokenizer = Tokenizer::new(true);
		assert_eq!(
			tokenizer.tokenize("Efendiler; millet, ve ordu! Neden?"),
			vec!["efendiler", ";", "millet", ",", "ve", "ordu", "!", "neden", "?"]
		);
	}

	#[test]
	fn test_other_symbols_stripped_inside_words() {
		let tokenizer = Tokenizer::new(true);
		assert_eq!(tokenizer.tokenize("Atatürk'ün \"Nutuk\": 1927."), vec!["atatürkün", "nutuk", "1927", "."]);
	}

	#[test]
	fn test_non_ascii_words_survive() {
		let tokenizer = Tokenizer::default();
		assert_eq!(tokenizer.tokenize("ÇOCUKLAR ğüşıöç"), vec!["çocuklar", "ğüşıöç"]);
	}

	#[test]
	fn test_empty_input() {
		assert!(Tokenizer::default().tokenize(" \n\t ").is_empty());
	}
}

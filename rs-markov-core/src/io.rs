use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// Reads a corpus file as UTF-8 and returns its whole content.
///
/// - Reads the entire file into memory
/// - Any I/O or encoding failure becomes `Error::CorpusLoad`
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> Result<String> {
	let path = filename.as_ref();
	let mut contents = String::new();
	File::open(path)
		.and_then(|mut file| file.read_to_string(&mut contents))
		.map_err(|source| Error::CorpusLoad { path: path.to_path_buf(), source })?;
	Ok(contents)
}

/// Drops the first `count` lines of `text` (front matter, table of contents...).
///
/// If the text does not have more than `count` lines, it is returned whole.
///
/// Examples:
/// - `skip_lines("a\nb\nc", 1)` → `"b\nc"`
/// - `skip_lines("a\nb", 5)` → `"a\nb"`
pub(crate) fn skip_lines(text: &str, count: usize) -> &str {
	if count == 0 {
		return text;
	}

	let mut offset = 0;
	let mut lines = text.split_inclusive('\n');
	for _ in 0..count {
		match lines.next() {
			Some(line) => offset += line.len(),
			None => return text,
		}
	}

	if offset >= text.len() {
		// Nothing left after the prefix
		return text;
	}
	&text[offset..]
}

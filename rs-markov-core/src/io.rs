use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ModelError, Result};
use crate::model::corpus_stats::CorpusStatistics;
use crate::model::markov_estimator::MarkovEstimator;

/// Reads a sentence corpus: a JSON document holding an array of strings,
/// one sentence per element, UTF-8 encoded.
pub fn read_sentences<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
	let contents = fs::read_to_string(path)?;
	Ok(serde_json::from_str(&contents)?)
}

/// Reads a tag corpus: a JSON array of tag sequences, each an array of
/// strings aligned to one sentence's tokens.
pub fn read_tag_sequences<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<String>>> {
	let contents = fs::read_to_string(path)?;
	Ok(serde_json::from_str(&contents)?)
}

/// Writes the corpus statistics artifact as pretty-printed JSON.
pub fn write_statistics<P: AsRef<Path>>(path: P, statistics: &CorpusStatistics) -> Result<()> {
	let contents = serde_json::to_string_pretty(statistics)?;
	fs::write(path, contents)?;
	Ok(())
}

/// Serializes a trained estimator to a compact binary snapshot.
pub(crate) fn save_snapshot<P: AsRef<Path>>(path: P, estimator: &MarkovEstimator) -> Result<()> {
	let bytes = postcard::to_stdvec(estimator)?;
	fs::write(path, bytes)?;
	Ok(())
}

/// Deserializes an estimator snapshot, verifying the persisted order against
/// the order the caller expects. A failure constructs nothing.
pub(crate) fn load_snapshot<P: AsRef<Path>>(path: P, expected_order: usize) -> Result<MarkovEstimator> {
	let bytes = fs::read(path)?;
	let estimator: MarkovEstimator = postcard::from_bytes(&bytes)?;
	if estimator.order() != expected_order {
		return Err(ModelError::OrderMismatch {
			expected: expected_order,
			found: estimator.order(),
		});
	}
	Ok(estimator)
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/sentences.json` + `"bin"` → `data/sentences.bin`
pub fn build_output_path<P: AsRef<Path>>(input_path: P, output_extension: &str) -> Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	fn temp_path(name: &str) -> PathBuf {
		std::env::temp_dir().join(format!("rs-markov-{}-{name}", std::process::id()))
	}

	#[test]
	fn reads_a_sentence_corpus() {
		let path = temp_path("sentences.json");
		fs::write(&path, r#"["the cat sat", "the dog sat"]"#).unwrap();
		let sentences = read_sentences(&path).unwrap();
		fs::remove_file(&path).ok();

		assert_eq!(sentences, vec!["the cat sat".to_owned(), "the dog sat".to_owned()]);
	}

	#[test]
	fn reads_a_tag_corpus() {
		let path = temp_path("tags.json");
		fs::write(&path, r#"[["NN", "VB"], ["DT", "NN"]]"#).unwrap();
		let sequences = read_tag_sequences(&path).unwrap();
		fs::remove_file(&path).ok();

		assert_eq!(sequences.len(), 2);
		assert_eq!(sequences[0], vec!["NN".to_owned(), "VB".to_owned()]);
	}

	#[test]
	fn malformed_corpus_is_a_typed_error() {
		let path = temp_path("broken.json");
		fs::write(&path, "not json").unwrap();
		let result = read_sentences(&path);
		fs::remove_file(&path).ok();

		assert!(matches!(result, Err(ModelError::Corpus(_))));
	}

	#[test]
	fn missing_corpus_is_an_io_error() {
		assert!(matches!(
			read_sentences(temp_path("does-not-exist.json")),
			Err(ModelError::Io(_))
		));
	}

	#[test]
	fn corrupt_snapshot_is_a_codec_error() {
		let path = temp_path("corrupt.bin");
		fs::write(&path, [0xff, 0xff, 0xff]).unwrap();
		let result = load_snapshot(&path, 2);
		fs::remove_file(&path).ok();

		assert!(matches!(result, Err(ModelError::Codec(_))));
	}

	#[test]
	fn output_path_swaps_the_extension() {
		let output = build_output_path("data/sentences.json", "bin").unwrap();
		assert_eq!(output, PathBuf::from("data/sentences.bin"));

		let output = build_output_path("sentences.json", "stats.json").unwrap();
		assert_eq!(output, PathBuf::from("sentences.stats.json"));
	}

	#[test]
	fn statistics_artifact_round_trips() {
		let stats = CorpusStatistics::from_sentences(&["a b a".to_owned()]);
		let path = temp_path("statistics.json");
		write_statistics(&path, &stats).unwrap();

		let contents = fs::read_to_string(&path).unwrap();
		fs::remove_file(&path).ok();
		let reloaded: CorpusStatistics = serde_json::from_str(&contents).unwrap();
		assert_eq!(stats, reloaded);
	}
}

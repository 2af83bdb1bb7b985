use std::env;
use std::path::PathBuf;
use std::process;

use rs_markov_core::error::Result;
use rs_markov_core::io;
use rs_markov_core::model::corpus_stats::CorpusStatistics;
use rs_markov_core::model::language_model::LanguageModel;
use rs_markov_core::model::tag_model::TagTransitionModel;
use tracing::info;

const USAGE: &str = "\
Usage: rs-markov-train <command> <input> [output]

Commands:
  lm     <sentences.json> [model.bin]       train the bigram language model
  tags   <tags.json>      [model.bin]       train a tag-transition model
  stats  <sentences.json> [statistics.json] write corpus frequency statistics

Inputs are JSON documents: an array of sentences for `lm`/`stats`, an array of
tag sequences for `tags`. Without an explicit output the input path is reused
with a `bin` (or `stats.json`) extension.";

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("Training failed: {e}");
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("lm") => train_language_model(&args[1..]),
        Some("tags") => train_tag_model(&args[1..]),
        Some("stats") => write_corpus_statistics(&args[1..]),
        _ => {
            eprintln!("{USAGE}");
            process::exit(2);
        }
    }
}

/// Resolves the input path and the (possibly derived) output path.
fn input_and_output(args: &[String], default_extension: &str) -> Result<(PathBuf, PathBuf)> {
    let input = match args.first() {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };
    let output = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => io::build_output_path(&input, default_extension)?,
    };
    Ok((input, output))
}

fn train_language_model(args: &[String]) -> Result<()> {
    let (input, output) = input_and_output(args, "bin")?;
    let sentences = io::read_sentences(&input)?;
    let model = LanguageModel::train_parallel(sentences)?;
    model.save(&output)?;

    let stats = model.statistics();
    info!(
        vocabulary = stats.vocabulary_size,
        total_bigrams = stats.total_bigrams,
        unique_bigrams = stats.unique_bigrams,
        output = %output.display(),
        "language model saved"
    );
    Ok(())
}

fn train_tag_model(args: &[String]) -> Result<()> {
    let (input, output) = input_and_output(args, "bin")?;
    let sequences = io::read_tag_sequences(&input)?;

    let mut model = TagTransitionModel::new();
    model.train(&sequences);
    model.save(&output)?;

    let stats = model.statistics();
    info!(
        tags = stats.tag_vocabulary_size,
        total_transitions = stats.total_transitions,
        unique_transitions = stats.unique_transitions,
        output = %output.display(),
        "tag-transition model saved"
    );
    Ok(())
}

fn write_corpus_statistics(args: &[String]) -> Result<()> {
    let (input, output) = input_and_output(args, "stats.json")?;
    let sentences = io::read_sentences(&input)?;

    let statistics = CorpusStatistics::from_sentences(&sentences);
    io::write_statistics(&output, &statistics)?;

    info!(
        sentences = statistics.total_sentences,
        words = statistics.total_words,
        output = %output.display(),
        "corpus statistics saved"
    );
    Ok(())
}

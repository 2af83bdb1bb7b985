use rs_markov_core::model::corpus_stats::CorpusStatistics;
use rs_markov_core::model::language_model::LanguageModel;
use rs_markov_core::model::tag_model::{bio_tags, EntitySpan, TagTransitionModel};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Train the bigram language model on a small in-memory corpus.
    // Sentences are lowercased and split on whitespace; punctuation stays
    // attached to its token.
    let corpus: Vec<String> = [
        "The cat sat on the mat",
        "The dog sat on the rug",
        "A cat and a dog sat together",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let mut lm = LanguageModel::new();
    lm.train(&corpus);

    let stats = lm.statistics();
    println!(
        "Language model: {} words, {} bigrams ({} unique)",
        stats.vocabulary_size, stats.total_bigrams, stats.unique_bigrams
    );

    // Smoothed point queries: every probability is strictly positive,
    // even for pairs never seen in training
    for (w1, w2) in [("the", "cat"), ("the", "dog"), ("cat", "flew"), ("zebra", "cat")] {
        let p = lm.probability(&[w1.to_owned(), w2.to_owned()])?;
        println!("P({w2} | {w1}) = {p:.4}");
    }

    // A query with the wrong number of words is rejected before any lookup
    match lm.probability(&["the".to_owned()]) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("One-word query rejected: {e}"),
    }

    // An untrained model refuses queries instead of returning zero
    let empty = LanguageModel::new();
    match empty.probability(&["the".to_owned(), "cat".to_owned()]) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Untrained model rejected: {e}"),
    }

    // Train a tag-transition model on part-of-speech sequences produced
    // by an external tagger
    let mut pos = TagTransitionModel::new();
    pos.train(&[
        vec!["DT".to_owned(), "NN".to_owned(), "VB".to_owned()],
        vec!["DT".to_owned(), "JJ".to_owned(), "NN".to_owned()],
    ]);

    println!(
        "P(NN | DT) = {:.4}",
        pos.transition_probability("DT", "NN")?
    );

    // The tag model is unsmoothed: an unseen previous tag is a typed error,
    // the caller decides the fallback
    match pos.transition_probability("RB", "NN") {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Unseen previous tag rejected: {e}"),
    }

    // Weighted sampling of a next tag, proportional to observed counts
    println!("Sampled tag after DT: {}", pos.sample_next("DT")?);

    // NER uses the same estimator over BIO sequences derived from entity spans
    let spans = vec![EntitySpan { start: 0, end: 2, label: "PER".to_owned() }];
    let mut ner = TagTransitionModel::new();
    ner.train(&[bio_tags(5, &spans)]);
    println!(
        "P(I-PER | B-PER) = {:.4}",
        ner.transition_probability("B-PER", "I-PER")?
    );

    // Persist the language model and reconstruct it from the snapshot
    let snapshot = std::env::temp_dir().join("rs-markov-exemple.bin");
    lm.save(&snapshot)?;
    let reloaded = LanguageModel::load(&snapshot)?;
    std::fs::remove_file(&snapshot).ok();
    println!(
        "Reloaded model answers identically: {}",
        reloaded.probability(&["the".to_owned(), "cat".to_owned()])?
            == lm.probability(&["the".to_owned(), "cat".to_owned()])?
    );

    // Corpus statistics use the same tokenization as the model
    let corpus_stats = CorpusStatistics::from_sentences(&corpus);
    println!(
        "Corpus: {} sentences, {} words, most common word: {:?}",
        corpus_stats.total_sentences,
        corpus_stats.total_words,
        corpus_stats.most_common_words.first()
    );

    Ok(())
}

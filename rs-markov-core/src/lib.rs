//! Statistical sequence modeling over tokenized corpora.
//!
//! This crate provides smoothed n-gram language modeling and Markov-style
//! tag-transition estimation, including:
//! - A generic fixed-order Markov estimator over string symbols
//! - A bigram language model with Laplace (add-one) smoothing
//! - Tag-transition tables for part-of-speech and named-entity tag sequences
//! - Compact binary snapshots of trained models and JSON corpus I/O
//!
//! Training is an offline, in-memory batch operation; a trained model is
//! immutable under queries and safe to share across concurrent readers.
//! Tagging, parsing and corpus acquisition are external concerns — the models
//! here only consume their output sequences.

/// Core estimators and model statistics.
pub mod model;

/// Typed error taxonomy and the crate `Result` alias.
pub mod error;

/// I/O utilities: JSON corpus loading, snapshot persistence, path helpers.
pub mod io;

//! Word-level n-gram text generation library.
//!
//! This crate provides a corpus-trained Markov chain including:
//! - Punctuation-aware tokenization and a sorted vocabulary
//! - Multi-order transition tables with backoff and additive smoothing
//! - Temperature sampling and seeded text generation
//! - A top-transitions query for inspecting the model
//!
//! Hosts build a [`Generator`] once and share it by reference.

/// Model loading settings.
pub mod config;

/// Error taxonomy shared by every operation.
pub mod error;

/// Core n-gram models and generation logic.
pub mod model;

/// Corpus tokenizer.
pub mod tokenizer;

/// Token ↔ index mapping.
pub mod vocabulary;

/// I/O utilities (corpus loading, front-matter removal).
///
/// Not exposed
pub(crate) mod io;

pub use config::ModelConfig;
pub use error::{Error, Result};
pub use model::generation_input::{GenerationInput, UnseenSeedPolicy};
pub use model::generator::{Generator, ModelStats, Transition};

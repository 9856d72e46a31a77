//! Top-level module for the word n-gram generation system.
//!
//! This module provides a multi-order word Markov chain, including:
//! - Fixed-order transition tables (`NGramModel`)
//! - The multi-order model and its backoff estimator (`MultiGramModel`)
//! - Temperature sampling (`Sampler`)
//! - Generation parameters (`GenerationInput`)
//! - The high-level generation interface (`Generator`)

/// High-level interface owning the vocabulary and the transition model.
///
/// Exposes model loading, text generation and the top-transitions query.
pub mod generator;

/// Multi-order model composed of one `NGramModel` per order.
///
/// Builds every order in a single pass per order and estimates smoothed
/// next-token distributions with backoff.
pub mod multigram_model;

/// Fixed-order transition table (`n >= 1`).
pub mod ngram_model;

/// Next-token counts of a single history.
///
/// This module is not exposed publicly.
mod state;

/// Normalized next-token distribution.
pub mod distribution;

/// Temperature scaling and categorical draws.
pub mod sampler;

/// Validated generation parameters and unseen-seed policy.
pub mod generation_input;

pub use state::State;

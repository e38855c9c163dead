//! Top-level module for the n-gram modelling system.
//!
//! This module provides a family of smoothed n-gram sequence models:
//! - A fixed-order base model with add-k smoothing (`BaseModel`)
//! - A tagged model hierarchy over smoothing strategies (`NgramModel`)
//! - Internal per-context count storage (`ContextStats`)
//! - Training configuration (`ModelConfig`)
//! - N-gram extraction (`NgramIter`) and categorical sampling

/// Smoothed model hierarchy and the operations built on it.
///
/// Exposes training, conditional probability, sequence probability,
/// log-likelihood evaluation, sampling-based generation, and model
/// persistence.
pub mod ngram_model;

/// Fixed-order n-gram frequency model.
///
/// Handles the training pass over sequences, count accumulation,
/// and the add-k conditional probability estimator.
pub mod base_model;

/// Training configuration structure.
///
/// Gathers the order, smoothing prior, sentinel symbols and smoothing
/// strategy handed to `NgramModel::train`.
pub mod config;

/// N-gram extraction from raw sequences.
///
/// Pads a sequence with sentinel symbols and yields each event together
/// with its fixed-width context window.
pub mod ngrams;

/// Categorical sampling over weighted outcomes.
pub mod sampler;

/// Internal per-context transition counts (frequency and margin).
///
/// This module is not exposed publicly.
mod context_stats;

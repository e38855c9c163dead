use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use super::context_stats::ContextStats;
use super::ngrams::NgramIter;

/// Fixed-order n-gram frequency model with add-k smoothing.
///
/// A `BaseModel` of order `n + 1` conditions each event on the `n` symbols
/// preceding it. Training runs the n-gram extractor over every sequence
/// once, accumulating the alphabet and per-context transition counts;
/// everything is immutable afterwards.
///
/// # Responsibilities
/// - Build the alphabet and count tables from training sequences
/// - Compute the add-k conditional probability of an event given a context
/// - Expose the margin count of a context for backoff decisions
///
/// # Invariants
/// - `order >= 1`, so the context width `n = order - 1` is well defined
/// - The alphabet contains every observed event and the end symbol,
///   never the start symbol
/// - For every stored context, its margin equals the sum of its counts
/// - With `prior > 0`, `cond_prob` sums to 1 over the alphabet for any
///   fixed context; with `prior == 0` it is the maximum-likelihood
///   estimate and is undefined for contexts that were never observed
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BaseModel {
	/// Context width (order minus one).
	n: usize,
	/// Padding symbol prepended `n` times to every sequence.
	start: char,
	/// Terminator symbol appended to every sequence.
	end: char,
	/// Add-k smoothing prior, >= 0.
	prior: f64,
	/// Every distinct event observed during training, end symbol included.
	alphabet: BTreeSet<char>,
	/// Transition counts indexed by context.
	contexts: HashMap<String, ContextStats>,
}

impl BaseModel {
	/// Trains a model of the given order over the training sequences.
	///
	/// Runs the extractor over every sequence and counts each
	/// `(event, context)` pair it yields.
	///
	/// # Errors
	/// Returns an error if `order < 1` or `prior` is negative.
	pub fn train<S: AsRef<str>>(
		data: &[S],
		order: usize,
		prior: f64,
		start: char,
		end: char,
	) -> Result<Self, String> {
		if order < 1 {
			return Err("order must be >= 1".to_owned());
		}
		if prior < 0.0 {
			return Err(format!("prior must be >= 0, got {}", prior));
		}

		let n = order - 1;
		let mut alphabet = BTreeSet::new();
		let mut contexts: HashMap<String, ContextStats> = HashMap::new();
		for sequence in data {
			for (event, context) in NgramIter::new(sequence.as_ref(), n, start, end) {
				alphabet.insert(event);
				contexts.entry(context).or_default().record(event);
			}
		}

		Ok(Self { n, start, end, prior, alphabet, contexts })
	}

	/// Conditional probability of `event` given `context`.
	///
	/// Computes `(count + prior) / (margin + prior * |alphabet|)`. With a
	/// positive prior every pair gets strictly positive mass, observed or
	/// not. With a zero prior the result is the raw relative frequency,
	/// and NaN for a context with no observations; callers wanting a
	/// total estimate must train with `prior > 0`.
	pub fn cond_prob(&self, event: char, context: &str) -> f64 {
		let (count, margin) = match self.contexts.get(context) {
			Some(stats) => (stats.count(event), stats.total()),
			None => (0, 0),
		};
		let norm = margin as f64 + self.prior * self.alphabet.len() as f64;
		(count as f64 + self.prior) / norm
	}

	/// Margin count of `context`: how often it was observed in training.
	pub fn context_total(&self, context: &str) -> u64 {
		self.contexts.get(context).map_or(0, ContextStats::total)
	}

	/// Iterator over the n-grams of `sequence`, using this model's
	/// context width and sentinel symbols.
	///
	/// Training and every probability query extract windows through this
	/// same path, so the two are guaranteed consistent.
	pub fn ngrams(&self, sequence: &str) -> NgramIter {
		NgramIter::new(sequence, self.n, self.start, self.end)
	}

	/// The alphabet of observed events, in its fixed iteration order.
	pub fn alphabet(&self) -> &BTreeSet<char> {
		&self.alphabet
	}

	/// Context width (order minus one).
	pub fn context_len(&self) -> usize {
		self.n
	}

	/// Start padding symbol.
	pub fn start(&self) -> char {
		self.start
	}

	/// End terminator symbol.
	pub fn end(&self) -> char {
		self.end
	}

	#[cfg(test)]
	pub(crate) fn contexts(&self) -> &HashMap<String, ContextStats> {
		&self.contexts
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Corpus small enough to check every count by hand.
	fn two_symbol_data() -> Vec<&'static str> {
		vec!["rssrr", "rrrsss", "rsr"]
	}

	fn bigram_model(prior: f64) -> BaseModel {
		BaseModel::train(&two_symbol_data(), 2, prior, '^', '$').unwrap()
	}

	#[test]
	fn order_zero_is_rejected() {
		assert!(BaseModel::train(&two_symbol_data(), 0, 0.0, '^', '$').is_err());
	}

	#[test]
	fn negative_prior_is_rejected() {
		assert!(BaseModel::train(&two_symbol_data(), 2, -1.0, '^', '$').is_err());
	}

	#[test]
	fn alphabet_holds_events_and_end_but_not_start() {
		let model = bigram_model(0.0);
		let expected: BTreeSet<char> = ['r', 's', '$'].into_iter().collect();
		assert_eq!(model.alphabet(), &expected);
	}

	#[test]
	fn maximum_likelihood_estimates_match_hand_counts() {
		let model = bigram_model(0.0);
		assert_eq!(model.cond_prob('r', "^"), 1.0);
		assert_eq!(model.cond_prob('s', "^"), 0.0);
		assert_eq!(model.cond_prob('s', "r"), 3.0 / 8.0);
		assert_eq!(model.cond_prob('$', "s"), 1.0 / 6.0);
	}

	#[test]
	fn margins_equal_the_sum_of_their_counts() {
		let model = bigram_model(0.0);
		for stats in model.contexts().values() {
			assert_eq!(stats.total(), stats.counts().values().sum::<u64>());
		}
		assert_eq!(model.context_total("^"), 3);
		assert_eq!(model.context_total("r"), 8);
		assert_eq!(model.context_total("s"), 6);
	}

	#[test]
	fn smoothed_distribution_sums_to_one() {
		let model = bigram_model(0.5);
		for context in ["^", "r", "s"] {
			let sum: f64 = model.alphabet().iter().map(|&e| model.cond_prob(e, context)).sum();
			assert!((sum - 1.0).abs() < 1e-12, "context {:?} sums to {}", context, sum);
		}
	}

	#[test]
	fn unseen_context_with_prior_is_uniform() {
		let model = bigram_model(1.0);
		let uniform = 1.0 / model.alphabet().len() as f64;
		for &event in model.alphabet() {
			assert!((model.cond_prob(event, "x") - uniform).abs() < 1e-12);
		}
	}

	#[test]
	fn smoothing_gives_unseen_pairs_positive_mass() {
		let model = bigram_model(0.001);
		assert!(model.cond_prob('s', "^") > 0.0);
	}
}

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::base_model::BaseModel;
use super::config::{ModelConfig, Smoothing};
use super::sampler::sample_categorical;

/// Upper bound on generation steps before giving up.
///
/// A trained model with a positive prior reaches the end symbol long
/// before this; the bound turns a misconfigured model (e.g. zero prior
/// with an end symbol that got no mass in some context) into an explicit
/// error instead of a loop that never returns.
const MAX_GENERATION_STEPS: usize = 10_000;

/// A smoothed n-gram sequence model.
///
/// The three estimators form one tagged hierarchy: `Katz` and
/// `Interpolated` own the high-order frequency tables plus a boxed
/// subordinate model one order lower, trained on the same data, bottoming
/// out at a plain `Base` of order 1. Every operation above `cond_prob`
/// (sequence probability, log-likelihood, sampling, generation) is shared
/// across the variants, so they are interchangeable at the top of a
/// generation or evaluation pipeline.
///
/// # Responsibilities
/// - Train whichever estimator a `ModelConfig` asks for
/// - Dispatch `cond_prob` to the variant's smoothing rule
/// - Evaluate sequence probabilities and corpus log-likelihood
/// - Generate sequences by repeated categorical sampling
/// - Persist trained models to and from compact binary files
///
/// # Invariants
/// - The subordinate chain has depth `order - 1` and is never cyclic
/// - All variants of one chain share training data, prior and sentinels
/// - Models are immutable once trained
#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum NgramModel {
	/// Add-k smoothing alone.
	Base(BaseModel),
	/// Katz backoff: defer to the subordinate model when the high-order
	/// context was observed at most `k` times.
	Katz {
		base: BaseModel,
		k: u64,
		lower: Box<NgramModel>,
	},
	/// Jelinek-Mercer: always blend high-order and subordinate estimates
	/// with weight `lambda`.
	Interpolated {
		base: BaseModel,
		lambda: f64,
		lower: Box<NgramModel>,
	},
}

impl NgramModel {
	/// Trains the model described by `config` on the training sequences.
	///
	/// # Errors
	/// Returns an error for an order below the strategy's minimum (1 for
	/// additive, 2 otherwise), a negative prior, or a `lambda` outside
	/// `[0, 1]`.
	pub fn train<S: AsRef<str>>(data: &[S], config: &ModelConfig) -> Result<Self, String> {
		match config.smoothing {
			Smoothing::Additive => {
				Self::additive(data, config.order, config.prior, config.start, config.end)
			}
			Smoothing::KatzBackoff { k } => {
				Self::katz(data, config.order, k, config.prior, config.start, config.end)
			}
			Smoothing::JelinekMercer { lambda } => {
				Self::interpolated(data, config.order, lambda, config.prior, config.start, config.end)
			}
		}
	}

	/// Trains a plain add-k model of the given order (>= 1).
	pub fn additive<S: AsRef<str>>(
		data: &[S],
		order: usize,
		prior: f64,
		start: char,
		end: char,
	) -> Result<Self, String> {
		Ok(Self::Base(BaseModel::train(data, order, prior, start, end)?))
	}

	/// Trains a Katz backoff model of the given order (>= 2).
	///
	/// The subordinate model of order `order - 1` is trained on the same
	/// data with the same prior and sentinels, recursively down to a
	/// plain order-1 model.
	pub fn katz<S: AsRef<str>>(
		data: &[S],
		order: usize,
		k: u64,
		prior: f64,
		start: char,
		end: char,
	) -> Result<Self, String> {
		if order < 2 {
			return Err("backoff requires order >= 2".to_owned());
		}
		let base = BaseModel::train(data, order, prior, start, end)?;
		let lower = if order == 2 {
			Self::additive(data, 1, prior, start, end)?
		} else {
			Self::katz(data, order - 1, k, prior, start, end)?
		};
		Ok(Self::Katz { base, k, lower: Box::new(lower) })
	}

	/// Trains a Jelinek-Mercer interpolated model of the given order (>= 2).
	///
	/// Every level of the subordinate chain interpolates with the same
	/// `lambda`.
	///
	/// # Errors
	/// Returns an error if `lambda` is outside `[0, 1]`.
	pub fn interpolated<S: AsRef<str>>(
		data: &[S],
		order: usize,
		lambda: f64,
		prior: f64,
		start: char,
		end: char,
	) -> Result<Self, String> {
		if order < 2 {
			return Err("interpolation requires order >= 2".to_owned());
		}
		if !(0.0..=1.0).contains(&lambda) {
			return Err(format!("lambda must be between 0.0 and 1.0, got {}", lambda));
		}
		let base = BaseModel::train(data, order, prior, start, end)?;
		let lower = if order == 2 {
			Self::additive(data, 1, prior, start, end)?
		} else {
			Self::interpolated(data, order - 1, lambda, prior, start, end)?
		};
		Ok(Self::Interpolated { base, lambda, lower: Box::new(lower) })
	}

	/// Conditional probability of `event` given `context`, under this
	/// variant's smoothing rule.
	///
	/// - `Base`: the add-k estimate at the full context.
	/// - `Katz`: the add-k estimate if the context's margin count exceeds
	///   `k`, otherwise the subordinate's estimate over the context with
	///   its oldest symbol dropped. Discounted mass is not redistributed,
	///   so the values need not sum exactly to 1 over the alphabet; that
	///   is the documented behaviour of this backoff, not a defect.
	/// - `Interpolated`: `lambda` times the add-k estimate plus
	///   `1 - lambda` times the subordinate's estimate over the shrunk
	///   context, unconditionally.
	pub fn cond_prob(&self, event: char, context: &str) -> f64 {
		match self {
			Self::Base(base) => base.cond_prob(event, context),
			Self::Katz { base, k, lower } => {
				if base.context_total(context) > *k {
					base.cond_prob(event, context)
				} else {
					lower.cond_prob(event, drop_oldest(context))
				}
			}
			Self::Interpolated { base, lambda, lower } => {
				lambda * base.cond_prob(event, context)
					+ (1.0 - lambda) * lower.cond_prob(event, drop_oldest(context))
			}
		}
	}

	/// Chain-rule probability of a whole sequence: the product of
	/// `cond_prob` over every `(event, context)` pair extracted from it.
	///
	/// Underflows for long sequences; prefer `log_likelihood` there.
	///
	/// # Errors
	/// Returns an error on a conditional probability that is not strictly
	/// positive (possible with a zero prior and an unseen pair).
	pub fn sequence_prob(&self, sequence: &str) -> Result<f64, String> {
		let mut prob = 1.0;
		for (event, context) in self.base().ngrams(sequence) {
			let p = self.cond_prob(event, &context);
			if !(p > 0.0) {
				return Err(no_mass_error(event, &context));
			}
			prob *= p;
		}
		Ok(prob)
	}

	/// Total log-likelihood of a test corpus: the sum of
	/// `ln(cond_prob)` over every pair of every sequence.
	///
	/// # Errors
	/// Returns an error on a conditional probability that is not strictly
	/// positive, rather than taking its logarithm.
	pub fn log_likelihood<S: AsRef<str>>(&self, test_data: &[S]) -> Result<f64, String> {
		let mut log_like = 0.0;
		for sequence in test_data {
			for (event, context) in self.base().ngrams(sequence.as_ref()) {
				let p = self.cond_prob(event, &context);
				if !(p > 0.0) {
					return Err(no_mass_error(event, &context));
				}
				log_like += p.ln();
			}
		}
		Ok(log_like)
	}

	/// Samples the next event after `context`.
	///
	/// Builds the conditional distribution over the whole alphabet, in
	/// the alphabet's fixed iteration order, and draws from it. Linear in
	/// the alphabet size.
	///
	/// # Errors
	/// Propagates the sampler's error when the distribution's mass falls
	/// short of the draw.
	pub fn sample_next<R: Rng>(&self, context: &str, rng: &mut R) -> Result<char, String> {
		let distribution: Vec<(char, f64)> = self
			.base()
			.alphabet()
			.iter()
			.map(|&event| (event, self.cond_prob(event, context)))
			.collect();
		sample_categorical(&distribution, rng)
	}

	/// Generates one sequence by running the model as a Markov process.
	///
	/// Starts from the start padding and repeatedly samples the next
	/// event from the trailing context until the end symbol is drawn,
	/// then returns the sequence with padding and terminator stripped.
	///
	/// # Errors
	/// Returns an error if sampling fails or if the end symbol has not
	/// been drawn after `MAX_GENERATION_STEPS` events.
	pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<String, String> {
		let base = self.base();
		let n = base.context_len();
		let mut sequence: String = std::iter::repeat(base.start()).take(n).collect();

		for _ in 0..MAX_GENERATION_STEPS {
			let context = last_n_chars(&sequence, n);
			let event = self.sample_next(&context, rng)?;
			if event == base.end() {
				return Ok(sequence.chars().skip(n).collect());
			}
			sequence.push(event);
		}

		Err(format!(
			"generation did not reach the end symbol within {} steps",
			MAX_GENERATION_STEPS
		))
	}

	/// Serializes the trained model to a compact binary file.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
		let bytes = postcard::to_stdvec(self)?;
		std::fs::write(path, bytes)?;
		Ok(())
	}

	/// Loads a model previously written by `save`.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
		let bytes = std::fs::read(path)?;
		Ok(postcard::from_bytes(&bytes)?)
	}

	/// The highest-order frequency tables of this model.
	///
	/// Extraction, alphabet and sentinels are shared across the whole
	/// subordinate chain, so the top level's base answers for all of them.
	fn base(&self) -> &BaseModel {
		match self {
			Self::Base(base) => base,
			Self::Katz { base, .. } => base,
			Self::Interpolated { base, .. } => base,
		}
	}
}

/// The context with its oldest (leftmost) symbol dropped.
fn drop_oldest(context: &str) -> &str {
	let mut chars = context.chars();
	chars.next();
	chars.as_str()
}

/// Returns the last `n` characters of a string (UTF-8 aware).
///
/// If `n` exceeds the character count, the whole string is returned.
fn last_n_chars(s: &str, n: usize) -> String {
	let len = s.chars().count();
	if n > len {
		return s.to_owned();
	}
	s.chars().skip(len - n).collect()
}

/// Domain error for a pair the model gives no probability mass.
fn no_mass_error(event: char, context: &str) -> String {
	format!(
		"no probability mass for event {:?} in context {:?} (train with a positive prior)",
		event, context
	)
}

use rand::Rng;

/// Draws one outcome from a categorical distribution.
///
/// The distribution is an ordered slice of `(outcome, weight)` pairs whose
/// weights are non-negative and sum to (approximately) 1. One uniform
/// value is drawn in `[0, 1)` and the pairs are walked in order,
/// subtracting each weight, returning the first outcome whose weight
/// exceeds what remains of the draw.
///
/// The walk order decides which outcome a given draw lands on, but not the
/// marginal distribution across many draws.
///
/// # Errors
/// Returns an error if the cumulative weight never covers the draw, i.e.
/// the weights summed to less than 1. That signals a probability-mass bug
/// upstream (or accumulated floating-point drift), so no fallback outcome
/// is picked.
pub fn sample_categorical<R: Rng>(
	distribution: &[(char, f64)],
	rng: &mut R,
) -> Result<char, String> {
	let mut draw: f64 = rng.random();
	for &(outcome, weight) in distribution {
		if draw < weight {
			return Ok(outcome);
		}
		draw -= weight;
	}
	Err("sum of distribution weights less than one".to_owned())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn single_certain_outcome_is_always_drawn() {
		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..100 {
			assert_eq!(sample_categorical(&[('a', 1.0)], &mut rng).unwrap(), 'a');
		}
	}

	#[test]
	fn zero_weight_outcomes_are_never_drawn() {
		let dist = [('a', 0.0), ('b', 1.0), ('c', 0.0)];
		let mut rng = StdRng::seed_from_u64(11);
		for _ in 0..100 {
			assert_eq!(sample_categorical(&dist, &mut rng).unwrap(), 'b');
		}
	}

	#[test]
	fn empirical_frequencies_follow_the_weights() {
		let dist = [('a', 0.25), ('b', 0.75)];
		let mut rng = StdRng::seed_from_u64(13);
		let draws = 20_000;
		let mut a_count = 0usize;
		for _ in 0..draws {
			if sample_categorical(&dist, &mut rng).unwrap() == 'a' {
				a_count += 1;
			}
		}
		let a_freq = a_count as f64 / draws as f64;
		assert!((a_freq - 0.25).abs() < 0.02, "P(a) estimated as {}", a_freq);
	}

	#[test]
	fn short_mass_is_an_error_not_a_fallback() {
		let mut rng = StdRng::seed_from_u64(17);
		assert!(sample_categorical(&[], &mut rng).is_err());
		// Weights sum to 0, so any draw exhausts the walk.
		assert!(sample_categorical(&[('a', 0.0)], &mut rng).is_err());
	}
}

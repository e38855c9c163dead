use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Transition counts observed for a single context.
///
/// Conceptually this is one row of the frequency table together with its
/// margin: `counts` maps each event to the number of times it followed the
/// context, and `total` is the sum of those counts, maintained on every
/// increment.
///
/// ## Invariants
/// - `total == counts.values().sum()`, exactly, as integers
/// - Every stored count is strictly positive
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub(crate) struct ContextStats {
	/// Event counts indexed by the event that followed this context.
	/// Example: { 'e' => 42, 'a' => 3 }
	counts: HashMap<char, u64>,
	/// Sum of all event counts for this context (the margin).
	total: u64,
}

impl ContextStats {
	/// Records one observation of `event` following this context.
	pub(crate) fn record(&mut self, event: char) {
		*self.counts.entry(event).or_insert(0) += 1;
		self.total += 1;
	}

	/// Number of times `event` followed this context. Zero if never seen.
	pub(crate) fn count(&self, event: char) -> u64 {
		self.counts.get(&event).copied().unwrap_or(0)
	}

	/// Total number of observations for this context (the margin count).
	pub(crate) fn total(&self) -> u64 {
		self.total
	}

	#[cfg(test)]
	pub(crate) fn counts(&self) -> &HashMap<char, u64> {
		&self.counts
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn total_tracks_the_sum_of_counts() {
		let mut stats = ContextStats::default();
		stats.record('a');
		stats.record('a');
		stats.record('b');
		assert_eq!(stats.count('a'), 2);
		assert_eq!(stats.count('b'), 1);
		assert_eq!(stats.count('c'), 0);
		assert_eq!(stats.total(), stats.counts().values().sum::<u64>());
	}
}

// Pairing of candidate benchmarks with their baseline counterparts

use crate::regression::config::UnmatchedPolicy;
use crate::summary::{BenchmarkSummary, MeasurementSet};

/// A candidate entry joined with the baseline it is compared against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedPair<'a> {
    pub candidate: &'a BenchmarkSummary,
    /// The matched baseline, or the candidate itself under self-fallback
    pub baseline: &'a BenchmarkSummary,
    /// False when the baseline was synthesized from the candidate
    pub matched: bool,
}

/// Result of matching a candidate set against a baseline set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome<'a> {
    /// Pairs in candidate iteration order
    pub pairs: Vec<MatchedPair<'a>>,
    /// Candidate names dropped under [`UnmatchedPolicy::Skip`]
    pub skipped: Vec<&'a str>,
}

/// Pair every candidate entry with the baseline entry of the same name
///
/// Duplicate baseline names resolve to the last occurrence. Candidates
/// without a baseline are handled according to `policy`.
pub fn match_entries<'a>(
    candidate: &'a MeasurementSet,
    baseline: &'a MeasurementSet,
    policy: UnmatchedPolicy,
) -> MatchOutcome<'a> {
    let index = baseline.index();
    let mut outcome = MatchOutcome {
        pairs: Vec::with_capacity(candidate.len()),
        skipped: Vec::new(),
    };

    for entry in candidate.entries() {
        match (index.get(entry.name.as_str()).copied(), policy) {
            (Some(base), _) => outcome.pairs.push(MatchedPair {
                candidate: entry,
                baseline: base,
                matched: true,
            }),
            (None, UnmatchedPolicy::SelfFallback) => {
                tracing::debug!("No baseline for {}, comparing against itself", entry.name);
                outcome.pairs.push(MatchedPair {
                    candidate: entry,
                    baseline: entry,
                    matched: false,
                });
            }
            (None, UnmatchedPolicy::Skip) => {
                tracing::debug!("No baseline for {}, skipping", entry.name);
                outcome.skipped.push(entry.name.as_str());
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets() -> (MeasurementSet, MeasurementSet) {
        let candidate = MeasurementSet::new(vec![
            BenchmarkSummary::new("zeta", 2.0, 0.1, 5),
            BenchmarkSummary::new("new", 3.0, 0.1, 5),
            BenchmarkSummary::new("alpha", 1.0, 0.1, 5),
        ]);
        let baseline = MeasurementSet::new(vec![
            BenchmarkSummary::new("alpha", 1.1, 0.1, 5),
            BenchmarkSummary::new("zeta", 2.1, 0.1, 5),
            BenchmarkSummary::new("gone", 4.0, 0.1, 5),
        ]);
        (candidate, baseline)
    }

    #[test]
    fn test_skip_drops_unmatched() {
        let (candidate, baseline) = sets();
        let outcome = match_entries(&candidate, &baseline, UnmatchedPolicy::Skip);

        let names: Vec<_> = outcome.pairs.iter().map(|p| p.candidate.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(outcome.skipped, vec!["new"]);
        assert!(outcome.pairs.iter().all(|p| p.matched));
    }

    #[test]
    fn test_self_fallback_keeps_order() {
        let (candidate, baseline) = sets();
        let outcome = match_entries(&candidate, &baseline, UnmatchedPolicy::SelfFallback);

        let names: Vec<_> = outcome.pairs.iter().map(|p| p.candidate.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "new", "alpha"]);
        assert!(outcome.skipped.is_empty());

        let fallback = &outcome.pairs[1];
        assert!(!fallback.matched);
        assert_eq!(fallback.baseline, fallback.candidate);
    }

    #[test]
    fn test_matches_by_exact_name() {
        let (candidate, baseline) = sets();
        let outcome = match_entries(&candidate, &baseline, UnmatchedPolicy::Skip);
        assert_eq!(outcome.pairs[0].baseline.mean, 2.1);
        assert_eq!(outcome.pairs[1].baseline.mean, 1.1);
    }

    #[test]
    fn test_duplicate_baseline_last_wins() {
        let candidate = MeasurementSet::new(vec![BenchmarkSummary::new("a", 1.0, 0.1, 5)]);
        let baseline = MeasurementSet::new(vec![
            BenchmarkSummary::new("a", 5.0, 0.1, 5),
            BenchmarkSummary::new("a", 7.0, 0.1, 5),
        ]);

        let outcome = match_entries(&candidate, &baseline, UnmatchedPolicy::Skip);
        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].baseline.mean, 7.0);
    }

    #[test]
    fn test_empty_candidate() {
        let (_, baseline) = sets();
        let candidate = MeasurementSet::default();
        let outcome = match_entries(&candidate, &baseline, UnmatchedPolicy::SelfFallback);
        assert!(outcome.pairs.is_empty());
        assert!(outcome.skipped.is_empty());
    }
}

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::roster::Roster;
use crate::model::vote::Vote;

/// Summary statistics over the full vote set.
///
/// Recomputed fresh on every request; nothing here is cached or stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_votes: usize,
    /// Count of distinct email addresses among the votes.
    pub unique_voters: usize,
    /// Category ID -> candidate ID -> count. Every known pair is present,
    /// even at zero.
    pub tally: HashMap<String, HashMap<String, u64>>,
}

/// Compute tallies and summary statistics for the given snapshot.
///
/// Selections referencing a category or candidate the roster does not know
/// are skipped without error, so stale records cannot break the dashboard.
pub fn aggregate(roster: &Roster, votes: &[Vote]) -> AggregateStats {
    let mut tally: HashMap<String, HashMap<String, u64>> = roster
        .categories
        .iter()
        .map(|category| {
            let zeroes = roster
                .candidates
                .iter()
                .map(|candidate| (candidate.id.clone(), 0))
                .collect();
            (category.id.clone(), zeroes)
        })
        .collect();

    for vote in votes {
        for (category_id, candidate_id) in &vote.selections {
            if let Some(count) = tally
                .get_mut(category_id)
                .and_then(|counts| counts.get_mut(candidate_id))
            {
                *count += 1;
            }
        }
    }

    let unique_voters = votes
        .iter()
        .map(|vote| vote.voter.email.as_str())
        .collect::<HashSet<_>>()
        .len();

    AggregateStats {
        total_votes: votes.len(),
        unique_voters,
        tally,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn vote_for(email: &str, phone: &str, selections: &[(&str, &str)]) -> Vote {
        let mut vote = Vote::example_at("203.0.113.7", Utc.with_ymd_and_hms(2025, 7, 4, 20, 0, 0).unwrap());
        vote.voter.email = email.to_string();
        vote.voter.phone = phone.to_string();
        vote.selections = selections
            .iter()
            .map(|(cat, cand)| (cat.to_string(), cand.to_string()))
            .collect();
        vote
    }

    #[test]
    fn empty_snapshot_has_full_zero_tally() {
        let roster = Roster::example();
        let stats = aggregate(&roster, &[]);

        assert_eq!(0, stats.total_votes);
        assert_eq!(0, stats.unique_voters);
        assert_eq!(roster.categories.len(), stats.tally.len());
        for category in &roster.categories {
            let counts = &stats.tally[&category.id];
            assert_eq!(roster.candidates.len(), counts.len());
            assert!(counts.values().all(|&count| count == 0));
        }
    }

    #[test]
    fn per_category_sums_count_valid_selections_only() {
        let roster = Roster::example();
        let votes = vec![
            vote_for(
                "a@example.com",
                "0000000001",
                &[("best_performance", "og_kane"), ("crowd_favorite", "burn_ice")],
            ),
            vote_for(
                "b@example.com",
                "0000000002",
                &[("best_performance", "og_kane")],
            ),
            // Unknown candidate and unknown category are both skipped.
            vote_for(
                "c@example.com",
                "0000000003",
                &[("best_performance", "nobody"), ("best_hairdo", "og_kane")],
            ),
        ];

        let stats = aggregate(&roster, &votes);

        assert_eq!(3, stats.total_votes);
        assert_eq!(2, stats.tally["best_performance"]["og_kane"]);
        assert_eq!(1, stats.tally["crowd_favorite"]["burn_ice"]);
        // The malformed record contributes to no category sum.
        let performance_sum: u64 = stats.tally["best_performance"].values().sum();
        let favorite_sum: u64 = stats.tally["crowd_favorite"].values().sum();
        assert_eq!(2, performance_sum);
        assert_eq!(1, favorite_sum);
        // Unknown IDs never grow the tally shape.
        assert!(!stats.tally.contains_key("best_hairdo"));
        assert!(!stats.tally["best_performance"].contains_key("nobody"));
    }

    #[test]
    fn unique_voters_counts_distinct_emails() {
        let roster = Roster::example();
        let votes = vec![
            vote_for("same@example.com", "0000000001", &[]),
            vote_for("same@example.com", "0000000002", &[]),
            vote_for("other@example.com", "0000000002", &[]),
        ];

        let stats = aggregate(&roster, &votes);

        assert_eq!(3, stats.total_votes);
        // Repeated email counted once; repeated phone is irrelevant here.
        assert_eq!(2, stats.unique_voters);
    }
}

use std::collections::HashMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::model::store::Id;
use crate::model::vote::Vote;

/// Gap below which two consecutive submissions from one origin are suspicious.
pub const RAPID_SUBMISSION_MILLIS: i64 = 2000;

/// Submissions from a single origin beyond this count get flagged.
pub const ORIGIN_VOLUME_LIMIT: usize = 2;

/// How strongly a heuristic considers a vote suspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A heuristic annotation on a vote. Advisory only: a flagged vote stays in
/// the tally, and flags are recomputed on every request rather than stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FraudFlag {
    pub vote_id: Id,
    pub reason: String,
    pub severity: Severity,
}

/// Scan a snapshot of the vote set for suspicious submission patterns.
///
/// Votes are walked in submission-time order (stable, so equal timestamps
/// keep their input order). Two independent checks run per vote:
///
/// - origin volume: the 3rd and later vote from one origin address is
///   flagged at medium severity;
/// - velocity: a vote arriving strictly under 2 seconds after the previous
///   vote in the ordering, from the same origin, is flagged at high severity.
///
/// Both can land on the same vote. False positives are expected, e.g. many
/// legitimate voters behind one shared network origin.
pub fn detect_fraud(votes: &[Vote]) -> HashMap<Id, Vec<FraudFlag>> {
    let mut ordered: Vec<&Vote> = votes.iter().collect();
    ordered.sort_by_key(|vote| vote.submitted_at);

    let mut flags: HashMap<Id, Vec<FraudFlag>> = HashMap::new();
    let mut origin_counts: HashMap<&str, usize> = HashMap::new();

    for (index, vote) in ordered.iter().enumerate() {
        let seen = origin_counts
            .entry(vote.origin_address.as_str())
            .or_insert(0);
        *seen += 1;
        if *seen > ORIGIN_VOLUME_LIMIT {
            flags.entry(vote.id).or_default().push(FraudFlag {
                vote_id: vote.id,
                reason: "High volume from single origin".to_string(),
                severity: Severity::Medium,
            });
        }

        if index > 0 {
            let previous = ordered[index - 1];
            let gap = vote.submitted_at - previous.submitted_at;
            if gap < Duration::milliseconds(RAPID_SUBMISSION_MILLIS)
                && vote.origin_address == previous.origin_address
            {
                flags.entry(vote.id).or_default().push(FraudFlag {
                    vote_id: vote.id,
                    reason: "Suspiciously rapid submission".to_string(),
                    severity: Severity::High,
                });
            }
        }
    }

    flags
}

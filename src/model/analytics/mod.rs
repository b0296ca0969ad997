//! Pure derived views over a snapshot of the vote set: tallies, fraud
//! heuristics and the CSV export. Nothing in here touches the store or keeps
//! state between invocations.

pub mod export;
pub mod fraud;
pub mod stats;

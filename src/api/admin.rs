use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rocket::{http::Header, serde::json::Json, Responder, Route, State};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{
    analytics::{
        export::{export_filename, render_csv},
        fraud::{detect_fraud, FraudFlag, Severity},
        stats::{aggregate, AggregateStats},
    },
    auth::AdminToken,
    roster::Roster,
    store::SharedVoteStore,
    vote::{Vote, VoterInfo},
};

pub fn routes() -> Vec<Route> {
    routes![stats, votes, fraud, export, reset]
}

/// A vote as presented on the dashboard.
#[derive(Debug, Serialize, Deserialize)]
struct VoteDetails {
    id: String,
    voter: VoterInfo,
    selections: HashMap<String, String>,
    submitted_at: DateTime<Utc>,
    origin_address: String,
    client_signature: String,
}

impl From<Vote> for VoteDetails {
    fn from(vote: Vote) -> Self {
        Self {
            id: vote.id.to_string(),
            voter: vote.vote.voter,
            selections: vote.vote.selections,
            submitted_at: vote.vote.submitted_at,
            origin_address: vote.vote.origin_address,
            client_signature: vote.vote.client_signature,
        }
    }
}

/// A fraud flag as presented on the dashboard.
#[derive(Debug, Serialize, Deserialize)]
struct FlagDetails {
    vote_id: String,
    reason: String,
    severity: Severity,
}

impl From<FraudFlag> for FlagDetails {
    fn from(flag: FraudFlag) -> Self {
        Self {
            vote_id: flag.vote_id.to_string(),
            reason: flag.reason,
            severity: flag.severity,
        }
    }
}

#[get("/admin/stats")]
async fn stats(
    _token: AdminToken,
    roster: &State<Roster>,
    store: &State<SharedVoteStore>,
) -> Result<Json<AggregateStats>> {
    let votes = store.list_all().await?;
    Ok(Json(aggregate(roster, &votes)))
}

#[get("/admin/votes")]
async fn votes(
    _token: AdminToken,
    store: &State<SharedVoteStore>,
) -> Result<Json<Vec<VoteDetails>>> {
    let votes = store.list_all().await?;
    Ok(Json(votes.into_iter().map(VoteDetails::from).collect()))
}

#[get("/admin/fraud")]
async fn fraud(
    _token: AdminToken,
    store: &State<SharedVoteStore>,
) -> Result<Json<HashMap<String, Vec<FlagDetails>>>> {
    let votes = store.list_all().await?;
    let flagged = detect_fraud(&votes)
        .into_iter()
        .map(|(id, flags)| {
            (
                id.to_string(),
                flags.into_iter().map(FlagDetails::from).collect(),
            )
        })
        .collect();
    Ok(Json(flagged))
}

/// A CSV download with a dated attachment filename.
#[derive(Responder)]
#[response(content_type = "text/csv")]
struct CsvExport {
    content: String,
    disposition: Header<'static>,
}

impl CsvExport {
    fn new(filename: String, content: String) -> Self {
        Self {
            content,
            disposition: Header::new(
                "Content-Disposition",
                format!("attachment; filename=\"{filename}\""),
            ),
        }
    }
}

#[get("/admin/votes/export")]
async fn export(
    _token: AdminToken,
    roster: &State<Roster>,
    store: &State<SharedVoteStore>,
) -> Result<CsvExport> {
    let votes = store.list_all().await?;
    let filename = export_filename(Utc::now().date_naive());
    Ok(CsvExport::new(filename, render_csv(roster, &votes)))
}

/// Irreversibly remove every vote. The two-step confirmation lives in the
/// dashboard frontend; by the time this endpoint is hit the decision is made.
#[delete("/admin/votes")]
async fn reset(_token: AdminToken, store: &State<SharedVoteStore>) -> Result<()> {
    let deleted = store.delete_all().await?;
    warn!("Poll reset: deleted {deleted} votes");
    Ok(())
}

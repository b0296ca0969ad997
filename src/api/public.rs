use std::collections::HashMap;

use chrono::Utc;
use rocket::{
    request::{self, FromRequest, Request},
    serde::json::Json,
    Route, State,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};
use crate::model::{
    roster::Roster,
    store::{SharedVoteStore, VoteField},
    vote::{NewVote, VoterInfo},
};

pub fn routes() -> Vec<Route> {
    routes![get_roster, submit_vote]
}

/// Placeholder recorded when client metadata cannot be determined.
const UNKNOWN: &str = "unknown";

/// The candidate and category sets the voting form renders.
#[get("/roster")]
fn get_roster(roster: &State<Roster>) -> Json<Roster> {
    Json(roster.inner().clone())
}

/// A complete ballot as submitted by the voting form.
#[derive(Debug, Deserialize)]
struct BallotForm {
    voter: VoterInfo,
    /// Category ID -> candidate ID; must cover every category.
    selections: HashMap<String, String>,
}

/// Best-effort client metadata attached to each accepted vote.
struct ClientMeta {
    origin_address: String,
    client_signature: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientMeta {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let origin_address = req
            .client_ip()
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let client_signature = req
            .headers()
            .get_one("User-Agent")
            .unwrap_or(UNKNOWN)
            .to_string();
        request::Outcome::Success(ClientMeta {
            origin_address,
            client_signature,
        })
    }
}

#[derive(Debug, Serialize)]
struct SubmittedVote {
    id: String,
}

#[post("/votes", data = "<ballot>", format = "json")]
async fn submit_vote(
    ballot: Json<BallotForm>,
    meta: ClientMeta,
    roster: &State<Roster>,
    store: &State<SharedVoteStore>,
) -> Result<Json<SubmittedVote>> {
    let ballot = ballot.0;

    // Field-level validation; nothing malformed reaches the store.
    ballot.voter.validate()?;

    // Exactly one known candidate for every known category.
    for category in &roster.categories {
        match ballot.selections.get(&category.id) {
            None => {
                return Err(Error::unprocessable(format!(
                    "No selection for category '{}'",
                    category.title
                )));
            }
            Some(candidate_id) if roster.candidate(candidate_id).is_none() => {
                return Err(Error::unprocessable(format!(
                    "Unknown candidate '{}' for category '{}'",
                    candidate_id, category.title
                )));
            }
            Some(_) => {}
        }
    }
    if let Some(unknown) = ballot
        .selections
        .keys()
        .find(|id| roster.category(id).is_none())
    {
        return Err(Error::unprocessable(format!("Unknown category '{unknown}'")));
    }

    // Optimistic duplicate check, one query and one message per field.
    // Racy against concurrent submissions; the store's unique indexes are
    // the final authority.
    if store
        .find_by_field(VoteField::Email, &ballot.voter.email)
        .await?
        .is_some()
    {
        return Err(Error::bad_request("This email address has already voted."));
    }
    if store
        .find_by_field(VoteField::Phone, &ballot.voter.phone)
        .await?
        .is_some()
    {
        return Err(Error::bad_request("This phone number has already been used."));
    }

    let vote = NewVote {
        voter: ballot.voter,
        selections: ballot.selections,
        submitted_at: Utc::now(),
        origin_address: meta.origin_address,
        client_signature: meta.client_signature,
    };
    let id = store.insert(vote).await?;
    info!("Accepted vote {id}");

    Ok(Json(SubmittedVote { id: id.to_string() }))
}

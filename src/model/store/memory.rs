use std::cmp::Reverse;
use std::sync::Mutex;

use crate::error::Result;
use crate::model::vote::{NewVote, Vote};

use super::{Id, VoteField, VoteStore};

/// In-memory stand-in for the MongoDB store, mirroring its observable
/// behaviour (newest-first listing, exact-match field lookup).
#[derive(Default)]
pub struct MemoryVoteStore {
    votes: Mutex<Vec<Vote>>,
}

#[rocket::async_trait]
impl VoteStore for MemoryVoteStore {
    async fn insert(&self, vote: NewVote) -> Result<Id> {
        let id = Id::new();
        self.votes.lock().unwrap().push(Vote { id, vote });
        Ok(id)
    }

    async fn find_by_field(&self, field: VoteField, value: &str) -> Result<Option<Vote>> {
        let votes = self.votes.lock().unwrap();
        let found = votes
            .iter()
            .find(|vote| {
                let stored = match field {
                    VoteField::Email => &vote.voter.email,
                    VoteField::Phone => &vote.voter.phone,
                };
                stored == value
            })
            .cloned();
        Ok(found)
    }

    async fn list_all(&self) -> Result<Vec<Vote>> {
        let mut votes = self.votes.lock().unwrap().clone();
        votes.sort_by_key(|vote| Reverse(vote.submitted_at));
        Ok(votes)
    }

    async fn delete_all(&self) -> Result<u64> {
        let mut votes = self.votes.lock().unwrap();
        let deleted = votes.len() as u64;
        votes.clear();
        Ok(deleted)
    }
}

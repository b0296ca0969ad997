use std::fmt::{self, Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::vote::{NewVote, Vote};

#[cfg(test)]
pub mod memory;
pub mod mongo;

/// Unique identifier of a stored vote, assigned by the store.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id(ObjectId);

impl Id {
    pub fn new() -> Self {
        Self(ObjectId::new())
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Id {
    type Target = ObjectId;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<ObjectId> for Id {
    fn from(id: ObjectId) -> Self {
        Self(id)
    }
}

impl FromStr for Id {
    type Err = mongodb::bson::oid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse::<ObjectId>()?))
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Voter fields subject to the uniqueness invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteField {
    Email,
    Phone,
}

/// The narrow persistence surface consumed by the submission path and the
/// analytics endpoints. Production uses [`mongo::MongoVoteStore`]; tests run
/// against [`memory::MemoryVoteStore`] so no live database is needed.
#[rocket::async_trait]
pub trait VoteStore: Send + Sync {
    /// Insert exactly one new vote, returning its store-assigned ID.
    async fn insert(&self, vote: NewVote) -> Result<Id>;

    /// Find a vote whose voter field exactly equals the given value.
    async fn find_by_field(&self, field: VoteField, value: &str) -> Result<Option<Vote>>;

    /// Every vote, ordered by submission time descending.
    async fn list_all(&self) -> Result<Vec<Vote>>;

    /// Irreversibly delete every vote, returning how many were removed.
    async fn delete_all(&self) -> Result<u64>;
}

/// The store as placed in Rocket managed state.
pub type SharedVoteStore = Arc<dyn VoteStore>;

use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Collection, Database, IndexModel,
};
use rocket::futures::TryStreamExt;

use crate::error::Result;
use crate::model::vote::{NewVote, Vote};

use super::{Id, VoteField, VoteStore};

const VOTES: &str = "votes";

/// Document path of a uniqueness-checked voter field.
fn field_key(field: VoteField) -> &'static str {
    match field {
        VoteField::Email => "voter.email",
        VoteField::Phone => "voter.phone",
    }
}

/// The production vote store, backed by a MongoDB collection.
pub struct MongoVoteStore {
    votes: Collection<Vote>,
    new_votes: Collection<NewVote>,
}

impl MongoVoteStore {
    /// Get a handle on the vote collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self {
            votes: db.collection(VOTES),
            new_votes: db.collection(VOTES),
        }
    }
}

#[rocket::async_trait]
impl VoteStore for MongoVoteStore {
    async fn insert(&self, vote: NewVote) -> Result<Id> {
        let id = self
            .new_votes
            .insert_one(vote, None)
            .await?
            .inserted_id
            .as_object_id()
            .unwrap(); // Valid because the driver always assigns an ObjectId.
        Ok(id.into())
    }

    async fn find_by_field(&self, field: VoteField, value: &str) -> Result<Option<Vote>> {
        let filter = doc! { field_key(field): value };
        Ok(self.votes.find_one(filter, None).await?)
    }

    async fn list_all(&self) -> Result<Vec<Vote>> {
        let newest_first = FindOptions::builder()
            .sort(doc! { "submitted_at": -1 })
            .build();
        let votes = self.votes.find(None, newest_first).await?.try_collect().await?;
        Ok(votes)
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = self.votes.delete_many(doc! {}, None).await?;
        Ok(result.deleted_count)
    }
}

/// Ensure the unique indexes backing the duplicate guard exist.
///
/// This operation is idempotent. The submission path's check-then-insert is
/// racy under concurrent submissions; these indexes are the final authority
/// on the email/phone uniqueness invariant.
pub async fn ensure_indexes_exist(db: &Database) -> Result<()> {
    debug!("Ensuring vote collection indexes exist");

    let unique = IndexOptions::builder().unique(true).build();
    let votes: Collection<Vote> = db.collection(VOTES);
    for key in ["voter.email", "voter.phone"] {
        let index = IndexModel::builder()
            .keys(doc! { key: 1 })
            .options(unique.clone())
            .build();
        votes.create_index(index, None).await?;
    }

    Ok(())
}

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::model::store::Id;

/// Shortest phone number the voting form accepts.
pub const MIN_PHONE_DIGITS: usize = 10;

/// How the voter is taking part in the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoterClassification {
    Attending,
    SupportingOnline,
    ArtistOrTeam,
}

impl VoterClassification {
    /// Display label, as shown on the form and in exports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Attending => "Attending the award show",
            Self::SupportingOnline => "Supporting online",
            Self::ArtistOrTeam => "Artist / Team member",
        }
    }
}

/// Identity of a voter exactly as they submitted it. Never mutated once
/// accepted; the email and phone fields carry the uniqueness invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct VoterInfo {
    #[validate(length(min = 1, message = "Full name must not be empty"))]
    pub full_name: String,
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    #[validate(custom(function = validate_phone))]
    pub phone: String,
    pub classification: VoterClassification,
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() >= MIN_PHONE_DIGITS && phone.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        let mut error = ValidationError::new("phone");
        error.message = Some("Phone number must be at least 10 digits".into());
        Err(error)
    }
}

/// Core vote data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCore {
    pub voter: VoterInfo,
    /// Maps category IDs to the selected candidate ID.
    pub selections: HashMap<String, String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub submitted_at: DateTime<Utc>,
    /// Caller network origin, best-effort; may be a placeholder.
    pub origin_address: String,
    /// Caller agent string, best-effort; may be a placeholder.
    pub client_signature: String,
}

/// A vote without an ID.
pub type NewVote = VoteCore;

/// A vote from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub vote: VoteCore,
}

impl Deref for Vote {
    type Target = VoteCore;

    fn deref(&self) -> &Self::Target {
        &self.vote
    }
}

impl DerefMut for Vote {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.vote
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use chrono::TimeZone;

    use crate::model::roster::Roster;

    use super::*;

    impl VoterInfo {
        pub fn example() -> Self {
            Self {
                full_name: "Jordan Reyes".to_string(),
                email: "jordan.reyes@example.com".to_string(),
                phone: "07700900123".to_string(),
                classification: VoterClassification::Attending,
            }
        }
    }

    impl VoteCore {
        /// A valid vote against [`Roster::example`].
        pub fn example() -> Self {
            Self {
                voter: VoterInfo::example(),
                selections: Roster::example()
                    .categories
                    .iter()
                    .map(|cat| (cat.id.clone(), "og_kane".to_string()))
                    .collect(),
                submitted_at: Utc.with_ymd_and_hms(2025, 7, 4, 20, 0, 0).unwrap(),
                origin_address: "203.0.113.7".to_string(),
                client_signature: "Mozilla/5.0 (X11; Linux x86_64)".to_string(),
            }
        }
    }

    impl Vote {
        /// A vote from the given origin at the given time. All calls share
        /// the same voter identity.
        pub fn example_at(origin: &str, submitted_at: DateTime<Utc>) -> Self {
            let mut core = VoteCore::example();
            core.origin_address = origin.to_string();
            core.submitted_at = submitted_at;
            Self {
                id: Id::new(),
                vote: core,
            }
        }
    }
}

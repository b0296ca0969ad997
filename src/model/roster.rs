use serde::{Deserialize, Serialize};

/// An artist that can be voted for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
}

/// An award category on the ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
}

/// The fixed candidate and category reference sets for the event.
///
/// Loaded once at startup and placed in managed state; the engines receive it
/// by reference and never mutate it. Category order here is the column order
/// of the CSV export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub candidates: Vec<Candidate>,
    pub categories: Vec<Category>,
}

impl Roster {
    /// Look up a candidate by ID.
    pub fn candidate(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|candidate| candidate.id == id)
    }

    /// Look up a category by ID.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// The line-up for the current season.
    pub fn standard() -> Self {
        Self {
            candidates: [
                ("og_kane", "OG Kane"),
                ("burn_ice", "Burn Ice"),
                ("king_enjel", "King Enjel"),
                ("freeup", "FreeUp"),
                ("izzy_lyrics", "Izzy Lyrics"),
                ("trae_reed", "Trae Reed"),
                ("wolf", "Wolf"),
                ("yulla", "Yulla"),
                ("ru_dapaperboy", "RU DaPaperBoy"),
                ("darel_jr", "DA'REL J.R."),
                ("ace_lee", "AceLee"),
                ("stonie500", "Stonie500"),
            ]
            .into_iter()
            .map(|(id, name)| Candidate {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect(),
            categories: [
                ("best_performance", "Best Performance"),
                ("best_stage_presence", "Best Stage Presence"),
                ("crowd_favorite", "Crowd Favorite"),
                ("best_lyrics_bars", "Best Lyrics & Bars"),
                ("artist_of_season", "Artist of the Season"),
            ]
            .into_iter()
            .map(|(id, title)| Category {
                id: id.to_string(),
                title: title.to_string(),
            })
            .collect(),
        }
    }
}

use chrono::NaiveDate;

use crate::model::roster::Roster;
use crate::model::vote::Vote;

/// Marker emitted for a selection that is missing or cannot be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// Fixed columns preceding the per-category columns.
const FIXED_COLUMNS: [&str; 7] = [
    "Vote ID",
    "Timestamp",
    "Full Name",
    "Email",
    "Phone",
    "Voter Type",
    "Origin Address",
];

/// Name for the downloaded file, embedding the export date.
pub fn export_filename(date: NaiveDate) -> String {
    format!("rooftop-votes-{}.csv", date.format("%Y-%m-%d"))
}

/// Render the vote set as CSV: a header row, then one row per vote in the
/// order given (callers wanting a particular order sort first).
///
/// Candidate IDs are resolved to display names through the roster, falling
/// back to [`NOT_AVAILABLE`]. Free-text columns are always quoted, the rest
/// only when they contain a delimiter, quote or line break, so the output
/// survives any standard CSV reader.
pub fn render_csv(roster: &Roster, votes: &[Vote]) -> String {
    let mut rows = Vec::with_capacity(votes.len() + 1);

    let mut header: Vec<String> = FIXED_COLUMNS.iter().map(|col| encode(col)).collect();
    header.extend(roster.categories.iter().map(|cat| encode(&cat.title)));
    rows.push(header.join(","));

    for vote in votes {
        let mut row = vec![
            encode(&vote.id.to_string()),
            encode(&vote.submitted_at.to_rfc3339()),
            quote(&vote.voter.full_name),
            encode(&vote.voter.email),
            encode(&vote.voter.phone),
            encode(vote.voter.classification.label()),
            encode(&vote.origin_address),
        ];
        for category in &roster.categories {
            let name = vote
                .selections
                .get(&category.id)
                .and_then(|candidate_id| roster.candidate(candidate_id));
            row.push(match name {
                Some(candidate) => quote(&candidate.name),
                None => NOT_AVAILABLE.to_string(),
            });
        }
        rows.push(row.join(","));
    }

    rows.push(String::new()); // trailing newline
    rows.join("\n")
}

/// Quote a field only if it needs it.
fn encode(field: &str) -> String {
    if field.contains(|c| matches!(c, ',' | '"' | '\n' | '\r')) {
        quote(field)
    } else {
        field.to_string()
    }
}

/// Quote a field unconditionally, doubling embedded quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    /// Minimal conforming CSV reader, enough to prove the output re-parses.
    fn parse_csv(input: &str) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        let mut row = Vec::new();
        let mut field = String::new();
        let mut quoted = false;
        let mut chars = input.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '"' if quoted => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        quoted = false;
                    }
                }
                '"' if field.is_empty() => quoted = true,
                ',' if !quoted => {
                    row.push(std::mem::take(&mut field));
                }
                '\n' if !quoted => {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                _ => field.push(c),
            }
        }
        if !field.is_empty() || !row.is_empty() {
            row.push(field);
            rows.push(row);
        }
        rows
    }

    fn example_votes() -> Vec<Vote> {
        let mut first = Vote::example_at(
            "203.0.113.7",
            Utc.with_ymd_and_hms(2025, 7, 4, 20, 0, 0).unwrap(),
        );
        first.voter.full_name = "Reyes, Jordan \"JJ\"".to_string();
        first.selections = [
            ("best_performance", "night_shift"),
            ("crowd_favorite", "og_kane"),
        ]
        .into_iter()
        .map(|(cat, cand)| (cat.to_string(), cand.to_string()))
        .collect();

        let mut second = Vote::example_at(
            "203.0.113.8",
            Utc.with_ymd_and_hms(2025, 7, 4, 20, 5, 0).unwrap(),
        );
        // No crowd_favorite selection, and a candidate the roster dropped.
        second.selections = [("best_performance", "retired_artist")]
            .into_iter()
            .map(|(cat, cand)| (cat.to_string(), cand.to_string()))
            .collect();

        vec![first, second]
    }

    #[test]
    fn output_reparses_with_header_and_one_row_per_vote() {
        let roster = Roster::example();
        let votes = example_votes();

        let parsed = parse_csv(&render_csv(&roster, &votes));

        assert_eq!(1 + votes.len(), parsed.len());
        let header = &parsed[0];
        assert_eq!(
            FIXED_COLUMNS.len() + roster.categories.len(),
            header.len()
        );
        assert_eq!("Vote ID", header[0]);
        assert_eq!("Best Performance", header[FIXED_COLUMNS.len()]);
        for row in &parsed[1..] {
            assert_eq!(header.len(), row.len());
        }
    }

    #[test]
    fn cells_decode_back_to_source_fields() {
        let roster = Roster::example();
        let votes = example_votes();

        let parsed = parse_csv(&render_csv(&roster, &votes));

        let first = &parsed[1];
        assert_eq!(votes[0].id.to_string(), first[0]);
        assert_eq!(votes[0].submitted_at.to_rfc3339(), first[1]);
        // Embedded comma and quotes survive the round trip.
        assert_eq!("Reyes, Jordan \"JJ\"", first[2]);
        assert_eq!(votes[0].voter.email, first[3]);
        assert_eq!(votes[0].voter.phone, first[4]);
        assert_eq!("Attending the award show", first[5]);
        assert_eq!("203.0.113.7", first[6]);
        // Candidate IDs resolved to display names, comma included.
        assert_eq!("Night Shift, Day Off", first[7]);
        assert_eq!("OG Kane", first[8]);
    }

    #[test]
    fn unresolvable_selections_emit_the_not_available_marker() {
        let roster = Roster::example();
        let votes = example_votes();

        let parsed = parse_csv(&render_csv(&roster, &votes));

        let second = &parsed[2];
        // Unknown candidate ID and missing selection both render as N/A.
        assert_eq!(NOT_AVAILABLE, second[7]);
        assert_eq!(NOT_AVAILABLE, second[8]);
    }

    #[test]
    fn input_order_is_preserved() {
        let roster = Roster::example();
        let mut votes = example_votes();
        votes.reverse();

        let parsed = parse_csv(&render_csv(&roster, &votes));

        assert_eq!(votes[0].id.to_string(), parsed[1][0]);
        assert_eq!(votes[1].id.to_string(), parsed[2][0]);
    }

    #[test]
    fn filename_embeds_the_date() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        assert_eq!("rooftop-votes-2025-07-04.csv", export_filename(date));
    }
}

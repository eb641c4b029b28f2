//! Candidate path resolution
//!
//! Records arrive with legacy shapes: the same fact may sit at
//! `propertyDetails.squareFeet`, `squareFeet` or `square_feet` depending on
//! which backend version produced it. Resolution walks an ordered list of
//! candidate paths and returns the first value that is present.

use serde_json::Value;
use tracing::trace;

use super::FieldPath;
use crate::constants::PATH_SEPARATOR;

/// Resolve the first candidate path holding a non-null value
///
/// A candidate is abandoned as soon as a segment is missing or a traversed
/// value is `null`. Falsy values (`0`, `false`, `""`) count as found.
pub fn resolve<'a>(record: &'a Value, candidates: &[FieldPath]) -> Option<&'a Value> {
    candidates
        .iter()
        .find_map(|candidate| lookup_segments(record, candidate.segments()))
}

/// Resolve raw dotted strings; malformed candidates are skipped
pub fn resolve_str<'a>(record: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    candidates
        .iter()
        .filter(|candidate| !candidate.is_empty())
        .find_map(|candidate| lookup_segments(record, candidate.split(PATH_SEPARATOR)))
}

/// Look up a single path, treating `null` as absent
pub fn lookup<'a>(record: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    lookup_segments(record, path.segments())
}

fn lookup_segments<'a, 's>(
    record: &'a Value,
    segments: impl Iterator<Item = &'s str>,
) -> Option<&'a Value> {
    let mut current = record;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            // Support array indexing like "people.buyers.0"
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => {
                trace!("path walk stopped at scalar before segment '{segment}'");
                return None;
            }
        };
        if current.is_null() {
            return None;
        }
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn paths(raw: &[&str]) -> Vec<FieldPath> {
        raw.iter().map(|p| FieldPath::parse(p).unwrap()).collect()
    }

    #[test]
    fn test_skips_missing_candidate() {
        let record = json!({ "a": { "b": 1 } });
        assert_eq!(resolve(&record, &paths(&["x.y", "a.b"])), Some(&json!(1)));
    }

    #[test]
    fn test_falsy_but_defined_short_circuits() {
        let record = json!({ "a": { "b": false, "c": 5 } });
        assert_eq!(resolve(&record, &paths(&["a.b", "a.c"])), Some(&json!(false)));

        let zero = json!({ "price": 0, "legacy_price": 10 });
        assert_eq!(
            resolve(&zero, &paths(&["price", "legacy_price"])),
            Some(&json!(0))
        );

        let empty = json!({ "name": "", "legacy_name": "x" });
        assert_eq!(
            resolve(&empty, &paths(&["name", "legacy_name"])),
            Some(&json!(""))
        );
    }

    #[test]
    fn test_null_continues_search() {
        let record = json!({ "zipCode": null, "zip_code": "92101" });
        assert_eq!(
            resolve(&record, &paths(&["zipCode", "zip_code"])),
            Some(&json!("92101"))
        );

        let null_parent = json!({ "timeline": null, "closing_date": "2025-01-31" });
        assert_eq!(
            resolve(&null_parent, &paths(&["timeline.closingDate", "closing_date"])),
            Some(&json!("2025-01-31"))
        );
    }

    #[test]
    fn test_exhausted_candidates_return_none() {
        let record = json!({ "a": { "b": null } });
        assert!(resolve(&record, &paths(&["a.b", "a.c", "z"])).is_none());
        assert!(resolve(&record, &[]).is_none());
    }

    #[test]
    fn test_scalar_in_the_middle_abandons_candidate() {
        let record = json!({ "people": { "listingAgent": "Dana" } });
        assert!(lookup(&record, &FieldPath::parse("people.listingAgent.name").unwrap()).is_none());
    }

    #[test]
    fn test_array_index_segments() {
        let record = json!({ "people": { "buyers": ["Ana", "Ben"] } });
        assert_eq!(
            resolve_str(&record, &["people.buyers.1"]),
            Some(&json!("Ben"))
        );
        assert!(resolve_str(&record, &["people.buyers.9", "people.buyers.first"]).is_none());
    }

    #[test]
    fn test_resolve_str_skips_malformed_candidates() {
        let record = json!({ "a": { "b": 1 } });
        assert_eq!(resolve_str(&record, &["", "a..b", "a.b"]), Some(&json!(1)));
    }

    #[test]
    fn test_resolve_does_not_mutate() {
        let record = json!({ "a": { "b": [1, 2, 3] } });
        let snapshot = record.clone();
        let _ = resolve(&record, &paths(&["a.b.2", "a"]));
        assert_eq!(record, snapshot);
    }
}

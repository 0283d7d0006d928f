//! Storage key/path conventions.
//!
//! Pure string functions with no AWS SDK dependency. These define the canonical
//! layout of objects in the PIA bucket.

/// One JSON bundle per assessment: the record plus its answers, measures and
/// evaluations. Keeping them in a single object makes a bundle write atomic.
pub fn assessment(id: u64) -> String {
    format!("pias/{id}.json")
}

pub const ASSESSMENTS_PREFIX: &str = "pias/";

/// Revisions live under their assessment's prefix. Ids are zero-padded so
/// that a prefix listing returns them in creation order.
pub fn revision(pia_id: u64, id: u64) -> String {
    format!("{}{id:012}.json", revisions_prefix(pia_id))
}

/// The trailing slash keeps assessment 1 from matching assessment 12.
pub fn revisions_prefix(pia_id: u64) -> String {
    format!("revisions/{pia_id}/")
}

/// Points a revision id at its owning assessment, so a revision can be
/// found by id alone.
pub fn revision_locator(id: u64) -> String {
    format!("revision-ids/{id:012}.json")
}

pub const SEQUENCES: &str = "_state/sequences.json";

/// Parse the numeric id back out of an assessment or revision key.
pub fn id_from_key(key: &str) -> Option<u64> {
    key.rsplit('/')
        .next()?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_keys_sort_by_id() {
        let mut keys = vec![revision(1, 10), revision(1, 9), revision(1, 100)];
        keys.sort();
        assert_eq!(keys, vec![revision(1, 9), revision(1, 10), revision(1, 100)]);
    }

    #[test]
    fn revision_prefixes_do_not_overlap() {
        assert!(revision(1, 5).starts_with(&revisions_prefix(1)));
        assert!(!revision(12, 5).starts_with(&revisions_prefix(1)));
        assert!(!revision_locator(5).starts_with(&revisions_prefix(1)));
        assert!(!revision_locator(5).starts_with(ASSESSMENTS_PREFIX));
    }

    #[test]
    fn ids_round_trip_through_keys() {
        assert_eq!(id_from_key(&assessment(42)), Some(42));
        assert_eq!(id_from_key(&revision(3, 7)), Some(7));
        assert_eq!(id_from_key(&revision_locator(7)), Some(7));
        assert_eq!(id_from_key(SEQUENCES), None);
    }
}

use std::cmp::Ordering;
use std::sync::LazyLock;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed};

use serde::{Deserialize, Serialize};

use pia_aggregate::progress;
use pia_core::models::assessment::{Assessment, AssessmentStatus};
use pia_storage::{ArchiveFilter, PiaStore};

use crate::error::ServiceError;
use crate::lifecycle::AssessmentManager;
use crate::preferences::{Preferences, SortKey, SortOrder};

/// Which assessments a listing shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingMode {
    #[default]
    Active,
    Archived,
}

impl ListingMode {
    fn filter(self) -> ArchiveFilter {
        match self {
            Self::Active => ArchiveFilter::Active,
            Self::Archived => ArchiveFilter::Archived,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingEntry {
    pub assessment: Assessment,
    /// Completion percentage, 0 to 100.
    pub progress: u8,
}

/// The value a [`SortKey`] reads off an assessment.
#[derive(Debug, Clone, Copy)]
enum SortValue<'a> {
    Text(&'a str),
    Instant(jiff::Timestamp),
    Status(AssessmentStatus),
}

impl SortKey {
    fn value(self, assessment: &Assessment) -> SortValue<'_> {
        match self {
            Self::Name => SortValue::Text(&assessment.name),
            Self::AuthorName => SortValue::Text(&assessment.author_name),
            Self::EvaluatorName => SortValue::Text(&assessment.evaluator_name),
            Self::ValidatorName => SortValue::Text(&assessment.validator_name),
            Self::CreatedAt => SortValue::Instant(assessment.created_at),
            Self::UpdatedAt => SortValue::Instant(assessment.updated_at),
            Self::Status => SortValue::Status(assessment.status),
        }
    }

    /// Ascending comparison of two assessments on this key.
    pub fn compare(self, a: &Assessment, b: &Assessment) -> Ordering {
        match (self.value(a), self.value(b)) {
            (SortValue::Text(a), SortValue::Text(b)) => locale_compare(a, b),
            (SortValue::Instant(a), SortValue::Instant(b)) => a.cmp(&b),
            (SortValue::Status(a), SortValue::Status(b)) => a.cmp(&b),
            // A key always yields the same variant for both sides.
            _ => Ordering::Equal,
        }
    }
}

/// Root-locale collator. Accented letters sort with their base letter and,
/// at equal base letters, lowercase sorts before uppercase.
static COLLATOR: LazyLock<Option<CollatorBorrowed<'static>>> = LazyLock::new(|| {
    Collator::try_new(Default::default(), CollatorOptions::default())
        .inspect_err(|e| tracing::warn!(error = %e, "collator unavailable, sorting by code point"))
        .ok()
});

fn locale_compare(a: &str, b: &str) -> Ordering {
    match COLLATOR.as_ref() {
        Some(collator) => collator.compare(a, b),
        None => a.cmp(b),
    }
}

/// Stable-sort ascending by `key`, then reverse the whole sequence when the
/// order is [`SortOrder::Up`]. Ties keep their ascending relative order and
/// only swap through the final reverse.
pub fn sort_entries(entries: &mut [ListingEntry], key: SortKey, order: SortOrder) {
    entries.sort_by(|a, b| key.compare(&a.assessment, &b.assessment));
    if order == SortOrder::Up {
        entries.reverse();
    }
}

/// An in-memory, sorted view over the active or archived assessments.
#[derive(Debug, Clone)]
pub struct Listing {
    mode: ListingMode,
    prefs: Preferences,
    entries: Vec<ListingEntry>,
    dirty: bool,
}

impl Listing {
    /// A new listing starts dirty and empty until its first refresh.
    pub fn new(mode: ListingMode, prefs: Preferences) -> Self {
        Self {
            mode,
            prefs,
            entries: Vec::new(),
            dirty: true,
        }
    }

    pub fn mode(&self) -> ListingMode {
        self.mode
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn entries(&self) -> &[ListingEntry] {
        &self.entries
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flag the view as stale after a mutation elsewhere.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Reload the entries for this listing's mode, recompute their progress
    /// and re-sort.
    pub async fn refresh<S: PiaStore + ?Sized>(
        &mut self,
        manager: &AssessmentManager<S>,
    ) -> Result<(), ServiceError> {
        let bundles = manager.find_all_records(self.mode.filter()).await?;
        self.entries = bundles
            .into_iter()
            .map(|records| ListingEntry {
                progress: progress::calculate_progress(&records),
                assessment: records.assessment,
            })
            .collect();
        self.resort();
        self.dirty = false;
        tracing::debug!(mode = ?self.mode, count = self.entries.len(), "listing refreshed");
        Ok(())
    }

    /// Select `key` and flip the order, the same as clicking a column
    /// header. Returns the preferences for the caller to persist.
    pub fn sort_by(&mut self, key: SortKey) -> &Preferences {
        self.prefs.sort_value = key;
        self.prefs.sort_order = self.prefs.sort_order.toggled();
        self.resort();
        &self.prefs
    }

    fn resort(&mut self) {
        sort_entries(&mut self.entries, self.prefs.sort_value, self.prefs.sort_order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accents_sort_with_their_base_letter() {
        assert_eq!(locale_compare("Émilie", "Fabrice"), Ordering::Less);
        assert_eq!(locale_compare("Zoé", "Éric"), Ordering::Greater);
    }

    #[test]
    fn lowercase_sorts_before_uppercase() {
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("alpha", "Beta"), Ordering::Less);
    }
}

//! Weak-point tracking.
//!
//! A weak point is a content item the learner has previously missed,
//! counted per (category, unit, structural key). The collection is owned by
//! the caller's progress store; grading proposes [`WeakPointDelta`]s and the
//! caller applies them here (or in its own equivalent structure).

use crate::types::{Category, WeakPoint, WeakPointDelta};
use std::collections::{HashMap, HashSet};

/// Display labels are truncated to keep stored records small.
const ITEM_LABEL_MAX: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct WeakKey {
    category: Category,
    unit: u32,
    key: String,
}

#[derive(Debug, Clone)]
struct WeakEntry {
    item: String,
    fail_count: u32,
}

/// Set of weak points keyed by (category, unit, key).
///
/// The keyed map keeps the one-record-per-item invariant structural: an
/// entry exists iff `fail_count >= 1`.
#[derive(Debug, Clone, Default)]
pub struct WeakPointSet {
    entries: HashMap<WeakKey, WeakEntry>,
}

impl WeakPointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a wrong answer: create at 1 or increment.
    pub fn record_failure(&mut self, category: Category, unit: u32, key: &str, item: &str) {
        let entry = self
            .entries
            .entry(WeakKey {
                category,
                unit,
                key: key.to_string(),
            })
            .or_insert_with(|| WeakEntry {
                item: item.chars().take(ITEM_LABEL_MAX).collect(),
                fail_count: 0,
            });
        entry.fail_count += 1;
    }

    /// Record a correct answer: decrement, removing the entry at zero.
    pub fn record_success(&mut self, category: Category, unit: u32, key: &str) {
        let map_key = WeakKey {
            category,
            unit,
            key: key.to_string(),
        };
        if let Some(entry) = self.entries.get_mut(&map_key) {
            entry.fail_count -= 1;
            if entry.fail_count == 0 {
                self.entries.remove(&map_key);
            }
        }
    }

    /// Apply one grading delta.
    pub fn apply(&mut self, delta: &WeakPointDelta) {
        match delta {
            WeakPointDelta::Failure {
                category,
                unit,
                key,
                item,
            } => self.record_failure(*category, *unit, key, item),
            WeakPointDelta::Success {
                category,
                unit,
                key,
            } => self.record_success(*category, *unit, key),
        }
    }

    pub fn apply_all<'a>(&mut self, deltas: impl IntoIterator<Item = &'a WeakPointDelta>) {
        for delta in deltas {
            self.apply(delta);
        }
    }

    /// Fail count for one item, 0 when not weak.
    pub fn fail_count(&self, category: Category, unit: u32, key: &str) -> u32 {
        self.entries
            .get(&WeakKey {
                category,
                unit,
                key: key.to_string(),
            })
            .map_or(0, |e| e.fail_count)
    }

    /// Structural keys of the weak items in one unit and category; feeds the
    /// biased sampler.
    pub fn weak_keys(&self, category: Category, unit: u32) -> HashSet<String> {
        self.entries
            .keys()
            .filter(|k| k.category == category && k.unit == unit)
            .map(|k| k.key.clone())
            .collect()
    }

    /// Weak points of one unit, worst first.
    pub fn for_unit(&self, unit: u32) -> Vec<WeakPoint> {
        let mut records: Vec<WeakPoint> = self
            .entries
            .iter()
            .filter(|(k, _)| k.unit == unit)
            .map(|(k, e)| to_record(k, e))
            .collect();
        records.sort_by(|a, b| b.fail_count.cmp(&a.fail_count).then(a.key.cmp(&b.key)));
        records
    }

    /// Snapshot for the caller's persistence layer, in a stable order.
    pub fn to_records(&self) -> Vec<WeakPoint> {
        let mut records: Vec<WeakPoint> =
            self.entries.iter().map(|(k, e)| to_record(k, e)).collect();
        records.sort_by(|a, b| {
            (a.unit, a.category.as_str(), a.key.as_str())
                .cmp(&(b.unit, b.category.as_str(), b.key.as_str()))
        });
        records
    }

    /// Rebuild from persisted records. Records with a zero count are
    /// dropped; duplicate keys keep their summed count.
    pub fn from_records(records: impl IntoIterator<Item = WeakPoint>) -> Self {
        let mut set = Self::new();
        for record in records {
            if record.fail_count == 0 {
                continue;
            }
            let entry = set
                .entries
                .entry(WeakKey {
                    category: record.category,
                    unit: record.unit,
                    key: record.key,
                })
                .or_insert_with(|| WeakEntry {
                    item: record.item.chars().take(ITEM_LABEL_MAX).collect(),
                    fail_count: 0,
                });
            entry.fail_count += record.fail_count;
        }
        set
    }
}

fn to_record(key: &WeakKey, entry: &WeakEntry) -> WeakPoint {
    WeakPoint {
        category: key.category,
        unit: key.unit,
        key: key.key.clone(),
        item: entry.item.clone(),
        fail_count: entry.fail_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn failure_creates_then_increments() {
        let mut set = WeakPointSet::new();
        set.record_failure(Category::Vocabulary, 1, "tri", "séparation des déchets");
        set.record_failure(Category::Vocabulary, 1, "tri", "séparation des déchets");
        assert_eq!(set.len(), 1);
        assert_eq!(set.fail_count(Category::Vocabulary, 1, "tri"), 2);
    }

    #[test]
    fn success_decrements_and_removes_at_zero() {
        let mut set = WeakPointSet::new();
        set.record_failure(Category::Conjugation, 2, "protéger_présent_il", "protéger");
        set.record_failure(Category::Conjugation, 2, "protéger_présent_il", "protéger");

        set.record_success(Category::Conjugation, 2, "protéger_présent_il");
        assert_eq!(set.fail_count(Category::Conjugation, 2, "protéger_présent_il"), 1);

        set.record_success(Category::Conjugation, 2, "protéger_présent_il");
        assert!(set.is_empty());

        // success on an unknown key is a no-op
        set.record_success(Category::Conjugation, 2, "protéger_présent_il");
        assert!(set.is_empty());
    }

    #[test]
    fn keys_are_scoped_by_unit_and_category() {
        let mut set = WeakPointSet::new();
        set.record_failure(Category::Vocabulary, 1, "tri", "a");
        set.record_failure(Category::Vocabulary, 2, "tri", "a");
        set.record_failure(Category::Grammar, 1, "tri", "a");

        assert_eq!(set.len(), 3);
        let keys = set.weak_keys(Category::Vocabulary, 1);
        assert_eq!(keys.len(), 1);
        assert!(keys.contains("tri"));
    }

    #[test]
    fn for_unit_sorts_worst_first() {
        let mut set = WeakPointSet::new();
        set.record_failure(Category::Vocabulary, 1, "a", "a");
        for _ in 0..3 {
            set.record_failure(Category::Vocabulary, 1, "b", "b");
        }
        let records = set.for_unit(1);
        assert_eq!(records[0].key, "b");
        assert_eq!(records[0].fail_count, 3);
        assert_eq!(records[1].key, "a");
    }

    #[test]
    fn item_label_is_truncated() {
        let mut set = WeakPointSet::new();
        let long = "x".repeat(200);
        set.record_failure(Category::Expression, 1, "k", &long);
        assert_eq!(set.for_unit(1)[0].item.chars().count(), 80);
    }

    #[test]
    fn records_roundtrip_and_drop_zeros() {
        let mut set = WeakPointSet::new();
        set.record_failure(Category::Vocabulary, 1, "tri", "a");
        set.record_failure(Category::Grammar, 3, "voix passive|On recycle", "b");

        let mut records = set.to_records();
        records.push(WeakPoint {
            category: Category::Expression,
            unit: 1,
            key: "zero".to_string(),
            item: "zero".to_string(),
            fail_count: 0,
        });

        let rebuilt = WeakPointSet::from_records(records);
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt.fail_count(Category::Vocabulary, 1, "tri"), 1);
        assert_eq!(rebuilt.fail_count(Category::Expression, 1, "zero"), 0);
    }

    #[test]
    fn deltas_apply() {
        let mut set = WeakPointSet::new();
        let deltas = vec![
            WeakPointDelta::Failure {
                category: Category::Vocabulary,
                unit: 1,
                key: "tri".to_string(),
                item: "séparation".to_string(),
            },
            WeakPointDelta::Success {
                category: Category::Vocabulary,
                unit: 1,
                key: "absent".to_string(),
            },
        ];
        set.apply_all(&deltas);
        assert_eq!(set.fail_count(Category::Vocabulary, 1, "tri"), 1);
        assert_eq!(set.len(), 1);
    }
}

use crate::shelf::ShelfId;
use std::collections::HashMap;

/// Key of a usage counter. The owning shelf is part of the key so that two
/// shelves with a same-labelled button are counted separately.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsageKey {
    pub shelf: ShelfId,
    pub label: String,
}

/// How often each button was run during this session. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct UsageStats {
    counts: HashMap<UsageKey, u32>,
}

impl UsageStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, shelf: &ShelfId, label: &str) -> u32 {
        let count = self
            .counts
            .entry(UsageKey {
                shelf: shelf.clone(),
                label: label.to_string(),
            })
            .or_insert(0);
        *count += 1;
        *count
    }

    pub fn count(&self, shelf: &ShelfId, label: &str) -> u32 {
        self.counts
            .get(&UsageKey {
                shelf: shelf.clone(),
                label: label.to_string(),
            })
            .copied()
            .unwrap_or(0)
    }

    /// Total runs of buttons with this label on any shelf.
    pub fn count_for_label(&self, label: &str) -> u32 {
        self.counts
            .iter()
            .filter(|(k, _)| k.label == label)
            .map(|(_, c)| *c)
            .sum()
    }

    /// Up to `n` most used buttons, ties ordered by label then shelf.
    pub fn most_used(&self, n: usize) -> Vec<(&UsageKey, u32)> {
        let mut list: Vec<_> = self.counts.iter().map(|(k, c)| (k, *c)).collect();
        list.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.0.label.cmp(&b.0.label))
                .then_with(|| a.0.shelf.cmp(&b.0.shelf))
        });
        list.truncate(n);
        list
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Follow a button rename so its count is not lost.
    pub fn rename(&mut self, shelf: &ShelfId, old_label: &str, new_label: &str) {
        let key = UsageKey {
            shelf: shelf.clone(),
            label: old_label.to_string(),
        };
        if let Some(count) = self.counts.remove(&key) {
            self.counts.insert(
                UsageKey {
                    shelf: shelf.clone(),
                    label: new_label.to_string(),
                },
                count,
            );
        }
    }

    /// Follow a shelf rename.
    pub fn rename_shelf(&mut self, old: &ShelfId, new: &ShelfId) {
        let moved: Vec<_> = self
            .counts
            .keys()
            .filter(|k| &k.shelf == old)
            .cloned()
            .collect();
        for key in moved {
            if let Some(count) = self.counts.remove(&key) {
                self.counts.insert(
                    UsageKey {
                        shelf: new.clone(),
                        label: key.label,
                    },
                    count,
                );
            }
        }
    }

    pub fn forget_shelf(&mut self, shelf: &ShelfId) {
        self.counts.retain(|k, _| &k.shelf != shelf);
    }

    pub fn forget(&mut self, shelf: &ShelfId, label: &str) {
        self.counts
            .retain(|k, _| !(&k.shelf == shelf && k.label == label));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_label_on_two_shelves_counts_separately() {
        let mut usage = UsageStats::new();
        let rig = ShelfId::task("Rig", "Build");
        usage.increment(&ShelfId::Common, "Bake");
        usage.increment(&rig, "Bake");
        usage.increment(&rig, "Bake");
        assert_eq!(usage.count(&ShelfId::Common, "Bake"), 1);
        assert_eq!(usage.count(&rig, "Bake"), 2);
        assert_eq!(usage.count_for_label("Bake"), 3);
    }

    #[test]
    fn most_used_sorted_by_count() {
        let mut usage = UsageStats::new();
        usage.increment(&ShelfId::Common, "B");
        usage.increment(&ShelfId::Common, "A");
        usage.increment(&ShelfId::Common, "C");
        usage.increment(&ShelfId::Common, "C");
        let top: Vec<_> = usage
            .most_used(2)
            .into_iter()
            .map(|(k, c)| (k.label.as_str(), c))
            .collect();
        assert_eq!(top, vec![("C", 2), ("A", 1)]);
    }

    #[test]
    fn rename_keeps_count() {
        let mut usage = UsageStats::new();
        usage.increment(&ShelfId::Common, "Old");
        usage.rename(&ShelfId::Common, "Old", "New");
        assert_eq!(usage.count(&ShelfId::Common, "New"), 1);
        assert_eq!(usage.count(&ShelfId::Common, "Old"), 0);
    }
}

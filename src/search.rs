use crate::button::ShelfButtonRecord;
use crate::registry::ShelfRegistry;
use crate::shelf::ShelfId;

/// Maximum number of results returned by a search.
pub const SEARCH_LIMIT: usize = 100;

const EXACT_LABEL: u32 = 100;
const LABEL_CONTAINS: u32 = 50;
const LABEL_PREFIX: u32 = 30;
const ANNOTATION_CONTAINS: u32 = 20;
const COMMAND_CONTAINS: u32 = 10;

/// A matching button together with the shelf it lives on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub shelf: ShelfId,
    pub record: ShelfButtonRecord,
    pub score: u32,
}

/// Flattened view of every button in discovery order. Rebuilt for each
/// query and never stored.
pub struct SearchIndex<'a> {
    entries: Vec<(ShelfId, &'a ShelfButtonRecord)>,
}

impl<'a> SearchIndex<'a> {
    pub fn build(registry: &'a ShelfRegistry) -> Self {
        let entries = registry
            .iter_shelves()
            .flat_map(|(id, shelf)| shelf.buttons().iter().map(move |b| (id.clone(), b)))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rank every matching entry and keep the best `limit`.
    pub fn query(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .filter_map(|(id, rec)| {
                score(rec, &q).map(|score| SearchHit {
                    shelf: id.clone(),
                    record: (*rec).clone(),
                    score,
                })
            })
            .collect();
        // Stable, so equal scores keep discovery order.
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits.truncate(limit);
        hits
    }
}

/// Relevance of `rec` for an already lowercased, non-empty query, or
/// `None` when nothing matches.
pub fn score(rec: &ShelfButtonRecord, query_lc: &str) -> Option<u32> {
    let label = rec.label.to_lowercase();
    let mut total = 0;
    let mut matched = false;
    if label == query_lc {
        total += EXACT_LABEL;
        matched = true;
    } else if label.contains(query_lc) {
        total += LABEL_CONTAINS;
        matched = true;
    }
    if label.starts_with(query_lc) {
        total += LABEL_PREFIX;
    }
    if rec.annotation.to_lowercase().contains(query_lc) {
        total += ANNOTATION_CONTAINS;
        matched = true;
    }
    if rec.command.to_lowercase().contains(query_lc) {
        total += COMMAND_CONTAINS;
        matched = true;
    }
    matched.then_some(total)
}

/// Search the registry. An empty query returns nothing.
pub fn search(registry: &ShelfRegistry, query: &str, limit: usize) -> Vec<SearchHit> {
    SearchIndex::build(registry).query(query, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::SourceType;

    fn rec(label: &str, annotation: &str, command: &str) -> ShelfButtonRecord {
        ShelfButtonRecord::new(label, command, SourceType::Python).with_annotation(annotation)
    }

    fn registry(buttons: &[(&ShelfId, ShelfButtonRecord)]) -> ShelfRegistry {
        let mut reg = ShelfRegistry::new();
        for (id, b) in buttons {
            if !reg.contains(id) {
                reg.add_shelf(id.tab().unwrap(), id.frame().unwrap()).unwrap();
            }
            reg.add_button(id, b.clone()).unwrap();
        }
        reg
    }

    #[test]
    fn score_components() {
        assert_eq!(score(&rec("Bake", "", ""), "bake"), Some(130));
        assert_eq!(score(&rec("Bake Keys", "", ""), "bake"), Some(80));
        assert_eq!(score(&rec("Snap Bake", "", ""), "bake"), Some(50));
        assert_eq!(score(&rec("Snap", "bake it", ""), "bake"), Some(20));
        assert_eq!(score(&rec("Snap", "", "bake()"), "bake"), Some(10));
        assert_eq!(score(&rec("Snap", "", ""), "bake"), None);
    }

    #[test]
    fn match_is_case_insensitive() {
        assert!(score(&rec("Create Controller", "", ""), "control").is_some());
        assert!(score(&rec("x", "Build a CONTROL curve", ""), "control").is_some());
    }

    #[test]
    fn empty_query_returns_nothing() {
        let id = ShelfId::task("Rig", "Build");
        let reg = registry(&[(&id, rec("Create Controller", "", ""))]);
        assert!(search(&reg, "", SEARCH_LIMIT).is_empty());
        assert!(search(&reg, "   ", SEARCH_LIMIT).is_empty());
    }

    #[test]
    fn exact_label_ranks_above_substring() {
        let id = ShelfId::task("Rig", "Build");
        let reg = registry(&[
            (&id, rec("Snap Bake", "", "")),
            (&id, rec("bake", "", "")),
        ]);
        let hits = search(&reg, "Bake", SEARCH_LIMIT);
        assert_eq!(hits[0].record.label, "bake");
        assert_eq!(hits[1].record.label, "Snap Bake");
    }

    #[test]
    fn ties_keep_discovery_order() {
        let first = ShelfId::task("A", "One");
        let second = ShelfId::task("B", "Two");
        let mut reg = registry(&[
            (&first, rec("tool x", "", "")),
            (&second, rec("tool y", "", "")),
        ]);
        reg.add_button(&ShelfId::Common, rec("tool z", "", "")).unwrap();
        let hits = search(&reg, "tool", SEARCH_LIMIT);
        let shelves: Vec<_> = hits.iter().map(|h| h.shelf.to_string()).collect();
        assert_eq!(shelves, vec!["Common", "A_One", "B_Two"]);
    }

    #[test]
    fn truncates_after_ranking() {
        let id = ShelfId::task("Rig", "Many");
        let mut buttons: Vec<(&ShelfId, ShelfButtonRecord)> = (0..150)
            .map(|i| (&id, rec(&format!("tool {i}"), "", "")))
            .collect();
        buttons.push((&id, rec("tool", "", "")));
        let reg = registry(&buttons);
        let hits = search(&reg, "tool", SEARCH_LIMIT);
        assert_eq!(hits.len(), SEARCH_LIMIT);
        assert_eq!(hits[0].record.label, "tool");
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }
}

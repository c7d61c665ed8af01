use std::collections::VecDeque;

/// Default number of queries remembered.
pub const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub query: String,
    pub timestamp: i64,
}

/// Recently executed search queries, most recent first. Lives only as long
/// as the tool session.
#[derive(Debug, Clone)]
pub struct SearchHistory {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT)
    }
}

impl SearchHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    /// Record `query`, moving an existing identical entry to the front.
    /// Blank queries are ignored.
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() || self.limit == 0 {
            return;
        }
        self.entries.retain(|e| e.query != query);
        self.entries.push_front(HistoryEntry {
            query: query.to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        });
        while self.entries.len() > self.limit {
            self.entries.pop_back();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn queries(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.query.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

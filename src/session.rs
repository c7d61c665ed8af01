use crate::button::{ShelfButtonRecord, SourceType};
use crate::error::{Result, ShelfError};
use crate::executor::CommandExecutor;
use crate::history::{SearchHistory, HISTORY_LIMIT};
use crate::registry::ShelfRegistry;
use crate::search::{search, SearchHit, SEARCH_LIMIT};
use crate::shelf::{Direction, ShelfId};
use crate::store::{ShelfStore, SkippedFile};
use crate::usage::UsageStats;

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub history_limit: usize,
    pub search_limit: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            history_limit: HISTORY_LIMIT,
            search_limit: SEARCH_LIMIT,
        }
    }
}

/// One running instance of the tool.
///
/// Owns the shelf registry, the search history and the usage counters. The
/// registry is the only source of truth: every edit goes through a method
/// here and saving always serializes the registry.
pub struct ToolSession {
    store: ShelfStore,
    registry: ShelfRegistry,
    history: SearchHistory,
    usage: UsageStats,
    executor: Box<dyn CommandExecutor>,
    options: SessionOptions,
    skipped: Vec<SkippedFile>,
    dirty: bool,
}

impl ToolSession {
    /// Load every shelf from `store`. Fails only when the shelf directory
    /// itself is unusable.
    pub fn open(
        mut store: ShelfStore,
        executor: Box<dyn CommandExecutor>,
        options: SessionOptions,
    ) -> Result<Self> {
        let report = store.load()?;
        Ok(Self {
            store,
            registry: report.registry,
            history: SearchHistory::new(options.history_limit),
            usage: UsageStats::new(),
            executor,
            options,
            skipped: report.skipped,
            dirty: false,
        })
    }

    /// End the session, saving pending edits.
    ///
    /// When the save fails the session is handed back with the error so the
    /// edits can be saved again later.
    pub fn close(mut self) -> std::result::Result<(), (Self, ShelfError)> {
        if self.dirty {
            if let Err(e) = self.save() {
                return Err((self, e));
            }
        }
        tracing::debug!("session closed");
        Ok(())
    }

    pub fn save(&mut self) -> Result<()> {
        self.store.save(&self.registry)?;
        self.dirty = false;
        Ok(())
    }

    pub fn registry(&self) -> &ShelfRegistry {
        &self.registry
    }

    pub fn store(&self) -> &ShelfStore {
        &self.store
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn usage(&self) -> &UsageStats {
        &self.usage
    }

    /// Files that could not be loaded when the session was opened.
    pub fn skipped_files(&self) -> &[SkippedFile] {
        &self.skipped
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn edited<T>(&mut self, res: Result<T>) -> Result<T> {
        if res.is_ok() {
            self.dirty = true;
        }
        res
    }

    /// Like `edited` for moves, which report `false` when nothing moved.
    fn moved(&mut self, res: Result<bool>) -> Result<bool> {
        if let Ok(true) = res {
            self.dirty = true;
        }
        res
    }

    /// Refuse a shelf identity whose file would replace one that failed to
    /// load.
    fn check_skipped(&self, id: &ShelfId) -> Result<()> {
        match self.store.skipped_conflict(id) {
            Some(path) => Err(ShelfError::OverwritesSkipped {
                shelf: id.clone(),
                path: path.to_path_buf(),
            }),
            None => Ok(()),
        }
    }

    /// Ranked search without recording history, for live filtering.
    pub fn preview(&self, query: &str) -> Vec<SearchHit> {
        search(&self.registry, query, self.options.search_limit)
    }

    /// Ranked search that is recorded in the search history.
    pub fn search(&mut self, query: &str) -> Vec<SearchHit> {
        self.history.record(query);
        self.preview(query)
    }

    /// Run a button and count the invocation.
    pub fn run_button(&mut self, shelf: &ShelfId, label: &str) -> Result<()> {
        let record = self
            .registry
            .shelf(shelf)
            .ok_or_else(|| ShelfError::ShelfNotFound(shelf.clone()))?
            .get(label)
            .ok_or_else(|| ShelfError::ButtonNotFound {
                shelf: shelf.clone(),
                label: label.to_string(),
            })?;
        let count = self.usage.increment(shelf, label);
        tracing::debug!(shelf = %shelf, label, count, "running button");
        self.executor.execute(&record.command, record.language);
        Ok(())
    }

    /// Search for `query` and run the best hit, if any.
    pub fn run_first_result(&mut self, query: &str) -> Option<SearchHit> {
        let hit = self.search(query).into_iter().next()?;
        self.run_button(&hit.shelf, &hit.record.label).ok()?;
        Some(hit)
    }

    pub fn add_shelf(&mut self, tab: &str, frame: &str) -> Result<ShelfId> {
        self.check_skipped(&ShelfId::task(tab.trim(), frame.trim()))?;
        let res = self.registry.add_shelf(tab, frame).map(|t| t.id());
        self.edited(res)
    }

    pub fn rename_shelf(&mut self, id: &ShelfId, tab: &str, frame: &str) -> Result<ShelfId> {
        self.check_skipped(&ShelfId::task(tab.trim(), frame.trim()))?;
        let res = self.registry.rename_shelf(id, tab, frame);
        self.edited(res)?;
        let new_id = ShelfId::task(tab.trim(), frame.trim());
        self.usage.rename_shelf(id, &new_id);
        Ok(new_id)
    }

    pub fn delete_shelf(&mut self, id: &ShelfId) -> Result<()> {
        let res = self.registry.delete_shelf(id);
        self.edited(res)?;
        self.usage.forget_shelf(id);
        Ok(())
    }

    pub fn reorder_shelf(&mut self, id: &ShelfId, direction: Direction) -> Result<bool> {
        let res = self.registry.reorder_shelf(id, direction);
        self.moved(res)
    }

    pub fn set_collapsed(&mut self, id: &ShelfId, collapsed: bool) -> Result<()> {
        let res = self.registry.set_collapsed(id, collapsed);
        self.edited(res)
    }

    pub fn add_button(&mut self, id: &ShelfId, record: ShelfButtonRecord) -> Result<()> {
        let res = self.registry.add_button(id, record);
        self.edited(res)
    }

    /// Copy a button under the next free `label N` name.
    pub fn duplicate_button(&mut self, id: &ShelfId, label: &str) -> Result<String> {
        let shelf = self
            .registry
            .shelf(id)
            .ok_or_else(|| ShelfError::ShelfNotFound(id.clone()))?;
        let mut copy = shelf
            .get(label)
            .cloned()
            .ok_or_else(|| ShelfError::ButtonNotFound {
                shelf: id.clone(),
                label: label.to_string(),
            })?;
        copy.label = shelf.unique_label(label);
        let new_label = copy.label.clone();
        self.add_button(id, copy)?;
        Ok(new_label)
    }

    pub fn delete_button(&mut self, id: &ShelfId, label: &str) -> Result<()> {
        let res = self.registry.delete_button(id, label);
        self.edited(res)?;
        self.usage.forget(id, label);
        Ok(())
    }

    pub fn rename_button(&mut self, id: &ShelfId, old_label: &str, new_label: &str) -> Result<()> {
        let res = self.registry.rename_button(id, old_label, new_label);
        self.edited(res)?;
        self.usage.rename(id, old_label, new_label);
        Ok(())
    }

    pub fn set_icon(&mut self, id: &ShelfId, label: &str, icon: &str) -> Result<()> {
        let res = self.registry.set_icon(id, label, icon);
        self.edited(res)
    }

    pub fn set_label_badge(&mut self, id: &ShelfId, label: &str, badge: &str) -> Result<()> {
        let res = self.registry.set_label_badge(id, label, badge);
        self.edited(res)
    }

    pub fn set_tooltip(&mut self, id: &ShelfId, label: &str, tooltip: &str) -> Result<()> {
        let res = self.registry.set_tooltip(id, label, tooltip);
        self.edited(res)
    }

    pub fn set_command(&mut self, id: &ShelfId, label: &str, command: &str) -> Result<()> {
        let res = self.registry.set_command(id, label, command);
        self.edited(res)
    }

    pub fn set_language(&mut self, id: &ShelfId, label: &str, language: SourceType) -> Result<()> {
        let res = self.registry.set_language(id, label, language);
        self.edited(res)
    }

    pub fn move_button(&mut self, id: &ShelfId, label: &str, direction: Direction) -> Result<bool> {
        let res = self.registry.move_button(id, label, direction);
        self.moved(res)
    }
}

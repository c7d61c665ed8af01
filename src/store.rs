use crate::button::ShelfButtonRecord;
use crate::error::{Result, ShelfError};
use crate::registry::ShelfRegistry;
use crate::shelf::{validate_name, Shelf, ShelfId, TaskShelf, COMMON_FILE};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Display order of a task shelf. Stored as a zero padded string so the
/// files sort lexicographically; plain integers are accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Order(u32);

impl Serialize for Order {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&format!("{:02}", self.0))
    }
}

impl<'de> Deserialize<'de> for Order {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u32),
            Text(String),
        }
        match Raw::deserialize(d)? {
            Raw::Num(n) => Ok(Order(n)),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map(Order)
                .map_err(|_| serde::de::Error::custom(format!("invalid order '{s}'"))),
        }
    }
}

/// One shelf document as stored on disk.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShelfFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order: Option<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tab_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frame_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collapse: Option<bool>,
    #[serde(default)]
    shelf_button_infos: Vec<ShelfButtonRecord>,
}

/// A shelf file that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of scanning the shelf directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub registry: ShelfRegistry,
    pub skipped: Vec<SkippedFile>,
}

/// Reads and writes one JSON document per shelf inside a directory.
///
/// The store remembers which file backs each shelf it loaded or wrote so
/// that files of renamed or deleted shelves are removed on the next save.
/// Files it skipped at load are never touched: a shelf whose file would
/// land on one of them is refused.
#[derive(Debug)]
pub struct ShelfStore {
    dir: PathBuf,
    tracked: HashMap<ShelfId, PathBuf>,
    /// Lowercased file name of every file skipped by the last load.
    skipped: HashMap<String, PathBuf>,
}

impl ShelfStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            tracked: HashMap::new(),
            skipped: HashMap::new(),
        }
    }

    /// Create `dir` and an empty Common shelf file if they are missing.
    pub fn init(dir: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(dir);
        std::fs::create_dir_all(&store.dir).map_err(|source| ShelfError::Io {
            path: store.dir.clone(),
            source,
        })?;
        let common = store.path_for(&ShelfId::Common);
        if !common.exists() {
            let json = encode(&ShelfId::Common, &ShelfFile::common(&Shelf::new()))?;
            write_atomic(&common, &json)?;
            tracing::info!("created shelf directory {}", store.dir.display());
        }
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &ShelfId) -> PathBuf {
        self.dir.join(id.file_name())
    }

    /// The skipped file that saving `id` would overwrite, if any.
    ///
    /// Compared case-insensitively so that case-insensitive filesystems are
    /// covered. A shelf that loaded from its own file name is never in
    /// conflict.
    pub fn skipped_conflict(&self, id: &ShelfId) -> Option<&Path> {
        if self.tracked.get(id) == Some(&self.path_for(id)) {
            return None;
        }
        self.skipped
            .get(&id.file_name().to_lowercase())
            .map(PathBuf::as_path)
    }

    /// Scan the shelf directory. A missing or unreadable directory is a
    /// [`ShelfError::Configuration`]; a bad individual file is skipped.
    pub fn load(&mut self) -> Result<LoadReport> {
        let meta = std::fs::metadata(&self.dir).map_err(|e| ShelfError::Configuration {
            path: self.dir.clone(),
            reason: e.to_string(),
        })?;
        if !meta.is_dir() {
            return Err(ShelfError::Configuration {
                path: self.dir.clone(),
                reason: "not a directory".into(),
            });
        }

        let mut common = Shelf::new();
        let mut tasks: Vec<TaskShelf> = Vec::new();
        let mut unordered: Vec<usize> = Vec::new();
        let mut skipped = Vec::new();
        self.tracked.clear();
        self.skipped.clear();

        let walker = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) if e.depth() == 0 => {
                    return Err(ShelfError::Configuration {
                        path: self.dir.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!("skipping unreadable shelf entry: {e}");
                    continue;
                }
            };
            let path = entry.path();
            let is_json = path
                .extension()
                .map(|e| e.eq_ignore_ascii_case("json"))
                .unwrap_or(false);
            if !entry.file_type().is_file() || !is_json {
                continue;
            }
            let mut skip = |reason: String| {
                tracing::warn!("skipping shelf file {}: {reason}", path.display());
                skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason,
                });
            };

            let content = match std::fs::read_to_string(path) {
                Ok(c) => c,
                Err(e) => {
                    skip(e.to_string());
                    continue;
                }
            };
            let file: ShelfFile = match serde_json::from_str(&content) {
                Ok(f) => f,
                Err(e) => {
                    skip(e.to_string());
                    continue;
                }
            };

            let file_name = entry.file_name().to_string_lossy();
            if file_name.eq_ignore_ascii_case(COMMON_FILE) {
                common = unique_buttons(path, file.shelf_button_infos);
                self.tracked.insert(ShelfId::Common, path.to_path_buf());
                continue;
            }

            let Some((tab, frame)) = identity(&file, &file_name) else {
                skip("no tabName/frameName and file name is not <tab>_<frame>.json".into());
                continue;
            };
            if let Err(reason) =
                validate_name("tab", &tab).and_then(|_| validate_name("frame", &frame))
            {
                skip(reason);
                continue;
            }
            let id = ShelfId::task(tab.clone(), frame.clone());
            let file_key = id.file_name().to_lowercase();
            if let Some(other) = tasks
                .iter()
                .find(|t| t.is(&id) || t.id().file_name().to_lowercase() == file_key)
            {
                skip(format!("shelf {id} clashes with shelf {}", other.id()));
                continue;
            }

            let mut task = TaskShelf::new(tab, frame, file.order.map(|o| o.0).unwrap_or(0));
            task.collapsed = file.collapse.unwrap_or(false);
            task.shelf = unique_buttons(path, file.shelf_button_infos);
            if file.order.is_none() {
                unordered.push(tasks.len());
            }
            tasks.push(task);
            self.tracked.insert(id, path.to_path_buf());
        }

        // Shelves without an order go after the ordered ones, by file name.
        let mut next = tasks
            .iter()
            .enumerate()
            .filter(|(i, _)| !unordered.contains(i))
            .map(|(_, t)| t.order.saturating_add(1))
            .max()
            .unwrap_or(0);
        for idx in unordered {
            tasks[idx].order = next;
            next = next.saturating_add(1);
        }
        break_order_ties(&mut tasks);

        self.skipped = skipped
            .iter()
            .filter_map(|s: &SkippedFile| {
                let name = s.path.file_name()?.to_string_lossy().to_lowercase();
                Some((name, s.path.clone()))
            })
            .collect();

        let registry = ShelfRegistry::from_parts(common, tasks);
        tracing::info!(
            shelves = registry.task_shelves().len() + 1,
            buttons = registry.button_count(),
            skipped = skipped.len(),
            "loaded shelves from {}",
            self.dir.display()
        );
        Ok(LoadReport { registry, skipped })
    }

    /// Write every shelf to its own file, then remove files of shelves that
    /// were renamed or deleted since the last load/save.
    ///
    /// Each file is replaced atomically, the set of files is not: a failure
    /// part way through leaves some shelves newer than others. All shelves
    /// are attempted and the first error is returned.
    pub fn save(&mut self, registry: &ShelfRegistry) -> Result<()> {
        let mut first_err: Option<ShelfError> = None;
        let mut written: HashMap<ShelfId, PathBuf> = HashMap::new();

        let files = std::iter::once((ShelfId::Common, ShelfFile::common(registry.common())))
            .chain(registry.task_shelves().iter().map(|t| (t.id(), ShelfFile::task(t))));
        for (id, file) in files {
            let path = self.path_for(&id);
            let res = match self.skipped_conflict(&id) {
                Some(skipped) => Err(ShelfError::OverwritesSkipped {
                    shelf: id.clone(),
                    path: skipped.to_path_buf(),
                }),
                None => encode(&id, &file).and_then(|json| write_atomic(&path, &json)),
            };
            match res {
                Ok(()) => {
                    written.insert(id, path);
                }
                Err(e) => {
                    tracing::error!("failed to save shelf {id}: {e}");
                    // Keep the previous file tracked so it is not removed below.
                    if let Some(old) = self.tracked.get(&id) {
                        written.insert(id, old.clone());
                    }
                    first_err.get_or_insert(e);
                }
            }
        }

        let keep: HashSet<&PathBuf> = written.values().collect();
        let mut listing: Option<HashSet<OsString>> = None;
        for (id, old) in &self.tracked {
            if keep.contains(old) {
                continue;
            }
            // A case-only rename: on a case-insensitive filesystem the old
            // name is the file just written, so only remove it when both
            // spellings are listed separately.
            let old_lc = old.to_string_lossy().to_lowercase();
            if let Some(new) = keep
                .iter()
                .find(|p| p.to_string_lossy().to_lowercase() == old_lc)
            {
                let names = listing.get_or_insert_with(|| list_names(&self.dir));
                let both = [old, *new]
                    .iter()
                    .all(|p| p.file_name().map(|n| names.contains(n)).unwrap_or(false));
                if !both {
                    continue;
                }
            }
            match std::fs::remove_file(old) {
                Ok(()) => tracing::debug!("removed stale file of shelf {id}: {}", old.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::error!("failed to remove {}: {e}", old.display());
                    first_err.get_or_insert(ShelfError::Io {
                        path: old.clone(),
                        source: e,
                    });
                }
            }
        }
        self.tracked = written;

        match first_err {
            Some(e) => Err(e),
            None => {
                tracing::info!("saved {} shelves to {}", self.tracked.len(), self.dir.display());
                Ok(())
            }
        }
    }
}

impl ShelfFile {
    fn common(shelf: &Shelf) -> Self {
        Self {
            order: None,
            tab_name: None,
            frame_name: None,
            collapse: None,
            shelf_button_infos: shelf.buttons().to_vec(),
        }
    }

    fn task(task: &TaskShelf) -> Self {
        Self {
            order: Some(Order(task.order)),
            tab_name: Some(task.tab.clone()),
            frame_name: Some(task.frame.clone()),
            collapse: Some(task.collapsed),
            shelf_button_infos: task.shelf.buttons().to_vec(),
        }
    }
}

/// Tab/frame of a task file: the document fields win, the file name is the
/// fallback.
fn identity(file: &ShelfFile, file_name: &str) -> Option<(String, String)> {
    if let (Some(tab), Some(frame)) = (&file.tab_name, &file.frame_name) {
        return Some((tab.trim().to_string(), frame.trim().to_string()));
    }
    let stem = file_name.rsplit_once('.').map(|(s, _)| s).unwrap_or(file_name);
    let (tab, frame) = stem.split_once('_')?;
    let tab = file.tab_name.as_deref().unwrap_or(tab);
    let frame = file.frame_name.as_deref().unwrap_or(frame);
    Some((tab.trim().to_string(), frame.trim().to_string()))
}

/// Give shelves that share an `order` value distinct ones, keeping file
/// name order among them. A reorder swaps two orders, which would be lost
/// between equal values.
fn break_order_ties(tasks: &mut [TaskShelf]) {
    let mut by_order: Vec<usize> = (0..tasks.len()).collect();
    by_order.sort_by_key(|&i| tasks[i].order);
    let mut prev: Option<u32> = None;
    for i in by_order {
        if let Some(p) = prev {
            if tasks[i].order <= p {
                let order = p.saturating_add(1);
                tracing::warn!(
                    shelf = %tasks[i].id(),
                    from = tasks[i].order,
                    to = order,
                    "shelf order clashes, renumbering"
                );
                tasks[i].order = order;
            }
        }
        prev = Some(tasks[i].order);
    }
}

/// Exact file names directly inside `dir`.
fn list_names(dir: &Path) -> HashSet<OsString> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_os_string())
        .collect()
}

/// Keep the first button for each label and drop unlabelled ones.
fn unique_buttons(path: &Path, buttons: Vec<ShelfButtonRecord>) -> Shelf {
    let mut seen = HashSet::new();
    buttons
        .into_iter()
        .filter(|b| {
            if b.label.trim().is_empty() {
                tracing::warn!("{}: dropping button without label", path.display());
                return false;
            }
            if !seen.insert(b.label.clone()) {
                tracing::warn!("{}: dropping duplicate button '{}'", path.display(), b.label);
                return false;
            }
            true
        })
        .collect()
}

fn encode(id: &ShelfId, file: &ShelfFile) -> Result<String> {
    serde_json::to_string_pretty(file).map_err(|source| ShelfError::Json {
        shelf: id.clone(),
        source,
    })
}

fn write_atomic(path: &Path, json: &str) -> Result<()> {
    let io_err = |source| ShelfError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(json.as_bytes()).map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

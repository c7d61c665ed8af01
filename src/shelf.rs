use crate::button::ShelfButtonRecord;

/// Identity of a shelf: the singleton Common shelf or a tab/frame pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShelfId {
    Common,
    Task { tab: String, frame: String },
}

impl ShelfId {
    pub fn task(tab: impl Into<String>, frame: impl Into<String>) -> Self {
        ShelfId::Task {
            tab: tab.into(),
            frame: frame.into(),
        }
    }

    pub fn is_common(&self) -> bool {
        matches!(self, ShelfId::Common)
    }

    pub fn tab(&self) -> Option<&str> {
        match self {
            ShelfId::Common => None,
            ShelfId::Task { tab, .. } => Some(tab),
        }
    }

    pub fn frame(&self) -> Option<&str> {
        match self {
            ShelfId::Common => None,
            ShelfId::Task { frame, .. } => Some(frame),
        }
    }

    /// File name of the backing JSON document.
    pub fn file_name(&self) -> String {
        match self {
            ShelfId::Common => COMMON_FILE.to_string(),
            ShelfId::Task { tab, frame } => format!("{tab}_{frame}.json"),
        }
    }
}

/// Reserved file name of the Common shelf.
pub const COMMON_FILE: &str = "common.json";

const FORBIDDEN_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Check that a tab or frame name can be shown and used in a file name.
pub fn validate_name(kind: &str, name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(format!("{kind} name must not be empty"));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(format!("'{trimmed}' is not a valid {kind} name"));
    }
    if let Some(c) = trimmed.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c) || c.is_control()) {
        return Err(format!("{kind} name must not contain '{}'", c.escape_default()));
    }
    Ok(())
}

impl std::fmt::Display for ShelfId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShelfId::Common => f.write_str("Common"),
            ShelfId::Task { tab, frame } => write!(f, "{tab}_{frame}"),
        }
    }
}

/// Direction for shelf and button reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Ordered list of buttons. Labels are unique within a shelf.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shelf {
    buttons: Vec<ShelfButtonRecord>,
}

impl Shelf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buttons(&self) -> &[ShelfButtonRecord] {
        &self.buttons
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&ShelfButtonRecord> {
        self.buttons.iter().find(|b| b.label == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.buttons.iter().position(|b| b.label == label)
    }

    /// First label of the form `base`, `base 1`, `base 2`, ... not used yet.
    pub fn unique_label(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        let mut n = 1;
        loop {
            let candidate = format!("{base} {n}");
            if !self.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    pub(crate) fn push(&mut self, record: ShelfButtonRecord) {
        self.buttons.push(record);
    }

    pub(crate) fn remove_at(&mut self, idx: usize) -> ShelfButtonRecord {
        self.buttons.remove(idx)
    }

    pub(crate) fn get_mut_at(&mut self, idx: usize) -> &mut ShelfButtonRecord {
        &mut self.buttons[idx]
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.buttons.swap(a, b);
    }
}

impl FromIterator<ShelfButtonRecord> for Shelf {
    fn from_iter<I: IntoIterator<Item = ShelfButtonRecord>>(iter: I) -> Self {
        Self {
            buttons: iter.into_iter().collect(),
        }
    }
}

/// A shelf living under a tab/frame with its display metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskShelf {
    pub(crate) tab: String,
    pub(crate) frame: String,
    pub(crate) order: u32,
    pub(crate) collapsed: bool,
    pub(crate) shelf: Shelf,
}

impl TaskShelf {
    pub fn new(tab: impl Into<String>, frame: impl Into<String>, order: u32) -> Self {
        Self {
            tab: tab.into(),
            frame: frame.into(),
            order,
            collapsed: false,
            shelf: Shelf::new(),
        }
    }

    pub fn id(&self) -> ShelfId {
        ShelfId::task(self.tab.clone(), self.frame.clone())
    }

    pub fn is(&self, id: &ShelfId) -> bool {
        match id {
            ShelfId::Common => false,
            ShelfId::Task { tab, frame } => &self.tab == tab && &self.frame == frame,
        }
    }

    pub fn tab(&self) -> &str {
        &self.tab
    }

    pub fn frame(&self) -> &str {
        &self.frame
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn shelf(&self) -> &Shelf {
        &self.shelf
    }
}

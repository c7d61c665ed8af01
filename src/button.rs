use serde::{Deserialize, Serialize};

/// Interpreter that runs a button's command text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Mel,
    #[default]
    Python,
}

impl SourceType {
    pub const ALL: [SourceType; 2] = [SourceType::Mel, SourceType::Python];

    /// Index used by the editor's language picker (1 = mel, 2 = python).
    pub fn index(self) -> u8 {
        match self {
            SourceType::Mel => 1,
            SourceType::Python => 2,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(SourceType::Mel),
            2 => Some(SourceType::Python),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Mel => "mel",
            SourceType::Python => "python",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_no_popup() -> bool {
    true
}

/// One clickable tool entry on a shelf.
///
/// Field names follow the on-disk `shelfButtonInfos` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfButtonRecord {
    pub label: String,
    #[serde(default)]
    pub annotation: String,
    #[serde(rename = "image1", default)]
    pub icon: String,
    #[serde(default)]
    pub image_overlay_label: String,
    #[serde(default)]
    pub command: String,
    #[serde(rename = "sourceType", default)]
    pub language: SourceType,
    #[serde(default = "default_no_popup")]
    pub no_default_popup: bool,
}

impl ShelfButtonRecord {
    pub fn new(label: impl Into<String>, command: impl Into<String>, language: SourceType) -> Self {
        Self {
            label: label.into(),
            annotation: String::new(),
            icon: String::new(),
            image_overlay_label: String::new(),
            command: command.into(),
            language,
            no_default_popup: true,
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_overlay(mut self, overlay: impl Into<String>) -> Self {
        self.image_overlay_label = overlay.into();
        self
    }
}

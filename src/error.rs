use crate::shelf::ShelfId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, editing or saving shelves.
#[derive(Error, Debug)]
pub enum ShelfError {
    /// The shelf data directory is missing or unreadable. Fatal at startup.
    #[error("shelf directory {} is unusable: {reason}", path.display())]
    Configuration { path: PathBuf, reason: String },

    #[error("shelf {0} already exists")]
    DuplicateShelf(ShelfId),

    #[error("shelf {shelf} already has a button labelled '{label}'")]
    DuplicateLabel { shelf: ShelfId, label: String },

    #[error("the Common shelf cannot be renamed, deleted or reordered")]
    ImmutableShelf,

    #[error("shelf {0} does not exist")]
    ShelfNotFound(ShelfId),

    #[error("shelf {shelf} has no button labelled '{label}'")]
    ButtonNotFound { shelf: ShelfId, label: String },

    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Writing the shelf would replace a file that failed to load.
    #[error("shelf {shelf} would overwrite {}, which could not be loaded", path.display())]
    OverwritesSkipped { shelf: ShelfId, path: PathBuf },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode shelf {shelf}: {source}")]
    Json {
        shelf: ShelfId,
        #[source]
        source: serde_json::Error,
    },
}

impl ShelfError {
    /// Only a broken shelf directory stops the tool from starting.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Short text for the inline message shown next to the edited widget.
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration { path, reason } => format!(
                "Cannot open the shelf folder {}.\n{reason}",
                path.display()
            ),
            Self::DuplicateShelf(id) => format!("A shelf named {id} already exists"),
            Self::DuplicateLabel { label, .. } => {
                format!("A button labelled '{label}' already exists on this shelf")
            }
            Self::ImmutableShelf => "The Common shelf cannot be changed that way".into(),
            Self::ShelfNotFound(id) => format!("Shelf {id} no longer exists"),
            Self::ButtonNotFound { label, .. } => format!("Button '{label}' no longer exists"),
            Self::InvalidName(msg) => msg.clone(),
            Self::OverwritesSkipped { path, .. } => format!(
                "{} could not be loaded. Fix or move it before using that shelf name",
                path.display()
            ),
            Self::Io { path, source } => format!("Failed to save {}: {source}", path.display()),
            Self::Json { shelf, source } => format!("Failed to encode {shelf}: {source}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShelfError>;

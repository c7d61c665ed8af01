pub mod button;
pub mod error;
pub mod executor;
pub mod gui;
pub mod history;
pub mod hotkey;
pub mod logging;
pub mod registry;
pub mod search;
pub mod session;
pub mod settings;
pub mod shelf;
pub mod store;
pub mod usage;

pub use error::{Result, ShelfError};
pub use session::{SessionOptions, ToolSession};

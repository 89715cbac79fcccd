pub mod controller;
pub mod engine;
pub mod error;
pub mod loader;
pub mod meta;
pub mod render;
pub mod style;
pub mod theme;
pub mod tokio_thread;
pub mod view;

pub use shelf_state;

pub use controller::{Command, Controller, LoadPhase};
pub use error::{LoadError, PreferenceError};
pub use loader::{Loader, Source};
pub use render::{TableBody, TableView};
pub use theme::{Theme, ThemeManager};
pub use view::{SortDirection, SortKey, ViewState};

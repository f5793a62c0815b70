//! Declarative terminal pane layouts.
//!
//! Describe panes relative to each other with a [`Mind`], let a
//! [`Splitter`] create them, and hand the finished set to a [`Thinker`]
//! that decides what each pane shows.

pub mod config;
pub mod error;
pub mod logging;
pub mod mind;
pub mod models;
pub mod splitter;
pub mod thinker;

pub use error::{MindError, MindResult};
pub use mind::{Cursor, Mind, ShowOptions, SplitOptions};
pub use models::{Direction, Settings, Split, Target};
pub use splitter::{DetachedSplitter, MemorySplitter, Splitter, TmuxSplitter};
pub use thinker::{BannerThinker, ManifestThinker, Thinker};

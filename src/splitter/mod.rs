//! Pane backends.
//!
//! A [`Splitter`] performs the physical side of a layout: it creates panes,
//! records every [`Split`] it hands out in creation order, and tears the
//! panes down again when the session ends.

mod detached;
mod memory;
pub mod tmux;

pub use detached::DetachedSplitter;
pub use memory::{MemorySplitter, SplitterCall};
pub use tmux::TmuxSplitter;

use anyhow::Result;

use crate::models::{Direction, Settings, Split};

/// Display carried by the pane a session starts in
pub const ROOT_DISPLAY: &str = "main";

/// Setting under which a backend records a pane's measured width in cells
pub const PANE_WIDTH: &str = "pane_width";

/// Everything a backend needs to create one pane
#[derive(Debug, Clone, Copy)]
pub struct SplitRequest<'a> {
    pub direction: Direction,
    /// Extra backend-specific arguments, passed through untouched
    pub args: &'a [String],
    /// Reference pane; `None` means the session's root pane
    pub target: Option<&'a Split>,
    pub display: Option<&'a str>,
    pub settings: &'a Settings,
}

/// Capability that creates, finds and duplicates panes.
///
/// Creators return `Ok(None)` when the backend cannot do real work (see
/// [`DetachedSplitter`]); callers must not assume a pane exists then.
pub trait Splitter {
    /// Create one new pane next to the request's target
    fn split(&mut self, request: SplitRequest<'_>) -> Result<Option<Split>>;

    fn left(
        &mut self,
        args: &[String],
        target: Option<&Split>,
        display: Option<&str>,
        settings: &Settings,
    ) -> Result<Option<Split>> {
        self.split(SplitRequest {
            direction: Direction::Left,
            args,
            target,
            display,
            settings,
        })
    }

    fn right(
        &mut self,
        args: &[String],
        target: Option<&Split>,
        display: Option<&str>,
        settings: &Settings,
    ) -> Result<Option<Split>> {
        self.split(SplitRequest {
            direction: Direction::Right,
            args,
            target,
            display,
            settings,
        })
    }

    fn above(
        &mut self,
        args: &[String],
        target: Option<&Split>,
        display: Option<&str>,
        settings: &Settings,
    ) -> Result<Option<Split>> {
        self.split(SplitRequest {
            direction: Direction::Above,
            args,
            target,
            display,
            settings,
        })
    }

    fn below(
        &mut self,
        args: &[String],
        target: Option<&Split>,
        display: Option<&str>,
        settings: &Settings,
    ) -> Result<Option<Split>> {
        self.split(SplitRequest {
            direction: Direction::Below,
            args,
            target,
            display,
            settings,
        })
    }

    /// Record `display` on an existing pane without creating a new one.
    ///
    /// The duplicate's settings are the target's with `settings` laid over
    /// them, and it is appended to [`Splitter::splits`].
    fn show(
        &mut self,
        display: &str,
        target: Option<&Split>,
        settings: &Settings,
    ) -> Result<Option<Split>>;

    /// First split in creation order whose display equals `display`.
    ///
    /// The root pane counts as created first.
    fn get(&self, display: &str) -> Option<Split> {
        self.root()
            .into_iter()
            .chain(self.splits())
            .find(|split| split.display() == Some(display))
            .cloned()
    }

    /// The pane the session started in, if the backend knows it
    fn root(&self) -> Option<&Split> {
        None
    }

    /// Backend-defined configuration side effects
    fn configure(&mut self, target: Option<&Split>, config: &Settings) -> Result<()>;

    /// Signal that no more panes will be created
    fn finish(&mut self, config: &Settings) -> Result<()>;

    /// Every split produced this session, in creation order
    fn splits(&self) -> &[Split];

    /// `false` for stand-ins that produce no panes
    fn available(&self) -> bool {
        true
    }
}

impl<S: Splitter + ?Sized> Splitter for Box<S> {
    fn split(&mut self, request: SplitRequest<'_>) -> Result<Option<Split>> {
        (**self).split(request)
    }

    fn left(
        &mut self,
        args: &[String],
        target: Option<&Split>,
        display: Option<&str>,
        settings: &Settings,
    ) -> Result<Option<Split>> {
        (**self).left(args, target, display, settings)
    }

    fn right(
        &mut self,
        args: &[String],
        target: Option<&Split>,
        display: Option<&str>,
        settings: &Settings,
    ) -> Result<Option<Split>> {
        (**self).right(args, target, display, settings)
    }

    fn above(
        &mut self,
        args: &[String],
        target: Option<&Split>,
        display: Option<&str>,
        settings: &Settings,
    ) -> Result<Option<Split>> {
        (**self).above(args, target, display, settings)
    }

    fn below(
        &mut self,
        args: &[String],
        target: Option<&Split>,
        display: Option<&str>,
        settings: &Settings,
    ) -> Result<Option<Split>> {
        (**self).below(args, target, display, settings)
    }

    fn show(
        &mut self,
        display: &str,
        target: Option<&Split>,
        settings: &Settings,
    ) -> Result<Option<Split>> {
        (**self).show(display, target, settings)
    }

    fn get(&self, display: &str) -> Option<Split> {
        (**self).get(display)
    }

    fn root(&self) -> Option<&Split> {
        (**self).root()
    }

    fn configure(&mut self, target: Option<&Split>, config: &Settings) -> Result<()> {
        (**self).configure(target, config)
    }

    fn finish(&mut self, config: &Settings) -> Result<()> {
        (**self).finish(config)
    }

    fn splits(&self) -> &[Split] {
        (**self).splits()
    }

    fn available(&self) -> bool {
        (**self).available()
    }
}

//! The layout builder.
//!
//! A [`Mind`] walks an implicit cursor through a chain of directional
//! splits. Each call splits the pane the previous call produced unless it
//! names another one, so a layout reads top to bottom:
//!
//! ```no_run
//! use splitmind::{BannerThinker, Mind, SplitOptions, TmuxSplitter};
//! use splitmind::models::Settings;
//!
//! # fn main() -> anyhow::Result<()> {
//! let splitter = TmuxSplitter::new("%0", "/bin/cat -")?;
//! let mut mind = Mind::new(splitter, BannerThinker::new());
//! mind.right("code")?
//!     .below("stack")?
//!     .left(SplitOptions::new().display("regs").of("code"))?
//!     .build(&Settings::new())?;
//! # Ok(())
//! # }
//! ```

mod resolve;


pub use resolve::Cursor;

use serde_json::Value;

use crate::error::{MindError, MindResult};
use crate::models::{Direction, Settings, Split, Target};
use crate::splitter::Splitter;
use crate::thinker::Thinker;
use resolve::{lookup, resolve};

/// Arguments of a directional split
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitOptions {
    /// Reference pane; the cursor when absent
    pub of: Option<Target>,
    pub display: Option<String>,
    /// Backend arguments passed through untouched
    pub args: Vec<String>,
    pub settings: Settings,
}

impl SplitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(mut self, target: impl Into<Target>) -> Self {
        self.of = Some(target.into());
        self
    }

    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }
}

impl From<&str> for SplitOptions {
    fn from(display: &str) -> Self {
        SplitOptions::new().display(display)
    }
}

impl From<String> for SplitOptions {
    fn from(display: String) -> Self {
        SplitOptions::new().display(display)
    }
}

/// Arguments of [`Mind::show`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowOptions {
    /// Pane to show on; the cursor when absent
    pub on: Option<Target>,
    pub settings: Settings,
}

impl ShowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, target: impl Into<Target>) -> Self {
        self.on = Some(target.into());
        self
    }

    pub fn setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }
}

/// Builder that turns a chain of relative placements into a pane layout and
/// hands the result to a [`Thinker`].
#[derive(Debug)]
pub struct Mind<S, T> {
    splitter: S,
    thinker: T,
    cursor: Cursor,
    built: bool,
}

impl<S: Splitter, T: Thinker> Mind<S, T> {
    pub fn new(splitter: S, thinker: T) -> Self {
        Self {
            splitter,
            thinker,
            cursor: Cursor::Root,
            built: false,
        }
    }

    /// Split a new pane left of the current one
    pub fn left(&mut self, options: impl Into<SplitOptions>) -> MindResult<&mut Self> {
        self.split(Direction::Left, options.into())
    }

    /// Split a new pane right of the current one
    pub fn right(&mut self, options: impl Into<SplitOptions>) -> MindResult<&mut Self> {
        self.split(Direction::Right, options.into())
    }

    /// Split a new pane above the current one
    pub fn above(&mut self, options: impl Into<SplitOptions>) -> MindResult<&mut Self> {
        self.split(Direction::Above, options.into())
    }

    /// Split a new pane below the current one
    pub fn below(&mut self, options: impl Into<SplitOptions>) -> MindResult<&mut Self> {
        self.split(Direction::Below, options.into())
    }

    /// Show `label` on an existing pane as well, without splitting.
    ///
    /// The new record inherits the pane's settings with `options.settings`
    /// laid over them, and becomes the cursor.
    pub fn show(&mut self, label: &str, options: ShowOptions) -> MindResult<&mut Self> {
        self.ensure_open()?;
        let resolved = resolve(&self.splitter, &self.cursor, options.on.as_ref())?;
        if resolved.is_skip() {
            tracing::debug!(display = label, "show skipped, no pane to show on");
            self.cursor = Cursor::Detached;
            return Ok(self);
        }

        let produced = self
            .splitter
            .show(label, resolved.target(), &options.settings)
            .map_err(MindError::Splitter)?;
        tracing::debug!(display = label, on = ?resolved.target().map(Split::id), "show");
        self.advance(produced);
        Ok(self)
    }

    /// Move the cursor to the first pane showing `display`, or back to the
    /// root pane for `None`.
    ///
    /// An unknown display fails, and leaves the cursor pointing at it so
    /// that operations relying on the cursor keep failing.
    pub fn select(&mut self, display: Option<&str>) -> MindResult<&mut Self> {
        self.ensure_open()?;
        let Some(display) = display else {
            self.cursor = Cursor::Root;
            return Ok(self);
        };

        match lookup(&self.splitter, display) {
            Ok(Some(split)) => self.cursor = Cursor::At(split),
            Ok(None) => self.cursor = Cursor::Detached,
            Err(e) => {
                self.cursor = Cursor::Unresolved(display.to_string());
                return Err(e);
            }
        }
        Ok(self)
    }

    /// Forward backend-specific options to the splitter, targeting `target`
    /// or the cursor.
    pub fn tell_splitter(
        &mut self,
        target: Option<Target>,
        config: &Settings,
    ) -> MindResult<&mut Self> {
        self.ensure_open()?;
        let resolved = resolve(&self.splitter, &self.cursor, target.as_ref())?;
        if resolved.is_skip() {
            return Ok(self);
        }
        self.splitter
            .configure(resolved.target(), config)
            .map_err(MindError::Splitter)?;
        Ok(self)
    }

    /// Finish the layout and hand every split to the thinker.
    ///
    /// This is a one-way step: the mind accepts no further operations.
    pub fn build(&mut self, config: &Settings) -> MindResult<()> {
        self.ensure_open()?;
        self.built = true;

        self.splitter.finish(config).map_err(MindError::Splitter)?;
        let splits = self.splitter.splits();
        tracing::debug!(panes = splits.len(), "layout finished");
        self.thinker
            .setup(splits, config)
            .map_err(MindError::Thinker)
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Every split produced so far, in creation order
    pub fn splits(&self) -> &[Split] {
        self.splitter.splits()
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn splitter(&self) -> &S {
        &self.splitter
    }

    pub fn thinker(&self) -> &T {
        &self.thinker
    }

    /// Give the capabilities back, e.g. to keep a backend session alive
    pub fn into_parts(self) -> (S, T) {
        (self.splitter, self.thinker)
    }

    fn split(&mut self, direction: Direction, options: SplitOptions) -> MindResult<&mut Self> {
        self.ensure_open()?;
        let resolved = resolve(&self.splitter, &self.cursor, options.of.as_ref())?;
        if resolved.is_skip() {
            tracing::debug!(
                %direction,
                display = ?options.display,
                "split skipped, no pane to split"
            );
            self.cursor = Cursor::Detached;
            return Ok(self);
        }

        let target = resolved.target();
        let display = options.display.as_deref();
        let args = options.args.as_slice();
        let settings = &options.settings;
        let produced = match direction {
            Direction::Left => self.splitter.left(args, target, display, settings),
            Direction::Right => self.splitter.right(args, target, display, settings),
            Direction::Above => self.splitter.above(args, target, display, settings),
            Direction::Below => self.splitter.below(args, target, display, settings),
        }
        .map_err(MindError::Splitter)?;

        tracing::debug!(
            %direction,
            of = ?target.map(Split::id),
            display = ?options.display,
            pane = ?produced.as_ref().map(Split::id),
            "split"
        );
        self.advance(produced);
        Ok(self)
    }

    fn advance(&mut self, produced: Option<Split>) {
        self.cursor = match produced {
            Some(split) => Cursor::At(split),
            None => Cursor::Detached,
        };
    }

    fn ensure_open(&self) -> MindResult<()> {
        if self.built {
            return Err(MindError::AlreadyBuilt);
        }
        Ok(())
    }
}

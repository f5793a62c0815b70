use crate::error::{MindError, MindResult};
use crate::models::{Split, Target};
use crate::splitter::Splitter;

/// Implicit target of operations that name no pane
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cursor {
    /// The pane the session started in
    #[default]
    Root,
    /// The split produced most recently
    At(Split),
    /// A selected display that matched no pane
    Unresolved(String),
    /// The backend produced nothing for the previous operation
    Detached,
}

/// Outcome of resolving a reference
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Resolved {
    Root,
    Split(Split),
    /// Nothing to act on; the operation becomes a no-op
    Skip,
}

impl Resolved {
    /// Target to hand to the splitter, `None` meaning the root pane
    pub(crate) fn target(&self) -> Option<&Split> {
        match self {
            Resolved::Split(split) => Some(split),
            Resolved::Root | Resolved::Skip => None,
        }
    }

    pub(crate) fn is_skip(&self) -> bool {
        matches!(self, Resolved::Skip)
    }
}

/// Resolve `explicit`, falling back to the cursor. Never mutates anything.
pub(crate) fn resolve<S: Splitter + ?Sized>(
    splitter: &S,
    cursor: &Cursor,
    explicit: Option<&Target>,
) -> MindResult<Resolved> {
    match explicit {
        Some(Target::Split(split)) => Ok(Resolved::Split(split.clone())),
        Some(Target::Display(display)) => {
            Ok(lookup(splitter, display)?.map_or(Resolved::Skip, Resolved::Split))
        }
        None => match cursor {
            Cursor::Root => Ok(Resolved::Root),
            Cursor::At(split) => Ok(Resolved::Split(split.clone())),
            Cursor::Unresolved(display) => Err(MindError::UnresolvedDisplay(display.clone())),
            Cursor::Detached => Ok(Resolved::Skip),
        },
    }
}

/// First pane showing `display`. A stand-in backend knows no panes, so a
/// miss there yields `None` instead of an error.
pub(crate) fn lookup<S: Splitter + ?Sized>(
    splitter: &S,
    display: &str,
) -> MindResult<Option<Split>> {
    match splitter.get(display) {
        Some(split) => Ok(Some(split)),
        None if !splitter.available() => Ok(None),
        None => Err(MindError::UnresolvedDisplay(display.to_string())),
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form options attached to a split, keyed by option name.
///
/// Keys mean nothing to the builder itself; splitters and thinkers each
/// document the ones they recognise.
pub type Settings = BTreeMap<String, Value>;

/// One logical content assignment on a physical terminal pane.
///
/// A `Split` is a value: nothing mutates it after creation. Assigning a new
/// display to an existing pane produces a second `Split` carrying the same
/// `id` and `tty`, so several values may alias one physical pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    id: String,
    tty: Option<String>,
    display: Option<String>,
    #[serde(default)]
    settings: Settings,
}

impl Split {
    pub fn new(id: impl Into<String>, tty: Option<String>) -> Self {
        Self {
            id: id.into(),
            tty,
            display: None,
            settings: Settings::new(),
        }
    }

    /// Backend identifier of the physical pane
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Writable output destination of the pane, if the backend exposes one
    pub fn tty(&self) -> Option<&str> {
        self.tty.as_deref()
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    /// Boolean setting with a fallback for absent or non-boolean values
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.settings
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    pub fn with_display(self, display: Option<String>) -> Self {
        Self { display, ..self }
    }

    pub fn with_settings(self, settings: Settings) -> Self {
        Self { settings, ..self }
    }

    /// A new record on the same physical pane showing `display`, with
    /// `overrides` laid over this split's settings.
    pub fn reassigned(&self, display: impl Into<String>, overrides: &Settings) -> Self {
        Self {
            id: self.id.clone(),
            tty: self.tty.clone(),
            display: Some(display.into()),
            settings: merge_settings(&self.settings, overrides),
        }
    }

    /// Whether both values refer to the same physical pane
    pub fn same_pane(&self, other: &Split) -> bool {
        self.id == other.id
    }
}

/// Copy of `base` with every key of `overrides` replacing the base value
pub fn merge_settings(base: &Settings, overrides: &Settings) -> Settings {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Explicit reference to a pane: either a display label or a split value
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Display(String),
    Split(Split),
}

impl From<&str> for Target {
    fn from(display: &str) -> Self {
        Target::Display(display.to_string())
    }
}

impl From<String> for Target {
    fn from(display: String) -> Self {
        Target::Display(display)
    }
}

impl From<Split> for Target {
    fn from(split: Split) -> Self {
        Target::Split(split)
    }
}

impl From<&Split> for Target {
    fn from(split: &Split) -> Self {
        Target::Split(split.clone())
    }
}

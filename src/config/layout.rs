//! Declarative layout files.
//!
//! A layout is a TOML document listing [`Mind`] operations in order. It is
//! replayed onto any splitter, which is how `splitmind plan` previews a
//! layout without touching tmux.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MindResult;
use crate::mind::{Mind, ShowOptions, SplitOptions};
use crate::models::{Direction, Settings, Target};
use crate::splitter::Splitter;
use crate::thinker::Thinker;

/// Layout used when the user has none, embedded at compile time
pub const DEFAULT_LAYOUT: &str = include_str!("defaults.toml");

/// A directional split step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitStep {
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub of: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub settings: Settings,
}

impl SplitStep {
    fn options(&self) -> SplitOptions {
        SplitOptions {
            of: self.of.clone().map(Target::Display),
            display: self.display.clone(),
            args: self.args.clone(),
            settings: self.settings.clone(),
        }
    }
}

/// One `[[step]]` entry, tagged by its `op` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Step {
    Left(SplitStep),
    Right(SplitStep),
    Above(SplitStep),
    Below(SplitStep),
    Show {
        display: String,
        #[serde(default)]
        on: Option<String>,
        #[serde(default)]
        settings: Settings,
    },
    Select {
        /// Omitted to return to the root pane
        #[serde(default)]
        display: Option<String>,
    },
    Tell {
        #[serde(default)]
        target: Option<String>,
        #[serde(default)]
        settings: Settings,
    },
}

impl Step {
    pub fn apply<S: Splitter, T: Thinker>(&self, mind: &mut Mind<S, T>) -> MindResult<()> {
        match self {
            Step::Left(step) => mind.left(step.options())?,
            Step::Right(step) => mind.right(step.options())?,
            Step::Above(step) => mind.above(step.options())?,
            Step::Below(step) => mind.below(step.options())?,
            Step::Show {
                display,
                on,
                settings,
            } => {
                let options = ShowOptions {
                    on: on.clone().map(Target::Display),
                    settings: settings.clone(),
                };
                mind.show(display, options)?
            }
            Step::Select { display } => mind.select(display.as_deref())?,
            Step::Tell { target, settings } => {
                mind.tell_splitter(target.clone().map(Target::Display), settings)?
            }
        };
        Ok(())
    }

    /// Direction of a split step, `None` for the other operations
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Step::Left(_) => Some(Direction::Left),
            Step::Right(_) => Some(Direction::Right),
            Step::Above(_) => Some(Direction::Above),
            Step::Below(_) => Some(Direction::Below),
            _ => None,
        }
    }
}

/// A whole layout file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Options forwarded to the splitter before the first step
    #[serde(default)]
    pub splitter: Settings,
    /// Options passed to the build step
    #[serde(default)]
    pub build: Settings,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Layout {
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse layout")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid layout {}", path.display()))
    }

    /// Load `path` if given, else the user's layout file, else the
    /// embedded default.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_layout_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                tracing::debug!("using built-in layout");
                Self::parse(DEFAULT_LAYOUT)
            }
        }
    }

    /// Replay every step onto `mind`, without building
    pub fn apply<S: Splitter, T: Thinker>(&self, mind: &mut Mind<S, T>) -> MindResult<()> {
        if !self.splitter.is_empty() {
            mind.tell_splitter(None, &self.splitter)?;
        }
        for step in &self.steps {
            step.apply(mind)?;
        }
        Ok(())
    }

    /// Replay every step and build with the `[build]` options
    pub fn build<S: Splitter, T: Thinker>(&self, mind: &mut Mind<S, T>) -> MindResult<()> {
        self.apply(mind)?;
        mind.build(&self.build)
    }
}

/// Where the user's layout lives, e.g. `~/.config/splitmind/layout.toml`
pub fn default_layout_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("splitmind").join("layout.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MindError;
    use crate::models::Split;
    use crate::splitter::{MemorySplitter, SplitterCall};
    use serde_json::json;
    use tempfile::TempDir;

    #[derive(Default)]
    struct CollectingThinker {
        displays: Vec<Option<String>>,
    }

    impl Thinker for CollectingThinker {
        fn setup(&mut self, splits: &[Split], _config: &Settings) -> anyhow::Result<()> {
            self.displays = splits
                .iter()
                .map(|s| s.display().map(str::to_string))
                .collect();
            Ok(())
        }
    }

    fn memory_mind() -> Mind<MemorySplitter, CollectingThinker> {
        Mind::new(MemorySplitter::new(), CollectingThinker::default())
    }

    #[test]
    fn test_parse_steps() {
        let layout = Layout::parse(
            r#"
            [build]
            nobanner = true

            [[step]]
            op = "right"
            display = "code"
            args = ["-f"]
            settings = { size = "40%" }

            [[step]]
            op = "select"

            [[step]]
            op = "show"
            display = "legend"
            on = "code"
            "#,
        )
        .unwrap();

        assert_eq!(layout.build.get("nobanner"), Some(&json!(true)));
        assert_eq!(layout.steps.len(), 3);
        assert_eq!(layout.steps[0].direction(), Some(Direction::Right));
        match &layout.steps[0] {
            Step::Right(step) => {
                assert_eq!(step.display.as_deref(), Some("code"));
                assert_eq!(step.args, vec!["-f".to_string()]);
                assert_eq!(step.settings.get("size"), Some(&json!("40%")));
            }
            other => panic!("unexpected step {:?}", other),
        }
        assert_eq!(layout.steps[1], Step::Select { display: None });
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        let err = Layout::parse("[[step]]\nop = \"diagonal\"\n").unwrap_err();
        assert!(format!("{:#}", err).contains("diagonal"));
    }

    #[test]
    fn test_default_layout_replays() {
        let layout = Layout::parse(DEFAULT_LAYOUT).unwrap();
        let mut mind = memory_mind();
        layout.build(&mut mind).unwrap();

        assert_eq!(
            mind.thinker().displays,
            vec![
                Some("backtrace".to_string()),
                Some("stack".to_string()),
                Some("regs".to_string()),
                Some("disasm".to_string()),
                Some("legend".to_string()),
            ]
        );

        let calls = mind.splitter().calls();
        assert!(matches!(&calls[0], SplitterCall::Configure { target: None, .. }));
        // "of = main" targets the root pane
        match &calls[4] {
            SplitterCall::Split { target, display, .. } => {
                assert_eq!(target.as_deref(), Some("%0"));
                assert_eq!(display.as_deref(), Some("disasm"));
            }
            other => panic!("unexpected call {:?}", other),
        }
        // legend shares the disasm pane
        let splits = mind.splits();
        assert!(splits[4].same_pane(&splits[3]));
    }

    #[test]
    fn test_unresolved_step_aborts_replay() {
        let layout = Layout::parse(
            r#"
            [[step]]
            op = "below"
            display = "stack"

            [[step]]
            op = "left"
            of = "stak"
            display = "regs"
            "#,
        )
        .unwrap();
        let mut mind = memory_mind();

        let err = layout.build(&mut mind).unwrap_err();
        assert!(matches!(err, MindError::UnresolvedDisplay(ref d) if d == "stak"));
        assert!(!mind.is_built());
        assert_eq!(mind.splits().len(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.toml");
        std::fs::write(&path, "[[step]]\nop = \"above\"\ndisplay = \"regs\"\n").unwrap();

        let layout = Layout::resolve(Some(&path)).unwrap();
        assert_eq!(layout.steps.len(), 1);

        let missing = dir.path().join("missing.toml");
        let err = Layout::load(&missing).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }
}

use anyhow::{bail, Result};

use super::{SplitRequest, Splitter, ROOT_DISPLAY};
use crate::models::{Direction, Settings, Split};

/// A request received by a [`MemorySplitter`], with targets reduced to pane ids
#[derive(Debug, Clone, PartialEq)]
pub enum SplitterCall {
    Split {
        direction: Direction,
        args: Vec<String>,
        target: Option<String>,
        display: Option<String>,
        settings: Settings,
    },
    Show {
        display: String,
        target: Option<String>,
        settings: Settings,
    },
    Configure {
        target: Option<String>,
        config: Settings,
    },
    Finish {
        config: Settings,
    },
}

/// In-process splitter with synthetic pane ids (`%1`, `%2`, ...).
///
/// Nothing is drawn; every request is recorded so a layout can be planned
/// without a multiplexer or inspected after a build.
#[derive(Debug)]
pub struct MemorySplitter {
    root: Split,
    panes: Vec<Split>,
    calls: Vec<SplitterCall>,
    next_id: usize,
    finished: bool,
}

impl Default for MemorySplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySplitter {
    pub fn new() -> Self {
        Self {
            root: Split::new("%0", None).with_display(Some(ROOT_DISPLAY.to_string())),
            panes: Vec::new(),
            calls: Vec::new(),
            next_id: 1,
            finished: false,
        }
    }

    pub fn calls(&self) -> &[SplitterCall] {
        &self.calls
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of distinct physical panes behind the recorded splits
    pub fn pane_count(&self) -> usize {
        let mut ids: Vec<&str> = self.panes.iter().map(Split::id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.finished {
            bail!("splitter already finished");
        }
        Ok(())
    }
}

impl Splitter for MemorySplitter {
    fn split(&mut self, request: SplitRequest<'_>) -> Result<Option<Split>> {
        self.ensure_open()?;
        self.calls.push(SplitterCall::Split {
            direction: request.direction,
            args: request.args.to_vec(),
            target: request.target.map(|t| t.id().to_string()),
            display: request.display.map(str::to_string),
            settings: request.settings.clone(),
        });

        let split = Split::new(format!("%{}", self.next_id), None)
            .with_display(request.display.map(str::to_string))
            .with_settings(request.settings.clone());
        self.next_id += 1;
        self.panes.push(split.clone());
        Ok(Some(split))
    }

    fn show(
        &mut self,
        display: &str,
        target: Option<&Split>,
        settings: &Settings,
    ) -> Result<Option<Split>> {
        self.ensure_open()?;
        self.calls.push(SplitterCall::Show {
            display: display.to_string(),
            target: target.map(|t| t.id().to_string()),
            settings: settings.clone(),
        });

        let source = target.unwrap_or(&self.root);
        let split = source.reassigned(display, settings);
        self.panes.push(split.clone());
        Ok(Some(split))
    }

    fn root(&self) -> Option<&Split> {
        Some(&self.root)
    }

    fn configure(&mut self, target: Option<&Split>, config: &Settings) -> Result<()> {
        self.calls.push(SplitterCall::Configure {
            target: target.map(|t| t.id().to_string()),
            config: config.clone(),
        });
        Ok(())
    }

    fn finish(&mut self, config: &Settings) -> Result<()> {
        self.calls.push(SplitterCall::Finish {
            config: config.clone(),
        });
        self.finished = true;
        Ok(())
    }

    fn splits(&self) -> &[Split] {
        &self.panes
    }
}

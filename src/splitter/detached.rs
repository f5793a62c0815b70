use anyhow::Result;

use super::{SplitRequest, Splitter};
use crate::models::{Settings, Split};

/// Stand-in used when there is no multiplexer session to split.
///
/// Every request succeeds without producing a pane, so a layout chain runs
/// to completion and the thinker receives an empty collection.
#[derive(Debug, Default)]
pub struct DetachedSplitter {
    reason: String,
}

impl DetachedSplitter {
    pub fn new(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!(%reason, "no pane backend available; layout requests will be ignored");
        Self { reason }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Splitter for DetachedSplitter {
    fn split(&mut self, request: SplitRequest<'_>) -> Result<Option<Split>> {
        tracing::debug!(
            direction = %request.direction,
            display = ?request.display,
            "ignoring split"
        );
        Ok(None)
    }

    fn show(
        &mut self,
        label: &str,
        _target: Option<&Split>,
        _settings: &Settings,
    ) -> Result<Option<Split>> {
        tracing::debug!(display = label, "ignoring show");
        Ok(None)
    }

    fn get(&self, _display: &str) -> Option<Split> {
        None
    }

    fn configure(&mut self, _target: Option<&Split>, _config: &Settings) -> Result<()> {
        Ok(())
    }

    fn finish(&mut self, _config: &Settings) -> Result<()> {
        Ok(())
    }

    fn splits(&self) -> &[Split] {
        &[]
    }

    fn available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_produces_nothing() {
        let mut splitter = DetachedSplitter::new("not running under tmux");
        let settings = Settings::new();

        assert!(splitter.right(&[], None, Some("code"), &settings).unwrap().is_none());
        assert!(splitter.show("regs", None, &settings).unwrap().is_none());
        assert!(splitter.get("code").is_none());
        assert!(splitter.splits().is_empty());
        assert!(!splitter.available());
        assert_eq!(splitter.reason(), "not running under tmux");
    }
}

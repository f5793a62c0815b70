use anyhow::{Context, Result};
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;

use super::Thinker;
use crate::models::{merge_settings, Settings, Split};
use crate::splitter::PANE_WIDTH;

/// Cursor home followed by erase display
pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

const DEFAULT_WIDTH: usize = 80;

/// One banner line naming `display`, padded with rules to `width` columns
pub fn banner_line(display: &str, width: usize) -> String {
    let mut line = format!("─[ {} ]", display);
    let used = line.chars().count();
    if used < width {
        line.push_str(&"─".repeat(width - used));
    }
    line
}

/// Clears every pane it is given and writes a section banner into each
/// pane that shows something.
///
/// Split settings: `clearing` (default true), `banner` (default true),
/// `width`. Build options: `nobanner`, `width`. Without either width the
/// banner fills the pane width the backend measured, or 80 columns.
#[derive(Debug, Default)]
pub struct BannerThinker {
    written: Vec<String>,
}

impl BannerThinker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Displays that received a banner during the last setup
    pub fn written(&self) -> &[String] {
        &self.written
    }

    fn write_to(tty: &str, text: &str) -> Result<()> {
        let mut out = OpenOptions::new()
            .append(true)
            .open(tty)
            .with_context(|| format!("Failed to open {}", tty))?;
        out.write_all(text.as_bytes())
            .and_then(|_| out.flush())
            .with_context(|| format!("Failed to write to {}", tty))?;
        Ok(())
    }
}

fn width_of(value: Option<&Value>) -> Option<usize> {
    value.and_then(Value::as_u64).map(|w| w as usize)
}

impl Thinker for BannerThinker {
    fn setup(&mut self, splits: &[Split], config: &Settings) -> Result<()> {
        self.written.clear();
        let nobanner = config
            .get("nobanner")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let config_width = width_of(config.get("width"));

        let panes: Vec<Split> = splits
            .iter()
            .filter(|split| split.tty().is_some())
            .map(|split| {
                if nobanner && split.setting("banner").is_none() {
                    let mut off = Settings::new();
                    off.insert("banner".to_string(), Value::Bool(false));
                    let settings = merge_settings(split.settings(), &off);
                    split.clone().with_settings(settings)
                } else {
                    split.clone()
                }
            })
            .collect();

        let mut cleared: Vec<&str> = Vec::new();
        for pane in panes.iter().filter(|p| p.flag("clearing", true)) {
            if let Some(tty) = pane.tty() {
                if !cleared.contains(&tty) {
                    Self::write_to(tty, CLEAR_SCREEN)?;
                    cleared.push(tty);
                }
            }
        }

        for pane in panes.iter().filter(|p| p.flag("banner", true)) {
            let (Some(label), Some(tty)) = (pane.display(), pane.tty()) else {
                continue;
            };
            let width = width_of(pane.setting("width"))
                .or(config_width)
                .or_else(|| width_of(pane.setting(PANE_WIDTH)))
                .unwrap_or(DEFAULT_WIDTH);
            Self::write_to(tty, &format!("{}\n", banner_line(label, width)))?;
            tracing::debug!(display = label, tty, "wrote banner");
            self.written.push(label.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn pane(dir: &TempDir, id: &str, file: &str, display: Option<&str>) -> Split {
        let path = dir.path().join(file);
        std::fs::write(&path, "").unwrap();
        Split::new(id, Some(path.to_string_lossy().to_string()))
            .with_display(display.map(str::to_string))
    }

    fn read(split: &Split) -> String {
        std::fs::read_to_string(split.tty().unwrap()).unwrap()
    }

    #[test]
    fn test_banner_line_padding() {
        assert_eq!(banner_line("regs", 12), "─[ regs ]───");
        assert_eq!(banner_line("disasm", 4), "─[ disasm ]");
    }

    #[test]
    fn test_setup_clears_once_and_writes_banners() {
        let dir = TempDir::new().unwrap();
        let code = pane(&dir, "%1", "pts1", Some("code"));
        let source = code.reassigned("source", &Settings::new());
        let root = Split::new("%0", None).with_display(Some("main".to_string()));

        let mut config = Settings::new();
        config.insert("width".to_string(), json!(10));
        let mut thinker = BannerThinker::new();
        thinker
            .setup(&[root, code.clone(), source], &config)
            .unwrap();

        let expected = format!(
            "{}{}\n{}\n",
            CLEAR_SCREEN,
            banner_line("code", 10),
            banner_line("source", 10)
        );
        assert_eq!(read(&code), expected);
        assert_eq!(thinker.written(), ["code", "source"]);
    }

    #[test]
    fn test_setup_respects_pane_settings() {
        let dir = TempDir::new().unwrap();
        let mut quiet = Settings::new();
        quiet.insert("clearing".to_string(), json!(false));
        quiet.insert("banner".to_string(), json!(false));
        let silent = pane(&dir, "%1", "pts1", Some("stack")).with_settings(quiet);
        let blank = pane(&dir, "%2", "pts2", None);

        let mut thinker = BannerThinker::new();
        thinker.setup(&[silent.clone(), blank.clone()], &Settings::new()).unwrap();

        assert_eq!(read(&silent), "");
        assert_eq!(read(&blank), CLEAR_SCREEN);
        assert!(thinker.written().is_empty());
    }

    #[test]
    fn test_banner_width_falls_back_to_measured_pane() {
        let dir = TempDir::new().unwrap();
        let mut measured = Settings::new();
        measured.insert(PANE_WIDTH.to_string(), json!(30));
        let narrow = pane(&dir, "%1", "pts1", Some("regs")).with_settings(measured.clone());
        let unmeasured = pane(&dir, "%2", "pts2", Some("code"));

        let mut thinker = BannerThinker::new();
        thinker
            .setup(&[narrow.clone(), unmeasured.clone()], &Settings::new())
            .unwrap();
        assert_eq!(read(&narrow), format!("{}{}\n", CLEAR_SCREEN, banner_line("regs", 30)));
        assert_eq!(read(&unmeasured), format!("{}{}\n", CLEAR_SCREEN, banner_line("code", 80)));

        let overridden = pane(&dir, "%3", "pts3", Some("stack")).with_settings(measured);
        let mut config = Settings::new();
        config.insert("width".to_string(), json!(12));
        thinker.setup(&[overridden.clone()], &config).unwrap();
        assert_eq!(read(&overridden), format!("{}{}\n", CLEAR_SCREEN, banner_line("stack", 12)));
    }

    #[test]
    fn test_nobanner_only_fills_missing_setting() {
        let dir = TempDir::new().unwrap();
        let plain = pane(&dir, "%1", "pts1", Some("regs"));
        let mut forced = Settings::new();
        forced.insert("banner".to_string(), json!(true));
        let kept = pane(&dir, "%2", "pts2", Some("code")).with_settings(forced);

        let mut config = Settings::new();
        config.insert("nobanner".to_string(), json!(true));
        let mut thinker = BannerThinker::new();
        thinker.setup(&[plain, kept], &config).unwrap();

        assert_eq!(thinker.written(), ["code"]);
    }
}

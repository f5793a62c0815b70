//! tmux backend.
//!
//! Panes are created by shelling out to the `tmux` binary of the session
//! this process runs in. Every pane created here is killed again, and the
//! window options touched are restored, when the [`TmuxSplitter`] is dropped.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::process::Command;

use super::{SplitRequest, Splitter, PANE_WIDTH, ROOT_DISPLAY};
use crate::models::{merge_settings, Direction, Settings, Split};

/// Environment variable tmux sets to the id of the pane a process runs in
pub const TMUX_PANE_ENV: &str = "TMUX_PANE";

/// Command run inside new panes unless a split overrides it
pub const DEFAULT_CMD: &str = "/bin/cat -";

const BORDER_STATUS: &str = "pane-border-status";

/// Settings consumed by `split-window` itself rather than stored on the split
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaneOptions {
    pub cmd: Option<String>,
    pub use_stdin: bool,
    pub size: Option<String>,
}

impl PaneOptions {
    /// Take the tmux-specific keys out of `settings`, returning the rest
    pub fn extract(settings: &Settings) -> Result<(Self, Settings)> {
        let mut rest = settings.clone();
        let mut options = PaneOptions::default();

        if let Some(cmd) = rest.remove("cmd") {
            match cmd {
                Value::String(cmd) => options.cmd = Some(cmd),
                other => bail!("'cmd' must be a string, got {}", other),
            }
        }
        if let Some(use_stdin) = rest.remove("use_stdin") {
            match use_stdin {
                Value::Bool(flag) => options.use_stdin = flag,
                other => bail!("'use_stdin' must be a boolean, got {}", other),
            }
        }
        if let Some(size) = rest.remove("size") {
            match size {
                Value::String(size) => options.size = Some(size),
                Value::Number(n) => options.size = Some(n.to_string()),
                other => bail!("'size' must be a string or number, got {}", other),
            }
        }

        Ok((options, rest))
    }
}

/// `split-window` flag placing the new pane on the requested side
pub fn direction_flag(direction: Direction) -> &'static str {
    match direction {
        Direction::Left => "-hb",
        Direction::Right => "-h",
        Direction::Above => "-vb",
        Direction::Below => "-v",
    }
}

/// Size arguments: `"30%"` is a percentage, anything else lines or cells
pub fn size_args(size: &str) -> Result<Vec<String>> {
    let size = size.trim();
    let (flag, amount) = match size.strip_suffix('%') {
        Some(percent) => ("-p", percent),
        None => ("-l", size),
    };
    if amount.is_empty() || !amount.chars().all(|c| c.is_ascii_digit()) {
        bail!("invalid pane size '{}'", size);
    }
    Ok(vec![flag.to_string(), amount.to_string()])
}

/// Full argument list for one `tmux split-window` invocation
pub fn split_window_args(
    direction: Direction,
    extra: &[String],
    target_id: &str,
    options: &PaneOptions,
    default_cmd: &str,
) -> Result<Vec<String>> {
    // Writing to a pane's tty does not reach its process's stdin; a pipe does.
    let fd = if options.use_stdin {
        "/proc/#{pane_pid}/fd/0"
    } else {
        "#{pane_tty}"
    };
    let mut args: Vec<String> = ["split-window", "-P", "-d", "-F"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    args.push(format!("#{{pane_id}}:{}", fd));
    args.push(direction_flag(direction).to_string());
    args.extend(extra.iter().cloned());
    args.push("-t".to_string());
    args.push(target_id.to_string());
    if let Some(size) = &options.size {
        args.extend(size_args(size)?);
    }

    let cmd = options.cmd.as_deref().unwrap_or(default_cmd);
    if options.use_stdin {
        args.push(format!("(cat)|{}", cmd));
    } else {
        args.push(cmd.to_string());
    }
    Ok(args)
}

/// Parse the `id:tty` line printed by `split-window -P`
pub fn parse_pane_line(output: &str) -> Result<(String, Option<String>)> {
    let line = output.trim();
    let (id, tty) = line
        .split_once(':')
        .with_context(|| format!("unexpected split-window output '{}'", line))?;
    if id.is_empty() {
        bail!("split-window reported an empty pane id");
    }
    let tty = (!tty.is_empty()).then(|| tty.to_string());
    Ok((id.to_string(), tty))
}

/// `pane-border-status` value for a `show_titles` option
pub fn border_status(show_titles: &Value) -> &'static str {
    match show_titles {
        Value::Bool(false) => "off",
        Value::String(s) if s == "bottom" => "bottom",
        Value::String(s) if s == "off" => "off",
        _ => "top",
    }
}

/// `set` arguments restoring one line of `show-options -w` output
pub fn restore_args(option_line: &str) -> Option<Vec<String>> {
    let line = option_line.trim();
    if line.is_empty() {
        return None;
    }
    let mut args = vec!["set".to_string()];
    match line.split_once(' ') {
        Some((name, value)) => {
            args.push(name.to_string());
            args.push(value.trim().trim_matches('"').to_string());
        }
        None => args.push(line.to_string()),
    }
    Some(args)
}

/// Title for a pane: every display shown on it, in creation order
pub fn pane_title<'a>(pane_id: &str, splits: impl IntoIterator<Item = &'a Split>) -> String {
    splits
        .into_iter()
        .filter(|split| split.id() == pane_id)
        .filter_map(Split::display)
        .collect::<Vec<_>>()
        .join(", ")
}

fn run_tmux(program: &str, args: &[String]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute {} {}", program, args.join(" ")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{} {} failed: {}", program, args.join(" "), stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Splitter driving the tmux server this process runs under
#[derive(Debug)]
pub struct TmuxSplitter {
    program: String,
    cmd: String,
    root: Split,
    panes: Vec<Split>,
    saved_options: Vec<String>,
    teardown: bool,
}

impl TmuxSplitter {
    /// Start a session rooted at `root_pane`, snapshotting the window
    /// options so they can be restored on drop.
    pub fn new(root_pane: impl Into<String>, cmd: impl Into<String>) -> Result<Self> {
        Self::with_program("tmux", root_pane, cmd)
    }

    pub fn with_program(
        program: impl Into<String>,
        root_pane: impl Into<String>,
        cmd: impl Into<String>,
    ) -> Result<Self> {
        let program = program.into();
        let listing = run_tmux(&program, &["show-options".to_string(), "-w".to_string()])
            .context("Failed to read tmux window options")?;
        let mut saved_options: Vec<String> = listing
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if !saved_options.iter().any(|o| o.starts_with(BORDER_STATUS)) {
            saved_options.push(format!("{} off", BORDER_STATUS));
        }

        let root = Split::new(root_pane, None).with_display(Some(ROOT_DISPLAY.to_string()));
        tracing::debug!(root = root.id(), "tmux session opened");

        Ok(Self {
            program,
            cmd: cmd.into(),
            root,
            panes: Vec::new(),
            saved_options,
            teardown: true,
        })
    }

    /// Session rooted at `$TMUX_PANE`, or `None` when not running under tmux
    pub fn from_env(cmd: impl Into<String>) -> Result<Option<Self>> {
        match std::env::var(TMUX_PANE_ENV) {
            Ok(pane) if !pane.is_empty() => Self::new(pane, cmd).map(Some),
            _ => Ok(None),
        }
    }

    /// Leave the panes and options in place when this splitter is dropped
    pub fn detach(&mut self) {
        self.teardown = false;
    }

    /// Width and height of a pane in cells
    pub fn pane_size(&self, split: &Split) -> Result<(u16, u16)> {
        let out = self.tmux(&[
            "display",
            "-p",
            "-F",
            "#{pane_width}:#{pane_height}",
            "-t",
            split.id(),
        ])?;
        let (width, height) = out
            .trim()
            .split_once(':')
            .with_context(|| format!("unexpected pane size '{}'", out.trim()))?;
        Ok((
            width.parse().context("invalid pane width")?,
            height.parse().context("invalid pane height")?,
        ))
    }

    fn tmux(&self, args: &[&str]) -> Result<String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        run_tmux(&self.program, &args)
    }

    fn set_title(&self, pane_id: &str, title: &str) -> Result<()> {
        self.tmux(&["select-pane", "-T", title, "-t", pane_id])?;
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut killed: Vec<&str> = Vec::new();
        for pane in &self.panes {
            let id = pane.id();
            if id == self.root.id() || killed.contains(&id) {
                continue;
            }
            if let Err(e) = self.tmux(&["kill-pane", "-t", id]) {
                tracing::warn!(pane = id, error = %e, "failed to kill pane");
            }
            killed.push(id);
        }

        for option in &self.saved_options {
            if let Some(args) = restore_args(option) {
                run_tmux(&self.program, &args)
                    .with_context(|| format!("Failed to restore option '{}'", option))?;
            }
        }
        Ok(())
    }
}

impl Splitter for TmuxSplitter {
    fn split(&mut self, request: SplitRequest<'_>) -> Result<Option<Split>> {
        let (options, settings) = PaneOptions::extract(request.settings)?;
        let target = request.target.unwrap_or(&self.root);
        let args = split_window_args(
            request.direction,
            request.args,
            target.id(),
            &options,
            &self.cmd,
        )?;

        let out = run_tmux(&self.program, &args)?;
        let (id, tty) = parse_pane_line(&out)?;
        let split = Split::new(id, tty)
            .with_display(request.display.map(str::to_string))
            .with_settings(settings);
        tracing::debug!(
            pane = split.id(),
            direction = %request.direction,
            target = target.id(),
            display = ?split.display(),
            "created pane"
        );

        self.panes.push(split.clone());
        if let Some(display) = split.display() {
            self.set_title(split.id(), display)?;
        }
        Ok(Some(split))
    }

    fn show(
        &mut self,
        display: &str,
        target: Option<&Split>,
        settings: &Settings,
    ) -> Result<Option<Split>> {
        let source = target.unwrap_or(&self.root);
        let split = source.reassigned(display, settings);
        self.panes.push(split.clone());

        if !display.is_empty() {
            let title = pane_title(split.id(), std::iter::once(&self.root).chain(&self.panes));
            self.set_title(split.id(), &title)?;
        }
        Ok(Some(split))
    }

    fn root(&self) -> Option<&Split> {
        Some(&self.root)
    }

    /// Recognised options: `show_titles` (true, `"top"`, `"bottom"`, false)
    /// and `set_title` (string, applied to the target pane).
    fn configure(&mut self, target: Option<&Split>, config: &Settings) -> Result<()> {
        if let Some(unknown) = config
            .keys()
            .find(|key| !matches!(key.as_str(), "show_titles" | "set_title"))
        {
            bail!("unknown tmux option '{}'", unknown);
        }
        let title = match config.get("set_title") {
            Some(value) => Some(
                value
                    .as_str()
                    .with_context(|| format!("'set_title' must be a string, got {}", value))?,
            ),
            None => None,
        };

        if let Some(show_titles) = config.get("show_titles") {
            self.tmux(&["set", BORDER_STATUS, border_status(show_titles)])?;
        }
        if let Some(title) = title {
            let pane = target.unwrap_or(&self.root);
            self.set_title(pane.id(), title)?;
        }
        Ok(())
    }

    /// Hands focus back to the root pane and records the final width of
    /// every pane under [`PANE_WIDTH`].
    fn finish(&mut self, _config: &Settings) -> Result<()> {
        // Older tmux focuses the newest pane after split-window.
        self.tmux(&["select-pane", "-t", self.root.id()])?;

        let mut widths: Vec<(String, u16)> = Vec::new();
        for pane in &self.panes {
            if widths.iter().any(|(id, _)| id == pane.id()) {
                continue;
            }
            let (width, _) = self.pane_size(pane)?;
            widths.push((pane.id().to_string(), width));
        }
        for pane in &mut self.panes {
            if let Some((_, width)) = widths.iter().find(|(id, _)| id == pane.id()) {
                let mut measured = Settings::new();
                measured.insert(PANE_WIDTH.to_string(), Value::from(*width));
                *pane = pane
                    .clone()
                    .with_settings(merge_settings(pane.settings(), &measured));
            }
        }
        Ok(())
    }

    fn splits(&self) -> &[Split] {
        &self.panes
    }
}

impl Drop for TmuxSplitter {
    fn drop(&mut self) {
        if !self.teardown {
            return;
        }
        if let Err(e) = self.close() {
            tracing::warn!(error = %e, "tmux teardown incomplete");
        }
    }
}

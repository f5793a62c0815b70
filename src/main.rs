use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufRead};
use std::path::PathBuf;

use splitmind::config::{default_layout_path, Layout};
use splitmind::logging::{self, LogLevel};
use splitmind::splitter::tmux::DEFAULT_CMD;
use splitmind::{
    BannerThinker, DetachedSplitter, ManifestThinker, MemorySplitter, Mind, Split, Thinker,
    TmuxSplitter,
};

#[derive(Parser)]
#[command(name = "splitmind")]
#[command(version)]
#[command(about = "Declarative tmux pane layouts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Layout file to use instead of the default one
    #[arg(short, long, global = true, env = "SPLITMIND_LAYOUT")]
    layout: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the panes a layout would create, without touching tmux
    Plan {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build the layout in the current tmux window
    Build {
        /// Leave the panes open after exiting
        #[arg(long)]
        detach: bool,
        /// Also write the finished layout as JSON to this file
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Command to run in new panes
        #[arg(long, default_value = DEFAULT_CMD)]
        cmd: String,
    },
    /// Print where the default layout file is looked up
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(
        LogLevel::from_verbosity(cli.verbose),
        cli.log_file.as_deref(),
    )?;

    match cli.command {
        Commands::Plan { json } => {
            let layout = Layout::resolve(cli.layout.as_deref())?;
            plan(&layout, json)?;
        }
        Commands::Build {
            detach,
            manifest,
            cmd,
        } => {
            let layout = Layout::resolve(cli.layout.as_deref())?;
            build(&layout, detach, manifest, &cmd)?;
        }
        Commands::Path => {
            let path = default_layout_path().context("Could not find config directory")?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn plan(layout: &Layout, json: bool) -> Result<()> {
    let mut thinkers: Vec<Box<dyn Thinker>> = Vec::new();
    if json {
        thinkers.push(Box::new(ManifestThinker::new(io::stdout())));
    }

    let mut mind = Mind::new(MemorySplitter::new(), thinkers);
    layout.build(&mut mind)?;

    if !json {
        print_plan(mind.splits());
    }
    Ok(())
}

fn print_plan(splits: &[Split]) {
    println!("{:<6} {:<16} SETTINGS", "PANE", "DISPLAY");
    for split in splits {
        let settings = if split.settings().is_empty() {
            String::new()
        } else {
            serde_json::to_string(split.settings()).unwrap_or_default()
        };
        println!(
            "{:<6} {:<16} {}",
            split.id(),
            split.display().unwrap_or("-"),
            settings
        );
    }
}

fn thinkers(manifest: Option<PathBuf>) -> Result<Vec<Box<dyn Thinker>>> {
    let mut thinkers: Vec<Box<dyn Thinker>> = vec![Box::new(BannerThinker::new())];
    if let Some(path) = manifest {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create manifest {}", path.display()))?;
        thinkers.push(Box::new(ManifestThinker::new(file)));
    }
    Ok(thinkers)
}

fn build(layout: &Layout, detach: bool, manifest: Option<PathBuf>, cmd: &str) -> Result<()> {
    let Some(tmux) = TmuxSplitter::from_env(cmd)? else {
        let mut mind = Mind::new(
            DetachedSplitter::new("TMUX_PANE is not set"),
            thinkers(manifest)?,
        );
        layout.build(&mut mind)?;
        return Ok(());
    };

    let mut mind = Mind::new(tmux, thinkers(manifest)?);
    layout.build(&mut mind)?;
    let panes = mind.splits().len();
    let (mut tmux, _) = mind.into_parts();

    if detach {
        tmux.detach();
        println!("Built {} panes", panes);
        return Ok(());
    }

    println!("Built {} panes; press Ctrl-D to close them", panes);
    for line in io::stdin().lock().lines() {
        line?;
    }
    // Dropping the splitter closes the panes and restores window options
    drop(tmux);
    Ok(())
}

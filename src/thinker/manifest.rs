use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;

use super::Thinker;
use crate::models::{Settings, Split};

/// Serialized form of a finished layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub panes: Vec<Split>,
    #[serde(default)]
    pub config: Settings,
}

/// Writes the finished layout as pretty JSON, for renderers living in
/// another process.
#[derive(Debug)]
pub struct ManifestThinker<W: Write> {
    out: W,
}

impl<W: Write> ManifestThinker<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Thinker for ManifestThinker<W> {
    fn setup(&mut self, splits: &[Split], config: &Settings) -> Result<()> {
        let manifest = Manifest {
            panes: splits.to_vec(),
            config: config.clone(),
        };
        serde_json::to_writer_pretty(&mut self.out, &manifest)
            .context("Failed to serialize layout manifest")?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

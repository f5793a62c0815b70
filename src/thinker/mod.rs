//! Content assignment for a finished layout.

mod banner;
mod manifest;

pub use banner::{banner_line, BannerThinker, CLEAR_SCREEN};
pub use manifest::{Manifest, ManifestThinker};

use anyhow::Result;

use crate::models::{Settings, Split};

/// Capability that decides what to show in each pane of a finished layout
pub trait Thinker {
    /// Receive every split of the session in creation order, together with
    /// the options passed to [`crate::Mind::build`].
    fn setup(&mut self, splits: &[Split], config: &Settings) -> Result<()>;
}

impl<T: Thinker + ?Sized> Thinker for Box<T> {
    fn setup(&mut self, splits: &[Split], config: &Settings) -> Result<()> {
        (**self).setup(splits, config)
    }
}

/// Every thinker in turn, stopping at the first failure
impl<T: Thinker> Thinker for Vec<T> {
    fn setup(&mut self, splits: &[Split], config: &Settings) -> Result<()> {
        for thinker in self.iter_mut() {
            thinker.setup(splits, config)?;
        }
        Ok(())
    }
}

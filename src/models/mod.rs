mod direction;
mod split;

pub use direction::Direction;
pub use split::{merge_settings, Settings, Split, Target};

mod layout;

pub use layout::{default_layout_path, Layout, SplitStep, Step, DEFAULT_LAYOUT};

use serde::{Deserialize, Serialize};

/// Where a new pane is placed relative to its reference pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Above,
    Below,
}

impl Direction {
    pub fn name(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Above => "above",
            Direction::Below => "below",
        }
    }

    /// Left and right split along the horizontal axis
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Left and above put the new pane before the reference pane
    pub fn is_before(&self) -> bool {
        matches!(self, Direction::Left | Direction::Above)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_and_order() {
        assert!(Direction::Left.is_horizontal());
        assert!(Direction::Right.is_horizontal());
        assert!(!Direction::Above.is_horizontal());
        assert!(!Direction::Below.is_horizontal());

        assert!(Direction::Left.is_before());
        assert!(Direction::Above.is_before());
        assert!(!Direction::Right.is_before());
        assert!(!Direction::Below.is_before());
    }

    #[test]
    fn test_deserialize_lowercase() {
        let dir: Direction = serde_json::from_str("\"below\"").unwrap();
        assert_eq!(dir, Direction::Below);
        assert_eq!(dir.to_string(), "below");
    }
}

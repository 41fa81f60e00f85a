//! Opponent difficulty presets.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Wide steering dead-zone, frequent mistakes, cautious
    Easy,
    #[default]
    Medium,
    Hard,
    /// Near-perfect lines, rare mistakes, commits to passes
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard, Difficulty::Expert];

    pub fn skill(&self) -> f32 {
        match self {
            Self::Easy => 0.35,
            Self::Medium => 0.6,
            Self::Hard => 0.8,
            Self::Expert => 0.95,
        }
    }

    pub fn aggressiveness(&self) -> f32 {
        match self {
            Self::Easy => 0.3,
            Self::Medium => 0.5,
            Self::Hard => 0.65,
            Self::Expert => 0.8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Expert => "expert",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard => Self::Expert,
            Self::Expert => Self::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown difficulty '{s}' (expected easy, medium, hard or expert)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_ordered() {
        for pair in Difficulty::ALL.windows(2) {
            assert!(pair[0].skill() < pair[1].skill());
            assert!(pair[0].aggressiveness() < pair[1].aggressiveness());
        }
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(Difficulty::Expert.to_string(), "expert");
        assert!("insane".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Expert.next(), Difficulty::Easy);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Difficulty::Easy).unwrap(), "\"easy\"");
    }
}

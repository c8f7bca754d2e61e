use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence that two contacts denote the same real-world entity.
///
/// Variants are declared in ascending order so the derived ordering gives
/// `Strong > Medium > Weak > None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrength {
    None,
    /// Same name only
    Weak,
    /// Same name plus one corroborating field
    Medium,
    /// Shared phone or email
    Strong,
}

impl fmt::Display for MatchStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchStrength::None => "none",
            MatchStrength::Weak => "weak",
            MatchStrength::Medium => "medium",
            MatchStrength::Strong => "strong",
        };
        f.write_str(label)
    }
}

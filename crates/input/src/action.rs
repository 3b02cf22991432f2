use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A car motion request produced by the key map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Drive forward along +Z.
    Forward,
    /// Drive backward along -Z.
    Backward,
    /// Slide toward +X while turning left.
    StrafeLeft,
    /// Slide toward -X while turning right.
    StrafeRight,
    /// Climb.
    Ascend,
    /// Sink, never below the ground.
    Descend,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Forward,
        Action::Backward,
        Action::StrafeLeft,
        Action::StrafeRight,
        Action::Ascend,
        Action::Descend,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Forward => "forward",
            Action::Backward => "backward",
            Action::StrafeLeft => "strafe_left",
            Action::StrafeRight => "strafe_right",
            Action::Ascend => "ascend",
            Action::Descend => "descend",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown action `{0}` (expected forward, backward, left, right, up or down)")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" | "fwd" => Ok(Action::Forward),
            "backward" | "back" => Ok(Action::Backward),
            "strafe_left" | "left" => Ok(Action::StrafeLeft),
            "strafe_right" | "right" => Ok(Action::StrafeRight),
            "ascend" | "up" => Ok(Action::Ascend),
            "descend" | "down" => Ok(Action::Descend),
            other => Err(ParseActionError(other.to_string())),
        }
    }
}

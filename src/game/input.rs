//! Input - Decode raw key events into game commands

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputCommand {
    LaneLeft,
    LaneRight,
    Start,
}

impl InputCommand {
    /// Map a DOM-style `key` / `code` pair to a command.
    ///
    /// Left arrow or `a` steers left, right arrow or `d` steers right (letters
    /// in either case) and the space bar starts a run. Anything else is `None`.
    pub fn from_key(key: &str, code: &str) -> Option<Self> {
        if code == "Space" || key == " " {
            return Some(Self::Start);
        }
        match key {
            "ArrowLeft" => Some(Self::LaneLeft),
            "ArrowRight" => Some(Self::LaneRight),
            k if k.eq_ignore_ascii_case("a") => Some(Self::LaneLeft),
            k if k.eq_ignore_ascii_case("d") => Some(Self::LaneRight),
            _ => None,
        }
    }
}

#![forbid(unsafe_code)]

//! Navigation commands understood by a listbox.

use std::fmt;
use std::str::FromStr;

use crate::config::{ConfigError, normalize};

/// A selection movement command.
///
/// `MoveLeft` and `MoveRight` exist for action maps that bind horizontal keys;
/// a vertical listbox treats them as [`Movement::MoveUp`] and
/// [`Movement::MoveDown`] (see [`Movement::vertical`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    MoveUp,
    MoveDown,
    /// First selectable row.
    MoveTop,
    /// Last selectable row.
    MoveEnd,
    PageUp,
    PageDown,
    /// Re-validate the current cursor without moving it unless it is invalid
    /// or unselectable.
    JustCheck,
    /// Keep the cursor but report the selection as changed.
    Refresh,
    MoveLeft,
    MoveRight,
}

impl Movement {
    /// Every command, in action-map order.
    pub const ALL: [Movement; 10] = [
        Self::MoveUp,
        Self::MoveDown,
        Self::MoveTop,
        Self::MoveEnd,
        Self::PageUp,
        Self::PageDown,
        Self::JustCheck,
        Self::Refresh,
        Self::MoveLeft,
        Self::MoveRight,
    ];

    /// Fold horizontal aliases onto their vertical equivalents.
    #[must_use]
    pub const fn vertical(self) -> Self {
        match self {
            Self::MoveLeft => Self::MoveUp,
            Self::MoveRight => Self::MoveDown,
            other => other,
        }
    }

    /// Action name as used in key maps.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MoveUp => "moveUp",
            Self::MoveDown => "moveDown",
            Self::MoveTop => "moveTop",
            Self::MoveEnd => "moveEnd",
            Self::PageUp => "pageUp",
            Self::PageDown => "pageDown",
            Self::JustCheck => "justCheck",
            Self::Refresh => "refresh",
            Self::MoveLeft => "moveLeft",
            Self::MoveRight => "moveRight",
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Movement {
    type Err = ConfigError;

    /// Parse an action name, accepting the legacy aliases
    /// (`moveFirst`, `moveBottom`, `moveLast`, `movePageUp`, `movePageDown`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "moveup" => Ok(Self::MoveUp),
            "movedown" => Ok(Self::MoveDown),
            "movetop" | "movefirst" => Ok(Self::MoveTop),
            "moveend" | "movebottom" | "movelast" => Ok(Self::MoveEnd),
            "pageup" | "movepageup" => Ok(Self::PageUp),
            "pagedown" | "movepagedown" => Ok(Self::PageDown),
            "justcheck" => Ok(Self::JustCheck),
            "refresh" => Ok(Self::Refresh),
            "moveleft" => Ok(Self::MoveLeft),
            "moveright" => Ok(Self::MoveRight),
            _ => Err(ConfigError::new("movement", value, "unknown listbox action")),
        }
    }
}

#![forbid(unsafe_code)]

//! Core types for listbox navigation: geometry, configuration, movement
//! commands and the logging facade. Nothing here depends on rendering.

pub mod config;
pub mod geometry;
pub mod logging;
pub mod movement;

pub use config::{
    Align, ConfigError, ConfigParse, ListboxConfig, ListboxStyle, ScrollGranularity,
    ScrollbarMode,
};
pub use geometry::{Point, Rect, Region, Size};
pub use movement::Movement;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};

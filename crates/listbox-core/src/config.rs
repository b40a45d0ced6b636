#![forbid(unsafe_code)]

//! Listbox configuration.
//!
//! A [`ListboxConfig`] is an immutable value handed to a listbox at
//! construction. It carries the scrollbar policy, wrap-around behaviour and
//! pixel metrics. Values can be read from the environment (see
//! [`ListboxConfig::from_env`]); unparseable variables keep their default and
//! are reported as [`ConfigError`]s.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::geometry::Point;

/// Environment variable selecting the scrollbar mode.
pub const ENV_SCROLLBAR_MODE: &str = "LISTBOX_SCROLLBAR_MODE";
/// Environment variable selecting the scroll granularity (`byPage`/`byLine`).
pub const ENV_SCROLL: &str = "LISTBOX_SCROLL";
/// Environment variable toggling wrap-around (`1/0/true/false`).
pub const ENV_WRAP_AROUND: &str = "LISTBOX_WRAP_AROUND";
/// Environment variable for the row height in pixels.
pub const ENV_ITEM_HEIGHT: &str = "LISTBOX_ITEM_HEIGHT";
/// Environment variable for the scrollbar width in pixels.
pub const ENV_SCROLLBAR_WIDTH: &str = "LISTBOX_SCROLLBAR_WIDTH";
/// Environment variable for the gap between scrollbar and rows in pixels.
pub const ENV_SCROLLBAR_OFFSET: &str = "LISTBOX_SCROLLBAR_OFFSET";
/// Environment variable for the scrollbar border width in pixels.
pub const ENV_SCROLLBAR_BORDER_WIDTH: &str = "LISTBOX_SCROLLBAR_BORDER_WIDTH";

/// Row height used when a caller asks for a zero item height.
pub const FALLBACK_ITEM_HEIGHT: u16 = 20;

/// When and where the scrollbar is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollbarMode {
    /// No scrollbar at all.
    #[default]
    Never,
    /// Right-aligned, visible only while the content exceeds one page.
    OnDemand,
    /// Right-aligned, always visible.
    Always,
    /// Left-aligned, visible only while the content exceeds one page.
    LeftOnDemand,
    /// Left-aligned, always visible.
    LeftAlways,
}

impl ScrollbarMode {
    /// Whether the scrollbar sits on the leading edge and reserves space there.
    #[must_use]
    pub const fn is_left(self) -> bool {
        matches!(self, Self::LeftOnDemand | Self::LeftAlways)
    }

    /// Whether the scrollbar is shown regardless of the entry count.
    #[must_use]
    pub const fn is_always(self) -> bool {
        matches!(self, Self::Always | Self::LeftAlways)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::OnDemand => "onDemand",
            Self::Always => "always",
            Self::LeftOnDemand => "leftOnDemand",
            Self::LeftAlways => "leftAlways",
        }
    }
}

impl FromStr for ScrollbarMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "never" | "shownever" => Ok(Self::Never),
            "ondemand" | "showondemand" => Ok(Self::OnDemand),
            "always" | "showalways" => Ok(Self::Always),
            "leftondemand" | "showleftondemand" => Ok(Self::LeftOnDemand),
            "leftalways" | "showleftalways" => Ok(Self::LeftAlways),
            _ => Err(ConfigError::new(
                "scrollbar_mode",
                value,
                "expected never, onDemand, always, leftOnDemand or leftAlways",
            )),
        }
    }
}

/// How the visible window follows the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollGranularity {
    /// The window snaps to page-aligned blocks.
    #[default]
    ByPage,
    /// The window shifts one row at a time, tracking the selection.
    ByLine,
}

impl ScrollGranularity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ByPage => "byPage",
            Self::ByLine => "byLine",
        }
    }
}

impl FromStr for ScrollGranularity {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "bypage" | "page" => Ok(Self::ByPage),
            "byline" | "line" => Ok(Self::ByLine),
            _ => Err(ConfigError::new(
                "granularity",
                value,
                "expected byPage or byLine",
            )),
        }
    }
}

/// Horizontal or vertical alignment hint passed through to content painters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align {
    /// Left or top.
    #[default]
    Start,
    Center,
    /// Right or bottom.
    End,
    /// Justified.
    Block,
}

/// Style hints handed to every row paint call.
///
/// The listbox never interprets these. Colours, fonts and pixmaps belong to the
/// surface the content paints on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListboxStyle {
    pub text_offset: Point,
    pub halign: Align,
    pub valign: Align,
    pub transparent_background: bool,
}

impl Default for ListboxStyle {
    fn default() -> Self {
        Self {
            text_offset: Point::new(1, 1),
            halign: Align::Start,
            valign: Align::Start,
            transparent_background: false,
        }
    }
}

/// Immutable listbox configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListboxConfig {
    pub scrollbar_mode: ScrollbarMode,
    pub granularity: ScrollGranularity,
    /// Moving past the first/last row re-enters at the opposite end.
    pub wrap_around: bool,
    /// Row height in pixels. Must be non-zero.
    pub item_height: u16,
    /// Scrollbar width in pixels.
    pub scrollbar_width: u16,
    /// Gap between the scrollbar and the rows in pixels.
    pub scrollbar_offset: u16,
    pub scrollbar_border_width: u16,
    pub style: ListboxStyle,
}

impl Default for ListboxConfig {
    fn default() -> Self {
        Self {
            scrollbar_mode: ScrollbarMode::Never,
            granularity: ScrollGranularity::ByPage,
            wrap_around: true,
            item_height: 25,
            scrollbar_width: 10,
            scrollbar_offset: 5,
            scrollbar_border_width: 1,
            style: ListboxStyle::default(),
        }
    }
}

impl ListboxConfig {
    #[must_use]
    pub fn with_scrollbar_mode(mut self, mode: ScrollbarMode) -> Self {
        self.scrollbar_mode = mode;
        self
    }

    #[must_use]
    pub fn with_granularity(mut self, granularity: ScrollGranularity) -> Self {
        self.granularity = granularity;
        self
    }

    #[must_use]
    pub fn with_wrap_around(mut self, wrap: bool) -> Self {
        self.wrap_around = wrap;
        self
    }

    /// Set the row height. Zero selects [`FALLBACK_ITEM_HEIGHT`].
    #[must_use]
    pub fn with_item_height(mut self, height: u16) -> Self {
        self.item_height = if height == 0 {
            FALLBACK_ITEM_HEIGHT
        } else {
            height
        };
        self
    }

    #[must_use]
    pub fn with_scrollbar_metrics(mut self, width: u16, offset: u16, border_width: u16) -> Self {
        self.scrollbar_width = width;
        self.scrollbar_offset = offset;
        self.scrollbar_border_width = border_width;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: ListboxStyle) -> Self {
        self.style = style;
        self
    }

    /// Horizontal space taken by the scrollbar and its gap.
    #[must_use]
    pub const fn scrollbar_reserve(&self) -> u16 {
        self.scrollbar_width.saturating_add(self.scrollbar_offset)
    }

    /// Parse config from environment variables, ignoring invalid values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok()).config
    }

    /// Parse config using a custom environment lookup and report diagnostics.
    pub fn from_env_with<F>(get_env: F) -> ConfigParse
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut errors = Vec::new();

        if let Some(value) = get_env(ENV_SCROLLBAR_MODE) {
            match value.parse() {
                Ok(mode) => config.scrollbar_mode = mode,
                Err(err) => errors.push(err),
            }
        }
        if let Some(value) = get_env(ENV_SCROLL) {
            match value.parse() {
                Ok(granularity) => config.granularity = granularity,
                Err(err) => errors.push(err),
            }
        }
        if let Some(value) = get_env(ENV_WRAP_AROUND) {
            match parse_bool(&value) {
                Some(wrap) => config.wrap_around = wrap,
                None => errors.push(ConfigError::new(
                    "wrap_around",
                    value,
                    "expected 1/0/true/false/yes/no/on/off",
                )),
            }
        }
        if let Some(px) = parse_px(&get_env, ENV_ITEM_HEIGHT, "item_height", &mut errors) {
            config.item_height = px;
        }
        if let Some(px) = parse_px(&get_env, ENV_SCROLLBAR_WIDTH, "scrollbar_width", &mut errors) {
            config.scrollbar_width = px;
        }
        if let Some(px) = parse_px(&get_env, ENV_SCROLLBAR_OFFSET, "scrollbar_offset", &mut errors)
        {
            config.scrollbar_offset = px;
        }
        if let Some(px) = parse_px(
            &get_env,
            ENV_SCROLLBAR_BORDER_WIDTH,
            "scrollbar_border_width",
            &mut errors,
        ) {
            config.scrollbar_border_width = px;
        }

        if let Err(mut invalid) = config.validate() {
            if invalid.iter().any(|e| e.field == "item_height") {
                config.item_height = Self::default().item_height;
            }
            errors.append(&mut invalid);
        }

        ConfigParse { config, errors }
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.item_height == 0 {
            errors.push(ConfigError::new("item_height", "0", "must be positive"));
        }
        if self.scrollbar_mode != ScrollbarMode::Never && self.scrollbar_width == 0 {
            errors.push(ConfigError::new(
                "scrollbar_width",
                "0",
                "must be positive when a scrollbar is shown",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration parse result with diagnostics.
#[derive(Debug, Clone)]
pub struct ConfigParse {
    pub config: ListboxConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    pub fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Lowercase and drop `-`/`_` so `left-on-demand`, `LEFT_ON_DEMAND` and
/// `leftOnDemand` all match.
pub(crate) fn normalize(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_px<F>(
    get_env: &F,
    key: &str,
    field: &'static str,
    errors: &mut Vec<ConfigError>,
) -> Option<u16>
where
    F: Fn(&str) -> Option<String>,
{
    let value = get_env(key)?;
    match value.trim().parse::<u16>() {
        Ok(px) => Some(px),
        Err(_) => {
            errors.push(ConfigError::new(field, value, "expected pixels (0..=65535)"));
            None
        }
    }
}

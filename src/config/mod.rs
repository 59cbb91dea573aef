//! Configuration management for tilegraph

pub mod parser;
pub mod settings;

pub use parser::{ConfigError, SettingsParser, MAX_WINDOW_MARGIN};
pub use settings::{Constraints, NavigationSettings, Settings, TiebreakFn, Tiebreaker};

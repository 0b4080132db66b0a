//! CLI enum types for camera facing and theme options.

use clap::ValueEnum;

use crate::camera::FacingMode;
use crate::settings::Theme;

/// Which camera to prefer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Facing {
    /// Rear camera
    #[default]
    Environment,
    /// Front camera
    User,
    Any,
}

impl From<Facing> for FacingMode {
    fn from(f: Facing) -> Self {
        match f {
            Facing::Environment => FacingMode::Environment,
            Facing::User => FacingMode::User,
            Facing::Any => FacingMode::Any,
        }
    }
}

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(t: ThemeArg) -> Self {
        match t {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

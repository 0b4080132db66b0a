//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{Args, CameraOpts, Command, ConfigAction, ImageSource, SettingsAction};
pub use commands::{
    handle_config_action, handle_settings_action, preprocess, road_sign, sign_letters,
    sign_predict, speak, translate, Context,
};
#[cfg(feature = "native-camera")]
pub use commands::{list_cameras, snap};
pub use enums::{Facing, ThemeArg};

//! CLI argument parsing with clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{Facing, ThemeArg};

/// Road sign and sign language recognition from photos, with translation
/// and speech.
#[derive(Parser, Debug)]
#[command(name = "signlens")]
#[command(version, about = "Recognize road signs and sign language from photos", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Recognition backend URL (overrides the config file)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Settings store file (overrides the config file)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

/// Where the photo comes from.
#[derive(ClapArgs, Debug, Clone)]
pub struct ImageSource {
    /// Image file (JPEG, PNG or WebP)
    #[arg(required_unless_present = "camera")]
    pub image: Option<PathBuf>,

    /// Take the photo with the camera instead of reading a file
    #[arg(long, conflicts_with = "image")]
    pub camera: bool,

    #[command(flatten)]
    pub camera_opts: CameraOpts,
}

/// Camera selection for commands that can take a photo.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct CameraOpts {
    /// Camera device index (from list-cameras)
    #[arg(long)]
    pub device: Option<u32>,

    /// Preferred camera
    #[arg(long)]
    pub facing: Option<Facing>,

    /// Mirror the photo horizontally
    #[arg(long)]
    pub mirror: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resample and binarize a photo, writing a PNG
    Preprocess {
        #[command(flatten)]
        source: ImageSource,

        /// Output PNG path
        #[arg(long, short)]
        out: PathBuf,

        /// Resampling factor (default from config)
        #[arg(long)]
        scale: Option<f64>,

        /// Binarization threshold 0-255 (default from config)
        #[arg(long)]
        threshold: Option<u8>,
    },
    /// Identify the road sign in a photo
    RoadSign {
        #[command(flatten)]
        source: ImageSource,
    },
    /// Show the alphabet sign for each letter of a text
    SignLetters {
        /// Text to spell
        text: String,
    },
    /// Recognize a hand sign in a photo
    SignPredict {
        #[command(flatten)]
        source: ImageSource,
    },
    /// Translate text
    Translate {
        /// Text to translate
        text: String,

        /// Source language (detected when omitted)
        #[arg(long, short)]
        source: Option<String>,

        /// Target language (default from config)
        #[arg(long, short)]
        target: Option<String>,

        /// Use the keyless endpoint
        #[arg(long)]
        quick: bool,

        /// Clean up text read off an image before translating
        #[arg(long)]
        clean_ocr: bool,
    },
    /// Synthesize speech for a text, writing an MP3
    Speak {
        /// Text to speak
        text: String,

        /// Language of the text
        #[arg(long, short, default_value = "en")]
        lang: String,

        /// Output MP3 path
        #[arg(long, short)]
        out: PathBuf,
    },
    /// User settings management
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List available cameras
    #[cfg(feature = "native-camera")]
    ListCameras,
    /// Take a photo with the camera, writing a PNG
    #[cfg(feature = "native-camera")]
    Snap {
        #[command(flatten)]
        camera_opts: CameraOpts,

        /// Output PNG path
        #[arg(long, short)]
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsAction {
    /// Show current settings
    Show,
    /// Change settings
    Set {
        /// Speech playback speed (0.25-4.0)
        #[arg(long)]
        speed: Option<f32>,

        /// Color theme
        #[arg(long)]
        theme: Option<ThemeArg>,
    },
    /// Restore default settings
    Reset,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

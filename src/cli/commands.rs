//! Subcommand handlers.
//!
//! Each handler prints its result to stdout and returns an [`Error`] for
//! `main` to report.

use std::path::{Path, PathBuf};

use super::args::{Args, CameraOpts, ConfigAction, ImageSource, SettingsAction};
use crate::camera::{CameraConstraints, Frame};
use crate::config::{default_path as get_config_path, Config, DEFAULT_CONFIG_TOML};
use crate::error::{Error, Result};
use crate::input::UploadedImage;
use crate::preprocess::preprocess as run_preprocess;
use crate::services::{
    api_key_from_env, clean_ocr_text, BackendClient, ServiceError, TranslateClient,
};
use crate::settings::{KeyValueStore, Settings};

/// Loaded configuration plus command-line overrides.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub config_path: PathBuf,
    pub backend_url: String,
    pub store_path: PathBuf,
}

impl Context {
    /// Load the config file named on the command line (which must exist),
    /// or the default one (which may be absent).
    pub fn load(args: &Args) -> Result<Self> {
        let config = match &args.config {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("Config file not found: {}", path.display()),
                    )));
                }
                Config::load(Some(path))?
            }
            None => Config::load(None)?,
        };
        let config_path = args.config.clone().unwrap_or_else(get_config_path);
        let backend_url = args
            .backend_url
            .clone()
            .unwrap_or_else(|| config.backend.url.clone());
        let store_path = args
            .store
            .clone()
            .or_else(|| config.storage.path.clone())
            .unwrap_or_else(crate::settings::default_store_path);

        Ok(Self {
            config,
            config_path,
            backend_url,
            store_path,
        })
    }

    fn backend(&self) -> Result<BackendClient> {
        Ok(BackendClient::with_base_url(self.backend_url.clone())?)
    }

    fn store(&self) -> KeyValueStore {
        KeyValueStore::new(self.store_path.clone())
    }

    fn constraints(&self, opts: &CameraOpts) -> CameraConstraints {
        let mut constraints = self.config.camera_constraints();
        if let Some(device) = opts.device {
            constraints.device_index = device;
        }
        if let Some(facing) = opts.facing {
            constraints.facing = facing.into();
        }
        constraints.mirror |= opts.mirror;
        constraints
    }

    /// Read the photo named by `source`, from a file or the camera.
    async fn photo(&self, source: &ImageSource) -> Result<UploadedImage> {
        let limits = self.config.input_limits();
        match &source.image {
            Some(path) if !source.camera => {
                let path = path.clone();
                run_blocking(move || Ok(UploadedImage::from_path(&path, &limits)?)).await
            }
            _ => {
                let frame = self.snap(&source.camera_opts).await?;
                Ok(UploadedImage::from_frame(frame, &limits)?)
            }
        }
    }

    #[cfg(feature = "native-camera")]
    async fn snap(&self, opts: &CameraOpts) -> Result<Frame> {
        use crate::camera::{CaptureController, NativeBackend};

        let constraints = self.constraints(opts);
        let fallback = self.config.fallback_resolution();
        run_blocking(move || {
            let mut controller =
                CaptureController::with_fallback_resolution(NativeBackend::new(), fallback);
            controller.open_camera(constraints)?;
            let frame = controller.snap()?;
            if let Some(status) = controller.status() {
                log::info!("{}", status);
            }
            Ok(frame)
        })
        .await
    }

    #[cfg(not(feature = "native-camera"))]
    async fn snap(&self, opts: &CameraOpts) -> Result<Frame> {
        let constraints = self.constraints(opts);
        log::debug!("Camera requested with {:?}", constraints);
        Err(crate::camera::CaptureError::DeviceUnavailable(
            "signlens was built without the native-camera feature".to_string(),
        )
        .into())
    }
}

/// Run blocking device or file I/O on tokio's blocking pool.
async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e)))?
}

/// Resample and binarize a photo, writing the result as PNG.
pub async fn preprocess(
    ctx: &Context,
    source: &ImageSource,
    out: &Path,
    scale: Option<f64>,
    threshold: Option<u8>,
) -> Result<()> {
    let mut options = ctx.config.preprocess_options();
    if let Some(scale) = scale {
        options.scale = scale;
    }
    if let Some(threshold) = threshold {
        options.threshold = threshold;
    }

    let image = ctx.photo(source).await?;
    let normalized = run_preprocess(image.frame(), &options)?;
    std::fs::write(out, normalized.to_png()?)?;

    println!(
        "Wrote {} ({}, threshold {})",
        out.display(),
        normalized.resolution(),
        normalized.threshold()
    );
    Ok(())
}

/// Identify the road sign in a photo.
pub async fn road_sign(ctx: &Context, source: &ImageSource) -> Result<()> {
    let image = ctx.photo(source).await?;
    let prediction = ctx.backend()?.predict_road_sign(&image).await?;
    println!("{}", prediction);
    Ok(())
}

/// Print the alphabet sign image for each letter of `text`.
pub async fn sign_letters(ctx: &Context, text: &str) -> Result<()> {
    let client = ctx.backend()?;
    let letters = client.predict_letters(text).await?;
    for sign in letters {
        println!("  {}  {}", sign.letter, client.resolve(sign.image_path()));
    }
    Ok(())
}

/// Recognize the hand sign in a photo.
pub async fn sign_predict(ctx: &Context, source: &ImageSource) -> Result<()> {
    let image = ctx.photo(source).await?;
    let prediction = ctx.backend()?.predict_sign_image(image.frame()).await?;
    println!("{} ({:.2}%)", prediction.label, prediction.confidence);
    Ok(())
}

/// Translate `text`, optionally cleaning OCR noise first.
pub async fn translate(
    ctx: &Context,
    text: &str,
    source: Option<&str>,
    target: Option<&str>,
    quick: bool,
    clean_ocr: bool,
) -> Result<()> {
    let text = if clean_ocr {
        clean_ocr_text(text)
            .ok_or_else(|| ServiceError::NoResult("No text found in image.".to_string()))?
    } else {
        text.to_string()
    };

    let translate = &ctx.config.translate;
    let client = TranslateClient::with_base_urls(
        api_key_from_env(),
        translate.api_url.clone(),
        translate.quick_url.clone(),
    )?
    .with_default_target(&translate.default_target);

    let translation = if quick {
        client.quick_translate(&text, target).await?
    } else {
        client.translate(&text, source, target).await?
    };

    if let Some(detected) = &translation.detected_source {
        println!("Detected language: {}", detected);
    }
    println!("{}", translation.text);
    Ok(())
}

/// Synthesize speech for `text` and save the MP3.
pub async fn speak(ctx: &Context, text: &str, lang: &str, out: &Path) -> Result<()> {
    let settings = Settings::load(&ctx.store())?;
    let clip = ctx
        .backend()?
        .synthesize_speech(text, lang)
        .await?
        .at_speed(settings.speed);

    std::fs::write(out, &clip.audio)?;
    println!(
        "Wrote {} ({} voice, play at {}x)",
        out.display(),
        clip.locale,
        clip.playback_rate
    );
    Ok(())
}

/// Handle settings subcommand actions.
pub fn handle_settings_action(ctx: &Context, action: SettingsAction) -> Result<()> {
    let store = ctx.store();
    let settings = match action {
        SettingsAction::Show => Settings::load(&store)?,
        SettingsAction::Set { speed, theme } => {
            let mut settings = Settings::load(&store)?;
            if let Some(speed) = speed {
                settings.speed = speed;
            }
            if let Some(theme) = theme {
                settings.theme = theme.into();
            }
            settings.save(&store)?;
            println!("Settings saved.");
            settings
        }
        SettingsAction::Reset => {
            let settings = Settings::reset(&store)?;
            println!("Settings reset to defaults.");
            settings
        }
    };

    println!("  Speed: {}x", settings.speed);
    println!("  Theme: {}", settings.theme);
    println!();
    println!("Store: {}", store.path().display());
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(ctx: &Context, action: ConfigAction) -> Result<()> {
    let config_path = &ctx.config_path;
    match action {
        ConfigAction::Show => {
            let cfg = &ctx.config;
            println!("Current configuration:");
            println!("  Camera: {} ({})", cfg.camera.device, cfg.camera.facing);
            println!("  Mirror: {}", if cfg.camera.mirror { "yes" } else { "no" });
            println!("  Fallback resolution: {}", cfg.fallback_resolution());
            println!("  Scale: {}", cfg.preprocess.scale);
            println!("  Threshold: {}", cfg.preprocess.threshold);
            println!("  Max upload: {} bytes", cfg.upload.max_bytes);
            println!("  Backend: {}", ctx.backend_url);
            println!("  Translate target: {}", cfg.translate.default_target);
            println!(
                "  Translate API key: {}",
                if api_key_from_env().is_some() { "set" } else { "not set" }
            );
            println!("  Settings store: {}", ctx.store_path.display());
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            if config_path.exists() {
                eprintln!("Use 'signlens config show' to view current settings.");
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    format!("Config file already exists: {}", config_path.display()),
                )));
            }

            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(config_path, DEFAULT_CONFIG_TOML)?;

            println!("Created config file: {}", config_path.display());
            Ok(())
        }
    }
}

/// List available cameras and print them to stdout.
#[cfg(feature = "native-camera")]
pub fn list_cameras() -> Result<()> {
    let devices = crate::camera::list_devices()?;
    if devices.is_empty() {
        println!("No cameras found.");
        println!();
        println!("Make sure your camera is connected and permissions are granted.");
        println!("On macOS, grant access in System Settings > Privacy & Security > Camera.");
    } else {
        println!("Available cameras:");
        for device in devices {
            println!("  {}", device);
        }
        println!();
        println!("Use --device <index> to select a camera.");
    }
    Ok(())
}

/// Take a photo and save it as PNG.
#[cfg(feature = "native-camera")]
pub async fn snap(ctx: &Context, opts: &CameraOpts, out: &Path) -> Result<()> {
    let frame = ctx.snap(opts).await?;
    std::fs::write(out, crate::preprocess::encode_png(&frame)?)?;
    println!("Wrote {} ({})", out.display(), frame.resolution());
    Ok(())
}

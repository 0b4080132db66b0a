use clap::Parser;
use tracing_subscriber::EnvFilter;

use signlens::cli::{self, Args, Command, Context};

/// Load `.env` and set up logging. `RUST_LOG` picks the level (default: warn).
fn init_env() {
    // dotenv::dotenv() returns Err if .env doesn't exist, which is fine
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> signlens::Result<()> {
    let ctx = Context::load(&args)?;

    match args.command {
        Command::Preprocess {
            source,
            out,
            scale,
            threshold,
        } => cli::preprocess(&ctx, &source, &out, scale, threshold).await,
        Command::RoadSign { source } => cli::road_sign(&ctx, &source).await,
        Command::SignLetters { text } => cli::sign_letters(&ctx, &text).await,
        Command::SignPredict { source } => cli::sign_predict(&ctx, &source).await,
        Command::Translate {
            text,
            source,
            target,
            quick,
            clean_ocr,
        } => {
            cli::translate(
                &ctx,
                &text,
                source.as_deref(),
                target.as_deref(),
                quick,
                clean_ocr,
            )
            .await
        }
        Command::Speak { text, lang, out } => cli::speak(&ctx, &text, &lang, &out).await,
        Command::Settings { action } => cli::handle_settings_action(&ctx, action),
        Command::Config { action } => cli::handle_config_action(&ctx, action),
        #[cfg(feature = "native-camera")]
        Command::ListCameras => cli::list_cameras(),
        #[cfg(feature = "native-camera")]
        Command::Snap { camera_opts, out } => cli::snap(&ctx, &camera_opts, &out).await,
    }
}

#[tokio::main]
async fn main() {
    init_env();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        log::debug!("Command failed ({})", e.kind());
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

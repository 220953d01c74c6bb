use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use rpg_asset_maker::app::run_app;
use rpg_asset_maker::config::{AppConfig, ImageGenConfig};
use rpg_asset_maker::logging;

#[derive(Parser, Debug)]
#[command(name = "rpg_asset_maker")]
#[command(about = "Generate pixel-art RPG map tiles with an image generation API")]
struct Args {
    /// Base URL of the OpenAI-compatible image API
    #[arg(long, default_value = "https://api.openai.com/v1")]
    api_base: String,

    /// Image model to request
    #[arg(long, default_value = "dall-e-3")]
    model: String,

    /// Timeout for each HTTP request, in seconds
    #[arg(long, default_value = "120")]
    timeout_secs: u64,

    /// Directory saved PNGs are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Directory for the session log
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            image_gen: ImageGenConfig {
                api_base: args.api_base,
                model: args.model,
                timeout_secs: args.timeout_secs,
            },
            output_dir: args.output_dir,
            log_dir: args.log_dir,
            log_level: args.log_level,
        }
    }
}

fn main() -> ExitCode {
    let config = AppConfig::from(Args::parse());

    let _guard = match logging::init_logging(&config.log_dir, &config.log_level) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging in {}: {}", config.log_dir.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run_app(config) {
        tracing::error!("fatal: {}", e);
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_app_config() {
        let config = AppConfig::from(Args::parse_from(["rpg_asset_maker"]));
        let defaults = AppConfig::default();
        assert_eq!(config.image_gen.api_base, defaults.image_gen.api_base);
        assert_eq!(config.image_gen.model, defaults.image_gen.model);
        assert_eq!(config.image_gen.timeout_secs, defaults.image_gen.timeout_secs);
        assert_eq!(config.output_dir, defaults.output_dir);
        assert_eq!(config.log_dir, defaults.log_dir);
    }

    #[test]
    fn test_flags_override() {
        let args = Args::parse_from([
            "rpg_asset_maker",
            "--api-base",
            "http://localhost:9000/v1",
            "--model",
            "gpt-image-1",
            "-o",
            "tiles",
        ]);
        let config = AppConfig::from(args);
        assert_eq!(config.image_gen.api_base, "http://localhost:9000/v1");
        assert_eq!(config.image_gen.model, "gpt-image-1");
        assert_eq!(config.output_dir, PathBuf::from("tiles"));
    }
}

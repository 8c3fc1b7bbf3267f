use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use planet_forge::{TextureCache, TextureConfig, TextureRef};

/// Render procedural planet textures into a content-addressed cache
#[derive(Parser, Debug)]
#[command(name = "planet-forge", version, about)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Settings {
    /// Directory where rendered textures are stored
    #[arg(long, global = true, default_value = "static/textures")]
    textures_dir: PathBuf,

    /// Texture width in pixels (rings share this width)
    #[arg(long, global = true, default_value_t = 1024)]
    width: u32,

    /// Surface texture height in pixels
    #[arg(long, global = true, default_value_t = 512)]
    height: u32,

    /// Prefix for the public texture references
    #[arg(long, global = true, default_value = "/textures")]
    url_prefix: String,

    /// JPEG quality for surface textures
    #[arg(long, global = true, default_value_t = 90,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render (or fetch) a surface texture
    Surface {
        /// One of star, rocky, gas, ice, terrestrial; anything else renders as terrestrial
        #[arg(long)]
        kind: String,
        /// Base color as #RRGGBB
        #[arg(long)]
        color: String,
        /// Display name of the body
        #[arg(long)]
        name: String,
        /// Approximate surface temperature in Kelvin
        #[arg(long, allow_negative_numbers = true)]
        temperature: Option<i32>,
    },
    /// Render (or fetch) a ring texture
    Ring {
        /// Ring color as #RRGGBB
        #[arg(long)]
        color: String,
        /// Ring opacity in [0, 1]
        #[arg(long)]
        opacity: f64,
    },
    /// Render the reference sample set
    Samples,
}

impl From<Settings> for TextureConfig {
    fn from(s: Settings) -> Self {
        TextureConfig {
            width: s.width,
            height: s.height,
            textures_dir: s.textures_dir,
            url_prefix: s.url_prefix,
            jpeg_quality: s.jpeg_quality,
        }
    }
}

/// (name, kind, color, temperature) of the bodies rendered by `samples`
const SAMPLES: [(&str, &str, &str, i32); 5] = [
    ("Sun", "star", "#FDB813", 5778),
    ("Rocky Planet", "rocky", "#8C7853", 400),
    ("Gas Giant", "gas", "#DAA520", 165),
    ("Ice World", "ice", "#4FD0E0", 80),
    ("Earth-like", "terrestrial", "#4169E1", 288),
];
const SAMPLE_RING: (&str, f64) = ("#DEB887", 0.8);

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = TextureConfig::from(cli.settings);
    let dir = config.textures_dir.clone();
    let cache = TextureCache::open(config)
        .with_context(|| format!("failed to open texture cache in {}", dir.display()))?;

    match cli.command {
        Command::Surface { kind, color, name, temperature } => {
            let texture = cache
                .generate_texture(&kind, &color, &name, temperature)
                .with_context(|| format!("failed to generate texture for {}", name))?;
            print_ref(&texture)?;
        }
        Command::Ring { color, opacity } => {
            let texture = cache
                .generate_ring_texture(&color, opacity)
                .context("failed to generate ring texture")?;
            print_ref(&texture)?;
        }
        Command::Samples => {
            for (name, kind, color, temperature) in SAMPLES {
                info!("Generating {} ({})", name, kind);
                let texture = cache
                    .generate_texture(kind, color, name, Some(temperature))
                    .with_context(|| format!("failed to generate texture for {}", name))?;
                print_ref(&texture)?;
            }
            let (color, opacity) = SAMPLE_RING;
            let ring = cache
                .generate_ring_texture(color, opacity)
                .context("failed to generate ring texture")?;
            print_ref(&ring)?;
        }
    }

    Ok(())
}

fn print_ref(texture: &TextureRef) -> Result<()> {
    println!("{}", serde_json::to_string(texture)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_surface_arguments() {
        let cli = Cli::parse_from([
            "planet-forge", "--width", "256", "surface",
            "--kind", "star", "--color", "#FDB813", "--name", "Sun", "--temperature", "5778",
        ]);
        let config = TextureConfig::from(cli.settings);
        assert_eq!((config.width, config.height), (256, 512));
        match cli.command {
            Command::Surface { kind, temperature, .. } => {
                assert_eq!(kind, "star");
                assert_eq!(temperature, Some(5778));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_jpeg_quality_range() {
        assert!(Cli::try_parse_from(["planet-forge", "--jpeg-quality", "0", "samples"]).is_err());
        assert!(Cli::try_parse_from(["planet-forge", "--jpeg-quality", "75", "samples"]).is_ok());
    }

    #[test]
    fn test_samples_parse_as_valid_requests() {
        for (name, kind, color, temperature) in SAMPLES {
            planet_forge::SurfaceRequest::parse(kind, color, name, Some(temperature)).unwrap();
        }
        planet_forge::RingRequest::parse(SAMPLE_RING.0, SAMPLE_RING.1).unwrap();
    }
}

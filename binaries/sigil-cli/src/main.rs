//! Sigil CLI
//!
//! Generates sigil paths as JSON, shows planetary rulers and kameas.
//! Logs go to stderr so stdout can be piped straight into a renderer.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sigil_astro::{GeoLocation, PlanetaryDay, RulerAssignment};
use sigil_config::{ConfigStore, SigilConfig};
use sigil_core::{AlphabetVariant, Intention, Method, Planet, RenderStyle, RulerMode};
use sigil_engine::{SigilEngine, SigilRequest};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sigil")]
#[command(about = "Sigil encoding with planetary hours and decans")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/sigil/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a phrase and print the sigil path
    Generate {
        /// Statement of intent
        phrase: String,

        /// classical, numeric, planetary, kamea, rosicrucian
        #[arg(short, long)]
        method: Option<Method>,

        /// Planet override (Planetary / Kamea)
        #[arg(short, long)]
        planet: Option<Planet>,

        /// Kamea order, 3..=9
        #[arg(long)]
        order: Option<u8>,

        /// latin or hebrew letter values on the kamea
        #[arg(long)]
        alphabet: Option<AlphabetVariant>,

        /// Force the decan ruler onto the kamea
        #[arg(long)]
        strict: bool,

        /// Moment to resolve rulers for (RFC 3339, default now)
        #[arg(long)]
        at: Option<DateTime<FixedOffset>>,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Ring rotation in degrees
        #[arg(long, allow_hyphen_values = true)]
        rotation: Option<f64>,

        /// Show guide lines
        #[arg(long, overrides_with = "no_guides")]
        guides: bool,

        /// Hide guide lines
        #[arg(long, overrides_with = "guides")]
        no_guides: bool,

        /// modern or traditional
        #[arg(long)]
        style: Option<RenderStyle>,

        #[arg(long)]
        intention: Option<Intention>,

        /// Also resolve rulers for methods without a planet
        #[arg(long)]
        rulers: bool,
    },

    /// Show planetary hour and decan rulers
    Rulers {
        /// RFC 3339, default now
        #[arg(long)]
        at: Option<DateTime<FixedOffset>>,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Print a planet's magic square
    Kamea {
        planet: Planet,

        #[arg(long)]
        json: bool,
    },

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective config
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json)?;

    let store = match &cli.config {
        Some(path) => ConfigStore::at_path(path),
        None => ConfigStore::default_location(),
    };

    match &cli.command {
        command @ Commands::Generate { .. } => cmd_generate(command, &store),
        Commands::Rulers { at, lat, lon } => cmd_rulers(*at, *lat, *lon, &store),
        Commands::Kamea { planet, json } => cmd_kamea(*planet, *json),
        Commands::Config { command } => cmd_config(command, &store),
    }
}

fn init_logging(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("sigil=info".parse()?);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn location_from(
    lat: Option<f64>,
    lon: Option<f64>,
    config: &SigilConfig,
) -> Result<Option<GeoLocation>> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(Some(GeoLocation::new(lat, lon))),
        (None, None) => Ok(config
            .location()
            .map(|(lat, lon)| GeoLocation::new(lat, lon))),
        _ => anyhow::bail!("--lat and --lon must be given together"),
    }
}

/// `--x` / `--no-x`: `None` when neither was given
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Merge command-line flags over the configured defaults
fn build_request(command: &Commands, config: &SigilConfig) -> Result<SigilRequest> {
    let Commands::Generate {
        phrase,
        method,
        planet,
        order,
        alphabet,
        strict,
        at,
        lat,
        lon,
        rotation,
        guides,
        no_guides,
        style,
        intention,
        rulers,
    } = command
    else {
        anyhow::bail!("not a generate command");
    };

    let mut request = SigilRequest::new(phrase.clone(), method.unwrap_or(config.method));
    request.planet = *planet;
    request.kamea_order = *order;
    request.alphabet = alphabet.unwrap_or(config.alphabet);
    request.mode = if *strict {
        RulerMode::Strict
    } else {
        config.mode()
    };
    request.location = location_from(*lat, *lon, config)?;
    request.at = *at;
    request.rotation_deg = *rotation;
    request.show_guides = flag_pair(*guides, *no_guides).unwrap_or(config.show_guides);
    request.style = style.unwrap_or(config.style);
    request.intention = intention.clone().unwrap_or_else(|| config.intention.clone());
    request.include_rulers = *rulers;
    Ok(request)
}

fn cmd_generate(command: &Commands, store: &ConfigStore) -> Result<()> {
    let config = store.load_effective()?;
    let request = build_request(command, &config)?;
    tracing::debug!(config = %store.path().display(), method = %request.method, "request built");
    let engine = SigilEngine::new();
    let output = engine.generate(&request)?;
    if output.override_rejected {
        eprintln!(
            "note: strict mode replaced the requested planet with {}",
            output
                .governing_planet()
                .map(|p| p.name())
                .unwrap_or("the decan ruler")
        );
    }
    print_json(&output)
}

#[derive(Serialize)]
struct RulersReport {
    assignment: RulerAssignment,
    day: PlanetaryDay,
}

fn cmd_rulers(
    at: Option<DateTime<FixedOffset>>,
    lat: Option<f64>,
    lon: Option<f64>,
    store: &ConfigStore,
) -> Result<()> {
    let config = store.load_effective()?;
    let location = location_from(lat, lon, &config)?
        .context("no location: pass --lat/--lon or set latitude/longitude in the config")?;
    let instant = at.unwrap_or_else(|| Local::now().fixed_offset());
    let (assignment, day) = sigil_astro::resolve_with_day(&instant, &location)?;
    print_json(&RulersReport { assignment, day })
}

fn cmd_kamea(planet: Planet, json: bool) -> Result<()> {
    let square = sigil_kamea::kamea_for(planet)?;
    if json {
        return print_json(square);
    }

    let width = square.size().to_string().len();
    println!(
        "\n  {} {}  order {}  constant {}\n",
        planet.glyph(),
        planet,
        square.order(),
        square.magic_constant()
    );
    for row in square.rows() {
        let cells: Vec<String> = row.iter().map(|v| format!("{:>width$}", v)).collect();
        println!("  {}", cells.join(" "));
    }
    println!();
    Ok(())
}

fn cmd_config(command: &ConfigCommands, store: &ConfigStore) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = store.load_effective()?;
            println!("# {}", store.path().display());
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
        ConfigCommands::Init { force } => {
            if store.exists() && !*force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    store.path().display()
                );
            }
            store.save(&SigilConfig::default())?;
            println!("Wrote {}", store.path().display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let cli = parse(&[
            "sigil",
            "generate",
            "I am protected",
            "--method",
            "kamea",
            "--planet",
            "venus",
            "--strict",
            "--at",
            "2024-06-25T13:00:00+01:00",
            "--lat",
            "51.5074",
            "--lon",
            "-0.1278",
        ]);
        let config = SigilConfig {
            method: Method::Numeric,
            ..SigilConfig::default()
        };
        let request = build_request(&cli.command, &config).unwrap();
        assert_eq!(request.method, Method::Kamea);
        assert_eq!(request.planet, Some(Planet::Venus));
        assert_eq!(request.mode, RulerMode::Strict);
        assert_eq!(request.location, Some(GeoLocation::new(51.5074, -0.1278)));
        assert!(request.at.is_some());
    }

    #[test]
    fn test_config_fills_gaps() {
        let cli = parse(&["sigil", "generate", "love"]);
        let config = SigilConfig {
            method: Method::Planetary,
            strict: true,
            latitude: Some(10.0),
            longitude: Some(20.0),
            intention: Intention::Love,
            ..SigilConfig::default()
        };
        let request = build_request(&cli.command, &config).unwrap();
        assert_eq!(request.method, Method::Planetary);
        assert_eq!(request.mode, RulerMode::Strict);
        assert_eq!(request.location, Some(GeoLocation::new(10.0, 20.0)));
        assert_eq!(request.intention, Intention::Love);
        assert!(request.show_guides);
    }

    #[test]
    fn test_guide_flags() {
        let shown = SigilConfig::default();
        let hidden = SigilConfig {
            show_guides: false,
            ..SigilConfig::default()
        };

        let cli = parse(&["sigil", "generate", "x", "--no-guides"]);
        assert!(!build_request(&cli.command, &shown).unwrap().show_guides);

        let cli = parse(&["sigil", "generate", "x", "--guides"]);
        assert!(build_request(&cli.command, &hidden).unwrap().show_guides);

        let cli = parse(&["sigil", "generate", "x"]);
        assert!(!build_request(&cli.command, &hidden).unwrap().show_guides);

        // the last of the pair wins
        let cli = parse(&["sigil", "generate", "x", "--guides", "--no-guides"]);
        assert!(!build_request(&cli.command, &shown).unwrap().show_guides);

        assert!(Cli::try_parse_from(["sigil", "generate", "x", "--guides", "true"]).is_err());
    }

    #[test]
    fn test_half_a_location_is_rejected() {
        let cli = parse(&["sigil", "generate", "x", "--lat", "10"]);
        assert!(build_request(&cli.command, &SigilConfig::default()).is_err());
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        assert!(Cli::try_parse_from(["sigil", "generate", "x", "--method", "spiral"]).is_err());
    }
}

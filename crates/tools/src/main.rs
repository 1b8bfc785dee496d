use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use formats::{DataDir, TileKind};
use foundation::ViewState;
use layers::raster::{DEFAULT_DATA_URL, RegionIndex, TileSource};

#[derive(Debug, Parser)]
#[command(name = "minedmap-viewer", about = "Inspect generated MinedMap viewer data")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify that every tile listed in info.json exists and rows are sorted.
    Check { data_dir: PathBuf },
    /// Print the URL the viewer requests for a tile, or `placeholder`.
    TileUrl {
        data_dir: PathBuf,
        layer: String,
        #[arg(allow_negative_numbers = true)]
        zoom: i32,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        z: i32,
    },
    /// Print the canonical form of a URL fragment.
    Fragment {
        fragment: String,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        spawn_x: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        spawn_z: f64,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Check { data_dir } => cmd_check(data_dir),
        Command::TileUrl {
            data_dir,
            layer,
            zoom,
            x,
            z,
        } => cmd_tile_url(data_dir, &layer, zoom, x, z),
        Command::Fragment {
            fragment,
            spawn_x,
            spawn_z,
        } => {
            println!(
                "{}",
                ViewState::from_fragment(&fragment, spawn_x, spawn_z).to_fragment()
            );
            Ok(())
        }
    }
}

fn cmd_check(data_dir: PathBuf) -> Result<(), String> {
    let dir = DataDir::load(&data_dir).map_err(|e| e.to_string())?;
    let report = tools::check_data_dir(&dir);

    for (level, coords) in &report.missing_light {
        warn!("level {level}: no light tile for {coords:?}");
    }
    for problem in &report.problems {
        warn!("{problem}");
    }
    info!(
        "checked {} tiles across {} levels in {}",
        report.tiles,
        report.levels,
        data_dir.display()
    );

    let entities = dir.load_entities().map_err(|e| e.to_string())?;
    info!("{} signs", entities.signs.len());

    if report.is_ok() {
        Ok(())
    } else {
        Err(format!("{} problems found", report.problems.len()))
    }
}

fn cmd_tile_url(data_dir: PathBuf, layer: &str, zoom: i32, x: i32, z: i32) -> Result<(), String> {
    let kind = TileKind::from_str(layer).ok_or_else(|| format!("unknown layer: {layer}"))?;
    let dir = DataDir::load(&data_dir).map_err(|e| e.to_string())?;
    let source = TileSource::new(
        Rc::new(RegionIndex::from_info(dir.info())),
        kind,
        DEFAULT_DATA_URL,
    );

    let url = source.resolve(zoom, 0, x, z);
    if url.is_placeholder() {
        println!("placeholder");
    } else {
        println!("{}", url.as_str());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_negative_coordinates() {
        let cli = Cli::try_parse_from(["minedmap-viewer", "tile-url", "data", "map", "-1", "-2", "3"])
            .expect("parse cli");
        match cli.command {
            Command::TileUrl { zoom, x, z, .. } => assert_eq!((zoom, x, z), (-1, -2, 3)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_fragment_spawn() {
        let cli = Cli::try_parse_from([
            "minedmap-viewer",
            "fragment",
            "#zoom=2",
            "--spawn-x",
            "5",
            "--spawn-z",
            "-7",
        ])
        .expect("parse cli");
        match cli.command {
            Command::Fragment {
                fragment,
                spawn_x,
                spawn_z,
            } => {
                assert_eq!(fragment, "#zoom=2");
                assert_eq!(
                    ViewState::from_fragment(&fragment, spawn_x, spawn_z).to_fragment(),
                    "#x=5&z=-7&zoom=2"
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use floorgen::{DungeonCatalog, FloorProperties, FloorType, GenerationOptions, generate_floor};
use log::{LevelFilter, Log, Metadata, Record};

#[derive(Parser)]
#[command(author, version, about = "Generate a dungeon floor layout from a seed", long_about = None)]
struct Args {
    /// Dungeon catalog JSON; used together with --dungeon and --floor
    #[arg(long, requires_all = ["dungeon", "floor"], conflicts_with = "props")]
    data: Option<PathBuf>,
    /// English dungeon name as it appears in the catalog
    #[arg(long)]
    dungeon: Option<String>,
    /// Floor number within the dungeon
    #[arg(long)]
    floor: Option<u32>,
    /// A single floor properties record (.toml or .json)
    #[arg(long)]
    props: Option<PathBuf>,
    /// Seed, decimal or 0x-prefixed hex
    #[arg(short, long, default_value = "0", value_parser = parse_seed)]
    seed: u32,
    /// Generate as a rescue floor (no shops or monster houses)
    #[arg(long)]
    rescue: bool,
    /// Run the maze-room and room-imperfection stages
    #[arg(long)]
    experimental: bool,
    /// Write the ASCII floor to this path instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Write the floor summary as JSON to this path
    #[arg(long)]
    summary: Option<PathBuf>,
    /// Raise log verbosity; repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_seed(text: &str) -> Result<u32, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid seed `{text}`: {e}"))
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    log::set_logger(&LOGGER).map_err(|e| anyhow::anyhow!("logger already installed: {e}"))?;
    log::set_max_level(level);
    Ok(())
}

fn load_props(path: &Path) -> Result<FloorProperties> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read properties file: {}", path.display()))?;
    let props = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&text).with_context(|| "Failed to parse TOML floor properties")?,
        Some("json") => serde_json::from_str(&text).with_context(|| "Failed to parse JSON floor properties")?,
        _ => bail!("unsupported properties format for {}; expected .toml or .json", path.display()),
    };
    Ok(props)
}

fn resolve_props(args: &Args) -> Result<FloorProperties> {
    if let Some(path) = &args.props {
        return load_props(path);
    }
    match (&args.data, &args.dungeon, args.floor) {
        (Some(data), Some(dungeon), Some(floor)) => {
            let catalog = DungeonCatalog::from_path(data)
                .with_context(|| format!("Failed to load dungeon catalog: {}", data.display()))?;
            catalog.lookup(dungeon, floor).with_context(|| format!("No procedural layout for {dungeon} floor {floor}"))
        }
        (None, None, None) => {
            log::info!("no floor source given; using default properties");
            Ok(FloorProperties::default())
        }
        _ => bail!("--data, --dungeon and --floor must be given together"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let props = resolve_props(&args)?;
    let options = GenerationOptions {
        floor_type: if args.rescue { FloorType::Rescue } else { FloorType::Normal },
        experimental: args.experimental,
    };
    let floor = generate_floor(&props, args.seed, options);

    let ascii = floor.render_ascii();
    match &args.out {
        Some(out) => fs::write(out, &ascii).with_context(|| format!("Failed to write floor: {}", out.display()))?,
        None => print!("{ascii}"),
    }
    let summary = &floor.summary;
    println!("Strategy: {} ({}x{} grid)", summary.strategy, summary.grid_width, summary.grid_height);
    println!("Rooms: {}", summary.room_count);
    println!("Attempts: {}{}", summary.attempts, if summary.used_fallback { " (fallback)" } else { "" });
    println!("Fingerprint: {:016x}", floor.fingerprint());

    if let Some(path) = &args.summary {
        let json = serde_json::to_string_pretty(summary).with_context(|| "Failed to serialize floor summary")?;
        fs::write(path, json).with_context(|| format!("Failed to write summary: {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::parse_seed;

    #[test]
    fn seeds_parse_as_decimal_or_hex() {
        assert_eq!(parse_seed("42"), Ok(42));
        assert_eq!(parse_seed("0x2A"), Ok(42));
        assert_eq!(parse_seed("0XFFFFFFFF"), Ok(u32::MAX));
        assert!(parse_seed("0x1_0000_0000").is_err());
        assert!(parse_seed("lots").is_err());
    }

    proptest! {
        #[test]
        fn every_seed_round_trips_in_decimal_and_hex(seed in any::<u32>()) {
            prop_assert_eq!(parse_seed(&seed.to_string()), Ok(seed));
            prop_assert_eq!(parse_seed(&format!("{seed:#x}")), Ok(seed));
            prop_assert_eq!(parse_seed(&format!("0X{seed:X}")), Ok(seed));
        }
    }
}

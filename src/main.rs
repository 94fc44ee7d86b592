//! Command-line driver: generates a test volume, runs one configured feature
//! against it, and reports what changed.

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use hashbrown::HashMap;
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode, WriteLogger};
use strata_blocks::BlockKind;
use strata_features::FeatureRegistry;
use strata_geom::BlockPos;
use strata_world::{ChunkGenerator, RandomSource, TerrainConfig, VoxelGrid, WorldRandom};

const BUNDLED_FEATURES: &str = include_str!("../assets/features.toml");
const BUNDLED_TERRAIN: &str = include_str!("../assets/terrain.toml");

#[derive(Parser, Debug)]
#[command(name = "strata", about = "Place configured world-decoration features into a generated volume")]
struct Args {
    /// Feature registry TOML (defaults to the bundled registry)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Terrain settings TOML (defaults to the bundled caves preset)
    #[arg(long)]
    terrain: Option<PathBuf>,

    /// Registry name of the feature to place
    #[arg(long)]
    feature: Option<String>,

    /// List the registry's feature names and exit
    #[arg(long)]
    list: bool,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Placement attempts at random origins; ignored with --origin
    #[arg(long, default_value_t = 64)]
    attempts: u32,

    /// Place exactly once at x,y,z
    #[arg(long, value_parser = parse_triple)]
    origin: Option<BlockPos>,

    /// Volume size x,y,z; the volume is centred on x/z = 0 and sits on --bottom
    #[arg(long, value_parser = parse_triple, default_value = "64,96,64")]
    size: BlockPos,

    /// Lowest Y of the volume
    #[arg(long, default_value_t = -64, allow_hyphen_values = true)]
    bottom: i32,

    /// Also write the log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_triple(s: &str) -> Result<BlockPos, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z but got `{s}`"));
    };
    let num = |v: &str| v.parse::<i32>().map_err(|e| format!("`{v}`: {e}"));
    Ok(BlockPos::new(num(*x)?, num(*y)?, num(*z)?))
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
    match log_file {
        Some(path) => {
            CombinedLogger::init(vec![
                TermLogger::new(
                    LevelFilter::Info,
                    Config::default(),
                    TerminalMode::Mixed,
                    ColorChoice::Auto,
                ),
                WriteLogger::new(LevelFilter::Debug, Config::default(), File::create(path)?),
            ])?;
        }
        None => {
            env_logger::Builder::new()
                .target(env_logger::Target::Stdout)
                .filter_level(LevelFilter::Info)
                .parse_env("RUST_LOG")
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let registry = match &args.config {
        Some(path) => FeatureRegistry::load_from_path(path)?,
        None => FeatureRegistry::from_toml_str(BUNDLED_FEATURES)?,
    };
    if args.list {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(());
    }
    let Some(name) = args.feature.as_deref() else {
        return Err("--feature is required (use --list to see the registry)".into());
    };
    let Some(feature) = registry.get(name) else {
        return Err(format!("no feature named `{name}` in the registry").into());
    };

    let terrain = match &args.terrain {
        Some(path) => TerrainConfig::load_from_path(path)?,
        None => TerrainConfig::from_toml_str(BUNDLED_TERRAIN)?,
    };
    let generator = terrain.build_generator(args.seed);
    let (sx, sy, sz) = (args.size.x.max(1), args.size.y.max(1), args.size.z.max(1));
    let mut grid = VoxelGrid::with_size(BlockPos::new(-sx / 2, args.bottom, -sz / 2), sx, sy, sz);
    generator.fill(&mut grid);
    log::info!(
        target: "terrain",
        "generated {}x{}x{} volume (mode {:?}, seed {})",
        sx,
        sy,
        sz,
        terrain.mode,
        args.seed
    );

    let mut random = WorldRandom::new(args.seed);
    let bounds = grid.bounds();
    let origins: Vec<BlockPos> = match args.origin {
        Some(origin) => vec![origin],
        None => (0..args.attempts)
            .map(|_| {
                BlockPos::new(
                    random.next_int_in(bounds.min.x, bounds.max.x),
                    random.next_int_in(bounds.min.y, bounds.max.y),
                    random.next_int_in(bounds.min.z, bounds.max.z),
                )
            })
            .collect(),
    };

    let mut placed = 0usize;
    for &origin in &origins {
        let ok = feature.place(&mut grid, generator.as_ref(), &mut random, origin);
        log::debug!(target: "place", "{} at {:?}: {}", feature.kind_name(), origin, ok);
        placed += usize::from(ok);
    }

    let changes = grid.take_changes();
    let mut by_kind: HashMap<BlockKind, usize> = HashMap::new();
    for c in &changes {
        *by_kind.entry(c.block.kind).or_default() += 1;
    }
    let mut rows: Vec<(BlockKind, usize)> = by_kind.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    println!(
        "{name} ({}): {placed}/{} placements succeeded, {} blocks written",
        feature.kind_name(),
        origins.len(),
        changes.len()
    );
    for (kind, n) in rows {
        println!("  {:<24} {n}", kind.name());
    }
    Ok(())
}

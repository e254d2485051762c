//! Command line battle runner.
//!
//! Loads a cavern map, fights the battle to completion, and prints the
//! final report on stdout. With `--watch` the battle plays out live on the
//! terminal's alternate screen first.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use melee_core::config::{SimConfig, DEFAULT_ATTACK_POWER, DEFAULT_MAX_MAP_DIMENSION};
use melee_core::loader::parse_map;
use melee_core::simulation::Simulation;
use tracing::debug;

mod render;

use render::WatchRenderer;

/// Deterministic grid combat: load a map, fight it out, report the score.
#[derive(Parser, Debug)]
#[command(name = "melee")]
#[command(about = "Run an elf-versus-goblin cavern battle to completion")]
struct Args {
    /// Path to the map file (`#` wall, `.` floor, `E` elf, `G` goblin)
    map: PathBuf,

    /// Attack power for every elf (at least 1)
    #[arg(long, default_value_t = DEFAULT_ATTACK_POWER)]
    #[arg(value_parser = clap::value_parser!(i32).range(1..))]
    elf_attack: i32,

    /// Attack power for every goblin (at least 1)
    #[arg(long, default_value_t = DEFAULT_ATTACK_POWER)]
    #[arg(value_parser = clap::value_parser!(i32).range(1..))]
    goblin_attack: i32,

    /// Largest map width or height the loader will accept
    #[arg(long, default_value_t = DEFAULT_MAX_MAP_DIMENSION)]
    max_dimension: usize,

    /// Animate the battle in the terminal instead of running headless
    #[arg(long)]
    watch: bool,

    /// Frame delay in milliseconds while watching
    #[arg(long, default_value_t = 120)]
    delay_ms: u64,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let text = fs::read_to_string(&args.map)
        .with_context(|| format!("failed to read map file {}", args.map.display()))?;

    let mut config = SimConfig::with_attack_powers(args.elf_attack, args.goblin_attack);
    config.max_map_dimension = args.max_dimension;

    let field = parse_map(&text, &config)
        .with_context(|| format!("failed to parse map file {}", args.map.display()))?;
    debug!(agents = field.agent_count(), "battlefield loaded");

    let mut sim = Simulation::new(field);
    let outcome = if args.watch {
        let mut renderer = WatchRenderer::new(args.delay_ms)?;
        let outcome = sim.run_with(&mut renderer);
        renderer.finish().context("terminal rendering failed")?;
        outcome
    } else {
        sim.run()
    };

    println!("{outcome}");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("melee_core=info,melee=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

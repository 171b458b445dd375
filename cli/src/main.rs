use clap::{Parser, Subcommand};
use dmfb_common::db::core::Chip;
use dmfb_common::util::config::Config;
use dmfb_common::util::{generator, logger};
use dmfb_engine::actuation::actuated_cells;
use dmfb_engine::adjacent_activations;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random chip, assemble it and report every diagnostic.
    Check,
    /// Like `check`, with generator settings overridden on the command line.
    Generate {
        #[arg(long)]
        width: Option<i32>,
        #[arg(long)]
        height: Option<i32>,
        #[arg(long)]
        droplets: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        /// Print the cells actuated in every time step.
        #[arg(long, default_value_t = false)]
        actuations: bool,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let mut config: Config = if args.config.exists() {
        log::info!("Loading configuration from {:?}", args.config);
        let config_str = std::fs::read_to_string(&args.config)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
        toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?
    } else {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            args.config
        );
        Config::default()
    };

    let mut show_actuations = false;
    match args.command.unwrap_or(Commands::Check) {
        Commands::Check => {}
        Commands::Generate {
            width,
            height,
            droplets,
            seed,
            actuations,
        } => {
            let gen_cfg = &mut config.generator;
            if let Some(w) = width {
                gen_cfg.width = w;
            }
            if let Some(h) = height {
                gen_cfg.height = h;
            }
            if let Some(d) = droplets {
                gen_cfg.droplets = d;
            }
            if seed.is_some() {
                gen_cfg.seed = seed;
            }
            show_actuations = actuations;
        }
    }

    let desc = generator::generate_random_chip(&config.generator);
    let mut chip = dmfb_engine::build(desc, &config.validation);

    report(&mut chip, show_actuations)?;

    if !chip.hard_errors.is_empty() {
        log::error!(
            "Chip has {} hard errors and cannot be simulated",
            chip.hard_errors.len()
        );
        std::process::exit(1);
    }
    Ok(())
}

fn report(chip: &mut Chip, show_actuations: bool) -> anyhow::Result<()> {
    let max_t = chip.max_t();
    log::info!(
        "Chip: {} fields, {} droplets, {} nets, {} time steps",
        chip.num_fields(),
        chip.num_droplets(),
        chip.nets().len(),
        max_t
    );
    if let (Some(min), Some(max)) = (chip.min_coord(), chip.max_coord()) {
        log::info!("Extent: {} .. {}", min, max);
    }

    for e in &chip.errors {
        log::warn!("Error: {}", e);
    }
    for e in &chip.hard_errors {
        log::error!("Hard error: {}", e);
    }

    let adjacency = adjacent_activations(chip);
    log::info!(
        "Adjacency: {} violations on {} cells",
        adjacency.len(),
        adjacency.fields().len()
    );

    log::info!("Maximum cell usage: {}", chip.max_usage());

    if chip.hard_errors.is_empty() {
        for t in 1..=max_t {
            let cells = actuated_cells(chip, t)
                .map_err(|e| anyhow::anyhow!("Cannot resolve time step {}: {}", t, e))?;
            if show_actuations {
                let list: Vec<String> = cells.iter().map(ToString::to_string).collect();
                log::info!("t={:>3}: {}", t, list.join(" "));
            } else {
                log::debug!("t={:>3}: {} cells actuated", t, cells.len());
            }
        }
    }
    Ok(())
}

//! Slice the Rope headless runner
//!
//! Plays a level without rendering: either idle (nothing cut) or driven by a
//! recorded replay script, and reports how it ended.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use slice_the_rope::Level;
    use slice_the_rope::Tuning;
    use slice_the_rope::level;
    use slice_the_rope::sim::replay::{self, ReplayScript};

    #[derive(Parser, Debug)]
    #[command(version, about = "Run a Slice the Rope level headless")]
    struct Args {
        /// Built-in level number (1-based)
        #[arg(short, long, default_value_t = 1)]
        level: usize,

        /// Level JSON file, overrides --level
        #[arg(long)]
        level_file: Option<PathBuf>,

        /// Replay script JSON file, overrides both level options
        #[arg(short, long)]
        replay: Option<PathBuf>,

        /// Tuning JSON file (missing keys keep defaults)
        #[arg(short, long)]
        tuning: Option<PathBuf>,

        /// Particle RNG seed
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Give up after this many ticks (60 per second)
        #[arg(long, default_value_t = 3600)]
        ticks: u64,
    }

    /// Pick the requested level, falling back to the first built-in one
    fn load_level(args: &Args) -> Result<Level> {
        let loaded = match &args.level_file {
            Some(path) => Level::load(path),
            None => level::builtin(args.level),
        };
        match loaded {
            Ok(level) => Ok(level),
            Err(e) => {
                log::warn!("Could not load level ({}), using level 1", e);
                Ok(level::builtin(1)?)
            }
        }
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();

        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("loading tuning {}", path.display()))?,
            None => Tuning::default(),
        };

        let script = match &args.replay {
            Some(path) => ReplayScript::load(path)
                .with_context(|| format!("loading replay {}", path.display()))?,
            None => ReplayScript::new(load_level(&args)?, args.seed),
        };

        log::info!("Running '{}' for up to {} ticks", script.level.title(), args.ticks);
        let outcome = replay::run(&script, &tuning, args.ticks)?;

        println!("level:  {}", script.level.title());
        println!("result: {:?}", outcome.phase);
        println!("ticks:  {}", outcome.ticks);
        println!(
            "stars:  {}/{}",
            outcome.stars_collected,
            script.level.stars.len()
        );
        for event in &outcome.events {
            log::debug!("{:?}", event);
        }

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Slice the Rope (headless) starting...");
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on the web
}

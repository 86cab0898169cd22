use std::fs;

use anyhow::Context as _;
use bloc::{config::Config, interpreter::evaluator::core::Context, run};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// bloc is a small scripting language for text, byte and number crunching.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells bloc to read the script from a file instead of the argument.
    #[arg(short, long)]
    file: bool,

    /// Pipe mode prints the value of the last expression statement of the
    /// script.
    #[arg(short, long)]
    pipe_mode: bool,

    /// Seed of the `random` generator, for reproducible runs.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Logs imports, native objects and raised errors to stderr.
    #[arg(short, long)]
    verbose: bool,

    contents: String,
}

impl Args {
    fn config(&self) -> Config {
        let config = Config::default();
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default = if args.verbose { "bloc=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(std::io::stderr)
                             .init();

    let script = if args.file {
        fs::read_to_string(&args.contents).with_context(|| {
                                              format!("failed to read the input file '{}'", args.contents)
                                          })?
    } else {
        args.contents.clone()
    };

    let mut ctx = Context::with_config(&args.config());
    let result = run(&script, &mut ctx)?;

    if args.pipe_mode
       && let Some(value) = result
    {
        println!("{value}");
    }
    Ok(())
}

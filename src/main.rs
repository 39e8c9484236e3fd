//! Command-line driver: replays workbench commands from a script or stdin.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use collectviz::options::Options;
use collectviz::workbench::Workbench;

/// Replay container commands and report what each one did.
#[derive(Debug, Parser)]
#[command(name = "collectviz", version, about)]
struct Args {
    /// Command script, one command per line. Reads stdin when omitted.
    #[arg(long)]
    script: Option<PathBuf>,
    /// TOML options preset to build the containers from.
    #[arg(long)]
    preset: Option<PathBuf>,
    /// Animation frames (at 60 Hz) to advance after each command.
    #[arg(long, default_value_t = 20)]
    frames: u32,
    /// Print a JSON snapshot of every container at the end.
    #[arg(long)]
    json: bool,
    /// Seed for the `random` command.
    #[arg(long)]
    seed: Option<u64>,
}

const FRAME_SECONDS: f32 = 1.0 / 60.0;

fn read_script(args: &Args) -> anyhow::Result<Vec<String>> {
    match &args.script {
        Some(path) => Ok(std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?
            .lines()
            .map(str::to_owned)
            .collect()),
        None => io::stdin()
            .lock()
            .lines()
            .collect::<Result<_, _>>()
            .context("reading stdin"),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let options = match &args.preset {
        Some(path) => Options::load(path)
            .with_context(|| format!("loading preset {}", path.display()))?,
        None => Options::default(),
    };
    let mut bench = match args.seed {
        Some(seed) => Workbench::with_seed(options, seed),
        None => Workbench::new(options),
    };

    let mut out = io::stdout().lock();
    for line in read_script(&args)? {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        writeln!(out, "> {line}")?;
        match bench.run_line(line) {
            Ok(outcomes) => {
                for (kind, outcome) in outcomes {
                    let container = bench.container(kind);
                    let outcome = outcome.to_string();
                    writeln!(
                        out,
                        "  {:<10} {outcome:<14} len={} cap={} mem={}B  [{}]",
                        kind.name(),
                        container.len(),
                        container.capacity(),
                        container.memory_bytes(),
                        container.log().last(),
                    )?;
                }
            }
            Err(e) => {
                log::error!("{line}: {e}");
                writeln!(out, "  error: {e}")?;
            }
        }
        let mut reclaimed = 0;
        for _ in 0..args.frames {
            reclaimed += bench.tick_all(FRAME_SECONDS);
        }
        log::debug!("{reclaimed} entities reclaimed after '{line}'");
    }

    if args.json {
        let snapshots = bench.snapshots();
        serde_json::to_writer_pretty(&mut out, &snapshots)?;
        writeln!(out)?;
    }
    Ok(())
}

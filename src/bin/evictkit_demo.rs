//! Interactive and batch front-end for exercising an eviction engine.
//!
//! ```text
//! evictkit-demo --policy lfu --capacity 100 simulate
//! evictkit-demo --config demo.json repl
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use evictkit::workload::{
    prefill_random, run_hotset, HotsetConfig, WorkloadReport, XorShift64, DEFAULT_KEY_UNIVERSE,
    DEFAULT_MAX_OPERATIONS, DEFAULT_VALUE_UNIVERSE,
};
use evictkit::{EvictionEngine, EvictionPolicy};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "evictkit-demo",
    version,
    about = "Drive an LRU/MRU/LFU cache from the terminal"
)]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct EngineArgs {
    /// Maximum number of entries. Zero or negative is rejected.
    #[arg(long, global = true, allow_negative_numbers = true)]
    capacity: Option<i64>,

    /// Eviction policy: lru, mru or lfu.
    #[arg(long, global = true)]
    policy: Option<EvictionPolicy>,

    /// JSON file with demo settings; flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the key generator. Defaults to the current time.
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prefill with random keys, then replay a hot-key read workload.
    Simulate(SimulateArgs),

    /// Read commands from stdin, one per line.
    Repl,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Number of random puts before the workload.
    #[arg(long)]
    prefill: Option<usize>,

    /// Number of gets. Random in [0, max_operations) when omitted.
    #[arg(long)]
    operations: Option<u64>,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// File-backed demo settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct DemoConfig {
    capacity: i64,
    policy: EvictionPolicy,
    seed: Option<u64>,
    prefill: usize,
    key_universe: u64,
    value_universe: u64,
    max_operations: u64,
    hotset: HotsetConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            policy: EvictionPolicy::Lru,
            seed: None,
            prefill: 100,
            key_universe: DEFAULT_KEY_UNIVERSE,
            value_universe: DEFAULT_VALUE_UNIVERSE,
            max_operations: DEFAULT_MAX_OPERATIONS,
            hotset: HotsetConfig::default(),
        }
    }
}

impl DemoConfig {
    fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn resolve(args: &EngineArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(capacity) = args.capacity {
            config.capacity = capacity;
        }
        if let Some(policy) = args.policy {
            config.policy = policy;
        }
        if args.seed.is_some() {
            config.seed = args.seed;
        }
        config.hotset.validate()?;
        Ok(config)
    }

    fn build_engine(&self) -> Result<EvictionEngine<u64, u64>> {
        // negative capacities fall through to the zero-capacity error
        let capacity = usize::try_from(self.capacity).unwrap_or(0);
        Ok(EvictionEngine::new(capacity, self.policy)?)
    }

    fn rng(&self) -> XorShift64 {
        let seed = self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(1)
        });
        XorShift64::new(seed)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_report(out: &mut impl Write, report: &WorkloadReport) -> io::Result<()> {
    writeln!(out, "Total operations: {}", report.operations)?;
    writeln!(out, "Cache hits: {}", report.hits)?;
    writeln!(out, "Cache misses: {}", report.misses)?;
    writeln!(out, "Hit Rate: {:.2}%", report.hit_rate() * 100.0)?;
    writeln!(out, "Miss Rate: {:.2}%", report.miss_rate() * 100.0)
}

fn print_stats(out: &mut impl Write, engine: &EvictionEngine<u64, u64>) -> io::Result<()> {
    let lookups = engine.hit_count() + engine.miss_count();
    let rate = |n: u64| {
        if lookups == 0 {
            0.0
        } else {
            n as f64 / lookups as f64 * 100.0
        }
    };
    writeln!(out, "Policy: {}", engine.policy())?;
    writeln!(out, "Size: {} / {}", engine.size(), engine.capacity())?;
    writeln!(out, "Hits: {}  Misses: {}", engine.hit_count(), engine.miss_count())?;
    writeln!(
        out,
        "Hit Rate: {:.2}%  Miss Rate: {:.2}%",
        rate(engine.hit_count()),
        rate(engine.miss_count())
    )
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

fn simulate(config: &DemoConfig, args: &SimulateArgs, out: &mut impl Write) -> Result<()> {
    let mut engine = config.build_engine()?;
    let mut rng = config.rng();

    let prefill = args.prefill.unwrap_or(config.prefill);
    prefill_random(
        &mut engine,
        &mut rng,
        prefill,
        config.key_universe,
        config.value_universe,
    );
    writeln!(
        out,
        "{} cache created with capacity {} ({} keys after {} random puts).",
        engine.policy(),
        engine.capacity(),
        engine.size(),
        prefill
    )?;

    let operations = args
        .operations
        .unwrap_or_else(|| rng.below(config.max_operations));
    match run_hotset(&mut engine, &config.hotset, &mut rng, operations)? {
        Some(report) => print_report(out, &report)?,
        None => writeln!(out, "Cache is empty. No keys to select.")?,
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// repl
// ---------------------------------------------------------------------------

const HELP: &str = "\
commands:
  put <key> <value>   insert or overwrite
  get <key>           look up (counts a hit or miss)
  size                current number of entries
  capacity            maximum number of entries
  clear               remove every entry
  stats               policy, size and hit/miss rates
  hot [ops]           replay a hot-key read workload
  help                show this message
  exit                quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplCommand {
    Put(u64, u64),
    Get(u64),
    Size,
    Capacity,
    Clear,
    Stats,
    Hot(Option<u64>),
    Help,
    Exit,
}

fn parse_number(word: Option<&str>, what: &str) -> Result<u64> {
    let Some(word) = word else {
        bail!("missing {}", what);
    };
    word.parse()
        .with_context(|| format!("invalid {} '{}'", what, word))
}

impl FromStr for ReplCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            bail!("empty command");
        };
        let command = match head.to_ascii_lowercase().as_str() {
            "put" => {
                let key = parse_number(words.next(), "key")?;
                let value = parse_number(words.next(), "value")?;
                ReplCommand::Put(key, value)
            },
            "get" => ReplCommand::Get(parse_number(words.next(), "key")?),
            "size" => ReplCommand::Size,
            "capacity" => ReplCommand::Capacity,
            "clear" => ReplCommand::Clear,
            "stats" => ReplCommand::Stats,
            "hot" => match words.next() {
                Some(word) => ReplCommand::Hot(Some(parse_number(Some(word), "operation count")?)),
                None => ReplCommand::Hot(None),
            },
            "help" | "?" => ReplCommand::Help,
            "exit" | "quit" => ReplCommand::Exit,
            other => bail!("unknown command '{}', type 'help'", other),
        };
        if let Some(extra) = words.next() {
            bail!("unexpected argument '{}'", extra);
        }
        Ok(command)
    }
}

struct Repl {
    engine: EvictionEngine<u64, u64>,
    config: DemoConfig,
    rng: XorShift64,
}

impl Repl {
    fn new(config: DemoConfig) -> Result<Self> {
        Ok(Self {
            engine: config.build_engine()?,
            rng: config.rng(),
            config,
        })
    }

    /// Returns `false` once the session should end.
    fn execute(&mut self, command: ReplCommand, out: &mut impl Write) -> Result<bool> {
        match command {
            ReplCommand::Put(key, value) => match self.engine.put(key, value) {
                Some(old) => writeln!(out, "Updated {} (was {}).", key, old)?,
                None => writeln!(out, "Key-value pair added.")?,
            },
            ReplCommand::Get(key) => match self.engine.get(&key) {
                Some(value) => writeln!(out, "Value: {}", value)?,
                None => writeln!(out, "Key not found in cache.")?,
            },
            ReplCommand::Size => writeln!(out, "Current cache size: {}", self.engine.size())?,
            ReplCommand::Capacity => writeln!(out, "Cache capacity: {}", self.engine.capacity())?,
            ReplCommand::Clear => {
                self.engine.clear();
                writeln!(out, "Cache cleared.")?;
            },
            ReplCommand::Stats => print_stats(out, &self.engine)?,
            ReplCommand::Hot(operations) => {
                let operations =
                    operations.unwrap_or_else(|| self.rng.below(self.config.max_operations));
                match run_hotset(&mut self.engine, &self.config.hotset, &mut self.rng, operations)? {
                    Some(report) => print_report(out, &report)?,
                    None => writeln!(out, "Cache is empty. No keys to select.")?,
                }
            },
            ReplCommand::Help => writeln!(out, "{}", HELP)?,
            ReplCommand::Exit => {
                writeln!(out, "Exiting...")?;
                return Ok(false);
            },
        }
        Ok(true)
    }

    fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<()> {
        writeln!(
            out,
            "{} cache with capacity {}. Type 'help' for commands.",
            self.engine.policy(),
            self.engine.capacity()
        )?;
        for line in input.lines() {
            let line = line.context("failed to read from stdin")?;
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<ReplCommand>() {
                Ok(command) => {
                    if !self.execute(command, out)? {
                        break;
                    }
                },
                Err(err) => writeln!(out, "error: {:#}", err)?,
            }
            out.flush()?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = DemoConfig::resolve(&cli.engine)?;
    info!(policy = %config.policy, capacity = config.capacity, "starting demo");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &cli.command {
        Command::Simulate(args) => simulate(&config, args, &mut out),
        Command::Repl => Repl::new(config)?.run(io::stdin().lock(), &mut out),
    }
}

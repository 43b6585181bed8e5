//! Cache simulator CLI.
//!
//! This binary drives the cache engine from the command line. It performs:
//! 1. **Run:** Plan and replay a sequence of read/write requests, printing every event
//!    as it is applied, then the final cache contents and statistics.
//! 2. **Decode:** Show how an address splits into tag, index, and offset.
//!
//! Wall-clock pacing (auto-play) is left to whatever calls this binary; every request is
//! stepped to completion before the next one is issued.

mod request;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, BufRead};
use std::{fs, process};
use tracing_subscriber::EnvFilter;

use cachesim_core::cache::CacheStore;
use cachesim_core::common::addr::format_hex;
use cachesim_core::{
    AllocationPolicy, CacheConfig, CacheStats, ConfigUpdate, Engine, EventTrace, WritePolicy,
};

use request::{Request, parse_number, parse_request};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Deterministic set-associative cache simulator",
    long_about = "Replay read/write requests against a set-associative cache and print the \
                  resulting event trace.\n\nExamples:\n  cachesim run r:0x34 r:0x34 w:0x38=7\n  \
                  cachesim run --config cache.json --json r:0x10\n  cachesim decode 0x34"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay requests (r:ADDR or w:ADDR=DATA) in order.
    Run {
        #[command(flatten)]
        config: ConfigArgs,

        /// Print the traces and final state as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Wait for Enter before applying each event.
        #[arg(long, conflicts_with = "json")]
        step: bool,

        /// Requests to replay.
        #[arg(required = true, value_parser = parse_request)]
        requests: Vec<Request>,
    },

    /// Decode an address into tag, index, and offset.
    Decode {
        #[command(flatten)]
        config: ConfigArgs,

        /// Address (decimal or 0x-prefixed hex).
        #[arg(value_parser = parse_number)]
        address: u64,
    },
}

#[derive(clap::Args, Debug)]
struct ConfigArgs {
    /// JSON configuration file; flags below override its fields.
    #[arg(short, long)]
    config: Option<String>,

    /// Number of sets.
    #[arg(long)]
    sets: Option<usize>,

    /// Ways per set.
    #[arg(long)]
    ways: Option<usize>,

    /// Block size in bytes.
    #[arg(long)]
    block: Option<usize>,

    /// Address width in bits.
    #[arg(long)]
    width: Option<u32>,

    /// Write-hit policy.
    #[arg(long, value_enum)]
    write_policy: Option<WriteArg>,

    /// Write-miss policy.
    #[arg(long, value_enum)]
    allocation: Option<AllocationArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WriteArg {
    WriteThrough,
    WriteBack,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AllocationArg {
    WriteAllocate,
    NoWriteAllocate,
}

impl ConfigArgs {
    /// Loads the base configuration (file or defaults) and applies flag overrides.
    fn resolve(&self) -> Result<CacheConfig, String> {
        let base = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| format!("Error reading config {path}: {e}"))?;
                CacheConfig::from_json(&text)
                    .map_err(|e| format!("Error parsing config {path}: {e}"))?
            }
            None => CacheConfig::default(),
        };

        let update = ConfigUpdate {
            set_count: self.sets,
            associativity: self.ways,
            block_size: self.block,
            address_width: self.width,
            write_policy: self.write_policy.map(|p| match p {
                WriteArg::WriteThrough => WritePolicy::WriteThrough,
                WriteArg::WriteBack => WritePolicy::WriteBack,
            }),
            allocation_policy: self.allocation.map(|p| match p {
                AllocationArg::WriteAllocate => AllocationPolicy::WriteAllocate,
                AllocationArg::NoWriteAllocate => AllocationPolicy::NoWriteAllocate,
            }),
        };
        Ok(update.merge_into(&base))
    }
}

/// Everything `run --json` prints.
#[derive(Serialize)]
struct Report<'a> {
    config: &'a CacheConfig,
    requests: Vec<RequestReport>,
    cache: &'a CacheStore,
    stats: CacheStats,
}

#[derive(Serialize)]
struct RequestReport {
    request: Request,
    trace: EventTrace,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            config,
            json,
            step,
            requests,
        } => config
            .resolve()
            .and_then(|c| cmd_run(c, &requests, json, step)),
        Commands::Decode { config, address } => {
            config.resolve().and_then(|c| cmd_decode(c, address))
        }
    };

    if let Err(message) = result {
        eprintln!("{message}");
        process::exit(1);
    }
}

/// Replays `requests` in order, stepping each one to completion.
fn cmd_run(
    config: CacheConfig,
    requests: &[Request],
    json: bool,
    interactive: bool,
) -> Result<(), String> {
    let mut engine = Engine::new(config).map_err(|e| format!("Error: {e}"))?;
    let mut reports = Vec::with_capacity(requests.len());

    if !json {
        print_config(engine.config());
    }

    for request in requests {
        engine
            .process_request(request.kind, request.address, request.data)
            .map_err(|e| format!("Error: {e}"))?;

        if !json {
            println!("> {} 0x{}", request.kind, format_hex(request.address, 2));
        }
        let mut stdin = io::stdin().lock();
        loop {
            if let Some(event) = engine.current_event().filter(|_| !json) {
                println!("  [{:>2}] {event}", engine.cursor());
            }
            if interactive {
                let mut line = String::new();
                let _ = stdin
                    .read_line(&mut line)
                    .map_err(|e| format!("Error reading stdin: {e}"))?;
            }
            if !engine.step() {
                break;
            }
        }

        if let Some(trace) = engine.last_trace() {
            reports.push(RequestReport {
                request: *request,
                trace: trace.clone(),
            });
        }
    }

    if json {
        let report = Report {
            config: engine.config(),
            requests: reports,
            cache: engine.cache(),
            stats: engine.stats(),
        };
        let text = serde_json::to_string_pretty(&report).map_err(|e| format!("Error: {e}"))?;
        println!("{text}");
    } else {
        println!();
        print_cache(engine.cache());
        println!("{}", engine.stats());
    }
    Ok(())
}

/// Prints the breakdown of `address`.
fn cmd_decode(config: CacheConfig, address: u64) -> Result<(), String> {
    let engine = Engine::new(config).map_err(|e| format!("Error: {e}"))?;
    if address >= engine.memory().len() as u64 {
        return Err(format!(
            "Error: address {address:#x} is outside the {}-bit address space",
            config.address_width
        ));
    }

    let b = engine.decode(address);
    let (tag_bin, index_bin, offset_bin) = b.binary_fields();
    println!("address  {address} (0x{})", format_hex(address, 2));
    println!("tag      {:<6} bits={:<2} {tag_bin}", b.tag, b.tag_bits);
    println!("index    {:<6} bits={:<2} {index_bin}", b.index, b.index_bits);
    println!("offset   {:<6} bits={:<2} {offset_bin}", b.offset, b.offset_bits);
    Ok(())
}

fn print_config(config: &CacheConfig) {
    println!(
        "Cache: {} sets x {} ways x {} B = {} B  ({:?}, {:?}, {}-bit addresses)",
        config.set_count,
        config.associativity,
        config.block_size,
        config.total_bytes(),
        config.write_policy,
        config.allocation_policy,
        config.address_width
    );
    println!();
}

fn print_cache(cache: &CacheStore) {
    for (index, set) in cache.sets().iter().enumerate() {
        let ways: Vec<String> = set
            .ways
            .iter()
            .map(|line| {
                if line.valid {
                    format!(
                        "[{} tag=0x{} data={} lru={}]",
                        if line.dirty { "D" } else { "V" },
                        format_hex(line.tag, 2),
                        line.data.unwrap_or_default(),
                        line.last_used
                    )
                } else {
                    "[ - ]".to_string()
                }
            })
            .collect();
        println!("Set {index:>2}: {}", ways.join(" "));
    }
}

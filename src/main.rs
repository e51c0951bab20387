use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use poker_ev::cards::{Hand, parse_cards};
use poker_ev::config::EngineConfig;
use poker_ev::ev::Valuation;
use poker_ev::game::Action;
use poker_ev::icm::checked_icm_value;
use poker_ev::range::parse_range;
use poker_ev::report::Reporter;
use poker_ev::scenario::{HERO_NAME, ScenarioSpec};
use poker_ev::web;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "poker-ev",
    version,
    about = "Monte Carlo equity, chip EV and ICM for hold'em decisions",
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON engine configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Monte Carlo simulations per equity call
    #[arg(long = "sims", global = true)]
    simulations: Option<u32>,

    /// RNG seed (random if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Worker threads for the simulator
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Stop a simulation after this many milliseconds and report a partial estimate
    #[arg(long = "timeout-ms", global = true)]
    timeout_ms: Option<u64>,

    /// Disable ANSI colors in output
    #[arg(long = "no-color", global = true, default_value_t = false)]
    no_color: bool,

    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Expand a range string into its combos
    Range {
        /// Range such as "JJ+, AKs, KQo"
        spec: String,
    },
    /// Equity of a hand against a range
    Equity {
        /// Hero hole cards, e.g. AsKd
        #[arg(long)]
        hero: String,
        /// Opponent range
        #[arg(long)]
        range: String,
        /// Community cards, e.g. Ah7c2d
        #[arg(long, default_value = "")]
        board: String,
    },
    /// Expected value of fold, call or raise
    Ev {
        #[command(flatten)]
        table: TableArgs,
        /// fold, call or raise
        #[arg(long)]
        action: Action,
        /// Chips put in by the action
        #[arg(long = "bet", default_value_t = 0.0)]
        bet_size: f64,
    },
    /// Best of fold, call and a ladder of raise sizes
    Optimal {
        #[command(flatten)]
        table: TableArgs,
        /// Chips needed to call
        #[arg(long = "to-call")]
        amount_to_call: f64,
    },
    /// ICM value of each stack
    Icm {
        #[arg(long, value_delimiter = ',', num_args = 1.., required = true)]
        stacks: Vec<f64>,
        #[arg(long, value_delimiter = ',', num_args = 1.., required = true)]
        payouts: Vec<f64>,
    },
    /// Run the HTTP API
    Serve {
        /// Address to bind (HOST:PORT)
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
    },
}

#[derive(Debug, Args)]
struct TableArgs {
    /// Hero hole cards, e.g. AsKd
    #[arg(long)]
    hero: String,
    /// Opponent (continuing) range
    #[arg(long)]
    range: String,
    /// Community cards, e.g. Ah7c2d
    #[arg(long, default_value = "")]
    board: String,
    /// Stacks, hero first
    #[arg(long, value_delimiter = ',', num_args = 1.., default_value = "1000,1000")]
    stacks: Vec<f64>,
    #[arg(long = "sb", default_value_t = 1.0)]
    small_blind: f64,
    #[arg(long = "bb", default_value_t = 2.0)]
    big_blind: f64,
    #[arg(long, default_value_t = 0.0)]
    ante: f64,
    /// Pot before the action (defaults to blinds plus antes)
    #[arg(long)]
    pot: Option<f64>,
    /// Value outcomes through ICM with these payouts, first place first
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    payouts: Option<Vec<f64>>,
}

impl TableArgs {
    fn spec(&self) -> ScenarioSpec {
        ScenarioSpec {
            hero: self.hero.clone(),
            board: self.board.clone(),
            stacks: self.stacks.clone(),
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            ante: self.ante,
            pot: self.pot,
        }
    }

    fn valuation(&self) -> Result<Valuation> {
        Ok(Valuation::from_flags(self.payouts.is_some(), self.payouts.as_deref())?)
    }
}

fn main() -> Result<()> {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = engine_config(&cli)?;
    let reporter = Reporter::new(cli.no_color);

    match &cli.command {
        Commands::Range { spec } => {
            let range = parse_range(spec);
            if cli.json {
                let hands: Vec<Hand> = range.iter().copied().collect();
                print_json(&hands)?;
            } else {
                reporter.print_range(spec, &range);
            }
        }
        Commands::Equity { hero, range, board } => {
            let hero: Hand = hero.parse()?;
            let board = parse_cards(board)?;
            let report =
                config
                    .simulator()?
                    .simulate(&hero, &parse_range(range), &board, &config.options())?;
            if cli.json {
                print_json(&report)?;
            } else {
                reporter.print_equity(&hero, &board, &report);
            }
        }
        Commands::Ev {
            table,
            action,
            bet_size,
        } => {
            let scenario = table.spec().build()?;
            let outcome = config.calculator()?.evaluate(
                &scenario,
                HERO_NAME,
                &table.range,
                *action,
                *bet_size,
                &table.valuation()?,
            )?;
            if cli.json {
                print_json(&outcome)?;
            } else {
                reporter.print_ev(&outcome);
            }
        }
        Commands::Optimal {
            table,
            amount_to_call,
        } => {
            let scenario = table.spec().build()?;
            let recommendation = config.advisor()?.recommend(
                &scenario,
                HERO_NAME,
                &table.range,
                *amount_to_call,
                &table.valuation()?,
            )?;
            if cli.json {
                print_json(&recommendation)?;
            } else {
                reporter.print_recommendation(&recommendation);
            }
        }
        Commands::Icm { stacks, payouts } => {
            let values = checked_icm_value(stacks, payouts)?;
            if cli.json {
                print_json(&values)?;
            } else {
                reporter.print_icm(stacks, &values);
            }
        }
        Commands::Serve { addr } => {
            let addr: SocketAddr = addr.parse()?;
            run_server(addr, config)?;
        }
    }

    Ok(())
}

fn engine_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(simulations) = cli.simulations {
        config.simulations = simulations;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.threads.is_some() {
        config.threads = cli.threads;
    }
    if cli.timeout_ms.is_some() {
        config.timeout_ms = cli.timeout_ms;
    }
    Ok(config)
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn run_server(addr: SocketAddr, config: EngineConfig) -> Result<()> {
    web::serve(addr, config).await
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use timeman::{Color, LimitsType, TimeOptions};
use tools::clock::GameClock;
use tools::table::{BudgetRow, budget_table, simulate};

#[derive(Parser, Debug)]
#[command(author, version, about = "Print optimum/maximum time budgets")]
struct Cli {
    /// Remaining time (ms)
    #[arg(long, default_value_t = 60_000)]
    time: i64,

    /// Increment per move (ms)
    #[arg(long, default_value_t = 0)]
    inc: i64,

    /// Moves to the next time control (0 = sudden death)
    #[arg(long, default_value_t = 0)]
    movestogo: i32,

    /// First ply of the table
    #[arg(long, default_value_t = 1)]
    from: i32,

    /// Last ply of the table
    #[arg(long, default_value_t = 120)]
    to: i32,

    /// Ply step
    #[arg(long, default_value_t = 10)]
    step: usize,

    /// Fixed non-pawn material (default: drains with the ply)
    #[arg(long)]
    material: Option<i32>,

    /// Static evaluation in centipawns
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    eval: i32,

    /// TOML file with time options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Option override "Name=Value" (repeatable), e.g. "Move Overhead=50"
    #[arg(long = "option")]
    options: Vec<String>,

    /// Play a whole game on a simulated clock instead of a fixed table
    #[arg(long)]
    simulate: bool,

    /// Percent of the optimum spent per move when simulating
    #[arg(long, default_value_t = 100)]
    spend: i64,

    /// Emit JSON instead of a text table
    #[arg(long)]
    json: bool,
}

fn load_options(config: Option<&Path>, overrides: &[String]) -> Result<TimeOptions> {
    let mut options = match config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<TimeOptions>(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => TimeOptions::default(),
    };
    options.validate().context("invalid time options")?;

    for entry in overrides {
        let Some((name, value)) = entry.split_once('=') else {
            bail!("invalid --option format (expected Name=Value): {entry}");
        };
        options
            .set_option(name.trim(), value)
            .with_context(|| format!("failed to apply --option {entry}"))?;
    }
    Ok(options)
}

fn print_rows(rows: &[BudgetRow], unit: &str) {
    println!(
        "{:>5} {:>6} {:>10} {:>8} {:>4} {:>10} {:>10} {:>10}",
        "ply", "side", "time", "inc", "mtg", "optimum", "maximum", "spent"
    );
    for row in rows {
        let spent = row.spent.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5} {:>6} {:>10} {:>8} {:>4} {:>10} {:>10} {:>10}",
            row.ply,
            row.side,
            row.time,
            row.inc,
            row.movestogo,
            row.optimum,
            row.maximum,
            spent
        );
    }
    println!("(budgets in {unit})");
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    if cli.step == 0 {
        bail!("--step must be positive");
    }
    if cli.from > cli.to {
        bail!("--from ({}) is after --to ({})", cli.from, cli.to);
    }

    let options = load_options(cli.config.as_deref(), &cli.options)?;
    log::info!(
        "options: overhead={}ms nodestime={} ponder={} model={}",
        options.move_overhead,
        options.nodes_per_ms,
        options.ponder,
        options.complexity_model.name()
    );
    let unit = if options.uses_node_time() {
        "nodes"
    } else {
        "ms"
    };

    if cli.simulate {
        let clock = if cli.movestogo > 0 {
            GameClock::moves_in(cli.movestogo, cli.time, cli.inc)
        } else {
            GameClock::sudden_death(cli.time, cli.inc)
        };
        let sim = simulate(clock, cli.to, cli.spend, cli.eval, &options);

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&sim)?);
        } else {
            print_rows(&sim.rows, unit);
            match sim.flagged {
                Some(side) => println!("{side} lost on time"),
                None => println!("no flag after {} plies", sim.rows.len()),
            }
        }
        return Ok(());
    }

    let mut limits = LimitsType::new();
    limits.time = [cli.time; Color::NUM];
    limits.inc = [cli.inc; Color::NUM];
    limits.movestogo = cli.movestogo;

    let rows = budget_table(
        &limits,
        (cli.from..=cli.to).step_by(cli.step),
        cli.material,
        cli.eval,
        &options,
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_rows(&rows, unit);
    }
    Ok(())
}

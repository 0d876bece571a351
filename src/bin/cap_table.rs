//! Print the cap table after every funding round and ESOP refresh,
//! followed by investor returns at the assumed exit

use anyhow::{Context, Result};
use clap::Parser;
use startup_model::{
    assumptions::ExitMethod,
    projection::{ProjectionConfig, ProjectionEngine},
    Assumptions,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cap-table")]
#[command(author, version, about = "Show cap table dilution and exit returns")]
struct Cli {
    /// Directory holding assumption CSVs (default: built-in assumptions)
    #[arg(short, long, env = "MODEL_ASSUMPTIONS")]
    assumptions: Option<PathBuf>,

    /// Override the exit year
    #[arg(long)]
    exit_year: Option<u32>,

    /// Value the exit on EBITDA instead of ARR
    #[arg(long)]
    ebitda: bool,

    /// Print the history as JSON instead of tables
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut assumptions = match &cli.assumptions {
        Some(dir) => Assumptions::from_csv_path(dir)
            .with_context(|| format!("Failed to load assumptions from '{}'", dir.display()))?,
        None => Assumptions::default_model(),
    };
    if let Some(year) = cli.exit_year {
        assumptions.exit.exit_year = year;
    }
    if cli.ebitda {
        assumptions.exit.method = ExitMethod::Ebitda;
    }

    // Horizon must reach the exit for it to be valued
    let config = ProjectionConfig {
        projection_years: assumptions.exit.exit_year.max(1),
        ..Default::default()
    };
    let report = ProjectionEngine::new(assumptions, config)
        .run()
        .context("Projection failed")?;

    if cli.json {
        let out = serde_json::json!({
            "cap_table": report.cap_table,
            "exit": report.exit,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for snapshot in &report.cap_table.snapshots {
        let table = &snapshot.cap_table;
        println!("{} ({} shares)", snapshot.stage, table.total_shares());
        println!("{}", "-".repeat(56));
        for e in &table.entries {
            println!("  {:<28} {:>12} {:>8.2}%", e.stakeholder, e.shares, e.ownership * 100.0);
        }
        println!();
    }

    println!("Rounds:");
    println!(
        "{:<12} {:>14} {:>14} {:>14} {:>10}",
        "Round", "Amount", "Pre-Money", "Post-Money", "$/Share"
    );
    for t in &report.cap_table.rounds {
        println!(
            "{:<12} {:>14.0} {:>14.0} {:>14.0} {:>10.4}",
            t.round_name, t.amount, t.pre_money_valuation, t.post_money_valuation, t.price_per_share
        );
    }

    match &report.exit {
        Some(exit) => {
            println!(
                "\nExit in year {}: ARR ${:.0}, EBITDA ${:.0}, valuation ${:.0}",
                exit.exit_year, exit.arr, exit.ebitda, exit.valuation
            );
            for p in &exit.distribution {
                println!("  {:<28} {:>8.2}% ${:>14.0}", p.stakeholder, p.ownership * 100.0, p.proceeds);
            }
            println!();
            for r in &exit.round_returns {
                println!(
                    "  {:<12} invested ${:.0} in year {} -> ${:.0} ({:.2}x, {:.1}% CAGR)",
                    r.round_name,
                    r.returns.investment,
                    r.returns.investment_year,
                    r.returns.equity_value,
                    r.returns.roi,
                    r.returns.cagr
                );
            }
        }
        None => println!("\nNo exit valued"),
    }

    Ok(())
}

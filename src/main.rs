//! Startup Model CLI
//!
//! Runs the full projection and prints annual revenue, OPEX, statements and
//! cap table results. Monthly detail goes to CSV.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use startup_model::{
    projection::{ProjectionConfig, ProjectionSummary, DEFAULT_PROJECTION_YEARS},
    Assumptions, ProjectionEngine,
};
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "startup-model")]
#[command(author, version, about = "Run the startup financial model")]
struct Cli {
    /// Years to project
    #[arg(short, long, env = "MODEL_YEARS", default_value_t = DEFAULT_PROJECTION_YEARS)]
    years: u32,

    /// Directory holding assumption CSVs (default: built-in assumptions)
    #[arg(short, long, env = "MODEL_ASSUMPTIONS")]
    assumptions: Option<PathBuf>,

    /// Cash on hand before month 1
    #[arg(long, env = "MODEL_OPENING_CASH", default_value_t = 0.0)]
    opening_cash: f64,

    /// Monthly CSV output path
    #[arg(short, long, default_value = "model_output.csv")]
    output: PathBuf,

    /// Also write the summary as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Serialize)]
struct SummaryFile<'a> {
    generated_at: String,
    projection_years: u32,
    opening_cash: f64,
    summary: &'a ProjectionSummary,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    println!("Startup Model v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");

    let assumptions = match &cli.assumptions {
        Some(dir) => Assumptions::from_csv_path(dir)
            .with_context(|| format!("Failed to load assumptions from '{}'", dir.display()))?,
        None => Assumptions::default_model(),
    };

    let config = ProjectionConfig {
        projection_years: cli.years,
        opening_cash: cli.opening_cash,
        ..Default::default()
    };
    let report = ProjectionEngine::new(assumptions, config)
        .run()
        .context("Projection failed")?;

    // Revenue
    println!("Revenue ({} years):", report.revenue.len());
    println!(
        "{:>4} {:>10} {:>8} {:>8} {:>12} {:>14} {:>14} {:>8}",
        "Year", "Customers", "New", "Churned", "ARR/Cust", "ARR", "Revenue", "GM %"
    );
    println!("{}", "-".repeat(86));
    for r in &report.revenue {
        println!(
            "{:>4} {:>10} {:>8} {:>8} {:>12.0} {:>14.0} {:>14.0} {:>8.1}",
            r.year,
            r.customers.total_customers,
            r.customers.new_customers,
            r.customers.churned_customers,
            r.customers.arr_per_customer,
            r.arr,
            r.total_revenue,
            r.gross_margin * 100.0,
        );
    }

    // OPEX and statements
    println!("\nOperations:");
    println!(
        "{:>4} {:>6} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Year", "Heads", "Personnel", "Total OPEX", "EBITDA", "Net Income", "Cash"
    );
    println!("{}", "-".repeat(86));
    for (o, s) in report.annual_opex.iter().zip(&report.statements.years) {
        println!(
            "{:>4} {:>6} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>14.0}",
            o.year,
            o.ending_headcount,
            o.personnel_cost,
            o.total_opex,
            s.income_statement.ebitda,
            s.income_statement.net_income,
            s.cash_flow.cash_balance,
        );
    }

    // Equity
    if let Some(table) = report.cap_table.final_table() {
        println!("\nFinal cap table ({} shares):", table.total_shares());
        for e in &table.entries {
            println!("  {:<28} {:>12} {:>8.2}%", e.stakeholder, e.shares, e.ownership * 100.0);
        }
    }
    if let Some(exit) = &report.exit {
        println!(
            "\nExit in year {} at ${:.0} ({:?} method)",
            exit.exit_year, exit.valuation, exit.method
        );
        for r in &exit.round_returns {
            println!(
                "  {:<12} ROI {:>6.2}x  CAGR {:>6.1}%",
                r.round_name, r.returns.roi, r.returns.cagr
            );
        }
    }

    // Monthly detail
    let file = File::create(&cli.output)
        .with_context(|| format!("Failed to create '{}'", cli.output.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    for row in report.monthly_rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("\nMonthly results written to: {}", cli.output.display());

    let summary = report.summary();
    if let Some(path) = &cli.json {
        let out = SummaryFile {
            generated_at: Utc::now().to_rfc3339(),
            projection_years: cli.years,
            opening_cash: cli.opening_cash,
            summary: &summary,
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create '{}'", path.display()))?;
        serde_json::to_writer_pretty(file, &out)?;
        println!("Summary written to: {}", path.display());
    }

    println!("\nSummary:");
    println!("  Total Revenue: ${:.0}", summary.total_revenue);
    println!("  Final ARR: ${:.0} ({} customers)", summary.final_arr, summary.final_customers);
    println!("  Total OPEX: ${:.0}", summary.total_opex);
    println!("  Peak Headcount: {}", summary.peak_headcount);
    println!("  Ending Cash: ${:.0}", summary.ending_cash);
    println!("  Minimum Cash: ${:.0}", summary.minimum_cash);
    match summary.projected_cash_out {
        0 => println!("  Cash Out: never"),
        m => println!("  Cash Out: month {}", m),
    }
    match summary.breakeven_month {
        0 => println!("  Breakeven: not reached"),
        m => println!("  Breakeven: month {}", m),
    }
    println!("  Average Burn: ${:.0}/mo (peak ${:.0})", summary.average_burn, summary.peak_burn);
    println!("  Founder Ownership: {:.2}%", summary.founder_ownership * 100.0);

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}

//! Output structures for a full model run

use serde::{Deserialize, Serialize};

use crate::cash::{BurnSummary, CashPosition};
use crate::equity::{CapTableHistory, ExitMethod, ExitPayout, RoundReturns, StakeholderType};
use crate::financials::FinancialStatements;
use crate::opex::{AnnualOpex, MonthlyOpex};
use crate::revenue::{MonthlyRevenue, YearlyRevenue};

/// Exit valuation and who gets what
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitAnalysis {
    pub exit_year: u32,
    pub method: ExitMethod,
    pub arr: f64,
    pub ebitda: f64,
    pub valuation: f64,
    pub distribution: Vec<ExitPayout>,
    pub round_returns: Vec<RoundReturns>,
}

/// A single month of joined output (revenue, OPEX, cash)
///
/// Flat so rows serialize straight to CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRow {
    pub month: u32,
    pub year: u32,
    pub funding_round: String,
    pub headcount: u32,
    pub revenue: f64,
    pub cogs: f64,
    pub personnel_cost: f64,
    pub operating_subtotal: f64,
    pub total_opex: f64,
    pub net_burn: f64,
    pub funding: f64,
    pub cash_balance: f64,
    pub months_of_runway: f64,
}

/// Complete projection result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionReport {
    pub revenue: Vec<YearlyRevenue>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub opex: Vec<MonthlyOpex>,
    pub annual_opex: Vec<AnnualOpex>,
    pub cash: Vec<CashPosition>,
    pub burn: BurnSummary,
    pub statements: FinancialStatements,
    pub cap_table: CapTableHistory,
    pub exit: Option<ExitAnalysis>,
}

impl ProjectionReport {
    /// Join revenue, OPEX and cash by month
    pub fn monthly_rows(&self) -> Vec<MonthlyRow> {
        self.opex
            .iter()
            .zip(&self.cash)
            .map(|(o, c)| {
                let cogs = self
                    .monthly_revenue
                    .get((o.month - 1) as usize)
                    .map_or(0.0, |r| r.cogs);
                MonthlyRow {
                    month: o.month,
                    year: o.year,
                    funding_round: o.funding_round.clone(),
                    headcount: o.headcount,
                    revenue: c.revenue,
                    cogs,
                    personnel_cost: o.personnel_cost,
                    operating_subtotal: o.operating_subtotal,
                    total_opex: o.total_opex,
                    net_burn: c.net_burn,
                    funding: c.funding,
                    cash_balance: c.cash_balance,
                    months_of_runway: c.months_of_runway,
                }
            })
            .collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_revenue: f64 = self.revenue.iter().map(|r| r.total_revenue).sum();
        let total_opex = self.opex.last().map_or(0.0, |o| o.cumulative_opex);
        let final_arr = self.revenue.last().map_or(0.0, |r| r.arr);
        let final_customers = self.revenue.last().map_or(0, |r| r.customers.total_customers);
        let peak_headcount = self.opex.iter().map(|o| o.headcount).max().unwrap_or(0);

        let ending_cash = self.cash.last().map_or(0.0, |c| c.cash_balance);
        let minimum_cash = self
            .cash
            .iter()
            .map(|c| c.cash_balance)
            .fold(f64::INFINITY, f64::min);
        let minimum_cash = if minimum_cash.is_finite() { minimum_cash } else { 0.0 };

        // First month the business covers its own costs
        let breakeven_month = self
            .cash
            .iter()
            .find(|c| c.revenue > 0.0 && c.net_burn >= 0.0)
            .map_or(0, |c| c.month);

        let founder_ownership = self
            .cap_table
            .final_table()
            .map(|t| {
                t.entries
                    .iter()
                    .filter(|e| e.stakeholder_type == StakeholderType::Founder)
                    .map(|e| e.ownership)
                    .sum()
            })
            .unwrap_or(0.0);

        ProjectionSummary {
            projection_years: self.revenue.len() as u32,
            total_revenue,
            final_arr,
            final_customers,
            total_opex,
            peak_headcount,
            ending_cash,
            minimum_cash,
            projected_cash_out: self.burn.projected_cash_out,
            average_burn: self.burn.average_burn,
            peak_burn: self.burn.peak_burn,
            breakeven_month,
            founder_ownership,
            exit_valuation: self.exit.as_ref().map(|e| e.valuation),
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub projection_years: u32,
    pub total_revenue: f64,
    pub final_arr: f64,
    pub final_customers: u64,
    pub total_opex: f64,
    pub peak_headcount: u32,
    pub ending_cash: f64,
    pub minimum_cash: f64,
    /// First month with cash <= 0 (0 = never)
    pub projected_cash_out: u32,
    pub average_burn: f64,
    pub peak_burn: f64,
    /// First month revenue covers OPEX (0 = never)
    pub breakeven_month: u32,
    /// Combined founder ownership after the last round
    pub founder_ownership: f64,
    pub exit_valuation: Option<f64>,
}

//! Annual financial statements: income statement -> cash flow -> balance sheet

mod statements;

pub use statements::{
    calculate_balance_sheet, calculate_cash_flow, calculate_income_statement, BalanceSheet,
    CashFlowParams, CashFlowStatement, IncomeStatement, IncomeStatementParams,
    ONE_MONTH_FRACTION,
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::assumptions::FundingRound;
use crate::opex::AnnualOpex;
use crate::revenue::YearlyRevenue;

/// Revenue and COGS for one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualRevenueInput {
    pub year: u32,
    pub revenue: f64,
    pub cogs: f64,
}

impl From<&YearlyRevenue> for AnnualRevenueInput {
    fn from(r: &YearlyRevenue) -> Self {
        Self {
            year: r.year,
            revenue: r.total_revenue,
            cogs: r.cogs,
        }
    }
}

/// Total OPEX for one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualOpexInput {
    pub year: u32,
    pub opex: f64,
}

impl From<&AnnualOpex> for AnnualOpexInput {
    fn from(o: &AnnualOpex) -> Self {
        Self {
            year: o.year,
            opex: o.total_opex,
        }
    }
}

/// Capital raised in one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualFunding {
    pub year: u32,
    pub equity_proceeds: f64,
    pub debt_proceeds: f64,
}

impl From<&FundingRound> for AnnualFunding {
    fn from(round: &FundingRound) -> Self {
        Self {
            year: round.year(),
            equity_proceeds: round.amount,
            debt_proceeds: 0.0,
        }
    }
}

/// Statement-generation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialParams {
    /// Cash on hand before year 1
    pub opening_cash: f64,
    pub income: IncomeStatementParams,
    /// Capex rate applied every year
    pub capex_rate: f64,
}

impl Default for FinancialParams {
    fn default() -> Self {
        Self {
            opening_cash: 0.0,
            income: IncomeStatementParams::default(),
            capex_rate: CashFlowParams::default().capex_rate,
        }
    }
}

/// The three statements for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualStatements {
    pub year: u32,
    pub income_statement: IncomeStatement,
    pub cash_flow: CashFlowStatement,
    pub balance_sheet: BalanceSheet,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub years: Vec<AnnualStatements>,
}

impl FinancialStatements {
    pub fn year(&self, year: u32) -> Option<&AnnualStatements> {
        self.years.iter().find(|s| s.year == year)
    }

    pub fn ending_cash(&self) -> f64 {
        self.years.last().map_or(0.0, |s| s.cash_flow.cash_balance)
    }
}

/// Generate statements for years 1..=years, threading cash forward
///
/// A year with no revenue or OPEX entry is treated as zero. Funding entries
/// falling in the same year are summed.
pub fn generate_financial_statements(
    years: u32,
    revenue_data: &[AnnualRevenueInput],
    opex_data: &[AnnualOpexInput],
    funding: &[AnnualFunding],
    params: &FinancialParams,
) -> FinancialStatements {
    let mut out = FinancialStatements {
        years: Vec::with_capacity(years as usize),
    };
    let mut cash = params.opening_cash;
    let mut paid_in_capital = 0.0;

    for year in 1..=years {
        let (revenue, cogs) = revenue_data
            .iter()
            .find(|r| r.year == year)
            .map_or_else(
                || {
                    debug!("No revenue data for year {}, using zero", year);
                    (0.0, 0.0)
                },
                |r| (r.revenue, r.cogs),
            );
        let opex = opex_data
            .iter()
            .find(|o| o.year == year)
            .map_or_else(
                || {
                    debug!("No OPEX data for year {}, using zero", year);
                    0.0
                },
                |o| o.opex,
            );

        let (equity_proceeds, debt_proceeds) = funding
            .iter()
            .filter(|f| f.year == year)
            .fold((0.0, 0.0), |(e, d), f| (e + f.equity_proceeds, d + f.debt_proceeds));
        paid_in_capital += equity_proceeds;

        let income_statement = calculate_income_statement(year, revenue, cogs, opex, &params.income);
        let cash_flow = calculate_cash_flow(
            year,
            &income_statement,
            cash,
            &CashFlowParams {
                capex_rate: params.capex_rate,
                debt_proceeds,
                equity_proceeds,
            },
        );
        cash = cash_flow.cash_balance;
        let balance_sheet = calculate_balance_sheet(year, cash, revenue, opex, paid_in_capital);

        out.years.push(AnnualStatements {
            year,
            income_statement,
            cash_flow,
            balance_sheet,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn revenue(year: u32, revenue: f64) -> AnnualRevenueInput {
        AnnualRevenueInput {
            year,
            revenue,
            cogs: revenue * 0.25,
        }
    }

    #[test]
    fn test_cash_threads_between_years() {
        let revenue_data = vec![revenue(1, 500_000.0), revenue(2, 2_000_000.0), revenue(3, 6_000_000.0)];
        let opex_data = vec![
            AnnualOpexInput { year: 1, opex: 1_500_000.0 },
            AnnualOpexInput { year: 2, opex: 2_500_000.0 },
            AnnualOpexInput { year: 3, opex: 3_000_000.0 },
        ];
        let funding = vec![AnnualFunding {
            year: 1,
            equity_proceeds: 3_000_000.0,
            debt_proceeds: 0.0,
        }];

        let fs = generate_financial_statements(3, &revenue_data, &opex_data, &funding, &FinancialParams::default());

        assert_eq!(fs.years.len(), 3);
        assert_eq!(fs.years[0].cash_flow.beginning_cash, 0.0);
        for pair in fs.years.windows(2) {
            assert_eq!(pair[1].cash_flow.beginning_cash, pair[0].cash_flow.cash_balance);
        }
        for s in &fs.years {
            assert!(s.balance_sheet.is_balanced(), "year {} unbalanced", s.year);
            assert_eq!(s.balance_sheet.cash, s.cash_flow.cash_balance);
        }
        assert_relative_eq!(fs.ending_cash(), fs.years[2].cash_flow.cash_balance);
    }

    #[test]
    fn test_missing_years_default_to_zero() {
        let fs = generate_financial_statements(
            3,
            &[revenue(2, 1_000_000.0)],
            &[],
            &[],
            &FinancialParams {
                opening_cash: 100_000.0,
                ..Default::default()
            },
        );

        let y1 = fs.year(1).unwrap();
        assert_eq!(y1.income_statement.revenue, 0.0);
        assert_eq!(y1.income_statement.opex, 0.0);
        assert_eq!(y1.cash_flow.cash_balance, 100_000.0);
        assert_eq!(fs.year(2).unwrap().income_statement.revenue, 1_000_000.0);
    }

    #[test]
    fn test_same_year_funding_summed() {
        let funding = vec![
            AnnualFunding { year: 2, equity_proceeds: 1_000_000.0, debt_proceeds: 0.0 },
            AnnualFunding { year: 2, equity_proceeds: 500_000.0, debt_proceeds: 250_000.0 },
        ];
        let fs = generate_financial_statements(2, &[], &[], &funding, &FinancialParams::default());

        let y2 = fs.year(2).unwrap();
        assert_relative_eq!(y2.cash_flow.equity_proceeds, 1_500_000.0);
        assert_relative_eq!(y2.cash_flow.debt_proceeds, 250_000.0);
        assert_relative_eq!(y2.balance_sheet.paid_in_capital, 1_500_000.0);
    }

    #[test]
    fn test_zero_years() {
        let fs = generate_financial_statements(0, &[], &[], &[], &FinancialParams::default());
        assert!(fs.years.is_empty());
        assert_eq!(fs.ending_cash(), 0.0);
    }
}

//! Projection engine chaining every calculation module for one scenario

use log::debug;

use super::report::{ExitAnalysis, ProjectionReport};
use crate::assumptions::{Assumptions, FundingRound};
use crate::cash::{burn_summary, project_cash, FundingEvent};
use crate::equity::{
    calculate_exit_valuation, exit_distribution, generate_cap_table_with_shares, round_returns,
    CapTableHistory,
};
use crate::error::ModelResult;
use crate::financials::{
    generate_financial_statements, AnnualFunding, AnnualOpexInput, AnnualRevenueInput,
    FinancialParams, FinancialStatements,
};
use crate::opex::{annual_opex, OpexModel};
use crate::revenue::{distribute_monthly, RevenueModel, YearlyRevenue};

/// Default projection horizon in years
pub const DEFAULT_PROJECTION_YEARS: u32 = 10;

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Number of years to project (months = years * 12)
    pub projection_years: u32,

    /// Cash on hand before month 1
    pub opening_cash: f64,

    /// Statement settings; its `opening_cash` is overridden by the field above
    pub financial: FinancialParams,

    /// Whether to value an exit in the assumed exit year
    pub include_exit: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            projection_years: DEFAULT_PROJECTION_YEARS,
            opening_cash: 0.0,
            financial: FinancialParams::default(),
            include_exit: true,
        }
    }
}

/// Main projection engine
pub struct ProjectionEngine {
    assumptions: Assumptions,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given assumptions and config
    pub fn new(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self { assumptions, config }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the full model
    pub fn run(&self) -> ModelResult<ProjectionReport> {
        let years = self.config.projection_years;
        let months = years * 12;
        let a = &self.assumptions;

        // Revenue
        let revenue_model = RevenueModel::new(a.revenue.clone())?;
        let revenue = revenue_model.project(years);
        let monthly_revenue = distribute_monthly(&revenue);

        // OPEX
        let opex_model = OpexModel::new(a.personnel.clone(), a.funding_tiers.clone());
        let opex = opex_model.project(months);
        let annual = annual_opex(&opex);

        // Cash
        let funding_events: Vec<FundingEvent> =
            a.funding_rounds.iter().map(FundingEvent::from).collect();
        let cash = project_cash(self.config.opening_cash, &monthly_revenue, &opex, &funding_events);
        let burn = burn_summary(&cash);

        // Statements
        let revenue_inputs: Vec<AnnualRevenueInput> = revenue.iter().map(Into::into).collect();
        let opex_inputs: Vec<AnnualOpexInput> = annual.iter().map(Into::into).collect();
        let funding_inputs: Vec<AnnualFunding> = a.funding_rounds.iter().map(Into::into).collect();
        let params = FinancialParams {
            opening_cash: self.config.opening_cash,
            ..self.config.financial
        };
        let statements =
            generate_financial_statements(years, &revenue_inputs, &opex_inputs, &funding_inputs, &params);

        // Equity
        let cap_table = self.cap_table_for(&a.funding_rounds)?;
        let exit = if self.config.include_exit {
            self.exit_analysis(&revenue, &statements, &cap_table)?
        } else {
            None
        };

        debug!(
            "Projected {} months: ending cash {:.0}, cash-out month {}",
            months,
            cash.last().map_or(0.0, |c| c.cash_balance),
            burn.projected_cash_out
        );

        Ok(ProjectionReport {
            revenue,
            monthly_revenue,
            opex,
            annual_opex: annual,
            cash,
            burn,
            statements,
            cap_table,
            exit,
        })
    }

    fn cap_table_for(&self, rounds: &[FundingRound]) -> ModelResult<CapTableHistory> {
        let equity = &self.assumptions.equity;
        generate_cap_table_with_shares(
            &equity.founders,
            equity.esop_pool_size,
            equity.authorized_shares,
            rounds,
        )
    }

    /// Value the exit and split proceeds
    ///
    /// Skipped when the exit year falls outside the projection. Only rounds
    /// closing by the exit year take part.
    fn exit_analysis(
        &self,
        revenue: &[YearlyRevenue],
        statements: &FinancialStatements,
        full_history: &CapTableHistory,
    ) -> ModelResult<Option<ExitAnalysis>> {
        let exit = &self.assumptions.exit;

        let (Some(year_revenue), Some(year_statements)) = (
            revenue.iter().find(|r| r.year == exit.exit_year),
            statements.year(exit.exit_year),
        ) else {
            debug!("Exit year {} outside projection, skipping exit analysis", exit.exit_year);
            return Ok(None);
        };

        let rounds: Vec<FundingRound> = self
            .assumptions
            .funding_rounds
            .iter()
            .filter(|r| r.year() <= exit.exit_year)
            .cloned()
            .collect();
        let history = if rounds.len() == self.assumptions.funding_rounds.len() {
            full_history.clone()
        } else {
            self.cap_table_for(&rounds)?
        };
        let Some(table) = history.final_table() else {
            return Ok(None);
        };

        let arr = year_revenue.arr;
        let ebitda = year_statements.income_statement.ebitda;
        let valuation = calculate_exit_valuation(
            arr,
            ebitda,
            exit.arr_multiple,
            exit.ebitda_multiple,
            exit.method,
        );

        Ok(Some(ExitAnalysis {
            exit_year: exit.exit_year,
            method: exit.method,
            arr,
            ebitda,
            valuation,
            distribution: exit_distribution(table, valuation),
            round_returns: round_returns(table, &rounds, exit.exit_year, valuation)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{ExitMethod, RevenueAssumptions};
    use crate::equity::OWNERSHIP_EPSILON;
    use crate::error::ModelError;
    use approx::assert_relative_eq;

    fn default_engine(years: u32) -> ProjectionEngine {
        let config = ProjectionConfig {
            projection_years: years,
            ..Default::default()
        };
        ProjectionEngine::new(Assumptions::default_model(), config)
    }

    #[test]
    fn test_projection_runs() {
        let report = default_engine(10).run().unwrap();

        assert_eq!(report.revenue.len(), 10);
        assert_eq!(report.monthly_revenue.len(), 120);
        assert_eq!(report.opex.len(), 120);
        assert_eq!(report.cash.len(), 120);
        assert_eq!(report.annual_opex.len(), 10);
        assert_eq!(report.statements.years.len(), 10);
        assert!(report.exit.is_some());
    }

    #[test]
    fn test_cash_roll_forward_holds() {
        let report = default_engine(10).run().unwrap();

        for pair in report.cash.windows(2) {
            let (prev, cur) = (&pair[0], &pair[1]);
            assert_relative_eq!(
                cur.cash_balance,
                prev.cash_balance + cur.funding + cur.net_burn,
                epsilon = 1e-6
            );
        }
        assert_eq!(report.cash[2].funding, 2_000_000.0);
    }

    #[test]
    fn test_statements_balance_every_year() {
        let report = default_engine(10).run().unwrap();

        for s in &report.statements.years {
            assert!(s.balance_sheet.is_balanced(), "year {} unbalanced", s.year);
        }
        // Year 1 raises the pre-seed
        assert_eq!(report.statements.years[0].cash_flow.equity_proceeds, 2_000_000.0);
    }

    #[test]
    fn test_cap_table_closed_and_exit_split() {
        let report = default_engine(10).run().unwrap();

        for snapshot in &report.cap_table.snapshots {
            assert!(snapshot.cap_table.is_closed());
        }

        let exit = report.exit.unwrap();
        assert_eq!(exit.exit_year, 7);
        assert_eq!(exit.method, ExitMethod::Arr);
        assert_relative_eq!(exit.valuation, exit.arr * 8.0, epsilon = 1e-6);
        let proceeds: f64 = exit.distribution.iter().map(|p| p.proceeds).sum();
        assert_relative_eq!(proceeds, exit.valuation, max_relative = OWNERSHIP_EPSILON);
        assert_eq!(exit.round_returns.len(), 3);
    }

    #[test]
    fn test_exit_excludes_later_rounds() {
        let mut assumptions = Assumptions::default_model();
        assumptions.exit.exit_year = 3;
        let config = ProjectionConfig {
            projection_years: 5,
            ..Default::default()
        };
        let report = ProjectionEngine::new(assumptions, config).run().unwrap();

        let exit = report.exit.unwrap();
        // Series X closes in year 5
        assert_eq!(exit.round_returns.len(), 2);
        assert!(exit.distribution.iter().all(|p| p.stakeholder != "Series X Investors"));
    }

    #[test]
    fn test_exit_beyond_horizon_skipped() {
        let report = default_engine(5).run().unwrap();
        assert!(report.exit.is_none());
    }

    #[test]
    fn test_invalid_revenue_assumptions_propagate() {
        let mut assumptions = Assumptions::default_model();
        assumptions.revenue = RevenueAssumptions {
            year1_customers: 5_000,
            ..RevenueAssumptions::default_model()
        };
        let result = ProjectionEngine::new(assumptions, ProjectionConfig::default()).run();

        assert!(matches!(result, Err(ModelError::InvalidAssumptions(_))));
    }

    #[test]
    fn test_summary() {
        let report = default_engine(10).run().unwrap();
        let summary = report.summary();

        assert_eq!(summary.projection_years, 10);
        assert_eq!(summary.peak_headcount, 14);
        assert_relative_eq!(summary.total_opex, report.opex[119].cumulative_opex);
        assert!(summary.founder_ownership > 0.0 && summary.founder_ownership < 0.9);
        assert_eq!(report.monthly_rows().len(), 120);
    }
}

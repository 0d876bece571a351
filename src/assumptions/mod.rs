//! Model assumptions: revenue drivers, hiring plan, funding and equity terms

mod equity;
mod funding;
mod personnel;
mod revenue;
mod schedule;
pub mod loader;

pub use equity::{EquityAssumptions, ExitAssumptions, ExitMethod, Founder, DEFAULT_AUTHORIZED_SHARES};
pub use funding::{
    default_funding_rounds, default_funding_tiers, month_to_year, FundingRound, FundingRoundTier,
    FundingTierTable, OpexAllocation, SERIES_X_BUDGET_SHARES, SERIES_X_MONTHLY_BUDGET,
};
pub use loader::LoadedAssumptions;
pub use personnel::{default_roles, PersonnelRole};
pub use revenue::{
    default_discount_schedule, RevenueAssumptions, DEFAULT_CHURN_RATE, OPEX_MODEL_COGS_RATE,
    REVENUE_MODULE_COGS_RATE,
};
pub use schedule::{Step, StepTable, YearSchedule};

use std::path::Path;

use crate::error::ModelResult;

/// Container for all model assumptions
#[derive(Debug, Clone)]
pub struct Assumptions {
    pub revenue: RevenueAssumptions,
    pub personnel: Vec<PersonnelRole>,
    pub funding_tiers: FundingTierTable,
    /// Capital raises in chronological order
    pub funding_rounds: Vec<FundingRound>,
    pub equity: EquityAssumptions,
    pub exit: ExitAssumptions,
}

impl Assumptions {
    /// Create assumptions with default values matching the Excel reference
    pub fn default_model() -> Self {
        Self {
            revenue: RevenueAssumptions::default_model(),
            personnel: default_roles(),
            funding_tiers: default_funding_tiers(),
            funding_rounds: default_funding_rounds(),
            equity: EquityAssumptions::default(),
            exit: ExitAssumptions::default(),
        }
    }

    /// Load assumptions from CSV files in the default location (data/assumptions/)
    pub fn from_csv() -> ModelResult<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load assumptions from CSV files in a specific directory
    ///
    /// Funding tiers, equity and exit terms are not stored on disk and keep
    /// their defaults.
    pub fn from_csv_path(path: &Path) -> ModelResult<Self> {
        let loaded = LoadedAssumptions::load_from(path)?;

        Ok(Self {
            revenue: loaded.revenue,
            personnel: loaded.personnel,
            funding_rounds: loaded.funding_rounds,
            ..Self::default_model()
        })
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::default_model()
    }
}

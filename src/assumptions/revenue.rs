//! Revenue assumptions: market sizing, pricing, churn and discounting

use serde::{Deserialize, Serialize};

use super::schedule::YearSchedule;
use crate::error::{ModelError, ModelResult};

/// COGS rate used by the revenue module's live calculation (25%)
pub const REVENUE_MODULE_COGS_RATE: f64 = 0.25;

/// COGS rate assumed by the OPEX-side models (15%)
pub const OPEX_MODEL_COGS_RATE: f64 = 0.15;

/// Default churn rate per year (5%)
pub const DEFAULT_CHURN_RATE: f64 = 0.05;

/// Default year-indexed discount off list ARR, last value repeats
pub fn default_discount_schedule() -> YearSchedule {
    YearSchedule::new(vec![
        0.40,  // Year 1
        0.30,  // Year 2
        0.20,  // Year 3
        0.10,  // Year 4
        0.10,  // Year 5
        0.075, // Year 6
        0.05,  // Year 7
        0.05,  // Year 8
        0.03,  // Year 9
        0.025, // Year 10+
    ])
}

/// Inputs to the customer growth and pricing model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueAssumptions {
    /// Total addressable market (unit count)
    pub tam: u64,

    /// Long-run share of the TAM the company expects to capture
    pub target_penetration: f64,

    /// Years until target penetration is reached
    pub years_to_target: f64,

    /// Customers at the end of year 1
    pub year1_customers: u64,

    /// List ARR per customer in year 1
    pub base_arr: f64,

    /// One-time setup fee charged to each new customer
    pub setup_fee: f64,

    /// Annual list price escalation
    pub annual_price_increase: f64,

    /// Churn by year (applied to prior year's customer count)
    pub churn: YearSchedule,

    /// Discount off list ARR by year
    pub discounts: YearSchedule,

    /// Cost of goods sold as a share of total revenue
    pub cogs_rate: f64,
}

impl RevenueAssumptions {
    /// Defaults matching the reference Excel model
    pub fn default_model() -> Self {
        Self {
            tam: 30_000,
            target_penetration: 0.05,
            years_to_target: 7.0,
            year1_customers: 10,
            base_arr: 24_000.0,
            setup_fee: 5_000.0,
            annual_price_increase: 0.03,
            churn: YearSchedule::flat(DEFAULT_CHURN_RATE),
            discounts: default_discount_schedule(),
            cogs_rate: REVENUE_MODULE_COGS_RATE,
        }
    }

    /// Target customer count at full penetration
    pub fn target_customers(&self) -> f64 {
        self.tam as f64 * self.target_penetration
    }

    /// Reject assumption sets that make the growth exponent undefined
    pub fn validate(&self) -> ModelResult<()> {
        if self.tam == 0 {
            return Err(ModelError::InvalidAssumptions("tam must be positive".into()));
        }
        if !(self.target_penetration > 0.0 && self.target_penetration <= 1.0) {
            return Err(ModelError::InvalidAssumptions(format!(
                "target_penetration must be in (0, 1], got {}",
                self.target_penetration
            )));
        }
        if !(self.years_to_target > 0.0) || !self.years_to_target.is_finite() {
            return Err(ModelError::InvalidAssumptions(format!(
                "years_to_target must be positive, got {}",
                self.years_to_target
            )));
        }
        // ln(1/1) = 0 in the exponent's denominator; below 1 the curve shrinks
        if self.years_to_target <= 1.0 {
            return Err(ModelError::InvalidAssumptions(format!(
                "years_to_target must exceed 1, got {}",
                self.years_to_target
            )));
        }
        if self.year1_customers == 0 {
            return Err(ModelError::InvalidAssumptions(
                "year1_customers must be positive".into(),
            ));
        }
        if self.year1_customers as f64 >= self.target_customers() {
            return Err(ModelError::InvalidAssumptions(format!(
                "year1_customers ({}) must be below tam * target_penetration ({})",
                self.year1_customers,
                self.target_customers()
            )));
        }
        if !(0.0..=1.0).contains(&self.cogs_rate) {
            return Err(ModelError::InvalidAssumptions(format!(
                "cogs_rate must be in [0, 1], got {}",
                self.cogs_rate
            )));
        }
        Ok(())
    }
}

impl Default for RevenueAssumptions {
    fn default() -> Self {
        Self::default_model()
    }
}

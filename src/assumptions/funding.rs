//! Funding rounds and the round-indexed non-personnel OPEX table

use serde::{Deserialize, Serialize};

use super::schedule::{Step, StepTable};

/// Monthly non-personnel spend by category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OpexAllocation {
    pub product_development: f64,
    pub marketing_and_sales: f64,
    pub legal_and_professional: f64,
    pub office_and_equipment: f64,
    pub travel_and_events: f64,
}

impl OpexAllocation {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Split a monthly budget by category shares
    ///
    /// Shares need not sum to 1; whatever is left over is simply unallocated.
    pub fn from_budget_split(monthly_budget: f64, shares: [f64; 5]) -> Self {
        Self {
            product_development: monthly_budget * shares[0],
            marketing_and_sales: monthly_budget * shares[1],
            legal_and_professional: monthly_budget * shares[2],
            office_and_equipment: monthly_budget * shares[3],
            travel_and_events: monthly_budget * shares[4],
        }
    }

    /// Sum of the five categories
    pub fn subtotal(&self) -> f64 {
        self.product_development
            + self.marketing_and_sales
            + self.legal_and_professional
            + self.office_and_equipment
            + self.travel_and_events
    }
}

/// OPEX allocation in force during one funding stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRoundTier {
    pub round_name: String,
    pub allocation: OpexAllocation,
}

/// Funding-stage lookup keyed on absolute start month
pub type FundingTierTable = StepTable<FundingRoundTier>;

/// Monthly budget split across categories once the company reaches Series X
pub const SERIES_X_MONTHLY_BUDGET: f64 = 200_000.0;

/// Series X category shares: product, marketing, legal, office, travel
pub const SERIES_X_BUDGET_SHARES: [f64; 5] = [0.20, 0.25, 0.05, 0.05, 0.05];

/// Default funding-stage OPEX table
///
/// Bootstrap (months 1-2) spends nothing, Pre-Seed (3-26) and Series A
/// (27-50) use fixed amounts, Series X (51+) splits a fixed budget.
pub fn default_funding_tiers() -> FundingTierTable {
    StepTable::new(vec![
        Step {
            threshold: 1,
            value: FundingRoundTier {
                round_name: "Bootstrap".into(),
                allocation: OpexAllocation::zero(),
            },
        },
        Step {
            threshold: 3,
            value: FundingRoundTier {
                round_name: "Pre-Seed".into(),
                allocation: OpexAllocation {
                    product_development: 5_000.0,
                    marketing_and_sales: 8_000.0,
                    legal_and_professional: 2_000.0,
                    office_and_equipment: 1_500.0,
                    travel_and_events: 1_000.0,
                },
            },
        },
        Step {
            threshold: 27,
            value: FundingRoundTier {
                round_name: "Series A".into(),
                allocation: OpexAllocation {
                    product_development: 15_000.0,
                    marketing_and_sales: 30_000.0,
                    legal_and_professional: 5_000.0,
                    office_and_equipment: 4_000.0,
                    travel_and_events: 3_000.0,
                },
            },
        },
        Step {
            threshold: 51,
            value: FundingRoundTier {
                round_name: "Series X".into(),
                allocation: OpexAllocation::from_budget_split(
                    SERIES_X_MONTHLY_BUDGET,
                    SERIES_X_BUDGET_SHARES,
                ),
            },
        },
    ])
}

/// A priced equity raise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRound {
    pub name: String,

    /// Month the cash lands (1-indexed)
    pub month: u32,

    /// Cash raised
    pub amount: f64,

    pub post_money_valuation: f64,

    /// Top the ESOP back up to this fraction after the round closes
    #[serde(default)]
    pub esop_refresh_target: Option<f64>,
}

impl FundingRound {
    /// Projection year the round closes in
    pub fn year(&self) -> u32 {
        month_to_year(self.month)
    }
}

/// Convert a 1-indexed month into its 1-indexed year
pub fn month_to_year(month: u32) -> u32 {
    month.saturating_sub(1) / 12 + 1
}

/// Default round sequence, in chronological order
pub fn default_funding_rounds() -> Vec<FundingRound> {
    vec![
        FundingRound {
            name: "Pre-Seed".into(),
            month: 3,
            amount: 2_000_000.0,
            post_money_valuation: 10_000_000.0,
            esop_refresh_target: None,
        },
        FundingRound {
            name: "Series A".into(),
            month: 27,
            amount: 8_000_000.0,
            post_money_valuation: 40_000_000.0,
            esop_refresh_target: Some(0.10),
        },
        FundingRound {
            name: "Series X".into(),
            month: 51,
            amount: 25_000_000.0,
            post_money_valuation: 125_000_000.0,
            esop_refresh_target: Some(0.10),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_x_split() {
        let a = OpexAllocation::from_budget_split(SERIES_X_MONTHLY_BUDGET, SERIES_X_BUDGET_SHARES);

        assert_eq!(a.product_development, 40_000.0);
        assert_eq!(a.marketing_and_sales, 50_000.0);
        assert_eq!(a.travel_and_events, 10_000.0);
        assert!((a.subtotal() - 120_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_tier_boundaries() {
        let tiers = default_funding_tiers();

        assert_eq!(tiers.lookup(1).unwrap().round_name, "Bootstrap");
        assert_eq!(tiers.lookup(2).unwrap().round_name, "Bootstrap");
        assert_eq!(tiers.lookup(3).unwrap().round_name, "Pre-Seed");
        assert_eq!(tiers.lookup(26).unwrap().round_name, "Pre-Seed");
        assert_eq!(tiers.lookup(27).unwrap().round_name, "Series A");
        assert_eq!(tiers.lookup(50).unwrap().round_name, "Series A");
        assert_eq!(tiers.lookup(51).unwrap().round_name, "Series X");
        assert_eq!(tiers.lookup(240).unwrap().round_name, "Series X");
    }

    #[test]
    fn test_month_to_year() {
        assert_eq!(month_to_year(1), 1);
        assert_eq!(month_to_year(12), 1);
        assert_eq!(month_to_year(13), 2);
        assert_eq!(month_to_year(0), 1);
    }
}

//! Monthly cash roll-forward, burn and runway

use serde::{Deserialize, Serialize};

use crate::assumptions::FundingRound;
use crate::opex::MonthlyOpex;
use crate::revenue::MonthlyRevenue;

/// Runway reported when the company is not burning cash
pub const RUNWAY_SENTINEL: f64 = 999.0;

/// Lump-sum cash injection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingEvent {
    pub month: u32,
    pub amount: f64,
    pub source: String,
}

impl From<&FundingRound> for FundingEvent {
    fn from(round: &FundingRound) -> Self {
        Self {
            month: round.month,
            amount: round.amount,
            source: round.name.clone(),
        }
    }
}

/// Cash position at the end of one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashPosition {
    pub month: u32,
    pub revenue: f64,
    pub opex: f64,
    /// Revenue minus OPEX (negative while burning)
    pub net_burn: f64,
    pub funding: f64,
    pub cash_balance: f64,
    pub months_of_runway: f64,
}

/// Months the balance lasts at the current burn
///
/// Floors at 0 once cash is gone; [`RUNWAY_SENTINEL`] when not burning.
pub fn months_of_runway(cash_balance: f64, net_burn: f64) -> f64 {
    if net_burn < 0.0 {
        (cash_balance / net_burn.abs()).max(0.0)
    } else {
        RUNWAY_SENTINEL
    }
}

/// Roll cash forward month by month
///
/// Produces one row per OPEX month. Revenue for a month with no revenue row
/// is zero; every funding event dated that month lands before the burn.
pub fn project_cash(
    opening_cash: f64,
    revenue: &[MonthlyRevenue],
    opex: &[MonthlyOpex],
    funding: &[FundingEvent],
) -> Vec<CashPosition> {
    let mut rows = Vec::with_capacity(opex.len());
    let mut balance = opening_cash;

    for o in opex {
        let month_revenue = revenue
            .iter()
            .find(|r| r.month == o.month)
            .map_or(0.0, |r| r.total_revenue);
        let month_funding: f64 = funding
            .iter()
            .filter(|f| f.month == o.month)
            .map(|f| f.amount)
            .sum();

        let net_burn = month_revenue - o.total_opex;
        balance += month_funding;
        balance += net_burn;

        rows.push(CashPosition {
            month: o.month,
            revenue: month_revenue,
            opex: o.total_opex,
            net_burn,
            funding: month_funding,
            cash_balance: balance,
            months_of_runway: months_of_runway(balance, net_burn),
        });
    }

    rows
}

/// Burn statistics over a cash projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnSummary {
    /// Mean burn over burning months (positive number)
    pub average_burn: f64,
    /// Largest single-month burn (positive number)
    pub peak_burn: f64,
    pub burning_months: u32,
    /// First month with cash <= 0 (0 = never)
    pub projected_cash_out: u32,
}

/// Summarize burn over months with negative net burn only
pub fn burn_summary(rows: &[CashPosition]) -> BurnSummary {
    let burns: Vec<f64> = rows
        .iter()
        .filter(|r| r.net_burn < 0.0)
        .map(|r| -r.net_burn)
        .collect();

    let average_burn = if burns.is_empty() {
        0.0
    } else {
        burns.iter().sum::<f64>() / burns.len() as f64
    };
    let peak_burn = burns.iter().copied().fold(0.0, f64::max);

    let projected_cash_out = rows
        .iter()
        .find(|r| r.cash_balance <= 0.0)
        .map_or(0, |r| r.month);

    BurnSummary {
        average_burn,
        peak_burn,
        burning_months: burns.len() as u32,
        projected_cash_out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn opex_row(month: u32, total_opex: f64) -> MonthlyOpex {
        MonthlyOpex {
            month,
            year: crate::assumptions::month_to_year(month),
            funding_round: String::new(),
            headcount: 0,
            personnel_cost: total_opex,
            product_development: 0.0,
            marketing_and_sales: 0.0,
            legal_and_professional: 0.0,
            office_and_equipment: 0.0,
            travel_and_events: 0.0,
            operating_subtotal: 0.0,
            total_opex,
            cumulative_opex: 0.0,
        }
    }

    fn revenue_row(month: u32, total_revenue: f64) -> MonthlyRevenue {
        MonthlyRevenue {
            month,
            year: crate::assumptions::month_to_year(month),
            subscription_revenue: total_revenue,
            setup_fees: 0.0,
            total_revenue,
            cogs: 0.0,
            gross_profit: total_revenue,
        }
    }

    #[test]
    fn test_roll_forward() {
        let opex: Vec<_> = (1..=6).map(|m| opex_row(m, 10_000.0)).collect();
        let revenue: Vec<_> = (1..=6).map(|m| revenue_row(m, 2_000.0 * m as f64)).collect();
        let funding = vec![FundingEvent {
            month: 3,
            amount: 50_000.0,
            source: "Pre-Seed".into(),
        }];

        let rows = project_cash(20_000.0, &revenue, &opex, &funding);

        assert_relative_eq!(rows[0].cash_balance, 12_000.0, epsilon = 1e-9);
        for pair in rows.windows(2) {
            let (prev, cur) = (&pair[0], &pair[1]);
            assert_relative_eq!(
                cur.cash_balance,
                prev.cash_balance + cur.funding + cur.net_burn,
                epsilon = 1e-9
            );
        }
        assert_eq!(rows[2].funding, 50_000.0);
    }

    #[test]
    fn test_runway_sentinel() {
        assert_eq!(months_of_runway(100_000.0, 0.0), RUNWAY_SENTINEL);
        assert_eq!(months_of_runway(100_000.0, 5_000.0), RUNWAY_SENTINEL);
        assert_relative_eq!(months_of_runway(100_000.0, -20_000.0), 5.0);
        assert_eq!(months_of_runway(-10_000.0, -20_000.0), 0.0);
    }

    #[test]
    fn test_missing_revenue_is_zero() {
        let opex = vec![opex_row(1, 1_000.0), opex_row(2, 1_000.0)];
        let rows = project_cash(0.0, &[], &opex, &[]);

        assert_eq!(rows[1].revenue, 0.0);
        assert_relative_eq!(rows[1].cash_balance, -2_000.0);
    }

    #[test]
    fn test_burn_summary() {
        let opex: Vec<_> = (1..=4).map(|m| opex_row(m, 10_000.0)).collect();
        let revenue = vec![
            revenue_row(1, 4_000.0),
            revenue_row(2, 8_000.0),
            revenue_row(3, 12_000.0),
            revenue_row(4, 16_000.0),
        ];

        let rows = project_cash(10_000.0, &revenue, &opex, &[]);
        let summary = burn_summary(&rows);

        assert_eq!(summary.burning_months, 2);
        assert_relative_eq!(summary.average_burn, 4_000.0);
        assert_relative_eq!(summary.peak_burn, 6_000.0);
        // 10k - 6k - 2k = 2k, never reaches zero
        assert_eq!(summary.projected_cash_out, 0);
    }

    #[test]
    fn test_cash_out_month() {
        let opex: Vec<_> = (1..=5).map(|m| opex_row(m, 10_000.0)).collect();
        let rows = project_cash(25_000.0, &[], &opex, &[]);

        assert_eq!(burn_summary(&rows).projected_cash_out, 3);
    }

    #[test]
    fn test_no_burn_summary() {
        let summary = burn_summary(&[]);
        assert_eq!(summary.average_burn, 0.0);
        assert_eq!(summary.peak_burn, 0.0);
        assert_eq!(summary.projected_cash_out, 0);
    }
}

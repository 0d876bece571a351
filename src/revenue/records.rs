//! Revenue output records

use serde::{Deserialize, Serialize};

use super::license::LicenseMix;

/// Customer counts and pricing for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerMetrics {
    pub year: u32,
    pub market_penetration: f64,
    pub total_customers: u64,
    pub new_customers: u64,
    pub churned_customers: u64,
    /// Discounted ARR per customer
    pub arr_per_customer: f64,
}

/// A single year of revenue output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyRevenue {
    pub year: u32,
    pub customers: CustomerMetrics,

    /// ARR per customer before discount
    pub list_arr_per_customer: f64,
    /// Discount fraction applied this year
    pub discount: f64,

    pub arr: f64,
    pub setup_fees: f64,
    pub total_revenue: f64,
    pub cogs: f64,
    pub gross_profit: f64,
    pub gross_margin: f64,

    pub license_mix: LicenseMix,
}

/// A single month of revenue, an even 1/12 of its year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: u32,
    pub year: u32,
    pub subscription_revenue: f64,
    pub setup_fees: f64,
    pub total_revenue: f64,
    pub cogs: f64,
    pub gross_profit: f64,
}

/// Spread each year evenly over its 12 months
///
/// Year 0 has no months and is skipped.
pub fn distribute_monthly(years: &[YearlyRevenue]) -> Vec<MonthlyRevenue> {
    let mut months = Vec::with_capacity(years.len() * 12);

    for y in years.iter().filter(|y| y.year > 0) {
        for m in 1..=12 {
            months.push(MonthlyRevenue {
                month: (y.year - 1) * 12 + m,
                year: y.year,
                subscription_revenue: y.arr / 12.0,
                setup_fees: y.setup_fees / 12.0,
                total_revenue: y.total_revenue / 12.0,
                cogs: y.cogs / 12.0,
                gross_profit: y.gross_profit / 12.0,
            });
        }
    }

    months
}

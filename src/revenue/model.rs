//! S-curve customer growth and yearly revenue

use log::debug;

use super::license::license_mix;
use super::records::{distribute_monthly, CustomerMetrics, MonthlyRevenue, YearlyRevenue};
use crate::assumptions::RevenueAssumptions;
use crate::error::{ModelError, ModelResult};

/// Revenue model for one validated assumption set
#[derive(Debug, Clone)]
pub struct RevenueModel {
    assumptions: RevenueAssumptions,
    /// Power-law exponent linking year-1 customers to the target
    exponent: f64,
}

impl RevenueModel {
    /// Validate assumptions and compute the growth exponent once
    pub fn new(assumptions: RevenueAssumptions) -> ModelResult<Self> {
        assumptions.validate()?;

        let ratio = assumptions.year1_customers as f64 / assumptions.target_customers();
        let exponent = ratio.ln() / (1.0 / assumptions.years_to_target).ln();

        if !exponent.is_finite() {
            return Err(ModelError::InvalidAssumptions(format!(
                "growth exponent is not finite ({})",
                exponent
            )));
        }

        debug!(
            "Revenue model: target {} customers in {} years, exponent {:.6}",
            assumptions.target_customers(),
            assumptions.years_to_target,
            exponent
        );

        Ok(Self {
            assumptions,
            exponent,
        })
    }

    pub fn assumptions(&self) -> &RevenueAssumptions {
        &self.assumptions
    }

    pub fn growth_exponent(&self) -> f64 {
        self.exponent
    }

    /// Share of the TAM captured at (possibly fractional) year `year`
    ///
    /// Zero at year 0, capped at the target penetration.
    pub fn market_penetration(&self, year: f64) -> f64 {
        if year <= 0.0 {
            return 0.0;
        }
        let a = &self.assumptions;
        let raw = a.target_penetration * (year / a.years_to_target).powf(self.exponent);
        raw.min(a.target_penetration)
    }

    /// Customer count at the end of a year
    pub fn total_customers(&self, year: u32) -> u64 {
        let customers = self.assumptions.tam as f64 * self.market_penetration(year as f64);
        customers.round() as u64
    }

    /// Undiscounted ARR per customer, escalated from year 1
    pub fn list_arr_per_customer(&self, year: u32) -> f64 {
        let a = &self.assumptions;
        let escalations = year.saturating_sub(1) as i32;
        a.base_arr * (1.0 + a.annual_price_increase).powi(escalations)
    }

    /// ARR per customer after the year's discount
    pub fn arr_per_customer(&self, year: u32) -> f64 {
        self.list_arr_per_customer(year) * (1.0 - self.assumptions.discounts.rate(year))
    }

    /// Customer metrics for `year` given the previous year's record
    ///
    /// Year 0 is pre-launch and has no customers. Year 1 has no churn and its
    /// new customers are `year1_customers`. A later year with no predecessor
    /// treats every customer as new.
    pub fn customer_metrics(&self, year: u32, previous: Option<&CustomerMetrics>) -> CustomerMetrics {
        let total = self.total_customers(year);

        let (new_customers, churned_customers) = match previous {
            _ if year == 0 => (0, 0),
            Some(prev) if year > 1 => {
                let churn_rate = self.assumptions.churn.rate(year);
                let churned = (prev.total_customers as f64 * churn_rate).round() as u64;
                let retained = prev.total_customers.saturating_sub(churned);
                (total.saturating_sub(retained), churned)
            }
            _ if year == 1 => (self.assumptions.year1_customers, 0),
            _ => (total, 0),
        };

        CustomerMetrics {
            year,
            market_penetration: self.market_penetration(year as f64),
            total_customers: total,
            new_customers,
            churned_customers,
            arr_per_customer: self.arr_per_customer(year),
        }
    }

    /// Full revenue record for a year
    pub fn yearly_revenue(&self, year: u32, previous: Option<&CustomerMetrics>) -> YearlyRevenue {
        let customers = self.customer_metrics(year, previous);
        let a = &self.assumptions;

        let arr = customers.total_customers as f64 * customers.arr_per_customer;
        let setup_fees = customers.new_customers as f64 * a.setup_fee;
        let total_revenue = arr + setup_fees;
        let cogs = total_revenue * a.cogs_rate;
        let gross_profit = total_revenue - cogs;
        let gross_margin = if total_revenue > 0.0 {
            gross_profit / total_revenue
        } else {
            0.0
        };

        YearlyRevenue {
            year,
            list_arr_per_customer: self.list_arr_per_customer(year),
            discount: a.discounts.rate(year),
            license_mix: license_mix(customers.total_customers),
            customers,
            arr,
            setup_fees,
            total_revenue,
            cogs,
            gross_profit,
            gross_margin,
        }
    }

    /// Project years 1..=years, chaining each year's customers into the next
    pub fn project(&self, years: u32) -> Vec<YearlyRevenue> {
        let mut rows: Vec<YearlyRevenue> = Vec::with_capacity(years as usize);

        for year in 1..=years {
            let row = self.yearly_revenue(year, rows.last().map(|r| &r.customers));
            rows.push(row);
        }

        rows
    }

    /// Monthly revenue for months 1..=years*12
    pub fn project_monthly(&self, years: u32) -> Vec<MonthlyRevenue> {
        distribute_monthly(&self.project(years))
    }
}

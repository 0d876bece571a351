//! Operating expenses: personnel plus funding-stage allocations

use serde::{Deserialize, Serialize};

use crate::assumptions::{month_to_year, FundingTierTable, OpexAllocation, PersonnelRole};
use crate::personnel::{headcount, monthly_personnel_cost};

/// A single month of OPEX output
///
/// Flat so rows serialize straight to CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyOpex {
    pub month: u32,
    pub year: u32,
    pub funding_round: String,
    pub headcount: u32,
    pub personnel_cost: f64,

    pub product_development: f64,
    pub marketing_and_sales: f64,
    pub legal_and_professional: f64,
    pub office_and_equipment: f64,
    pub travel_and_events: f64,
    pub operating_subtotal: f64,

    pub total_opex: f64,
    pub cumulative_opex: f64,
}

/// OPEX summed over a projection year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualOpex {
    pub year: u32,
    pub personnel_cost: f64,
    pub operating_subtotal: f64,
    pub total_opex: f64,
    /// Headcount in the last month of the year
    pub ending_headcount: u32,
}

/// OPEX model over a hiring plan and a funding-stage table
#[derive(Debug, Clone)]
pub struct OpexModel {
    roles: Vec<PersonnelRole>,
    tiers: FundingTierTable,
}

impl OpexModel {
    pub fn new(roles: Vec<PersonnelRole>, tiers: FundingTierTable) -> Self {
        Self { roles, tiers }
    }

    pub fn roles(&self) -> &[PersonnelRole] {
        &self.roles
    }

    /// Funding stage and category allocation in force for a month
    ///
    /// Month 0 spends nothing; an empty table is treated as all-zero.
    pub fn allocation(&self, month: u32) -> (String, OpexAllocation) {
        if month == 0 {
            return (String::new(), OpexAllocation::zero());
        }
        match self.tiers.lookup(month) {
            Some(tier) => (tier.round_name.clone(), tier.allocation),
            None => (String::new(), OpexAllocation::zero()),
        }
    }

    fn build_row(&self, month: u32, cumulative_before: f64) -> MonthlyOpex {
        let (funding_round, alloc) = self.allocation(month);
        let personnel_cost = monthly_personnel_cost(&self.roles, month);
        let operating_subtotal = alloc.subtotal();
        let total_opex = personnel_cost + operating_subtotal;

        MonthlyOpex {
            month,
            year: month_to_year(month),
            funding_round,
            headcount: headcount(&self.roles, month),
            personnel_cost,
            product_development: alloc.product_development,
            marketing_and_sales: alloc.marketing_and_sales,
            legal_and_professional: alloc.legal_and_professional,
            office_and_equipment: alloc.office_and_equipment,
            travel_and_events: alloc.travel_and_events,
            operating_subtotal,
            total_opex,
            cumulative_opex: cumulative_before + total_opex,
        }
    }

    /// OPEX for a single month, cumulative included
    pub fn monthly_opex(&self, month: u32) -> MonthlyOpex {
        let before = self.cumulative_opex(month.saturating_sub(1));
        self.build_row(month, before)
    }

    /// Total OPEX over months 1..=target_month
    pub fn cumulative_opex(&self, target_month: u32) -> f64 {
        (1..=target_month)
            .map(|m| {
                let (_, alloc) = self.allocation(m);
                monthly_personnel_cost(&self.roles, m) + alloc.subtotal()
            })
            .sum()
    }

    /// Monthly rows for months 1..=months with a running cumulative
    pub fn project(&self, months: u32) -> Vec<MonthlyOpex> {
        let mut rows: Vec<MonthlyOpex> = Vec::with_capacity(months as usize);
        let mut running = 0.0;

        for month in 1..=months {
            let row = self.build_row(month, running);
            running = row.cumulative_opex;
            rows.push(row);
        }

        rows
    }
}

/// Roll monthly rows up into projection years
pub fn annual_opex(rows: &[MonthlyOpex]) -> Vec<AnnualOpex> {
    let mut years: Vec<AnnualOpex> = Vec::new();

    for row in rows {
        match years.last_mut() {
            Some(y) if y.year == row.year => {
                y.personnel_cost += row.personnel_cost;
                y.operating_subtotal += row.operating_subtotal;
                y.total_opex += row.total_opex;
                y.ending_headcount = row.headcount;
            }
            _ => years.push(AnnualOpex {
                year: row.year,
                personnel_cost: row.personnel_cost,
                operating_subtotal: row.operating_subtotal,
                total_opex: row.total_opex,
                ending_headcount: row.headcount,
            }),
        }
    }

    years
}

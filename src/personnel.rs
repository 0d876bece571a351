//! Personnel cost and headcount
//!
//! Two costing paths exist side by side:
//! - the primary path loads base salary with a flat 1.4x overhead multiplier
//! - [`cost_breakdown`] itemizes payroll tax and benefits for display, totalling 1.35x
//!
//! The two are not reconciled. [`CostBreakdown::divergence`] reports the gap,
//! which stays under [`MAX_BREAKDOWN_DIVERGENCE`].

use serde::{Deserialize, Serialize};

use crate::assumptions::PersonnelRole;

/// Flat overhead on base salary (payroll tax, benefits, misc)
pub const OVERHEAD_MULTIPLIER: f64 = 1.4;

/// Employer FICA rate used by the itemized breakdown
pub const FICA_RATE: f64 = 0.0765;

/// Benefits load used by the itemized breakdown
pub const BENEFITS_RATE: f64 = 0.2735;

/// Tolerated relative gap between the flat and itemized totals
pub const MAX_BREAKDOWN_DIVERGENCE: f64 = 0.05;

/// Fully loaded monthly cost of one role (0 when not on payroll)
pub fn role_monthly_cost(role: &PersonnelRole, month: u32) -> f64 {
    if !role.is_active(month) {
        return 0.0;
    }
    role.base_salary * OVERHEAD_MULTIPLIER / 12.0
}

/// Total personnel cost for a month
pub fn monthly_personnel_cost(roles: &[PersonnelRole], month: u32) -> f64 {
    roles.iter().map(|r| role_monthly_cost(r, month)).sum()
}

/// Personnel cost summed over months 1..=target_month
pub fn cumulative_personnel_cost(roles: &[PersonnelRole], target_month: u32) -> f64 {
    (1..=target_month)
        .map(|m| monthly_personnel_cost(roles, m))
        .sum()
}

/// Number of roles on payroll in a month
pub fn headcount(roles: &[PersonnelRole], month: u32) -> u32 {
    roles.iter().filter(|r| r.is_active(month)).count() as u32
}

/// Itemized monthly cost of one role, for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub role_name: String,
    pub month: u32,
    pub monthly_salary: f64,
    pub payroll_tax: f64,
    pub benefits: f64,
    /// Itemized total (salary + tax + benefits)
    pub total: f64,
    /// Primary-path total with the flat multiplier
    pub flat_total: f64,
}

impl CostBreakdown {
    /// Relative gap between the flat and itemized totals
    pub fn divergence(&self) -> f64 {
        if self.flat_total == 0.0 {
            0.0
        } else {
            (self.flat_total - self.total).abs() / self.flat_total
        }
    }

    pub fn within_tolerance(&self) -> bool {
        self.divergence() <= MAX_BREAKDOWN_DIVERGENCE
    }
}

/// Itemize one role's cost for a month
pub fn cost_breakdown(role: &PersonnelRole, month: u32) -> CostBreakdown {
    let monthly_salary = if role.is_active(month) {
        role.base_salary / 12.0
    } else {
        0.0
    };
    let payroll_tax = monthly_salary * FICA_RATE;
    let benefits = monthly_salary * BENEFITS_RATE;

    CostBreakdown {
        role_name: role.role_name.clone(),
        month,
        monthly_salary,
        payroll_tax,
        benefits,
        total: monthly_salary + payroll_tax + benefits,
        flat_total: role_monthly_cost(role, month),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::default_roles;
    use approx::assert_relative_eq;

    #[test]
    fn test_role_cost_in_window() {
        let role = PersonnelRole::new("CTO", 120_000.0, 3);

        assert_eq!(role_monthly_cost(&role, 2), 0.0);
        assert_relative_eq!(role_monthly_cost(&role, 3), 14_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_month_zero_and_empty() {
        let roles = default_roles();

        assert_eq!(monthly_personnel_cost(&roles, 0), 0.0);
        assert_eq!(headcount(&roles, 0), 0);
        assert_eq!(monthly_personnel_cost(&[], 12), 0.0);
        assert_eq!(headcount(&[], 12), 0);
        assert_eq!(cumulative_personnel_cost(&roles, 0), 0.0);
    }

    #[test]
    fn test_default_month_12_cost() {
        // CTO $160k + Sr Dev $140k (m3) + CEO $160k (m6), x1.4 / 12
        let roles = default_roles();
        let cost = monthly_personnel_cost(&roles, 12);

        assert_relative_eq!(cost, 460_000.0 * 1.4 / 12.0, epsilon = 1e-6);
        assert!((cost - 53_667.0).abs() < 1.0);
        assert_eq!(headcount(&roles, 12), 3);
    }

    #[test]
    fn test_cumulative_cost() {
        let roles = vec![PersonnelRole::new("Dev", 120_000.0, 3)];

        // Months 3..=6 at $14k
        assert_relative_eq!(cumulative_personnel_cost(&roles, 6), 56_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_end_month_drops_cost() {
        let roles = vec![
            PersonnelRole::new("Contractor", 60_000.0, 1).ending(3),
            PersonnelRole::new("Dev", 120_000.0, 1),
        ];

        assert_eq!(headcount(&roles, 3), 2);
        assert_eq!(headcount(&roles, 4), 1);
        assert_relative_eq!(monthly_personnel_cost(&roles, 4), 14_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_default_headcount_monotonic() {
        let roles = default_roles();
        for m in 2..=120 {
            assert!(headcount(&roles, m) >= headcount(&roles, m - 1), "headcount fell at month {}", m);
        }
    }

    #[test]
    fn test_breakdown_diverges_within_tolerance() {
        let role = PersonnelRole::new("CEO", 160_000.0, 1);
        let b = cost_breakdown(&role, 1);

        assert_relative_eq!(b.total, 160_000.0 / 12.0 * 1.35, epsilon = 1e-6);
        assert_relative_eq!(b.flat_total, 160_000.0 / 12.0 * 1.40, epsilon = 1e-6);
        assert!(b.divergence() > 0.0);
        assert!(b.within_tolerance());
    }

    #[test]
    fn test_breakdown_inactive_role() {
        let role = PersonnelRole::new("CEO", 160_000.0, 6);
        let b = cost_breakdown(&role, 5);

        assert_eq!(b.total, 0.0);
        assert_eq!(b.divergence(), 0.0);
    }
}

//! Personnel roles and the default hiring plan

use serde::{Deserialize, Serialize};

/// A single salaried role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonnelRole {
    pub role_name: String,

    /// Annual base salary
    pub base_salary: f64,

    /// First month on payroll (1-indexed)
    pub start_month: u32,

    /// Last month on payroll, inclusive (None = open-ended)
    #[serde(default)]
    pub end_month: Option<u32>,
}

impl PersonnelRole {
    pub fn new(role_name: impl Into<String>, base_salary: f64, start_month: u32) -> Self {
        Self {
            role_name: role_name.into(),
            base_salary,
            start_month,
            end_month: None,
        }
    }

    /// Builder-style end month
    pub fn ending(mut self, end_month: u32) -> Self {
        self.end_month = Some(end_month);
        self
    }

    /// Whether the role is on payroll in the given month
    pub fn is_active(&self, month: u32) -> bool {
        month >= 1
            && month >= self.start_month
            && self.end_month.map_or(true, |end| month <= end)
    }
}

/// Default hiring plan
///
/// Returns a fresh Vec on every call. No role ends, so headcount never
/// decreases month over month.
pub fn default_roles() -> Vec<PersonnelRole> {
    vec![
        PersonnelRole::new("CTO", 160_000.0, 3),
        PersonnelRole::new("Senior Developer", 140_000.0, 3),
        PersonnelRole::new("CEO", 160_000.0, 6),
        PersonnelRole::new("Head of Sales", 130_000.0, 15),
        PersonnelRole::new("Developer", 120_000.0, 18),
        PersonnelRole::new("Customer Success Manager", 85_000.0, 24),
        PersonnelRole::new("Marketing Manager", 110_000.0, 27),
        PersonnelRole::new("Developer", 120_000.0, 30),
        PersonnelRole::new("Account Executive", 100_000.0, 33),
        PersonnelRole::new("Product Manager", 135_000.0, 36),
        PersonnelRole::new("Account Executive", 100_000.0, 42),
        PersonnelRole::new("Senior Developer", 140_000.0, 48),
        PersonnelRole::new("CFO", 180_000.0, 54),
        PersonnelRole::new("Customer Success Manager", 85_000.0, 60),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_window() {
        let role = PersonnelRole::new("Contractor", 90_000.0, 4).ending(6);

        assert!(!role.is_active(0));
        assert!(!role.is_active(3));
        assert!(role.is_active(4));
        assert!(role.is_active(6));
        assert!(!role.is_active(7));
    }

    #[test]
    fn test_open_ended_role() {
        let role = PersonnelRole::new("CEO", 160_000.0, 6);
        assert!(role.is_active(600));
    }

    #[test]
    fn test_default_roles_fresh_each_call() {
        let mut a = default_roles();
        a[0].base_salary = 1.0;
        assert_eq!(default_roles()[0].base_salary, 160_000.0);
    }
}

//! License-tier mix of the customer base

use serde::{Deserialize, Serialize};

/// Share of customers on single-user licenses
pub const SINGLE_USER_SHARE: f64 = 0.899;
/// Share of customers on team licenses
pub const TEAM_SHARE: f64 = 0.090;
/// Share of customers on enterprise licenses
pub const ENTERPRISE_SHARE: f64 = 0.011;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseMix {
    pub single_user: u64,
    pub team: u64,
    pub enterprise: u64,
}

impl LicenseMix {
    pub fn total(&self) -> u64 {
        self.single_user + self.team + self.enterprise
    }
}

/// Split a customer count across license tiers
///
/// Team and enterprise are rounded; single-user (the largest tier) takes the
/// residual so the tiers always sum to `total_customers`.
pub fn license_mix(total_customers: u64) -> LicenseMix {
    let total = total_customers as f64;
    let team = (total * TEAM_SHARE).round() as u64;
    let enterprise = (total * ENTERPRISE_SHARE).round() as u64;
    let single_user = total_customers.saturating_sub(team + enterprise);

    LicenseMix {
        single_user,
        team,
        enterprise,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_sums_to_total() {
        for total in [0, 1, 7, 10, 631, 1_500, 12_345] {
            assert_eq!(license_mix(total).total(), total);
        }
    }

    #[test]
    fn test_mix_ratio() {
        let mix = license_mix(1_000);

        assert_eq!(mix.team, 90);
        assert_eq!(mix.enterprise, 11);
        assert_eq!(mix.single_user, 899);
    }

    #[test]
    fn test_small_counts_go_to_single_user() {
        let mix = license_mix(3);

        assert_eq!(mix.team, 0);
        assert_eq!(mix.enterprise, 0);
        assert_eq!(mix.single_user, 3);
    }
}

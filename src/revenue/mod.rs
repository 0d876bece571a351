//! Customer growth and revenue projection

mod license;
mod model;
mod records;

pub use license::{license_mix, LicenseMix, ENTERPRISE_SHARE, SINGLE_USER_SHARE, TEAM_SHARE};
pub use model::RevenueModel;
pub use records::{distribute_monthly, CustomerMetrics, MonthlyRevenue, YearlyRevenue};

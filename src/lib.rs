//! Startup Model - Financial projection engine for a B2B SaaS startup
//!
//! This library provides:
//! - Customer growth and revenue projection (power-law adoption curve)
//! - Personnel and operating expense modeling by funding stage
//! - Monthly cash flow, burn and runway tracking
//! - Income statement, cash flow statement and balance sheet
//! - Cap table dilution, ESOP refreshes and exit returns
//! - Parallel scenario runs over alternative configurations

pub mod error;
pub mod assumptions;
pub mod revenue;
pub mod personnel;
pub mod opex;
pub mod cash;
pub mod financials;
pub mod equity;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{ModelError, ModelResult};
pub use assumptions::{Assumptions, FundingRound, PersonnelRole, RevenueAssumptions};
pub use revenue::{RevenueModel, YearlyRevenue};
pub use opex::{MonthlyOpex, OpexModel};
pub use equity::{CapTable, CapTableHistory};
pub use projection::{ProjectionConfig, ProjectionEngine, ProjectionReport, ProjectionSummary};
pub use scenario::ScenarioRunner;

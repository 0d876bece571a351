//! Full-model projection: revenue, OPEX, cash, statements and equity in one run

mod engine;
mod report;

pub use engine::{ProjectionConfig, ProjectionEngine, DEFAULT_PROJECTION_YEARS};
pub use report::{ExitAnalysis, MonthlyRow, ProjectionReport, ProjectionSummary};

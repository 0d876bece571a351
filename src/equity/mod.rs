//! Equity: cap table through funding rounds, ESOP refresh, exit returns
//!
//! Dilution is strictly proportional. There are no share classes,
//! liquidation preferences or anti-dilution ratchets.

mod cap_table;
mod exit;

pub use cap_table::{
    calculate_esop_refresh, calculate_funding_round_dilution, generate_cap_table,
    generate_cap_table_with_shares, initialize_cap_table, CapTable, CapTableEntry,
    CapTableHistory, CapTableSnapshot, DilutionResult, EsopRefreshResult, RoundTerms,
    StakeholderType, OWNERSHIP_EPSILON,
};
pub use exit::{
    calculate_exit_returns, calculate_exit_valuation, exit_distribution, round_returns,
    ExitPayout, ExitReturns, RoundReturns,
};
pub use crate::assumptions::ExitMethod;

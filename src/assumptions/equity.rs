//! Founder, ESOP and exit assumptions

use serde::{Deserialize, Serialize};

/// Authorized shares at incorporation
pub const DEFAULT_AUTHORIZED_SHARES: u64 = 10_000_000;

/// A founder and their stated (pre-ESOP) ownership
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Founder {
    pub name: String,
    pub ownership: f64,
}

impl Founder {
    pub fn new(name: impl Into<String>, ownership: f64) -> Self {
        Self {
            name: name.into(),
            ownership,
        }
    }
}

/// Valuation basis for an exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitMethod {
    /// ARR x multiple
    Arr,
    /// EBITDA x multiple
    Ebitda,
    /// Mean of the two
    Average,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityAssumptions {
    pub founders: Vec<Founder>,

    /// ESOP carved out of founder equity at incorporation
    pub esop_pool_size: f64,

    pub authorized_shares: u64,
}

impl Default for EquityAssumptions {
    fn default() -> Self {
        Self {
            founders: vec![Founder::new("Founder", 1.0)],
            esop_pool_size: 0.10,
            authorized_shares: DEFAULT_AUTHORIZED_SHARES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitAssumptions {
    /// Projection year of the exit
    pub exit_year: u32,
    pub arr_multiple: f64,
    pub ebitda_multiple: f64,
    pub method: ExitMethod,
}

impl Default for ExitAssumptions {
    fn default() -> Self {
        Self {
            exit_year: 7,
            arr_multiple: 8.0,
            ebitda_multiple: 15.0,
            method: ExitMethod::Arr,
        }
    }
}

//! Exit valuation and investor returns

use serde::{Deserialize, Serialize};

use super::cap_table::{CapTable, StakeholderType};
use crate::assumptions::{ExitMethod, FundingRound};
use crate::error::{ModelError, ModelResult};

/// Company value at exit from ARR and/or EBITDA multiples
pub fn calculate_exit_valuation(
    arr: f64,
    ebitda: f64,
    arr_multiple: f64,
    ebitda_multiple: f64,
    method: ExitMethod,
) -> f64 {
    let arr_valuation = arr * arr_multiple;
    let ebitda_valuation = ebitda * ebitda_multiple;

    match method {
        ExitMethod::Arr => arr_valuation,
        ExitMethod::Ebitda => ebitda_valuation,
        ExitMethod::Average => (arr_valuation + ebitda_valuation) / 2.0,
    }
}

/// Return on one equity position at exit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitReturns {
    pub exit_year: u32,
    pub investment_year: u32,
    pub years_held: u32,
    pub exit_valuation: f64,
    pub ownership: f64,
    pub investment: f64,
    pub equity_value: f64,
    /// Multiple on invested capital
    pub roi: f64,
    pub roi_percent: f64,
    /// Annualized return in percent (0 when held less than a year)
    pub cagr: f64,
}

/// Compute ROI and CAGR for a position
///
/// A zero or negative investment is an error. An exit in or before the
/// investment year has no annualized return and reports a CAGR of 0.
pub fn calculate_exit_returns(
    exit_year: u32,
    exit_valuation: f64,
    investment: f64,
    ownership: f64,
    investment_year: u32,
) -> ModelResult<ExitReturns> {
    if !(investment > 0.0) {
        return Err(ModelError::DegenerateReturns(format!(
            "investment must be positive, got {}",
            investment
        )));
    }

    let equity_value = exit_valuation * ownership;
    let roi = equity_value / investment;
    let roi_percent = (roi - 1.0) * 100.0;

    let years_held = exit_year.saturating_sub(investment_year);
    let cagr = if years_held == 0 {
        0.0
    } else if roi <= 0.0 {
        // Total loss; a fractional power of a negative multiple is undefined
        -100.0
    } else {
        (roi.powf(1.0 / years_held as f64) - 1.0) * 100.0
    };

    Ok(ExitReturns {
        exit_year,
        investment_year,
        years_held,
        exit_valuation,
        ownership,
        investment,
        equity_value,
        roi,
        roi_percent,
        cagr,
    })
}

/// Exit proceeds for one cap table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitPayout {
    pub stakeholder: String,
    pub stakeholder_type: StakeholderType,
    pub ownership: f64,
    pub proceeds: f64,
}

/// Split exit proceeds pro rata (common-only, no preferences)
pub fn exit_distribution(cap_table: &CapTable, exit_valuation: f64) -> Vec<ExitPayout> {
    cap_table
        .entries
        .iter()
        .map(|e| ExitPayout {
            stakeholder: e.stakeholder.clone(),
            stakeholder_type: e.stakeholder_type,
            ownership: e.ownership,
            proceeds: exit_valuation * e.ownership,
        })
        .collect()
}

/// Returns for one funding round's investors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReturns {
    pub round_name: String,
    pub returns: ExitReturns,
}

/// Exit returns for every round whose investors appear in `cap_table`
///
/// Rounds that raised nothing are skipped.
pub fn round_returns(
    cap_table: &CapTable,
    rounds: &[FundingRound],
    exit_year: u32,
    exit_valuation: f64,
) -> ModelResult<Vec<RoundReturns>> {
    let mut out = Vec::with_capacity(rounds.len());

    for round in rounds.iter().filter(|r| r.amount > 0.0) {
        let Some(entry) = cap_table.investor_for_round(&round.name) else {
            continue;
        };
        let returns = calculate_exit_returns(
            exit_year,
            exit_valuation,
            round.amount,
            entry.ownership,
            round.year(),
        )?;
        out.push(RoundReturns {
            round_name: round.name.clone(),
            returns,
        });
    }

    Ok(out)
}

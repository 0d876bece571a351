//! Cap table construction and dilution through funding rounds

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::assumptions::{Founder, FundingRound, DEFAULT_AUTHORIZED_SHARES};
use crate::error::{ModelError, ModelResult};

/// Tolerance for the ownership-sums-to-one invariant
pub const OWNERSHIP_EPSILON: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeholderType {
    Founder,
    #[serde(rename = "ESOP")]
    Esop,
    #[serde(rename = "ESOP Refresh")]
    EsopRefresh,
    Investor,
}

impl StakeholderType {
    /// Whether the holding belongs to the employee option pool
    pub fn is_pool(&self) -> bool {
        matches!(self, StakeholderType::Esop | StakeholderType::EsopRefresh)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapTableEntry {
    pub stakeholder: String,
    #[serde(rename = "type")]
    pub stakeholder_type: StakeholderType,
    pub shares: u64,
    /// Fully diluted ownership fraction
    pub ownership: f64,
    #[serde(default)]
    pub round_name: Option<String>,
}

/// Ownership snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapTable {
    pub entries: Vec<CapTableEntry>,
}

impl CapTable {
    pub fn total_shares(&self) -> u64 {
        self.entries.iter().map(|e| e.shares).sum()
    }

    pub fn total_ownership(&self) -> f64 {
        self.entries.iter().map(|e| e.ownership).sum()
    }

    /// Whether ownership sums to 1 within [`OWNERSHIP_EPSILON`]
    pub fn is_closed(&self) -> bool {
        (self.total_ownership() - 1.0).abs() <= OWNERSHIP_EPSILON
    }

    /// Combined ownership of the option pool (original + refreshes)
    pub fn esop_ownership(&self) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.stakeholder_type.is_pool())
            .map(|e| e.ownership)
            .sum()
    }

    pub fn ownership_of(&self, stakeholder: &str) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.stakeholder == stakeholder)
            .map(|e| e.ownership)
            .sum()
    }

    /// Investor entry created by a given round
    pub fn investor_for_round(&self, round_name: &str) -> Option<&CapTableEntry> {
        self.entries.iter().find(|e| {
            e.stakeholder_type == StakeholderType::Investor
                && e.round_name.as_deref() == Some(round_name)
        })
    }

    /// Multiply every holder's ownership by `factor`
    fn dilute(&mut self, factor: f64) {
        for entry in &mut self.entries {
            entry.ownership *= factor;
        }
    }
}

/// Build the founding cap table
///
/// The ESOP is carved out of founder equity: each founder's stated share is
/// scaled by `1 - esop_pool_size`. Stated shares that do not sum to 1 are
/// normalized first.
pub fn initialize_cap_table(
    founders: &[Founder],
    esop_pool_size: f64,
    authorized_shares: u64,
) -> ModelResult<CapTable> {
    if founders.is_empty() {
        return Err(ModelError::InvalidAssumptions("at least one founder is required".into()));
    }
    if !(0.0..1.0).contains(&esop_pool_size) {
        return Err(ModelError::InvalidAssumptions(format!(
            "esop_pool_size must be in [0, 1), got {}",
            esop_pool_size
        )));
    }
    if let Some(f) = founders.iter().find(|f| !f.ownership.is_finite()) {
        return Err(ModelError::InvalidAssumptions(format!(
            "founder {} has non-finite ownership {}",
            f.name, f.ownership
        )));
    }
    if founders.iter().any(|f| f.ownership < 0.0) {
        return Err(ModelError::InvalidAssumptions("founder ownership cannot be negative".into()));
    }

    let stated_total: f64 = founders.iter().map(|f| f.ownership).sum();
    if !stated_total.is_finite() {
        return Err(ModelError::InvalidAssumptions(format!(
            "founder ownership sums to {}",
            stated_total
        )));
    }
    if stated_total <= 0.0 {
        return Err(ModelError::InvalidAssumptions("founder ownership sums to zero".into()));
    }
    if (stated_total - 1.0).abs() > OWNERSHIP_EPSILON {
        warn!(
            "Founder ownership sums to {:.6}; normalizing to 1.0 before ESOP carve-out",
            stated_total
        );
    }

    let founder_share = 1.0 - esop_pool_size;
    let authorized = authorized_shares as f64;

    let mut entries: Vec<CapTableEntry> = founders
        .iter()
        .map(|f| {
            let ownership = f.ownership / stated_total * founder_share;
            CapTableEntry {
                stakeholder: f.name.clone(),
                stakeholder_type: StakeholderType::Founder,
                shares: (authorized * ownership).round() as u64,
                ownership,
                round_name: None,
            }
        })
        .collect();

    entries.push(CapTableEntry {
        stakeholder: "ESOP Pool".into(),
        stakeholder_type: StakeholderType::Esop,
        shares: (authorized * esop_pool_size).round() as u64,
        ownership: esop_pool_size,
        round_name: None,
    });

    Ok(CapTable { entries })
}

/// Economics of one priced round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTerms {
    pub round_name: String,
    pub amount: f64,
    pub pre_money_valuation: f64,
    pub post_money_valuation: f64,
    pub new_investor_ownership: f64,
    pub dilution_factor: f64,
    pub price_per_share: f64,
    pub shares_before: u64,
    pub shares_issued: u64,
    pub total_shares_after: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DilutionResult {
    pub terms: RoundTerms,
    pub cap_table: CapTable,
}

/// Apply a priced round: new investors take `amount / post_money`, everyone
/// else is diluted proportionally
pub fn calculate_funding_round_dilution(
    cap_table: &CapTable,
    round_name: &str,
    amount: f64,
    post_money_valuation: f64,
) -> ModelResult<DilutionResult> {
    if !(post_money_valuation > 0.0) || !post_money_valuation.is_finite() {
        return Err(ModelError::DegenerateDilution(format!(
            "{}: post-money valuation must be positive, got {}",
            round_name, post_money_valuation
        )));
    }
    if !(amount >= 0.0) {
        return Err(ModelError::DegenerateDilution(format!(
            "{}: amount cannot be negative, got {}",
            round_name, amount
        )));
    }
    if amount >= post_money_valuation {
        return Err(ModelError::DegenerateDilution(format!(
            "{}: amount {} would take 100% of a {} post-money",
            round_name, amount, post_money_valuation
        )));
    }

    let shares_before = cap_table.total_shares();
    if shares_before == 0 {
        return Err(ModelError::DegenerateDilution(format!(
            "{}: cap table has no shares outstanding",
            round_name
        )));
    }

    let new_investor_ownership = amount / post_money_valuation;
    let dilution_factor = 1.0 - new_investor_ownership;
    let total_shares_after = shares_before as f64 / dilution_factor;
    let price_per_share = post_money_valuation / total_shares_after;
    let shares_issued = (total_shares_after - shares_before as f64).round() as u64;

    let mut next = cap_table.clone();
    next.dilute(dilution_factor);
    next.entries.push(CapTableEntry {
        stakeholder: format!("{} Investors", round_name),
        stakeholder_type: StakeholderType::Investor,
        shares: shares_issued,
        ownership: new_investor_ownership,
        round_name: Some(round_name.to_string()),
    });

    debug!(
        "{}: {:.2}% to investors at ${:.4}/share, {} shares issued",
        round_name,
        new_investor_ownership * 100.0,
        price_per_share,
        shares_issued
    );

    Ok(DilutionResult {
        terms: RoundTerms {
            round_name: round_name.to_string(),
            amount,
            pre_money_valuation: post_money_valuation - amount,
            post_money_valuation,
            new_investor_ownership,
            dilution_factor,
            price_per_share,
            shares_before,
            shares_issued,
            total_shares_after,
        },
        cap_table: next,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsopRefreshResult {
    pub esop_before: f64,
    pub esop_after: f64,
    /// Ownership granted to the new refresh entry
    pub refresh_ownership: f64,
    pub refresh_shares: u64,
    pub cap_table: CapTable,
}

/// Top the option pool back up to `target_pool_size`
///
/// A no-op when the pool already meets the target. Otherwise a new
/// `ESOP Refresh` entry of ownership `(target - current) / (1 - current)` is
/// issued, diluting every holder (the existing pool included) so that the
/// combined pool lands exactly on the target.
pub fn calculate_esop_refresh(
    cap_table: &CapTable,
    target_pool_size: f64,
    round_name: Option<&str>,
) -> ModelResult<EsopRefreshResult> {
    if !(0.0..1.0).contains(&target_pool_size) {
        return Err(ModelError::InvalidAssumptions(format!(
            "ESOP target must be in [0, 1), got {}",
            target_pool_size
        )));
    }

    let esop_before = cap_table.esop_ownership();
    if esop_before >= target_pool_size {
        return Ok(EsopRefreshResult {
            esop_before,
            esop_after: esop_before,
            refresh_ownership: 0.0,
            refresh_shares: 0,
            cap_table: cap_table.clone(),
        });
    }

    let shares_before = cap_table.total_shares();
    let refresh_ownership = (target_pool_size - esop_before) / (1.0 - esop_before);
    let factor = 1.0 - refresh_ownership;
    let refresh_shares = (shares_before as f64 / factor - shares_before as f64).round() as u64;

    let mut next = cap_table.clone();
    next.dilute(factor);
    next.entries.push(CapTableEntry {
        stakeholder: "ESOP Refresh".into(),
        stakeholder_type: StakeholderType::EsopRefresh,
        shares: refresh_shares,
        ownership: refresh_ownership,
        round_name: round_name.map(str::to_string),
    });

    Ok(EsopRefreshResult {
        esop_before,
        esop_after: next.esop_ownership(),
        refresh_ownership,
        refresh_shares,
        cap_table: next,
    })
}

/// Cap table at one point in the round sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapTableSnapshot {
    pub stage: String,
    pub cap_table: CapTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapTableHistory {
    /// Founding table first, then one snapshot per round and per refresh
    pub snapshots: Vec<CapTableSnapshot>,
    pub rounds: Vec<RoundTerms>,
}

impl CapTableHistory {
    /// Cap table after the last round
    pub fn final_table(&self) -> Option<&CapTable> {
        self.snapshots.last().map(|s| &s.cap_table)
    }
}

/// Fold rounds over the founding table with the default authorized shares
pub fn generate_cap_table(
    founders: &[Founder],
    esop_pool_size: f64,
    rounds: &[FundingRound],
) -> ModelResult<CapTableHistory> {
    generate_cap_table_with_shares(founders, esop_pool_size, DEFAULT_AUTHORIZED_SHARES, rounds)
}

/// Fold rounds over the founding table
///
/// Rounds apply strictly in slice order, which must be chronological. Each
/// round's dilution is followed by its ESOP refresh, if any.
pub fn generate_cap_table_with_shares(
    founders: &[Founder],
    esop_pool_size: f64,
    authorized_shares: u64,
    rounds: &[FundingRound],
) -> ModelResult<CapTableHistory> {
    let mut table = initialize_cap_table(founders, esop_pool_size, authorized_shares)?;
    let mut history = CapTableHistory {
        snapshots: vec![CapTableSnapshot {
            stage: "Founding".into(),
            cap_table: table.clone(),
        }],
        rounds: Vec::with_capacity(rounds.len()),
    };

    for round in rounds {
        let diluted = calculate_funding_round_dilution(
            &table,
            &round.name,
            round.amount,
            round.post_money_valuation,
        )?;
        table = diluted.cap_table;
        history.rounds.push(diluted.terms);
        history.snapshots.push(CapTableSnapshot {
            stage: round.name.clone(),
            cap_table: table.clone(),
        });

        if let Some(target) = round.esop_refresh_target {
            let refresh = calculate_esop_refresh(&table, target, Some(&round.name))?;
            if refresh.refresh_ownership > 0.0 {
                table = refresh.cap_table;
                history.snapshots.push(CapTableSnapshot {
                    stage: format!("{} ESOP Refresh", round.name),
                    cap_table: table.clone(),
                });
            }
        }
    }

    Ok(history)
}

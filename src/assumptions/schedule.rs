//! Step-function schedules over time
//!
//! Two flavours cover every time-varying input in the model:
//! - [`YearSchedule`]: one value per year, last value repeats (discounts, churn)
//! - [`StepTable`]: sorted thresholds, "last entry whose threshold <= target" (funding tiers)

use serde::{Deserialize, Serialize};

/// Rate schedule indexed by year (1-indexed), last value repeating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSchedule {
    rates: Vec<f64>,
}

impl YearSchedule {
    pub fn new(rates: Vec<f64>) -> Self {
        Self { rates }
    }

    /// Single rate applied to every year
    pub fn flat(rate: f64) -> Self {
        Self { rates: vec![rate] }
    }

    /// Get rate for a given year
    ///
    /// Year 0 resolves to the first entry, years past the end to the last one,
    /// and an empty schedule to 0.
    pub fn rate(&self, year: u32) -> f64 {
        let idx = (year as usize).saturating_sub(1);
        self.rates
            .get(idx)
            .or_else(|| self.rates.last())
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }
}

/// One row of a [`StepTable`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step<T> {
    /// First period (month or year) this value applies to
    pub threshold: u32,
    pub value: T,
}

/// Ordered threshold table with step lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepTable<T> {
    steps: Vec<Step<T>>,
}

impl<T> StepTable<T> {
    /// Build from unordered steps; sorted by threshold on construction
    pub fn new(mut steps: Vec<Step<T>>) -> Self {
        steps.sort_by_key(|s| s.threshold);
        Self { steps }
    }

    /// Find the last step whose threshold <= `at`
    ///
    /// Periods before the first threshold fall back to the first step.
    pub fn lookup(&self, at: u32) -> Option<&T> {
        self.steps
            .iter()
            .rev()
            .find(|s| s.threshold <= at)
            .or_else(|| self.steps.first())
            .map(|s| &s.value)
    }

    pub fn steps(&self) -> &[Step<T>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_schedule_repeats_last() {
        let s = YearSchedule::new(vec![0.4, 0.3, 0.2]);

        assert_eq!(s.rate(0), 0.4);
        assert_eq!(s.rate(1), 0.4);
        assert_eq!(s.rate(3), 0.2);
        assert_eq!(s.rate(4), 0.2);
        assert_eq!(s.rate(50), 0.2);
    }

    #[test]
    fn test_empty_schedule_is_zero() {
        let s = YearSchedule::new(Vec::new());
        assert_eq!(s.rate(1), 0.0);
        assert!(s.is_empty());
    }

    #[test]
    fn test_step_table_lookup() {
        let table = StepTable::new(vec![
            Step { threshold: 27, value: "A" },
            Step { threshold: 1, value: "boot" },
            Step { threshold: 3, value: "seed" },
        ]);

        assert_eq!(table.lookup(0), Some(&"boot"));
        assert_eq!(table.lookup(2), Some(&"boot"));
        assert_eq!(table.lookup(3), Some(&"seed"));
        assert_eq!(table.lookup(26), Some(&"seed"));
        assert_eq!(table.lookup(27), Some(&"A"));
        assert_eq!(table.lookup(500), Some(&"A"));
    }

    #[test]
    fn test_empty_step_table() {
        let table: StepTable<f64> = StepTable::new(Vec::new());
        assert!(table.lookup(5).is_none());
    }
}

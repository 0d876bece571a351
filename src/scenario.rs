//! Scenario runner for batch projections
//!
//! Loads assumptions once, then runs many projections with different
//! configurations or assumption variants without re-reading CSV files.

use std::path::Path;

use rayon::prelude::*;

use crate::error::ModelResult;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionReport};
use crate::Assumptions;

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// for cash in [0.0, 250_000.0, 500_000.0] {
///     let config = ProjectionConfig { opening_cash: cash, ..Default::default() };
///     let report = runner.run(config)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_assumptions: Assumptions,
}

impl ScenarioRunner {
    /// Create runner with default in-memory assumptions
    pub fn new() -> Self {
        Self {
            base_assumptions: Assumptions::default_model(),
        }
    }

    /// Create runner by loading assumptions from CSV files
    pub fn from_csv() -> ModelResult<Self> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv()?,
        })
    }

    /// Create runner from a specific assumptions directory
    pub fn from_csv_path(path: &Path) -> ModelResult<Self> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv_path(path)?,
        })
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            base_assumptions: assumptions,
        }
    }

    /// Run a single projection with the given config
    pub fn run(&self, config: ProjectionConfig) -> ModelResult<ProjectionReport> {
        ProjectionEngine::new(self.base_assumptions.clone(), config).run()
    }

    /// Run one projection per config, in parallel
    ///
    /// Results come back in config order.
    pub fn run_scenarios(&self, configs: &[ProjectionConfig]) -> Vec<ModelResult<ProjectionReport>> {
        configs
            .par_iter()
            .map(|config| self.run(config.clone()))
            .collect()
    }

    /// Run each assumption variant under the same config, in parallel
    pub fn run_variants(
        &self,
        variants: &[Assumptions],
        config: &ProjectionConfig,
    ) -> Vec<ModelResult<ProjectionReport>> {
        variants
            .par_iter()
            .map(|a| ProjectionEngine::new(a.clone(), config.clone()).run())
            .collect()
    }

    /// Get reference to base assumptions for inspection
    pub fn assumptions(&self) -> &Assumptions {
        &self.base_assumptions
    }

    /// Get mutable reference to base assumptions for customization
    pub fn assumptions_mut(&mut self) -> &mut Assumptions {
        &mut self.base_assumptions
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use approx::assert_relative_eq;

    #[test]
    fn test_opening_cash_scenarios() {
        let runner = ScenarioRunner::new();

        let configs: Vec<_> = [0.0, 250_000.0, 500_000.0]
            .iter()
            .map(|&cash| ProjectionConfig {
                projection_years: 5,
                opening_cash: cash,
                ..Default::default()
            })
            .collect();

        let results: Vec<_> = runner
            .run_scenarios(&configs)
            .into_iter()
            .collect::<ModelResult<_>>()
            .unwrap();
        assert_eq!(results.len(), 3);

        // Opening cash carries straight through to the end
        let base = results[0].summary().ending_cash;
        assert_relative_eq!(results[1].summary().ending_cash, base + 250_000.0, epsilon = 1e-6);
        assert_relative_eq!(results[2].summary().ending_cash, base + 500_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_price_variants() {
        let runner = ScenarioRunner::new();
        let variants: Vec<_> = [20_000.0, 24_000.0, 30_000.0]
            .iter()
            .map(|&price| {
                let mut a = runner.assumptions().clone();
                a.revenue.base_arr = price;
                a
            })
            .collect();
        let config = ProjectionConfig {
            projection_years: 5,
            ..Default::default()
        };

        let results = runner.run_variants(&variants, &config);
        let arr: Vec<f64> = results
            .iter()
            .map(|r| r.as_ref().unwrap().summary().final_arr)
            .collect();

        assert!(arr[0] < arr[1] && arr[1] < arr[2]);
    }

    #[test]
    fn test_bad_variant_does_not_sink_batch() {
        let mut runner = ScenarioRunner::new();
        let good = runner.assumptions().clone();
        runner.assumptions_mut().revenue.tam = 0;
        let bad = runner.assumptions().clone();

        let results = runner.run_variants(&[good, bad], &ProjectionConfig::default());

        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ModelError::InvalidAssumptions(_))));
    }
}

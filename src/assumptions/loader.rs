//! CSV-based assumption loader
//!
//! Loads model assumptions from CSV files in data/assumptions/. Revenue inputs are
//! stored as `key,value` rows; roles and funding rounds as one record per row.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::funding::FundingRound;
use super::personnel::PersonnelRole;
use super::revenue::RevenueAssumptions;
use super::schedule::YearSchedule;
use crate::error::{ModelError, ModelResult};

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

/// Load `key,value` rows from revenue_assumptions.csv
pub fn load_key_values(path: &Path) -> ModelResult<HashMap<String, f64>> {
    let file = File::open(path.join("revenue_assumptions.csv"))?;
    read_key_values(file)
}

/// Parse `key,value` rows (with a header) from any reader
pub fn read_key_values<R: Read>(source: R) -> ModelResult<HashMap<String, f64>> {
    let mut reader = csv::Reader::from_reader(source);

    let mut values = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let (Some(key), Some(raw)) = (record.get(0), record.get(1)) else {
            return Err(ModelError::Parse {
                key: record.get(0).unwrap_or_default().trim().to_string(),
                value: "missing value column".into(),
            });
        };
        let key = key.trim().to_string();
        let raw = raw.trim();
        let value: f64 = raw.parse().map_err(|_| ModelError::Parse {
            key: key.clone(),
            value: raw.to_string(),
        })?;
        values.insert(key, value);
    }

    Ok(values)
}

/// Load personnel roles from personnel_roles.csv
pub fn load_personnel_roles(path: &Path) -> ModelResult<Vec<PersonnelRole>> {
    let file = File::open(path.join("personnel_roles.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut roles = Vec::new();
    for result in reader.deserialize() {
        let role: PersonnelRole = result?;
        roles.push(role);
    }

    Ok(roles)
}

/// Load funding rounds from funding_rounds.csv, keeping file order
pub fn load_funding_rounds(path: &Path) -> ModelResult<Vec<FundingRound>> {
    let file = File::open(path.join("funding_rounds.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rounds = Vec::new();
    for result in reader.deserialize() {
        let round: FundingRound = result?;
        rounds.push(round);
    }

    Ok(rounds)
}

/// Collect `<prefix>N` keys into a year schedule ordered by N
fn year_schedule(values: &HashMap<String, f64>, prefix: &str) -> Option<YearSchedule> {
    let mut entries: Vec<(u32, f64)> = values
        .iter()
        .filter_map(|(k, v)| {
            k.strip_prefix(prefix)
                .and_then(|n| n.parse::<u32>().ok())
                .map(|n| (n, *v))
        })
        .collect();

    if entries.is_empty() {
        return None;
    }

    entries.sort_by_key(|(n, _)| *n);
    Some(YearSchedule::new(entries.into_iter().map(|(_, v)| v).collect()))
}

/// Build revenue assumptions from key-value rows
///
/// Missing keys keep their model defaults; unknown keys are ignored.
pub fn revenue_from_key_values(values: &HashMap<String, f64>) -> RevenueAssumptions {
    let mut a = RevenueAssumptions::default_model();

    if let Some(&v) = values.get("tam") {
        a.tam = v.round().max(0.0) as u64;
    }
    if let Some(&v) = values.get("target_penetration") {
        a.target_penetration = v;
    }
    if let Some(&v) = values.get("years_to_target") {
        a.years_to_target = v;
    }
    if let Some(&v) = values.get("year1_customers") {
        a.year1_customers = v.round().max(0.0) as u64;
    }
    if let Some(&v) = values.get("base_arr") {
        a.base_arr = v;
    }
    if let Some(&v) = values.get("setup_fee") {
        a.setup_fee = v;
    }
    if let Some(&v) = values.get("annual_price_increase") {
        a.annual_price_increase = v;
    }
    if let Some(&v) = values.get("cogs_rate") {
        a.cogs_rate = v;
    }

    if let Some(churn) = year_schedule(values, "churn_year_") {
        a.churn = churn;
    } else if let Some(&v) = values.get("churn_rate") {
        a.churn = YearSchedule::flat(v);
    }

    if let Some(discounts) = year_schedule(values, "discount_year_") {
        a.discounts = discounts;
    }

    a
}

/// All assumption tables loaded from one directory
pub struct LoadedAssumptions {
    pub revenue: RevenueAssumptions,
    pub personnel: Vec<PersonnelRole>,
    pub funding_rounds: Vec<FundingRound>,
}

impl LoadedAssumptions {
    /// Load all assumptions from the default path
    pub fn load_default() -> ModelResult<Self> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all assumptions from a specific path
    pub fn load_from(path: &Path) -> ModelResult<Self> {
        let values = load_key_values(path)?;
        let revenue = revenue_from_key_values(&values);
        revenue.validate()?;

        Ok(Self {
            revenue,
            personnel: load_personnel_roles(path)?,
            funding_rounds: load_funding_rounds(path)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_assumptions() {
        let result = LoadedAssumptions::load_default();
        assert!(result.is_ok(), "Failed to load assumptions: {:?}", result.err());

        let loaded = result.unwrap();

        assert_eq!(loaded.revenue.tam, 30_000);
        assert_eq!(loaded.revenue.year1_customers, 10);
        assert_eq!(loaded.revenue.discounts.rate(1), 0.40);
        assert_eq!(loaded.revenue.discounts.rate(12), 0.025);

        assert!(loaded.personnel.len() >= 3);
        assert_eq!(loaded.personnel[0].role_name, "CTO");
        assert_eq!(loaded.personnel[0].end_month, None);

        assert!(!loaded.funding_rounds.is_empty());
        assert_eq!(loaded.funding_rounds[0].esop_refresh_target, None);
    }

    #[test]
    fn test_read_key_values() {
        let data = "key,value\ntam, 42000\nbase_arr,18000\n";
        let values = read_key_values(data.as_bytes()).unwrap();

        assert_eq!(values["tam"], 42_000.0);
        assert_eq!(values["base_arr"], 18_000.0);
    }

    #[test]
    fn test_single_column_file_is_parse_error() {
        let data = "key\ntam\n";
        let result = read_key_values(data.as_bytes());

        assert!(matches!(result, Err(ModelError::Parse { ref key, .. }) if key == "tam"));
    }

    #[test]
    fn test_non_numeric_value_is_parse_error() {
        let data = "key,value\ntam,lots\n";
        let result = read_key_values(data.as_bytes());

        assert!(matches!(result, Err(ModelError::Parse { ref value, .. }) if value == "lots"));
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let mut values = HashMap::new();
        values.insert("tam".to_string(), 50_000.0);
        values.insert("unrelated".to_string(), 1.0);

        let a = revenue_from_key_values(&values);

        assert_eq!(a.tam, 50_000);
        assert_eq!(a.base_arr, RevenueAssumptions::default_model().base_arr);
    }

    #[test]
    fn test_year_keys_sorted_numerically() {
        let mut values = HashMap::new();
        values.insert("churn_year_10".to_string(), 0.02);
        values.insert("churn_year_2".to_string(), 0.08);
        values.insert("churn_year_1".to_string(), 0.0);

        let a = revenue_from_key_values(&values);

        assert_eq!(a.churn.rates(), &[0.0, 0.08, 0.02]);
    }

    #[test]
    fn test_flat_churn_key() {
        let mut values = HashMap::new();
        values.insert("churn_rate".to_string(), 0.12);

        let a = revenue_from_key_values(&values);
        assert_eq!(a.churn.rate(7), 0.12);
    }
}

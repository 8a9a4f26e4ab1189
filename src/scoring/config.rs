use serde::{Deserialize, Serialize};

/// Rank estimator tuning.
///
/// Every field is optional; missing values fall back to the built-in
/// heuristic (`x1000` per percentage point, `x500` per prior point below 20,
/// prior defaults to 18).
///
/// Example YAML:
/// ```yaml
/// estimator:
///   percentage_weight: 1000
///   prior_weight: 500
///   prior_ceiling: 20
///   default_prior: 18
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Rank places per percentage point below 100 (default: 1000)
    #[serde(default)]
    pub percentage_weight: Option<f64>,

    /// Rank places per prior-score point below the ceiling (default: 500)
    #[serde(default)]
    pub prior_weight: Option<f64>,

    /// Best possible prior academic score (default: 20)
    #[serde(default)]
    pub prior_ceiling: Option<f64>,

    /// Prior score used when none was entered or it did not parse (default: 18)
    #[serde(default)]
    pub default_prior: Option<f64>,
}

pub const DEFAULT_PERCENTAGE_WEIGHT: f64 = 1000.0;
pub const DEFAULT_PRIOR_WEIGHT: f64 = 500.0;
pub const DEFAULT_PRIOR_CEILING: f64 = 20.0;
pub const DEFAULT_PRIOR: f64 = 18.0;

impl EstimatorConfig {
    pub fn percentage_weight(&self) -> f64 {
        self.percentage_weight.unwrap_or(DEFAULT_PERCENTAGE_WEIGHT)
    }

    pub fn prior_weight(&self) -> f64 {
        self.prior_weight.unwrap_or(DEFAULT_PRIOR_WEIGHT)
    }

    pub fn prior_ceiling(&self) -> f64 {
        self.prior_ceiling.unwrap_or(DEFAULT_PRIOR_CEILING)
    }

    pub fn default_prior(&self) -> f64 {
        self.default_prior.unwrap_or(DEFAULT_PRIOR)
    }

    /// Same values as the defaults, but spelled out (used by `init`).
    pub fn explicit_defaults() -> Self {
        Self {
            percentage_weight: Some(DEFAULT_PERCENTAGE_WEIGHT),
            prior_weight: Some(DEFAULT_PRIOR_WEIGHT),
            prior_ceiling: Some(DEFAULT_PRIOR_CEILING),
            default_prior: Some(DEFAULT_PRIOR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_estimator_config() {
        let config = EstimatorConfig::default();

        assert_eq!(config.percentage_weight(), 1000.0);
        assert_eq!(config.prior_weight(), 500.0);
        assert_eq!(config.prior_ceiling(), 20.0);
        assert_eq!(config.default_prior(), 18.0);
    }

    #[test]
    fn test_estimator_config_serde_roundtrip() {
        let config = EstimatorConfig::explicit_defaults();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: EstimatorConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_estimator_config_parse() {
        let yaml = r#"
prior_weight: 250
default_prior: 17.5
"#;
        let config: EstimatorConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.prior_weight(), 250.0);
        assert_eq!(config.default_prior(), 17.5);
        assert!(config.percentage_weight.is_none());
        assert_eq!(config.percentage_weight(), 1000.0);
    }

    #[test]
    fn test_empty_estimator_config_parse() {
        let config: EstimatorConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, EstimatorConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "bonus: 3";
        let result: Result<EstimatorConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }
}

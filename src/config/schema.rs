use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, SubjectSpec};
use crate::scoring::EstimatorConfig;

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Auto,
    Dark,
    Light,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimator: Option<EstimatorConfig>,

    /// Replaces the built-in catalog when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<SubjectSpec>>,
}

impl Config {
    pub fn theme_mode(&self) -> ThemeMode {
        self.theme.unwrap_or_default()
    }

    pub fn estimator(&self) -> EstimatorConfig {
        self.estimator.clone().unwrap_or_default()
    }

    /// The catalog this config selects: configured subjects or the default.
    pub fn catalog(&self) -> Result<Catalog, Vec<String>> {
        match &self.subjects {
            Some(subjects) => Catalog::from_subjects(subjects.clone()),
            None => Ok(Catalog::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.theme_mode(), ThemeMode::Auto);
        assert_eq!(config.catalog().unwrap().len(), 8);
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
theme: light
estimator:
  percentage_weight: 800
  default_prior: 19
subjects:
  - id: math
    name: Math
    total_questions: 30
  - id: physics
    name: Physics
    total_questions: 30
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.theme_mode(), ThemeMode::Light);

        let estimator = config.estimator();
        assert_eq!(estimator.percentage_weight(), 800.0);
        assert_eq!(estimator.prior_weight(), 500.0);
        assert_eq!(estimator.default_prior(), 19.0);

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.ids(), vec!["math", "physics"]);
    }

    #[test]
    fn test_invalid_catalog_reported() {
        let yaml = r#"
subjects:
  - id: math
    name: Math
    total_questions: 0
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let errors = config.catalog().unwrap_err();
        assert!(errors[0].contains("total_questions"));
    }

    #[test]
    fn test_unknown_theme_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("theme: neon");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            theme: Some(ThemeMode::Dark),
            estimator: Some(EstimatorConfig::explicit_defaults()),
            subjects: Some(Catalog::default().subjects().to_vec()),
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}

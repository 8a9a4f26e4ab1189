use super::config::EstimatorConfig;

/// Validate estimator tuning at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_estimator(config: &EstimatorConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let weights = [
        ("percentage_weight", config.percentage_weight),
        ("prior_weight", config.prior_weight),
    ];
    for (name, value) in weights {
        if let Some(v) = value {
            if !v.is_finite() {
                errors.push(format!("estimator.{}: must be a finite number", name));
            } else if v < 0.0 {
                errors.push(format!("estimator.{}: must be non-negative", name));
            }
        }
    }

    let scores = [
        ("prior_ceiling", config.prior_ceiling),
        ("default_prior", config.default_prior),
    ];
    for (name, value) in scores {
        if let Some(v) = value {
            if !v.is_finite() {
                errors.push(format!("estimator.{}: must be a finite number", name));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert!(validate_estimator(&EstimatorConfig::explicit_defaults()).is_ok());
    }

    #[test]
    fn test_empty_config() {
        assert!(validate_estimator(&EstimatorConfig::default()).is_ok());
    }

    #[test]
    fn test_negative_weight() {
        let config = EstimatorConfig {
            prior_weight: Some(-1.0),
            ..Default::default()
        };
        let errors = validate_estimator(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("estimator.prior_weight"));
    }

    #[test]
    fn test_non_finite_values() {
        let config = EstimatorConfig {
            percentage_weight: Some(f64::INFINITY),
            default_prior: Some(f64::NAN),
            ..Default::default()
        };
        let errors = validate_estimator(&config).unwrap_err();
        assert!(errors[0].contains("percentage_weight"));
        assert!(errors[1].contains("default_prior"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = EstimatorConfig {
            percentage_weight: Some(-5.0),
            prior_weight: Some(-5.0),
            prior_ceiling: Some(f64::NAN),
            default_prior: None,
        };
        let errors = validate_estimator(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}

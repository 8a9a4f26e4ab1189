use serde::Serialize;

use super::config::EstimatorConfig;

/// Lowest percentage ever reported. The formula only approaches -33.33...
/// when wrong answers dominate, so this keeps the display readable.
pub const PERCENTAGE_FLOOR: f64 = -33.33;

/// Percentage for one subject under the "three wrong cancel one right" rule.
///
/// The score is normalized against attempted questions only, so
/// `total_questions` and unanswered questions do not enter the formula.
/// Returns `None` when nothing was attempted.
pub fn subject_percentage(correct: u32, wrong: u32, _total_questions: u32) -> Option<f64> {
    let attempted = correct as u64 + wrong as u64;
    if attempted == 0 {
        return None;
    }

    let correct = correct as f64;
    let wrong = wrong as f64;
    let raw = (correct * 3.0 - wrong) / (3.0 * attempted as f64) * 100.0;
    Some(raw.max(PERCENTAGE_FLOOR))
}

/// Mean of the scored subjects, skipping those without a percentage.
pub fn average<I>(percentages: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = percentages
        .into_iter()
        .flatten()
        .fold((0.0_f64, 0_usize), |(sum, count), p| (sum + p, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Estimated rank. Always at least 1; lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RankEstimate {
    value: u64,
}

impl RankEstimate {
    fn from_raw(raw: f64) -> Self {
        // `as` saturates, so huge or tiny raw values still land in range
        let rounded = raw.round() as i64;
        Self {
            value: rounded.max(1) as u64,
        }
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankTerm {
    pub label: String,       // e.g. "Average", "Prior score"
    pub description: String, // e.g. "(100 - 62.5) x 1000"
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankBreakdown {
    pub prior_used: f64,
    pub prior_defaulted: bool,
    pub terms: Vec<RankTerm>,
    pub raw: f64,
    pub rank: RankEstimate,
}

/// Rank estimate with the built-in weights.
pub fn estimate_rank(average: f64, prior: Option<f64>) -> RankEstimate {
    estimate_rank_with(average, prior, &EstimatorConfig::default())
}

pub fn estimate_rank_with(average: f64, prior: Option<f64>, config: &EstimatorConfig) -> RankEstimate {
    explain_rank(average, prior, config).rank
}

/// Compute the rank estimate and keep each weighted term for display.
pub fn explain_rank(average: f64, prior: Option<f64>, config: &EstimatorConfig) -> RankBreakdown {
    let prior_defaulted = prior.is_none();
    let prior_used = prior.unwrap_or_else(|| config.default_prior());

    let percentage_weight = config.percentage_weight();
    let prior_weight = config.prior_weight();
    let ceiling = config.prior_ceiling();

    let average_term = (100.0 - average) * percentage_weight;
    let prior_term = (ceiling - prior_used) * prior_weight;
    let raw = average_term + prior_term;

    let terms = vec![
        RankTerm {
            label: "Average".to_string(),
            description: format!("(100 - {}) x {}", average, percentage_weight),
            contribution: average_term,
        },
        RankTerm {
            label: "Prior score".to_string(),
            description: format!(
                "({} - {}{}) x {}",
                ceiling,
                prior_used,
                if prior_defaulted { " default" } else { "" },
                prior_weight
            ),
            contribution: prior_term,
        },
    ];

    RankBreakdown {
        prior_used,
        prior_defaulted,
        terms,
        raw,
        rank: RankEstimate::from_raw(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formula(c: u32, w: u32) -> f64 {
        let (c, w) = (c as f64, w as f64);
        ((c * 3.0 - w) / (3.0 * (c + w)) * 100.0).max(-33.33)
    }

    #[test]
    fn test_nothing_attempted_is_absent() {
        assert_eq!(subject_percentage(0, 0, 35), None);
        assert_eq!(subject_percentage(0, 0, 1), None);
    }

    #[test]
    fn test_all_correct_is_hundred() {
        assert_eq!(subject_percentage(35, 0, 35), Some(100.0));
    }

    #[test]
    fn test_all_wrong_hits_floor() {
        // -33.333... is clamped to exactly -33.33
        assert_eq!(subject_percentage(0, 35, 35), Some(-33.33));
        assert_eq!(subject_percentage(0, 1, 25), Some(-33.33));
    }

    #[test]
    fn test_mixed_answers() {
        let p = subject_percentage(10, 5, 35).unwrap();
        assert!((p - 55.5555).abs() < 0.001);
        assert_eq!(p, (30.0 - 5.0) / 45.0 * 100.0);
    }

    #[test]
    fn test_three_wrong_cancel_one_correct() {
        assert_eq!(subject_percentage(1, 3, 25), Some(0.0));
    }

    #[test]
    fn test_matches_formula_over_grid() {
        for c in 0..=40 {
            for w in 0..=40 {
                if c + w == 0 {
                    continue;
                }
                let p = subject_percentage(c, w, 35).unwrap();
                assert_eq!(p, formula(c, w), "c={} w={}", c, w);
                assert!(p >= PERCENTAGE_FLOOR);
                assert!(p <= 100.0);
            }
        }
    }

    #[test]
    fn test_counts_above_total_are_tolerated() {
        // 50 attempted on a 20-question subject still scores
        let p = subject_percentage(40, 10, 20).unwrap();
        assert!((p - formula(40, 10)).abs() < 1e-12);
    }

    #[test]
    fn test_percentage_is_idempotent() {
        assert_eq!(subject_percentage(12, 7, 25), subject_percentage(12, 7, 25));
    }

    #[test]
    fn test_average_empty() {
        assert_eq!(average(Vec::<Option<f64>>::new()), None);
    }

    #[test]
    fn test_average_all_absent() {
        assert_eq!(average(vec![None, None]), None);
    }

    #[test]
    fn test_average_skips_absent() {
        assert_eq!(average(vec![Some(50.0), None, Some(70.0)]), Some(60.0));
    }

    #[test]
    fn test_average_keeps_negative_and_zero() {
        let avg = average(vec![Some(0.0), Some(-33.33), Some(100.0)]).unwrap();
        assert!((avg - 22.2233).abs() < 0.0001);
    }

    #[test]
    fn test_rank_best_inputs_floor_to_one() {
        assert_eq!(estimate_rank(100.0, Some(20.0)).value(), 1);
    }

    #[test]
    fn test_rank_defaults_prior() {
        // (100 - 0) * 1000 + (20 - 18) * 500
        assert_eq!(estimate_rank(0.0, None).value(), 101_000);
    }

    #[test]
    fn test_rank_never_below_one() {
        assert_eq!(estimate_rank(150.0, Some(25.0)).value(), 1);
        assert_eq!(estimate_rank(1e12, Some(1e12)).value(), 1);
    }

    #[test]
    fn test_rank_rounds_half_away_from_zero() {
        let config = EstimatorConfig {
            percentage_weight: Some(1.0),
            prior_weight: Some(0.5),
            prior_ceiling: None,
            default_prior: None,
        };
        // (100 - 97) * 1 + (20 - 19) * 0.5 = 3.5 -> 4
        assert_eq!(estimate_rank_with(97.0, Some(19.0), &config).value(), 4);
    }

    #[test]
    fn test_rank_typical_student() {
        // (100 - 60) * 1000 + (20 - 19) * 500 = 40500
        assert_eq!(estimate_rank(60.0, Some(19.0)).value(), 40_500);
    }

    #[test]
    fn test_rank_with_custom_weights() {
        let config = EstimatorConfig {
            percentage_weight: Some(100.0),
            prior_weight: Some(0.0),
            prior_ceiling: None,
            default_prior: None,
        };
        assert_eq!(estimate_rank_with(50.0, Some(10.0), &config).value(), 5000);
    }

    #[test]
    fn test_explain_rank_terms() {
        let breakdown = explain_rank(80.0, None, &EstimatorConfig::default());
        assert!(breakdown.prior_defaulted);
        assert_eq!(breakdown.prior_used, 18.0);
        assert_eq!(breakdown.terms.len(), 2);
        assert_eq!(breakdown.terms[0].contribution, 20_000.0);
        assert_eq!(breakdown.terms[1].contribution, 1_000.0);
        assert_eq!(breakdown.raw, 21_000.0);
        assert_eq!(breakdown.rank.value(), 21_000);
        assert!(breakdown.terms[1].description.contains("default"));
    }
}

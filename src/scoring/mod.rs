pub mod config;
pub mod engine;
pub mod input;
pub mod validation;

pub use config::EstimatorConfig;
pub use engine::{
    average, estimate_rank, estimate_rank_with, explain_rank, subject_percentage, RankBreakdown,
    RankEstimate, RankTerm, PERCENTAGE_FLOOR,
};
pub use input::{parse_count, parse_count_field, parse_prior_score, SubjectEntry};
pub use validation::validate_estimator;

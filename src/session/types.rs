use anyhow::{Context, Result};
use serde::Serialize;

use crate::catalog::{Catalog, SubjectSpec};
use crate::scoring::{self, EstimatorConfig, RankEstimate};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubjectRecord {
    pub id: String,
    pub name: String,
    pub correct: Option<u32>,
    pub wrong: Option<u32>,
    pub unanswered: Option<u32>,
    pub total_questions: u32,
    pub percentage: Option<f64>,
}

impl SubjectRecord {
    /// Empty record for a catalog subject: no counts, no percentage.
    pub fn empty(subject: &SubjectSpec) -> Self {
        Self {
            id: subject.id.clone(),
            name: subject.name.clone(),
            correct: None,
            wrong: None,
            unanswered: None,
            total_questions: subject.total_questions,
            percentage: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.correct.is_none() && self.wrong.is_none() && self.unanswered.is_none()
    }

    /// Compute and store the percentage from the current counts.
    pub fn compute(&mut self) -> Option<f64> {
        self.percentage = scoring::subject_percentage(
            self.correct.unwrap_or(0),
            self.wrong.unwrap_or(0),
            self.total_questions,
        );
        self.percentage
    }

    /// Describe counts that do not fit the subject's question total.
    ///
    /// Informational only: inconsistent counts are still scored.
    pub fn count_warning(&self) -> Option<String> {
        let entered = self.correct.unwrap_or(0) as u64
            + self.wrong.unwrap_or(0) as u64
            + self.unanswered.unwrap_or(0) as u64;
        let total = self.total_questions as u64;

        if entered > total {
            Some(format!(
                "{}: {} answers entered but the subject has {} questions",
                self.id, entered, total
            ))
        } else if !self.is_empty() && entered < total && self.unanswered.is_some() {
            Some(format!(
                "{}: counts add up to {} of {} questions",
                self.id, entered, total
            ))
        } else {
            None
        }
    }
}

/// Result of computing every subject at once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionSummary {
    pub average: Option<f64>,
    pub rank: Option<RankEstimate>,
}

/// All per-subject records for one sitting, in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamSession {
    pub subjects: Vec<SubjectRecord>,
    pub prior_academic_score: Option<f64>,
}

impl ExamSession {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            subjects: catalog.subjects().iter().map(SubjectRecord::empty).collect(),
            prior_academic_score: None,
        }
    }

    pub fn subject(&self, id: &str) -> Option<&SubjectRecord> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn subject_mut(&mut self, id: &str) -> Option<&mut SubjectRecord> {
        self.subjects.iter_mut().find(|s| s.id == id)
    }

    /// Replace the counts of one subject. The stored percentage is left
    /// alone until the subject is computed again.
    pub fn set_counts(
        &mut self,
        id: &str,
        correct: Option<u32>,
        wrong: Option<u32>,
        unanswered: Option<u32>,
    ) -> Result<()> {
        let known = self.known_ids();
        let record = self
            .subject_mut(id)
            .with_context(|| format!("Unknown subject '{}' (known: {})", id, known))?;
        record.correct = correct;
        record.wrong = wrong;
        record.unanswered = unanswered;
        Ok(())
    }

    /// Set the prior academic score from raw text. Malformed text and a
    /// score of zero both clear it, so the estimator falls back to its default.
    pub fn set_prior_text(&mut self, raw: &str) {
        self.prior_academic_score = scoring::parse_prior_score(raw).filter(|p| *p != 0.0);
    }

    /// Compute one subject's percentage.
    pub fn compute_subject(&mut self, id: &str) -> Result<Option<f64>> {
        let known = self.known_ids();
        let record = self
            .subject_mut(id)
            .with_context(|| format!("Unknown subject '{}' (known: {})", id, known))?;
        Ok(record.compute())
    }

    pub fn percentages(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.subjects.iter().map(|s| s.percentage)
    }

    pub fn average(&self) -> Option<f64> {
        scoring::average(self.percentages())
    }

    /// Recompute every subject from its current counts, then the average
    /// and the rank estimate.
    pub fn compute_all(&mut self, estimator: &EstimatorConfig) -> SessionSummary {
        for record in &mut self.subjects {
            record.compute();
        }

        let average = self.average();
        let rank = average
            .map(|avg| scoring::estimate_rank_with(avg, self.prior_academic_score, estimator));

        SessionSummary { average, rank }
    }

    /// Clear every count and percentage. The prior score is kept.
    pub fn reset(&mut self) {
        let cleared = self
            .subjects
            .iter()
            .map(|s| SubjectRecord {
                correct: None,
                wrong: None,
                unanswered: None,
                percentage: None,
                ..s.clone()
            })
            .collect();
        self.subjects = cleared;
    }

    pub fn count_warnings(&self) -> Vec<String> {
        self.subjects.iter().filter_map(|s| s.count_warning()).collect()
    }

    fn known_ids(&self) -> String {
        self.subjects
            .iter()
            .map(|s| s.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

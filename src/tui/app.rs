use crate::buffered_eprintln;
use crate::output::{format_average, format_percentage, format_rank};
use crate::scoring::{explain_rank, parse_count_field, EstimatorConfig, RankBreakdown};
use crate::session::{ExamSession, SessionSummary, SubjectRecord};
use crate::tui::theme::ThemeColors;
use std::time::Instant;

/// Longest count a user can type into a cell
const MAX_COUNT_DIGITS: usize = 4;
/// Longest prior score text (e.g. "19.75")
const MAX_PRIOR_CHARS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Correct,
    Wrong,
    Unanswered,
}

impl Field {
    pub fn next(self) -> Self {
        match self {
            Field::Correct => Field::Wrong,
            Field::Wrong => Field::Unanswered,
            Field::Unanswered => Field::Correct,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Field::Correct => Field::Unanswered,
            Field::Wrong => Field::Correct,
            Field::Unanswered => Field::Wrong,
        }
    }

    fn slot(self, record: &mut SubjectRecord) -> &mut Option<u32> {
        match self {
            Field::Correct => &mut record.correct,
            Field::Wrong => &mut record.wrong,
            Field::Unanswered => &mut record.unanswered,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    PriorInput,
    Help,
    RankBreakdown,
}

pub struct App {
    pub session: ExamSession,
    pub estimator: EstimatorConfig,
    pub summary: Option<SessionSummary>,
    pub table_state: ratatui::widgets::TableState,
    pub field: Field,
    pub input_mode: InputMode,
    pub prior_input: String,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub verbose: bool,
    pub colors: ThemeColors,
}

impl App {
    pub fn new(
        session: ExamSession,
        estimator: EstimatorConfig,
        colors: ThemeColors,
        verbose: bool,
    ) -> Self {
        let mut table_state = ratatui::widgets::TableState::default();
        if !session.subjects.is_empty() {
            table_state.select(Some(0));
        }
        let prior_input = session
            .prior_academic_score
            .map(|p| p.to_string())
            .unwrap_or_default();

        Self {
            session,
            estimator,
            summary: None,
            table_state,
            field: Field::Correct,
            input_mode: InputMode::Normal,
            prior_input,
            flash_message: None,
            should_quit: false,
            verbose,
            colors,
        }
    }

    pub fn next_row(&mut self) {
        let len = self.session.subjects.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.session.subjects.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn previous_field(&mut self) {
        self.field = self.field.previous();
    }

    pub fn selected_subject(&self) -> Option<&SubjectRecord> {
        self.table_state
            .selected()
            .and_then(|i| self.session.subjects.get(i))
    }

    /// Edit the selected cell's text and store it back as a count.
    fn edit_selected_count(&mut self, edit: impl FnOnce(&mut String)) {
        let field = self.field;
        let Some(record) = self
            .table_state
            .selected()
            .and_then(|i| self.session.subjects.get_mut(i))
        else {
            return;
        };
        let slot = field.slot(record);
        let mut text = slot.map(|c| c.to_string()).unwrap_or_default();
        edit(&mut text);
        *slot = parse_count_field(&text);
    }

    pub fn type_digit(&mut self, digit: char) {
        self.edit_selected_count(|text| {
            if text == "0" {
                text.clear();
            }
            if text.len() < MAX_COUNT_DIGITS {
                text.push(digit);
            }
        });
    }

    pub fn delete_digit(&mut self) {
        self.edit_selected_count(|text| {
            text.pop();
        });
    }

    /// Compute the selected subject's percentage.
    pub fn compute_selected(&mut self) {
        let Some(i) = self.table_state.selected() else {
            return;
        };
        let Some(record) = self.session.subjects.get_mut(i) else {
            return;
        };
        let message = match record.compute() {
            Some(p) => format!("{}: {}", record.name, format_percentage(p)),
            None => format!("{}: enter correct or wrong answers first", record.name),
        };
        self.show_flash(message);
    }

    /// Compute every subject, the average, and the rank.
    pub fn compute_all(&mut self) {
        let summary = self.session.compute_all(&self.estimator);
        self.summary = Some(summary);

        if self.verbose {
            for warning in self.session.count_warnings() {
                buffered_eprintln!("warning: {}", warning);
            }
        }

        match (summary.average, summary.rank) {
            (Some(average), Some(rank)) => self.show_flash(format!(
                "Computed: average {}, estimated rank {}",
                format_average(average),
                format_rank(rank.value())
            )),
            _ => self.show_flash("Error: no subject has answers to score".to_string()),
        }
    }

    /// Clear every count, percentage, and the estimate in one step.
    pub fn reset(&mut self) {
        self.session.reset();
        self.summary = None;
        self.field = Field::Correct;
        if !self.session.subjects.is_empty() {
            self.table_state.select(Some(0));
        }
        self.show_flash("Cleared all subjects".to_string());
    }

    pub fn rank_breakdown(&self) -> Option<RankBreakdown> {
        let average = self.summary?.average?;
        Some(explain_rank(
            average,
            self.session.prior_academic_score,
            &self.estimator,
        ))
    }

    pub fn start_prior_input(&mut self) {
        self.input_mode = InputMode::PriorInput;
    }

    pub fn push_prior_char(&mut self, c: char) {
        if (c.is_ascii_digit() || c == '.') && self.prior_input.len() < MAX_PRIOR_CHARS {
            self.prior_input.push(c);
        }
    }

    pub fn confirm_prior_input(&mut self) {
        self.session.set_prior_text(&self.prior_input);
        let message = match self.session.prior_academic_score {
            Some(p) => format!("Prior score set to {}", p),
            None => {
                self.prior_input.clear();
                format!(
                    "Prior score cleared (using default {})",
                    self.estimator.default_prior()
                )
            }
        };
        self.input_mode = InputMode::Normal;
        self.show_flash(message);
    }

    /// Leave prior input without changing the stored score.
    pub fn cancel_prior_input(&mut self) {
        self.prior_input = self
            .session
            .prior_academic_score
            .map(|p| p.to_string())
            .unwrap_or_default();
        self.input_mode = InputMode::Normal;
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn show_rank_breakdown(&mut self) {
        if self.rank_breakdown().is_some() {
            self.input_mode = InputMode::RankBreakdown;
        } else {
            self.show_flash("Press a to compute the rank first".to_string());
        }
    }

    pub fn dismiss_popup(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }
}

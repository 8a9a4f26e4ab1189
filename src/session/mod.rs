pub mod types;

pub use types::{ExamSession, SessionSummary, SubjectRecord};

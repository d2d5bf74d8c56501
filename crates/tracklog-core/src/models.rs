use serde::{Deserialize, Serialize};

/// Which kind of tracking event a run extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Per-question answers from `problem_check` submissions.
    Problem,
    /// Video player interactions.
    Video,
}

impl Mode {
    /// Column header written for this mode's output table.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Mode::Problem => SubmissionRow::COLUMNS,
            Mode::Video => VideoRow::COLUMNS,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Problem => f.write_str("problem"),
            Mode::Video => f.write_str("video"),
        }
    }
}

/// A flat row of already-stringified fields with a fixed column set.
///
/// `fields()` must return exactly `COLUMNS.len()` values, in column order.
pub trait OutputRow {
    const COLUMNS: &'static [&'static str];

    fn fields(&self) -> Vec<&str>;
}

/// One learner answer to one question of a checked problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRow {
    pub user_id: String,
    pub problem_id: String,
    pub question_id: String,
    /// Question text, or the literal `None` when absent.
    pub question: String,
    /// Answer text, or the literal `None` when absent.
    pub answer: String,
    pub time: String,
}

impl OutputRow for SubmissionRow {
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "problem_id",
        "question_id",
        "question",
        "answer",
        "time",
    ];

    fn fields(&self) -> Vec<&str> {
        vec![
            self.user_id.as_str(),
            self.problem_id.as_str(),
            self.question_id.as_str(),
            self.question.as_str(),
            self.answer.as_str(),
            self.time.as_str(),
        ]
    }
}

/// One video player interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRow {
    pub user_id: String,
    pub video_id: String,
    /// Effective event type exactly as it appeared in the log.
    pub event_type: String,
    pub time: String,
}

impl OutputRow for VideoRow {
    const COLUMNS: &'static [&'static str] = &["user_id", "video_id", "event_type", "time"];

    fn fields(&self) -> Vec<&str> {
        vec![
            self.user_id.as_str(),
            self.video_id.as_str(),
            self.event_type.as_str(),
            self.time.as_str(),
        ]
    }
}

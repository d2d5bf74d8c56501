//! Mode-specific rules that turn one tracking record into flat rows.
//!
//! Records that are simply not of interest (wrong event type, anonymous
//! user, browser-sourced submission) yield no rows. Records that *are* of
//! interest but lack a field the row cannot be built without yield a
//! [`ExtractError::Shape`] so the caller can report the line.

use serde_json::Value;
use tracklog_core::error::{ExtractError, Result};
use tracklog_core::models::{Mode, OutputRow, SubmissionRow, VideoRow};
use tracklog_core::record::{
    effective_event_type, to_field, to_field_or_none, user_id, RecordExt, NONE_SENTINEL,
};

/// Event type emitted by the LMS when a learner's answers are graded.
pub const PROBLEM_CHECK: &str = "problem_check";

// ── Classifier ────────────────────────────────────────────────────────────────

/// A rule set producing rows of one fixed shape.
pub trait Classifier {
    type Row: OutputRow;

    /// The run mode this classifier implements.
    const MODE: Mode;

    /// Extract zero or more rows from `record`.
    fn classify(&self, record: &Value) -> Result<Vec<Self::Row>>;
}

// ── Submissions ───────────────────────────────────────────────────────────────

/// Emits one [`SubmissionRow`] per question of a server-side `problem_check`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionClassifier;

impl Classifier for SubmissionClassifier {
    type Row = SubmissionRow;
    const MODE: Mode = Mode::Problem;

    fn classify(&self, record: &Value) -> Result<Vec<SubmissionRow>> {
        let Some(user) = user_id(record) else {
            return Ok(Vec::new());
        };
        if record.get("event_source").and_then(Value::as_str) != Some("server") {
            return Ok(Vec::new());
        }
        if effective_event_type(record) != Some(PROBLEM_CHECK) {
            return Ok(Vec::new());
        }

        let problem_id = record.require(&["event", "problem_id"], "event.problem_id")?;
        let time = record.require(&["time"], "time")?;
        let submission = record
            .require(&["event", "submission"], "event.submission")?
            .as_object()
            .ok_or_else(|| ExtractError::wrong_type("event.submission"))?;

        let user_id = to_field(user);
        let problem_id = to_field(problem_id);
        let time = to_field(time);

        submission
            .iter()
            .map(|(question_id, entry)| -> Result<SubmissionRow> {
                let entry = entry
                    .as_object()
                    .ok_or_else(|| ExtractError::wrong_type("event.submission entry"))?;
                Ok(SubmissionRow {
                    user_id: user_id.clone(),
                    problem_id: problem_id.clone(),
                    question_id: question_id.clone(),
                    question: to_field_or_none(entry.get("question")),
                    answer: to_field_or_none(entry.get("answer")),
                    time: time.clone(),
                })
            })
            .collect()
    }
}

// ── Video ─────────────────────────────────────────────────────────────────────

/// Kind of video interaction, independent of how the log spelled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoAction {
    Load,
    Play,
    Pause,
    Stop,
    Seek,
    SpeedChange,
    TranscriptShow,
    TranscriptHide,
    CcMenuShow,
    CcMenuHide,
}

/// Accepted spellings: `(kind, player-emitted name, tracking name)`.
pub const VIDEO_EVENTS: &[(VideoAction, &str, &str)] = &[
    (VideoAction::Load, "load_video", "edx.video.loaded"),
    (VideoAction::Play, "play_video", "edx.video.played"),
    (VideoAction::Pause, "pause_video", "edx.video.paused"),
    (VideoAction::Stop, "stop_video", "edx.video.stopped"),
    (VideoAction::Seek, "seek_video", "edx.video.position.changed"),
    (VideoAction::SpeedChange, "speed_change_video", "edx.video.speed.changed"),
    (VideoAction::TranscriptShow, "show_transcript", "edx.video.transcript.shown"),
    (VideoAction::TranscriptHide, "hide_transcript", "edx.video.transcript.hidden"),
    (VideoAction::CcMenuShow, "video_show_cc_menu", "edx.video.language_menu.shown"),
    (VideoAction::CcMenuHide, "video_hide_cc_menu", "edx.video.language_menu.hidden"),
];

impl VideoAction {
    /// Look up an event type in the allow-list, accepting either spelling.
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        VIDEO_EVENTS
            .iter()
            .find(|(_, ui, tracking)| *ui == event_type || *tracking == event_type)
            .map(|(action, _, _)| *action)
    }
}

/// Emits one [`VideoRow`] per allow-listed video interaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoClassifier;

impl Classifier for VideoClassifier {
    type Row = VideoRow;
    const MODE: Mode = Mode::Video;

    fn classify(&self, record: &Value) -> Result<Vec<VideoRow>> {
        let Some(user) = user_id(record) else {
            return Ok(Vec::new());
        };
        let Some(event_type) = effective_event_type(record) else {
            return Ok(Vec::new());
        };
        if VideoAction::from_event_type(event_type).is_none() {
            return Ok(Vec::new());
        }

        let video_id = video_id(record.require(&["event"], "event")?)?;
        let time = record.require(&["time"], "time")?;

        Ok(vec![VideoRow {
            user_id: to_field(user),
            video_id,
            event_type: event_type.to_string(),
            time: to_field(time),
        }])
    }
}

/// Pull `id` out of a video event payload.
///
/// Player events carry the payload as a JSON-encoded string. A payload
/// without `id` yields [`NONE_SENTINEL`].
fn video_id(event: &Value) -> Result<String> {
    let encoded = event
        .as_str()
        .ok_or_else(|| ExtractError::wrong_type("event"))?;
    let payload: Value = serde_json::from_str(encoded)?;
    let payload = payload
        .as_object()
        .ok_or_else(|| ExtractError::wrong_type("event"))?;
    Ok(payload
        .get("id")
        .map(to_field)
        .unwrap_or_else(|| NONE_SENTINEL.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

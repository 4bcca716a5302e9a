use super::CharacterRecord;
use serde::{Deserialize, Serialize};

/// Which script a displayed glyph belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Script {
    /// Japanese (main form)
    #[serde(rename = "jp")]
    Primary,

    /// Chinese (counterpart)
    #[serde(rename = "cn")]
    Counterpart,
}

impl Script {
    /// Speech locale used when reading a glyph of this script aloud.
    pub fn locale(self) -> &'static str {
        match self {
            Script::Primary => "ja-JP",
            Script::Counterpart => "zh-CN",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Script::Primary => Script::Counterpart,
            Script::Counterpart => Script::Primary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseKind {
    #[serde(rename = "shape")]
    Recognition,

    #[serde(rename = "writing")]
    Recall,
}

/// "Is this the correct glyph for this script?" question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionItem {
    pub entry: CharacterRecord,
    pub prompt: String,
    pub display_glyph: String,
    pub display_script: Script,

    /// True when `display_glyph` is the correct glyph for the framed script
    pub expected_answer: bool,

    pub reveal_glyph: String,
    pub reveal_script: Script,
}

/// "Write the Japanese glyph for this Chinese one" question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecallItem {
    pub entry: CharacterRecord,
    pub prompt: String,
    pub display_glyph: String,
    pub display_script: Script,

    /// First on-reading of the entry, or a dash placeholder
    pub reading: String,

    pub reveal_glyph: String,
    pub reveal_script: Script,
}

/// The single active quiz item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExerciseItem {
    #[serde(rename = "shape")]
    Recognition(RecognitionItem),

    #[serde(rename = "writing")]
    Recall(RecallItem),
}

impl ExerciseItem {
    pub fn entry(&self) -> &CharacterRecord {
        match self {
            ExerciseItem::Recognition(item) => &item.entry,
            ExerciseItem::Recall(item) => &item.entry,
        }
    }

    pub fn kind(&self) -> ExerciseKind {
        match self {
            ExerciseItem::Recognition(_) => ExerciseKind::Recognition,
            ExerciseItem::Recall(_) => ExerciseKind::Recall,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            ExerciseItem::Recognition(item) => &item.prompt,
            ExerciseItem::Recall(item) => &item.prompt,
        }
    }

    /// Glyph and script to show once the learner has answered.
    pub fn reveal(&self) -> (&str, Script) {
        match self {
            ExerciseItem::Recognition(item) => (&item.reveal_glyph, item.reveal_script),
            ExerciseItem::Recall(item) => (&item.reveal_glyph, item.reveal_script),
        }
    }
}

/// Outcome of one answered round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub character_id: String,
    pub record: CharacterRecord,
    pub exercise_type: ExerciseKind,
    pub was_correct: bool,
}

/// A fixed-length run of exercise rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSession {
    /// Rounds started so far (1-based once active)
    pub index: u32,
    pub total: u32,
    pub score: u32,
    pub log: Vec<LogEntry>,
}

impl ExerciseSession {
    pub fn new(total: u32) -> Self {
        Self {
            index: 0,
            total,
            score: 0,
            log: Vec::new(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.total
    }
}

/// Session snapshot together with the item created for the new round.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseRound {
    pub session: ExerciseSession,
    pub item: ExerciseItem,
}

/// Result of [`ExerciseEngine::answer`](crate::services::ExerciseEngine::answer).
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    /// `None` when there was no active session or item
    pub session: Option<ExerciseSession>,
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    pub score: u32,
    pub total_score: u32,
    pub right: Vec<LogEntry>,
    pub wrong: Vec<LogEntry>,
}

//! Quiz session generation and scoring.
//!
//! The engine is a small state machine over `{no session, active session}`:
//!
//! - [`next()`](ExerciseEngine::next) starts a session when none exists or the
//!   previous one is exhausted, advances the round counter and builds a new item
//! - [`answer()`](ExerciseEngine::answer) scores the current item and logs it
//! - [`reset()`](ExerciseEngine::reset) drops the session and current item
//!
//! Each round draws from the [`RandomSource`] in a fixed order: pool index,
//! item variant, framing script, then correct-or-swapped glyph (recognition
//! items only). A draw above `0.5` selects recognition, primary framing and
//! the correct glyph respectively.

use super::random::RandomSource;
use super::repository::CharacterRepository;
use crate::models::{
    AnswerOutcome, CharacterRecord, ExerciseConfig, ExerciseItem, ExerciseKind, ExerciseRound,
    ExerciseSession, LogEntry, RecallItem, RecognitionItem, ResultSummary, Script,
};
use crate::storage::{self, KeyValueStore, MISSED_ITEMS_KEY, StorageError};
use std::sync::Arc;
use thiserror::Error;

pub const PROMPT_PRIMARY_RECOGNITION: &str = "这是《常用漢字表》中的日文汉字吗？";
pub const PROMPT_COUNTERPART_RECOGNITION: &str = "这是《通用规范汉字表》中的中文汉字吗？";
pub const PROMPT_RECALL: &str = "请根据提示在纸上写出对应的日文汉字：";

const READING_PLACEHOLDER: &str = "—";
const GLYPH_PLACEHOLDER: &str = "?";

/// Conditions that prevent a new exercise item from being produced
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExerciseError {
    #[error("Character dataset has not been loaded")]
    DatasetEmpty,

    #[error("No character is eligible for an exercise")]
    NoEligibleItem,
}

/// Session parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseSettings {
    pub rounds: u32,
    pub points_per_correct: u32,
    pub missed_items_key: String,
}

impl Default for ExerciseSettings {
    fn default() -> Self {
        Self {
            rounds: 10,
            points_per_correct: 10,
            missed_items_key: MISSED_ITEMS_KEY.to_string(),
        }
    }
}

impl From<&ExerciseConfig> for ExerciseSettings {
    fn from(config: &ExerciseConfig) -> Self {
        Self {
            rounds: config.rounds,
            points_per_correct: config.points_per_correct,
            ..Self::default()
        }
    }
}

/// Stateful quiz generator over the character repository.
///
/// # Related Types
///
/// - [`CharacterRepository`]: Read-only pool of characters to quiz on
/// - [`KeyValueStore`]: Receives the durable set of missed recall items
/// - [`RandomSource`]: Drives item selection and variant branching
pub struct ExerciseEngine {
    repository: Arc<CharacterRepository>,
    store: Arc<dyn KeyValueStore>,
    random: Box<dyn RandomSource>,
    settings: ExerciseSettings,
    session: Option<ExerciseSession>,
    current: Option<ExerciseItem>,
}

impl ExerciseEngine {
    pub fn new(
        repository: Arc<CharacterRepository>,
        store: Arc<dyn KeyValueStore>,
        random: Box<dyn RandomSource>,
        settings: ExerciseSettings,
    ) -> Self {
        Self {
            repository,
            store,
            random,
            settings,
            session: None,
            current: None,
        }
    }

    /// Drop the active session and item.
    pub fn reset(&mut self) {
        self.session = None;
        self.current = None;
        tracing::debug!("Exercise session reset");
    }

    /// Start the next round, creating a fresh session when needed.
    ///
    /// # Errors
    ///
    /// - [`ExerciseError::DatasetEmpty`] if the repository has no records
    /// - [`ExerciseError::NoEligibleItem`] if no record could be selected
    pub fn next(&mut self) -> Result<ExerciseRound, ExerciseError> {
        if self.repository.is_empty() {
            return Err(ExerciseError::DatasetEmpty);
        }

        if self
            .session
            .as_ref()
            .is_some_and(ExerciseSession::is_exhausted)
        {
            self.session = None;
        }

        let rounds = self.settings.rounds;
        let session = self.session.get_or_insert_with(|| {
            tracing::info!("Starting exercise session with {} rounds", rounds);
            ExerciseSession::new(rounds)
        });
        session.index += 1;
        let snapshot = session.clone();

        let entry = pick_entry(&self.repository, self.random.as_mut())
            .cloned()
            .ok_or(ExerciseError::NoEligibleItem)?;

        let item = if self.random.next_f64() > 0.5 {
            ExerciseItem::Recognition(build_recognition(entry, self.random.as_mut()))
        } else {
            ExerciseItem::Recall(build_recall(entry))
        };

        tracing::debug!(
            "Round {}/{}: {:?} item for character {}",
            snapshot.index,
            snapshot.total,
            item.kind(),
            item.entry().id
        );

        self.current = Some(item.clone());
        Ok(ExerciseRound {
            session: snapshot,
            item,
        })
    }

    /// Score the current item.
    ///
    /// A missed recall item is added to the durable missed-items set. If that
    /// write fails, the round is not logged and the session is returned as is.
    pub fn answer(&mut self, correct: bool) -> AnswerOutcome {
        let (Some(session), Some(item)) = (self.session.as_mut(), self.current.as_ref()) else {
            return AnswerOutcome {
                session: None,
                finished: false,
            };
        };

        if correct {
            session.score = session.score.saturating_add(self.settings.points_per_correct);
        } else if item.kind() == ExerciseKind::Recall {
            if let Err(e) = record_missed(
                self.store.as_ref(),
                &self.settings.missed_items_key,
                &item.entry().id,
            ) {
                tracing::warn!("Failed to record missed item {}: {}", item.entry().id, e);
                return AnswerOutcome {
                    session: Some(session.clone()),
                    finished: false,
                };
            }
        }

        session.log.push(LogEntry {
            character_id: item.entry().id.clone(),
            record: item.entry().clone(),
            exercise_type: item.kind(),
            was_correct: correct,
        });

        AnswerOutcome {
            finished: session.is_exhausted(),
            session: Some(session.clone()),
        }
    }

    pub fn current_item(&self) -> Option<&ExerciseItem> {
        self.current.as_ref()
    }

    pub fn current_session(&self) -> Option<&ExerciseSession> {
        self.session.as_ref()
    }

    /// Partition the session log into right and wrong answers.
    pub fn result_summary(&self) -> Option<ResultSummary> {
        let session = self.session.as_ref()?;
        let (right, wrong): (Vec<LogEntry>, Vec<LogEntry>) =
            session.log.iter().cloned().partition(|entry| entry.was_correct);

        Some(ResultSummary {
            score: session.score,
            total_score: session.total.saturating_mul(self.settings.points_per_correct),
            right,
            wrong,
        })
    }

    /// IDs of recall items the learner has missed, across sessions.
    pub fn missed_items(&self) -> Vec<String> {
        storage::read_or_default(
            self.store.as_ref(),
            &self.settings.missed_items_key,
            Vec::new(),
        )
        .into_value()
    }

    pub fn settings(&self) -> &ExerciseSettings {
        &self.settings
    }
}

/// Standard-curriculum records are preferred; the full set is used otherwise.
fn pick_entry<'a>(
    repository: &'a CharacterRepository,
    random: &mut dyn RandomSource,
) -> Option<&'a CharacterRecord> {
    let standard: Vec<&CharacterRecord> = repository
        .records()
        .iter()
        .filter(|r| !r.is_exceptional)
        .collect();

    let pool: Vec<&CharacterRecord> = if standard.is_empty() {
        repository.records().iter().collect()
    } else {
        standard
    };

    if pool.is_empty() {
        return None;
    }
    pool.get(random.next_index(pool.len())).copied()
}

fn build_recognition(entry: CharacterRecord, random: &mut dyn RandomSource) -> RecognitionItem {
    let framing = if random.next_f64() > 0.5 {
        Script::Primary
    } else {
        Script::Counterpart
    };
    let show_correct = random.next_f64() > 0.5;

    let glyph_for = |script: Script| match script {
        Script::Primary => entry.primary_glyph().to_string(),
        Script::Counterpart => entry.counterpart_char.clone(),
    };

    let display_script = if show_correct { framing } else { framing.other() };
    let prompt = match framing {
        Script::Primary => PROMPT_PRIMARY_RECOGNITION,
        Script::Counterpart => PROMPT_COUNTERPART_RECOGNITION,
    };

    RecognitionItem {
        prompt: prompt.to_string(),
        display_glyph: glyph_for(display_script),
        display_script,
        expected_answer: show_correct,
        reveal_glyph: glyph_for(framing),
        reveal_script: framing,
        entry,
    }
}

fn build_recall(entry: CharacterRecord) -> RecallItem {
    let reading = entry
        .first_on_reading()
        .filter(|r| !r.is_empty())
        .unwrap_or(READING_PLACEHOLDER)
        .to_string();

    let reveal_glyph = match entry.primary_glyph() {
        "" => GLYPH_PLACEHOLDER.to_string(),
        glyph => glyph.to_string(),
    };

    RecallItem {
        prompt: PROMPT_RECALL.to_string(),
        display_glyph: entry.counterpart_char.clone(),
        display_script: Script::Counterpart,
        reading,
        reveal_glyph,
        reveal_script: Script::Primary,
        entry,
    }
}

fn record_missed(store: &dyn KeyValueStore, key: &str, id: &str) -> Result<(), StorageError> {
    if id.is_empty() {
        return Ok(());
    }

    let mut missed: Vec<String> = storage::read_or_default(store, key, Vec::new()).into_value();
    if missed.iter().any(|m| m == id) {
        return Ok(());
    }

    missed.push(id.to_string());
    storage::write_json(store, key, &missed)
}

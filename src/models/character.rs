use serde::{Deserialize, Serialize};

/// Full-width parenthesis that opens an annotation on the main glyph, e.g. `弁（辨）`.
pub const ANNOTATION_OPEN: char = '（';

/// Flag value marking a character as part of the standard curriculum list.
pub const STANDARD_FLAG: &str = "否";

/// Placeholder values the dataset uses for "no value".
pub const PLACEHOLDERS: [&str; 2] = ["-", "—"];

/// Returns true for the dash / em-dash placeholders used in the dataset.
pub fn is_placeholder(value: &str) -> bool {
    PLACEHOLDERS.contains(&value)
}

/// One character of the study dataset.
///
/// Records are immutable once parsed. The parser guarantees a non-empty `id`
/// and at least one of `main_form` / `counterpart_char`.
///
/// # Related Types
///
/// - [`crate::services::dataset::parse_dataset`]: Produces records from raw text
/// - [`crate::services::repository::CharacterRepository`]: Holds and searches records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub id: String,

    /// Japanese glyph, possibly followed by a `（…）` annotation
    pub main_form: String,

    pub on_readings: Vec<String>,
    pub kun_readings: Vec<String>,
    pub example_usage: String,
    pub level: String,

    /// Chinese glyph paired with `main_form`
    pub counterpart_char: String,

    /// Pinyin readings of the counterpart glyph
    pub counterpart_readings: Vec<String>,

    /// True when the character is outside the standard curriculum list
    pub is_exceptional: bool,
}

impl CharacterRecord {
    /// The main glyph with any full-width parenthetical annotation stripped.
    pub fn primary_glyph(&self) -> &str {
        self.main_form
            .split(ANNOTATION_OPEN)
            .next()
            .unwrap_or_default()
            .trim()
    }

    pub fn counterpart_glyph(&self) -> &str {
        self.counterpart_char.trim()
    }

    /// First on-reading, if the record has any.
    pub fn first_on_reading(&self) -> Option<&str> {
        self.on_readings.first().map(String::as_str)
    }

    pub fn joined_on_readings(&self) -> String {
        self.on_readings.join(",")
    }

    pub fn joined_kun_readings(&self) -> String {
        self.kun_readings.join(",")
    }

    pub fn joined_counterpart_readings(&self) -> String {
        self.counterpart_readings.join(",")
    }

    /// Records need an id and at least one glyph to be kept.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty() && (!self.main_form.is_empty() || !self.counterpart_char.is_empty())
    }
}

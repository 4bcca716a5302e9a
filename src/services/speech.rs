use crate::models::is_placeholder;

/// Text to read aloud and the locale to read it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub locale: String,
}

/// Platform text-to-speech capability. Fire-and-forget.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechBackend: Send {
    fn speak(&self, utterance: &Utterance);

    /// Stop any readout in progress
    fn cancel(&self);
}

/// Backend for machines without audio output; utterances are only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentBackend;

impl SpeechBackend for SilentBackend {
    fn speak(&self, utterance: &Utterance) {
        tracing::debug!("Readout [{}]: {}", utterance.locale, utterance.text);
    }

    fn cancel(&self) {
        tracing::debug!("Readout cancelled");
    }
}

/// Front for a [`SpeechBackend`] that drops empty text and dash placeholders.
pub struct Readout {
    backend: Box<dyn SpeechBackend>,
}

impl Readout {
    pub fn new(backend: Box<dyn SpeechBackend>) -> Self {
        Self { backend }
    }

    pub fn silent() -> Self {
        Self::new(Box::new(SilentBackend))
    }

    /// Read `text` aloud in `locale` (e.g. `ja-JP`).
    pub fn speak(&self, text: &str, locale: &str) {
        if text.is_empty() || is_placeholder(text) {
            return;
        }
        self.backend.speak(&Utterance {
            text: text.to_string(),
            locale: locale.to_string(),
        });
    }

    pub fn cancel(&self) {
        self.backend.cancel();
    }
}

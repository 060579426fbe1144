//! Spoken output
//!
//! The assistant talks through this seam; a real text-to-speech engine would
//! implement `SpeechSynthesizer`, the console version just prints.

use std::sync::Mutex;

pub trait SpeechSynthesizer {
    /// Queue `text` for playback. Must not block on audio.
    fn say(&self, text: &str);
}

/// Prints every line to stdout
#[derive(Debug, Default)]
pub struct ConsoleSpeaker;

impl SpeechSynthesizer for ConsoleSpeaker {
    fn say(&self, text: &str) {
        tracing::debug!(text, "speaking");
        println!("  🔊 {}", text);
    }
}

/// Keeps everything said, for tests and transcripts
#[derive(Debug, Default)]
pub struct RecordingSpeaker {
    lines: Mutex<Vec<String>>,
}

impl RecordingSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl SpeechSynthesizer for RecordingSpeaker {
    fn say(&self, text: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(text.to_string());
        }
    }
}

impl<T: SpeechSynthesizer + ?Sized> SpeechSynthesizer for &T {
    fn say(&self, text: &str) {
        (**self).say(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_speaker_keeps_order() {
        let speaker = RecordingSpeaker::new();
        speaker.say("one");
        speaker.say("two");
        assert_eq!(speaker.lines(), vec!["one", "two"]);
    }
}

//! Line-based recognizer input - lets a terminal or a script stand in for the speech engine
//!
//! Each stdin line is one recognizer callback:
//! - `code one two` - final result
//! - `~code on` - partial result
//! - `!network`, `!timeout`, `!nomatch`, `!error 7` - transport failures
//! - `:stop`, `:start` - the stop/start buttons

use crate::error::RecognizerError;
use crate::processor::UtteranceProcessor;
use crate::recognizer::Recognizer;

/// Events delivered by the speech engine or the user
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEvent {
    Preview(String),
    Final(String),
    Error(RecognizerError),
    Stop,
    Start,
}

/// Parse one input line, `None` for blank or unknown directives
pub fn parse_line(line: &str) -> Option<TranscriptEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(preview) = line.strip_prefix('~') {
        return Some(TranscriptEvent::Preview(preview.trim().to_string()));
    }

    if let Some(error) = line.strip_prefix('!') {
        let mut parts = error.split_whitespace();
        let error = match parts.next()?.to_lowercase().as_str() {
            "network" => RecognizerError::Network,
            "timeout" => RecognizerError::NetworkTimeout,
            "nomatch" => RecognizerError::NoMatch,
            "error" => {
                let code = parts.next().unwrap_or("");
                match code.parse() {
                    Ok(code) => RecognizerError::Client(code),
                    Err(_) => {
                        tracing::warn!("Invalid error code '{}' in '!error'", code);
                        return None;
                    }
                }
            }
            other => {
                tracing::warn!("Unknown error directive '!{}'", other);
                return None;
            }
        };
        return Some(TranscriptEvent::Error(error));
    }

    match line {
        ":stop" => Some(TranscriptEvent::Stop),
        ":start" => Some(TranscriptEvent::Start),
        _ if line.starts_with(':') => {
            tracing::warn!("Unknown directive '{}'", line);
            None
        }
        _ => Some(TranscriptEvent::Final(line.to_string())),
    }
}

/// Feed one event to the processor
pub fn handle_transcript<R: Recognizer>(
    event: TranscriptEvent,
    processor: &mut UtteranceProcessor<R>,
    partial_results: bool,
) {
    match event {
        TranscriptEvent::Preview(text) => {
            if partial_results {
                let words: Vec<&str> = text.split_whitespace().collect();
                processor.on_partial(&words);
            }
        }
        TranscriptEvent::Final(text) => {
            processor.process_utterance(&text);
        }
        TranscriptEvent::Error(error) => processor.on_error(error),
        TranscriptEvent::Stop => processor.stop(),
        TranscriptEvent::Start => processor.start(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputRecord;
    use crate::recognizer::ManualRecognizer;
    use crate::render::{Notifier, SessionEvent};
    use crate::vocabulary::Vocabulary;

    #[test]
    fn test_parse_final_and_preview() {
        assert_eq!(
            parse_line("  code one "),
            Some(TranscriptEvent::Final("code one".to_string()))
        );
        assert_eq!(
            parse_line("~code o"),
            Some(TranscriptEvent::Preview("code o".to_string()))
        );
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_line("!network"),
            Some(TranscriptEvent::Error(RecognizerError::Network))
        );
        assert_eq!(
            parse_line("!TIMEOUT"),
            Some(TranscriptEvent::Error(RecognizerError::NetworkTimeout))
        );
        assert_eq!(
            parse_line("!error 7"),
            Some(TranscriptEvent::Error(RecognizerError::Client(7)))
        );
        assert_eq!(parse_line("!bogus"), None);
    }

    #[test]
    fn test_parse_error_needs_numeric_code() {
        assert_eq!(parse_line("!error abc"), None);
        assert_eq!(parse_line("!error"), None);
        assert_eq!(
            parse_line("!error -3"),
            Some(TranscriptEvent::Error(RecognizerError::Client(-3)))
        );
    }

    #[test]
    fn test_parse_buttons() {
        assert_eq!(parse_line(":stop"), Some(TranscriptEvent::Stop));
        assert_eq!(parse_line(":start"), Some(TranscriptEvent::Start));
        assert_eq!(parse_line(":nope"), None);
    }

    #[test]
    fn test_partial_results_can_be_disabled() {
        let (notifier, rx) = Notifier::new();
        let mut processor =
            UtteranceProcessor::new(Vocabulary::default(), ManualRecognizer::new(), notifier);

        handle_transcript(TranscriptEvent::Preview("code".into()), &mut processor, false);
        assert!(rx.is_empty());

        handle_transcript(TranscriptEvent::Preview("code".into()), &mut processor, true);
        assert_eq!(rx.try_recv().ok(), Some(SessionEvent::Preview("code".into())));
    }

    #[test]
    fn test_script_drives_processor() {
        let (notifier, _rx) = Notifier::new();
        let mut processor =
            UtteranceProcessor::new(Vocabulary::default(), ManualRecognizer::new(), notifier);

        for line in ["code one two", "!nomatch", "count three", "back"] {
            if let Some(event) = parse_line(line) {
                handle_transcript(event, &mut processor, true);
            }
            if processor.recognizer_mut().take_armed() {
                processor.on_ready();
            }
        }

        assert_eq!(processor.log().all(), &[OutputRecord::new("code", "12")]);
    }
}

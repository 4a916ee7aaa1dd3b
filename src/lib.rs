//! Voice command interpreter
//!
//! Turns a stream of speech-to-text results into `(command, value)` records.
//! Words are resolved against a fixed vocabulary: a content command such as
//! `code` opens a listening session, the digits that follow are collected and
//! flushed into one record. `back` removes the newest record, `reset` drops
//! whatever was being collected.

pub mod config;
pub mod error;
pub mod output;
pub mod processor;
pub mod recognizer;
pub mod render;
pub mod repl;
pub mod state;
pub mod vocabulary;

pub use config::Config;
pub use error::{RecognizerError, VocabularyError};
pub use output::{OutputLog, OutputRecord};
pub use processor::{UtteranceOutcome, UtteranceProcessor};
pub use recognizer::{ManualRecognizer, Recognizer};
pub use render::{Notifier, Renderer, SessionEvent};
pub use state::SessionState;
pub use vocabulary::{Vocabulary, Word};

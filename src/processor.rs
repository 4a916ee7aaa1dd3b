//! Utterance processor - turns recognized words into output records
//!
//! Every final recognition result goes through [`UtteranceProcessor::on_utterance`],
//! one word at a time:
//! 1. `back` - remove the newest record from the log
//! 2. `reset` - drop pending parameters, go back to waiting
//! 3. Content command - flush pending parameters, start listening
//! 4. Parameter (only while listening) - append to the pending buffer
//! 5. Anything else is noise and ignored
//!
//! Records flushed during an utterance are committed to the log together once
//! the whole utterance is processed. The recognizer is then re-armed unless the
//! user asked to stop.

use crate::error::RecognizerError;
use crate::output::{OutputLog, OutputRecord};
use crate::recognizer::Recognizer;
use crate::render::Notifier;
use crate::state::{SessionState, StateMachine, Transition};
use crate::vocabulary::{CommandKind, Vocabulary};

/// What a single utterance did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtteranceOutcome {
    /// The recognized text as shown to the user
    pub displayed_text: String,
    /// Records appended to the log, in order
    pub records: Vec<OutputRecord>,
    /// Records removed from the log by `back`, newest first
    pub removed: Vec<OutputRecord>,
    /// Number of `back` words, including those that found the log empty
    pub back_requests: usize,
    pub final_state: SessionState,
}

impl UtteranceOutcome {
    fn new(displayed_text: String) -> Self {
        Self {
            displayed_text,
            records: Vec::new(),
            removed: Vec::new(),
            back_requests: 0,
            final_state: SessionState::Preparing,
        }
    }

    pub fn back_requested(&self) -> bool {
        self.back_requests > 0
    }
}

/// Command/parameter recognition engine for one session
pub struct UtteranceProcessor<R: Recognizer> {
    vocabulary: Vocabulary,
    machine: StateMachine,
    log: OutputLog,
    recognizer: R,
    notifier: Notifier,
    /// Content command labelling the parameters being collected
    current_command: Option<String>,
    /// Canonical parameter values collected since the last flush
    pending: Vec<String>,
    /// Set by `stop`, suppresses re-arming until `start` or the next error
    stopping: bool,
}

impl<R: Recognizer> UtteranceProcessor<R> {
    pub fn new(vocabulary: Vocabulary, recognizer: R, notifier: Notifier) -> Self {
        Self {
            vocabulary,
            machine: StateMachine::new(),
            log: OutputLog::new(),
            recognizer,
            notifier,
            current_command: None,
            pending: Vec::new(),
            stopping: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.machine.state()
    }

    pub fn log(&self) -> &OutputLog {
        &self.log
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Content command of the last utterance, cleared by `reset`
    pub fn current_command(&self) -> Option<&str> {
        self.current_command.as_deref()
    }

    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    pub fn is_stopping(&self) -> bool {
        self.stopping
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    pub fn recognizer_mut(&mut self) -> &mut R {
        &mut self.recognizer
    }

    /// User asked to start recognition
    pub fn start(&mut self) {
        self.stopping = false;
        tracing::info!("Starting recognizer");
        self.recognizer.start_listening();
    }

    /// User asked to stop recognition
    ///
    /// An utterance already delivered still completes, it just won't re-arm.
    pub fn stop(&mut self) {
        self.stopping = true;
        tracing::info!("Stopping recognizer");
        self.recognizer.stop_listening();
        let transition = self.machine.prepare();
        self.announce(transition);
    }

    /// Recognizer is ready for speech
    pub fn on_ready(&mut self) {
        if let Some(transition) = self.machine.ready() {
            self.announce(transition);
        }
    }

    /// Advisory partial result, never touches state, buffer or log
    pub fn on_partial<S: AsRef<str>>(&self, words: &[S]) {
        self.notifier.preview(&join_words(words));
    }

    /// Recognizer transport failure
    ///
    /// The error a stopped recognizer delivers ends the stop: the flag is
    /// cleared without reporting or re-arming.
    pub fn on_error(&mut self, error: RecognizerError) {
        self.pending.clear();
        self.current_command = None;

        let stopped = std::mem::take(&mut self.stopping);
        if stopped {
            tracing::debug!("Recognizer error while stopping: {}", error);
        } else if error.is_reportable() {
            tracing::warn!("Recognizer error: {}", error);
            self.notifier.engine_error(&error.to_string());
        } else {
            tracing::debug!("Recognizer error: {}", error);
        }

        let transition = self.machine.prepare();
        self.announce(transition);
        if !stopped {
            self.rearm();
        }
    }

    /// Process raw recognizer text, split on whitespace
    pub fn process_utterance(&mut self, raw_text: &str) -> UtteranceOutcome {
        let words: Vec<&str> = raw_text.split_whitespace().collect();
        self.on_utterance(&words)
    }

    /// Process one final recognition result
    pub fn on_utterance<S: AsRef<str>>(&mut self, words: &[S]) -> UtteranceOutcome {
        let mut outcome = UtteranceOutcome::new(join_words(words));
        tracing::debug!("Utterance: \"{}\"", outcome.displayed_text);
        self.notifier.transcript(&outcome.displayed_text);

        self.current_command = None;
        self.pending.clear();

        for word in words {
            self.process_word(word.as_ref(), &mut outcome);
        }
        self.flush(&mut outcome.records);

        if !outcome.records.is_empty() {
            self.log.extend(outcome.records.iter().cloned());
            self.notifier.outputs_appended(outcome.records.clone());
        }

        let transition = self.machine.prepare();
        self.announce(transition);
        outcome.final_state = self.machine.state();

        self.rearm();
        outcome
    }

    fn process_word(&mut self, raw: &str, outcome: &mut UtteranceOutcome) {
        let word = raw.to_lowercase();

        if let Some(kind) = self.vocabulary.resolve_command(&word).map(|w| w.kind()) {
            match kind {
                CommandKind::Back => {
                    outcome.back_requests += 1;
                    match self.log.remove_last() {
                        Some(record) => {
                            tracing::info!("Removed: {}", record);
                            self.notifier.output_removed(record.clone());
                            outcome.removed.push(record);
                        }
                        None => tracing::debug!("Back with an empty log"),
                    }
                }
                CommandKind::Reset => {
                    if !self.pending.is_empty() {
                        tracing::debug!("Reset discards {:?}", self.pending);
                    }
                    self.pending.clear();
                    self.current_command = None;
                    let transition = self.machine.reset();
                    self.announce(transition);
                }
                CommandKind::Content(command) => {
                    self.flush(&mut outcome.records);
                    self.current_command = Some(command);
                    let transition = self.machine.content_command();
                    self.announce(transition);
                }
            }
            return;
        }

        if self.machine.is_listening() {
            if let Some(parameter) = self.vocabulary.resolve_parameter(&word) {
                self.pending.push(parameter.value.clone());
                return;
            }
        }

        tracing::debug!("Ignoring word '{}'", raw);
    }

    /// Turn pending parameters into a record, no-op when nothing is pending
    fn flush(&mut self, batch: &mut Vec<OutputRecord>) {
        if self.pending.is_empty() {
            return;
        }

        let value = self.pending.concat();
        self.pending.clear();

        let Some(command) = self.current_command.clone() else {
            tracing::warn!("Dropping parameters '{}' with no active command", value);
            return;
        };

        let record = OutputRecord::new(command, value);
        tracing::info!("Output: {}", record);
        batch.push(record);
    }

    fn announce(&self, transition: Transition) {
        if !transition.is_self() {
            tracing::info!("{}", transition.to);
        }
        self.notifier.state_changed(transition.to);
    }

    fn rearm(&mut self) {
        if self.stopping {
            tracing::debug!("Not re-arming, recognizer stopped");
            return;
        }
        self.recognizer.start_listening();
    }
}

fn join_words<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

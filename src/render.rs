//! Session notifications and terminal rendering
//!
//! The processor holds no display state. It sends [`SessionEvent`]s through a
//! [`Notifier`] and whoever holds the receiving end decides how to show them.

use std::io::{self, Write};

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{Clear, ClearType};

use crate::output::OutputRecord;
use crate::state::SessionState;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A transition fired (self-transitions included)
    StateChanged(SessionState),
    /// Text of the final utterance being processed
    Transcript(String),
    /// Advisory partial result, display only
    Preview(String),
    /// Records finalized by the most recent utterance
    OutputsAppended(Vec<OutputRecord>),
    /// The most recent record was removed by `back`
    OutputRemoved(OutputRecord),
    /// Recognizer transport failure worth showing to the user
    EngineError(String),
}

/// Sending half of the session event channel
#[derive(Clone)]
pub struct Notifier {
    tx: flume::Sender<SessionEvent>,
}

impl Notifier {
    pub fn new() -> (Self, flume::Receiver<SessionEvent>) {
        let (tx, rx) = flume::unbounded();
        (Self { tx }, rx)
    }

    pub fn state_changed(&self, state: SessionState) {
        let _ = self.tx.send(SessionEvent::StateChanged(state));
    }

    pub fn transcript(&self, text: &str) {
        let _ = self.tx.send(SessionEvent::Transcript(text.to_string()));
    }

    pub fn preview(&self, text: &str) {
        let _ = self.tx.send(SessionEvent::Preview(text.to_string()));
    }

    pub fn outputs_appended(&self, records: Vec<OutputRecord>) {
        let _ = self.tx.send(SessionEvent::OutputsAppended(records));
    }

    pub fn output_removed(&self, record: OutputRecord) {
        let _ = self.tx.send(SessionEvent::OutputRemoved(record));
    }

    pub fn engine_error(&self, message: &str) {
        let _ = self.tx.send(SessionEvent::EngineError(message.to_string()));
    }
}

/// Draws session events as lines on a terminal
pub struct Renderer<W: Write> {
    out: W,
    /// A preview line is on screen and gets overwritten by the next event
    preview_shown: bool,
    /// Records currently listed, numbered from 1
    listed: usize,
}

impl Renderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            preview_shown: false,
            listed: 0,
        }
    }

    pub fn render(&mut self, event: &SessionEvent) -> io::Result<()> {
        if self.preview_shown {
            queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
            self.preview_shown = false;
        }

        match event {
            SessionEvent::StateChanged(state) => {
                let text = match state {
                    SessionState::Waiting => state.text().green(),
                    SessionState::Listening => state.text().cyan(),
                    SessionState::Preparing => state.text().dark_grey(),
                };
                queue!(self.out, Print(format!("[{}]\n", text)))?;
            }
            SessionEvent::Transcript(text) => {
                queue!(self.out, Print(format!("> {}\n", text)))?;
            }
            SessionEvent::Preview(text) => {
                queue!(self.out, Print(text.as_str().dark_grey()))?;
                self.preview_shown = true;
            }
            SessionEvent::OutputsAppended(records) => {
                for record in records {
                    self.listed += 1;
                    queue!(
                        self.out,
                        Print(format!(
                            "  {:>3}. {} {}\n",
                            self.listed,
                            record.command.as_str().bold(),
                            record.value
                        ))
                    )?;
                }
            }
            SessionEvent::OutputRemoved(record) => {
                self.listed = self.listed.saturating_sub(1);
                queue!(
                    self.out,
                    Print(format!("  {} {}\n", "removed".yellow(), record))
                )?;
            }
            SessionEvent::EngineError(message) => {
                queue!(self.out, Print(format!("{}\n", message.as_str().red())))?;
            }
        }

        self.out.flush()
    }

    /// Render everything currently queued on the channel
    pub fn drain(&mut self, rx: &flume::Receiver<SessionEvent>) -> io::Result<()> {
        for event in rx.try_iter() {
            self.render(&event)?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(events: &[SessionEvent]) -> String {
        let mut renderer = Renderer::new(Vec::new());
        for event in events {
            renderer.render(event).unwrap();
        }
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_notifier_delivers_in_order() {
        let (notifier, rx) = Notifier::new();
        notifier.state_changed(SessionState::Listening);
        notifier.output_removed(OutputRecord::new("code", "1"));

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                SessionEvent::StateChanged(SessionState::Listening),
                SessionEvent::OutputRemoved(OutputRecord::new("code", "1")),
            ]
        );
    }

    #[test]
    fn test_notifier_survives_dropped_receiver() {
        let (notifier, rx) = Notifier::new();
        drop(rx);
        notifier.transcript("code one");
    }

    #[test]
    fn test_render_records_numbered() {
        let out = rendered(&[SessionEvent::OutputsAppended(vec![
            OutputRecord::new("code", "12"),
            OutputRecord::new("count", "3"),
        ])]);

        assert!(out.contains("1. "));
        assert!(out.contains("2. "));
        assert!(out.contains("12"));
    }

    #[test]
    fn test_render_state_and_transcript() {
        let out = rendered(&[
            SessionEvent::Transcript("code one".to_string()),
            SessionEvent::StateChanged(SessionState::Waiting),
        ]);

        assert!(out.contains("> code one"));
        assert!(out.contains("Waiting for commands"));
    }

    #[test]
    fn test_drain_empties_channel() {
        let (notifier, rx) = Notifier::new();
        notifier.engine_error("Network timeout error");
        notifier.preview("code on");

        let mut renderer = Renderer::new(Vec::new());
        renderer.drain(&rx).unwrap();
        assert!(rx.is_empty());

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("Network timeout error"));
        assert!(out.contains("code on"));
    }
}

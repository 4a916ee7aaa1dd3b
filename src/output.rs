//! Output log - finalized (command, value) records in the order they were made

use std::fmt;

use serde::Serialize;

/// A content command and its concatenated parameter values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub command: String,
    pub value: String,
}

impl OutputRecord {
    pub fn new(command: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for OutputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.command, self.value)
    }
}

/// Append-only list of records, except for removing the newest one
#[derive(Debug, Default)]
pub struct OutputLog {
    records: Vec<OutputRecord>,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: OutputRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = OutputRecord>) {
        self.records.extend(records);
    }

    /// Remove the most recent record, `None` if the log is empty
    pub fn remove_last(&mut self) -> Option<OutputRecord> {
        self.records.pop()
    }

    /// All records in insertion order
    pub fn all(&self) -> &[OutputRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&OutputRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

//! Thread-safe append-only audit log.
//!
//! Every event is written as one complete line under a single lock, so
//! lines from concurrent writers never interleave. The structured event
//! history is kept alongside the text sink for inspection after a game.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::events::GameEvent;

struct Journal {
    sink: Option<Box<dyn Write + Send>>,
    history: Vec<GameEvent>,
}

impl Journal {
    fn append(&mut self, event: GameEvent) {
        let failed = match self.sink.as_mut() {
            Some(sink) => writeln!(sink, "{event}").and_then(|()| sink.flush()).err(),
            None => None,
        };
        if let Some(err) = failed {
            // Keep the history; stop writing to a broken sink.
            log::warn!("audit sink failed, dropping it: {err}");
            self.sink = None;
        }
        self.history.push(event);
    }
}

/// Serialized event log shared by the coordinator and every worker.
pub struct AuditLog {
    journal: Mutex<Journal>,
}

impl AuditLog {
    /// Log to an arbitrary writer.
    pub fn new(sink: impl Write + Send + 'static) -> Self {
        Self::with_sink(Some(Box::new(sink)))
    }

    /// Log to a file, truncating it.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }

    /// Keep only the in-memory history.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_sink(None)
    }

    fn with_sink(sink: Option<Box<dyn Write + Send>>) -> Self {
        Self {
            journal: Mutex::new(Journal {
                sink,
                history: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Journal> {
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one event.
    pub fn record(&self, event: GameEvent) {
        self.lock().append(event);
    }

    /// Append several events with no other writer in between.
    pub fn record_all(&self, events: impl IntoIterator<Item = GameEvent>) {
        let mut journal = self.lock();
        for event in events {
            journal.append(event);
        }
    }

    /// Snapshot of every event recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<GameEvent> {
        self.lock().history.clone()
    }

    /// The log as text lines, as written to the sink.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lock().history.iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().history.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flush and release the sink. Later events are kept in memory only.
    pub fn close(&self) -> io::Result<()> {
        match self.lock().sink.take() {
            Some(mut sink) => sink.flush(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let journal = self.lock();
        f.debug_struct("AuditLog")
            .field("events", &journal.history.len())
            .field("open", &journal.sink.is_some())
            .finish()
    }
}

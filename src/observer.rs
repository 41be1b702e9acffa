use crate::error::{AdvisorError, Result};
use crate::recommendation::Evaluation;
use crate::state::GameState;
use crossbeam_channel::{bounded, Sender};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::thread;

/// Default queue depth between evaluators and the writer thread.
pub const DEFAULT_QUEUE_RECORDS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Mulligan,
    Playables,
}

/// One evaluated request, as handed to observers after ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub kind: RequestKind,
    /// SHA-256 over the canonical JSON of the evaluated input.
    pub state_digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn: Option<u32>,
    pub evaluation: Evaluation,
}

fn digest_json<T: Serialize + ?Sized>(value: &T) -> String {
    let bytes = serde_json::to_vec(value).unwrap_or_default();
    hex::encode(Sha256::digest(&bytes))
}

impl EvaluationRecord {
    pub fn for_mulligan(hand: &[String], catalog_fingerprint: Option<&str>, eval: &Evaluation) -> Self {
        Self {
            kind: RequestKind::Mulligan,
            state_digest: digest_json(hand),
            catalog_fingerprint: catalog_fingerprint.map(str::to_string),
            turn: None,
            evaluation: eval.clone(),
        }
    }

    pub fn for_playables(state: &GameState, catalog_fingerprint: Option<&str>, eval: &Evaluation) -> Self {
        Self {
            kind: RequestKind::Playables,
            state_digest: digest_json(state),
            catalog_fingerprint: catalog_fingerprint.map(str::to_string),
            turn: Some(state.turn),
            evaluation: eval.clone(),
        }
    }
}

/// Side channel notified after every evaluation. Failures are logged, never surfaced.
pub trait EvaluationObserver: Send + Sync {
    fn observe(&self, record: &EvaluationRecord) -> Result<()>;
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    records: Mutex<Vec<EvaluationRecord>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<EvaluationRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EvaluationObserver for CollectingObserver {
    fn observe(&self, record: &EvaluationRecord) -> Result<()> {
        self.records
            .lock()
            .map_err(|_| AdvisorError::Observer("collector lock poisoned".to_string()))?
            .push(record.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverStats {
    pub total_lines: u64,
    pub sha256_hex: String,
}

enum RecordMsg {
    Line(Vec<u8>),
    End,
}

struct WriterParts {
    tx: Sender<RecordMsg>,
    join: thread::JoinHandle<io::Result<ObserverStats>>,
}

/// JSONL sink: records are serialized by the caller and written by a background thread.
pub struct JsonlObserver {
    parts: Mutex<Option<WriterParts>>,
}

impl JsonlObserver {
    /// Open `path` for appending, creating it when missing. Earlier records are kept.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())
            .map_err(|e| AdvisorError::Observer(format!("Failed to open {}: {e}", path.as_ref().display())))?;
        Ok(Self::from_writer(file, DEFAULT_QUEUE_RECORDS))
    }

    pub fn from_writer<W: Write + Send + 'static>(writer: W, queue_records: usize) -> Self {
        let (tx, rx) = bounded::<RecordMsg>(queue_records.max(1));
        let join = thread::spawn(move || -> io::Result<ObserverStats> {
            let mut out = BufWriter::new(writer);
            let mut hasher = Sha256::new();
            let mut total_lines: u64 = 0;
            while let Ok(msg) = rx.recv() {
                match msg {
                    RecordMsg::Line(line) => {
                        out.write_all(&line)?;
                        out.write_all(b"\n")?;
                        hasher.update(&line);
                        hasher.update(b"\n");
                        total_lines = total_lines.saturating_add(1);
                    }
                    RecordMsg::End => break,
                }
            }
            out.flush()?;
            Ok(ObserverStats {
                total_lines,
                sha256_hex: hex::encode(hasher.finalize()),
            })
        });
        Self {
            parts: Mutex::new(Some(WriterParts { tx, join })),
        }
    }

    /// Flush and stop the writer thread. Later records are rejected.
    pub fn finish(&self) -> Result<ObserverStats> {
        let parts = self
            .parts
            .lock()
            .map_err(|_| AdvisorError::Observer("writer lock poisoned".to_string()))?
            .take()
            .ok_or_else(|| AdvisorError::Observer("observer already finished".to_string()))?;
        parts
            .tx
            .send(RecordMsg::End)
            .map_err(|_| AdvisorError::Observer("writer channel closed".to_string()))?;
        parts
            .join
            .join()
            .map_err(|_| AdvisorError::Observer("writer thread panicked".to_string()))?
            .map_err(|e| AdvisorError::Observer(format!("write failed: {e}")))
    }
}

impl EvaluationObserver for JsonlObserver {
    fn observe(&self, record: &EvaluationRecord) -> Result<()> {
        let line = serde_json::to_vec(record)
            .map_err(|e| AdvisorError::Observer(format!("serialize failed: {e}")))?;
        let tx = self
            .parts
            .lock()
            .map_err(|_| AdvisorError::Observer("writer lock poisoned".to_string()))?
            .as_ref()
            .map(|p| p.tx.clone())
            .ok_or_else(|| AdvisorError::Observer("observer already finished".to_string()))?;
        tx.send(RecordMsg::Line(line))
            .map_err(|_| AdvisorError::Observer("writer channel closed".to_string()))
    }
}

impl Drop for JsonlObserver {
    fn drop(&mut self) {
        if let Ok(slot) = self.parts.get_mut() {
            if let Some(parts) = slot.take() {
                let _ = parts.tx.send(RecordMsg::End);
                let _ = parts.join.join();
            }
        }
    }
}

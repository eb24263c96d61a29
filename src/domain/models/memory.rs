//! Memory record domain model.
//!
//! One durable unit of swarm experience: what was attempted, what happened,
//! and how confident the swarm is that it worked. Records are append-only;
//! after creation only the caller-supplied feedback annotation may change,
//! and only the evolution engine's pruning step deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier assigned by the knowledge store at append time.
pub type RecordId = i64;

/// Summaries keep the first `SUMMARY_HEAD_WORDS` and last
/// `SUMMARY_TAIL_WORDS` words of outcomes longer than `SUMMARY_MAX_WORDS`.
pub const SUMMARY_MAX_WORDS: usize = 60;
const SUMMARY_HEAD_WORDS: usize = 40;
const SUMMARY_TAIL_WORDS: usize = 10;

/// A persisted memory record as read back from the knowledge store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryRecord {
    /// Store-assigned identifier, immutable.
    pub id: RecordId,
    /// Free-text description of what was attempted.
    pub action: String,
    /// Free-text description of what happened.
    pub outcome: String,
    /// Gate score (0-100) the record was written under. Always at or above
    /// the store's eligibility threshold at write time.
    pub eligibility_score: f64,
    /// How successful the outcome was (0.0-1.0).
    pub confidence: f64,
    /// Optional annotation set by a later caller, never by the writer.
    pub feedback: Option<String>,
    /// Condensed form of `outcome`, computed once at write time.
    pub summary: String,
    /// Open key-value context (e.g. which agent produced it).
    pub metadata: HashMap<String, serde_json::Value>,
    /// Set once at append time, immutable.
    pub created_at: DateTime<Utc>,
}

impl MemoryRecord {
    /// Rough token estimate for export sizing (~4 chars per token).
    pub fn token_estimate(&self) -> usize {
        (self.action.len() + self.outcome.len() + self.summary.len()) / 4
    }
}

/// A record as submitted for appending, before the store assigns an id,
/// timestamp, and summary.
#[derive(Debug, Clone)]
pub struct NewMemoryRecord {
    pub action: String,
    pub outcome: String,
    pub eligibility_score: f64,
    pub confidence: f64,
    pub feedback: Option<String>,
    pub metadata: HashMap<String, serde_json::Value>,
}

impl NewMemoryRecord {
    pub fn new(action: impl Into<String>, outcome: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            outcome: outcome.into(),
            eligibility_score: 100.0,
            confidence: 0.8,
            feedback: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_eligibility(mut self, score: f64) -> Self {
        self.eligibility_score = score;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Condense an outcome for low-cost scanning.
///
/// Outcomes of up to [`SUMMARY_MAX_WORDS`] words pass through unchanged;
/// longer ones keep the head and tail with an ellipsis between.
pub fn summarize(outcome: &str) -> String {
    let words: Vec<&str> = outcome.split_whitespace().collect();
    if words.len() <= SUMMARY_MAX_WORDS {
        return outcome.to_string();
    }
    let head = words[..SUMMARY_HEAD_WORDS].join(" ");
    let tail = words[words.len() - SUMMARY_TAIL_WORDS..].join(" ");
    format!("{head} ... {tail}")
}

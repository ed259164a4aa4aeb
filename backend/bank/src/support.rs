//! # Support Inbox
//!
//! Messages visitors leave through the support form, kept newest first in one JSON
//! file. Every change rewrites the file.
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{BankError, write_atomic};

pub const SUPPORT_FILE: &str = "support-messages.json";

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
    pub read: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadFilter {
    #[default]
    All,
    Unread,
    Read,
}

impl ReadFilter {
    fn admits(&self, message: &SupportMessage) -> bool {
        match self {
            ReadFilter::All => true,
            ReadFilter::Unread => !message.read,
            ReadFilter::Read => message.read,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown read filter '{0}', expected all, unread or read")]
pub struct UnknownReadFilter(pub String);

impl FromStr for ReadFilter {
    type Err = UnknownReadFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(ReadFilter::All),
            "unread" => Ok(ReadFilter::Unread),
            "read" => Ok(ReadFilter::Read),
            _ => Err(UnknownReadFilter(s.to_string())),
        }
    }
}

pub struct SupportInbox {
    path: PathBuf,
    messages: Vec<SupportMessage>,
}

impl SupportInbox {
    /// Opens the inbox in `data_dir`, starting empty when no file exists yet.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, BankError> {
        let path = data_dir.as_ref().join(SUPPORT_FILE);

        let messages = if path.exists() {
            serde_json::from_slice(&fs::read(&path)?)?
        } else {
            Vec::new()
        };

        Ok(Self { path, messages })
    }

    pub fn submit(&mut self, name: &str, email: &str, message: &str) -> Result<SupportMessage, BankError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(BankError::EmptyMessage);
        }

        let submitted_at = Utc::now();
        let entry = SupportMessage {
            id: next_id(&submitted_at),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message: message.to_string(),
            submitted_at,
            read: false,
        };

        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.push(entry.clone());
        messages.extend(self.messages.iter().cloned());
        self.commit(messages)?;
        info!("Support message {} received", entry.id);

        Ok(entry)
    }

    pub fn list(&self, filter: ReadFilter) -> Vec<SupportMessage> {
        self.messages
            .iter()
            .filter(|message| filter.admits(message))
            .cloned()
            .collect()
    }

    pub fn mark_read(&mut self, id: &str, read: bool) -> Result<SupportMessage, BankError> {
        let position = self.position(id)?;

        let mut messages = self.messages.clone();
        messages[position].read = read;
        let updated = messages[position].clone();
        self.commit(messages)?;

        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> Result<SupportMessage, BankError> {
        let position = self.position(id)?;

        let mut messages = self.messages.clone();
        let removed = messages.remove(position);
        self.commit(messages)?;

        Ok(removed)
    }

    /// Drops every message, returning how many there were.
    pub fn clear(&mut self) -> Result<usize, BankError> {
        let cleared = self.messages.len();
        self.commit(Vec::new())?;
        info!("Cleared {cleared} support messages");

        Ok(cleared)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|message| !message.read).count()
    }

    fn position(&self, id: &str) -> Result<usize, BankError> {
        self.messages
            .iter()
            .position(|message| message.id == id)
            .ok_or_else(|| BankError::MessageNotFound(id.to_string()))
    }

    /// Writes `messages` and only then swaps them in, so a failed write changes nothing.
    fn commit(&mut self, messages: Vec<SupportMessage>) -> Result<(), BankError> {
        write_atomic(&self.path, &serde_json::to_vec_pretty(&messages)?)?;
        self.messages = messages;

        Ok(())
    }
}

/// Base-36 millisecond timestamp followed by a base-36 sequence number.
fn next_id(at: &DateTime<Utc>) -> String {
    let millis = u64::try_from(at.timestamp_millis()).unwrap_or_default();
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);

    format!("{}{}", base36(millis), base36(sequence))
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if n == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while n > 0 {
        digits.push(DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }

    digits.iter().rev().collect()
}

//! Report delivery.
//!
//! [`OutboxDelivery`] drops each report into a directory as a pair of files:
//! the rendered document and a JSON envelope naming the recipient. A mail
//! relay (or a person) picks them up from there.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{DeliveryError, DeliveryResult};
use crate::render::Document;

/// Default outbox directory (relative to current dir)
pub const DEFAULT_OUTBOX_DIR: &str = "outbox";

/// Subject line used for every report.
pub const REPORT_SUBJECT: &str = "Terminal settlement summary";

/// Hands a rendered document to its recipient.
pub trait Delivery: Send + Sync {
    fn deliver(
        &self,
        document: &Document,
        file_name: &str,
        recipient: &str,
    ) -> DeliveryResult<DeliveryReceipt>;
}

/// Envelope written next to each delivered document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    /// Unique message identifier
    pub id: String,
    pub to: String,
    pub subject: String,
    /// File name of the document inside the outbox
    pub attachment: String,
    pub page_count: usize,
    pub created_at: String,
}

/// File-drop delivery into a directory.
#[derive(Debug, Clone)]
pub struct OutboxDelivery {
    outbox_dir: PathBuf,
}

impl OutboxDelivery {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            outbox_dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn outbox_dir(&self) -> &Path {
        &self.outbox_dir
    }

    /// Every receipt currently in the outbox, oldest first.
    pub fn list(&self) -> Vec<DeliveryReceipt> {
        let entries = match fs::read_dir(&self.outbox_dir) {
            Ok(e) => e,
            Err(_) => return Vec::new(),
        };

        let mut receipts: Vec<DeliveryReceipt> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == "json"))
            .filter_map(|path| fs::read_to_string(path).ok())
            .filter_map(|content| serde_json::from_str(&content).ok())
            .collect();
        receipts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        receipts
    }
}

impl Default for OutboxDelivery {
    fn default() -> Self {
        Self::new(DEFAULT_OUTBOX_DIR)
    }
}

/// Minimal address check: something on each side of a single `@`.
pub fn validate_recipient(recipient: &str) -> DeliveryResult<()> {
    if is_plausible_address(recipient.trim()) {
        Ok(())
    } else {
        Err(DeliveryError::InvalidRecipient(recipient.to_string()))
    }
}

fn is_plausible_address(address: &str) -> bool {
    if address.contains(char::is_whitespace) {
        return false;
    }
    match address.split_once('@') {
        Some((user, domain)) => !user.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

impl Delivery for OutboxDelivery {
    fn deliver(
        &self,
        document: &Document,
        file_name: &str,
        recipient: &str,
    ) -> DeliveryResult<DeliveryReceipt> {
        validate_recipient(recipient)?;
        fs::create_dir_all(&self.outbox_dir)?;

        let id = Uuid::new_v4().to_string();
        let attachment = format!("{}-{}", id, sanitize(file_name));

        fs::write(self.outbox_dir.join(&attachment), document.to_bytes())?;

        let receipt = DeliveryReceipt {
            id: id.clone(),
            to: recipient.trim().to_string(),
            subject: REPORT_SUBJECT.to_string(),
            attachment,
            page_count: document.page_count(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        let envelope = serde_json::to_string_pretty(&receipt)?;
        fs::write(self.outbox_dir.join(format!("{}.json", id)), envelope)?;

        Ok(receipt)
    }
}

/// Keep file names to a safe character set.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '-' })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "report.txt".to_string()
    } else {
        cleaned
    }
}

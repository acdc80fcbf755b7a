//! List reconciliation: one dashboard submission in, the next configuration
//! document out.
//!
//! A submission is parsed into TYPED operations, applied per list in a FIXED
//! order (adds, then deletes, then positional edits) regardless of their
//! order in the batch. Positional edits index into the list AS RESHAPED by
//! the structural operations: deleting an earlier entry shifts later rows up,
//! so an edit submitted for position `i` lands on whatever occupies position
//! `i` afterwards.

use std::collections::{BTreeMap, HashMap};

use crate::document::{ConfigDocument, DeliveryMode, Target, TemplateChoice, KEYWORD_PLACEHOLDER};

/// One structural or positional edit to the keyword list.
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordOp {
    /// Append the placeholder keyword.
    Add,
    /// Remove EVERY keyword equal to the value.
    Delete(String),
    /// Overwrite the keyword at a position of the post-structural list.
    SetAt(usize, String),
}

/// One structural or positional edit to the target list.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetOp {
    /// Append the placeholder target row.
    Add,
    /// Remove EVERY target whose id equals the value, blank ids included.
    Delete(String),
    /// Patch the target at a position of the post-structural list.
    SetAt(usize, TargetPatch),
}

/// Field-level overwrite for one target row. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetPatch {
    pub id: Option<String>,
    pub name: Option<String>,
    pub delivery_mode: Option<DeliveryMode>,
    pub template_choice: Option<TemplateChoice>,
    pub custom_reply: Option<String>,
}

impl TargetPatch {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(&self, target: &mut Target) {
        if let Some(ref id) = self.id {
            if !id.is_empty() {
                target.id = id.clone();
            }
        }
        if let Some(ref name) = self.name {
            if !name.is_empty() {
                target.name = name.clone();
            }
        }
        if let Some(mode) = self.delivery_mode {
            target.delivery_mode = mode;
        }
        if let Some(choice) = self.template_choice {
            target.template_choice = choice;
        }
        if let Some(ref custom) = self.custom_reply {
            if !custom.is_empty() {
                target.custom_reply = custom.clone();
            }
        }
    }
}

/// One dashboard submission, parsed into typed operations.
#[derive(Debug, Clone, Default)]
pub struct ReconcileBatch {
    pub keyword_ops: Vec<KeywordOp>,
    pub target_ops: Vec<TargetOp>,
    /// Wholesale template replacement; `None` or empty keeps the existing text.
    pub primary_template: Option<String>,
    pub alternate_template: Option<String>,
    /// Revision the operator's form was rendered from, for stale-write checks.
    pub revision: Option<u64>,
}

impl ReconcileBatch {
    /// Parse a dashboard form submission (unordered field map).
    ///
    /// Field protocol: `keyword_<i>`, `target_id_<i>`, `target_name_<i>`,
    /// `target_mode_<i>`, `target_template_<i>`, `target_custom_<i>`, the
    /// add/delete signals `add_keyword` / `delete_keyword` / `add_target` /
    /// `delete_target`, the textareas `primary_template` /
    /// `alternate_template`, and the hidden `revision`.
    ///
    /// Empty edit values and unparseable enum values are dropped, never
    /// failed: a submission always reconciles.
    pub fn from_form(fields: &HashMap<String, String>) -> Self {
        let mut batch = Self::default();

        if fields.get("add_keyword").is_some_and(|v| !v.is_empty()) {
            batch.keyword_ops.push(KeywordOp::Add);
        }
        if let Some(value) = fields.get("delete_keyword").filter(|v| !v.is_empty()) {
            batch.keyword_ops.push(KeywordOp::Delete(value.clone()));
        }
        let mut keyword_edits = BTreeMap::new();
        for (key, value) in fields {
            if let Some(idx) = indexed(key, "keyword_") {
                if !value.is_empty() {
                    keyword_edits.insert(idx, value.clone());
                }
            }
        }
        for (idx, value) in keyword_edits {
            batch.keyword_ops.push(KeywordOp::SetAt(idx, value));
        }

        if fields.get("add_target").is_some_and(|v| !v.is_empty()) {
            batch.target_ops.push(TargetOp::Add);
        }
        if let Some(id) = fields.get("delete_target") {
            // A blank id is a valid deletion token: it sweeps every
            // freshly added, still-unedited row at once.
            batch.target_ops.push(TargetOp::Delete(id.clone()));
        }
        let mut patches: BTreeMap<usize, TargetPatch> = BTreeMap::new();
        for (key, value) in fields {
            if value.is_empty() {
                continue;
            }
            if let Some(idx) = indexed(key, "target_id_") {
                patches.entry(idx).or_default().id = Some(value.clone());
            } else if let Some(idx) = indexed(key, "target_name_") {
                patches.entry(idx).or_default().name = Some(value.clone());
            } else if let Some(idx) = indexed(key, "target_mode_") {
                patches.entry(idx).or_default().delivery_mode = DeliveryMode::parse(value);
            } else if let Some(idx) = indexed(key, "target_template_") {
                patches.entry(idx).or_default().template_choice = TemplateChoice::parse(value);
            } else if let Some(idx) = indexed(key, "target_custom_") {
                patches.entry(idx).or_default().custom_reply = Some(value.clone());
            }
        }
        for (idx, patch) in patches {
            if !patch.is_empty() {
                batch.target_ops.push(TargetOp::SetAt(idx, patch));
            }
        }

        batch.primary_template = fields.get("primary_template").cloned();
        batch.alternate_template = fields.get("alternate_template").cloned();
        batch.revision = fields.get("revision").and_then(|v| v.parse().ok());

        batch
    }
}

fn indexed(key: &str, prefix: &str) -> Option<usize> {
    key.strip_prefix(prefix)?.parse().ok()
}

/// Apply one batch to a document snapshot, producing the next document.
///
/// Keywords reconcile before targets; within each list the order is add →
/// delete → edit. Template texts replace wholesale only when non-empty; an
/// absent field never empties existing text. The revision is copied through
/// unchanged; the store enforces it on replace.
pub fn reconcile(doc: &ConfigDocument, batch: &ReconcileBatch) -> ConfigDocument {
    let mut next = doc.clone();

    for op in &batch.keyword_ops {
        if matches!(op, KeywordOp::Add) {
            next.keywords.push(KEYWORD_PLACEHOLDER.to_string());
        }
    }
    for op in &batch.keyword_ops {
        if let KeywordOp::Delete(value) = op {
            next.keywords.retain(|kw| kw != value);
        }
    }
    for op in &batch.keyword_ops {
        if let KeywordOp::SetAt(idx, value) = op {
            if value.is_empty() {
                continue;
            }
            if let Some(slot) = next.keywords.get_mut(*idx) {
                *slot = value.clone();
            }
        }
    }

    for op in &batch.target_ops {
        if matches!(op, TargetOp::Add) {
            next.targets.push(Target::default());
        }
    }
    for op in &batch.target_ops {
        if let TargetOp::Delete(id) = op {
            next.targets.retain(|t| &t.id != id);
        }
    }
    for op in &batch.target_ops {
        if let TargetOp::SetAt(idx, patch) = op {
            if let Some(target) = next.targets.get_mut(*idx) {
                patch.apply(target);
            }
        }
    }

    if let Some(ref text) = batch.primary_template {
        if !text.is_empty() {
            next.primary_template = text.clone();
        }
    }
    if let Some(ref text) = batch.alternate_template {
        if !text.is_empty() {
            next.alternate_template = text.clone();
        }
    }

    next
}

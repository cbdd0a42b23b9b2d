//! Generation cache: generated previews, edit buffers, and approvals
//!
//! The cache is the only owner of [`GenerationRecord`]s. It exposes the
//! operations the dashboard needs and nothing else, so the invariants hold
//! by construction:
//!
//! - at most one record per task id
//! - the original generated content never changes after insertion
//! - only the edit buffer and the approval flag are mutable
//!
//! In-flight generation requests are tracked separately from records. Each
//! in-flight entry remembers the load epoch it was issued under, so a
//! response from an earlier fetch cycle cannot release a newer request.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use core_kernel::TaskId;
use crate::content::{ContentBody, GeneratedContent};

/// Generated preview plus the user's edits and approval for one task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRecord {
    task_id: TaskId,
    task_type: String,
    content: GeneratedContent,
    edited_text: Option<String>,
    approved: bool,
    generated_at: DateTime<Utc>,
}

impl GenerationRecord {
    fn new(task_id: TaskId, task_type: String, content: GeneratedContent) -> Self {
        let edited_text = content.content.as_text().map(str::to_string);
        Self {
            task_id,
            task_type,
            content,
            edited_text,
            approved: false,
            generated_at: Utc::now(),
        }
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Task type the content was generated for
    pub fn task_type(&self) -> &str {
        &self.task_type
    }

    /// Content exactly as the backend produced it
    pub fn content(&self) -> &GeneratedContent {
        &self.content
    }

    /// Edit buffer; `None` for card-list content
    pub fn edited_text(&self) -> Option<&str> {
        self.edited_text.as_deref()
    }

    pub fn is_approved(&self) -> bool {
        self.approved
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// True when the edit buffer differs from the generated text
    pub fn is_edited(&self) -> bool {
        match (&self.edited_text, self.content.content.as_text()) {
            (Some(edited), Some(original)) => edited != original,
            _ => false,
        }
    }

    /// Body submitted on execution: the edit buffer if present, else the original
    pub fn execution_content(&self) -> ContentBody {
        match &self.edited_text {
            Some(text) => ContentBody::Text(text.clone()),
            None => self.content.content.clone(),
        }
    }
}

/// Owned mapping from task id to its generation record
#[derive(Debug, Clone, Default)]
pub struct GenerationCache {
    records: HashMap<TaskId, GenerationRecord>,
    in_flight: HashMap<TaskId, u64>,
}

impl GenerationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.records.contains_key(id)
    }

    pub fn get(&self, id: &TaskId) -> Option<&GenerationRecord> {
        self.records.get(id)
    }

    /// Read-only view over all records (unordered)
    pub fn records(&self) -> impl Iterator<Item = &GenerationRecord> {
        self.records.values()
    }

    /// True while a generation request for this task is outstanding
    pub fn is_generating(&self, id: &TaskId) -> bool {
        self.in_flight.contains_key(id)
    }

    pub fn generating_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Marks a generation request as in flight
    ///
    /// Returns false, leaving state unchanged, when a record already exists
    /// or a request for the same task is already outstanding.
    pub fn begin_generation(&mut self, id: &TaskId, epoch: u64) -> bool {
        if self.records.contains_key(id) || self.in_flight.contains_key(id) {
            return false;
        }
        self.in_flight.insert(id.clone(), epoch);
        true
    }

    /// Releases the in-flight flag for a request issued under `epoch`
    ///
    /// Returns false if the flag belongs to a different (newer) request or
    /// was already released.
    pub fn finish_generation(&mut self, id: &TaskId, epoch: u64) -> bool {
        match self.in_flight.get(id) {
            Some(current) if *current == epoch => {
                self.in_flight.remove(id);
                true
            }
            _ => false,
        }
    }

    /// Drops every in-flight flag (used when the task list is refetched)
    pub fn clear_in_flight(&mut self) {
        self.in_flight.clear();
    }

    /// Stores generated content for a task
    ///
    /// The record starts unapproved with the edit buffer seeded from text
    /// content. An existing record is never overwritten; returns false in
    /// that case.
    pub fn insert(&mut self, task_id: TaskId, task_type: impl Into<String>, content: GeneratedContent) -> bool {
        if self.records.contains_key(&task_id) {
            return false;
        }
        let record = GenerationRecord::new(task_id.clone(), task_type.into(), content);
        self.records.insert(task_id, record);
        true
    }

    /// Overwrites the edit buffer of a text record
    ///
    /// Returns false if there is no record or the record holds cards. Callers
    /// only offer editing for text records, so a false return is a bug in the
    /// caller rather than a user-facing failure.
    pub fn edit_content(&mut self, id: &TaskId, text: impl Into<String>) -> bool {
        match self.records.get_mut(id) {
            Some(record) if record.edited_text.is_some() => {
                record.edited_text = Some(text.into());
                true
            }
            Some(_) => {
                tracing::error!(task_id = %id, "edit requested for card content, ignoring");
                false
            }
            None => {
                tracing::error!(task_id = %id, "edit requested without a generation record, ignoring");
                false
            }
        }
    }

    /// Restores the edit buffer to the generated text
    pub fn reset_edit(&mut self, id: &TaskId) -> bool {
        match self.records.get_mut(id) {
            Some(record) => match record.content.content.as_text() {
                Some(original) => {
                    record.edited_text = Some(original.to_string());
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Flips approval; returns the new state, or `None` without a record
    pub fn toggle_approval(&mut self, id: &TaskId) -> Option<bool> {
        let record = self.records.get_mut(id)?;
        record.approved = !record.approved;
        Some(record.approved)
    }

    /// Ids of approved records (unordered)
    pub fn approved_ids(&self) -> HashSet<TaskId> {
        self.records
            .values()
            .filter(|r| r.approved)
            .map(|r| r.task_id.clone())
            .collect()
    }

    pub fn approved_count(&self) -> usize {
        self.records.values().filter(|r| r.approved).count()
    }

    /// Removes records for the given ids; returns how many were removed
    pub fn clear<'a>(&mut self, ids: impl IntoIterator<Item = &'a TaskId>) -> usize {
        ids.into_iter()
            .filter(|id| self.records.remove(*id).is_some())
            .count()
    }

    /// Keeps only records for which `keep(task_id, task_type)` holds
    ///
    /// Returns the ids that were dropped.
    pub fn retain_tasks<F>(&mut self, mut keep: F) -> Vec<TaskId>
    where
        F: FnMut(&TaskId, &str) -> bool,
    {
        let dropped: Vec<TaskId> = self
            .records
            .values()
            .filter(|r| !keep(&r.task_id, &r.task_type))
            .map(|r| r.task_id.clone())
            .collect();
        for id in &dropped {
            self.records.remove(id);
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::RecommendationCard;

    fn id(n: usize) -> TaskId {
        TaskId::positional(n)
    }

    fn email() -> GeneratedContent {
        GeneratedContent::text("Email", "Dear colleague")
    }

    fn specialists() -> GeneratedContent {
        GeneratedContent::cards(
            "Nearby Specialists",
            vec![RecommendationCard {
                title: "Melbourne Heart Group".to_string(),
                description: "Cardiology".to_string(),
                link: None,
            }],
        )
    }

    #[test]
    fn test_insert_seeds_edit_buffer_for_text() {
        let mut cache = GenerationCache::new();
        assert!(cache.insert(id(0), "send_email", email()));

        let record = cache.get(&id(0)).unwrap();
        assert_eq!(record.edited_text(), Some("Dear colleague"));
        assert!(!record.is_approved());
        assert!(!record.is_edited());
    }

    #[test]
    fn test_insert_leaves_cards_without_buffer() {
        let mut cache = GenerationCache::new();
        cache.insert(id(0), "write_referral_letter", specialists());
        assert_eq!(cache.get(&id(0)).unwrap().edited_text(), None);
    }

    #[test]
    fn test_insert_never_overwrites() {
        let mut cache = GenerationCache::new();
        cache.insert(id(0), "send_email", email());
        cache.edit_content(&id(0), "Edited");

        assert!(!cache.insert(id(0), "send_email", GeneratedContent::text("Email", "Other")));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&id(0)).unwrap().edited_text(), Some("Edited"));
    }

    #[test]
    fn test_edit_keeps_original_content() {
        let mut cache = GenerationCache::new();
        cache.insert(id(0), "send_email", email());

        assert!(cache.edit_content(&id(0), "Dear Dr Smith"));

        let record = cache.get(&id(0)).unwrap();
        assert_eq!(record.content().content.as_text(), Some("Dear colleague"));
        assert_eq!(record.edited_text(), Some("Dear Dr Smith"));
        assert!(record.is_edited());
        assert_eq!(record.execution_content(), ContentBody::Text("Dear Dr Smith".to_string()));
    }

    #[test]
    fn test_edit_without_record_or_on_cards_is_noop() {
        let mut cache = GenerationCache::new();
        assert!(!cache.edit_content(&id(0), "text"));

        cache.insert(id(1), "write_referral_letter", specialists());
        assert!(!cache.edit_content(&id(1), "text"));
        assert_eq!(cache.get(&id(1)).unwrap().edited_text(), None);
    }

    #[test]
    fn test_reset_edit_restores_generated_text() {
        let mut cache = GenerationCache::new();
        cache.insert(id(0), "send_email", email());
        cache.edit_content(&id(0), "changed");

        assert!(cache.reset_edit(&id(0)));
        assert_eq!(cache.get(&id(0)).unwrap().edited_text(), Some("Dear colleague"));
    }

    #[test]
    fn test_card_execution_content_is_original_body() {
        let mut cache = GenerationCache::new();
        cache.insert(id(0), "write_referral_letter", specialists());
        let record = cache.get(&id(0)).unwrap();
        assert_eq!(record.execution_content(), specialists().content);
    }

    #[test]
    fn test_toggle_approval() {
        let mut cache = GenerationCache::new();
        assert_eq!(cache.toggle_approval(&id(0)), None);

        cache.insert(id(0), "send_email", email());
        assert_eq!(cache.toggle_approval(&id(0)), Some(true));
        assert_eq!(cache.approved_count(), 1);
        assert_eq!(cache.toggle_approval(&id(0)), Some(false));
        assert!(cache.approved_ids().is_empty());
    }

    #[test]
    fn test_in_flight_guard() {
        let mut cache = GenerationCache::new();
        assert!(cache.begin_generation(&id(0), 1));
        assert!(!cache.begin_generation(&id(0), 1));
        assert!(cache.is_generating(&id(0)));

        // A response from an older epoch does not release the flag
        assert!(!cache.finish_generation(&id(0), 0));
        assert!(cache.finish_generation(&id(0), 1));
        assert!(!cache.is_generating(&id(0)));

        cache.insert(id(0), "send_email", email());
        assert!(!cache.begin_generation(&id(0), 1));
    }

    #[test]
    fn test_clear_and_retain() {
        let mut cache = GenerationCache::new();
        cache.insert(id(0), "send_email", email());
        cache.insert(id(1), "write_referral_letter", specialists());
        cache.insert(id(2), "send_email", email());

        assert_eq!(cache.clear([&id(0), &id(5)]), 1);

        let dropped = cache.retain_tasks(|_, task_type| task_type == "send_email");
        assert_eq!(dropped, vec![id(1)]);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&id(2)));
    }
}

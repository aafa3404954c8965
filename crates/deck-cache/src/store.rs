//! The cache store: per-status paginated list entries plus per-task details.
//!
//! This is deliberately a plain data structure with explicit `snapshot` /
//! `restore` operations. The mutation pipeline lives in the coordinator;
//! the store only guarantees two things:
//!
//! - snapshots restore touched entries verbatim, so rollback never shows
//!   wrong totals or a transient refetch;
//! - every optimistic mutation bumps the touched entries' generation, so a
//!   list fetch that was already in flight when the patch landed is
//!   discarded instead of clobbering the patched state.

use std::collections::HashMap;

use uuid::Uuid;

use deck_core::entities::Task;
use deck_core::envelope::Pagination;
use deck_core::enums::TaskStatus;
use deck_core::patch::TaskPatch;

/// Key of one paginated status-list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListKey {
    pub status: TaskStatus,
    pub page: u32,
    pub page_size: u32,
}

impl ListKey {
    #[must_use]
    pub const fn new(status: TaskStatus, page: u32, page_size: u32) -> Self {
        Self {
            status,
            page,
            page_size,
        }
    }
}

/// One cached page of tasks for a status column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub tasks: Vec<Task>,
    pub pagination: Pagination,
    /// Stale entries keep serving their data until a refetch lands.
    pub stale: bool,
}

/// Verbatim capture of every cache entry a mutation is about to touch.
///
/// `None` values record that the entry did not exist, so restore can
/// remove entries a failed mutation created.
#[derive(Debug, Clone)]
pub struct CacheSnapshot {
    lists: Vec<(ListKey, Option<ListEntry>)>,
    detail: Option<(Uuid, Option<Task>)>,
}

/// Client-side cache state: list entries keyed by `(status, page, pageSize)`
/// and detail entries keyed by task id.
#[derive(Debug, Default)]
pub struct CacheStore {
    lists: HashMap<ListKey, ListEntry>,
    details: HashMap<Uuid, Task>,
    generations: HashMap<ListKey, u64>,
}

impl CacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Reads ──────────────────────────────────────────────────────────

    #[must_use]
    pub fn list(&self, key: &ListKey) -> Option<&ListEntry> {
        self.lists.get(key)
    }

    #[must_use]
    pub fn detail(&self, id: Uuid) -> Option<&Task> {
        self.details.get(&id)
    }

    /// Keys of every cached entry for one status, any page.
    #[must_use]
    pub fn keys_for_status(&self, status: TaskStatus) -> Vec<ListKey> {
        self.lists
            .keys()
            .filter(|key| key.status == status)
            .copied()
            .collect()
    }

    /// Keys of every cached entry currently containing the task.
    #[must_use]
    pub fn keys_containing(&self, id: Uuid) -> Vec<ListKey> {
        self.lists
            .iter()
            .filter(|(_, entry)| entry.tasks.iter().any(|task| task.id == id))
            .map(|(key, _)| *key)
            .collect()
    }

    /// Distinct status buckets whose entries contain the task. The cache
    /// invariant says this has at most one element outside the transient
    /// optimistic window.
    #[must_use]
    pub fn bucket_statuses(&self, id: Uuid) -> Vec<TaskStatus> {
        let mut statuses: Vec<TaskStatus> = self
            .keys_containing(id)
            .into_iter()
            .map(|key| key.status)
            .collect();
        statuses.sort_by_key(|status| status.as_str());
        statuses.dedup();
        statuses
    }

    /// The task's last known status: detail cache first, then any list.
    #[must_use]
    pub fn known_status(&self, id: Uuid) -> Option<TaskStatus> {
        if let Some(task) = self.details.get(&id) {
            return Some(task.status);
        }
        self.lists
            .values()
            .flat_map(|entry| &entry.tasks)
            .find(|task| task.id == id)
            .map(|task| task.status)
    }

    // ── Fetch lifecycle ────────────────────────────────────────────────

    /// Generation of an entry. Entries never fetched start at 0.
    #[must_use]
    pub fn generation(&self, key: &ListKey) -> u64 {
        self.generations.get(key).copied().unwrap_or(0)
    }

    fn bump_generation(&mut self, key: &ListKey) {
        *self.generations.entry(*key).or_insert(0) += 1;
    }

    /// Record the generation a fetch was issued under.
    #[must_use]
    pub fn begin_fetch(&self, key: &ListKey) -> u64 {
        self.generation(key)
    }

    /// Apply a fetched page, unless an optimistic patch advanced the
    /// entry's generation while the fetch was in flight; a late stale
    /// response must not clobber the patch. Returns whether it applied.
    pub fn complete_fetch(
        &mut self,
        key: ListKey,
        started_generation: u64,
        tasks: Vec<Task>,
        pagination: Pagination,
    ) -> bool {
        if self.generation(&key) != started_generation {
            tracing::debug!(
                status = %key.status,
                page = key.page,
                "discarding stale list fetch (generation advanced)"
            );
            return false;
        }
        self.lists.insert(
            key,
            ListEntry {
                tasks,
                pagination,
                stale: false,
            },
        );
        true
    }

    /// Mark an entry as needing revalidation. Its data keeps being served
    /// until the replacement fetch lands.
    pub fn mark_stale(&mut self, key: &ListKey) {
        if let Some(entry) = self.lists.get_mut(key) {
            entry.stale = true;
        }
    }

    // ── Snapshots ──────────────────────────────────────────────────────

    /// Capture every entry a mutation of `id` may touch: all list entries
    /// currently containing the task, plus its detail entry.
    #[must_use]
    pub fn snapshot_for(&self, id: Uuid) -> CacheSnapshot {
        let lists = self
            .keys_containing(id)
            .into_iter()
            .map(|key| (key, self.lists.get(&key).cloned()))
            .collect();
        CacheSnapshot {
            lists,
            detail: Some((id, self.details.get(&id).cloned())),
        }
    }

    /// Restore captured entries verbatim. Touched entries get a generation
    /// bump so any fetch issued during the failed mutation is discarded.
    pub fn restore(&mut self, snapshot: CacheSnapshot) {
        for (key, entry) in snapshot.lists {
            match entry {
                Some(entry) => {
                    self.lists.insert(key, entry);
                }
                None => {
                    self.lists.remove(&key);
                }
            }
            self.bump_generation(&key);
        }
        if let Some((id, detail)) = snapshot.detail {
            match detail {
                Some(task) => {
                    self.details.insert(id, task);
                }
                None => {
                    self.details.remove(&id);
                }
            }
        }
    }

    // ── Optimistic mutations ───────────────────────────────────────────

    /// Remove the task from every list entry containing it. Pagination
    /// metadata is left untouched (totals are reconciled by revalidation,
    /// never guessed). Returns the touched keys.
    pub fn remove_task(&mut self, id: Uuid) -> Vec<ListKey> {
        let keys = self.keys_containing(id);
        for key in &keys {
            if let Some(entry) = self.lists.get_mut(key) {
                entry.tasks.retain(|task| task.id != id);
            }
            self.bump_generation(key);
        }
        keys
    }

    /// Patch the task in place in every list entry containing it.
    pub fn patch_in_lists(&mut self, id: Uuid, patch: &TaskPatch) -> Vec<ListKey> {
        let keys = self.keys_containing(id);
        for key in &keys {
            if let Some(entry) = self.lists.get_mut(key) {
                if let Some(task) = entry.tasks.iter_mut().find(|task| task.id == id) {
                    patch.apply_to(task);
                }
            }
            self.bump_generation(key);
        }
        keys
    }

    /// Patch the detail entry in place, if present.
    pub fn patch_detail(&mut self, id: Uuid, patch: &TaskPatch) -> bool {
        match self.details.get_mut(&id) {
            Some(task) => {
                patch.apply_to(task);
                true
            }
            None => false,
        }
    }

    /// Store the server's authoritative copy in the detail cache.
    pub fn set_detail(&mut self, task: Task) {
        self.details.insert(task.id, task);
    }

    pub fn remove_detail(&mut self, id: Uuid) {
        self.details.remove(&id);
    }

    /// Overwrite the task with server truth in every list entry that
    /// contains it (used after non-status updates, where lists were
    /// optimistically patched rather than invalidated).
    pub fn apply_server_task(&mut self, task: &Task) {
        for entry in self.lists.values_mut() {
            if let Some(cached) = entry.tasks.iter_mut().find(|cached| cached.id == task.id) {
                *cached = task.clone();
            }
        }
        self.set_detail(task.clone());
    }
}

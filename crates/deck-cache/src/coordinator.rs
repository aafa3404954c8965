//! The optimistic mutation coordinator.
//!
//! Every mutation follows the same pipeline, in this order:
//! capture snapshot → apply optimistic patch → issue request → on settle,
//! reconcile with server truth or restore the snapshot verbatim. The
//! optimistic step is synchronous and completes before the request is
//! issued, so a consumer never observes a state that is neither the old
//! nor the patched one.
//!
//! Policy per mutation kind:
//! - **create**: no optimistic list insert (the page position under the
//!   server's sort order is unknown); after success, only lists matching
//!   the created task's status are revalidated.
//! - **non-status update**: patch in place everywhere the task is cached;
//!   no list revalidation, server truth overwrites in place on success.
//! - **status update**: remove from every containing list immediately,
//!   patch the detail optimistically, then revalidate exactly the old and
//!   new status lists after settlement.
//! - **delete**: remove everywhere immediately; no revalidation.

use chrono::Utc;
use uuid::Uuid;

use deck_core::entities::Task;
use deck_core::enums::TaskStatus;
use deck_core::patch::{TaskDraft, TaskPatch};
use deck_core::transitions;

use crate::error::CacheError;
use crate::store::{CacheStore, ListEntry, ListKey};
use crate::transport::TaskTransport;

/// Client cache facade: paginated status lists, task details, and the
/// optimistic mutation pipeline, over any [`TaskTransport`].
///
/// Created at application start and injected into consumers; dropped on
/// logout. Not a global.
#[derive(Debug)]
pub struct TaskCache<T> {
    store: CacheStore,
    transport: T,
}

impl<T: TaskTransport> TaskCache<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            store: CacheStore::new(),
            transport,
        }
    }

    /// Read-only view of the underlying store.
    #[must_use]
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// The last-served entry for a key, if any (possibly stale). Consumers
    /// paging forward can keep rendering this while [`Self::list`] loads
    /// the next page.
    #[must_use]
    pub fn cached_list(&self, key: &ListKey) -> Option<&ListEntry> {
        self.store.list(key)
    }

    // ── Reads ──────────────────────────────────────────────────────────

    /// Serve a status page, fetching when the entry is missing or stale.
    ///
    /// A fetch that loses to a concurrent optimistic patch is discarded;
    /// in that case the patched entry is served as-is.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Transport`] when the entry cannot be served
    /// from cache and the fetch fails. Consumers may retry.
    pub async fn list(
        &mut self,
        status: TaskStatus,
        page: u32,
        page_size: u32,
    ) -> Result<ListEntry, CacheError> {
        let key = ListKey::new(status, page, page_size);
        let needs_fetch = self.store.list(&key).is_none_or(|entry| entry.stale);
        if needs_fetch {
            self.refetch(key).await?;
        }
        Ok(self
            .store
            .list(&key)
            .cloned()
            .expect("entry present after successful fetch"))
    }

    /// Serve a task's detail, fetching on a cache miss.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Transport`] when the detail is not cached and
    /// the fetch fails.
    pub async fn detail(&mut self, id: Uuid) -> Result<Task, CacheError> {
        if let Some(task) = self.store.detail(id) {
            return Ok(task.clone());
        }
        let task = self.transport.fetch_detail(id).await?;
        self.store.set_detail(task.clone());
        Ok(task)
    }

    // ── Mutations ──────────────────────────────────────────────────────

    /// Create a task. No optimistic list insert; on success the lists
    /// matching the server-confirmed status are revalidated and the detail
    /// cache primed. Other status lists see zero network activity.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Transport`] on failure; the cache is
    /// untouched in that case.
    pub async fn create(&mut self, draft: &TaskDraft) -> Result<Task, CacheError> {
        let created = self.transport.create(draft).await?;
        self.store.set_detail(created.clone());
        self.revalidate_status(created.status).await;
        Ok(created)
    }

    /// Update a task through the optimistic pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Transport`] after restoring every touched
    /// entry to its pre-mutation snapshot.
    pub async fn update(&mut self, id: Uuid, patch: &TaskPatch) -> Result<Task, CacheError> {
        let previous_status = self.store.known_status(id);
        // With no cached status, any requested status counts as a change;
        // the old bucket is unknown and only the new one can be refreshed.
        let is_status_change = match previous_status {
            Some(current) => patch.changes_status_from(current),
            None => patch.status.is_some(),
        };

        // Snapshot, then patch synchronously, before the request goes out.
        let snapshot = self.store.snapshot_for(id);
        if is_status_change {
            self.store.remove_task(id);
        } else {
            self.store.patch_in_lists(id, patch);
        }
        self.store.patch_detail(id, patch);

        match self.transport.update(id, patch).await {
            Ok(updated) => {
                if is_status_change {
                    self.store.set_detail(updated.clone());
                    // Prefer server truth for the new bucket.
                    self.revalidate_status(updated.status).await;
                    if let Some(old) = previous_status {
                        if old != updated.status {
                            self.revalidate_status(old).await;
                        }
                    }
                } else {
                    self.store.apply_server_task(&updated);
                }
                Ok(updated)
            }
            Err(err) => {
                self.store.restore(snapshot);
                Err(err.into())
            }
        }
    }

    /// Quick status action: build the transition patch (state machine +
    /// side effects) from the cached task and run it through
    /// [`Self::update`].
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::UnknownTask`] when the task is not cached,
    /// [`CacheError::Core`] for a disallowed transition, or
    /// [`CacheError::Transport`] after rollback.
    pub async fn quick_transition(
        &mut self,
        id: Uuid,
        next: TaskStatus,
    ) -> Result<Task, CacheError> {
        let current = self
            .store
            .detail(id)
            .cloned()
            .or_else(|| {
                self.store
                    .keys_containing(id)
                    .first()
                    .and_then(|key| self.store.list(key))
                    .and_then(|entry| entry.tasks.iter().find(|task| task.id == id).cloned())
            })
            .ok_or(CacheError::UnknownTask(id))?;

        let patch = transitions::quick_transition(&current, next, Utc::now())?;
        self.update(id, &patch).await
    }

    /// Delete a task: removed from every containing list and the detail
    /// cache immediately; removal is terminal, so nothing is revalidated.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Transport`] after restoring the snapshot.
    pub async fn delete(&mut self, id: Uuid) -> Result<(), CacheError> {
        let snapshot = self.store.snapshot_for(id);
        self.store.remove_task(id);
        self.store.remove_detail(id);

        match self.transport.delete(id).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.store.restore(snapshot);
                Err(err.into())
            }
        }
    }

    // ── Revalidation ───────────────────────────────────────────────────

    /// Refetch every currently cached entry for one status. Failures leave
    /// the entry stale (it keeps serving old data) rather than erroring
    /// the mutation that triggered the revalidation.
    async fn revalidate_status(&mut self, status: TaskStatus) {
        for key in self.store.keys_for_status(status) {
            self.store.mark_stale(&key);
            if let Err(err) = self.refetch(key).await {
                tracing::warn!(status = %key.status, page = key.page, %err, "revalidation fetch failed");
            }
        }
    }

    async fn refetch(&mut self, key: ListKey) -> Result<(), CacheError> {
        let generation = self.store.begin_fetch(&key);
        let page = self
            .transport
            .fetch_list(key.status, key.page, key.page_size)
            .await?;
        self.store
            .complete_fetch(key, generation, page.tasks, page.pagination);
        Ok(())
    }
}

//! Command context: per-unit-of-work mutable scope
//!
//! A context is owned by exactly one logical unit of work and closed
//! exactly once; `close` consumes the context, so a second close cannot
//! be written. Nested commands that join a caller's context never close
//! it - the stage that pushed a context is the one that closes it.

use crate::EventDispatcher;
use tracing::debug;
use uuid::Uuid;
use weft_storage::{Transaction, WriteBatch};
use weft_types::{EngineError, EngineEvent, EngineResult};

type PostCommitAction = Box<dyn FnOnce() + Send>;

/// Mutable scope of one logical unit of work.
///
/// Carries the staged write batch, pending lifecycle events (in dispatch
/// order), post-commit actions, a failure flag, and a non-owning
/// back-reference to the parent context.
pub struct CommandContext {
    id: Uuid,
    parent_id: Option<Uuid>,
    transaction: Option<Box<dyn Transaction>>,
    batch: WriteBatch,
    pending_events: Vec<EngineEvent>,
    post_commit: Vec<PostCommitAction>,
    failed: bool,
}

impl CommandContext {
    pub(crate) fn new(transaction: Option<Box<dyn Transaction>>, parent_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_id,
            transaction,
            batch: WriteBatch::new(),
            pending_events: Vec::new(),
            post_commit: Vec::new(),
            failed: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn parent_id(&self) -> Option<Uuid> {
        self.parent_id
    }

    /// The write batch this unit of work will commit
    pub fn batch_mut(&mut self) -> &mut WriteBatch {
        &mut self.batch
    }

    pub fn batch(&self) -> &WriteBatch {
        &self.batch
    }

    /// Buffer a lifecycle event; flushed to the dispatcher in order, only
    /// after a successful commit.
    pub fn record_event(&mut self, event: EngineEvent) {
        self.pending_events.push(event);
    }

    pub fn pending_events(&self) -> &[EngineEvent] {
        &self.pending_events
    }

    /// Register an action that runs only after the transaction has
    /// committed. Cache publication goes through here so definitions never
    /// become visible for a deploy that is later rolled back.
    pub fn after_commit(&mut self, action: impl FnOnce() + Send + 'static) {
        self.post_commit.push(Box::new(action));
    }

    /// Mark this unit of work failed; close will roll back
    pub fn mark_failed(&mut self) {
        self.failed = true;
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Close the unit of work: commit when the failure flag is clear,
    /// rollback otherwise. Commit is where optimistic conflicts surface.
    pub(crate) fn close(self, dispatcher: &dyn EventDispatcher) -> EngineResult<()> {
        let Self {
            id,
            transaction,
            batch,
            pending_events,
            post_commit,
            failed,
            ..
        } = self;

        if failed {
            if let Some(tx) = transaction {
                tx.rollback();
            }
            debug!(context = %id, "context closed with rollback");
            return Ok(());
        }

        match transaction {
            Some(tx) => tx.commit(batch)?,
            None if !batch.is_empty() => {
                return Err(EngineError::Configuration(
                    "writes were staged in a context without a transaction".into(),
                ));
            }
            None => {}
        }

        for event in &pending_events {
            dispatcher.dispatch(event);
        }
        for action in post_commit {
            action();
        }
        debug!(context = %id, "context closed with commit");
        Ok(())
    }
}

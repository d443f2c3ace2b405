//! # Correlation Table
//!
//! Maps the id of every outstanding call to the channel its caller is waiting on.
//!
//! ## Invariants
//! - **Unique Ids**: An id is only issued if no outstanding call holds it.
//! - **Single Resolution**: An entry is removed and resolved in one `DashMap::remove`,
//!   so concurrent replies for the same id resolve it at most once.
//! - **No Stale Entries**: A [`PendingReply`] that is dropped, times out, or is
//!   failed by `fail_all` takes its entry with it.

use std::future::Future;
use std::future::IntoFuture;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use jsonwire::Id;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::Error;
use crate::error::Result;

type Completion = oneshot::Sender<Result<Value>>;

#[derive(Default)]
pub(crate) struct PendingTable {
    entries: DashMap<Id, Completion>,
    closed: AtomicBool,
}

impl PendingTable {
    /// Issues a fresh id and registers a completion for it.
    ///
    /// Fails with `Error::Closed` once `fail_all` has run, since nothing could
    /// ever resolve the entry.
    pub(crate) fn register(self: &Arc<Self>, timeout: Option<Duration>) -> Result<PendingReply> {
        let (tx, rx) = oneshot::channel();

        let id = loop {
            let id = Id::random();
            if let Entry::Vacant(slot) = self.entries.entry(id.clone()) {
                slot.insert(tx);
                break id;
            }
        };

        // Checked after inserting: either fail_all sees the entry, or we see the flag.
        if self.closed.load(Ordering::SeqCst) {
            self.entries.remove(&id);
            return Err(Error::Closed);
        }

        Ok(PendingReply {
            rx,
            timeout,
            guard: EntryGuard { id, table: Arc::clone(self) },
        })
    }

    /// Removes the entry for `id` and completes it with `outcome`.
    ///
    /// Returns `false` if no call with that id is outstanding.
    pub(crate) fn resolve(&self, id: &Id, outcome: Result<Value>) -> bool {
        let Some((_, tx)) = self.entries.remove(id) else {
            return false;
        };

        // The caller may have stopped waiting; that is not our concern.
        let _ = tx.send(outcome);
        true
    }

    /// Fails every outstanding call with `cause` and refuses new ones.
    pub(crate) fn fail_all(&self, cause: &Error) {
        self.closed.store(true, Ordering::SeqCst);

        let keys: Vec<Id> = self.entries.iter().map(|e| e.key().clone()).collect();
        for key in keys {
            self.resolve(&key, Err(cause.clone()));
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn forget(&self, id: &Id) {
        self.entries.remove(id);
    }
}

/// Removes the entry when the waiting side goes away.
struct EntryGuard {
    id: Id,
    table: Arc<PendingTable>,
}

impl Drop for EntryGuard {
    fn drop(&mut self) {
        self.table.forget(&self.id);
    }
}

/// The caller's side of an outstanding call.
///
/// Await it (or call [`PendingReply::wait`]) to get the reply. Dropping it
/// cancels the call locally: the entry is removed, and a reply arriving later
/// is treated as one with an unknown id.
pub struct PendingReply {
    rx: oneshot::Receiver<Result<Value>>,
    timeout: Option<Duration>,
    guard: EntryGuard,
}

impl PendingReply {
    pub fn id(&self) -> &Id {
        &self.guard.id
    }

    /// Waits for the reply.
    ///
    /// # Errors
    /// - `Error::Remote` if the peer answered with an error object.
    /// - `Error::Timeout` if a call timeout is configured and elapses first.
    /// - Whatever stopped the endpoint's pump, if it stopped first.
    pub async fn wait(self) -> Result<Value> {
        let Self { rx, timeout, guard } = self;

        let received = match timeout {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(received) => received,
                Err(_) => return Err(Error::Timeout),
            },
            None => rx.await,
        };

        drop(guard);
        received.unwrap_or(Err(Error::ChannelClosed))
    }
}

impl IntoFuture for PendingReply {
    type Output = Result<Value>;
    type IntoFuture = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.wait())
    }
}

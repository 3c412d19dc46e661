//! Handle layer: futures as ownership-tree-managed resources.
//!
//! A [`FutureTable`] owns a tree of resources (sessions, devices, whatever
//! the hosting API scopes lifetimes to) and attaches each future reference
//! to exactly one live resource. Handles are generation-checked ids, not raw
//! references: a stale, consumed, or forged id fails validation instead of
//! dangling, and destroying a resource while children exist cascades instead
//! of leaking.
//!
//! The layer also narrows the generic three-state machine into the
//! vocabulary an API surface needs: [`poll`](FutureTable::poll) is
//! two-valued (pending/ready), and cancellation surfaces through the
//! consume error channel rather than as a poll outcome.
//!
//! # Ownership invariant
//!
//! Each handle owns exactly one [`FutureRef`]. That reference is released on
//! exactly one of: explicit destroy, cancel, or successful consume. Any
//! other call path leaves the handle intact for retry.

use crate::error::{Error, ErrorKind, Result};
use crate::future::FutureRef;
use crate::types::{FutureOutcome, FutureState};
use crate::util::{SlotArena, SlotIndex};
use core::fmt;
use parking_lot::Mutex;

/// Poll outcome exposed to the hosting API.
///
/// Two-valued on purpose: a cancelled future polls as `Ready` and reports
/// its cancellation when the caller consumes the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollState {
    /// The operation has not finished yet.
    Pending,
    /// An outcome is available to consume.
    Ready,
}

/// Checked id of a resource node in the ownership tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(SlotIndex);

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId({}:{})", self.0.index(), self.0.generation())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0.index())
    }
}

/// Checked id of a future handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId(SlotIndex);

impl fmt::Debug for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandleId({}:{})", self.0.index(), self.0.generation())
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.0.index())
    }
}

#[derive(Debug)]
struct ResourceNode {
    parent: Option<SlotIndex>,
    children: Vec<SlotIndex>,
    handles: Vec<SlotIndex>,
}

#[derive(Debug)]
struct HandleEntry {
    owner: SlotIndex,
    future: FutureRef,
}

#[derive(Debug, Default)]
struct TableInner {
    resources: SlotArena<ResourceNode>,
    handles: SlotArena<HandleEntry>,
}

/// Ownership tree binding future references to API-visible handles.
#[derive(Debug, Default)]
pub struct FutureTable {
    inner: Mutex<TableInner>,
}

impl FutureTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resource node, optionally under a parent.
    ///
    /// Fails with `InvalidArgument` if the parent is not live.
    pub fn create_resource(&self, parent: Option<ResourceId>) -> Result<ResourceId> {
        let mut inner = self.inner.lock();
        let parent_index = match parent {
            Some(id) => {
                if !inner.resources.contains(id.0) {
                    return Err(Error::new(ErrorKind::InvalidArgument)
                        .with_message(format!("parent resource {id} is not live")));
                }
                Some(id.0)
            }
            None => None,
        };
        let index = inner.resources.insert(ResourceNode {
            parent: parent_index,
            children: Vec::new(),
            handles: Vec::new(),
        });
        if let Some(parent_index) = parent_index {
            if let Some(node) = node_mut(&mut inner, parent_index) {
                node.children.push(index);
            }
        }
        Ok(ResourceId(index))
    }

    /// Returns true if the resource is still live.
    #[must_use]
    pub fn resource_is_live(&self, resource: ResourceId) -> bool {
        self.inner.lock().resources.contains(resource.0)
    }

    /// Binds a future reference to a live resource, issuing a handle.
    ///
    /// Takes ownership of exactly one reference; destroying `parent`
    /// cascades to this handle.
    pub fn create(&self, parent: ResourceId, future: FutureRef) -> Result<HandleId> {
        let mut inner = self.inner.lock();
        if !inner.resources.contains(parent.0) {
            return Err(Error::new(ErrorKind::InvalidArgument)
                .with_message(format!("owning resource {parent} is not live")));
        }
        let index = inner.handles.insert(HandleEntry {
            owner: parent.0,
            future,
        });
        if let Some(node) = node_mut(&mut inner, parent.0) {
            node.handles.push(index);
        }
        tracing::trace!(handle = %HandleId(index), resource = %parent, "future handle created");
        Ok(HandleId(index))
    }

    /// Returns true if the handle is still live.
    #[must_use]
    pub fn handle_is_live(&self, handle: HandleId) -> bool {
        self.inner.lock().handles.contains(handle.0)
    }

    /// Number of live handles (diagnostics and tests).
    #[must_use]
    pub fn live_handles(&self) -> usize {
        self.inner.lock().handles.len()
    }

    /// Polls the future behind a handle.
    ///
    /// Maps the state machine onto the two-valued external vocabulary;
    /// transport errors from a proxied future propagate unmasked.
    pub fn poll(&self, handle: HandleId) -> Result<PollState> {
        let future = self.lookup(handle)?;
        let state = future.state()?;
        Ok(match state {
            FutureState::Pending => PollState::Pending,
            FutureState::Ready | FutureState::Cancelled => PollState::Ready,
        })
    }

    /// Cancels the future behind a handle and revokes the handle.
    ///
    /// The one operation guaranteed to release client-side ownership
    /// regardless of whether the future had already completed. A transport
    /// error from a proxied cancel propagates, but the handle is revoked
    /// either way.
    pub fn cancel(&self, handle: HandleId) -> Result<()> {
        let future = self.revoke(handle).ok_or_else(|| invalid_handle(handle))?;
        tracing::trace!(handle = %handle, "handle revoked by cancel");
        future.cancel()
    }

    /// Consumes the outcome of a terminal future, revoking the handle.
    ///
    /// Fails with `FuturePending` while the future is not terminal, leaving
    /// the handle intact for retry. One-shot: a second consume or poll of
    /// the same handle fails with `InvalidHandle`.
    pub fn consume(&self, handle: HandleId) -> Result<FutureOutcome> {
        let future = self.lookup(handle)?;
        let outcome = future.result().map_err(|err| {
            if err.kind() == ErrorKind::ResultNotReady {
                Error::new(ErrorKind::FuturePending)
            } else {
                err
            }
        })?;
        // Another caller may have raced this consume; only the one that
        // actually revokes the handle gets the outcome.
        if self.revoke(handle).is_none() {
            return Err(invalid_handle(handle));
        }
        tracing::trace!(handle = %handle, outcome = %outcome, "handle consumed");
        Ok(outcome)
    }

    /// Destroys a handle, cancelling its future first if still pending.
    ///
    /// Idempotent: destroying an already-invalid handle succeeds.
    pub fn destroy(&self, handle: HandleId) -> Result<()> {
        let Some(future) = self.revoke(handle) else {
            return Ok(());
        };
        release_future(&future);
        tracing::trace!(handle = %handle, "handle destroyed");
        Ok(())
    }

    /// Destroys a resource, cascading to its child resources and handles.
    ///
    /// Pending futures in the destroyed subtree are cancelled before their
    /// references are released. Idempotent on a dead resource.
    pub fn destroy_resource(&self, resource: ResourceId) -> Result<()> {
        let futures = {
            let mut inner = self.inner.lock();
            let Some(root) = inner.resources.remove(resource.0) else {
                return Ok(());
            };
            if let Some(parent) = root.parent {
                if let Some(node) = node_mut(&mut inner, parent) {
                    node.children.retain(|&child| child != resource.0);
                }
            }

            let mut futures = Vec::new();
            let mut pending_nodes = vec![root];
            while let Some(node) = pending_nodes.pop() {
                for handle_index in node.handles {
                    if let Some(entry) = inner.handles.remove(handle_index) {
                        futures.push(entry.future);
                    }
                }
                for child_index in node.children {
                    if let Some(child) = inner.resources.remove(child_index) {
                        pending_nodes.push(child);
                    }
                }
            }
            futures
        };

        tracing::trace!(resource = %resource, count = futures.len(), "resource destroyed, cascading");
        for future in &futures {
            release_future(future);
        }
        Ok(())
    }

    fn lookup(&self, handle: HandleId) -> Result<FutureRef> {
        self.inner
            .lock()
            .handles
            .get(handle.0)
            .map(|entry| entry.future.clone())
            .ok_or_else(|| invalid_handle(handle))
    }

    /// Removes the handle entry and unlinks it from its owner, returning the
    /// owned reference.
    fn revoke(&self, handle: HandleId) -> Option<FutureRef> {
        let mut inner = self.inner.lock();
        let entry = inner.handles.remove(handle.0)?;
        if let Some(node) = node_mut(&mut inner, entry.owner) {
            node.handles.retain(|&index| index != handle.0);
        }
        Some(entry.future)
    }
}

/// Cancel-if-pending before the reference drops; part of every release path
/// except successful consume (which observed a terminal state already).
fn release_future(future: &FutureRef) {
    match future.state() {
        Ok(FutureState::Pending) => {
            if let Err(err) = future.cancel() {
                tracing::warn!(error = %err, "cancel during handle teardown failed");
            }
        }
        Ok(_) => {}
        Err(err) => {
            tracing::warn!(error = %err, "state probe during handle teardown failed");
        }
    }
}

fn invalid_handle(handle: HandleId) -> Error {
    Error::new(ErrorKind::InvalidHandle).with_message(format!("{handle} is not live"))
}

fn node_mut(inner: &mut TableInner, index: SlotIndex) -> Option<&mut ResourceNode> {
    inner.resources.get_mut(index)
}

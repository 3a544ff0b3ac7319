// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! One-shot removal handle returned by `PubSub::subscribe`.

use super::{Inner, Mutation};
use crate::node::SubscriptionId;
use crate::segment::{display_path, PathSegment};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};

/// Shared state of one subscription between the engine and its handles.
#[derive(Debug, Default)]
pub(crate) struct Registration {
    /// Set when the subscription is stored (possibly after a deferred apply).
    pub id: OnceLock<SubscriptionId>,
    /// Set by the first `unsubscribe` call.
    pub removed: AtomicBool,
}

/// Removes one subscription when invoked.
///
/// Holds only a weak reference to the engine: calling [`unsubscribe`] after
/// every `PubSub` handle is dropped does nothing. Clones share the one-shot
/// state, so the subscription is removed at most once whichever clone fires.
///
/// [`unsubscribe`]: Unsubscriber::unsubscribe
pub struct Unsubscriber<T: ?Sized> {
    engine: Weak<Inner<T>>,
    path: Vec<PathSegment>,
    registration: Arc<Registration>,
}

impl<T: ?Sized> Unsubscriber<T> {
    pub(crate) fn new(
        engine: Weak<Inner<T>>,
        path: Vec<PathSegment>,
        registration: Arc<Registration>,
    ) -> Self {
        Self {
            engine,
            path,
            registration,
        }
    }

    /// Remove the subscription and prune empty ancestors. Idempotent.
    ///
    /// In [`LockMode::Reentrant`](crate::LockMode::Reentrant), a call made
    /// while a publish is walking the trie (from a callback) only stages the
    /// removal: it is applied once the outermost publish returns, so that
    /// publish may still deliver to this subscription.
    pub fn unsubscribe(&self) {
        if self.registration.removed.swap(true, Ordering::AcqRel) {
            return;
        }
        let Some(engine) = self.engine.upgrade() else {
            tracing::debug!(
                "Engine dropped, nothing to unsubscribe at {}",
                display_path(&self.path)
            );
            return;
        };
        engine.mutate(Mutation::Unsubscribe {
            path: self.path.clone(),
            registration: Arc::clone(&self.registration),
        });
    }

    /// Subscription id, once the subscription has been stored.
    #[must_use]
    pub fn id(&self) -> Option<SubscriptionId> {
        self.registration.id.get().copied()
    }

    /// Path the subscription was registered at.
    #[must_use]
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// True until `unsubscribe` is called or the engine is dropped.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.registration.removed.load(Ordering::Acquire) && self.engine.strong_count() > 0
    }
}

impl<T: ?Sized> Clone for Unsubscriber<T> {
    fn clone(&self) -> Self {
        Self {
            engine: Weak::clone(&self.engine),
            path: self.path.clone(),
            registration: Arc::clone(&self.registration),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Unsubscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscriber")
            .field("path", &display_path(&self.path))
            .field("id", &self.id())
            .field("active", &self.is_active())
            .finish()
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for refresh listeners.

use crate::coordinator::RefreshEvent;
use crate::error::RefreshError;
use crate::state::Snapshot;
use crate::subscription::SubscriptionId;

/// Trait for types that notify listeners about refreshes.
///
/// Callbacks run synchronously on the task that performed the refresh and
/// must not block.
pub trait Subscribable {
    /// Subscribes to every refresh attempt.
    fn on_refresh<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&RefreshEvent) + Send + Sync + 'static;

    /// Subscribes to successful refreshes only.
    ///
    /// The callback receives the newly published snapshot.
    fn on_snapshot_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Snapshot) + Send + Sync + 'static;

    /// Subscribes to failed refreshes only.
    fn on_refresh_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&RefreshError) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

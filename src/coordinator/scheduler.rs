// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic refresh task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;

use super::WeakCoordinator;
use crate::protocol::Protocol;

/// Refreshes the coordinator every `interval` until it is dropped.
///
/// A notification on `wake` means an on-demand refresh just ran, so the
/// next tick is pushed back to a full interval from now.
pub(super) async fn run<P: Protocol>(
    coordinator: WeakCoordinator<P>,
    interval: Duration,
    wake: Arc<Notify>,
) {
    let mut deadline = Instant::now() + interval;

    loop {
        tokio::select! {
            () = tokio::time::sleep_until(deadline) => {
                let Some(coordinator) = coordinator.upgrade() else {
                    tracing::debug!("Coordinator dropped, stopping refresh schedule");
                    return;
                };

                // Failures are reported to listeners by the refresh itself.
                let _ = coordinator.refresh().await;
                deadline = Instant::now() + interval;
            }
            () = wake.notified() => {
                deadline = Instant::now() + interval;
            }
        }
    }
}

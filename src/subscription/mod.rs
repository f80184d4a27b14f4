// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for refresh notifications.
//!
//! Every refresh attempt, successful or not, is dispatched to the
//! registered listeners so they can re-read the coordinator state or mark
//! themselves stale.
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Registry that stores callbacks and dispatches events
//! - [`Subscribable`] - Trait for types that accept refresh listeners
//!
//! # Usage
//!
//! ```no_run
//! use ledmatrix_controller::coordinator::Coordinator;
//! use ledmatrix_controller::protocol::HttpConfig;
//! use ledmatrix_controller::subscription::Subscribable;
//!
//! # async fn example() -> ledmatrix_controller::Result<()> {
//! let client = HttpConfig::new("192.168.1.40").into_client()?;
//! let coordinator = Coordinator::new(client);
//!
//! let sub_id = coordinator.on_snapshot_updated(|snapshot| {
//!     println!("brightness is now {}", snapshot.settings.brightness);
//! });
//!
//! coordinator.unsubscribe(sub_id);
//! # Ok(())
//! # }
//! ```

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;

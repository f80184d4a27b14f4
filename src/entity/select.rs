// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Select adapter: choosing the active app by display name.

use super::{CoordinatorEntity, DeviceInfo, Entity, EntityState, Platform};
use crate::config::ConfigEntry;
use crate::coordinator::Coordinator;
use crate::protocol::{HttpClient, Protocol};
use crate::state::Snapshot;

/// Current option of the app select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppSelection {
    /// No snapshot has been fetched yet.
    NoData,
    /// The active app is absent, or not present in the app list.
    NoMatch,
    /// Display name of the active app.
    Matched(String),
}

impl AppSelection {
    /// Resolves the active app of a snapshot, if any.
    #[must_use]
    pub fn from_snapshot(snapshot: Option<&Snapshot>) -> Self {
        match snapshot {
            None => Self::NoData,
            Some(snapshot) => snapshot
                .active_app_info()
                .map_or(Self::NoMatch, |app| {
                    Self::Matched(app.display_name().to_string())
                }),
        }
    }

    /// Returns the selected display name, if one matched.
    #[must_use]
    pub fn option(&self) -> Option<&str> {
        match self {
            Self::Matched(name) => Some(name),
            Self::NoData | Self::NoMatch => None,
        }
    }
}

/// Active app as a select over the installed apps' display names.
#[derive(Debug)]
pub struct AppSelect<P: Protocol = HttpClient> {
    base: CoordinatorEntity<P>,
}

impl<P: Protocol> AppSelect<P> {
    /// Creates the select for a config entry.
    #[must_use]
    pub fn new(coordinator: &Coordinator<P>, entry: &ConfigEntry) -> Self {
        Self {
            base: CoordinatorEntity::new(coordinator, entry, "app_select"),
        }
    }

    /// Returns the shared entity base.
    #[must_use]
    pub fn base(&self) -> &CoordinatorEntity<P> {
        &self.base
    }

    /// Returns the display names of all installed apps, in device order.
    ///
    /// Empty while no snapshot exists.
    #[must_use]
    pub fn options(&self) -> Vec<String> {
        self.base
            .snapshot()
            .map(|snapshot| snapshot.app_names())
            .unwrap_or_default()
    }

    /// Returns the current selection.
    #[must_use]
    pub fn current_selection(&self) -> AppSelection {
        AppSelection::from_snapshot(self.base.snapshot().as_deref())
    }

    /// Returns the display name of the active app, if it is known.
    #[must_use]
    pub fn current_option(&self) -> Option<String> {
        match self.current_selection() {
            AppSelection::Matched(name) => Some(name),
            AppSelection::NoData | AppSelection::NoMatch => None,
        }
    }

    /// Activates the app whose display name is `option`.
    ///
    /// The name is resolved against the last known snapshot only. An
    /// unknown name is logged and ignored without contacting the device.
    /// Returns `true` if the device accepted the activation.
    pub async fn select_option(&self, option: &str) -> bool {
        let Some(coordinator) = self.base.coordinator_or_warn() else {
            return false;
        };

        let app_id = coordinator
            .snapshot()
            .and_then(|snapshot| snapshot.find_app_by_name(option).map(|app| app.id.clone()));

        let Some(app_id) = app_id else {
            tracing::error!(option, "Could not find app with name");
            return false;
        };

        let accepted = coordinator.activate_app(&app_id).await;
        self.base.refresh_after_command(&coordinator).await;
        accepted
    }
}

impl<P: Protocol> Entity for AppSelect<P> {
    fn platform(&self) -> Platform {
        Platform::Select
    }

    fn unique_id(&self) -> &str {
        self.base.unique_id()
    }

    fn name(&self) -> Option<&str> {
        Some("Active App")
    }

    fn icon(&self) -> Option<&str> {
        Some("mdi:application")
    }

    fn device_info(&self) -> &DeviceInfo {
        self.base.device_info()
    }

    fn available(&self) -> bool {
        self.base.available()
    }

    fn state(&self) -> EntityState {
        self.current_option()
            .map_or(EntityState::Unknown, EntityState::Text)
    }
}

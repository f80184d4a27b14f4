// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Setup and teardown of config entries.
//!
//! The [`Integration`] owns one [`Coordinator`] per set-up config entry and
//! one shared HTTP session for all of them. Setting up an entry performs a
//! blocking first refresh; if it fails, nothing is stored and no entities
//! are created.

use std::collections::HashMap;

use parking_lot::RwLock;
use reqwest::Client;

use crate::config::{ConfigEntry, CoordinatorConfig, EntryId};
use crate::coordinator::Coordinator;
use crate::entity::{
    AppSelect, BrightnessNumber, Entity, FpsSensor, LedMatrixLight, Platform, StatusSensor,
};
use crate::error::{Error, Result};
use crate::protocol::HttpConfig;

/// Entity platforms forwarded to for every entry.
pub const PLATFORMS: [Platform; 4] = [
    Platform::Light,
    Platform::Select,
    Platform::Sensor,
    Platform::Number,
];

/// The five entities created for one config entry.
#[derive(Debug)]
pub struct EntitySet {
    /// Panel output and brightness as a light.
    pub light: LedMatrixLight,
    /// Brightness in percent.
    pub brightness: BrightnessNumber,
    /// Active app.
    pub app_select: AppSelect,
    /// Frame rate.
    pub fps: FpsSensor,
    /// Engine status.
    pub status: StatusSensor,
}

impl EntitySet {
    /// Builds all entities of `entry` on top of `coordinator`.
    #[must_use]
    pub fn new(coordinator: &Coordinator, entry: &ConfigEntry) -> Self {
        Self {
            light: LedMatrixLight::new(coordinator, entry),
            brightness: BrightnessNumber::new(coordinator, entry),
            app_select: AppSelect::new(coordinator, entry),
            fps: FpsSensor::new(coordinator, entry),
            status: StatusSensor::new(coordinator, entry),
        }
    }

    /// Returns all entities, in platform order.
    #[must_use]
    pub fn all(&self) -> Vec<&dyn Entity> {
        let entities: [&dyn Entity; 5] = [
            &self.light,
            &self.app_select,
            &self.fps,
            &self.status,
            &self.brightness,
        ];
        entities.to_vec()
    }

    /// Returns the entities of one platform.
    #[must_use]
    pub fn for_platform(&self, platform: Platform) -> Vec<&dyn Entity> {
        self.all()
            .into_iter()
            .filter(|entity| entity.platform() == platform)
            .collect()
    }
}

/// Integration-scoped store of coordinators, keyed by config entry.
///
/// # Examples
///
/// ```no_run
/// use ledmatrix_controller::config::ConfigEntry;
/// use ledmatrix_controller::integration::Integration;
///
/// # async fn example() -> ledmatrix_controller::Result<()> {
/// let integration = Integration::new(reqwest::Client::new());
/// let entry = ConfigEntry::new("192.168.1.40");
///
/// let entities = integration.setup_entry(&entry).await?;
/// println!("{}", entities.light.is_on().unwrap_or(false));
///
/// integration.unload_entry(&entry.entry_id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Integration {
    session: Client,
    config: CoordinatorConfig,
    coordinators: RwLock<HashMap<EntryId, Coordinator>>,
}

impl Integration {
    /// Creates an integration sharing `session` between all entries.
    #[must_use]
    pub fn new(session: Client) -> Self {
        Self {
            session,
            config: CoordinatorConfig::default(),
            coordinators: RwLock::new(HashMap::new()),
        }
    }

    /// Sets the timing used by coordinators of entries set up afterwards.
    #[must_use]
    pub fn with_config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets up a config entry and returns its entities.
    ///
    /// Creates the coordinator, runs its first refresh, stores it and
    /// starts its schedule.
    ///
    /// # Errors
    ///
    /// Returns error if the entry is already set up, its host is invalid,
    /// or the first refresh fails. Nothing is stored in that case.
    pub async fn setup_entry(&self, entry: &ConfigEntry) -> Result<EntitySet> {
        if self.coordinators.read().contains_key(&entry.entry_id) {
            return Err(Error::AlreadySetUp(entry.entry_id.clone()));
        }

        let client = HttpConfig::new(entry.host.as_str())
            .with_port(entry.port)
            .with_timeout(self.config.request_timeout())
            .with_session(self.session.clone())?;
        let coordinator = Coordinator::with_config(client, self.config);

        if let Err(source) = coordinator.first_refresh().await {
            tracing::error!(
                entry_id = %entry.entry_id,
                host = %entry.host,
                error = %source,
                "Initial refresh failed, aborting setup"
            );
            return Err(Error::SetupFailed {
                entry_id: entry.entry_id.clone(),
                source,
            });
        }

        {
            let mut coordinators = self.coordinators.write();
            if coordinators.contains_key(&entry.entry_id) {
                return Err(Error::AlreadySetUp(entry.entry_id.clone()));
            }
            coordinators.insert(entry.entry_id.clone(), coordinator.clone());
        }
        coordinator.start();

        tracing::info!(
            entry_id = %entry.entry_id,
            host = %entry.host,
            port = entry.port,
            "Set up LED matrix"
        );

        Ok(EntitySet::new(&coordinator, entry))
    }

    /// Rebuilds the entities of an entry that is already set up.
    ///
    /// # Errors
    ///
    /// Returns error if the entry is not set up.
    pub fn entities(&self, entry: &ConfigEntry) -> Result<EntitySet> {
        let coordinator = self
            .coordinator(&entry.entry_id)
            .ok_or_else(|| Error::EntryNotFound(entry.entry_id.clone()))?;
        Ok(EntitySet::new(&coordinator, entry))
    }

    /// Tears down an entry: stops its schedule and discards its coordinator.
    ///
    /// Entities of the entry become unavailable once the last strong handle
    /// is gone. Returns `true` if the entry was set up.
    pub fn unload_entry(&self, entry_id: &EntryId) -> bool {
        let Some(coordinator) = self.coordinators.write().remove(entry_id) else {
            return false;
        };

        coordinator.shutdown();
        tracing::info!(entry_id = %entry_id, "Unloaded LED matrix");
        true
    }

    /// Returns the coordinator of an entry.
    #[must_use]
    pub fn coordinator(&self, entry_id: &EntryId) -> Option<Coordinator> {
        self.coordinators.read().get(entry_id).cloned()
    }

    /// Returns the ids of all set-up entries.
    #[must_use]
    pub fn entry_ids(&self) -> Vec<EntryId> {
        self.coordinators.read().keys().cloned().collect()
    }

    /// Returns the number of set-up entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coordinators.read().len()
    }

    /// Returns `true` if no entry is set up.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coordinators.read().is_empty()
    }
}

impl Default for Integration {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn setup_rejects_empty_host() {
        let integration = Integration::default();
        let entry = ConfigEntry::new(" ").with_entry_id("blank");

        let err = integration.setup_entry(&entry).await.unwrap_err();

        assert!(matches!(err, Error::Protocol(_)));
        assert!(integration.is_empty());
    }

    #[test]
    fn unload_unknown_entry_is_false() {
        let integration = Integration::default();
        assert!(!integration.unload_entry(&EntryId::from("nope")));
    }

    #[test]
    fn entities_of_unknown_entry() {
        let integration = Integration::default();
        let entry = ConfigEntry::new("10.0.0.7").with_entry_id("nope");

        assert!(matches!(
            integration.entities(&entry),
            Err(Error::EntryNotFound(id)) if id.as_str() == "nope"
        ));
    }

    #[test]
    fn platforms_cover_all_entities() {
        assert_eq!(PLATFORMS.len(), 4);
        assert!(PLATFORMS.contains(&Platform::Number));
    }
}

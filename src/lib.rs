// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `LedMatrix` Controller - polling coordinator and entities for LedMatrixOS displays.
//!
//! This library polls the local HTTP API of an LED matrix display running
//! LedMatrixOS and exposes its state as typed entities a home-automation
//! host can render.
//!
//! # Supported Features
//!
//! - **Polling**: `GET /settings` and `GET /apps` every 5 seconds, merged into one snapshot
//! - **Single-flight refresh**: concurrent refresh requests share one fetch
//! - **Commands**: brightness, power, active app and app settings
//! - **Entities**: light, brightness number, app select, FPS and status sensors
//!
//! # Quick Start
//!
//! ## Integration with Entities
//!
//! ```no_run
//! use ledmatrix_controller::{ConfigEntry, Entity, Integration};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let integration = Integration::new(reqwest::Client::new());
//!     let entry = ConfigEntry::new("192.168.1.40").with_name("Hallway");
//!
//!     // Fails if the device cannot be reached
//!     let entities = integration.setup_entry(&entry).await?;
//!
//!     for entity in entities.all() {
//!         println!("{}: {}", entity.unique_id(), entity.state());
//!     }
//!
//!     entities.light.turn_on(Some(200)).await;
//!     entities.app_select.select_option("Clock").await;
//!
//!     integration.unload_entry(&entry.entry_id);
//!     Ok(())
//! }
//! ```
//!
//! ## Coordinator Only
//!
//! ```no_run
//! use ledmatrix_controller::{Coordinator, HttpConfig, Subscribable};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpConfig::new("192.168.1.40").with_port(5005).into_client()?;
//!     let coordinator = Coordinator::new(client);
//!
//!     coordinator.on_refresh_failed(|err| {
//!         eprintln!("refresh failed: {err}");
//!     });
//!
//!     let snapshot = coordinator.first_refresh().await?;
//!     println!("active app: {:?}", snapshot.active_app);
//!
//!     coordinator.start();
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod config;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod integration;
pub mod protocol;
pub mod state;
pub mod subscription;
pub mod types;

pub use command::{Command, DeviceCommand};
pub use config::{ConfigEntry, CoordinatorConfig, EntryId};
pub use coordinator::{Coordinator, RefreshEvent, WeakCoordinator};
pub use entity::{
    AppSelect, AppSelection, BrightnessNumber, CoordinatorEntity, DeviceInfo, DisplayStatus,
    Entity, EntityState, FpsSensor, LedMatrixLight, Platform, StatusAttributes, StatusSensor,
};
pub use error::{Error, ParseError, ProtocolError, RefreshError, Result};
pub use integration::{EntitySet, Integration, PLATFORMS};
pub use protocol::{ApiResponse, HttpClient, HttpConfig, Protocol};
pub use state::{AppInfo, AppList, AppSetting, AppSettingType, AppSettings, Settings, Snapshot};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polling coordinator for a matrix device.
//!
//! The [`Coordinator`] owns the latest [`Snapshot`] of one device. It
//! refreshes on a fixed schedule and on demand, and tells its listeners
//! about every attempt.
//!
//! # Refresh discipline
//!
//! - A refresh issues `GET /settings` then `GET /apps`, within one overall
//!   deadline.
//! - At most one refresh runs at a time. A caller arriving while a refresh
//!   is in flight waits for it and shares its outcome.
//! - A failed refresh keeps the previous snapshot and marks the coordinator
//!   as not up to date until the next success.
//!
//! # Examples
//!
//! ```no_run
//! use ledmatrix_controller::coordinator::Coordinator;
//! use ledmatrix_controller::protocol::HttpConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpConfig::new("192.168.1.40").into_client()?;
//! let coordinator = Coordinator::new(client);
//!
//! coordinator.first_refresh().await?;
//! coordinator.start();
//!
//! if coordinator.set_power(true).await {
//!     coordinator.request_refresh().await?;
//! }
//! # Ok(())
//! # }
//! ```

mod scheduler;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::command::{Command, DeviceCommand};
use crate::config::CoordinatorConfig;
use crate::error::RefreshError;
use crate::protocol::{HttpClient, Protocol};
use crate::state::{AppList, AppSettings, Settings, Snapshot};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};

/// Outcome of one refresh attempt, as seen by listeners.
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    /// A new snapshot was published.
    Updated(Arc<Snapshot>),
    /// The refresh failed; the previous snapshot, if any, is still current.
    Failed(RefreshError),
}

impl RefreshEvent {
    /// Returns `true` if the refresh succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Updated(_))
    }

    /// Returns the published snapshot, if the refresh succeeded.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        match self {
            Self::Updated(snapshot) => Some(snapshot),
            Self::Failed(_) => None,
        }
    }

    /// Returns the failure, if the refresh failed.
    #[must_use]
    pub fn error(&self) -> Option<&RefreshError> {
        match self {
            Self::Updated(_) => None,
            Self::Failed(error) => Some(error),
        }
    }
}

type Outcome = Result<Arc<Snapshot>, RefreshError>;

#[derive(Debug, Default)]
struct UpdateStatus {
    last_update_success: bool,
    last_error: Option<RefreshError>,
    last_success_time: Option<DateTime<Utc>>,
}

struct Shared<P: Protocol> {
    protocol: P,
    config: CoordinatorConfig,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    status: RwLock<UpdateStatus>,
    callbacks: CallbackRegistry,
    /// Guards the in-flight refresh and remembers the last outcome for
    /// callers that coalesce into it.
    in_flight: tokio::sync::Mutex<Option<Outcome>>,
    completed: AtomicU64,
    wake: Arc<Notify>,
    scheduler: Mutex<Option<JoinHandle<()>>>,
}

impl<P: Protocol> Drop for Shared<P> {
    fn drop(&mut self) {
        if let Some(handle) = self.scheduler.get_mut().take() {
            handle.abort();
        }
    }
}

/// Polling coordinator holding the latest device snapshot.
///
/// Cloning a coordinator is cheap and yields a handle to the same state.
/// Entities keep a [`WeakCoordinator`] instead, so that the coordinator's
/// lifetime is governed by whoever set it up.
pub struct Coordinator<P: Protocol = HttpClient> {
    shared: Arc<Shared<P>>,
}

impl<P: Protocol> Clone for Coordinator<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<P: Protocol> fmt::Debug for Coordinator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("config", &self.shared.config)
            .field("has_snapshot", &self.shared.snapshot.read().is_some())
            .field("last_update_success", &self.last_update_success())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl<P: Protocol> Coordinator<P> {
    /// Creates a coordinator with the default interval and deadline.
    #[must_use]
    pub fn new(protocol: P) -> Self {
        Self::with_config(protocol, CoordinatorConfig::default())
    }

    /// Creates a coordinator with custom timing.
    #[must_use]
    pub fn with_config(protocol: P, config: CoordinatorConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                protocol,
                config,
                snapshot: RwLock::new(None),
                status: RwLock::new(UpdateStatus::default()),
                callbacks: CallbackRegistry::new(),
                in_flight: tokio::sync::Mutex::new(None),
                completed: AtomicU64::new(0),
                wake: Arc::new(Notify::new()),
                scheduler: Mutex::new(None),
            }),
        }
    }

    /// Returns a non-owning handle to this coordinator.
    #[must_use]
    pub fn downgrade(&self) -> WeakCoordinator<P> {
        WeakCoordinator {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Returns the timing configuration.
    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.shared.config
    }

    /// Returns the transport used to reach the device.
    #[must_use]
    pub fn protocol(&self) -> &P {
        &self.shared.protocol
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Returns the latest snapshot, or `None` before the first success.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.shared.snapshot.read().clone()
    }

    /// Returns `true` once a refresh has succeeded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.shared.snapshot.read().is_some()
    }

    /// Returns `true` if the most recent refresh succeeded.
    #[must_use]
    pub fn last_update_success(&self) -> bool {
        self.shared.status.read().last_update_success
    }

    /// Returns the failure of the most recent refresh, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<RefreshError> {
        self.shared.status.read().last_error.clone()
    }

    /// Returns when the last successful refresh completed.
    #[must_use]
    pub fn last_update_success_time(&self) -> Option<DateTime<Utc>> {
        self.shared.status.read().last_success_time
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    /// Performs the initial refresh of a freshly created coordinator.
    ///
    /// # Errors
    ///
    /// Returns the refresh failure; the caller should abort its setup.
    pub async fn first_refresh(&self) -> Result<Arc<Snapshot>, RefreshError> {
        tracing::debug!("Running initial refresh");
        self.refresh().await
    }

    /// Refreshes the snapshot now, obeying the single-flight rule.
    ///
    /// Listeners are notified of the outcome either way. A caller that had
    /// to wait for a refresh started by someone else receives that
    /// refresh's outcome instead of fetching again.
    ///
    /// # Errors
    ///
    /// Returns the failure of the refresh this call ran or joined.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, RefreshError> {
        let seen = self.shared.completed.load(Ordering::Acquire);
        let mut last = self.shared.in_flight.lock().await;

        if self.shared.completed.load(Ordering::Acquire) != seen
            && let Some(outcome) = last.as_ref()
        {
            tracing::debug!("Joined in-flight refresh");
            return outcome.clone();
        }

        let outcome = self.fetch().await.map(Arc::new);
        self.publish(&outcome);

        *last = Some(outcome.clone());
        self.shared.completed.fetch_add(1, Ordering::Release);
        outcome
    }

    /// Refreshes now and restarts the schedule from this point.
    ///
    /// Adapters call this after sending a command.
    ///
    /// # Errors
    ///
    /// Returns the failure of the refresh.
    pub async fn request_refresh(&self) -> Result<Arc<Snapshot>, RefreshError> {
        let outcome = self.refresh().await;
        self.shared.wake.notify_one();
        outcome
    }

    /// Fetches both endpoints and merges them, without publishing.
    async fn fetch(&self) -> Result<Snapshot, RefreshError> {
        let deadline = self.shared.config.request_timeout();

        tokio::time::timeout(deadline, async {
            let settings: Settings = self.get_json("/settings", "settings").await?;
            let app_list: AppList = self.get_json("/apps", "apps").await?;
            Ok::<_, RefreshError>(Snapshot::new(settings, app_list))
        })
        .await
        .map_err(|_| RefreshError::Timeout(deadline))?
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        endpoint: &str,
    ) -> Result<T, RefreshError> {
        let response = self.shared.protocol.get(path).await?;

        if !response.is_ok() {
            return Err(RefreshError::UpstreamStatus {
                endpoint: endpoint.to_string(),
                status: response.status(),
            });
        }

        Ok(response.parse()?)
    }

    fn publish(&self, outcome: &Outcome) {
        let event = match outcome {
            Ok(snapshot) => {
                *self.shared.snapshot.write() = Some(Arc::clone(snapshot));

                let recovered = {
                    let mut status = self.shared.status.write();
                    let recovered = status.last_error.is_some();
                    status.last_update_success = true;
                    status.last_error = None;
                    status.last_success_time = Some(snapshot.fetched_at);
                    recovered
                };
                if recovered {
                    tracing::info!("Fetching LED matrix data recovered");
                }

                RefreshEvent::Updated(Arc::clone(snapshot))
            }
            Err(err) => {
                let first_failure = {
                    let mut status = self.shared.status.write();
                    let first_failure = status.last_error.is_none();
                    status.last_update_success = false;
                    status.last_error = Some(err.clone());
                    first_failure
                };
                if first_failure {
                    tracing::warn!(error = %err, "Error fetching LED matrix data");
                } else {
                    tracing::debug!(error = %err, "Error fetching LED matrix data");
                }

                RefreshEvent::Failed(err.clone())
            }
        };

        self.shared.callbacks.dispatch(&event);
    }

    // =========================================================================
    // Scheduling
    // =========================================================================

    /// Starts the periodic refresh task.
    ///
    /// Must be called from within a tokio runtime. Calling it again while
    /// the task runs has no effect.
    pub fn start(&self) {
        let mut scheduler = self.shared.scheduler.lock();
        if scheduler.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let interval = self.shared.config.update_interval();
        tracing::debug!(interval_ms = interval.as_millis(), "Starting refresh schedule");

        *scheduler = Some(tokio::spawn(scheduler::run(
            self.downgrade(),
            interval,
            Arc::clone(&self.shared.wake),
        )));
    }

    /// Returns `true` while the periodic refresh task is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared
            .scheduler
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancels the periodic refresh task.
    ///
    /// The snapshot and listeners are kept; the session is left untouched.
    pub fn shutdown(&self) {
        if let Some(handle) = self.shared.scheduler.lock().take() {
            handle.abort();
            tracing::debug!("Refresh schedule cancelled");
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Sets the panel brightness in percent.
    ///
    /// Returns `true` if the device answered HTTP 200. Does not refresh.
    pub async fn set_brightness(&self, brightness: u8) -> bool {
        self.send(DeviceCommand::SetBrightness(brightness)).await
    }

    /// Enables or disables the panel output.
    ///
    /// Returns `true` if the device answered HTTP 200. Does not refresh.
    pub async fn set_power(&self, enabled: bool) -> bool {
        self.send(DeviceCommand::SetPower(enabled)).await
    }

    /// Activates the app with the given id.
    ///
    /// Returns `true` if the device answered HTTP 200. Does not refresh.
    pub async fn activate_app(&self, app_id: &str) -> bool {
        self.send(DeviceCommand::ActivateApp(app_id.to_string()))
            .await
    }

    /// Updates settings of the active app.
    ///
    /// Returns `true` if the device answered HTTP 200. Does not refresh.
    pub async fn update_app_settings(&self, app_id: &str, settings: Map<String, Value>) -> bool {
        self.send(DeviceCommand::UpdateAppSettings {
            app_id: app_id.to_string(),
            settings,
        })
        .await
    }

    /// Reads the settings of the active app.
    ///
    /// # Errors
    ///
    /// Returns error if the deadline expires, the device answers anything
    /// but HTTP 200 (e.g. because the app is not active), or the body is
    /// not valid.
    pub async fn app_settings(&self, app_id: &str) -> Result<AppSettings, RefreshError> {
        let deadline = self.shared.config.request_timeout();
        let path = format!("/apps/{}/settings", urlencoding::encode(app_id));

        tokio::time::timeout(deadline, self.get_json(&path, "app settings"))
            .await
            .map_err(|_| RefreshError::Timeout(deadline))?
    }

    async fn send(&self, command: DeviceCommand) -> bool {
        match self.shared.protocol.send_command(&command).await {
            Ok(response) if response.is_ok() => true,
            Ok(response) => {
                tracing::warn!(
                    command = command.name(),
                    status = response.status(),
                    "Device rejected command"
                );
                false
            }
            Err(err) => {
                tracing::error!(command = command.name(), error = %err, "Error sending command");
                false
            }
        }
    }
}

impl<P: Protocol> Subscribable for Coordinator<P> {
    fn on_refresh<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&RefreshEvent) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_refresh(callback)
    }

    fn on_snapshot_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_snapshot_updated(callback)
    }

    fn on_refresh_failed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&RefreshError) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_refresh_failed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.callbacks.unsubscribe(id)
    }
}

/// Non-owning handle to a [`Coordinator`].
pub struct WeakCoordinator<P: Protocol = HttpClient> {
    shared: Weak<Shared<P>>,
}

impl<P: Protocol> WeakCoordinator<P> {
    /// Returns the coordinator if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<Coordinator<P>> {
        self.shared.upgrade().map(|shared| Coordinator { shared })
    }

    /// Returns `true` if the coordinator has been dropped.
    #[must_use]
    pub fn is_dropped(&self) -> bool {
        self.shared.strong_count() == 0
    }
}

impl<P: Protocol> Clone for WeakCoordinator<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<P: Protocol> fmt::Debug for WeakCoordinator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakCoordinator")
            .field("dropped", &self.is_dropped())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use super::testing::FakeDevice;
    use super::*;

    fn coordinator(device: &FakeDevice) -> Coordinator<FakeDevice> {
        Coordinator::new(device.clone())
    }

    #[tokio::test]
    async fn refresh_builds_snapshot() {
        let device = FakeDevice::example();
        let coordinator = coordinator(&device);

        let snapshot = coordinator.refresh().await.unwrap();

        assert!(snapshot.settings.is_enabled);
        assert_eq!(snapshot.settings.brightness, 50);
        assert_eq!(snapshot.apps.len(), 1);
        assert_eq!(snapshot.active_app.as_deref(), Some("clock"));
        assert!(coordinator.is_ready());
        assert!(coordinator.last_update_success());
        assert!(coordinator.last_update_success_time().is_some());
        assert_eq!(device.requests(), vec!["GET /settings", "GET /apps"]);
    }

    #[tokio::test]
    async fn missing_app_fields_default_to_empty() {
        let device = FakeDevice::example();
        device.respond("/apps", 200, "{}");
        let coordinator = coordinator(&device);

        let snapshot = coordinator.refresh().await.unwrap();

        assert!(snapshot.apps.is_empty());
        assert!(snapshot.active_app.is_none());
    }

    #[tokio::test]
    async fn settings_error_skips_apps_request() {
        let device = FakeDevice::example();
        device.respond("/settings", 500, "");
        let coordinator = coordinator(&device);

        let err = coordinator.refresh().await.unwrap_err();

        assert_eq!(
            err,
            RefreshError::UpstreamStatus {
                endpoint: "settings".to_string(),
                status: 500
            }
        );
        assert_eq!(device.requests(), vec!["GET /settings"]);
        assert!(!coordinator.is_ready());
    }

    #[tokio::test]
    async fn failure_keeps_previous_snapshot_and_notifies() {
        let device = FakeDevice::example();
        let coordinator = coordinator(&device);
        let first = coordinator.refresh().await.unwrap();

        let failures = Arc::new(AtomicUsize::new(0));
        let failures_clone = Arc::clone(&failures);
        coordinator.on_refresh(move |event| {
            if !event.is_success() {
                failures_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        device.respond("/apps", 503, "");
        let err = coordinator.refresh().await.unwrap_err();

        assert_eq!(err.status(), Some(503));
        assert_eq!(failures.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&coordinator.snapshot().unwrap(), &first));
        assert!(!coordinator.last_update_success());
        assert_eq!(coordinator.last_error(), Some(err));
    }

    #[tokio::test]
    async fn recovery_clears_error() {
        let device = FakeDevice::example();
        device.set_offline(true);
        let coordinator = coordinator(&device);

        assert!(matches!(
            coordinator.refresh().await,
            Err(RefreshError::Transport(_))
        ));

        device.set_offline(false);
        coordinator.refresh().await.unwrap();

        assert!(coordinator.last_update_success());
        assert!(coordinator.last_error().is_none());
    }

    #[tokio::test]
    async fn first_refresh_failure_is_reported_once() {
        let device = FakeDevice::example();
        device.set_offline(true);
        let coordinator = coordinator(&device);

        let failures = Arc::new(AtomicUsize::new(0));
        let failures_clone = Arc::clone(&failures);
        coordinator.on_refresh_failed(move |_| {
            failures_clone.fetch_add(1, Ordering::SeqCst);
        });

        let err = coordinator.first_refresh().await.unwrap_err();

        assert!(matches!(err, RefreshError::Transport(_)));
        assert_eq!(failures.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.last_error(), Some(err));
        assert!(!coordinator.is_ready());
    }

    #[tokio::test]
    async fn invalid_json_is_transport_failure() {
        let device = FakeDevice::example();
        device.respond("/settings", 200, "<html>");
        let coordinator = coordinator(&device);

        assert!(matches!(
            coordinator.refresh().await,
            Err(RefreshError::Transport(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_exceeded_is_timeout() {
        let device = FakeDevice::example();
        device.set_delay(Duration::from_secs(6));
        let coordinator = coordinator(&device);

        let err = coordinator.refresh().await.unwrap_err();

        assert_eq!(err, RefreshError::Timeout(Duration::from_secs(10)));
        assert!(coordinator.snapshot().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_refreshes_share_one_fetch() {
        let device = FakeDevice::example();
        device.set_delay(Duration::from_secs(1));
        let coordinator = coordinator(&device);

        let (a, b) = tokio::join!(coordinator.refresh(), coordinator.refresh());

        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert_eq!(device.count("GET /settings"), 1);
        assert_eq!(device.count("GET /apps"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sequential_refreshes_fetch_each_time() {
        let device = FakeDevice::example();
        let coordinator = coordinator(&device);

        coordinator.refresh().await.unwrap();
        coordinator.refresh().await.unwrap();

        assert_eq!(device.count("GET /settings"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduler_refreshes_on_interval() {
        let device = FakeDevice::example();
        let coordinator = coordinator(&device);
        coordinator.start();
        assert!(coordinator.is_running());

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(device.count("GET /settings"), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(device.count("GET /settings"), 1);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(device.count("GET /settings"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn request_refresh_restarts_schedule() {
        let device = FakeDevice::example();
        let coordinator = coordinator(&device);
        coordinator.start();

        tokio::time::sleep(Duration::from_secs(3)).await;
        coordinator.request_refresh().await.unwrap();
        assert_eq!(device.count("GET /settings"), 1);

        // The schedule now fires at 8s instead of 5s.
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(device.count("GET /settings"), 1);

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(device.count("GET /settings"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_schedule() {
        let device = FakeDevice::example();
        let coordinator = coordinator(&device);
        coordinator.start();
        coordinator.shutdown();
        tokio::task::yield_now().await;

        tokio::time::sleep(Duration::from_secs(20)).await;

        assert_eq!(device.count("GET /settings"), 0);
        assert!(!coordinator.is_running());
    }

    #[tokio::test]
    async fn commands_post_to_endpoints() {
        let device = FakeDevice::default();
        device.respond("/settings/brightness/80", 200, r#"{"brightness":80}"#);
        device.respond("/settings/power/false", 200, r#"{"isEnabled":false}"#);
        device.respond("/apps/fire", 200, r#"{"activeApp":"fire"}"#);
        let coordinator = coordinator(&device);

        assert!(coordinator.set_brightness(80).await);
        assert!(coordinator.set_power(false).await);
        assert!(coordinator.activate_app("fire").await);

        assert_eq!(
            device.requests(),
            vec![
                "POST /settings/brightness/80",
                "POST /settings/power/false",
                "POST /apps/fire"
            ]
        );
    }

    #[tokio::test]
    async fn command_failures_return_false() {
        let device = FakeDevice::default();
        let coordinator = coordinator(&device);

        // Unknown app answers 404.
        assert!(!coordinator.activate_app("missing").await);

        device.set_offline(true);
        assert!(!coordinator.set_power(true).await);
        assert!(coordinator.snapshot().is_none());
    }

    #[tokio::test]
    async fn update_app_settings_sends_json_body() {
        let device = FakeDevice::default();
        device.respond("/apps/scrolling-text/settings", 200, "{}");
        let coordinator = coordinator(&device);

        let mut settings = Map::new();
        settings.insert("text".to_string(), Value::from("Hello"));

        assert!(
            coordinator
                .update_app_settings("scrolling-text", settings)
                .await
        );
        assert_eq!(
            device.bodies(),
            vec![Some(serde_json::json!({"text": "Hello"}))]
        );
    }

    #[tokio::test]
    async fn app_settings_reads_active_app() {
        let device = FakeDevice::default();
        device.respond(
            "/apps/clock/settings",
            200,
            r#"{"appId":"clock","settings":[{"key":"format24h","name":"24 hour format",
                "description":"Use 24 hour time","type":0,"defaultValue":true,
                "currentValue":false,"minValue":null,"maxValue":null,"options":null}]}"#,
        );
        device.respond("/apps/rain/settings", 200, r#"{"appId":"rain","settings":[]}"#);
        device.respond("/apps/fire/settings", 400, r#""App is not currently active""#);
        let coordinator = coordinator(&device);

        let settings = coordinator.app_settings("clock").await.unwrap();
        let format = settings.get("format24h").unwrap();
        assert_eq!(format.kind, crate::state::AppSettingType::Boolean);
        assert_eq!(format.current_value, false);

        let settings = coordinator.app_settings("rain").await.unwrap();
        assert_eq!(settings.app_id, "rain");
        assert!(settings.is_empty());

        let err = coordinator.app_settings("fire").await.unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn weak_handle_does_not_keep_coordinator_alive() {
        let device = FakeDevice::example();
        let coordinator = coordinator(&device);
        let weak = coordinator.downgrade();

        assert!(weak.upgrade().is_some());
        drop(coordinator);
        assert!(weak.upgrade().is_none());
        assert!(weak.is_dropped());
    }
}

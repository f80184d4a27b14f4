// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state as reported by the web API.
//!
//! - [`Settings`] - body of `GET /settings`
//! - [`AppList`] and [`AppInfo`] - body of `GET /apps`
//! - [`AppSettings`] and [`AppSetting`] - body of `GET /apps/{id}/settings`
//! - [`Snapshot`] - the merged, immutable result of one successful refresh

mod snapshot;

pub use snapshot::{AppInfo, AppList, AppSetting, AppSettingType, AppSettings, Settings, Snapshot};

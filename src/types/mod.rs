// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value conversions shared by the entity adapters.

mod brightness;

pub use brightness::{MAX_LEVEL, MAX_PERCENT, level_to_percent, percent_to_level};

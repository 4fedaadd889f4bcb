// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides primitives for process-wide event notification.
//!
//! The [`EventBus`] is a generic, thread-safe channel. The runtime listens on it
//! for [`DataUpdated`] notifications, raised whenever the backend data or the
//! player profile changes, to refresh the download origin of remote assets.

mod bus;

pub use self::bus::EventBus;

/// Raised after the backend data has been (re)loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataUpdated {
    /// `true` if new game data was downloaded.
    pub data_updated: bool,
    /// `true` if the active player profile changed.
    pub profile_changed: bool,
}

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

//! Acts as the agent for the asset subsystem.
//!
//! This module provides the tactical logic of asset management: it is the
//! public-facing API for requesting assets and querying their state, but it
//! delegates the actual loading to an injected `AssetSource` and the waiting
//! to an injected `Scheduler`.
//!
//! Its responsibilities are:
//! - issuing at most one load per `(kind, name)` while it is in flight;
//! - fanning the single outcome out to every caller, in request order;
//! - giving up on loads that exceed the configured timeout;
//! - remembering successful results for the lifetime of the runtime;
//! - keeping the download origin current when the backend data changes.

mod agent;
mod config;
mod handle;
mod sprite;
mod updates;

pub use agent::{AssetsRuntime, AssetsRuntimeBuilder};
pub use config::RuntimeConfig;
pub use handle::{LoadHandle, LoadStatus};

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

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the [`AssetsRuntime`](super::AssetsRuntime).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// How long a load may stay in flight before its waiters receive `None`.
    /// Measured in the scheduler's time.
    pub load_timeout_ms: u64,
}

impl RuntimeConfig {
    /// The timeout applied when none is configured.
    pub const DEFAULT_LOAD_TIMEOUT_MS: u64 = 20_000;

    /// Parses a configuration from RON text. Missing fields keep their defaults.
    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).context("Failed to parse runtime configuration")
    }

    /// Returns the load timeout as a [`Duration`].
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            load_timeout_ms: Self::DEFAULT_LOAD_TIMEOUT_MS,
        }
    }
}

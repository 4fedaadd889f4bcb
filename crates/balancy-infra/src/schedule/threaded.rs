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
use balancy_core::schedule::{ScheduledTask, Scheduler};
use std::time::Duration;
use tokio::runtime::Handle;

/// Runs scheduled tasks on a tokio runtime after a wall-clock delay.
///
/// Each task gets its own sleeping tokio task, so tasks may run on any worker
/// thread of the runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Creates a scheduler spawning onto `handle`.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Creates a scheduler for the runtime the caller is running in.
    pub fn current() -> Result<Self> {
        let handle = Handle::try_current().context("TokioScheduler needs a tokio runtime")?;
        Ok(Self::new(handle))
    }
}

impl Scheduler for TokioScheduler {
    fn after(&self, delay: Duration, task: ScheduledTask) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

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

//! The timer contract used for load timeouts.

use std::time::Duration;

/// A deferred, one-shot unit of work.
pub type ScheduledTask = Box<dyn FnOnce() + Send>;

/// Runs a task once after a delay on the host's loop.
///
/// Implementations decide what a unit of time means: a cooperative host may
/// advance its clock per frame, a threaded host may use wall-clock timers.
pub trait Scheduler: Send + Sync {
    /// Runs `task` once, after `delay` has elapsed.
    fn after(&self, delay: Duration, task: ScheduledTask);
}

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

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The lifecycle of a single asset request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The callback has not fired yet.
    Loading,
    /// The callback fired, or the caller gave up on it. Terminal.
    Finished,
}

/// A per-call token tracking whether a request's callback has fired.
///
/// Cloning a handle is cheap; all clones observe the same status. Calling
/// [`finish`](LoadHandle::finish) before the result arrives makes the runtime
/// drop the result for this call instead of invoking its callback. The load
/// itself keeps running for the other callers.
#[derive(Debug, Clone, Default)]
pub struct LoadHandle {
    finished: Arc<AtomicBool>,
}

impl LoadHandle {
    /// Creates a handle in the [`LoadStatus::Loading`] state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current status.
    pub fn status(&self) -> LoadStatus {
        if self.finished.load(Ordering::Acquire) {
            LoadStatus::Finished
        } else {
            LoadStatus::Loading
        }
    }

    /// Returns `true` while the callback has not fired.
    pub fn is_loading(&self) -> bool {
        self.status() == LoadStatus::Loading
    }

    /// Returns `true` once the callback fired or the caller gave up.
    pub fn is_finished(&self) -> bool {
        self.status() == LoadStatus::Finished
    }

    /// Moves the handle to [`LoadStatus::Finished`].
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn finish(&self) -> bool {
        self.finished
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

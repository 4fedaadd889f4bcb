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

use balancy_core::schedule::{ScheduledTask, Scheduler};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

struct TimedTask {
    due: Duration,
    seq: u64,
    task: ScheduledTask,
}

impl PartialEq for TimedTask {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for TimedTask {}

impl PartialOrd for TimedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimedTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_seq: u64,
    queue: BinaryHeap<Reverse<TimedTask>>,
}

/// A cooperative scheduler driven by the host loop.
///
/// Time only moves when [`advance`](FrameScheduler::advance) is called. Due
/// tasks run on the calling thread, earliest deadline first and in scheduling
/// order among equal deadlines. Tasks may schedule further tasks; those run
/// within the same `advance` call if they are already due.
#[derive(Default)]
pub struct FrameScheduler {
    clock: Mutex<Clock>,
}

impl FrameScheduler {
    /// Creates a scheduler whose clock starts at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `delta` and runs every task that became due.
    ///
    /// Returns the number of tasks run.
    pub fn advance(&self, delta: Duration) -> usize {
        let now = {
            let mut clock = self.lock();
            clock.now += delta;
            clock.now
        };

        let mut ran = 0;
        while let Some(task) = self.pop_due(now) {
            task();
            ran += 1;
        }
        if ran > 0 {
            log::trace!("FrameScheduler ran {ran} task(s) at {now:?}.");
        }
        ran
    }

    /// Returns the current clock value.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Returns the number of tasks not yet run.
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    fn pop_due(&self, now: Duration) -> Option<ScheduledTask> {
        let mut clock = self.lock();
        let due = clock.queue.peek().map(|Reverse(next)| next.due)?;
        if due > now {
            return None;
        }
        clock.queue.pop().map(|Reverse(timed)| timed.task)
    }

    fn lock(&self) -> MutexGuard<'_, Clock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for FrameScheduler {
    fn after(&self, delay: Duration, task: ScheduledTask) {
        let mut clock = self.lock();
        let due = clock.now + delay;
        let seq = clock.next_seq;
        clock.next_seq += 1;
        clock.queue.push(Reverse(TimedTask { due, seq, task }));
    }
}

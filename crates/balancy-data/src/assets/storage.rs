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

//! A keyed cache of resolved assets combined with per-key pending queues.

use balancy_core::asset::{AssetObject, LoadKey};
use std::collections::HashMap;

/// Identifies one load attempt for a key.
///
/// Tickets are unique for the lifetime of a table, across resets, so a
/// completion can always tell whether the record it belongs to still exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// The pending queue of one in-flight load.
struct InFlight<W> {
    ticket: LoadTicket,
    waiters: Vec<W>,
}

/// What happened to a waiter handed to [`RequestTable::admit`].
pub enum Admission<W> {
    /// The key is cached. The waiter is handed back with the object so the
    /// caller can invoke it outside any lock.
    Cached(AssetObject, W),
    /// A load for the key is already in flight; the waiter joined its queue.
    Joined,
    /// No load was in flight; a new record was created and the caller must
    /// start the load identified by this ticket.
    Started(LoadTicket),
}

/// The outcome of reporting a load result to the table.
pub enum Settlement<W> {
    /// The ticket still owned the record: these waiters, in enqueue order,
    /// must receive `value`.
    Delivered {
        /// The object to deliver, `None` on failure.
        value: Option<AssetObject>,
        /// The waiters of the claimed record.
        waiters: Vec<W>,
    },
    /// The record was already claimed (by a timeout) or the table was reset.
    /// Nobody is waiting for this result.
    Late {
        /// `true` if the late result was a success; the key is now cached.
        cached: bool,
    },
}

/// The central table of the asset runtime.
///
/// For every [`LoadKey`] it holds either a resolved object, a queue of waiters
/// for the single load in flight, or nothing. Resolved entries are never
/// overwritten and failures are never cached.
///
/// The table is generic over the waiter type `W` so it stays free of any
/// callback machinery. It is not synchronized; the owner wraps it in a lock.
pub struct RequestTable<W> {
    cache: HashMap<LoadKey, AssetObject>,
    in_flight: HashMap<LoadKey, InFlight<W>>,
    next_ticket: u64,
    /// Tickets below this value were issued before the last reset.
    reset_floor: u64,
}

impl<W> Default for RequestTable<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> RequestTable<W> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            in_flight: HashMap::new(),
            next_ticket: 0,
            reset_floor: 0,
        }
    }

    /// Routes a new request for `key`.
    ///
    /// At most one record exists per key: the first request for an unresolved
    /// key creates it, later ones join it until it is settled or expired.
    pub fn admit(&mut self, key: &LoadKey, waiter: W) -> Admission<W> {
        if let Some(object) = self.cache.get(key) {
            return Admission::Cached(object.clone(), waiter);
        }

        if let Some(record) = self.in_flight.get_mut(key) {
            record.waiters.push(waiter);
            return Admission::Joined;
        }

        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight.insert(
            key.clone(),
            InFlight {
                ticket,
                waiters: vec![waiter],
            },
        );
        Admission::Started(ticket)
    }

    /// Reports the outcome of the load identified by `ticket`.
    ///
    /// A success is stored unless an entry already exists. Once the key is
    /// cached, the cached object is what gets delivered, even when this
    /// attempt failed. The record is claimed only if `ticket` still owns it.
    pub fn settle(
        &mut self,
        key: &LoadKey,
        ticket: LoadTicket,
        outcome: Option<AssetObject>,
    ) -> Settlement<W> {
        if self.is_stale(ticket) {
            return Settlement::Late { cached: false };
        }

        let succeeded = outcome.is_some();
        let value = match outcome {
            Some(object) => Some(self.cache.entry(key.clone()).or_insert(object).clone()),
            None => self.cache.get(key).cloned(),
        };

        match self.claim(key, ticket) {
            Some(waiters) => Settlement::Delivered { value, waiters },
            None => Settlement::Late { cached: succeeded },
        }
    }

    /// Claims the record owned by `ticket` without a result.
    ///
    /// Returns the waiters to notify, or `None` if the record was already
    /// settled, in which case the expiry is a no-op.
    pub fn expire(&mut self, key: &LoadKey, ticket: LoadTicket) -> Option<Vec<W>> {
        if self.is_stale(ticket) {
            return None;
        }
        self.claim(key, ticket)
    }

    /// Returns the cached object for `key`, if any.
    pub fn get(&self, key: &LoadKey) -> Option<&AssetObject> {
        self.cache.get(key)
    }

    /// Checks whether `key` has a cached object.
    pub fn contains(&self, key: &LoadKey) -> bool {
        self.cache.contains_key(key)
    }

    /// Checks whether a load for `key` is in flight.
    pub fn is_loading(&self, key: &LoadKey) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Checks whether the load identified by `ticket` still owns the record for `key`.
    pub fn owns(&self, key: &LoadKey, ticket: LoadTicket) -> bool {
        self.in_flight
            .get(key)
            .is_some_and(|record| record.ticket == ticket)
    }

    /// Returns the number of waiters queued on the load for `key`.
    pub fn waiting(&self, key: &LoadKey) -> usize {
        self.in_flight
            .get(key)
            .map_or(0, |record| record.waiters.len())
    }

    /// Returns the number of cached objects.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Returns the number of loads in flight.
    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    /// Drops every cached object and every pending record.
    ///
    /// Waiters of dropped records are returned so the owner can decide how to
    /// release them. Results of loads started before the reset are ignored.
    pub fn reset(&mut self) -> Vec<W> {
        log::debug!(
            "Resetting request table: {} cached, {} in flight.",
            self.cache.len(),
            self.in_flight.len()
        );
        self.cache.clear();
        self.reset_floor = self.next_ticket;
        self.in_flight
            .drain()
            .flat_map(|(_, record)| record.waiters)
            .collect()
    }

    fn is_stale(&self, ticket: LoadTicket) -> bool {
        ticket.0 < self.reset_floor
    }

    fn claim(&mut self, key: &LoadKey, ticket: LoadTicket) -> Option<Vec<W>> {
        match self.in_flight.get(key) {
            Some(record) if record.ticket == ticket => {
                self.in_flight.remove(key).map(|record| record.waiters)
            }
            _ => None,
        }
    }
}

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

//! An asset source backed by an in-memory catalog.

use anyhow::anyhow;
use balancy_core::address::AddressResolver;
use balancy_core::asset::{Asset, AssetObject, AssetSource, LoadCompletion, LoadKey};
use balancy_core::schedule::Scheduler;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

struct CatalogEntry {
    location: String,
    object: AssetObject,
}

/// One call observed by a [`MemorySource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    /// The requested key.
    pub key: LoadKey,
    /// The resolved location of the catalog entry, `None` for unknown keys.
    pub location: Option<String>,
}

/// An [`AssetSource`] serving pre-registered objects.
///
/// Each catalog entry pairs an object with its location, which is resolved
/// through the shared [`AddressResolver`] at load time, as a remote catalog
/// would. Completions are immediate unless a latency and a scheduler are
/// configured. Keys may be withheld to simulate loads that never finish.
#[derive(Default)]
pub struct MemorySource {
    catalog: RwLock<HashMap<LoadKey, CatalogEntry>>,
    withheld: RwLock<HashSet<LoadKey>>,
    requests: Mutex<Vec<SourceRequest>>,
    addresses: Option<Arc<AddressResolver>>,
    delay: Option<(Arc<dyn Scheduler>, Duration)>,
}

impl MemorySource {
    /// Creates an empty source completing loads immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every completion by `latency` on `scheduler`.
    pub fn with_latency(mut self, scheduler: Arc<dyn Scheduler>, latency: Duration) -> Self {
        self.delay = Some((scheduler, latency));
        self
    }

    /// Resolves entry locations through `addresses`.
    pub fn with_addresses(mut self, addresses: Arc<AddressResolver>) -> Self {
        self.addresses = Some(addresses);
        self
    }

    /// Registers `object` under `key`, replacing any previous entry.
    pub fn insert(&self, key: LoadKey, location: impl Into<String>, object: AssetObject) {
        let entry = CatalogEntry {
            location: location.into(),
            object,
        };
        write(&self.catalog).insert(key, entry);
    }

    /// Registers `asset` under its own kind and `name`.
    pub fn insert_asset<A: Asset>(&self, name: &str, location: impl Into<String>, asset: A) {
        self.insert(LoadKey::of::<A>(name), location, Arc::new(asset));
    }

    /// Removes the entry for `key`. Later loads of it fail.
    pub fn remove(&self, key: &LoadKey) -> bool {
        write(&self.catalog).remove(key).is_some()
    }

    /// Makes loads of `key` never complete.
    pub fn withhold(&self, key: LoadKey) {
        write(&self.withheld).insert(key);
    }

    /// Lets loads of `key` complete again.
    pub fn release(&self, key: &LoadKey) {
        write(&self.withheld).remove(key);
    }

    /// Returns every load observed so far, in call order.
    pub fn requests(&self) -> Vec<SourceRequest> {
        self.requests_lock().clone()
    }

    /// Returns how many times `key` was loaded.
    pub fn load_count(&self, key: &LoadKey) -> usize {
        self.requests_lock()
            .iter()
            .filter(|request| &request.key == key)
            .count()
    }

    fn resolve(&self, location: &str) -> String {
        match &self.addresses {
            Some(addresses) => addresses.resolve(location),
            None => location.to_string(),
        }
    }

    fn requests_lock(&self) -> MutexGuard<'_, Vec<SourceRequest>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AssetSource for MemorySource {
    fn load(&self, key: &LoadKey, completion: LoadCompletion) {
        let found = read(&self.catalog)
            .get(key)
            .map(|entry| (self.resolve(&entry.location), entry.object.clone()));

        self.requests_lock().push(SourceRequest {
            key: key.clone(),
            location: found.as_ref().map(|(location, _)| location.clone()),
        });

        if read(&self.withheld).contains(key) {
            log::debug!("MemorySource withholding '{key}'.");
            return;
        }

        let outcome = match found {
            Some((location, object)) => {
                log::trace!("MemorySource serving '{key}' from '{location}'.");
                Ok(object)
            }
            None => Err(anyhow!("no catalog entry for '{key}'")),
        };

        match &self.delay {
            Some((scheduler, latency)) => {
                scheduler.after(*latency, Box::new(move || completion(outcome)));
            }
            None => completion(outcome),
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

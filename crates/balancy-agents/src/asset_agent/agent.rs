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

//! The de-duplicating, caching, timeout-guarded request loop.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use balancy_core::address::AddressResolver;
use balancy_core::asset::{Asset, AssetKind, AssetObject, AssetSource, LoadKey};
use balancy_core::error::AssetError;
use balancy_core::schedule::Scheduler;
use balancy_data::assets::{Admission, LoadTicket, RequestTable, Settlement};

use super::config::RuntimeConfig;
use super::handle::LoadHandle;
use super::updates::DataUpdateSubscription;

/// A queued callback awaiting the outcome of one in-flight load.
pub(crate) struct Waiter {
    deliver: Box<dyn FnOnce(Option<AssetObject>) + Send>,
    /// `false` when a higher layer reports the failure itself.
    reports_failures: bool,
}

impl Waiter {
    pub(crate) fn new<F>(reports_failures: bool, deliver: F) -> Self
    where
        F: FnOnce(Option<AssetObject>) + Send + 'static,
    {
        Self {
            deliver: Box::new(deliver),
            reports_failures,
        }
    }

    fn resolve(self, value: Option<AssetObject>) {
        (self.deliver)(value)
    }
}

/// The level at which a failed load is reported: an error as soon as one
/// waiter is a direct caller, debug noise when every waiter handles it.
fn failure_level(waiters: &[Waiter]) -> log::Level {
    if waiters.iter().any(|waiter| waiter.reports_failures) {
        log::Level::Error
    } else {
        log::Level::Debug
    }
}

/// State shared between the runtime and the completions it hands out.
pub(crate) struct RuntimeShared {
    table: Mutex<RequestTable<Waiter>>,
    source: Arc<dyn AssetSource>,
    scheduler: Arc<dyn Scheduler>,
    config: RuntimeConfig,
    pub(crate) addresses: Arc<AddressResolver>,
    pub(crate) updates: Mutex<Option<DataUpdateSubscription>>,
}

/// The entry point for requesting assets by name.
///
/// Every request is routed by its [`LoadKey`]. A cached key is answered
/// synchronously. Otherwise the first request starts a single load through
/// the [`AssetSource`] and every later request for the same key joins it. The
/// outcome reaches all of them, in request order, when the source completes or
/// when the configured timeout elapses, whichever happens first.
///
/// Failures are never surfaced as errors: callers receive `None` and the cause
/// is logged. Successful results are cached until [`reset`](Self::reset).
///
/// Cloning the runtime is cheap; clones share the same cache.
#[derive(Clone)]
pub struct AssetsRuntime {
    pub(crate) shared: Arc<RuntimeShared>,
}

/// Assembles an [`AssetsRuntime`] from its collaborators.
pub struct AssetsRuntimeBuilder {
    source: Arc<dyn AssetSource>,
    scheduler: Arc<dyn Scheduler>,
    config: RuntimeConfig,
    addresses: Option<Arc<AddressResolver>>,
}

impl AssetsRuntimeBuilder {
    /// Replaces the default configuration.
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Shares `addresses` with the runtime, typically the same resolver the
    /// asset source uses. A private resolver is created otherwise.
    pub fn addresses(mut self, addresses: Arc<AddressResolver>) -> Self {
        self.addresses = Some(addresses);
        self
    }

    /// Builds the runtime with an empty cache.
    pub fn build(self) -> AssetsRuntime {
        log::info!(
            "AssetsRuntime initialized (load timeout {:?}).",
            self.config.load_timeout()
        );
        AssetsRuntime {
            shared: Arc::new(RuntimeShared {
                table: Mutex::new(RequestTable::new()),
                source: self.source,
                scheduler: self.scheduler,
                config: self.config,
                addresses: self.addresses.unwrap_or_default(),
                updates: Mutex::new(None),
            }),
        }
    }
}

impl AssetsRuntime {
    /// Starts building a runtime loading through `source` and timing out on `scheduler`.
    pub fn builder(
        source: Arc<dyn AssetSource>,
        scheduler: Arc<dyn Scheduler>,
    ) -> AssetsRuntimeBuilder {
        AssetsRuntimeBuilder {
            source,
            scheduler,
            config: RuntimeConfig::default(),
            addresses: None,
        }
    }

    /// Creates a runtime with the default configuration.
    pub fn new(source: Arc<dyn AssetSource>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self::builder(source, scheduler).build()
    }

    /// Requests `name` as an `A`.
    ///
    /// `callback` is invoked exactly once with the object, or with `None` if
    /// the load failed, timed out, or resolved to an object that is not an `A`.
    /// It runs synchronously when the key is cached. The returned handle turns
    /// [`Finished`](super::LoadStatus::Finished) when the callback fires; finishing it
    /// earlier suppresses the callback.
    pub fn request_asset<A, F>(&self, name: &str, callback: F) -> LoadHandle
    where
        A: Asset,
        F: FnOnce(Option<Arc<A>>) + Send + 'static,
    {
        self.request_typed::<A, F>(name, true, callback)
    }

    /// Same as [`request_asset`](Self::request_asset), with failures reported
    /// at error level only if `reports_failures` is set.
    pub(crate) fn request_typed<A, F>(
        &self,
        name: &str,
        reports_failures: bool,
        callback: F,
    ) -> LoadHandle
    where
        A: Asset,
        F: FnOnce(Option<Arc<A>>) + Send + 'static,
    {
        let handle = LoadHandle::new();
        let guard = handle.clone();
        self.shared.check_and_prepare(
            LoadKey::of::<A>(name),
            Waiter::new(reports_failures, move |object| {
                if guard.finish() {
                    callback(object.and_then(|object| object.downcast::<A>().ok()));
                }
            }),
        );
        handle
    }

    /// Requests `name` as an untyped object.
    pub fn request_object<F>(&self, name: &str, callback: F) -> LoadHandle
    where
        F: FnOnce(Option<AssetObject>) + Send + 'static,
    {
        let handle = LoadHandle::new();
        let guard = handle.clone();
        self.shared.check_and_prepare(
            LoadKey::new(AssetKind::Object, name),
            Waiter::new(true, move |object| {
                if guard.finish() {
                    callback(object);
                }
            }),
        );
        handle
    }

    /// Returns the cached `A` for `name`, without loading it.
    pub fn cached<A: Asset>(&self, name: &str) -> Option<Arc<A>> {
        self.shared
            .table()
            .get(&LoadKey::of::<A>(name))
            .cloned()
            .and_then(|object| object.downcast::<A>().ok())
    }

    /// Checks whether `name` is cached as an `A`.
    pub fn is_cached<A: Asset>(&self, name: &str) -> bool {
        self.shared.table().contains(&LoadKey::of::<A>(name))
    }

    /// Checks whether a load of `name` as an `A` is in flight.
    pub fn is_loading<A: Asset>(&self, name: &str) -> bool {
        self.shared.table().is_loading(&LoadKey::of::<A>(name))
    }

    /// Returns the number of cached objects, all kinds included.
    pub fn cached_len(&self) -> usize {
        self.shared.table().cached_len()
    }

    /// Returns the resolver used to rewrite asset locations.
    pub fn addresses(&self) -> &Arc<AddressResolver> {
        &self.shared.addresses
    }

    /// Forgets every cached object and pending load.
    ///
    /// Callers still waiting receive `None`. Loads started before the reset
    /// no longer affect the cache when they complete.
    pub fn reset(&self) {
        let orphans = self.shared.table().reset();
        log::info!(
            "AssetsRuntime reset; releasing {} pending request(s).",
            orphans.len()
        );
        for waiter in orphans {
            waiter.resolve(None);
        }
    }
}

impl RuntimeShared {
    fn table(&self) -> MutexGuard<'_, RequestTable<Waiter>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answers from the cache, joins an in-flight load, or starts a new one.
    ///
    /// Waiters are always invoked with the table unlocked so they may issue
    /// further requests.
    pub(crate) fn check_and_prepare(self: &Arc<Self>, key: LoadKey, waiter: Waiter) {
        if key.name().is_empty() {
            let level = if waiter.reports_failures {
                log::Level::Warn
            } else {
                log::Level::Debug
            };
            log::log!(level, "{}", AssetError::EmptyName { kind: key.kind() });
            waiter.resolve(None);
            return;
        }

        let admission = self.table().admit(&key, waiter);
        match admission {
            Admission::Cached(object, waiter) => {
                log::trace!("Serving '{key}' from cache.");
                waiter.resolve(Some(object));
            }
            Admission::Joined => {
                log::trace!("Joining in-flight load of '{key}'.");
            }
            Admission::Started(ticket) => self.start_load(key, ticket),
        }
    }

    fn start_load(self: &Arc<Self>, key: LoadKey, ticket: LoadTicket) {
        log::debug!("Loading '{key}'.");

        let weak = Arc::downgrade(self);
        let completion_key = key.clone();
        self.source.load(
            &key,
            Box::new(move |outcome| {
                if let Some(shared) = weak.upgrade() {
                    shared.on_loaded(&completion_key, ticket, outcome);
                }
            }),
        );

        // The source may have completed synchronously.
        if !self.table().owns(&key, ticket) {
            return;
        }

        let weak: Weak<Self> = Arc::downgrade(self);
        self.scheduler.after(
            self.config.load_timeout(),
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.on_timeout(&key, ticket);
                }
            }),
        );
    }

    fn on_loaded(&self, key: &LoadKey, ticket: LoadTicket, outcome: anyhow::Result<AssetObject>) {
        let (object, failure) = match outcome {
            Ok(object) => (Some(object), None),
            Err(err) => (None, Some(err)),
        };

        let settlement = self.table().settle(key, ticket, object);
        match settlement {
            Settlement::Delivered { value, waiters } => {
                match (failure, &value) {
                    (Some(err), None) => log::log!(
                        failure_level(&waiters),
                        "{}",
                        AssetError::LoadFailed {
                            key: key.clone(),
                            reason: format!("{err:#}"),
                        }
                    ),
                    (Some(err), Some(_)) => log::debug!(
                        "Load of '{key}' failed ({err:#}); delivering the cached object."
                    ),
                    (None, _) => log::debug!("Loaded '{key}' for {} waiter(s).", waiters.len()),
                }
                for waiter in waiters {
                    waiter.resolve(value.clone());
                }
            }
            Settlement::Late { cached: true } => {
                log::debug!("Late result for '{key}' stored in cache.");
            }
            Settlement::Late { cached: false } => {
                log::debug!("Discarding late result for '{key}'.");
            }
        }
    }

    fn on_timeout(&self, key: &LoadKey, ticket: LoadTicket) {
        let expired = self.table().expire(key, ticket);
        if let Some(waiters) = expired {
            log::log!(
                failure_level(&waiters),
                "{}",
                AssetError::LoadTimeout {
                    key: key.clone(),
                    timeout: self.config.load_timeout(),
                }
            );
            for waiter in waiters {
                waiter.resolve(None);
            }
        }
    }
}

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

//! Rewriting of placeholder-prefixed asset locations into download URLs.
//!
//! Catalog entries point at `BALANCY_URL/...` locations that only become
//! concrete once the backend reports the download origin for the current
//! platform. The [`AddressResolver`] is shared between the runtime, which
//! updates the origin, and the asset source, which resolves locations through it.

use crate::platform::DevicePlatform;
use std::sync::RwLock;

/// The prefix marking a location as relative to the remote download origin.
pub const URL_PLACEHOLDER: &str = "BALANCY_URL";

/// Provides the addressables download origin for a device platform.
pub trait UrlProvider: Send + Sync {
    /// Returns the origin for `platform`, or `None` if none is known yet.
    fn addressables_url(&self, platform: DevicePlatform) -> Option<String>;
}

impl<F> UrlProvider for F
where
    F: Fn(DevicePlatform) -> Option<String> + Send + Sync,
{
    fn addressables_url(&self, platform: DevicePlatform) -> Option<String> {
        self(platform)
    }
}

/// A thread-safe, replaceable location rewriting function.
#[derive(Debug, Default)]
pub struct AddressResolver {
    origin: RwLock<Option<String>>,
}

impl AddressResolver {
    /// Creates a resolver with no origin; every location passes through unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the download origin used for placeholder locations.
    pub fn set_origin(&self, origin: impl Into<String>) {
        let origin = origin.into();
        log::info!("Asset download origin set to '{origin}'.");
        match self.origin.write() {
            Ok(mut slot) => *slot = Some(origin),
            Err(poisoned) => *poisoned.into_inner() = Some(origin),
        }
    }

    /// Returns the current download origin, if any.
    pub fn origin(&self) -> Option<String> {
        match self.origin.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Rewrites `location` if it starts with [`URL_PLACEHOLDER`] and an origin is set.
    ///
    /// Doubled slashes are collapsed before the placeholder is substituted, so
    /// `BALANCY_URL//bundles/a` becomes `<origin>/bundles/a`.
    pub fn resolve(&self, location: &str) -> String {
        if !location.starts_with(URL_PLACEHOLDER) {
            return location.to_string();
        }
        match self.origin() {
            Some(origin) => location
                .replace("//", "/")
                .replace(URL_PLACEHOLDER, &origin),
            None => location.to_string(),
        }
    }
}

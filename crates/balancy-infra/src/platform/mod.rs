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

//! Platform-facing collaborators.

use balancy_core::address::UrlProvider;
use balancy_core::platform::DevicePlatform;
use std::collections::HashMap;

/// A [`UrlProvider`] backed by a fixed per-platform table.
#[derive(Debug, Clone, Default)]
pub struct StaticUrlProvider {
    urls: HashMap<DevicePlatform, String>,
    fallback: Option<String>,
}

impl StaticUrlProvider {
    /// Creates a provider that knows no URL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the URL for `platform`.
    pub fn with_url(mut self, platform: DevicePlatform, url: impl Into<String>) -> Self {
        self.urls.insert(platform, url.into());
        self
    }

    /// Sets the URL used for platforms without an explicit entry.
    pub fn with_fallback(mut self, url: impl Into<String>) -> Self {
        self.fallback = Some(url.into());
        self
    }
}

impl UrlProvider for StaticUrlProvider {
    fn addressables_url(&self, platform: DevicePlatform) -> Option<String> {
        self.urls
            .get(&platform)
            .or(self.fallback.as_ref())
            .cloned()
    }
}

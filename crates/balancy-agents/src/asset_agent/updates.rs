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

//! Keeps the download origin in sync with backend data updates.

use std::sync::{Arc, PoisonError};

use balancy_core::address::UrlProvider;
use balancy_core::event::DataUpdated;
use balancy_core::platform::{DevicePlatform, RuntimePlatform};

use super::agent::AssetsRuntime;

/// The wiring installed by [`AssetsRuntime::subscribe_data_updates`].
pub(crate) struct DataUpdateSubscription {
    receiver: flume::Receiver<DataUpdated>,
    provider: Arc<dyn UrlProvider>,
    platform: DevicePlatform,
}

impl AssetsRuntime {
    /// Listens for [`DataUpdated`] events on `receiver`.
    ///
    /// After each event the runtime asks `provider` for the download origin of
    /// `platform` (editors use their player's content) and installs it in the
    /// shared [`AddressResolver`](balancy_core::AddressResolver). Subscribing
    /// again replaces the previous subscription, so a runtime never reacts
    /// twice to the same event stream.
    pub fn subscribe_data_updates(
        &self,
        receiver: flume::Receiver<DataUpdated>,
        provider: Arc<dyn UrlProvider>,
        platform: RuntimePlatform,
    ) {
        let platform = DevicePlatform::from(platform);
        let previous = self
            .shared
            .updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(DataUpdateSubscription {
                receiver,
                provider,
                platform,
            });
        if previous.is_some() {
            log::debug!("Replaced existing data update subscription.");
        }
        log::info!("AssetsRuntime listening for data updates ({platform:?}).");
    }

    /// Handles every data update received since the last call.
    ///
    /// Meant to be called from the host loop. Returns the number of events handled.
    pub fn process_data_updates(&self) -> usize {
        let updates = self
            .shared
            .updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(subscription) = updates.as_ref() else {
            return 0;
        };

        let mut handled = 0;
        for event in subscription.receiver.try_iter() {
            log::debug!(
                "Data updated (data: {}, profile: {}).",
                event.data_updated,
                event.profile_changed
            );
            self.prepare_addresses(subscription);
            handled += 1;
        }
        handled
    }

    fn prepare_addresses(&self, subscription: &DataUpdateSubscription) {
        match subscription
            .provider
            .addressables_url(subscription.platform)
        {
            Some(url) if !url.is_empty() => self.shared.addresses.set_origin(url),
            _ => log::debug!(
                "No addressables URL for {:?}; keeping the current origin.",
                subscription.platform
            ),
        }
    }
}

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

//! Sprite requests with a texture fallback.

use std::sync::Arc;

use balancy_core::asset::{Sprite, Texture2D};
use balancy_core::error::AssetError;

use super::agent::AssetsRuntime;
use super::handle::LoadHandle;

impl AssetsRuntime {
    /// Requests `name` as a [`Sprite`].
    ///
    /// Assets are often registered as plain textures while callers want a
    /// sprite. If `name` does not resolve as a sprite, it is requested again as
    /// a [`Texture2D`] and wrapped into a sprite covering the whole texture with
    /// a centered pivot. `callback` receives `None` only if both attempts fail.
    ///
    /// The intermediate failures are only logged at debug level: a miss under
    /// both kinds is reported once, as [`AssetError::SpriteFallbackExhausted`].
    /// The returned handle governs `callback`, not the intermediate requests.
    pub fn request_sprite<F>(&self, name: &str, callback: F) -> LoadHandle
    where
        F: FnOnce(Option<Arc<Sprite>>) + Send + 'static,
    {
        let handle = LoadHandle::new();
        let outer = handle.clone();
        let deliver = move |sprite: Option<Arc<Sprite>>| {
            if outer.finish() {
                callback(sprite);
            }
        };

        let runtime = self.clone();
        let fallback_name = name.to_string();
        self.request_typed::<Sprite, _>(name, false, move |sprite| match sprite {
            Some(sprite) => deliver(Some(sprite)),
            None => {
                log::debug!("Failed to load '{fallback_name}' as a sprite, trying texture.");
                let name = fallback_name.clone();
                runtime.request_typed::<Texture2D, _>(&fallback_name, false, move |texture| {
                    match texture {
                        Some(texture) => deliver(Some(Arc::new(Sprite::from_texture(texture)))),
                        None => {
                            log::error!("{}", AssetError::SpriteFallbackExhausted { name });
                            deliver(None);
                        }
                    }
                });
            }
        });

        handle
    }
}

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

use super::{AssetObject, LoadKey};

/// The one-shot completion signal handed to an [`AssetSource`].
///
/// `Ok` carries the resolved object, `Err` the reason the source gave up.
pub type LoadCompletion = Box<dyn FnOnce(anyhow::Result<AssetObject>) + Send>;

/// A collaborator that resolves a [`LoadKey`] to an object asynchronously.
///
/// This represents the "data plane" of asset loading: how a name turns into
/// bytes and then into an object is entirely up to the implementor. The runtime
/// only needs one resolution call per key and a completion signal.
///
/// The completion may be invoked synchronously from within `load`, later on
/// the host loop, from another thread, or never at all (the runtime guards
/// against the last case with a timeout).
pub trait AssetSource: Send + Sync {
    /// Starts resolving `key` and reports the outcome through `completion`.
    fn load(&self, key: &LoadKey, completion: LoadCompletion);
}

impl<F> AssetSource for F
where
    F: Fn(&LoadKey, LoadCompletion) + Send + Sync,
{
    fn load(&self, key: &LoadKey, completion: LoadCompletion) {
        self(key, completion)
    }
}

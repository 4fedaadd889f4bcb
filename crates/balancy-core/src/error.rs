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

//! Defines the failures the asset runtime absorbs and reports through logs.
//!
//! None of these reach callers: every failure is delivered as "no asset".

use crate::asset::{AssetKind, LoadKey};
use std::time::Duration;
use thiserror::Error;

/// A failure observed while resolving an asset request.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The asset source reported a failure for the key.
    #[error("Couldn't load asset '{key}': {reason}")]
    LoadFailed {
        /// The key that failed to load.
        key: LoadKey,
        /// The reason reported by the source.
        reason: String,
    },
    /// The asset source did not complete within the allowed time.
    #[error("[Timeout] Couldn't load asset '{key}' within {timeout:?}")]
    LoadTimeout {
        /// The key whose load timed out.
        key: LoadKey,
        /// The time waited before giving up.
        timeout: Duration,
    },
    /// Neither a sprite nor a texture could be resolved for a sprite request.
    #[error("Couldn't load '{name}' as a sprite or as a texture")]
    SpriteFallbackExhausted {
        /// The requested asset name.
        name: String,
    },
    /// A request was issued with an empty asset name.
    #[error("Rejected {kind} request with an empty asset name")]
    EmptyName {
        /// The kind that was requested.
        kind: AssetKind,
    },
}

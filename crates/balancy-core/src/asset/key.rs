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

use super::{Asset, AssetKind};
use std::fmt;

/// Identifies a unique logical resource: an asset name under a given kind.
///
/// Keys are immutable once formed. Two keys with the same name but different
/// kinds never share a cache entry or an in-flight load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadKey {
    kind: AssetKind,
    name: String,
}

impl LoadKey {
    /// Creates a key for `name` under `kind`.
    pub fn new(kind: AssetKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Creates a key for `name` under the kind associated with `A`.
    pub fn of<A: Asset>(name: impl Into<String>) -> Self {
        Self::new(A::KIND, name)
    }

    /// The cache partition of this key.
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// The asset name of this key.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for LoadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

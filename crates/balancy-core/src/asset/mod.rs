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

//! Provides the foundational traits and primitive types for the asset runtime.
//!
//! This module defines the "common language" for every asset-related operation.
//! It contains the contracts that other crates implement or consume, but it has
//! no knowledge of how assets are resolved, cached or scheduled.
//!
//! The key components are:
//! - The [`Asset`] trait: a marker tying a Rust type to an [`AssetKind`].
//! - [`LoadKey`]: the `(kind, name)` pair identifying one cacheable resource.
//! - [`AssetSource`]: the injected collaborator performing the actual loads.

mod key;
mod source;
mod sprite;

pub use key::*;
pub use source::*;
pub use sprite::*;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A type-erased, shared reference to a resolved asset.
///
/// The runtime never owns or copies the object behind it; it only keeps the
/// reference handed over by the [`AssetSource`].
pub type AssetObject = Arc<dyn Any + Send + Sync>;

/// The discriminator partitioning the cache.
///
/// The same name requested under two different kinds is tracked as two
/// unrelated resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Any object, requested without an expected type.
    Object,
    /// A raw two-dimensional texture.
    Texture2D,
    /// A sprite wrapping a region of a texture.
    Sprite,
    /// A prefabricated object hierarchy.
    Prefab,
    /// A 3D model.
    Model,
    /// A sound clip.
    AudioClip,
    /// A material description.
    Material,
    /// A kind defined outside this crate, identified by a stable name.
    Custom(&'static str),
}

impl AssetKind {
    /// Returns a short, stable name for this kind, suitable for logs.
    pub fn name(&self) -> &'static str {
        match self {
            AssetKind::Object => "object",
            AssetKind::Texture2D => "texture2d",
            AssetKind::Sprite => "sprite",
            AssetKind::Prefab => "prefab",
            AssetKind::Model => "model",
            AssetKind::AudioClip => "audio_clip",
            AssetKind::Material => "material",
            AssetKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A marker trait for types that can be requested from the asset runtime.
///
/// The associated [`KIND`](Asset::KIND) selects the cache partition a request
/// for this type goes to. Objects resolved under that kind are downcast to the
/// implementing type before being handed to callers.
///
/// # Examples
///
/// ```
/// use balancy_core::asset::{Asset, AssetKind};
///
/// struct Hero {
///     hit_points: u32,
/// }
///
/// impl Asset for Hero {
///     const KIND: AssetKind = AssetKind::Prefab;
/// }
/// ```
pub trait Asset: Any + Send + Sync {
    /// The cache partition requests for this type are routed to.
    const KIND: AssetKind;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_are_stable() {
        assert_eq!(AssetKind::Texture2D.to_string(), "texture2d");
        assert_eq!(AssetKind::Custom("shader").to_string(), "shader");
    }

    #[test]
    fn custom_kinds_are_distinct_by_name() {
        assert_ne!(AssetKind::Custom("a"), AssetKind::Custom("b"));
        assert_eq!(AssetKind::Custom("a"), AssetKind::Custom("a"));
    }
}

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

//! Image-side asset types and the texture-to-sprite conversion.

use super::{Asset, AssetKind};
use std::sync::Arc;

/// A two-dimensional vector with `f32` components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    /// The x component.
    pub x: f32,
    /// The y component.
    pub y: f32,
}

impl Vec2 {
    /// Creates a new vector.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in texture pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Bottom edge.
    pub y: f32,
    /// Horizontal size.
    pub width: f32,
    /// Vertical size.
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A raw 2D texture as resolved by an asset source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Texture2D {
    /// Debug name of the texture.
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 pixels, row by row. May be empty when the pixels
    /// live on the GPU only.
    pub pixels: Vec<u8>,
}

impl Texture2D {
    /// Creates a texture that carries only its dimensions.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            pixels: Vec::new(),
        }
    }

    /// Creates a texture from RGBA8 pixel data.
    ///
    /// Returns `None` if `pixels` does not hold exactly `width * height * 4` bytes.
    pub fn from_rgba8(
        name: impl Into<String>,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if pixels.len() != expected {
            return None;
        }
        Some(Self {
            name: name.into(),
            width,
            height,
            pixels,
        })
    }
}

impl Asset for Texture2D {
    const KIND: AssetKind = AssetKind::Texture2D;
}

/// A drawable region of a texture with a pivot point.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// The texture the sprite samples from.
    pub texture: Arc<Texture2D>,
    /// The region of the texture covered by the sprite, in pixels.
    pub rect: Rect,
    /// The pivot, normalized to the rect (`(0.5, 0.5)` is the center).
    pub pivot: Vec2,
}

impl Sprite {
    /// The pivot used for sprites synthesized from a whole texture.
    pub const CENTER_PIVOT: Vec2 = Vec2::new(0.5, 0.5);

    /// Wraps a whole texture into a sprite centered on its middle.
    ///
    /// The rect spans `(0, 0)` to the texture's pixel size. The conversion is
    /// pure: the texture is shared, not copied.
    pub fn from_texture(texture: Arc<Texture2D>) -> Self {
        let rect = Rect::new(0.0, 0.0, texture.width as f32, texture.height as f32);
        Self {
            texture,
            rect,
            pivot: Self::CENTER_PIVOT,
        }
    }
}

impl Asset for Sprite {
    const KIND: AssetKind = AssetKind::Sprite;
}

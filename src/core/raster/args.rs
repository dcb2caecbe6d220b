// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
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

//! Draw argument bundle
//!
//! [`PolyDrawArgs`] is the immutable-per-call bundle of transform and
//! shading parameters, texture reference, clip rectangle, and draw mode
//! that scene code constructs and the rasterizer consumes. It is either
//! consumed synchronously or queued to a worker and then discarded.

use super::vertex::{TriUniforms, TriVertex};

/// Vertex buffer topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleDrawMode {
    /// Independent triangle list: vertices 3n, 3n+1, 3n+2
    Normal,
    /// Triangle fan around vertex 0
    Fan,
    /// Triangle strip with alternating winding
    Strip,
}

/// Pixel-level output selection
///
/// Chosen once per draw call; each variant has its own monomorphic inner
/// loop in the screen drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriDrawVariant {
    /// Textured fill, 8-bit palette indices
    Draw,
    /// Solid color fill, 8-bit palette index
    Fill,
    /// Stencil-only write, no color output
    Stencil,
    /// Textured fill, 32-bit true color
    Draw32,
    /// Solid color fill, 32-bit true color
    Fill32,
    /// Writes the subsector identifier into the G-buffer instead of color
    DrawSubsector32,
}

/// Decoded texture pixels in one of the two supported formats
///
/// The two formats are never valid at the same time; the true-color flag
/// decides which one the collaborator hands over.
#[derive(Debug, Clone, Copy)]
pub enum TexturePixels<'a> {
    /// 8-bit palette indices
    Indexed(&'a [u8]),
    /// 32-bit BGRA
    TrueColor(&'a [u32]),
}

/// Texture reference for one draw call
#[derive(Debug, Clone, Copy)]
pub struct TextureSource<'a> {
    pub width: usize,
    pub height: usize,
    pub pixels: TexturePixels<'a>,
}

impl<'a> TextureSource<'a> {
    /// Sample a palette index with nearest filtering and wrapping
    #[inline]
    pub fn sample_indexed(&self, u: f32, v: f32) -> u8 {
        match self.pixels {
            TexturePixels::Indexed(pixels) if !pixels.is_empty() => {
                pixels[self.texel_offset(u, v)]
            }
            _ => 0,
        }
    }

    /// Sample a BGRA texel with nearest filtering and wrapping
    #[inline]
    pub fn sample_bgra(&self, u: f32, v: f32) -> u32 {
        match self.pixels {
            TexturePixels::TrueColor(pixels) if !pixels.is_empty() => {
                pixels[self.texel_offset(u, v)]
            }
            _ => 0,
        }
    }

    #[inline]
    fn texel_offset(&self, u: f32, v: f32) -> usize {
        debug_assert!(self.width > 0 && self.height > 0);
        let x = ((u * self.width as f32).floor() as i64).rem_euclid(self.width as i64);
        let y = ((v * self.height as f32).floor() as i64).rem_euclid(self.height as i64);
        y as usize * self.width + x as usize
    }
}

/// Texture collaborator boundary
///
/// Exposes decoded pixel buffers and dimensions; decoding and archive
/// access happen upstream. Only the buffer matching the true-color flag is
/// expected to be valid.
pub trait Texture {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// 8-bit palette-indexed pixels
    fn pixels(&self) -> &[u8];
    /// 32-bit BGRA pixels
    fn pixels_bgra(&self) -> &[u32];
}

/// Immutable argument bundle for one draw call
///
/// # Examples
///
/// ```
/// use softpoly::core::raster::{PolyDrawArgs, TriVertex};
///
/// let vertices = [
///     TriVertex::position(0.0, 0.0, 0.0, 1.0),
///     TriVertex::position(1.0, 0.0, 0.0, 1.0),
///     TriVertex::position(0.0, 1.0, 0.0, 1.0),
/// ];
/// let args = PolyDrawArgs::new(&vertices, 0, 320, 0, 200);
/// assert_eq!(args.clip_right, 320);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PolyDrawArgs<'a> {
    pub uniforms: TriUniforms,
    pub vertices: &'a [TriVertex],
    pub mode: TriangleDrawMode,
    pub ccw: bool,

    /// Clip rectangle in pixels; left/top inclusive, right/bottom exclusive
    pub clip_left: i32,
    pub clip_right: i32,
    pub clip_top: i32,
    pub clip_bottom: i32,

    pub texture: Option<TextureSource<'a>>,

    /// Fallback color for the fill variants (palette index in the low byte
    /// for `Fill`, BGRA for `Fill32`)
    pub solid_color: u32,

    pub stencil_test_value: u8,
    pub stencil_write_value: u8,
}

impl<'a> PolyDrawArgs<'a> {
    /// Create args with default uniforms and no texture
    pub fn new(
        vertices: &'a [TriVertex],
        clip_left: i32,
        clip_right: i32,
        clip_top: i32,
        clip_bottom: i32,
    ) -> Self {
        Self {
            uniforms: TriUniforms::default(),
            vertices,
            mode: TriangleDrawMode::Normal,
            ccw: true,
            clip_left,
            clip_right,
            clip_top,
            clip_bottom,
            texture: None,
            solid_color: 0,
            stencil_test_value: 0,
            stencil_write_value: 0,
        }
    }

    /// Reference a texture, selecting the pixel format by the true-color flag
    pub fn set_texture(&mut self, texture: &'a dyn Texture, true_color: bool) {
        let pixels = if true_color {
            TexturePixels::TrueColor(texture.pixels_bgra())
        } else {
            TexturePixels::Indexed(texture.pixels())
        };
        self.texture = Some(TextureSource {
            width: texture.width(),
            height: texture.height(),
            pixels,
        });
    }
}

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

//! Vertex and uniform definitions
//!
//! A vertex carries a homogeneous position plus a fixed set of interpolable
//! attributes. The attribute count is uniform across all vertices of one
//! draw call by construction (fixed-size array), which is what makes the
//! clip and gradient code branch-free.

use bitflags::bitflags;

use crate::core::math::Mat4;

/// Number of interpolable attributes per vertex
pub const NUM_VARYING: usize = 3;

/// Attribute slot: horizontal texture coordinate
pub const VARYING_U: usize = 0;

/// Attribute slot: vertical texture coordinate
pub const VARYING_V: usize = 1;

/// Attribute slot: light level (0.0 dark to 1.0 full)
pub const VARYING_LIGHT: usize = 2;

/// A triangle vertex
///
/// Positions are in object space when handed to the drawer, clip space after
/// [`shade_vertex`](super::PolyTriangleDrawer), and screen space (with `w`
/// replaced by `1/w` and varyings premultiplied) once rasterization starts.
///
/// # Examples
///
/// ```
/// use softpoly::core::raster::TriVertex;
///
/// let v = TriVertex::position(1.0, 2.0, 0.0, 1.0);
/// assert_eq!(v.x, 1.0);
/// assert_eq!(v.varying, [0.0; 3]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,

    /// Interpolable attributes (u, v, light)
    pub varying: [f32; NUM_VARYING],
}

impl TriVertex {
    /// Create a vertex with zeroed attributes
    pub fn position(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self {
            x,
            y,
            z,
            w,
            varying: [0.0; NUM_VARYING],
        }
    }

    /// Create a vertex with texture coordinates and a light level
    pub fn new(x: f32, y: f32, z: f32, w: f32, u: f32, v: f32, light: f32) -> Self {
        Self {
            x,
            y,
            z,
            w,
            varying: [u, v, light],
        }
    }

    /// Linear interpolation between two vertices, attributes included
    ///
    /// Used by the clipper to synthesize vertices on half-space boundaries.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let mut varying = [0.0; NUM_VARYING];
        for (i, slot) in varying.iter_mut().enumerate() {
            *slot = self.varying[i] + (other.varying[i] - self.varying[i]) * t;
        }
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
            w: self.w + (other.w - self.w) * t,
            varying,
        }
    }
}

bitflags! {
    /// Per-draw shading flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TriUniformFlags: u32 {
        /// Ignore the light varying; use the uniform light level as-is
        const FIXED_LIGHT = 1 << 0;
    }
}

/// Immutable per-draw transform and shading parameters
#[derive(Debug, Clone, Copy)]
pub struct TriUniforms {
    /// Object space to clip space transform
    pub object_to_clip: Mat4,

    /// Uniform light level (0-255)
    pub light: u32,

    /// Subsector identifier written by the `DrawSubsector32` variant
    pub subsector_id: u32,

    /// Shading flags
    pub flags: TriUniformFlags,
}

impl Default for TriUniforms {
    fn default() -> Self {
        Self {
            object_to_clip: Mat4::IDENTITY,
            light: 255,
            subsector_id: 0,
            flags: TriUniformFlags::empty(),
        }
    }
}

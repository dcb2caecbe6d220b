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

//! Triangle rasterizer
//!
//! The drawer takes an immutable [`PolyDrawArgs`] bundle, shades its
//! vertices into clip space, clips against the view frustum, and fills the
//! resulting polygon scanline by scanline into the active
//! [`RenderTarget`], writing color, stencil, or subsector output depending
//! on the [`TriDrawVariant`].
//!
//! # Pipeline
//!
//! 1. `draw_arrays` partitions the vertex buffer into triangles
//!    (list/fan/strip) and culls by winding
//! 2. `shade_vertex` applies the uniform transform into clip space
//! 3. `clip_edge` clips against the six frustum half-spaces
//! 4. The clipped polygon is fan-triangulated and each triangle handed to
//!    the variant's pixel drawer via `draw_shaded_triangle`
//!
//! Degenerate and fully clipped triangles silently produce no pixels;
//! there is no error path out of a draw call.

mod args;
mod clip;
mod screen;
mod target;
mod vertex;
mod worker;

#[cfg(test)]
mod tests;

pub use args::{PolyDrawArgs, Texture, TexturePixels, TextureSource, TriDrawVariant, TriangleDrawMode};
pub use clip::MAX_ADDITIONAL_VERTICES;
pub use target::{ColorBuffer, RenderTarget};
pub use vertex::{
    TriUniformFlags, TriUniforms, TriVertex, NUM_VARYING, VARYING_LIGHT, VARYING_U, VARYING_V,
};
pub use worker::{DrawPolyTrianglesCommand, PolyCommandQueue, WorkerThreadData};

use clip::MAX_CLIP_VERTICES;
use screen::{DrawFunc, ScreenTriangleDrawer, TriDrawTriangleArgs};
use worker::WorkerTarget;

/// Top-level polygon drawer
///
/// All methods are stateless; per-call state travels in [`PolyDrawArgs`]
/// and the target.
pub struct PolyTriangleDrawer;

impl PolyTriangleDrawer {
    /// Draw a vertex buffer immediately on the calling thread
    ///
    /// For pooled execution, queue the call through a [`PolyCommandQueue`]
    /// instead.
    pub fn draw(target: &mut RenderTarget<'_>, args: &PolyDrawArgs<'_>, variant: TriDrawVariant) {
        let mut workers = target.split_bands(1);
        if let Some(worker) = workers.first_mut() {
            Self::draw_arrays(args, variant, worker);
        }
    }

    /// Partition the vertex buffer into triangles and rasterize them
    pub(crate) fn draw_arrays(
        args: &PolyDrawArgs<'_>,
        variant: TriDrawVariant,
        worker: &mut WorkerTarget<'_>,
    ) {
        if args.vertices.len() < 3 {
            return;
        }
        debug_assert!(args.clip_left <= args.clip_right && args.clip_top <= args.clip_bottom);

        let drawfunc: DrawFunc = match variant {
            TriDrawVariant::Draw => ScreenTriangleDrawer::draw,
            TriDrawVariant::Fill => ScreenTriangleDrawer::fill,
            TriDrawVariant::Stencil => ScreenTriangleDrawer::stencil,
            TriDrawVariant::Draw32 => ScreenTriangleDrawer::draw32,
            TriDrawVariant::Fill32 => ScreenTriangleDrawer::fill32,
            TriDrawVariant::DrawSubsector32 => ScreenTriangleDrawer::draw_subsector32,
        };

        let verts = args.vertices;
        match args.mode {
            TriangleDrawMode::Normal => {
                for tri in verts.chunks_exact(3) {
                    Self::draw_triangle(&[tri[0], tri[1], tri[2]], args.ccw, args, worker, drawfunc);
                }
            }
            TriangleDrawMode::Fan => {
                for i in 2..verts.len() {
                    Self::draw_triangle(
                        &[verts[0], verts[i - 1], verts[i]],
                        args.ccw,
                        args,
                        worker,
                        drawfunc,
                    );
                }
            }
            TriangleDrawMode::Strip => {
                let mut ccw = args.ccw;
                for i in 2..verts.len() {
                    Self::draw_triangle(
                        &[verts[i - 2], verts[i - 1], verts[i]],
                        ccw,
                        args,
                        worker,
                        drawfunc,
                    );
                    ccw = !ccw;
                }
            }
        }
    }

    /// Transform one vertex into clip space
    ///
    /// The position is transformed by the uniform matrix; attributes pass
    /// through untouched.
    fn shade_vertex(uniforms: &TriUniforms, mut v: TriVertex) -> TriVertex {
        let pos = uniforms
            .object_to_clip
            .transform(crate::core::math::Vec4::new(v.x, v.y, v.z, 1.0));
        v.x = pos.x;
        v.y = pos.y;
        v.z = pos.z;
        v.w = pos.w;
        v
    }

    /// Shade, clip, and rasterize one input triangle
    fn draw_triangle(
        verts: &[TriVertex; 3],
        ccw: bool,
        args: &PolyDrawArgs<'_>,
        worker: &mut WorkerTarget<'_>,
        drawfunc: DrawFunc,
    ) {
        let shaded = [
            Self::shade_vertex(&args.uniforms, verts[0]),
            Self::shade_vertex(&args.uniforms, verts[1]),
            Self::shade_vertex(&args.uniforms, verts[2]),
        ];

        let mut clipped = [TriVertex::default(); MAX_CLIP_VERTICES];
        let count = clip::clip_edge(&shaded, &mut clipped);
        if count < 3 {
            return;
        }

        for v in &mut clipped[..count] {
            if v.w <= 0.0 {
                return;
            }
            *v = Self::to_screen(*v, worker.width, worker.height);
        }

        for i in 2..count {
            Self::draw_shaded_triangle(
                &clipped[0],
                &clipped[i - 1],
                &clipped[i],
                ccw,
                args,
                worker,
                drawfunc,
            );
        }
    }

    /// Perspective divide and viewport transform
    ///
    /// Output is screen space: `w` holds `1/w` and the varyings are
    /// premultiplied by it for perspective-correct interpolation.
    fn to_screen(mut v: TriVertex, width: usize, height: usize) -> TriVertex {
        let rcp_w = 1.0 / v.w;
        v.x = (1.0 + v.x * rcp_w) * 0.5 * width as f32;
        v.y = (1.0 - v.y * rcp_w) * 0.5 * height as f32;
        v.z *= rcp_w;
        v.w = rcp_w;
        for a in &mut v.varying {
            *a *= rcp_w;
        }
        v
    }

    /// Rasterize one screen-space triangle through the variant drawer
    ///
    /// Culls triangles whose screen winding does not match the `ccw` flag
    /// and zero-area triangles.
    #[allow(clippy::too_many_arguments)]
    fn draw_shaded_triangle(
        v1: &TriVertex,
        v2: &TriVertex,
        v3: &TriVertex,
        ccw: bool,
        args: &PolyDrawArgs<'_>,
        worker: &mut WorkerTarget<'_>,
        drawfunc: DrawFunc,
    ) {
        // Signed parallelogram area in screen space (y down):
        // negative = counterclockwise on screen
        let area = (v2.x - v1.x) * (v3.y - v1.y) - (v3.x - v1.x) * (v2.y - v1.y);
        if !area.is_finite() || area == 0.0 {
            return;
        }
        if (area < 0.0) != ccw {
            return;
        }

        let tri_args = TriDrawTriangleArgs {
            v1: *v1,
            v2: *v2,
            v3: *v3,
            clip_left: args.clip_left,
            clip_right: args.clip_right,
            clip_top: args.clip_top,
            clip_bottom: args.clip_bottom,
            texture: args.texture,
            solid_color: args.solid_color,
            uniforms: args.uniforms,
            stencil_test_value: args.stencil_test_value,
            stencil_write_value: args.stencil_write_value,
        };
        drawfunc(&tri_args, worker);
    }
}

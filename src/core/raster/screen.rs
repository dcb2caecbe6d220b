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

//! Screen-space triangle drawing
//!
//! Rasterizes one screen-space triangle by walking scanlines inside the
//! clip rectangle. Pixel membership uses scanline/pixel centers with
//! half-open intervals, so triangles sharing an edge never gap or
//! double-cover. Attributes are interpolated perspective-correct from the
//! per-triangle gradient planes solved by [`grad_x`]/[`grad_y`].
//!
//! Each draw variant has its own monomorphic pixel loop; the variant is
//! selected once per draw call, never per pixel. All variants test the
//! stencil through the tile uniform mask, skipping whole 8-pixel segments
//! when a block provably passes or fails.

use crate::core::stencil::BLOCK_DIM;

use super::args::TextureSource;
use super::vertex::{
    TriUniformFlags, TriUniforms, TriVertex, NUM_VARYING, VARYING_LIGHT, VARYING_U, VARYING_V,
};
use super::worker::{stencil_block, RowColor, RowParts, WorkerTarget};

/// Arguments for drawing one screen-space triangle
///
/// Vertices are in screen space: `x`/`y` in pixels, `w` holding `1/w`, and
/// varyings premultiplied by `1/w`.
pub(crate) struct TriDrawTriangleArgs<'a> {
    pub v1: TriVertex,
    pub v2: TriVertex,
    pub v3: TriVertex,
    pub clip_left: i32,
    pub clip_right: i32,
    pub clip_top: i32,
    pub clip_bottom: i32,
    pub texture: Option<TextureSource<'a>>,
    pub solid_color: u32,
    pub uniforms: TriUniforms,
    pub stencil_test_value: u8,
    pub stencil_write_value: u8,
}

/// Linear plane equation over screen space
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlaneEq {
    base: f32,
    dx: f32,
    dy: f32,
    x0: f32,
    y0: f32,
}

impl PlaneEq {
    #[inline]
    pub fn at(&self, x: f32, y: f32) -> f32 {
        self.base + (x - self.x0) * self.dx + (y - self.y0) * self.dy
    }
}

/// Per-triangle attribute gradients
pub(crate) struct TriGradients {
    pub rcp_w: PlaneEq,
    pub varying: [PlaneEq; NUM_VARYING],
}

impl TriGradients {
    /// Solve the gradient planes for a triangle
    ///
    /// Returns `None` for degenerate (zero-area) triangles, which therefore
    /// produce no pixels.
    pub fn new(v1: &TriVertex, v2: &TriVertex, v3: &TriVertex) -> Option<Self> {
        let bottom = (v2.x - v1.x) * (v3.y - v1.y) - (v3.x - v1.x) * (v2.y - v1.y);
        if !bottom.is_finite() || bottom == 0.0 {
            return None;
        }

        let plane = |c1: f32, c2: f32, c3: f32| PlaneEq {
            base: c1,
            dx: grad_x(v1.x, v1.y, v2.x, v2.y, v3.x, v3.y, c1, c2, c3),
            dy: grad_y(v1.x, v1.y, v2.x, v2.y, v3.x, v3.y, c1, c2, c3),
            x0: v1.x,
            y0: v1.y,
        };

        let mut varying = [plane(0.0, 0.0, 0.0); NUM_VARYING];
        for (i, slot) in varying.iter_mut().enumerate() {
            *slot = plane(v1.varying[i], v2.varying[i], v3.varying[i]);
        }
        Some(Self {
            rcp_w: plane(v1.w, v2.w, v3.w),
            varying,
        })
    }
}

/// Horizontal gradient of an attribute given its three vertex values
///
/// Solves the 3-point linear system for the plane through
/// `(x0, y0, c0)`, `(x1, y1, c1)`, `(x2, y2, c2)`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn grad_x(
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    c0: f32,
    c1: f32,
    c2: f32,
) -> f32 {
    let bottom = (x1 - x0) * (y2 - y0) - (x2 - x0) * (y1 - y0);
    ((c1 - c0) * (y2 - y0) - (c2 - c0) * (y1 - y0)) / bottom
}

/// Vertical gradient of an attribute given its three vertex values
#[allow(clippy::too_many_arguments)]
pub(crate) fn grad_y(
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    c0: f32,
    c1: f32,
    c2: f32,
) -> f32 {
    let bottom = (x1 - x0) * (y2 - y0) - (x2 - x0) * (y1 - y0);
    ((c2 - c0) * (x1 - x0) - (c1 - c0) * (x2 - x0)) / bottom
}

/// Pixel-level drawer selected once per draw call
pub(crate) type DrawFunc = fn(&TriDrawTriangleArgs<'_>, &mut WorkerTarget<'_>);

/// Screen-space pixel drawers, one per draw variant
pub(crate) struct ScreenTriangleDrawer;

impl ScreenTriangleDrawer {
    /// Textured fill, 8-bit palette indices (index 0 is transparent)
    pub(crate) fn draw(args: &TriDrawTriangleArgs<'_>, worker: &mut WorkerTarget<'_>) {
        let Some(texture) = args.texture else { return };
        walk_spans(args, worker, |parts, grads, y, x0, x1| {
            let RowParts {
                color,
                stencil_values,
                stencil_masks,
                row,
                ..
            } = parts;
            let RowColor::Indexed(rowbuf) = color else { return };
            gated_span(
                stencil_values,
                stencil_masks,
                row,
                args.stencil_test_value,
                x0,
                x1,
                |x| {
                    let (u, v, _) = sample_point(grads, x, y);
                    let index = texture.sample_indexed(u, v);
                    if index != 0 {
                        rowbuf[x as usize] = index;
                    }
                },
            );
        });
    }

    /// Solid fill, 8-bit palette index
    pub(crate) fn fill(args: &TriDrawTriangleArgs<'_>, worker: &mut WorkerTarget<'_>) {
        let index = args.solid_color as u8;
        walk_spans(args, worker, |parts, _grads, _y, x0, x1| {
            let RowParts {
                color,
                stencil_values,
                stencil_masks,
                row,
                ..
            } = parts;
            let RowColor::Indexed(rowbuf) = color else { return };
            gated_span(
                stencil_values,
                stencil_masks,
                row,
                args.stencil_test_value,
                x0,
                x1,
                |x| {
                    rowbuf[x as usize] = index;
                },
            );
        });
    }

    /// Stencil-only write, no color output
    pub(crate) fn stencil(args: &TriDrawTriangleArgs<'_>, worker: &mut WorkerTarget<'_>) {
        let test = args.stencil_test_value;
        let write = args.stencil_write_value;
        walk_spans(args, worker, |parts, _grads, _y, x0, x1| {
            let RowParts {
                stencil_values,
                stencil_masks,
                row,
                ..
            } = parts;
            let mut x = x0;
            while x < x1 {
                let bx = x as usize / BLOCK_DIM;
                let seg_end = segment_end(bx, x1);
                let mut block = stencil_block(stencil_values, stencil_masks, bx);
                match block.single_value() {
                    Some(v) if v != test => {}
                    Some(_) => {
                        for px in x..seg_end {
                            block.set(px as usize % BLOCK_DIM, row, write);
                        }
                    }
                    None => {
                        for px in x..seg_end {
                            let cx = px as usize % BLOCK_DIM;
                            if block.get(cx, row) == test {
                                block.set(cx, row, write);
                            }
                        }
                    }
                }
                x = seg_end;
            }
        });
    }

    /// Textured fill, 32-bit true color with light shading
    pub(crate) fn draw32(args: &TriDrawTriangleArgs<'_>, worker: &mut WorkerTarget<'_>) {
        let Some(texture) = args.texture else { return };
        let fixed_light = args.uniforms.flags.contains(TriUniformFlags::FIXED_LIGHT);
        let base_light = args.uniforms.light.min(255) as f32 / 255.0;
        walk_spans(args, worker, |parts, grads, y, x0, x1| {
            let RowParts {
                color,
                stencil_values,
                stencil_masks,
                row,
                ..
            } = parts;
            let RowColor::TrueColor(rowbuf) = color else { return };
            gated_span(
                stencil_values,
                stencil_masks,
                row,
                args.stencil_test_value,
                x0,
                x1,
                |x| {
                    let (u, v, light_varying) = sample_point(grads, x, y);
                    let texel = texture.sample_bgra(u, v);
                    if texel >> 24 >= 128 {
                        let light = if fixed_light {
                            base_light
                        } else {
                            base_light * light_varying.clamp(0.0, 1.0)
                        };
                        rowbuf[x as usize] = shade_bgra(texel, light);
                    }
                },
            );
        });
    }

    /// Solid fill, 32-bit true color
    pub(crate) fn fill32(args: &TriDrawTriangleArgs<'_>, worker: &mut WorkerTarget<'_>) {
        let color_value = args.solid_color;
        walk_spans(args, worker, |parts, _grads, _y, x0, x1| {
            let RowParts {
                color,
                stencil_values,
                stencil_masks,
                row,
                ..
            } = parts;
            let RowColor::TrueColor(rowbuf) = color else { return };
            gated_span(
                stencil_values,
                stencil_masks,
                row,
                args.stencil_test_value,
                x0,
                x1,
                |x| {
                    rowbuf[x as usize] = color_value;
                },
            );
        });
    }

    /// Writes the subsector identifier into the G-buffer instead of color
    pub(crate) fn draw_subsector32(args: &TriDrawTriangleArgs<'_>, worker: &mut WorkerTarget<'_>) {
        let id = args.uniforms.subsector_id;
        walk_spans(args, worker, |parts, _grads, _y, x0, x1| {
            let RowParts {
                stencil_values,
                stencil_masks,
                subsectors,
                row,
                ..
            } = parts;
            gated_span(
                stencil_values,
                stencil_masks,
                row,
                args.stencil_test_value,
                x0,
                x1,
                |x| {
                    subsectors[x as usize] = id;
                },
            );
        });
    }
}

/// Perspective-correct attribute sample at a pixel center
#[inline]
fn sample_point(grads: &TriGradients, x: i32, y: i32) -> (f32, f32, f32) {
    let xc = x as f32 + 0.5;
    let yc = y as f32 + 0.5;
    let w = 1.0 / grads.rcp_w.at(xc, yc);
    (
        grads.varying[VARYING_U].at(xc, yc) * w,
        grads.varying[VARYING_V].at(xc, yc) * w,
        grads.varying[VARYING_LIGHT].at(xc, yc) * w,
    )
}

/// Scale BGRA channels by a light level, alpha preserved
#[inline]
fn shade_bgra(color: u32, light: f32) -> u32 {
    let shade = |c: u32| -> u32 { (((c & 0xFF) as f32 * light) as u32).min(255) };
    (color & 0xFF00_0000) | (shade(color >> 16) << 16) | (shade(color >> 8) << 8) | shade(color)
}

#[inline]
fn segment_end(bx: usize, x1: i32) -> i32 {
    (((bx + 1) * BLOCK_DIM) as i32).min(x1)
}

/// Run a pixel writer over `[x0, x1)`, gated by the stencil test
///
/// Uses the tile uniform mask for the early out: a uniform block either
/// passes or fails as a whole, skipping the per-pixel compare for the
/// common case of tiles no polygon edge crossed.
#[inline]
fn gated_span(
    stencil_values: &mut [u8],
    stencil_masks: &mut [u32],
    row: usize,
    test: u8,
    x0: i32,
    x1: i32,
    mut write: impl FnMut(i32),
) {
    let mut x = x0;
    while x < x1 {
        let bx = x as usize / BLOCK_DIM;
        let seg_end = segment_end(bx, x1);
        let block = stencil_block(stencil_values, stencil_masks, bx);
        match block.single_value() {
            Some(v) if v != test => {}
            Some(_) => {
                for px in x..seg_end {
                    write(px);
                }
            }
            None => {
                for px in x..seg_end {
                    if block.get(px as usize % BLOCK_DIM, row) == test {
                        write(px);
                    }
                }
            }
        }
        x = seg_end;
    }
}

/// Walk the triangle's scanlines within the clip rectangle
///
/// Calls `span` once per owned scanline with the pixel range whose centers
/// lie inside the triangle. Rows whose 8-row band belongs to another
/// worker are skipped; that is the entire thread partition.
fn walk_spans(
    args: &TriDrawTriangleArgs<'_>,
    worker: &mut WorkerTarget<'_>,
    mut span: impl FnMut(RowParts<'_>, &TriGradients, i32, i32, i32),
) {
    let (v1, v2, v3) = (&args.v1, &args.v2, &args.v3);
    let Some(grads) = TriGradients::new(v1, v2, v3) else {
        return;
    };

    let min_y = v1.y.min(v2.y).min(v3.y);
    let max_y = v1.y.max(v2.y).max(v3.y);
    let y_start = pixel_floor(min_y).max(args.clip_top).max(0);
    let y_end = pixel_floor(max_y).min(args.clip_bottom).min(worker.height as i32);

    let clip_left = args.clip_left.max(0);
    let clip_right = args.clip_right.min(worker.width as i32);

    for y in y_start..y_end {
        if !worker.thread.owns_row(y as usize) {
            continue;
        }
        let yc = y as f32 + 0.5;

        // Collect edge crossings at the scanline center
        let mut xs = [0.0f32; 3];
        let mut count = 0;
        let edges = [(v1, v2), (v2, v3), (v3, v1)];
        for (a, b) in edges {
            if (a.y <= yc) != (b.y <= yc) {
                let t = (yc - a.y) / (b.y - a.y);
                xs[count] = a.x + t * (b.x - a.x);
                count += 1;
            }
        }
        if count < 2 {
            continue;
        }
        let mut left = xs[0];
        let mut right = xs[0];
        for &x in &xs[1..count] {
            left = left.min(x);
            right = right.max(x);
        }

        let x0 = pixel_floor(left).max(clip_left);
        let x1 = pixel_floor(right).min(clip_right);
        if x0 >= x1 {
            continue;
        }

        if let Some(band) = worker.band_for_row(y as usize) {
            span(band.row_parts(y as usize), &grads, y, x0, x1);
        }
    }
}

/// First pixel whose center is >= the coordinate
#[inline]
fn pixel_floor(coord: f32) -> i32 {
    (coord - 0.5).ceil() as i32
}

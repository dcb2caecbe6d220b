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

//! Rasterizer test modules


use crate::core::stencil::{StencilBuffer, SubsectorBuffer};

use super::{PolyDrawArgs, PolyTriangleDrawer, RenderTarget, TriDrawVariant, TriVertex};

/// Map a pixel coordinate into clip space for a `width` x `height` target
///
/// With `w = 1` the viewport transform lands the vertex exactly on the
/// given pixel coordinate.
pub(super) fn vert(px: f32, py: f32, width: usize, height: usize) -> TriVertex {
    TriVertex::position(
        2.0 * px / width as f32 - 1.0,
        1.0 - 2.0 * py / height as f32,
        0.5,
        1.0,
    )
}

/// Fill a triangle given in pixel coordinates and return the color buffer
pub(super) fn fill_triangle(
    pixels: &[(f32, f32); 3],
    ccw: bool,
    width: usize,
    height: usize,
    color: u32,
) -> Vec<u32> {
    let vertices = [
        vert(pixels[0].0, pixels[0].1, width, height),
        vert(pixels[1].0, pixels[1].1, width, height),
        vert(pixels[2].0, pixels[2].1, width, height),
    ];
    let mut args = PolyDrawArgs::new(&vertices, 0, width as i32, 0, height as i32);
    args.ccw = ccw;
    args.solid_color = color;

    let mut buffer = vec![0u32; width * height];
    let mut stencil = StencilBuffer::new();
    stencil.clear(width, height, 0);
    let mut subsectors = SubsectorBuffer::new();
    subsectors.resize(width, height);
    let mut target = RenderTarget::true_color(&mut buffer, width, height, &mut stencil, &mut subsectors);
    PolyTriangleDrawer::draw(&mut target, &args, TriDrawVariant::Fill32);
    buffer
}

/// Count non-zero pixels
pub(super) fn coverage(buffer: &[u32]) -> usize {
    buffer.iter().filter(|&&p| p != 0).count()
}

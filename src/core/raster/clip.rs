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

//! View-frustum clipping
//!
//! Clips a triangle against the six frustum half-spaces in clip space using
//! a parametric line-segment clip per triangle edge. New vertices are
//! synthesized on half-space boundaries with linearly interpolated
//! attributes.
//!
//! The output polygon is bounded by construction: each of the three edges
//! contributes at most two vertices, well inside the fixed
//! [`MAX_ADDITIONAL_VERTICES`] margin sized for the six planes.

use super::vertex::TriVertex;

/// Extra vertices the clipper may synthesize beyond the original three
///
/// An engineering limit, not a dynamic check: six frustum planes can never
/// produce more, so exceeding it would be a bug in the clipper itself.
pub const MAX_ADDITIONAL_VERTICES: usize = 16;

/// Capacity of a clip output buffer
pub(crate) const MAX_CLIP_VERTICES: usize = 3 + MAX_ADDITIONAL_VERTICES;

/// Clip an edge's parametric interval against one half-space
///
/// `d1`/`d2` are the signed clip distances of the segment endpoints
/// (negative = outside). The passing sub-interval is intersected into
/// `[t1, t2]`. Returns true if the whole segment lies outside.
pub(crate) fn cull_halfspace(d1: f32, d2: f32, t1: &mut f32, t2: &mut f32) -> bool {
    if d1 < 0.0 && d2 < 0.0 {
        return true;
    }
    if d1 < 0.0 {
        *t1 = (-d1 / (d2 - d1)).max(*t1);
    }
    if d2 < 0.0 {
        *t2 = (1.0 + d2 / (d1 - d2)).min(*t2);
    }
    false
}

/// Clip a triangle against the view frustum
///
/// On return the first `count` entries of `clipped` hold a convex polygon
/// satisfying, for every vertex:
///
/// ```text
/// -v.w <= v.x <= v.w
/// -v.w <= v.y <= v.w
///  0.0 <= v.z <= v.w
/// ```
///
/// A triangle entirely outside any one half-space yields `count == 0`.
pub(crate) fn clip_edge(
    verts: &[TriVertex; 3],
    clipped: &mut [TriVertex; MAX_CLIP_VERTICES],
) -> usize {
    let mut count = 0;
    for i in 0..3 {
        let v1 = &verts[i];
        let v2 = &verts[(i + 1) % 3];

        let mut t1 = 0.0f32;
        let mut t2 = 1.0f32;
        let culled = cull_halfspace(v1.x + v1.w, v2.x + v2.w, &mut t1, &mut t2)
            || cull_halfspace(v1.w - v1.x, v2.w - v2.x, &mut t1, &mut t2)
            || cull_halfspace(v1.y + v1.w, v2.y + v2.w, &mut t1, &mut t2)
            || cull_halfspace(v1.w - v1.y, v2.w - v2.y, &mut t1, &mut t2)
            || cull_halfspace(v1.z, v2.z, &mut t1, &mut t2)
            || cull_halfspace(v1.w - v1.z, v2.w - v2.z, &mut t1, &mut t2);
        if culled || t1 >= t2 {
            continue;
        }

        if t1 == 0.0 {
            clipped[count] = *v1;
        } else {
            clipped[count] = v1.lerp(v2, t1);
        }
        count += 1;
        if t2 != 1.0 {
            clipped[count] = v1.lerp(v2, t2);
            count += 1;
        }
    }
    count
}

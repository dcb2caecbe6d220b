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

//! Draw-info and draw-list management
//!
//! A [`DrawInfo`] owns one frame's (or one portal recursion's) draw lists
//! and the render-state bindings active while it draws. The per-frame
//! protocol is: [`DrawInfo::start_draw_info`], accumulate commands across
//! passes, flush each pass (the translucent pass is sorted back-to-front
//! first), then [`DrawInfo::end_draw_info`].
//!
//! Portals produce child draw-infos recursively; each recursion level
//! claims a stencil value, renders its contents clipped to the claimed
//! footprint, then restores the parent's bindings and releases the claim.

mod clock;
mod list;
mod portal;

#[cfg(test)]
mod tests;

pub use clock::{DrawClock, RenderStats};
pub use list::{DrawItem, DrawList, RenderPass};
pub use portal::{Portal, StencilAllocator};

use crate::core::config::RenderConfig;
use crate::core::device::{CullMode, DepthFunc, Device, DrawType, StencilFlags, StencilOp};
use crate::core::math::Vec4;
use crate::core::raster::TriUniforms;

/// Vertex-buffer slot of the fullscreen quad used by `clear_screen`
pub const FULLSCREEN_INDEX: usize = 0;

/// A camera position bound to a viewpoint-buffer slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    /// Eye position, world space
    pub position: Vec4,
    /// Slot in the device's viewpoint buffer
    pub index: usize,
}

impl Viewpoint {
    pub fn new(position: Vec4, index: usize) -> Self {
        Self { position, index }
    }
}

/// Per-frame shared render state
///
/// Owns the stencil claim allocator and the recursion limit; threaded
/// through portal recursion because every nesting level shares them.
#[derive(Debug)]
pub struct FrameState {
    pub stencil: StencilAllocator,
    pub max_portal_depth: usize,
}

impl FrameState {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            stencil: StencilAllocator::new(),
            max_portal_depth: config.max_portal_depth,
        }
    }

    /// Reset at the start of a frame
    pub fn reset(&mut self) {
        self.stencil.reset();
    }
}

/// Per-frame (or per-portal) draw context
///
/// Exclusively owned by the render pipeline for the duration of one frame
/// or one portal sub-render. Never shared across threads.
pub struct DrawInfo {
    pub viewpoint: Viewpoint,
    pub uniforms: TriUniforms,

    lists: [DrawList; 3],

    /// Portal nesting depth (0 = root frame)
    portal_depth: usize,

    /// Stencil value claimed by the enclosing portal (0 = root)
    stencil_value: u8,

    /// Claim of the portal currently being rendered into, if any
    current_portal: Option<u8>,

    /// Active dynamic-light index (-1 = none)
    light_index: i32,

    stats: RenderStats,
}

impl DrawInfo {
    /// Begin a frame (or portal sub-render) context
    pub fn start_draw_info(viewpoint: Viewpoint, uniforms: TriUniforms) -> Self {
        Self {
            viewpoint,
            uniforms,
            lists: [DrawList::new(), DrawList::new(), DrawList::new()],
            portal_depth: 0,
            stencil_value: 0,
            current_portal: None,
            light_index: -1,
            stats: RenderStats::default(),
        }
    }

    /// Finish the context, yielding its accumulated statistics
    pub fn end_draw_info(self) -> RenderStats {
        log::debug!(
            "end_draw_info: depth={} draw_calls={} draw_time={:?}",
            self.portal_depth,
            self.stats.draw_calls,
            self.stats.draw_time
        );
        self.stats
    }

    pub fn portal_depth(&self) -> usize {
        self.portal_depth
    }

    pub fn stencil_value(&self) -> u8 {
        self.stencil_value
    }

    pub fn current_portal(&self) -> Option<u8> {
        self.current_portal
    }

    pub fn light_index(&self) -> i32 {
        self.light_index
    }

    pub fn set_light_index(&mut self, index: i32) {
        self.light_index = index;
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Queue a draw command into a pass list
    pub fn add_draw(
        &mut self,
        pass: RenderPass,
        draw_type: DrawType,
        index: usize,
        count: usize,
        indexed: bool,
        reference_point: Vec4,
    ) {
        self.lists[pass.index()].push(draw_type, index, count, indexed, reference_point);
    }

    pub fn list(&self, pass: RenderPass) -> &DrawList {
        &self.lists[pass.index()]
    }

    /// Issue a pass's accumulated commands to the device
    ///
    /// The translucent pass is sorted back-to-front relative to the
    /// current viewpoint before issuing; the other passes keep insertion
    /// order.
    pub fn flush_pass(&mut self, pass: RenderPass, device: &mut dyn Device) {
        let mut list = std::mem::take(&mut self.lists[pass.index()]);
        if pass == RenderPass::Translucent {
            list.sort_back_to_front(self.viewpoint.position);
        }
        for item in list.items() {
            if item.indexed {
                self.draw_indexed(device, item.draw_type, item.index, item.count);
            } else {
                self.draw(device, item.draw_type, item.index, item.count);
            }
        }
        list.clear();
        self.lists[pass.index()] = list;
    }

    /// Issue one non-indexed draw, timed
    pub fn draw(&mut self, device: &mut dyn Device, dt: DrawType, index: usize, count: usize) {
        let _clock = self.stats.clock();
        device.draw(dt, index, count);
    }

    /// Issue one indexed draw, timed
    pub fn draw_indexed(
        &mut self,
        device: &mut dyn Device,
        dt: DrawType,
        index: usize,
        count: usize,
    ) {
        let _clock = self.stats.clock();
        device.draw_indexed(dt, index, count);
    }

    /// Recursively render a portal
    ///
    /// Claims a stencil value, renders the portal's contents into a child
    /// draw-info seeded with the portal's viewpoint and uniforms, then
    /// restores the parent's vertex and viewpoint bindings and releases
    /// the claim. Nesting beyond the configured maximum degrades to a
    /// stencil-only surface draw instead of recursing.
    pub fn render_portal(
        &mut self,
        portal: &mut dyn Portal,
        device: &mut dyn Device,
        frame: &mut FrameState,
        use_stencil: bool,
    ) {
        if self.portal_depth >= frame.max_portal_depth {
            log::debug!(
                "portal recursion limit ({}) reached, drawing surface stencil-only",
                frame.max_portal_depth
            );
            let (dt, index, count) = portal.surface();
            self.set_stencil(
                device,
                0,
                StencilOp::Keep,
                StencilFlags::COLOR_MASK_OFF | StencilFlags::DEPTH_MASK_OFF,
            );
            self.draw(device, dt, index, count);
            self.set_stencil(device, 0, StencilOp::Keep, StencilFlags::empty());
            return;
        }

        let claim = frame.stencil.claim();
        portal.setup_stencil(self, device, claim, use_stencil);

        let mut child = DrawInfo::start_draw_info(portal.target_viewpoint(), portal.uniforms());
        child.portal_depth = self.portal_depth + 1;
        child.stencil_value = claim;
        child.current_portal = Some(claim);
        child.light_index = -1;

        portal.draw_contents(&mut child, device, frame);
        let child_stats = child.end_draw_info();
        self.stats.draw_calls += child_stats.draw_calls;
        self.stats.draw_time += child_stats.draw_time;

        device.bind_vertex_buffer();
        device.bind_viewpoint(self.viewpoint.index);
        portal.remove_stencil(self, device, claim, use_stencil);
        frame.stencil.release();
    }

    // Device state helpers. Thin, deterministic, idempotent mappings;
    // none depends on the order of the others.

    pub fn set_depth_clamp(&mut self, device: &mut dyn Device, on: bool) -> bool {
        device.set_depth_clamp(on)
    }

    pub fn set_depth_mask(&mut self, device: &mut dyn Device, on: bool) {
        device.set_depth_mask(on);
    }

    pub fn set_depth_func(&mut self, device: &mut dyn Device, func: DepthFunc) {
        device.set_depth_func(func);
    }

    pub fn set_depth_range(&mut self, device: &mut dyn Device, min: f32, max: f32) {
        device.set_depth_range(min, max);
    }

    pub fn set_culling(&mut self, device: &mut dyn Device, mode: CullMode) {
        device.set_culling(mode);
    }

    pub fn enable_clip_distance(&mut self, device: &mut dyn Device, num: u32, state: bool) {
        device.enable_clip_distance(num, state);
    }

    /// Compose stencil state from this context's base value plus an offset
    ///
    /// The equal-test reference is `stencil_value + offs`; the flags drive
    /// the color mask, depth mask, depth test, and optional depth clear.
    pub fn set_stencil(
        &mut self,
        device: &mut dyn Device,
        offs: u8,
        op: StencilOp,
        flags: StencilFlags,
    ) {
        let value = self.stencil_value.wrapping_add(offs);
        self.set_stencil_value(device, value, op, flags);
    }

    /// Compose stencil state with an absolute reference value
    pub fn set_stencil_value(
        &mut self,
        device: &mut dyn Device,
        value: u8,
        op: StencilOp,
        flags: StencilFlags,
    ) {
        device.set_stencil_func(value);
        device.set_stencil_op(op);

        let color_on = !flags.contains(StencilFlags::COLOR_MASK_OFF);
        device.set_color_mask(color_on, color_on, color_on, color_on);
        device.set_depth_mask(!flags.contains(StencilFlags::DEPTH_MASK_OFF));
        device.set_depth_test(!flags.contains(StencilFlags::DEPTH_TEST_OFF));
        if flags.contains(StencilFlags::DEPTH_CLEAR) {
            device.clear_depth();
        }
    }

    /// Clear the screen with a fullscreen draw
    ///
    /// Multisample and depth test are disabled around the draw and
    /// restored afterwards.
    pub fn clear_screen(&mut self, device: &mut dyn Device, width: usize, height: usize) {
        device.set_viewpoint_2d(width, height);
        device.set_color(0, 0, 0);

        let multisample = device.enable_multisample(false);
        device.set_depth_test(false);

        self.draw(device, DrawType::TriangleStrip, FULLSCREEN_INDEX, 4);

        device.set_depth_test(true);
        if multisample {
            device.enable_multisample(true);
        }
    }
}

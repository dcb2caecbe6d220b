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

//! Portal rendering support
//!
//! A portal is a surface that, when drawn, recursively renders a different
//! viewpoint's geometry clipped to the surface's footprint. The footprint
//! is claimed in the stencil buffer for the duration of the recursion so
//! nested portal output never bleeds.
//!
//! Stencil claims come from a per-frame allocator with a monotonically
//! increasing counter: no two portals in one frame - nested or sibling -
//! can ever receive the same value.

use crate::core::device::{Device, StencilFlags, StencilOp};
use crate::core::raster::TriUniforms;

use super::{DrawInfo, FrameState, Viewpoint};

/// Per-frame stencil claim allocator
///
/// `claim` hands out distinct offsets; `release` returns a claim without
/// reusing its value. The active count is the leak check: it must return
/// to its pre-recursion value once a portal (and everything nested inside
/// it) completes.
#[derive(Debug, Default)]
pub struct StencilAllocator {
    next_offset: u8,
    active: usize,
}

impl StencilAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset at the start of a frame
    pub fn reset(&mut self) {
        self.next_offset = 0;
        self.active = 0;
    }

    /// Allocate a distinct stencil value for one portal
    pub fn claim(&mut self) -> u8 {
        self.next_offset = self.next_offset.wrapping_add(1);
        if self.next_offset == 0 {
            // 255 claims in one frame; bounded recursion makes this a scene
            // authoring problem, not a crash
            log::warn!("stencil claim counter wrapped");
        }
        self.active += 1;
        self.next_offset
    }

    /// Return a claim; the value itself is never reused within the frame
    pub fn release(&mut self) {
        debug_assert!(self.active > 0, "stencil claim released twice");
        self.active = self.active.saturating_sub(1);
    }

    /// Number of claims currently held
    pub fn active(&self) -> usize {
        self.active
    }
}

/// A render-time portal
///
/// Implementations provide the target viewpoint, the uniforms to seed the
/// child draw-info with, the surface geometry, and the contents callback.
/// The callback receives the child draw-info and may itself call
/// [`DrawInfo::render_portal`], so recursion depth equals portal nesting
/// depth.
pub trait Portal {
    /// Viewpoint the portal's contents are rendered from
    fn target_viewpoint(&self) -> Viewpoint;

    /// Uniform bundle for the child draw-info
    fn uniforms(&self) -> TriUniforms;

    /// Surface geometry as (topology, first vertex, count)
    fn surface(&self) -> (crate::core::device::DrawType, usize, usize);

    /// Draw the portal's contents from the target viewpoint
    fn draw_contents(
        &mut self,
        di: &mut DrawInfo,
        device: &mut dyn Device,
        frame: &mut FrameState,
    );

    /// Claim the surface footprint in the stencil
    ///
    /// Default sequence: color and depth writes off, footprint bumped into
    /// the claim value, then the equal-test rebased onto the claim with a
    /// depth clear so the contents start clean.
    fn setup_stencil(
        &mut self,
        di: &mut DrawInfo,
        device: &mut dyn Device,
        claim: u8,
        use_stencil: bool,
    ) {
        if !use_stencil {
            return;
        }
        let (dt, index, count) = self.surface();
        di.set_stencil(
            device,
            0,
            StencilOp::Increment,
            StencilFlags::COLOR_MASK_OFF | StencilFlags::DEPTH_MASK_OFF,
        );
        di.draw(device, dt, index, count);
        di.set_stencil_value(device, claim, StencilOp::Keep, StencilFlags::DEPTH_CLEAR);
    }

    /// Release the surface footprint from the stencil
    ///
    /// Default sequence mirrors [`setup_stencil`](Self::setup_stencil):
    /// the footprint is decremented back and normal write state restored.
    fn remove_stencil(
        &mut self,
        di: &mut DrawInfo,
        device: &mut dyn Device,
        claim: u8,
        use_stencil: bool,
    ) {
        if !use_stencil {
            return;
        }
        let (dt, index, count) = self.surface();
        di.set_stencil_value(
            device,
            claim,
            StencilOp::Decrement,
            StencilFlags::COLOR_MASK_OFF | StencilFlags::DEPTH_MASK_OFF,
        );
        di.draw(device, dt, index, count);
        di.set_stencil(device, 0, StencilOp::Keep, StencilFlags::empty());
    }
}

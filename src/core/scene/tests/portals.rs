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

//! Portal recursion tests
//! Stencil claims, recursion limits, and binding restoration

use crate::core::config::RenderConfig;
use crate::core::device::{Device, DeviceCommand, DrawType, RecordingDevice};
use crate::core::math::Vec4;
use crate::core::raster::TriUniforms;
use crate::core::scene::{DrawInfo, FrameState, Portal, Viewpoint};

/// Chain of nested portals that records what each recursion level saw
struct ChainPortal {
    depth_left: usize,
    /// (claim value, active claim count) observed at each level, root-first
    observed: Vec<(u8, usize)>,
}

impl ChainPortal {
    fn new(depth: usize) -> Self {
        Self {
            depth_left: depth,
            observed: Vec::new(),
        }
    }
}

impl Portal for ChainPortal {
    fn target_viewpoint(&self) -> Viewpoint {
        Viewpoint::new(Vec4::new(0.0, 0.0, 10.0, 1.0), 1)
    }

    fn uniforms(&self) -> TriUniforms {
        TriUniforms::default()
    }

    fn surface(&self) -> (DrawType, usize, usize) {
        (DrawType::TriangleFan, 0, 4)
    }

    fn draw_contents(
        &mut self,
        di: &mut DrawInfo,
        device: &mut dyn Device,
        frame: &mut FrameState,
    ) {
        self.observed
            .push((di.stencil_value(), frame.stencil.active()));
        if self.depth_left > 1 {
            self.depth_left -= 1;
            di.render_portal(self, device, frame, true);
            self.depth_left += 1;
        }
    }
}

fn root_draw_info() -> DrawInfo {
    DrawInfo::start_draw_info(
        Viewpoint::new(Vec4::new(0.0, 0.0, 0.0, 1.0), 0),
        TriUniforms::default(),
    )
}

#[test]
fn test_nested_portals_get_distinct_claims() {
    let config = RenderConfig {
        max_portal_depth: 8,
        ..RenderConfig::default()
    };
    let mut frame = FrameState::new(&config);
    let mut device = RecordingDevice::new();
    let mut portal = ChainPortal::new(5);
    let mut di = root_draw_info();

    di.render_portal(&mut portal, &mut device, &mut frame, true);

    assert_eq!(portal.observed.len(), 5);
    let claims: Vec<u8> = portal.observed.iter().map(|&(c, _)| c).collect();
    let mut unique = claims.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), claims.len(), "claims must be distinct: {claims:?}");
}

#[test]
fn test_claim_count_restored_after_recursion() {
    let config = RenderConfig::default();
    let mut frame = FrameState::new(&config);
    let mut device = RecordingDevice::new();
    let mut portal = ChainPortal::new(3);
    let mut di = root_draw_info();

    assert_eq!(frame.stencil.active(), 0);
    di.render_portal(&mut portal, &mut device, &mut frame, true);
    assert_eq!(frame.stencil.active(), 0, "stencil claims leaked");

    // Inside the recursion the active count grew with depth
    let actives: Vec<usize> = portal.observed.iter().map(|&(_, a)| a).collect();
    assert_eq!(actives, vec![1, 2, 3]);
}

#[test]
fn test_recursion_limit_degrades_gracefully() {
    let config = RenderConfig {
        max_portal_depth: 2,
        ..RenderConfig::default()
    };
    let mut frame = FrameState::new(&config);
    let mut device = RecordingDevice::new();
    let mut portal = ChainPortal::new(10);
    let mut di = root_draw_info();

    di.render_portal(&mut portal, &mut device, &mut frame, true);

    // Only two levels rendered contents; deeper nesting was cut off
    assert_eq!(portal.observed.len(), 2);
    // The cut-off never took a claim, so nothing can leak
    assert_eq!(frame.stencil.active(), 0);
}

#[test]
fn test_portal_restores_parent_bindings() {
    let config = RenderConfig::default();
    let mut frame = FrameState::new(&config);
    let mut device = RecordingDevice::new();
    let mut portal = ChainPortal::new(1);
    let mut di = root_draw_info();

    di.render_portal(&mut portal, &mut device, &mut frame, true);

    let commands = device.commands();
    let rebind = commands
        .iter()
        .position(|c| *c == DeviceCommand::BindVertexBuffer)
        .expect("vertex buffer rebound");
    assert_eq!(
        commands[rebind + 1],
        DeviceCommand::BindViewpoint(0),
        "parent viewpoint rebound after portal"
    );
}

#[test]
fn test_child_draw_info_state() {
    /// Portal that asserts the child context it receives
    struct InspectPortal {
        child_depth: Option<usize>,
        child_light: Option<i32>,
        child_portal: Option<Option<u8>>,
    }

    impl Portal for InspectPortal {
        fn target_viewpoint(&self) -> Viewpoint {
            Viewpoint::new(Vec4::new(5.0, 0.0, 0.0, 1.0), 3)
        }

        fn uniforms(&self) -> TriUniforms {
            TriUniforms::default()
        }

        fn surface(&self) -> (DrawType, usize, usize) {
            (DrawType::TriangleFan, 8, 4)
        }

        fn draw_contents(
            &mut self,
            di: &mut DrawInfo,
            _device: &mut dyn Device,
            _frame: &mut FrameState,
        ) {
            self.child_depth = Some(di.portal_depth());
            self.child_light = Some(di.light_index());
            self.child_portal = Some(di.current_portal());
        }
    }

    let config = RenderConfig::default();
    let mut frame = FrameState::new(&config);
    let mut device = RecordingDevice::new();
    let mut portal = InspectPortal {
        child_depth: None,
        child_light: None,
        child_portal: None,
    };
    let mut di = root_draw_info();
    di.set_light_index(7);

    di.render_portal(&mut portal, &mut device, &mut frame, true);

    assert_eq!(portal.child_depth, Some(1));
    // The child starts from a clean lighting state
    assert_eq!(portal.child_light, Some(-1));
    // The child's active portal is the claimed one
    assert_eq!(portal.child_portal, Some(Some(1)));
    // The parent keeps its own light index
    assert_eq!(di.light_index(), 7);
}

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

use softpoly::core::device::{DrawType, RecordingDevice};
use softpoly::core::math::Vec4;
use softpoly::core::raster::{
    PolyCommandQueue, PolyDrawArgs, RenderTarget, TriDrawVariant, TriUniforms, TriVertex,
    TriangleDrawMode,
};
use softpoly::core::scene::{DrawInfo, FrameState, Portal, RenderPass, Viewpoint};
use softpoly::core::stencil::{StencilBuffer, SubsectorBuffer};
use softpoly::core::{Device, RenderConfig};

const W: usize = 64;
const H: usize = 64;

#[test]
fn test_frame_pipeline_end_to_end() {
    // One frame: claim a stencil window, fill color through it, run a
    // sorted scene pass with a nested portal - the whole protocol
    let config = RenderConfig::default();
    let mut frame = FrameState::new(&config);
    frame.reset();

    let mut color = vec![0u32; W * H];
    let mut stencil = StencilBuffer::new();
    stencil.clear(W, H, 0);
    let mut subsectors = SubsectorBuffer::new();
    subsectors.resize(W, H);

    // Stencil window over the left half, drawn as a fan
    let window = [
        TriVertex::position(-1.0, -1.0, 0.5, 1.0),
        TriVertex::position(0.0, -1.0, 0.5, 1.0),
        TriVertex::position(0.0, 1.0, 0.5, 1.0),
        TriVertex::position(-1.0, 1.0, 0.5, 1.0),
    ];
    let mut window_args = PolyDrawArgs::new(&window, 0, W as i32, 0, H as i32);
    window_args.mode = TriangleDrawMode::Fan;
    window_args.stencil_write_value = 1;

    // Fullscreen fill gated on the window claim
    let fullscreen = [
        TriVertex::position(-1.0, -1.0, 0.5, 1.0),
        TriVertex::position(3.0, -1.0, 0.5, 1.0),
        TriVertex::position(-1.0, 3.0, 0.5, 1.0),
    ];
    let mut fill_args = PolyDrawArgs::new(&fullscreen, 0, W as i32, 0, H as i32);
    fill_args.stencil_test_value = 1;
    fill_args.solid_color = 0xFFFF_8800;

    let mut queue = PolyCommandQueue::new();
    queue.push(window_args, TriDrawVariant::Stencil);
    queue.push(fill_args, TriDrawVariant::Fill32);

    let mut target = RenderTarget::true_color(&mut color, W, H, &mut stencil, &mut subsectors);
    queue.run_single(&mut target);

    // Color landed only inside the claimed window (the left half)
    for y in 0..H {
        for x in 0..W {
            let painted = color[y * W + x] != 0;
            assert_eq!(painted, x < W / 2, "pixel ({x}, {y})");
        }
    }

    // Scene pass with a portal
    struct OnePortal;
    impl Portal for OnePortal {
        fn target_viewpoint(&self) -> Viewpoint {
            Viewpoint::new(Vec4::new(1.0, 0.0, 0.0, 1.0), 1)
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
            _frame: &mut FrameState,
        ) {
            di.add_draw(
                RenderPass::Opaque,
                DrawType::Triangles,
                0,
                3,
                false,
                Vec4::new(0.0, 0.0, 1.0, 1.0),
            );
            di.flush_pass(RenderPass::Opaque, device);
        }
    }

    let mut device = RecordingDevice::new();
    let mut di = DrawInfo::start_draw_info(
        Viewpoint::new(Vec4::new(0.0, 0.0, 0.0, 1.0), 0),
        TriUniforms::default(),
    );
    let mut portal = OnePortal;
    di.render_portal(&mut portal, &mut device, &mut frame, true);
    let stats = di.end_draw_info();

    assert_eq!(frame.stencil.active(), 0);
    assert!(stats.draw_calls > 0);
    assert!(device.draw_count() > 0);
}

#[test]
fn test_config_defaults_are_usable() {
    let config = RenderConfig::default();
    assert!(config.worker_threads() >= 1);
    assert!(config.max_portal_depth > 0);
}

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

//! Device state helper tests
//! Stencil flag composition, screen clearing, and pass flushing

use crate::core::device::{DeviceCommand, DrawType, RecordingDevice, StencilFlags, StencilOp};
use crate::core::math::Vec4;
use crate::core::raster::TriUniforms;
use crate::core::scene::{DrawInfo, RenderPass, Viewpoint};

fn draw_info_at(eye: Vec4) -> DrawInfo {
    DrawInfo::start_draw_info(Viewpoint::new(eye, 0), TriUniforms::default())
}

fn origin_draw_info() -> DrawInfo {
    draw_info_at(Vec4::new(0.0, 0.0, 0.0, 1.0))
}

#[test]
fn test_color_mask_off_flag() {
    let mut device = RecordingDevice::new();
    let mut di = origin_draw_info();

    di.set_stencil(&mut device, 0, StencilOp::Keep, StencilFlags::COLOR_MASK_OFF);
    assert_eq!(device.color_mask(), [false; 4]);

    di.set_stencil(&mut device, 0, StencilOp::Keep, StencilFlags::empty());
    assert_eq!(device.color_mask(), [true; 4]);
}

#[test]
fn test_stencil_flags_drive_depth_state() {
    let mut device = RecordingDevice::new();
    let mut di = origin_draw_info();

    di.set_stencil(
        &mut device,
        0,
        StencilOp::Increment,
        StencilFlags::DEPTH_MASK_OFF | StencilFlags::DEPTH_TEST_OFF,
    );
    assert!(!device.depth_mask());
    assert!(!device.depth_test());

    di.set_stencil(&mut device, 0, StencilOp::Keep, StencilFlags::empty());
    assert!(device.depth_mask());
    assert!(device.depth_test());
}

#[test]
fn test_stencil_reference_composes_base_and_offset() {
    let mut device = RecordingDevice::new();
    let mut di = origin_draw_info();

    di.set_stencil(&mut device, 3, StencilOp::Keep, StencilFlags::empty());
    assert_eq!(device.stencil_ref(), 3);

    di.set_stencil_value(&mut device, 9, StencilOp::Keep, StencilFlags::empty());
    assert_eq!(device.stencil_ref(), 9);
}

#[test]
fn test_depth_clear_flag_clears_once() {
    let mut device = RecordingDevice::new();
    let mut di = origin_draw_info();

    di.set_stencil(&mut device, 0, StencilOp::Keep, StencilFlags::DEPTH_CLEAR);
    let clears = device
        .commands()
        .iter()
        .filter(|c| **c == DeviceCommand::ClearDepth)
        .count();
    assert_eq!(clears, 1);
}

#[test]
fn test_clear_screen_restores_state() {
    let mut device = RecordingDevice::new();
    let mut di = origin_draw_info();

    di.clear_screen(&mut device, 320, 200);

    let commands = device.commands();
    assert!(commands.contains(&DeviceCommand::Viewpoint2D(320, 200)));
    // Multisample was on by default, turned off for the draw, restored
    assert_eq!(
        commands
            .iter()
            .filter(|c| matches!(c, DeviceCommand::Multisample(_)))
            .count(),
        2
    );
    assert!(commands.contains(&DeviceCommand::Multisample(false)));
    assert_eq!(commands.last(), Some(&DeviceCommand::Multisample(true)));
    // The fullscreen draw happened between depth-test off and on
    let draw_pos = commands
        .iter()
        .position(|c| matches!(c, DeviceCommand::Draw(DrawType::TriangleStrip, _, 4)))
        .expect("fullscreen draw");
    assert!(commands[..draw_pos].contains(&DeviceCommand::DepthTest(false)));
    assert!(commands[draw_pos..].contains(&DeviceCommand::DepthTest(true)));
}

#[test]
fn test_flush_translucent_sorts_back_to_front() {
    let mut device = RecordingDevice::new();
    let mut di = origin_draw_info();

    // Near first, far last; flushing must reverse them
    di.add_draw(
        RenderPass::Translucent,
        DrawType::Triangles,
        0,
        3,
        false,
        Vec4::new(0.0, 0.0, 1.0, 1.0),
    );
    di.add_draw(
        RenderPass::Translucent,
        DrawType::Triangles,
        3,
        3,
        false,
        Vec4::new(0.0, 0.0, 20.0, 1.0),
    );
    di.add_draw(
        RenderPass::Translucent,
        DrawType::Triangles,
        6,
        3,
        false,
        Vec4::new(0.0, 0.0, 5.0, 1.0),
    );

    di.flush_pass(RenderPass::Translucent, &mut device);

    let draws: Vec<usize> = device
        .commands()
        .iter()
        .filter_map(|c| match c {
            DeviceCommand::Draw(_, index, _) => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(draws, vec![3, 6, 0]);
}

#[test]
fn test_flush_opaque_keeps_insertion_order() {
    let mut device = RecordingDevice::new();
    let mut di = origin_draw_info();

    for i in 0..4 {
        di.add_draw(
            RenderPass::Opaque,
            DrawType::Triangles,
            i * 3,
            3,
            false,
            Vec4::new(0.0, 0.0, (10 - i) as f32, 1.0),
        );
    }
    di.flush_pass(RenderPass::Opaque, &mut device);

    let draws: Vec<usize> = device
        .commands()
        .iter()
        .filter_map(|c| match c {
            DeviceCommand::Draw(_, index, _) => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(draws, vec![0, 3, 6, 9]);
}

#[test]
fn test_flush_mixes_indexed_and_non_indexed() {
    let mut device = RecordingDevice::new();
    let mut di = origin_draw_info();

    di.add_draw(
        RenderPass::Opaque,
        DrawType::Triangles,
        0,
        6,
        true,
        Vec4::new(0.0, 0.0, 1.0, 1.0),
    );
    di.add_draw(
        RenderPass::Opaque,
        DrawType::TriangleFan,
        6,
        4,
        false,
        Vec4::new(0.0, 0.0, 2.0, 1.0),
    );
    di.flush_pass(RenderPass::Opaque, &mut device);

    assert_eq!(
        device.commands()[0],
        DeviceCommand::DrawIndexed(DrawType::Triangles, 0, 6)
    );
    assert_eq!(
        device.commands()[1],
        DeviceCommand::Draw(DrawType::TriangleFan, 6, 4)
    );
    assert_eq!(di.stats().draw_calls, 2);
}

#[test]
fn test_culling_setter_is_idempotent() {
    use crate::core::device::CullMode;

    let mut device = RecordingDevice::new();
    let mut di = origin_draw_info();

    di.set_culling(&mut device, CullMode::CCW);
    di.set_culling(&mut device, CullMode::CCW);
    assert_eq!(device.cull_mode(), Some(CullMode::CCW));

    // Interleaving other state setters must not disturb it
    di.set_depth_func(&mut device, crate::core::device::DepthFunc::LessEqual);
    di.set_depth_range(&mut device, 0.0, 1.0);
    assert_eq!(device.cull_mode(), Some(CullMode::CCW));

    di.set_culling(&mut device, CullMode::None);
    assert_eq!(device.cull_mode(), Some(CullMode::None));
}

#[test]
fn test_stats_survive_end_draw_info() {
    let mut device = RecordingDevice::new();
    let mut di = origin_draw_info();

    di.draw(&mut device, DrawType::Triangles, 0, 3);
    di.draw_indexed(&mut device, DrawType::Triangles, 0, 6);

    let stats = di.end_draw_info();
    assert_eq!(stats.draw_calls, 2);
}

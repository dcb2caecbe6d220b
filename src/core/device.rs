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

//! Device command adapter
//!
//! The abstract boundary the draw-list manager issues commands against.
//! A concrete implementation maps these to a fixed-function graphics API
//! (or to the software rasterizer); the semantics specified here - stencil
//! equal-test against a reference value, depth range, cull winding - are
//! part of the engine contract, the translation tables are not.
//!
//! Every state setter must be idempotent and independent of the order of
//! other state setters. Index buffers are 32-bit; an indexed draw at
//! `index` addresses byte offset `index * 4`.

use bitflags::bitflags;

/// Abstract draw primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawType {
    Points,
    Lines,
    Triangles,
    TriangleFan,
    TriangleStrip,
}

/// Depth comparison function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthFunc {
    Less,
    LessEqual,
    Always,
}

/// Stencil operation applied when a fragment passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilOp {
    Keep,
    Increment,
    Decrement,
}

/// Face culling mode and front-face winding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    None,
    /// Cull with clockwise front faces
    CW,
    /// Cull with counterclockwise front faces
    CCW,
}

bitflags! {
    /// Flags for the composed stencil state
    ///
    /// Used by the draw-info `set_stencil` helper; absence of a flag means
    /// the corresponding channel stays enabled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StencilFlags: u32 {
        /// Disable all color channel writes
        const COLOR_MASK_OFF = 1 << 0;
        /// Disable depth writes
        const DEPTH_MASK_OFF = 1 << 1;
        /// Disable the depth test
        const DEPTH_TEST_OFF = 1 << 2;
        /// Clear the depth buffer as part of the state change
        const DEPTH_CLEAR = 1 << 3;
    }
}

/// Graphics device boundary
///
/// Thin, deterministic operations; implementations must not reorder or
/// batch them in ways observable through the stencil or depth state.
pub trait Device {
    /// Draw `count` vertices starting at `index`
    fn draw(&mut self, dt: DrawType, index: usize, count: usize);

    /// Draw `count` 32-bit indices starting at index-buffer offset `index`
    fn draw_indexed(&mut self, dt: DrawType, index: usize, count: usize);

    /// Returns the previous depth-clamp state
    fn set_depth_clamp(&mut self, on: bool) -> bool;

    fn set_depth_mask(&mut self, on: bool);

    fn set_depth_func(&mut self, func: DepthFunc);

    fn set_depth_range(&mut self, min: f32, max: f32);

    fn set_color_mask(&mut self, r: bool, g: bool, b: bool, a: bool);

    /// Stencil equal-test against `value`, with a full comparison mask
    fn set_stencil_func(&mut self, value: u8);

    /// Stencil operation on depth-pass
    fn set_stencil_op(&mut self, op: StencilOp);

    fn set_depth_test(&mut self, on: bool);

    fn clear_depth(&mut self);

    fn set_culling(&mut self, mode: CullMode);

    fn enable_clip_distance(&mut self, num: u32, state: bool);

    /// Returns the previous multisample state
    fn enable_multisample(&mut self, on: bool) -> bool;

    fn set_color(&mut self, r: u8, g: u8, b: u8);

    /// Rebind the shared vertex buffer (after portal contents changed it)
    fn bind_vertex_buffer(&mut self);

    /// Rebind a viewpoint's uniform slot
    fn bind_viewpoint(&mut self, index: usize);

    /// Switch the viewpoint binding to a 2D screen-space projection
    fn set_viewpoint_2d(&mut self, width: usize, height: usize);
}

/// Everything a [`RecordingDevice`] remembers about one call
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    Draw(DrawType, usize, usize),
    DrawIndexed(DrawType, usize, usize),
    DepthClamp(bool),
    DepthMask(bool),
    DepthFunc(DepthFunc),
    DepthRange(f32, f32),
    ColorMask(bool, bool, bool, bool),
    StencilFunc(u8),
    StencilOp(StencilOp),
    DepthTest(bool),
    ClearDepth,
    Culling(CullMode),
    ClipDistance(u32, bool),
    Multisample(bool),
    Color(u8, u8, u8),
    BindVertexBuffer,
    BindViewpoint(usize),
    Viewpoint2D(usize, usize),
}

/// Device double that records the command stream
///
/// Used by the headless demo and the scene tests to assert exact ordering
/// and state without a graphics API.
///
/// # Examples
///
/// ```
/// use softpoly::core::device::{Device, DeviceCommand, DrawType, RecordingDevice};
///
/// let mut device = RecordingDevice::new();
/// device.draw(DrawType::Triangles, 0, 3);
/// assert_eq!(device.commands()[0], DeviceCommand::Draw(DrawType::Triangles, 0, 3));
/// ```
#[derive(Debug)]
pub struct RecordingDevice {
    commands: Vec<DeviceCommand>,
    depth_clamp: bool,
    multisample: bool,
    color_mask: [bool; 4],
    depth_mask: bool,
    depth_test: bool,
    stencil_ref: u8,
    cull_mode: Option<CullMode>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            depth_clamp: false,
            multisample: true,
            color_mask: [true; 4],
            depth_mask: true,
            depth_test: true,
            stencil_ref: 0,
            cull_mode: None,
        }
    }

    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Current color mask state (r, g, b, a)
    pub fn color_mask(&self) -> [bool; 4] {
        self.color_mask
    }

    pub fn depth_mask(&self) -> bool {
        self.depth_mask
    }

    pub fn depth_test(&self) -> bool {
        self.depth_test
    }

    /// Stencil reference value of the last equal-test
    pub fn stencil_ref(&self) -> u8 {
        self.stencil_ref
    }

    pub fn cull_mode(&self) -> Option<CullMode> {
        self.cull_mode
    }

    /// Count of draw and indexed-draw commands recorded
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DeviceCommand::Draw(..) | DeviceCommand::DrawIndexed(..)))
            .count()
    }
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for RecordingDevice {
    fn draw(&mut self, dt: DrawType, index: usize, count: usize) {
        self.commands.push(DeviceCommand::Draw(dt, index, count));
    }

    fn draw_indexed(&mut self, dt: DrawType, index: usize, count: usize) {
        self.commands.push(DeviceCommand::DrawIndexed(dt, index, count));
    }

    fn set_depth_clamp(&mut self, on: bool) -> bool {
        let previous = self.depth_clamp;
        self.depth_clamp = on;
        self.commands.push(DeviceCommand::DepthClamp(on));
        previous
    }

    fn set_depth_mask(&mut self, on: bool) {
        self.depth_mask = on;
        self.commands.push(DeviceCommand::DepthMask(on));
    }

    fn set_depth_func(&mut self, func: DepthFunc) {
        self.commands.push(DeviceCommand::DepthFunc(func));
    }

    fn set_depth_range(&mut self, min: f32, max: f32) {
        self.commands.push(DeviceCommand::DepthRange(min, max));
    }

    fn set_color_mask(&mut self, r: bool, g: bool, b: bool, a: bool) {
        self.color_mask = [r, g, b, a];
        self.commands.push(DeviceCommand::ColorMask(r, g, b, a));
    }

    fn set_stencil_func(&mut self, value: u8) {
        self.stencil_ref = value;
        self.commands.push(DeviceCommand::StencilFunc(value));
    }

    fn set_stencil_op(&mut self, op: StencilOp) {
        self.commands.push(DeviceCommand::StencilOp(op));
    }

    fn set_depth_test(&mut self, on: bool) {
        self.depth_test = on;
        self.commands.push(DeviceCommand::DepthTest(on));
    }

    fn clear_depth(&mut self) {
        self.commands.push(DeviceCommand::ClearDepth);
    }

    fn set_culling(&mut self, mode: CullMode) {
        self.cull_mode = Some(mode);
        self.commands.push(DeviceCommand::Culling(mode));
    }

    fn enable_clip_distance(&mut self, num: u32, state: bool) {
        self.commands.push(DeviceCommand::ClipDistance(num, state));
    }

    fn enable_multisample(&mut self, on: bool) -> bool {
        let previous = self.multisample;
        self.multisample = on;
        self.commands.push(DeviceCommand::Multisample(on));
        previous
    }

    fn set_color(&mut self, r: u8, g: u8, b: u8) {
        self.commands.push(DeviceCommand::Color(r, g, b));
    }

    fn bind_vertex_buffer(&mut self) {
        self.commands.push(DeviceCommand::BindVertexBuffer);
    }

    fn bind_viewpoint(&mut self, index: usize) {
        self.commands.push(DeviceCommand::BindViewpoint(index));
    }

    fn set_viewpoint_2d(&mut self, width: usize, height: usize) {
        self.commands.push(DeviceCommand::Viewpoint2D(width, height));
    }
}

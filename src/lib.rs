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

//! Software triangle rasterization and scene-sorting engine
//!
//! This library provides the core components of a software/hybrid renderer:
//! a polygon rasterizer that clips, shades, and fills triangles against a
//! tiled stencil buffer with hierarchical early-out masks, and a scene
//! draw-list manager that batches, sorts, and dispatches draw calls,
//! including recursive portal rendering with stencil-based clipping.
//!
//! # Example
//!
//! ```
//! use softpoly::core::raster::{PolyDrawArgs, PolyTriangleDrawer, RenderTarget, TriDrawVariant, TriVertex};
//! use softpoly::core::stencil::{StencilBuffer, SubsectorBuffer};
//!
//! let mut color = vec![0u32; 64 * 64];
//! let mut stencil = StencilBuffer::new();
//! stencil.clear(64, 64, 0);
//! let mut subsectors = SubsectorBuffer::new();
//! subsectors.resize(64, 64);
//!
//! let vertices = [
//!     TriVertex::position(-0.5, -0.5, 0.0, 1.0),
//!     TriVertex::position(0.5, -0.5, 0.0, 1.0),
//!     TriVertex::position(0.0, 0.5, 0.0, 1.0),
//! ];
//! let mut args = PolyDrawArgs::new(&vertices, 0, 64, 0, 64);
//! args.solid_color = 0xFF40_80FF;
//!
//! let mut target = RenderTarget::true_color(&mut color, 64, 64, &mut stencil, &mut subsectors);
//! PolyTriangleDrawer::draw(&mut target, &args, TriDrawVariant::Fill32);
//! ```

pub mod core;

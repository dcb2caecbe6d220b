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

//! Core rendering components
//!
//! This module contains all engine components:
//! - Tile stencil buffer and subsector G-buffer
//! - Triangle rasterizer (clipping, shading, scanline fill)
//! - Draw-info / draw-list manager with portal rendering
//! - Device command adapter (abstract graphics-API boundary)
//! - Configuration and error handling

pub mod config;
pub mod device;
pub mod error;
pub mod math;
pub mod raster;
pub mod scene;
pub mod stencil;

// Re-export commonly used types
pub use config::RenderConfig;
pub use device::Device;
pub use error::{RenderError, Result};
pub use raster::PolyTriangleDrawer;
pub use scene::DrawInfo;
pub use stencil::{StencilBuffer, SubsectorBuffer};

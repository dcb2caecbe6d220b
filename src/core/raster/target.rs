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

//! Render target
//!
//! Bundles the color plane (8-bit palette or 32-bit true color), the tile
//! stencil buffer, and the subsector G-buffer for one frame. All three are
//! owned by the render pipeline and passed by reference; the rasterizer
//! splits them into disjoint 8-row bands for the worker threads.

use crate::core::stencil::{StencilBuffer, SubsectorBuffer, BLOCK_DIM, BLOCK_PIXELS};

use super::worker::{BandColor, BandView, WorkerTarget, WorkerThreadData};

/// Color plane in one of the two supported formats
pub enum ColorBuffer<'a> {
    /// 8-bit palette indices
    Indexed(&'a mut [u8]),
    /// 32-bit BGRA
    TrueColor(&'a mut [u32]),
}

/// Active render target for one frame
///
/// The stencil buffer must have been cleared and the subsector buffer
/// resized to the same viewport dimensions before drawing.
pub struct RenderTarget<'a> {
    color: ColorBuffer<'a>,
    width: usize,
    height: usize,
    stencil: &'a mut StencilBuffer,
    subsectors: &'a mut SubsectorBuffer,
}

impl<'a> RenderTarget<'a> {
    /// Create a target over an 8-bit palette color buffer
    pub fn indexed(
        color: &'a mut [u8],
        width: usize,
        height: usize,
        stencil: &'a mut StencilBuffer,
        subsectors: &'a mut SubsectorBuffer,
    ) -> Self {
        debug_assert_eq!(color.len(), width * height);
        Self::build(ColorBuffer::Indexed(color), width, height, stencil, subsectors)
    }

    /// Create a target over a 32-bit true-color buffer
    pub fn true_color(
        color: &'a mut [u32],
        width: usize,
        height: usize,
        stencil: &'a mut StencilBuffer,
        subsectors: &'a mut SubsectorBuffer,
    ) -> Self {
        debug_assert_eq!(color.len(), width * height);
        Self::build(ColorBuffer::TrueColor(color), width, height, stencil, subsectors)
    }

    fn build(
        color: ColorBuffer<'a>,
        width: usize,
        height: usize,
        stencil: &'a mut StencilBuffer,
        subsectors: &'a mut SubsectorBuffer,
    ) -> Self {
        debug_assert!(width > 0 && height > 0, "zero-area viewport");
        debug_assert_eq!(stencil.width(), width);
        debug_assert_eq!(stencil.height(), height);
        debug_assert_eq!(subsectors.width(), width);
        debug_assert_eq!(subsectors.height(), height);
        Self {
            color,
            width,
            height,
            stencil,
            subsectors,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Split the target into per-worker band sets
    ///
    /// Band `b` covers rows `[b * 8, b * 8 + 8)` and goes to worker
    /// `b % num_workers`, so a stencil block's rows are never split between
    /// workers. Each returned worker owns disjoint slices; nothing is
    /// locked at draw time.
    pub(crate) fn split_bands(&mut self, num_workers: usize) -> Vec<WorkerTarget<'_>> {
        let num_workers = num_workers.max(1);
        let width = self.width;
        let height = self.height;
        let block_width = self.stencil.block_width();
        let band_len = BLOCK_DIM * width;

        let mut workers: Vec<WorkerTarget<'_>> = (0..num_workers)
            .map(|core| {
                WorkerTarget::new(
                    WorkerThreadData {
                        core,
                        num_cores: num_workers,
                    },
                    width,
                    height,
                )
            })
            .collect();

        let (stencil_values, stencil_masks) = self.stencil.planes_mut();
        let color_bands: Vec<BandColor<'_>> = match &mut self.color {
            ColorBuffer::Indexed(buf) => {
                buf.chunks_mut(band_len).map(BandColor::Indexed).collect()
            }
            ColorBuffer::TrueColor(buf) => {
                buf.chunks_mut(band_len).map(BandColor::TrueColor).collect()
            }
        };

        let bands = color_bands
            .into_iter()
            .zip(stencil_values.chunks_mut(block_width * BLOCK_PIXELS))
            .zip(stencil_masks.chunks_mut(block_width))
            .zip(self.subsectors.values_mut().chunks_mut(band_len));

        for (band, (((color, stencil_values), stencil_masks), subsectors)) in bands.enumerate() {
            workers[band % num_workers].push_band(BandView {
                first_row: band * BLOCK_DIM,
                width,
                color,
                stencil_values,
                stencil_masks,
                subsectors,
            });
        }

        workers
    }
}

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

//! Worker-thread row-band partitioning
//!
//! The rasterizer parallelizes the pixel-fill step of each triangle across
//! a fixed-size thread pool. Every worker executes the same queued draw
//! commands but only fills the horizontal 8-row bands it owns; bands are
//! statically assigned by `band % num_cores`, never stolen. Each band is a
//! contiguous, exclusively-owned slice of every target plane, so no locks
//! are needed and a stencil block's rows always belong to one worker.

use rayon::ThreadPool;

use crate::core::stencil::{StencilBlock, BLOCK_DIM, BLOCK_PIXELS};

use super::args::{PolyDrawArgs, TriDrawVariant};
use super::target::RenderTarget;
use super::PolyTriangleDrawer;

/// Identifies which row bands a worker owns
#[derive(Debug, Clone, Copy)]
pub struct WorkerThreadData {
    /// Worker index in the pool
    pub core: usize,
    /// Pool size
    pub num_cores: usize,
}

impl WorkerThreadData {
    /// Partition that owns every band (for the immediate draw path)
    pub fn single_threaded() -> Self {
        Self {
            core: 0,
            num_cores: 1,
        }
    }

    /// True if this worker rasterizes row `y`
    #[inline]
    pub fn owns_row(&self, y: usize) -> bool {
        (y / BLOCK_DIM) % self.num_cores == self.core
    }
}

/// One band's slice of the color plane
pub(crate) enum BandColor<'a> {
    Indexed(&'a mut [u8]),
    TrueColor(&'a mut [u32]),
}

/// One worker-owned 8-row band of the render target
pub(crate) struct BandView<'a> {
    /// First viewport row covered by this band
    pub first_row: usize,
    pub width: usize,
    pub color: BandColor<'a>,
    /// Stencil cells for this block row (`block_width * 64`)
    pub stencil_values: &'a mut [u8],
    /// Stencil masks for this block row
    pub stencil_masks: &'a mut [u32],
    pub subsectors: &'a mut [u32],
}

/// Disjoint per-plane slices for one scanline of a band
pub(crate) struct RowParts<'a> {
    pub color: RowColor<'a>,
    pub stencil_values: &'a mut [u8],
    pub stencil_masks: &'a mut [u32],
    pub subsectors: &'a mut [u32],
    /// Row within the stencil block (0-7)
    pub row: usize,
}

pub(crate) enum RowColor<'a> {
    Indexed(&'a mut [u8]),
    TrueColor(&'a mut [u32]),
}

impl<'a> BandView<'a> {
    /// Borrow the planes of one scanline
    ///
    /// `y` must lie inside this band.
    pub fn row_parts(&mut self, y: usize) -> RowParts<'_> {
        debug_assert!(y >= self.first_row && y < self.first_row + BLOCK_DIM);
        let row = y - self.first_row;
        let start = row * self.width;
        let end = start + self.width;
        RowParts {
            color: match &mut self.color {
                BandColor::Indexed(buf) => RowColor::Indexed(&mut buf[start..end]),
                BandColor::TrueColor(buf) => RowColor::TrueColor(&mut buf[start..end]),
            },
            stencil_values: &mut *self.stencil_values,
            stencil_masks: &mut *self.stencil_masks,
            subsectors: &mut self.subsectors[start..end],
            row,
        }
    }
}

/// Borrow a stencil block view out of a block row
#[inline]
pub(crate) fn stencil_block<'b>(
    values: &'b mut [u8],
    masks: &'b mut [u32],
    bx: usize,
) -> StencilBlock<'b> {
    let start = bx * BLOCK_PIXELS;
    StencilBlock::new(&mut values[start..start + BLOCK_PIXELS], &mut masks[bx])
}

/// All bands owned by one worker
pub(crate) struct WorkerTarget<'a> {
    pub thread: WorkerThreadData,
    pub width: usize,
    pub height: usize,
    bands: Vec<BandView<'a>>,
}

impl<'a> WorkerTarget<'a> {
    pub fn new(thread: WorkerThreadData, width: usize, height: usize) -> Self {
        Self {
            thread,
            width,
            height,
            bands: Vec::new(),
        }
    }

    pub fn push_band(&mut self, band: BandView<'a>) {
        self.bands.push(band);
    }

    /// The band containing row `y`, if this worker owns it
    pub fn band_for_row(&mut self, y: usize) -> Option<&mut BandView<'a>> {
        let band = y / BLOCK_DIM;
        if band % self.thread.num_cores != self.thread.core {
            return None;
        }
        self.bands.get_mut((band - self.thread.core) / self.thread.num_cores)
    }
}

/// A queued rasterization command
///
/// Captures the argument bundle by value; the referenced vertex and texture
/// data must outlive the queue. Every worker executes every command,
/// filling only its own bands.
pub struct DrawPolyTrianglesCommand<'a> {
    args: PolyDrawArgs<'a>,
    variant: TriDrawVariant,
}

impl<'a> DrawPolyTrianglesCommand<'a> {
    pub fn new(args: PolyDrawArgs<'a>, variant: TriDrawVariant) -> Self {
        Self { args, variant }
    }

    pub(crate) fn execute(&self, worker: &mut WorkerTarget<'_>) {
        PolyTriangleDrawer::draw_arrays(&self.args, self.variant, worker);
    }

    pub fn debug_info(&self) -> String {
        format!(
            "DrawPolyTriangles: variant={:?}, vcount={}, mode={:?}",
            self.variant,
            self.args.vertices.len(),
            self.args.mode
        )
    }
}

/// Per-frame queue of rasterization commands
///
/// # Examples
///
/// ```
/// use softpoly::core::raster::{PolyCommandQueue, PolyDrawArgs, RenderTarget, TriDrawVariant, TriVertex};
/// use softpoly::core::stencil::{StencilBuffer, SubsectorBuffer};
///
/// let vertices = [
///     TriVertex::position(-1.0, -1.0, 0.5, 1.0),
///     TriVertex::position(1.0, -1.0, 0.5, 1.0),
///     TriVertex::position(0.0, 1.0, 0.5, 1.0),
/// ];
/// let mut args = PolyDrawArgs::new(&vertices, 0, 32, 0, 32);
/// args.solid_color = 0xFFFF_FFFF;
///
/// let mut queue = PolyCommandQueue::new();
/// queue.push(args, TriDrawVariant::Fill32);
///
/// let mut color = vec![0u32; 32 * 32];
/// let mut stencil = StencilBuffer::new();
/// stencil.clear(32, 32, 0);
/// let mut subsectors = SubsectorBuffer::new();
/// subsectors.resize(32, 32);
/// let mut target = RenderTarget::true_color(&mut color, 32, 32, &mut stencil, &mut subsectors);
/// queue.run_single(&mut target);
/// ```
#[derive(Default)]
pub struct PolyCommandQueue<'a> {
    commands: Vec<DrawPolyTrianglesCommand<'a>>,
}

impl<'a> PolyCommandQueue<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, args: PolyDrawArgs<'a>, variant: TriDrawVariant) {
        let command = DrawPolyTrianglesCommand::new(args, variant);
        log::trace!("queued {}", command.debug_info());
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Execute all commands on the calling thread
    pub fn run_single(&self, target: &mut RenderTarget<'_>) {
        let mut workers = target.split_bands(1);
        if let Some(worker) = workers.first_mut() {
            for command in &self.commands {
                command.execute(worker);
            }
        }
    }

    /// Execute all commands across a fixed worker pool
    ///
    /// One task per worker; each task runs the full command list against
    /// its statically assigned bands, so draw order within a band is
    /// preserved and no band is ever shared.
    pub fn run(&self, target: &mut RenderTarget<'_>, pool: &ThreadPool, num_workers: usize) {
        let workers = target.split_bands(num_workers);
        let commands = &self.commands;
        pool.scope(|scope| {
            for mut worker in workers {
                scope.spawn(move |_| {
                    for command in commands {
                        command.execute(&mut worker);
                    }
                });
            }
        });
    }
}

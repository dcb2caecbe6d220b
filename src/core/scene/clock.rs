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

//! Draw-call timing
//!
//! Pure measurement around device draw calls. The clock is a drop guard,
//! so the interval always closes - including when the guarded call panics
//! or returns early - and it never affects draw ordering.

use std::time::{Duration, Instant};

/// Accumulated per-frame draw-call statistics
#[derive(Debug, Default, Clone)]
pub struct RenderStats {
    /// Number of device draw calls issued
    pub draw_calls: u32,
    /// Wall time spent inside device draw calls
    pub draw_time: Duration,
}

impl RenderStats {
    /// Start timing one draw call
    ///
    /// The returned guard closes the interval when dropped.
    pub fn clock(&mut self) -> DrawClock<'_> {
        self.draw_calls += 1;
        DrawClock {
            stats: self,
            start: Instant::now(),
        }
    }

    pub fn reset(&mut self) {
        self.draw_calls = 0;
        self.draw_time = Duration::ZERO;
    }
}

/// Guard for one timed draw call
pub struct DrawClock<'a> {
    stats: &'a mut RenderStats,
    start: Instant,
}

impl Drop for DrawClock<'_> {
    fn drop(&mut self) {
        self.stats.draw_time += self.start.elapsed();
    }
}

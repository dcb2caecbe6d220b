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

use clap::Parser;
use log::info;

use softpoly::core::device::{DrawType, RecordingDevice};
use softpoly::core::error::Result;
use softpoly::core::math::Vec4;
use softpoly::core::raster::{
    PolyCommandQueue, PolyDrawArgs, RenderTarget, TriDrawVariant, TriUniforms, TriVertex,
};
use softpoly::core::scene::{DrawInfo, FrameState, Portal, RenderPass, Viewpoint};
use softpoly::core::stencil::{StencilBuffer, SubsectorBuffer};
use softpoly::core::RenderConfig;

/// Software rasterization and scene-sorting demo
#[derive(Parser)]
#[command(name = "softpoly")]
#[command(about = "Software triangle rasterization demo", long_about = None)]
struct Args {
    /// Path to a TOML render configuration file
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Viewport width in pixels
    #[arg(long, default_value = "320")]
    width: usize,

    /// Viewport height in pixels
    #[arg(long, default_value = "200")]
    height: usize,

    /// Worker thread override (0 = config value)
    #[arg(short = 't', long, default_value = "0")]
    threads: usize,

    /// Number of frames to render
    #[arg(short = 'n', long, default_value = "100")]
    frames: usize,
}

/// Mirror-style portal looking back at the same scene
struct MirrorPortal {
    remaining: usize,
}

impl Portal for MirrorPortal {
    fn target_viewpoint(&self) -> Viewpoint {
        Viewpoint::new(Vec4::new(0.0, 0.0, -8.0, 1.0), 1)
    }

    fn uniforms(&self) -> TriUniforms {
        TriUniforms::default()
    }

    fn surface(&self) -> (DrawType, usize, usize) {
        (DrawType::TriangleFan, 4, 4)
    }

    fn draw_contents(
        &mut self,
        di: &mut DrawInfo,
        device: &mut dyn softpoly::core::Device,
        frame: &mut FrameState,
    ) {
        di.add_draw(
            RenderPass::Opaque,
            DrawType::Triangles,
            0,
            6,
            false,
            Vec4::new(0.0, 0.0, 4.0, 1.0),
        );
        di.flush_pass(RenderPass::Opaque, device);
        if self.remaining > 0 {
            self.remaining -= 1;
            di.render_portal(self, device, frame, true);
            self.remaining += 1;
        }
    }
}

fn main() -> Result<()> {
    // Load environment overrides before the logger so RUST_LOG applies
    if let Err(e) = dotenvy::dotenv() {
        // A missing .env file is the normal case
        log::debug!("no .env loaded: {e}");
    }
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("softpoly v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    // Environment beats the file, the command line beats both
    if let Ok(value) = std::env::var("SOFTPOLY_THREADS") {
        if let Ok(threads) = value.parse() {
            config.threads = threads;
        }
    }
    if args.threads > 0 {
        config.threads = args.threads;
    }
    let workers = config.worker_threads();
    info!(
        "viewport {}x{}, {} workers, portal depth {}",
        args.width, args.height, workers, config.max_portal_depth
    );

    let width = args.width;
    let height = args.height;

    // Frame resources, sized once
    let mut color = vec![0u32; width * height];
    let mut stencil = StencilBuffer::new();
    let mut subsectors = SubsectorBuffer::new();
    subsectors.resize(width, height);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| softpoly::core::RenderError::Device(e.to_string()))?;

    // A spinning triangle plus a stencil-claimed window
    let start = std::time::Instant::now();
    let mut frame_state = FrameState::new(&config);
    for frame in 0..args.frames {
        frame_state.reset();
        stencil.clear(width, height, 0);

        let phase = frame as f32 * 0.05;
        let (sin, cos) = phase.sin_cos();
        let vertices = [
            TriVertex::new(-0.6 * cos, -0.6 * sin, 0.5, 1.0, 0.0, 0.0, 1.0),
            TriVertex::new(0.6 * sin, -0.4 * cos, 0.5, 1.0, 1.0, 0.0, 1.0),
            TriVertex::new(0.0, 0.7, 0.5, 1.0, 0.5, 1.0, 0.8),
        ];
        let window = [
            TriVertex::position(-0.9, -0.9, 0.5, 1.0),
            TriVertex::position(-0.2, -0.9, 0.5, 1.0),
            TriVertex::position(-0.2, -0.2, 0.5, 1.0),
            TriVertex::position(-0.9, -0.2, 0.5, 1.0),
        ];

        let mut queue = PolyCommandQueue::new();

        let mut stencil_args = PolyDrawArgs::new(&window, 0, width as i32, 0, height as i32);
        stencil_args.mode = softpoly::core::raster::TriangleDrawMode::Fan;
        stencil_args.stencil_write_value = 1;
        queue.push(stencil_args, TriDrawVariant::Stencil);

        // The rotation flips the winding every half turn; submit both so
        // one always survives the cull
        let mut tri_args = PolyDrawArgs::new(&vertices, 0, width as i32, 0, height as i32);
        tri_args.solid_color = 0xFF40_C0FF;
        queue.push(tri_args, TriDrawVariant::Fill32);
        let mut tri_args_cw = tri_args;
        tri_args_cw.ccw = false;
        queue.push(tri_args_cw, TriDrawVariant::Fill32);

        let mut target =
            RenderTarget::true_color(&mut color, width, height, &mut stencil, &mut subsectors);
        queue.run(&mut target, &pool, workers);

        // Scene pass: sorted draw lists plus a nested portal, issued
        // against the recording device
        let mut device = RecordingDevice::new();
        let mut di = DrawInfo::start_draw_info(
            Viewpoint::new(Vec4::new(0.0, 0.0, 0.0, 1.0), 0),
            TriUniforms::default(),
        );
        di.add_draw(
            RenderPass::Opaque,
            DrawType::Triangles,
            12,
            6,
            false,
            Vec4::new(0.0, 0.0, 2.0, 1.0),
        );
        for i in 0..4 {
            di.add_draw(
                RenderPass::Translucent,
                DrawType::Triangles,
                i * 3,
                3,
                false,
                Vec4::new(0.0, 0.0, (i + 1) as f32, 1.0),
            );
        }
        for pass in RenderPass::ALL {
            di.flush_pass(pass, &mut device);
        }

        let mut portal = MirrorPortal {
            remaining: config.max_portal_depth,
        };
        di.render_portal(&mut portal, &mut device, &mut frame_state, true);
        let stats = di.end_draw_info();

        if frame == 0 {
            info!(
                "frame 0: {} device commands, {} draw calls",
                device.commands().len(),
                stats.draw_calls
            );
        }
    }
    let elapsed = start.elapsed();

    let covered = color.iter().filter(|&&p| p != 0).count();
    info!(
        "{} frames in {:?} ({:.1} fps)",
        args.frames,
        elapsed,
        args.frames as f64 / elapsed.as_secs_f64().max(1e-9)
    );
    info!(
        "last frame coverage: {} of {} pixels",
        covered,
        width * height
    );

    Ok(())
}

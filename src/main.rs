//! Headless driver: select a specimen, replay dashboard commands, and print
//! the resulting viewport state as JSON.

use std::path::PathBuf;
use std::time::Duration;

use anatomica::asset::{AssetLoadState, ScenePrimitive};
use anatomica::catalog::Catalog;
use anatomica::host::{HostCommand, HostController};
use anatomica::options::Options;
use anatomica::util::FrameTiming;
use anatomica::viewport::{Fallback, Viewport, ViewportFrame};
use clap::Parser;
use serde::Serialize;

/// Frames simulated after each command so damping can settle.
const SETTLE_FRAMES: u32 = 90;
/// Step used for deterministic replay.
const FIXED_STEP: f32 = 1.0 / 60.0;
/// Frame rate of `--realtime` runs.
const REALTIME_FPS: u32 = 60;

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive the anatomy specimen viewport")]
struct Args {
    /// Specimen catalog (TOML); the built-in catalog when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Viewport options (TOML); defaults when omitted
    #[arg(long)]
    options: Option<PathBuf>,

    /// Directory relative asset references resolve against
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Specimen to show first; the first catalog entry when omitted
    #[arg(long)]
    specimen: Option<String>,

    /// Start in pan mode
    #[arg(long)]
    pan_mode: bool,

    /// Seconds to wait for a specimen to load
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Pace frames at 60 fps on the wall clock and step the camera by the
    /// measured frame time instead of a fixed 1/60 s
    #[arg(long)]
    realtime: bool,

    /// Commands to replay: zoom-in, zoom-out, rotate, reset, toggle-pan,
    /// select:<id>
    commands: Vec<HostCommand>,
}

#[derive(Serialize)]
struct Summary {
    specimen: Option<String>,
    title: Option<String>,
    pan_mode: bool,
    load_state: String,
    presentation: String,
    message: Option<String>,
    distance: Option<f32>,
    azimuthal_angle: Option<f32>,
    polar_angle: Option<f32>,
    triangles: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args = Args::parse();

    let mut options = match &args.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    if let Some(assets) = &args.assets {
        options.loader.assets_root.clone_from(assets);
    }
    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };
    log::info!("catalog: {}", catalog.ids().collect::<Vec<_>>().join(", "));

    let timeout = Duration::from_secs(args.timeout);
    let mut driver = Driver {
        timeout,
        timing: args.realtime.then(|| FrameTiming::new(REALTIME_FPS)),
    };
    let mut host = HostController::new(catalog, Viewport::new(options)?);
    host.set_pan_mode(args.pan_mode);
    match &args.specimen {
        Some(id) => host.select(id)?,
        None => host.select_first(),
    }
    driver.settle(&mut host);

    for command in args.commands {
        log::info!("> {command}");
        let selects = matches!(command, HostCommand::Select(_));
        host.execute(command)?;
        if selects {
            driver.settle(&mut host);
        } else {
            driver.run_frames(&mut host, SETTLE_FRAMES);
        }
    }

    print_summary(&summarize(&host))?;
    Ok(())
}

/// Frame loop: fixed steps for replay, wall-clock pacing with `--realtime`.
struct Driver {
    timeout: Duration,
    timing: Option<FrameTiming>,
}

impl Driver {
    /// Wait for the current load, then let the camera come to rest.
    fn settle(&mut self, host: &mut HostController) {
        let state = host.viewport_mut().wait_for_load(self.timeout);
        if state == AssetLoadState::Loading {
            log::warn!("specimen still loading after {:?}", self.timeout);
        }
        self.run_frames(host, SETTLE_FRAMES);
    }

    fn run_frames(&mut self, host: &mut HostController, frames: u32) {
        match &mut self.timing {
            Some(timing) => {
                // the first step would include the time spent loading
                let _ = timing.end_frame();
                for _ in 0..frames {
                    let dt = timing.pace();
                    host.viewport_mut().tick(dt);
                }
                log::debug!("{frames} frames at {:.0} fps", timing.fps());
            }
            None => {
                for _ in 0..frames {
                    host.viewport_mut().tick(FIXED_STEP);
                }
            }
        }
    }
}

fn summarize(host: &HostController) -> Summary {
    let specimen = host.specimen();
    let state = host.camera().state();
    let frame = host.viewport().frame();
    let (presentation, message, triangles) = match &frame {
        ViewportFrame::Empty => ("empty", None, None),
        ViewportFrame::Fallback(Fallback::Loading) => ("loading", None, None),
        ViewportFrame::Fallback(Fallback::Failed { message }) => {
            ("failed", Some(message.clone()), None)
        }
        ViewportFrame::Scene(scene) => {
            let triangles = scene
                .scene
                .primitives
                .iter()
                .map(ScenePrimitive::triangle_count)
                .sum::<usize>();
            ("scene", None, Some(triangles))
        }
        ViewportFrame::FlatImage { locator, .. } => {
            ("flat-image", Some(locator.clone()), None)
        }
    };

    Summary {
        specimen: specimen.map(|s| s.id.clone()),
        title: specimen.map(|s| s.title.clone()),
        pan_mode: host.pan_mode(),
        load_state: format!("{:?}", host.viewport().load_state()),
        presentation: presentation.to_owned(),
        message,
        distance: state.map(|s| s.distance),
        azimuthal_angle: state.map(|s| s.azimuthal_angle),
        polar_angle: state.map(|s| s.polar_angle),
        triangles,
    }
}

#[allow(clippy::print_stdout)]
fn print_summary(summary: &Summary) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

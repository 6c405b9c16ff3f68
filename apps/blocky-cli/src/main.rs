use blocky_input::{SurfaceSize, to_clip_space};
use blocky_kernel::{AppState, Config, Joint, NodeIndex};
use blocky_render::{
    DebugTextRenderer, FrameHost, FrameReport, FrameScheduler, FrameSignal, RunOutcome,
};
use blocky_tools::SceneInspector;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blocky-cli", about = "Headless tools for the blocky animal renderer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the frame loop against the text renderer
    Frames {
        /// Number of frames to render
        #[arg(short, long, default_value = "5")]
        count: u64,
        /// Delay between frames in milliseconds
        #[arg(short, long, default_value = "16")]
        interval_ms: u64,
        /// Start with the yellow joint animated
        #[arg(long)]
        animate_yellow: bool,
        /// Start with the magenta joint animated
        #[arg(long)]
        animate_magenta: bool,
        /// Global rotation in degrees
        #[arg(long, default_value = "0")]
        global_angle: f32,
        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Map a pixel position to clip space
    Pointer {
        x: f64,
        y: f64,
        #[arg(default_value = "400")]
        width: u32,
        #[arg(default_value = "400")]
        height: u32,
    },
}

/// Frame host without a window: prints telemetry and stops after a fixed
/// number of frames.
struct HeadlessHost {
    renderer: DebugTextRenderer,
    remaining: u64,
    interval: Duration,
}

impl FrameHost for HeadlessHost {
    type Target = DebugTextRenderer;

    fn target(&mut self) -> &mut DebugTextRenderer {
        &mut self.renderer
    }

    fn publish_telemetry(&mut self, report: &FrameReport) {
        println!(
            "frame {:>3}  t={:.3}s  cubes={}  {}",
            report.frame_index, report.seconds, report.cubes_drawn, report.telemetry
        );
    }

    fn wait_for_next_frame(&mut self) -> FrameSignal {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            return FrameSignal::Terminate;
        }
        std::thread::sleep(self.interval);
        FrameSignal::Continue
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("blocky-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", blocky_kernel::crate_info());
            println!("render: {}", blocky_render::crate_info());
            println!("input: {}", blocky_input::crate_info());
            println!("tools: {}", blocky_tools::crate_info());
        }
        Commands::Frames {
            count,
            interval_ms,
            animate_yellow,
            animate_magenta,
            global_angle,
            config,
        } => {
            let config = Config::load_or_default(config.as_deref())?;
            config.validate()?;

            let mut state = AppState::new();
            state.global_angle = global_angle;
            state.set_animated(Joint::Yellow, animate_yellow);
            state.set_animated(Joint::Magenta, animate_magenta);

            if count == 0 {
                println!("Nothing to render");
                return Ok(());
            }

            let mut host = HeadlessHost {
                renderer: DebugTextRenderer::new(),
                remaining: count,
                interval: Duration::from_millis(interval_ms),
            };
            let mut scheduler = FrameScheduler::new(&config);
            let outcome = scheduler.run(&mut state, &mut host);
            let frames = match outcome {
                RunOutcome::Cancelled { frames } | RunOutcome::Terminated { frames } => frames,
            };
            println!("Rendered {frames} frame(s)");

            println!();
            print!("{}", host.renderer.render_text());
            println!("{}", SceneInspector::summary(scheduler.arena(), &state));
            for i in 0..scheduler.arena().len() {
                if let Some(node) = SceneInspector::inspect_node(scheduler.arena(), NodeIndex(i)) {
                    println!("  {node}");
                }
            }
        }
        Commands::Pointer {
            x,
            y,
            width,
            height,
        } => {
            let clip = to_clip_space(x, y, SurfaceSize::new(width, height))?;
            println!("({x}, {y}) on {width}x{height} -> ({:.4}, {:.4})", clip.x, clip.y);
        }
    }

    Ok(())
}

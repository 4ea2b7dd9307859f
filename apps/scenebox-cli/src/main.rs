use anyhow::Context;
use clap::{Parser, Subcommand};
use scenebox_input::parse_script;
use scenebox_render::RendererKind;
use scenebox_sandbox::{ActionOutcome, FrameOutcome, Sandbox, SandboxConfig};
use scenebox_tools::SceneInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scenebox-cli", about = "Drive the scenebox renderer sandbox")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Sandbox config file (.yaml, .yml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// List the available renderer modes
    Modes,
    /// Print the effective configuration as YAML
    Config,
    /// Render frames with one renderer mode
    Run {
        /// Renderer mode (overrides the config file)
        #[arg(short, long)]
        mode: Option<RendererKind>,
        /// Number of frames to render
        #[arg(short, long, default_value = "3")]
        frames: u64,
    },
    /// Print diagnostics for one mode, or all of them
    Diagnose {
        #[arg(short, long)]
        mode: Option<RendererKind>,
    },
    /// Apply a comma-separated list of actions, e.g. "frame,switch:deferred,frame,diag"
    Script { actions: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();
    tracing::debug!("scenebox-cli starting");

    let config = match &cli.config {
        Some(path) => SandboxConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SandboxConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("scenebox-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", scenebox_render::crate_info());
            println!("sandbox: {}", scenebox_sandbox::crate_info());
            println!("tools: {}", scenebox_tools::crate_info());
            println!("input: {}", scenebox_input::crate_info());
        }
        Commands::Modes => {
            for kind in RendererKind::ALL {
                let marker = if kind == config.initial_mode { "*" } else { " " };
                println!("{marker} {kind}");
            }
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
        Commands::Run { mode, frames } => {
            let config = SandboxConfig {
                initial_mode: mode.unwrap_or(config.initial_mode),
                ..config
            };
            let mut sandbox = Sandbox::new(config)?;
            println!("{}", SceneInspector::summary(sandbox.scene()));
            for _ in 0..frames {
                let outcome = sandbox
                    .render_frame()
                    .context("frame aborted by a renderer contract violation")?;
                print_frame(&outcome);
            }
            sandbox.shutdown()?;
        }
        Commands::Diagnose { mode } => {
            let mut sandbox = Sandbox::new(config)?;
            match mode {
                Some(kind) => {
                    sandbox.switch_mode(kind)?;
                    println!("{}", sandbox.diagnostics()?);
                }
                None => {
                    for diag in sandbox.diagnostics_all()? {
                        println!("{diag}");
                    }
                }
            }
        }
        Commands::Script { actions } => {
            let actions = parse_script(&actions)?;
            let mut sandbox = Sandbox::new(config)?;
            for action in actions {
                match sandbox.apply(action)? {
                    ActionOutcome::Frame(outcome) => print_frame(&outcome),
                    ActionOutcome::Switched { from, to } => println!("switched {from} -> {to}"),
                    ActionOutcome::Initialized(kind) => println!("initialized {kind}"),
                    ActionOutcome::Diagnostics(diag) => println!("{diag}"),
                    ActionOutcome::Resized { width, height } => {
                        println!("resized to {width}x{height}")
                    }
                    ActionOutcome::ShutDown => println!("shut down"),
                    ActionOutcome::Nothing => {}
                }
            }
        }
    }

    Ok(())
}

fn print_frame(outcome: &FrameOutcome) {
    match outcome {
        FrameOutcome::Rendered(report) if report.kind == RendererKind::Debug => {
            print!("{}", report.detail);
        }
        FrameOutcome::Rendered(report) => {
            println!(
                "frame {} [{}] draws={} tris={} lights={} {}",
                report.frame_index,
                report.kind,
                report.draw_calls,
                report.triangles,
                report.lights,
                report.detail
            );
        }
        FrameOutcome::Skipped { kind, failure } => {
            println!("frame skipped [{kind}]: {failure}");
        }
        FrameOutcome::FellBack { from, to, failure } => {
            println!("frame dropped [{from}]: {failure}; now using {to}");
        }
    }
}

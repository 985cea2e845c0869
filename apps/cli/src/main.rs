use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pulsefield_common::SceneConfig;
use pulsefield_render::{CpuRenderer, RenderView, Renderer};
use pulsefield_scene::{AnimationDriver, Scene};

#[derive(Parser)]
#[command(name = "pulsefield-cli", about = "Headless pulsefield operations")]
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
    /// Resolve N frames on the CPU and print per-frame digests
    Simulate {
        /// Number of frames to resolve
        #[arg(short, long, default_value = "10")]
        frames: u64,
        /// Simulated frame interval in seconds
        #[arg(long, default_value = "0.016666")]
        dt: f64,
        /// Star field seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Override the configured star count
        #[arg(long)]
        stars: Option<u32>,
        /// Scene configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,
        /// Also load and deform the heart mesh from the config path
        #[arg(long)]
        heart: bool,
    },
    /// Write the default scene configuration as JSON
    GenConfig {
        /// Output path
        #[arg(default_value = "pulsefield.json")]
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("pulsefield-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("assets: {}", pulsefield_assets::crate_info());
            println!("render: {}", pulsefield_render::crate_info());
            let cfg = SceneConfig::default();
            println!(
                "defaults: {} stars on shell [{}, {}), breathing {} @ {} rad/s",
                cfg.star_count,
                cfg.shell_inner_radius,
                cfg.shell_outer_radius,
                cfg.breath_amplitude,
                cfg.breath_frequency
            );
        }
        Commands::Simulate {
            frames,
            dt,
            seed,
            stars,
            config,
            heart,
        } => {
            let mut cfg = match &config {
                Some(path) => SceneConfig::load(path)?,
                None => SceneConfig::default(),
            };
            if let Some(stars) = stars {
                cfg.star_count = stars;
            }
            println!(
                "Simulating {frames} frames at dt={dt}: seed={seed}, stars={}",
                cfg.star_count
            );

            let mut scene = Scene::new(cfg.clone(), seed);
            if heart {
                let mesh = pulsefield_assets::load_obj(std::path::Path::new(&cfg.heart_obj_path))?;
                scene.install_heart(mesh.into_positions());
            }

            let mut driver = AnimationDriver::new(scene);
            let renderer = CpuRenderer::new();
            let view = RenderView::default();

            for frame in 0..frames {
                let t = frame as f64 * dt;
                driver.advance_to(t);
                let resolved = renderer.render(driver.scene(), &view);
                let sample = resolved.stars.first();
                println!(
                    "frame {frame:4}  t={t:7.4}  digest={:#018x}  star0={}",
                    resolved.digest(),
                    sample
                        .map(|s| format!(
                            "({:.4}, {:.4}, {:.4})",
                            s.position.x, s.position.y, s.position.z
                        ))
                        .unwrap_or_else(|| "-".into()),
                );
            }

            // Deterministic replay check: the same seed and timeline must
            // resolve to the same final digest.
            let mut replay_scene = Scene::new(cfg.clone(), seed);
            if heart {
                let mesh = pulsefield_assets::load_obj(std::path::Path::new(&cfg.heart_obj_path))?;
                replay_scene.install_heart(mesh.into_positions());
            }
            let mut replay = AnimationDriver::new(replay_scene);
            for frame in 0..frames {
                replay.advance_to(frame as f64 * dt);
            }
            let a = renderer.render(driver.scene(), &view).digest();
            let b = renderer.render(replay.scene(), &view).digest();
            println!("Replay match: {}", if a == b { "OK" } else { "MISMATCH" });
        }
        Commands::GenConfig { path } => {
            let cfg = SceneConfig::default();
            cfg.save(&path)?;
            println!("wrote default config to {}", path.display());
        }
    }

    Ok(())
}

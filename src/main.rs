//! `thimble`: add end caps or magnet pouches to a mesh.
//!
//! # Commands
//!
//! - `thimble caps <INPUT>` - fuse bored end caps onto the part, clean up, export
//! - `thimble pouches <INPUT>` - seat four magnet pouches into the part

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use thimble::config::PipelineConfig;
use thimble::fixtures::MagnetSpec;
use thimble::float_types::Real;
use thimble::pipeline::{CapPipeline, PouchPipeline, prefixed_output};
use thimble::scene::Scene;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "thimble")]
#[command(about = "Parametric end caps and magnet pouches for printable meshes", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fuse bored end caps onto the part and export it for printing
    Caps {
        /// Part to cap (.obj or .stl)
        #[arg(name = "INPUT")]
        input: PathBuf,

        /// OBJ output
        #[arg(long, short, default_value = "thimble.obj")]
        output: PathBuf,

        /// Also write a binary STL (`--stl` for thimble.stl, `--stl=PATH` elsewhere)
        #[arg(
            long,
            value_name = "PATH",
            require_equals = true,
            num_args = 0..=1,
            default_missing_value = "thimble.stl"
        )]
        stl: Option<PathBuf>,

        /// Cap thickness along Y
        #[arg(long)]
        thickness: Option<Real>,

        /// Bore radius as a fraction of the part's half-width
        #[arg(long)]
        inner_ratio: Option<Real>,

        /// Cylinder tessellation
        #[arg(long)]
        segments: Option<usize>,

        /// JSON settings file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Seat four magnet pouches into the part
    Pouches {
        /// Part to modify (.obj or .stl)
        #[arg(name = "INPUT")]
        input: PathBuf,

        /// OBJ output [default: boolean-<stem>.obj]
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Magnet diameter in mm
        #[arg(long)]
        magnet_diameter: Option<Real>,

        /// Magnet thickness in mm
        #[arg(long)]
        magnet_thickness: Option<Real>,

        /// Decimate first when the part has more faces than this
        #[arg(long)]
        target_faces: Option<usize>,

        /// Inner wall radius as a fraction of the part's half-width
        #[arg(long)]
        inner_ratio: Option<Real>,

        /// Cylinder tessellation
        #[arg(long)]
        segments: Option<usize>,

        /// JSON settings file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut scene = Scene::new();

    match cli.command {
        Commands::Caps {
            input,
            output,
            stl,
            thickness,
            inner_ratio,
            segments,
            config,
        } => {
            let mut config = load_config(config.as_deref())?.cap;
            if let Some(thickness) = thickness {
                config.thickness = thickness;
            }
            if let Some(ratio) = inner_ratio {
                config.inner_ratio = ratio;
            }
            if let Some(segments) = segments {
                config.segments = segments;
            }

            let report = CapPipeline::new(config)
                .run(&mut scene, &input, &output, stl.as_deref())
                .with_context(|| format!("cap pipeline failed on {}", input.display()))?;
            info!(
                faces = report.faces(),
                manifold = ?report.finalize.manifold,
                output = %output.display(),
                "caps done"
            );
        },
        Commands::Pouches {
            input,
            output,
            magnet_diameter,
            magnet_thickness,
            target_faces,
            inner_ratio,
            segments,
            config,
        } => {
            let mut config = load_config(config.as_deref())?.pouch;
            let MagnetSpec { diameter, thickness } = config.magnet;
            config.magnet = MagnetSpec::new(
                magnet_diameter.unwrap_or(diameter),
                magnet_thickness.unwrap_or(thickness),
            );
            if let Some(target) = target_faces {
                config.target_faces = target;
            }
            if let Some(ratio) = inner_ratio {
                config.inner_ratio = ratio;
            }
            if let Some(segments) = segments {
                config.segments = segments;
            }

            let output = output.unwrap_or_else(|| prefixed_output(&input, "boolean"));
            let simplified = prefixed_output(&input, "simplified");
            let report = PouchPipeline::new(config)
                .run(&mut scene, &input, &output, Some(&simplified))
                .with_context(|| format!("pouch pipeline failed on {}", input.display()))?;
            info!(
                faces = report.faces,
                mid_radius = report.mid_radius,
                output = %output.display(),
                "pouches done"
            );
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps_paths(args: &[&str]) -> (PathBuf, Option<PathBuf>) {
        let cli = Cli::try_parse_from(args).expect("arguments parse");
        match cli.command {
            Commands::Caps { input, stl, .. } => (input, stl),
            Commands::Pouches { .. } => panic!("parsed as pouches"),
        }
    }

    #[test]
    fn bare_stl_flag_leaves_the_input_alone() {
        let (input, stl) = caps_paths(&["thimble", "caps", "--stl", "body.stl"]);
        assert_eq!(input, PathBuf::from("body.stl"));
        assert_eq!(stl, Some(PathBuf::from("thimble.stl")));
    }

    #[test]
    fn stl_path_takes_an_equals_sign() {
        let (input, stl) = caps_paths(&["thimble", "caps", "body.obj", "--stl=out/part.stl"]);
        assert_eq!(input, PathBuf::from("body.obj"));
        assert_eq!(stl, Some(PathBuf::from("out/part.stl")));
    }

    #[test]
    fn stl_is_off_by_default() {
        let (_, stl) = caps_paths(&["thimble", "caps", "body.obj"]);
        assert_eq!(stl, None);
    }
}

//! rayslice CLI - radial ray-cast slicer
//!
//! Samples an STL mesh with fans of rays and writes the hits as G-code.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use rayslice_gcode::{emit_with, EmitSettings, FileSink, ToolpathSink, DEFAULT_FILENAME};
use rayslice_math::{Axis, Point3};
use rayslice_mesh::{primitives, read_stl, write_stl, MeshBvh};
use rayslice_slicer::{sample_with_markers, MarkerCollector, RayPlane, SliceConfig, VerticalAxis};

mod probe;

use probe::{ProbeCommand, ProbeLine};

#[derive(Parser)]
#[command(name = "rayslice")]
#[command(about = "Radial ray-cast slicer: STL in, G-code out", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Slice a mesh and write G-code
    Slice {
        /// Input STL file
        input: PathBuf,
        /// Output G-code file (default: output.gcode in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// TOML file with [slice] and [emit] tables
        #[arg(long)]
        config: Option<PathBuf>,
        /// Build direction
        #[arg(long, value_enum)]
        axis: Option<AxisArg>,
        /// Distance between layers
        #[arg(long)]
        layer_height: Option<f64>,
        /// Rays per layer
        #[arg(long)]
        segments: Option<u32>,
        /// Cast each layer as a flat ring instead of a helix
        #[arg(long)]
        stepped: bool,
        /// Plane the ray fan is cast in
        #[arg(long, value_enum)]
        ray_plane: Option<PlaneArg>,
        /// Write a marker per sampled point to this JSON file
        #[arg(long)]
        markers: Option<PathBuf>,
        /// Write radial anomalies to this JSON file
        #[arg(long)]
        anomalies: Option<PathBuf>,
    },
    /// Move a probe line around and report where it meets the mesh
    Probe {
        /// Input STL file
        input: PathBuf,
        /// Commands applied in order: rotate-x, rotate-y, rotate-z, raise, lower
        commands: Vec<ProbeCommand>,
    },
    /// Display mesh statistics
    Info {
        /// Input STL file
        input: PathBuf,
    },
    /// Write a cylinder mesh for trying the slicer
    DemoCylinder {
        /// Output STL file
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = 20.0)]
        radius: f64,
        #[arg(long, default_value_t = 40.0)]
        height: f64,
        /// Facets around the rim
        #[arg(long, default_value_t = 64)]
        segments: u32,
        /// Cylinder axis
        #[arg(long, value_enum, default_value_t = AxisArg::Y)]
        axis: AxisArg,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AxisArg {
    Y,
    Z,
}

impl From<AxisArg> for VerticalAxis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::Y => VerticalAxis::Y,
            AxisArg::Z => VerticalAxis::Z,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlaneArg {
    Horizontal,
    Perpendicular,
}

impl From<PlaneArg> for RayPlane {
    fn from(arg: PlaneArg) -> Self {
        match arg {
            PlaneArg::Horizontal => RayPlane::Horizontal,
            PlaneArg::Perpendicular => RayPlane::PerpendicularToAxis,
        }
    }
}

/// Contents of a `--config` file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct RunConfig {
    slice: SliceConfig,
    emit: EmitSettings,
}

impl RunConfig {
    fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Slice {
            input,
            output,
            config,
            axis,
            layer_height,
            segments,
            stepped,
            ray_plane,
            markers,
            anomalies,
        } => {
            let mut run = match config {
                Some(path) => RunConfig::load(&path)?,
                None => RunConfig::default(),
            };
            let slice = &mut run.slice;
            if let Some(axis) = axis {
                slice.vertical_axis = axis.into();
            }
            if let Some(h) = layer_height {
                slice.layer_height = h;
            }
            if let Some(n) = segments {
                slice.angular_segments = n;
            }
            if stepped {
                slice.incremental_height_per_angle = false;
            }
            if let Some(plane) = ray_plane {
                slice.ray_plane = plane.into();
            }
            if markers.is_some() {
                slice.debug_visualize = true;
            }
            slice_file(
                &input,
                output.as_deref(),
                &run,
                markers.as_deref(),
                anomalies.as_deref(),
            )?;
        }
        Commands::Probe { input, commands } => {
            probe_file(&input, &commands)?;
        }
        Commands::Info { input } => {
            show_info(&input)?;
        }
        Commands::DemoCylinder {
            output,
            radius,
            height,
            segments,
            axis,
        } => {
            let axis: Axis = VerticalAxis::from(axis).into();
            let mesh = primitives::cylinder(radius, height, segments, axis);
            write_stl(&output, &mesh)
                .with_context(|| format!("writing {}", output.display()))?;
            println!(
                "Wrote cylinder ({} triangles) to {}",
                mesh.num_triangles(),
                output.display()
            );
        }
    }

    Ok(())
}

fn init_logging() -> Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .context("installing log subscriber")?;

    Ok(())
}

fn slice_file(
    input: &Path,
    output: Option<&Path>,
    run: &RunConfig,
    markers_path: Option<&Path>,
    anomalies_path: Option<&Path>,
) -> Result<()> {
    let mesh = read_stl(input).with_context(|| format!("reading {}", input.display()))?;
    mesh.validate()
        .with_context(|| format!("invalid mesh in {}", input.display()))?;
    let bvh = MeshBvh::build(&mesh);

    let mut markers = MarkerCollector::default();
    let sampled = sample_with_markers(&bvh, &run.slice, &mut markers)?;
    let gcode = emit_with(&sampled.lattice, run.slice.vertical_axis, &run.emit);

    let (dir, filename) = split_output(output);
    FileSink::new(dir).persist(&gcode, &filename)?;

    if let Some(path) = markers_path {
        write_json(path, &markers)?;
    }
    if let Some(path) = anomalies_path {
        write_json(path, &sampled.anomalies)?;
    }

    println!(
        "Sliced {}: {} layers, {} points, {} anomalies",
        input.display(),
        sampled.lattice.layer_count(),
        sampled.lattice.point_count(),
        sampled.anomalies.len()
    );
    Ok(())
}

/// Directory and file name for the G-code output.
fn split_output(output: Option<&Path>) -> (PathBuf, String) {
    let Some(path) = output else {
        return (PathBuf::from("."), DEFAULT_FILENAME.to_string());
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(DEFAULT_FILENAME)
        .to_string();
    (dir, filename)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn probe_file(input: &Path, commands: &[ProbeCommand]) -> Result<()> {
    let mesh = read_stl(input).with_context(|| format!("reading {}", input.display()))?;
    let bvh = MeshBvh::build(&mesh);
    let mut line = ProbeLine::default();

    report_probe("start", &line, &bvh);
    for command in commands {
        command.apply(&mut line);
        report_probe(command.name(), &line, &bvh);
    }
    Ok(())
}

fn report_probe(label: &str, line: &ProbeLine, mesh: &MeshBvh) {
    let fmt = |p: &Point3| format!("({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
    match line.nearest_hit(mesh) {
        Some(hit) => println!(
            "{label:>9}: {} -> {}  hit {} at t={:.3}",
            fmt(&line.start),
            fmt(&line.end),
            fmt(&hit.point),
            hit.t
        ),
        None => println!("{label:>9}: {} -> {}  no hit", fmt(&line.start), fmt(&line.end)),
    }
}

fn show_info(input: &Path) -> Result<()> {
    let mesh = read_stl(input).with_context(|| format!("reading {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Triangles: {}", mesh.num_triangles());
    println!("Vertices: {}", mesh.num_vertices());
    match mesh.bounds() {
        Some(bounds) => {
            let extent = bounds.extent();
            println!(
                "Bounds: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
                bounds.min.x,
                bounds.min.y,
                bounds.min.z,
                bounds.max.x,
                bounds.max.y,
                bounds.max.z
            );
            println!("Extent: {:.3} x {:.3} x {:.3}", extent.x, extent.y, extent.z);
        }
        None => println!("Bounds: (empty)"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_output() {
        assert_eq!(
            split_output(None),
            (PathBuf::from("."), "output.gcode".to_string())
        );
        assert_eq!(
            split_output(Some(Path::new("part.gcode"))),
            (PathBuf::from("."), "part.gcode".to_string())
        );
        assert_eq!(
            split_output(Some(Path::new("out/dir/part.nc"))),
            (PathBuf::from("out/dir"), "part.nc".to_string())
        );
    }

    #[test]
    fn test_run_config_toml() {
        let run: RunConfig = toml::from_str(
            r#"
            [slice]
            layer_height = 0.25
            incremental_height_per_angle = false

            [emit]
            cut_feed = 900
            "#,
        )
        .unwrap();
        assert_eq!(run.slice.layer_height, 0.25);
        assert!(!run.slice.incremental_height_per_angle);
        assert_eq!(run.slice.angular_segments, 100);
        assert_eq!(run.emit.cut_feed, 900);
        assert_eq!(run.emit.travel_feed, 5000);
    }

    #[test]
    fn test_cli_parses_slice_flags() {
        let cli = Cli::try_parse_from([
            "rayslice",
            "slice",
            "part.stl",
            "--axis",
            "z",
            "--segments",
            "36",
            "--stepped",
            "--ray-plane",
            "perpendicular",
        ])
        .unwrap();
        match cli.command {
            Commands::Slice {
                axis,
                segments,
                stepped,
                ray_plane,
                ..
            } => {
                assert!(axis == Some(AxisArg::Z));
                assert_eq!(segments, Some(36));
                assert!(stepped);
                assert!(ray_plane == Some(PlaneArg::Perpendicular));
            }
            _ => panic!("expected slice"),
        }
    }

    #[test]
    fn test_cli_parses_probe_commands() {
        let cli =
            Cli::try_parse_from(["rayslice", "probe", "part.stl", "rotate-x", "raise"]).unwrap();
        match cli.command {
            Commands::Probe { commands, .. } => {
                assert_eq!(commands, vec![ProbeCommand::RotateX, ProbeCommand::Raise]);
            }
            _ => panic!("expected probe"),
        }
        assert!(Cli::try_parse_from(["rayslice", "probe", "part.stl", "spin"]).is_err());
    }

    #[test]
    fn test_slice_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let stl = dir.join("cyl.stl");
        write_stl(&stl, &primitives::cylinder(5.0, 4.0, 48, Axis::Y)).unwrap();

        let mut run = RunConfig::default();
        run.slice.angular_segments = 8;
        run.slice.debug_visualize = true;
        let out = dir.join("cyl.gcode");
        let anomalies = dir.join("anomalies.json");
        let markers = dir.join("markers.json");
        slice_file(
            &stl,
            Some(out.as_path()),
            &run,
            Some(markers.as_path()),
            Some(anomalies.as_path()),
        )
        .unwrap();

        let gcode = std::fs::read_to_string(&out).unwrap();
        assert!(gcode.starts_with("G21 ; Set units to millimeters\n"));
        assert!(gcode.ends_with("M30 ; End of program\n"));
        let report: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(&anomalies).unwrap()).unwrap();
        assert!(report.is_empty());
        let markers: MarkerCollector =
            serde_json::from_str(&std::fs::read_to_string(&markers).unwrap()).unwrap();
        assert_eq!(markers.markers.len(), gcode.lines().count() - 5);
    }
}

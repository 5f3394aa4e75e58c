//! Ray-fan sampling of a mesh into a [`Lattice`].
//!
//! For every height step a fan of rays is cast outward from the bounding
//! box center and the nearest hit of each ray is kept. Layers are built
//! strictly bottom-up because anomaly detection reads the finished layer
//! below; the rays inside one layer are independent and run in parallel.

use std::f64::consts::TAU;

use rayon::prelude::*;
use rayslice_math::{Point3, Vec3};
use rayslice_mesh::{Ray, RayTarget};
use tracing::{debug, info, warn};

use crate::config::{FanFrame, SliceConfig};
use crate::diagnostics::{MarkerSink, NoMarkers, RadialAnomaly};
use crate::error::{Result, SlicerError};
use crate::lattice::{Lattice, Layer, Sample};

/// Upper bound on the rays cast by one sampling run.
pub const MAX_RAYS: u64 = 100_000_000;

/// Output of one sampling run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sampled {
    /// The point lattice.
    pub lattice: Lattice,
    /// Radial jumps found between adjacent layers, in discovery order.
    pub anomalies: Vec<RadialAnomaly>,
}

/// Sample `mesh` with `config`.
pub fn sample<M: RayTarget + ?Sized>(mesh: &M, config: &SliceConfig) -> Result<Sampled> {
    sample_with_markers(mesh, config, &mut NoMarkers)
}

/// Sample `mesh`, sending every lattice point to `markers` when
/// `config.debug_visualize` is set.
pub fn sample_with_markers<M: RayTarget + ?Sized>(
    mesh: &M,
    config: &SliceConfig,
    markers: &mut dyn MarkerSink,
) -> Result<Sampled> {
    config.validate()?;

    let Some(bounds) = mesh.bounds() else {
        info!("mesh has no geometry, nothing to sample");
        return Ok(Sampled::default());
    };

    let center = bounds.center();
    let vertical = config.vertical_axis.axis();
    let frame = config.ray_plane.frame(config.vertical_axis);
    let min_height = vertical.component(&bounds.min);
    let max_height = vertical.component(&bounds.max);
    let count = layer_count(min_height, max_height, config.layer_height)?;
    let rays = count as u64 * u64::from(config.angular_segments);
    if rays > MAX_RAYS {
        return Err(SlicerError::TooManyRays {
            rays,
            layers: count,
            segments: config.angular_segments,
            limit: MAX_RAYS,
        });
    }

    debug!(
        ?frame,
        min_height,
        max_height,
        layers = count,
        segments = config.angular_segments,
        "sampling mesh"
    );

    let mut lattice = Lattice::default();
    let mut anomalies = Vec::new();

    for index in 0..count {
        let height = min_height + index as f64 * config.layer_height;
        let layer = sample_layer(mesh, config, &frame, &center, index, height);

        if let Some(below) = lattice.layers.last() {
            detect_anomalies(below, &layer, &frame, &center, config, &mut anomalies);
        }

        debug!(layer = index, height, hits = layer.len(), "sampled layer");
        lattice.layers.push(layer);
    }

    if config.debug_visualize {
        for point in lattice.points() {
            markers.place_marker(point);
        }
    }

    info!(
        layers = lattice.layer_count(),
        points = lattice.point_count(),
        anomalies = anomalies.len(),
        "sampling complete"
    );

    Ok(Sampled { lattice, anomalies })
}

/// Number of height steps in `[min, max)`: `floor((max - min) / step)`,
/// or zero for an empty or inverted range.
///
/// Fails with [`SlicerError::TooManyLayers`] when the count is not finite
/// or exceeds [`MAX_RAYS`].
pub fn layer_count(min: f64, max: f64, step: f64) -> Result<usize> {
    let span = max - min;
    if !(span > 0.0) {
        return Ok(0);
    }
    let layers = (span / step).floor();
    if !(layers <= MAX_RAYS as f64) {
        return Err(SlicerError::TooManyLayers {
            layers,
            limit: MAX_RAYS,
        });
    }
    Ok(layers as usize)
}

fn sample_layer<M: RayTarget + ?Sized>(
    mesh: &M,
    config: &SliceConfig,
    frame: &FanFrame,
    center: &Point3,
    index: usize,
    height: f64,
) -> Layer {
    let increment = config.angle_increment();
    let hits: Vec<Option<Sample>> = (0..config.angular_segments as usize)
        .into_par_iter()
        .map(|i| {
            let angle = i as f64 * increment;
            let origin_height = if config.incremental_height_per_angle {
                height + (angle / TAU) * config.layer_height
            } else {
                height
            };

            let mut origin = *center;
            origin[frame.height.index()] = origin_height;
            let mut direction = Vec3::zeros();
            direction[frame.u.index()] = angle.cos();
            direction[frame.v.index()] = angle.sin();

            mesh.intersect_nearest(&Ray::new(origin, direction))
                .map(|hit| Sample {
                    index: i,
                    angle,
                    point: hit.point,
                })
        })
        .collect();

    Layer {
        index,
        height,
        samples: hits.into_iter().flatten().collect(),
    }
}

/// Distance from `point` to the fan axis through `center`.
fn radial_distance(point: &Point3, frame: &FanFrame, center: &Point3) -> f64 {
    let du = frame.u.component(point) - frame.u.component(center);
    let dv = frame.v.component(point) - frame.v.component(center);
    du.hypot(dv)
}

fn detect_anomalies(
    below: &Layer,
    layer: &Layer,
    frame: &FanFrame,
    center: &Point3,
    config: &SliceConfig,
    out: &mut Vec<RadialAnomaly>,
) {
    for sample in &layer.samples {
        let Some(lower) = below.sample_at(sample.index) else {
            continue;
        };
        let below_radius = radial_distance(&lower.point, frame, center);
        let radius = radial_distance(&sample.point, frame, center);
        let delta = (radius - below_radius).abs();
        if delta > config.anomaly_threshold {
            warn!(
                layer = layer.index,
                angle_index = sample.index,
                below_radius,
                radius,
                delta,
                "radial jump between adjacent layers"
            );
            out.push(RadialAnomaly {
                layer: layer.index,
                angle_index: sample.index,
                below_radius,
                radius,
                delta,
            });
        }
    }
}

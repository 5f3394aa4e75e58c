//! The sampled point lattice: layers of boundary points ordered by angle.

use rayslice_math::Point3;

/// One boundary point hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Angular index of the ray within its layer (0-based).
    pub index: usize,
    /// Ray angle in radians, in `[0, 2π)`.
    pub angle: f64,
    /// Nearest intersection point.
    pub point: Point3,
}

/// The samples of one height step, in increasing angle order.
///
/// Rays that missed the mesh leave no sample, so a layer may hold fewer
/// samples than the configured segment count.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer number, counting up from the lowest bound.
    pub index: usize,
    /// Base height of the layer on the vertical axis.
    pub height: f64,
    /// Samples ordered by angle.
    pub samples: Vec<Sample>,
}

impl Layer {
    /// Create an empty layer.
    pub fn new(index: usize, height: f64) -> Self {
        Self {
            index,
            height,
            samples: Vec::new(),
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if every ray in the layer missed.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample points in angle order.
    pub fn points(&self) -> impl Iterator<Item = &Point3> + '_ {
        self.samples.iter().map(|s| &s.point)
    }

    /// The sample cast at angular index `index`, if that ray hit.
    pub fn sample_at(&self, index: usize) -> Option<&Sample> {
        self.samples
            .binary_search_by_key(&index, |s| s.index)
            .ok()
            .map(|i| &self.samples[i])
    }
}

/// All layers of one sampling run, ordered by increasing height.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lattice {
    /// Layers from the lowest bound upward.
    pub layers: Vec<Layer>,
}

impl Lattice {
    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Total number of sampled points.
    pub fn point_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    /// True if no layer holds any point.
    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// Every point in layer-then-angle order.
    pub fn points(&self) -> impl Iterator<Item = &Point3> + '_ {
        self.layers.iter().flat_map(|layer| layer.points())
    }
}

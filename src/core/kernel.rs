//! Convolution kernels and the builders that synthesize them.
//!
//! A kernel is an odd-sized 2-D weight grid addressed by offsets from its
//! center. Weights are stored column by column: the outer index is the
//! horizontal offset `k`, the inner index the vertical offset `l`.

use crate::core::error::{FilterError, FilterResult};

/// Largest accepted kernel width or height.
pub const MAX_KERNEL_SIDE: usize = 255;

fn check_side(parameter: &str, side: usize) -> FilterResult<()> {
    if side == 0 || side % 2 == 0 || side > MAX_KERNEL_SIDE {
        return Err(FilterError::invalid(
            parameter,
            format!("must be odd and in 1..={}, got {}", MAX_KERNEL_SIDE, side),
        ));
    }
    Ok(())
}

/// An immutable 2-D weight grid with a unique integer center.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    width: usize,
    height: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Create a kernel from column-major weights (`weights[x * height + y]`).
    ///
    /// Fails with [`FilterError::InvalidParameter`] unless both dimensions
    /// are odd and the weight count matches.
    pub fn new(width: usize, height: usize, weights: Vec<f32>) -> FilterResult<Self> {
        check_side("kernel width", width)?;
        check_side("kernel height", height)?;
        if weights.len() != width * height {
            return Err(FilterError::invalid(
                "kernel weights",
                format!("expected {} weights, got {}", width * height, weights.len()),
            ));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(FilterError::invalid("kernel weights", "must be finite"));
        }

        Ok(Self {
            width,
            height,
            weights,
        })
    }

    /// Create a kernel from nested arrays, one inner array per column.
    ///
    /// `columns[i][j]` is the weight at offset `(i - radius_x, j - radius_y)`.
    pub fn from_columns<const W: usize, const H: usize>(
        columns: [[f32; H]; W],
    ) -> FilterResult<Self> {
        let weights = columns.iter().flat_map(|c| c.iter().copied()).collect();
        Self::new(W, H, weights)
    }

    /// A 3×3 kernel from fixed weights, one inner array per column.
    pub fn from_3x3(columns: [[f32; 3]; 3]) -> Self {
        Self {
            width: 3,
            height: 3,
            weights: columns.iter().flat_map(|c| c.iter().copied()).collect(),
        }
    }

    /// The 1×1 kernel of weight 1; convolving with it is a no-op.
    pub fn identity() -> Self {
        Self {
            width: 1,
            height: 1,
            weights: vec![1.0],
        }
    }

    /// Uniform averaging kernel: every weight is `1 / (size_x * size_y)`.
    ///
    /// Both sizes must be odd and at most [`MAX_KERNEL_SIDE`].
    pub fn box_kernel(size_x: usize, size_y: usize) -> FilterResult<Self> {
        check_side("size_x", size_x)?;
        check_side("size_y", size_y)?;
        let count = size_x * size_y;
        let weight = 1.0 / count as f32;
        Self::new(size_x, size_y, vec![weight; count])
    }

    /// Square Gaussian kernel of side `2 * radius + 1`, normalized to sum 1.
    ///
    /// Unnormalized weights are `exp(-(i² + j²) / sigma²)`.
    pub fn gaussian(radius: usize, sigma: f32) -> FilterResult<Self> {
        if sigma == 0.0 || !sigma.is_finite() {
            return Err(FilterError::invalid(
                "sigma",
                format!("must be finite and non-zero, got {}", sigma),
            ));
        }

        if radius > MAX_KERNEL_SIDE / 2 {
            return Err(FilterError::invalid(
                "radius",
                format!("must be at most {}, got {}", MAX_KERNEL_SIDE / 2, radius),
            ));
        }

        let size = 2 * radius + 1;
        let r = radius as i64;
        let sigma_sq = (sigma as f64) * (sigma as f64);
        let mut weights = Vec::with_capacity(size * size);
        let mut norm = 0.0f32;

        for i in -r..=r {
            for j in -r..=r {
                let w = (-((i * i + j * j) as f64) / sigma_sq).exp() as f32;
                norm += w;
                weights.push(w);
            }
        }

        for w in &mut weights {
            *w /= norm;
        }

        Self::new(size, size, weights)
    }

    /// Diagonal motion-blur kernel: `1 / size` along the main diagonal.
    pub fn motion_blur(size: usize) -> FilterResult<Self> {
        check_side("size", size)?;
        let weight = 1.0 / size as f32;
        let mut weights = vec![0.0; size * size];
        for i in 0..size {
            weights[i * size + i] = weight;
        }
        Self::new(size, size, weights)
    }

    /// Kernel width (horizontal extent).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Kernel height (vertical extent).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Horizontal radius, `width / 2`.
    pub fn radius_x(&self) -> i32 {
        (self.width / 2) as i32
    }

    /// Vertical radius, `height / 2`.
    pub fn radius_y(&self) -> i32 {
        (self.height / 2) as i32
    }

    /// Weight at offset `(k, l)` from the center.
    ///
    /// Offsets must lie within `[-radius_x, radius_x] × [-radius_y, radius_y]`.
    #[inline]
    pub fn at(&self, k: i32, l: i32) -> f32 {
        let x = (k + self.radius_x()) as usize;
        let y = (l + self.radius_y()) as usize;
        self.weights[x * self.height + y]
    }

    /// All weights, column-major.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// Whether `other` has the same dimensions as this kernel.
    pub fn same_shape(&self, other: &Kernel) -> bool {
        self.width == other.width && self.height == other.height
    }
}

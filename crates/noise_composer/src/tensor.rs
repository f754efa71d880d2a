//! Dense image tensors passed between the synthesizer and effect functions.
//!
//! The core never interprets pixel data; it only threads a [`Tensor`] through
//! bound effects in order.

/// Image dimensions as `(height, width, channels)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl Shape {
    pub const fn new(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels,
        }
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.height * self.width * self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::new(1024, 2048, 3)
    }
}

/// Row-major, channel-interleaved `f32` samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    pub shape: Shape,
    pub data: Vec<f32>,
}

impl Tensor {
    /// Create a tensor of the given shape, initializing all values to zero.
    pub fn zeros(shape: Shape) -> Self {
        Self {
            shape,
            data: vec![0.0; shape.len()],
        }
    }

    /// Create a tensor with every sample set to `value`.
    pub fn filled(shape: Shape, value: f32) -> Self {
        Self {
            shape,
            data: vec![value; shape.len()],
        }
    }

    #[inline]
    fn index(&self, y: usize, x: usize, c: usize) -> usize {
        (y * self.shape.width + x) * self.shape.channels + c
    }

    /// Get the sample at `(y, x, c)`, returning `0.0` if out of bounds.
    pub fn get(&self, y: usize, x: usize, c: usize) -> f32 {
        if y >= self.shape.height || x >= self.shape.width || c >= self.shape.channels {
            return 0.0;
        }
        self.data[self.index(y, x, c)]
    }

    /// Set the sample at `(y, x, c)`. Out of bounds writes are ignored.
    pub fn set(&mut self, y: usize, x: usize, c: usize, value: f32) {
        if y >= self.shape.height || x >= self.shape.width || c >= self.shape.channels {
            return;
        }
        let i = self.index(y, x, c);
        self.data[i] = value;
    }

    /// Apply `f` to every sample.
    pub fn map(mut self, f: impl Fn(f32) -> f32) -> Self {
        for v in &mut self.data {
            *v = f(*v);
        }
        self
    }

    /// Rescale samples into `[0, 1]`. Constant tensors become all zeros.
    pub fn normalize(self) -> Self {
        let (min, max) = self
            .data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });

        let range = max - min;
        if !range.is_finite() || range <= 0.0 {
            return Tensor::zeros(self.shape);
        }
        self.map(|v| (v - min) / range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_matches_shape_len() {
        let t = Tensor::zeros(Shape::new(2, 3, 4));
        assert_eq!(t.data.len(), 24);
        assert!(t.data.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn get_returns_zero_outside_bounds() {
        let mut t = Tensor::zeros(Shape::new(2, 2, 1));
        t.set(1, 1, 0, 0.75);
        assert_eq!(t.get(1, 1, 0), 0.75);
        assert_eq!(t.get(2, 0, 0), 0.0);
        t.set(5, 5, 0, 1.0);
        assert_eq!(t.data.iter().filter(|v| **v != 0.0).count(), 1);
    }

    #[test]
    fn normalize_rescales_into_unit_range() {
        let t = Tensor {
            shape: Shape::new(1, 3, 1),
            data: vec![2.0, 4.0, 6.0],
        };
        assert_eq!(t.normalize().data, vec![0.0, 0.5, 1.0]);

        let flat = Tensor::filled(Shape::new(1, 2, 1), 3.0).normalize();
        assert_eq!(flat.data, vec![0.0, 0.0]);
    }
}

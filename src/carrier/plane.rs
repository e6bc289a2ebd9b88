// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Single-channel sample storage.
//!
//! [`Plane`] holds one channel (luma samples, wavelet coefficients, ...) in
//! row-major order. It is the working surface for every transform strategy.

/// Row-major grid of samples for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane<T> {
    width: usize,
    height: usize,
    samples: Vec<T>,
}

impl<T: Copy + Default> Plane<T> {
    /// Create a new plane filled with `T::default()`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            samples: vec![T::default(); width * height],
        }
    }

    /// Wrap an existing row-major buffer.
    ///
    /// Panics if `samples.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, samples: Vec<T>) -> Self {
        assert_eq!(samples.len(), width * height, "plane buffer size mismatch");
        Self { width, height, samples }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the sample at row `y`, column `x`.
    pub fn get(&self, y: usize, x: usize) -> T {
        self.samples[self.index(y, x)]
    }

    /// Set the sample at row `y`, column `x`.
    pub fn set(&mut self, y: usize, x: usize, val: T) {
        let idx = self.index(y, x);
        self.samples[idx] = val;
    }

    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.width;
        &self.samples[start..start + self.width]
    }

    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [T] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<T> {
        self.samples
    }

    /// Map every sample through `f`, keeping the shape.
    pub fn map<U: Copy + Default>(&self, f: impl Fn(T) -> U) -> Plane<U> {
        Plane {
            width: self.width,
            height: self.height,
            samples: self.samples.iter().map(|&s| f(s)).collect(),
        }
    }

    /// Grow the plane to `width × height` by repeating the last column and
    /// the last row. Existing samples keep their coordinates.
    pub fn extend_edges(&self, width: usize, height: usize) -> Plane<T> {
        debug_assert!(width >= self.width && height >= self.height);
        if width == self.width && height == self.height {
            return self.clone();
        }
        let mut out = Plane::new(width, height);
        for y in 0..height {
            let sy = y.min(self.height - 1);
            for x in 0..width {
                let sx = x.min(self.width - 1);
                out.set(y, x, self.get(sy, sx));
            }
        }
        out
    }

    fn index(&self, y: usize, x: usize) -> usize {
        debug_assert!(y < self.height, "row {y} >= {}", self.height);
        debug_assert!(x < self.width, "col {x} >= {}", self.width);
        y * self.width + x
    }
}

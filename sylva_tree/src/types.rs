// Copyright 2026 the Sylva Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and distance helpers.

use std::fmt;

/// Integer 3-vector.
///
/// Planar (quadtree) trees only look at `x` and `z`; `y` is carried along but ignored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3i {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate (ignored by planar trees).
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl Vec3i {
    /// The origin.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Create a new vector.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Components as `f32`.
    #[allow(
        clippy::cast_precision_loss,
        reason = "Coordinates beyond 2^24 lose precision in f32, same as the search radius."
    )]
    pub fn to_f32(self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }

    /// Component-wise add of `d` to every axis, saturating at the `i32` range.
    pub const fn saturating_offset(self, d: i32) -> Self {
        Self::new(
            self.x.saturating_add(d),
            self.y.saturating_add(d),
            self.z.saturating_add(d),
        )
    }
}

impl From<[i32; 3]> for Vec3i {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Vec3i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Axis-aligned bounding box with a precomputed center and diagonal length.
///
/// Both corners are inclusive. `min <= max` is expected on every axis the owning
/// tree uses; a `Bound` violating that simply contains nothing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bound {
    min: Vec3i,
    max: Vec3i,
    center: Vec3i,
    length: f32,
}

impl Bound {
    /// Create a bound from its min/max corners.
    pub fn new(min: Vec3i, max: Vec3i) -> Self {
        Self {
            min,
            max,
            center: Vec3i::new(
                midpoint(min.x, max.x),
                midpoint(min.y, max.y),
                midpoint(min.z, max.z),
            ),
            length: distance_3d(min, max),
        }
    }

    /// Axis-aligned cube of half-width `half_width` around `center`.
    pub fn cube(center: Vec3i, half_width: i32) -> Self {
        Self::new(
            center.saturating_offset(half_width.saturating_neg()),
            center.saturating_offset(half_width),
        )
    }

    /// Minimum corner.
    pub const fn min(&self) -> Vec3i {
        self.min
    }

    /// Maximum corner.
    pub const fn max(&self) -> Vec3i {
        self.max
    }

    /// Center, `floor((min + max) / 2)` per axis.
    pub const fn center(&self) -> Vec3i {
        self.center
    }

    /// Euclidean distance from `min` to `max`.
    pub const fn length(&self) -> f32 {
        self.length
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "The floored midpoint of two i32 values always fits in i32."
)]
const fn midpoint(a: i32, b: i32) -> i32 {
    (a as i64 + b as i64).div_euclid(2) as i32
}

#[inline]
fn delta(a: i32, b: i32) -> f64 {
    f64::from(a) - f64::from(b)
}

/// Distance between two points on the X/Z plane.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Distances are reported in f32 like search radii."
)]
pub fn distance_2d(a: Vec3i, b: Vec3i) -> f32 {
    delta(a.x, b.x).hypot(delta(a.z, b.z)) as f32
}

/// Euclidean distance between two points.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Distances are reported in f32 like search radii."
)]
pub fn distance_3d(a: Vec3i, b: Vec3i) -> f32 {
    let (dx, dy, dz) = (delta(a.x, b.x), delta(a.y, b.y), delta(a.z, b.z));
    (dx * dx + dy * dy + dz * dz).sqrt() as f32
}

/// Whether `a` and `b` are at most `radius` apart on the X/Z plane.
pub fn within_distance_2d(a: Vec3i, b: Vec3i, radius: f32) -> bool {
    let (dx, dz) = (delta(a.x, b.x), delta(a.z, b.z));
    let r = f64::from(radius);
    dx * dx + dz * dz <= r * r
}

/// Whether `a` and `b` are at most `radius` apart.
pub fn within_distance_3d(a: Vec3i, b: Vec3i, radius: f32) -> bool {
    let (dx, dy, dz) = (delta(a.x, b.x), delta(a.y, b.y), delta(a.z, b.z));
    let r = f64::from(radius);
    dx * dx + dy * dy + dz * dz <= r * r
}

// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Three-dimensional vector value type
//!
//! `Vector3D` is used for positions, velocities and forces alike. It is a
//! plain `Copy` value; every operation returns a new vector except the
//! compound-assignment operators.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// 3D vector with double-precision components
///
/// # Examples
///
/// ```
/// use particle_physics::Vector3D;
///
/// let a = Vector3D::new(3.0, 4.0, 0.0);
/// assert_eq!(a.magnitude(), 5.0);
/// assert!((a - a).is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3D {
    x: f64,
    y: f64,
    z: f64,
}

impl Vector3D {
    /// Create a new vector with the given components
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3D { x, y, z }
    }

    /// The zero vector
    pub const fn zero() -> Self {
        Vector3D::new(0.0, 0.0, 0.0)
    }

    /// Get the x component
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Get the y component
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Get the z component
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Component-wise difference `self - other`
    pub fn subtract(self, other: Vector3D) -> Self {
        Vector3D::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Multiply every component by `factor`
    pub fn scale(self, factor: f64) -> Self {
        Vector3D::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Dot product
    pub fn dot(self, other: Vector3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Squared length, avoiding the square root
    pub fn magnitude_squared(self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length
    pub fn magnitude(self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Distance between two points
    pub fn distance_to(self, other: Vector3D) -> f64 {
        self.subtract(other).magnitude()
    }

    /// True only when all three components are exactly zero
    ///
    /// No epsilon is applied; `1e-300` is not zero.
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Check if all components are finite (not NaN or infinite)
    pub fn is_valid(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Get the vector as an array
    pub fn as_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Create a vector from an array
    pub fn from_array(arr: [f64; 3]) -> Self {
        Vector3D::new(arr[0], arr[1], arr[2])
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    fn add(self, rhs: Vector3D) -> Vector3D {
        Vector3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    fn sub(self, rhs: Vector3D) -> Vector3D {
        self.subtract(rhs)
    }
}

impl Mul<f64> for Vector3D {
    type Output = Vector3D;

    fn mul(self, rhs: f64) -> Vector3D {
        self.scale(rhs)
    }
}

impl Mul<Vector3D> for f64 {
    type Output = Vector3D;

    fn mul(self, rhs: Vector3D) -> Vector3D {
        rhs.scale(self)
    }
}

impl Div<f64> for Vector3D {
    type Output = Vector3D;

    fn div(self, rhs: f64) -> Vector3D {
        Vector3D::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vector3D {
    type Output = Vector3D;

    fn neg(self) -> Vector3D {
        Vector3D::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vector3D {
    fn add_assign(&mut self, rhs: Vector3D) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl SubAssign for Vector3D {
    fn sub_assign(&mut self, rhs: Vector3D) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl From<[f64; 3]> for Vector3D {
    fn from(arr: [f64; 3]) -> Self {
        Vector3D::from_array(arr)
    }
}

impl fmt::Display for Vector3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_arithmetic() {
        let a = Vector3D::new(1.0, 2.0, 3.0);
        let b = Vector3D::new(4.0, 5.0, 6.0);

        assert_eq!(a + b, Vector3D::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vector3D::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Vector3D::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, a.scale(2.0));
        assert_eq!(a - b, a.subtract(b));
        assert_eq!(a + b - b, a);
        assert_eq!(-a, Vector3D::new(-1.0, -2.0, -3.0));
        assert_eq!(b / 2.0, Vector3D::new(2.0, 2.5, 3.0));
        assert_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn test_vector_compound_assignment() {
        let mut v = Vector3D::zero();
        v += Vector3D::new(1.0, 1.0, 1.0);
        v += Vector3D::new(0.5, 0.0, -1.0);
        v -= Vector3D::new(0.5, 0.5, 0.5);
        assert_eq!(v, Vector3D::new(1.0, 0.5, -0.5));
    }

    #[test]
    fn test_vector_magnitude() {
        let v = Vector3D::new(3.0, 4.0, 0.0);
        assert_eq!(v.magnitude(), 5.0); // 3-4-5 triangle
        assert_eq!(v.magnitude_squared(), 25.0);
        assert_eq!(Vector3D::new(1.0, 1.0, 1.0).distance_to(Vector3D::new(1.0, 1.0, 3.0)), 2.0);
    }

    #[test]
    fn test_is_zero_is_exact() {
        assert!(Vector3D::zero().is_zero());
        assert!(Vector3D::new(-0.0, 0.0, 0.0).is_zero());
        assert!(!Vector3D::new(1e-300, 0.0, 0.0).is_zero());
    }

    #[test]
    fn test_vector_validation() {
        assert!(Vector3D::new(1.0, 2.0, 3.0).is_valid());
        assert!(!Vector3D::new(f64::NAN, 2.0, 3.0).is_valid());
        assert!(!Vector3D::new(1.0, f64::INFINITY, 3.0).is_valid());
    }
}

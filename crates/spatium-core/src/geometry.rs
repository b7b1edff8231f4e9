//! Cartesian and polar direction types.
//!
//! Angle convention: azimuth 0 = front (+y), positive azimuth turns toward the
//! left (-x), elevation 0 = ear level, positive = up (+z). All angles are in
//! degrees at the API surface.

use core::ops::{Add, Mul, Neg, Sub};
use serde::{Deserialize, Serialize};

/// Below this length a vector has no usable direction.
const MIN_LENGTH: f32 = 1e-9;

/// Point or direction in listener-centered cartesian space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CartesianVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl CartesianVector {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    pub fn normalized(&self) -> Option<Self> {
        let length = self.length();
        if length < MIN_LENGTH {
            return None;
        }
        Some(*self * (1.0 / length))
    }

    /// Angle between two vectors, in radians.
    ///
    /// Returns 0 when either vector is degenerate.
    pub fn angle_with(&self, other: &Self) -> f32 {
        let denominator = self.length() * other.length();
        if denominator < MIN_LENGTH {
            return 0.0;
        }
        (self.dot(other) / denominator).clamp(-1.0, 1.0).acos()
    }

    #[inline]
    pub fn distance_to(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }

    /// Largest absolute coordinate (distance from the center of a cube layout).
    #[inline]
    pub fn chebyshev_length(&self) -> f32 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }

    pub fn to_polar(&self) -> PolarVector {
        let length = self.length();
        if length < MIN_LENGTH {
            return PolarVector::new(0.0, 0.0, 0.0);
        }
        let azimuth = (-self.x).atan2(self.y).to_degrees();
        let elevation = (self.z / length).clamp(-1.0, 1.0).asin().to_degrees();
        PolarVector::new(wrap_azimuth(azimuth), elevation, length)
    }
}

impl Add for CartesianVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for CartesianVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for CartesianVector {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for CartesianVector {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Direction in degrees plus a radius.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolarVector {
    /// Horizontal angle in degrees, (-180, 180], 0 = front, 90 = left
    pub azimuth: f32,
    /// Vertical angle in degrees, [-90, 90], positive = up
    pub elevation: f32,
    /// Distance from the listener (1.0 = on the unit sphere)
    pub length: f32,
}

impl PolarVector {
    pub const fn new(azimuth: f32, elevation: f32, length: f32) -> Self {
        Self {
            azimuth,
            elevation,
            length,
        }
    }

    /// Unit-length direction at the given angles.
    pub const fn unit(azimuth: f32, elevation: f32) -> Self {
        Self::new(azimuth, elevation, 1.0)
    }

    pub fn to_cartesian(&self) -> CartesianVector {
        let azimuth = self.azimuth.to_radians();
        let elevation = self.elevation.to_radians();
        let horizontal = self.length * elevation.cos();
        CartesianVector::new(
            -horizontal * azimuth.sin(),
            horizontal * azimuth.cos(),
            self.length * elevation.sin(),
        )
    }

    /// Same angles with the radius forced to 1.
    pub fn with_unit_length(&self) -> Self {
        Self::new(self.azimuth, self.elevation, 1.0)
    }
}

/// Wrap an azimuth in degrees into (-180, 180].
#[inline]
pub fn wrap_azimuth(degrees: f32) -> f32 {
    let mut wrapped = degrees % 360.0;
    if wrapped > 180.0 {
        wrapped -= 360.0;
    } else if wrapped <= -180.0 {
        wrapped += 360.0;
    }
    wrapped
}

//! Small fixed-size vectors for sensor readings.
//!
//! `core` has no square root, so lengths are given squared.

use core::ops::{Add, Mul, Sub};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector2<T> {
    pub x: T,
    pub y: T,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector4<T> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub t: T,
}

impl<T: Copy + Add<Output = T> + Mul<Output = T>> Vector2<T> {
    pub const fn new(x: T, y: T) -> Self {
        Vector2 { x, y }
    }

    pub fn scale(self, a: T) -> Self {
        Vector2 { x: a * self.x, y: a * self.y }
    }

    pub fn dot(self, other: Self) -> T {
        self.x * other.x + self.y * other.y
    }

    pub fn len_squared(self) -> T {
        self.dot(self)
    }
}

impl<T: Copy + Add<Output = T> + Mul<Output = T>> Vector3<T> {
    pub const fn new(x: T, y: T, z: T) -> Self {
        Vector3 { x, y, z }
    }

    pub fn scale(self, a: T) -> Self {
        Vector3 { x: a * self.x, y: a * self.y, z: a * self.z }
    }

    pub fn dot(self, other: Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn len_squared(self) -> T {
        self.dot(self)
    }
}

impl<T: Copy + Mul<Output = T> + Sub<Output = T>> Vector3<T> {
    /// Right-handed: `x.cross(y) == z`.
    pub fn cross(self, other: Self) -> Self {
        Vector3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }
}

impl<T: Copy + Add<Output = T> + Mul<Output = T>> Vector4<T> {
    pub const fn new(x: T, y: T, z: T, t: T) -> Self {
        Vector4 { x, y, z, t }
    }

    pub fn scale(self, a: T) -> Self {
        Vector4 { x: a * self.x, y: a * self.y, z: a * self.z, t: a * self.t }
    }

    pub fn dot(self, other: Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z + self.t * other.t
    }

    pub fn len_squared(self) -> T {
        self.dot(self)
    }
}

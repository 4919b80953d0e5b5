use std::ops::{Index, IndexMut};

use crate::vec3::Vec3;

/// Homogeneous 4-component vector.
#[derive(Copy, Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Vec4<T>([T; 4]);

impl<T> Vec4<T> {
    #[inline]
    pub fn new(x: T, y: T, z: T, w: T) -> Self {
        Vec4([x, y, z, w])
    }

    #[inline]
    pub fn x(&self) -> &T {
        self.index(0)
    }

    #[inline]
    pub fn y(&self) -> &T {
        self.index(1)
    }

    #[inline]
    pub fn z(&self) -> &T {
        self.index(2)
    }
}

impl Vec4<f64> {
    /// Lifts a point (w = 1), so translation applies.
    #[inline]
    pub fn point(v: Vec3<f64>) -> Self {
        Vec4::new(v.x, v.y, v.z, 1.0)
    }

    /// Lifts a direction (w = 0), so translation is ignored.
    #[inline]
    pub fn direction(v: Vec3<f64>) -> Self {
        Vec4::new(v.x, v.y, v.z, 0.0)
    }
}

impl<T: Copy> From<[T; 4]> for Vec4<T> {
    #[inline]
    fn from(v: [T; 4]) -> Self {
        Vec4::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Vec3<f64>> for Vec4<f64> {
    #[inline]
    fn from(v: Vec3<f64>) -> Self {
        Vec4::point(v)
    }
}

impl From<Vec4<f64>> for Vec3<f64> {
    #[inline]
    fn from(v: Vec4<f64>) -> Self {
        Vec3::new(*v.x(), *v.y(), *v.z())
    }
}

impl<T> Index<usize> for Vec4<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T> IndexMut<usize> for Vec4<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

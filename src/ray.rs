use crate::{matrix::Matrix4x4, vec3::Vec3, vec4::Vec4};

/// Half-line starting at `origin`, parameterized by `t >= 0`.
///
/// The direction is normalized on construction, so `t` is measured in the
/// same units as the coordinate space the ray lives in.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray<T> {
    origin: Vec3<T>,
    direction: Vec3<T>,
    depth: u32,
}

impl Ray<f64> {
    pub fn new(origin: Vec3<f64>, direction: Vec3<f64>) -> Self {
        Self {
            origin,
            direction: direction.unit(),
            depth: 0,
        }
    }

    /// Recursion depth of secondary rays (reflections, refractions).
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    #[inline]
    pub fn origin(&self) -> Vec3<f64> {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> &Vec3<f64> {
        &self.direction
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// A ray built from a zero-length direction goes nowhere and hits nothing.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::zero()
    }

    #[inline]
    pub fn point_at(&self, t: f64) -> Vec3<f64> {
        self.origin + self.direction.scale(t)
    }

    /// Maps the ray through `transformation`, treating the origin as a point
    /// and the direction as a vector. The result is re-normalized.
    pub fn transformed(&self, transformation: &Matrix4x4<f64>) -> Self {
        let origin = (transformation * Vec4::point(self.origin)).into();
        let direction: Vec3<f64> = (transformation * Vec4::direction(self.direction)).into();

        Ray::new(origin, direction).with_depth(self.depth)
    }
}

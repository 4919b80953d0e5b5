//! Axis-aligned box, intersected with the slab method.

use crate::{
    geometry::{Geometry, CAST_EPSILON},
    hit::HitRecord,
    ray::Ray,
    vec3::Vec3,
};

/// Direction components below this are treated as parallel to a slab.
const SLAB_EPSILON: f64 = 1e-8;

/// Widens the face test slightly so points on an edge or corner resolve to
/// one face deterministically, in x, y, z order.
const FACE_BIAS: f64 = 1.0001;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cuboid {
    center: Vec3<f64>,
    half_extent: Vec3<f64>,
    min: Vec3<f64>,
    max: Vec3<f64>,
}

impl Cuboid {
    pub fn new(center: Vec3<f64>, half_extent: Vec3<f64>) -> Self {
        Self {
            center,
            half_extent,
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// A cube with the same half extent along every axis.
    pub fn cube(center: Vec3<f64>, half_extent: f64) -> Self {
        Cuboid::new(center, Vec3::new(half_extent, half_extent, half_extent))
    }

    fn normal_at(&self, point: Vec3<f64>) -> Vec3<f64> {
        let p = point - self.center;

        for axis in 0..3 {
            if p[axis].abs() * FACE_BIAS >= self.half_extent[axis] {
                return Vec3::axis(axis, p[axis].signum());
            }
        }

        // Not on any face within the bias; pick the relatively closest one.
        let relative = |axis: usize| p[axis].abs() / self.half_extent[axis];
        let axis = (0..3)
            .max_by(|&a, &b| relative(a).partial_cmp(&relative(b)).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or(2);

        Vec3::axis(axis, p[axis].signum())
    }
}

impl Geometry for Cuboid {
    fn intersect(&self, ray: &Ray<f64>) -> HitRecord {
        if ray.is_degenerate() {
            return HitRecord::miss();
        }

        let origin = ray.origin();
        let direction = ray.direction();

        let mut t_min = 0.0f64;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];

            if d.abs() < SLAB_EPSILON {
                if o < self.min[axis] || o > self.max[axis] {
                    return HitRecord::miss();
                }
                continue;
            }

            let mut t0 = (self.min[axis] - o) / d;
            let mut t1 = (self.max[axis] - o) / d;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_min = t_min.max(t0);
            t_max = t_max.min(t1);

            if t_max <= t_min {
                return HitRecord::miss();
            }
        }

        // Starting inside the box: the entry is clamped to zero, so the exit face is the hit.
        let t = if t_min > CAST_EPSILON {
            t_min
        } else if t_max > CAST_EPSILON && t_max.is_finite() {
            t_max
        } else {
            return HitRecord::miss();
        };

        let point = ray.point_at(t);
        HitRecord::new(t, point, self.normal_at(point))
    }
}

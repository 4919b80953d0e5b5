//! Surfaces given only as the zero level set of a scalar field.
//!
//! No closed-form solver exists for these, so the ray is clipped to a
//! bounding box, marched in uniform steps until the field changes sign, and
//! the bracketed root is refined by bisection. Both loops run a fixed number
//! of iterations, which keeps the cost of every call bounded.
//!
//! The march assumes the field does not change sign twice within one step.
//! Features thinner than `(t_exit - t_entry) / step_count` along the ray can
//! be missed; raise `step_count` for such surfaces.

use crate::{
    error::{Error, Result},
    geometry::{Geometry, CAST_EPSILON},
    hit::{HitRecord, MaterialId},
    ray::Ray,
    vec3::Vec3,
};

/// Halvings applied to a bracketed root.
const BISECTION_STEPS: usize = 10;

/// Offset used for the central-difference gradient.
const GRADIENT_EPSILON: f64 = 1e-4;

/// Reciprocal substituted for a zero direction component in the slab test.
const FAR_RECIPROCAL: f64 = 1e30;

/// Continuous scalar field. Points with a value `<= 0` are inside.
pub trait Field: Send + Sync {
    fn value(&self, x: f64, y: f64, z: f64) -> f64;
}

impl<F> Field for F
where
    F: Fn(f64, f64, f64) -> f64 + Send + Sync,
{
    #[inline]
    fn value(&self, x: f64, y: f64, z: f64) -> f64 {
        self(x, y, z)
    }
}

pub struct ImplicitSurface<F> {
    field: F,
    bbox_min: Vec3<f64>,
    bbox_max: Vec3<f64>,
    step_count: usize,
    material: Option<MaterialId>,
}

impl<F: Field> ImplicitSurface<F> {
    pub fn new(field: F, bbox_min: Vec3<f64>, bbox_max: Vec3<f64>, step_count: usize) -> Self {
        Self {
            field,
            bbox_min,
            bbox_max,
            step_count,
            material: None,
        }
    }

    /// Like [`ImplicitSurface::new`], but rejects a zero step count and an
    /// empty bounding box.
    pub fn try_new(field: F, bbox_min: Vec3<f64>, bbox_max: Vec3<f64>, step_count: usize) -> Result<Self> {
        if step_count == 0 {
            return Err(Error::InvalidStepCount);
        }
        if !(bbox_min.x < bbox_max.x && bbox_min.y < bbox_max.y && bbox_min.z < bbox_max.z) {
            return Err(Error::InvalidBounds { min: bbox_min, max: bbox_max });
        }

        Ok(ImplicitSurface::new(field, bbox_min, bbox_max, step_count))
    }

    pub fn with_material(mut self, material: Option<MaterialId>) -> Self {
        self.material = material;
        self
    }

    pub fn with_step_count(mut self, step_count: usize) -> Self {
        self.step_count = step_count;
        self
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    #[inline]
    fn sample(&self, p: Vec3<f64>) -> f64 {
        self.field.value(p.x, p.y, p.z)
    }

    pub fn contains(&self, p: Vec3<f64>) -> bool {
        self.sample(p) <= 0.0
    }

    /// Normalized central-difference gradient; zero where the gradient vanishes.
    pub fn normal_at(&self, p: Vec3<f64>) -> Vec3<f64> {
        let e = GRADIENT_EPSILON;
        let f = &self.field;

        let dx = f.value(p.x + e, p.y, p.z) - f.value(p.x - e, p.y, p.z);
        let dy = f.value(p.x, p.y + e, p.z) - f.value(p.x, p.y - e, p.z);
        let dz = f.value(p.x, p.y, p.z + e) - f.value(p.x, p.y, p.z - e);

        Vec3::new(dx, dy, dz).unit()
    }

    /// Entry and exit parameters of the ray against the bounding box.
    fn clip(&self, ray: &Ray<f64>) -> Option<(f64, f64)> {
        let origin = ray.origin();
        let direction = ray.direction();

        let mut t_enter = f64::NEG_INFINITY;
        let mut t_exit = f64::INFINITY;

        for axis in 0..3 {
            let inv = if direction[axis] != 0.0 {
                1.0 / direction[axis]
            } else {
                FAR_RECIPROCAL
            };

            let t0 = (self.bbox_min[axis] - origin[axis]) * inv;
            let t1 = (self.bbox_max[axis] - origin[axis]) * inv;

            t_enter = t_enter.max(t0.min(t1));
            t_exit = t_exit.min(t0.max(t1));
        }

        if t_exit < 0.0 || t_enter > t_exit {
            None
        } else {
            Some((t_enter, t_exit))
        }
    }

    /// Narrows a sign change bracketed by `[t_low, t_high]`, returning the
    /// bound on the side of `value_low`.
    fn bisect(&self, ray: &Ray<f64>, mut t_low: f64, mut t_high: f64, mut value_low: f64) -> f64 {
        for _ in 0..BISECTION_STEPS {
            let t_mid = (t_low + t_high) * 0.5;
            let value_mid = self.sample(ray.point_at(t_mid));

            if value_low * value_mid <= 0.0 {
                t_high = t_mid;
            } else {
                t_low = t_mid;
                value_low = value_mid;
            }
        }

        t_low
    }
}

impl<F: Field> Geometry for ImplicitSurface<F> {
    fn intersect(&self, ray: &Ray<f64>) -> HitRecord {
        if ray.is_degenerate() {
            return HitRecord::miss();
        }

        let (t_start, t_end) = match self.clip(ray) {
            Some((t_enter, t_exit)) => (t_enter.max(0.0), t_exit),
            None => return HitRecord::miss(),
        };

        let step = (t_end - t_start) / self.step_count as f64;

        let mut t_curr = t_start;
        let mut value_curr = self.sample(ray.point_at(t_curr));

        for i in 1..=self.step_count {
            let t_next = t_start + step * i as f64;
            let value_next = self.sample(ray.point_at(t_next));

            if value_curr * value_next <= 0.0 {
                let t = self.bisect(ray, t_curr, t_next, value_curr);

                // A root at the origin is the surface the ray started on.
                if t > CAST_EPSILON {
                    let point = ray.point_at(t);

                    return HitRecord::new(t, point, self.normal_at(point))
                        .with_material(self.material)
                        .with_uv(0.0, 0.0);
                }
            }

            t_curr = t_next;
            value_curr = value_next;
        }

        HitRecord::miss()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere() -> ImplicitSurface<impl Field> {
        ImplicitSurface::new(
            |x: f64, y: f64, z: f64| x * x + y * y + z * z - 1.0,
            Vec3::new(-2.0, -2.0, -2.0),
            Vec3::new(2.0, 2.0, 2.0),
            100,
        )
    }

    #[test]
    fn finds_sphere_root() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let hit = unit_sphere().intersect(&ray);

        assert!(hit.hit);
        assert!((hit.t - 4.0).abs() < 1e-3);
        assert!((hit.normal - Vec3::new(0.0, 0.0, 1.0)).len() < 1e-3);
        assert_eq!(Some((0.0, 0.0)), hit.uv);
    }

    #[test]
    fn refined_root_is_finer_than_a_step() {
        // One step spans 4 / 100 = 0.04; ten halvings bring that under 1e-4.
        let ray = Ray::new(Vec3::new(0.35, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let expected = 5.0 - (1.0f64 - 0.35 * 0.35).sqrt();

        let hit = unit_sphere().intersect(&ray);

        assert!(hit.hit);
        assert!((hit.t - expected).abs() < 1e-4);
    }

    #[test]
    fn missing_the_box_misses() {
        let ray = Ray::new(Vec3::new(0.0, 3.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!unit_sphere().intersect(&ray).hit);

        let behind = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!unit_sphere().intersect(&behind).hit);
    }

    #[test]
    fn constant_positive_field_never_hits() {
        let surface = ImplicitSurface::new(|_: f64, _: f64, _: f64| 1.0, Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0), 50);

        let directions = [
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 0.2, -0.3),
        ];
        for d in directions.iter() {
            let ray = Ray::new(Vec3::new(2.0, 2.0, 2.0) * 0.5 + *d * -3.0, *d);
            assert!(!surface.intersect(&ray).hit);
        }

        let inside = Ray::new(Vec3::zero(), Vec3::new(0.0, 1.0, 0.0));
        assert!(!surface.intersect(&inside).hit);
    }

    #[test]
    fn ray_from_inside_finds_exit() {
        let ray = Ray::new(Vec3::zero(), Vec3::new(1.0, 0.0, 0.0));

        let hit = unit_sphere().intersect(&ray);

        assert!(hit.hit);
        assert!((hit.t - 1.0).abs() < 1e-3);
        assert!(unit_sphere().contains(Vec3::zero()));
        assert!(!unit_sphere().contains(Vec3::new(1.5, 0.0, 0.0)));
    }

    #[test]
    fn try_new_validates() {
        let field = |x: f64, _: f64, _: f64| x;
        let lo = Vec3::new(-1.0, -1.0, -1.0);
        let hi = Vec3::new(1.0, 1.0, 1.0);

        assert!(matches!(ImplicitSurface::try_new(field, lo, hi, 0), Err(Error::InvalidStepCount)));
        assert!(matches!(ImplicitSurface::try_new(field, hi, lo, 10), Err(Error::InvalidBounds { .. })));
        assert_eq!(10, ImplicitSurface::try_new(field, lo, hi, 10).unwrap().step_count());
    }
}

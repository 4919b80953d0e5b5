//! Paraboloid `x² + z² = y`, opening towards +y and clipped to `[y_min, y_max]`.

use crate::{
    geometry::{Geometry, CAST_EPSILON, PARALLEL_EPSILON},
    hit::{HitRecord, MaterialId},
    ray::Ray,
    vec3::Vec3,
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Paraboloid {
    y_min: f64,
    y_max: f64,
    material: Option<MaterialId>,
}

impl Paraboloid {
    pub fn new(y_min: f64, y_max: f64, material: Option<MaterialId>) -> Self {
        Self { y_min, y_max, material }
    }

    fn roots(&self, ray: &Ray<f64>) -> [Option<f64>; 2] {
        let o = ray.origin();
        let d = ray.direction();

        let a = d.x * d.x + d.z * d.z;
        let b = 2.0 * (o.x * d.x + o.z * d.z) - d.y;
        let c = o.x * o.x + o.z * o.z - o.y;

        // Rays along y make the equation linear.
        if a.abs() < PARALLEL_EPSILON {
            if b.abs() < PARALLEL_EPSILON {
                return [None, None];
            }
            return [Some(-c / b), None];
        }

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return [None, None];
        }

        let sqrt = discriminant.sqrt();
        [Some((-b - sqrt) / (2.0 * a)), Some((-b + sqrt) / (2.0 * a))]
    }
}

impl Geometry for Paraboloid {
    fn intersect(&self, ray: &Ray<f64>) -> HitRecord {
        let mut best: Option<(f64, Vec3<f64>)> = None;

        for t in self.roots(ray).iter().filter_map(|&t| t) {
            if t <= CAST_EPSILON || best.map_or(false, |(b, _)| t >= b) {
                continue;
            }

            let point = ray.point_at(t);
            if point.y >= self.y_min && point.y <= self.y_max {
                best = Some((t, point));
            }
        }

        match best {
            Some((t, p)) => {
                let normal = Vec3::new(2.0 * p.x, -1.0, 2.0 * p.z).unit();
                HitRecord::new(t, p, normal).with_material(self.material)
            }
            None => HitRecord::miss(),
        }
    }
}

/// A [`Paraboloid`] whose normal always faces the incoming ray.
///
/// The flip makes the inside of the bowl visible to shading, at the cost of
/// losing the surface's true orientation: normals from this primitive say
/// nothing about which side is "outside".
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DoubleSidedParaboloid(Paraboloid);

impl DoubleSidedParaboloid {
    pub fn new(y_min: f64, y_max: f64, material: Option<MaterialId>) -> Self {
        DoubleSidedParaboloid(Paraboloid::new(y_min, y_max, material))
    }
}

impl Geometry for DoubleSidedParaboloid {
    fn intersect(&self, ray: &Ray<f64>) -> HitRecord {
        let mut hit = self.0.intersect(ray);

        if hit.hit && ray.direction().dot(&hit.normal) > 0.0 {
            hit.normal = -hit.normal;
        }

        hit
    }
}

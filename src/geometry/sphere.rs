use crate::{
    geometry::{Geometry, CAST_EPSILON},
    hit::HitRecord,
    ray::Ray,
    vec3::Vec3,
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ball {
    center: Vec3<f64>,
    radius: f64,
}

impl Ball {
    pub fn new(center: Vec3<f64>, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl Geometry for Ball {
    fn intersect(&self, ray: &Ray<f64>) -> HitRecord {
        let oc = ray.origin() - self.center;

        let a = ray.direction().dot(ray.direction());
        let b = 2.0 * oc.dot(ray.direction());
        let c = oc.dot(&oc) - self.radius.powi(2);

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return HitRecord::miss();
        }

        let sqrt = discriminant.sqrt();
        let denominator = 2.0 * a;

        let near = (-b - sqrt) / denominator;
        let far = (-b + sqrt) / denominator;

        // The near root is behind the origin when the ray starts inside.
        let t = if near > CAST_EPSILON {
            near
        } else if far > CAST_EPSILON {
            far
        } else {
            return HitRecord::miss();
        };

        let point = ray.point_at(t);
        let normal = (point - self.center).unit();

        HitRecord::new(t, point, normal)
    }
}

//! Ready-made implicit surfaces, each tuned to its own step count.

use crate::{geometry::ImplicitSurface, vec3::Vec3};

pub type FieldFn = fn(f64, f64, f64) -> f64;

pub const HEART_STEPS: usize = 60;
pub const MITCHELL_STEPS: usize = 200;
pub const SUNFLOWER_STEPS: usize = 200;

/// Taubin's heart, centered at the origin.
pub fn heart_field(x: f64, y: f64, z: f64) -> f64 {
    let base = x * x + 2.25 * z * z + y * y - 1.0;
    base.powi(3) - x * x * y.powi(3) - 0.1125 * z * z * y.powi(3)
}

/// Mitchell's quartic, shifted 2.5 units towards -x.
pub fn mitchell_field(x: f64, y: f64, z: f64) -> f64 {
    let x = x + 2.5;
    let r2 = y * y + z * z;
    4.0 * (x.powi(4) + r2 * r2) + 17.0 * x * x * r2 - 20.0 * (x * x + r2) + 17.0
}

/// Flat seven-fold flower head with a rippled center disk.
pub fn sunflower_field(x: f64, y: f64, z: f64) -> f64 {
    let r = (x * x + z * z).sqrt();
    let theta = z.atan2(x);

    let disk = x * x + (2.5 * (y - 0.1)).powi(2) + z * z - 0.9f64.powi(2) + 0.04 * (40.0 * x).sin() * (40.0 * z).sin();

    let petal_radius = 0.8 + 1.4 * (7.0 * theta).cos().abs();
    let petals = r * r + (12.0 * y).powi(2) - petal_radius.powi(2);

    disk.min(petals)
}

pub fn heart() -> ImplicitSurface<FieldFn> {
    ImplicitSurface::new(heart_field as FieldFn, Vec3::new(-1.5, -1.5, -1.5), Vec3::new(1.5, 1.5, 1.5), HEART_STEPS)
}

pub fn mitchell() -> ImplicitSurface<FieldFn> {
    ImplicitSurface::new(mitchell_field as FieldFn, Vec3::new(-4.5, -2.0, -2.0), Vec3::new(-0.5, 2.0, 2.0), MITCHELL_STEPS)
}

pub fn sunflower() -> ImplicitSurface<FieldFn> {
    ImplicitSurface::new(sunflower_field as FieldFn, Vec3::new(-2.5, -0.5, -2.5), Vec3::new(2.5, 0.5, 2.5), SUNFLOWER_STEPS)
}

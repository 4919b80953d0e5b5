//! Ray-primitive intersection.
//!
//! Every primitive implements [`Geometry`], whose single operation takes a
//! world-space [`Ray`] and returns a [`HitRecord`]. Closed-form solvers cover
//! balls, boxes, capped cylinders, paraboloids and planes; surfaces given only
//! by a scalar field go through [`ImplicitSurface`], which ray-marches and
//! bisects. Any of them can be placed in the world with a [`Transform`].
//!
//! Choosing the nearest hit among many primitives and shading it is left to
//! the caller.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod batch;
pub mod config;
mod error;
pub mod geometry;
mod hit;
pub mod matrix;
mod ray;
pub mod transform;
mod vec3;
mod vec4;

pub use crate::config::PrimitiveConfig;
pub use crate::error::{Error, Result};
pub use crate::geometry::{
    Ball, Cuboid, Cylinder, DoubleSidedParaboloid, Field, Geometry, ImplicitSurface, Paraboloid, Plane, PlaneUV,
    CAST_EPSILON,
};
pub use crate::hit::{HitRecord, MaterialId};
pub use crate::matrix::{Matrix3x3, Matrix4x4};
pub use crate::ray::Ray;
pub use crate::transform::Transform;
pub use crate::vec3::Vec3;
pub use crate::vec4::Vec4;

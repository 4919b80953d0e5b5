//! Construction-time configuration for primitives, loaded from JSON.
//!
//! ```json
//! {
//!     "type": "transform",
//!     "matrix": [[2, 0, 0, 0], [0, 1, 0, 1], [0, 0, 1, 0], [0, 0, 0, 1]],
//!     "material": 3,
//!     "inner": { "type": "ball", "center": { "x": 0, "y": 0, "z": 0 }, "radius": 1.5 }
//! }
//! ```

use std::{fs::File, io::{BufReader, Read}, path::Path, str::FromStr};

use crate::{
    error::{Error, Result},
    geometry::{surfaces, Ball, Cuboid, Cylinder, DoubleSidedParaboloid, Geometry, Paraboloid, Plane, PlaneUV},
    hit::MaterialId,
    matrix::{Matrix3x3, Matrix4x4},
    transform::Transform,
    vec3::Vec3,
};

/// Box half extent: one value for a cube, or one per axis.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Extent {
    Uniform(f64),
    PerAxis(Vec3<f64>),
}

impl Extent {
    fn to_vec(self) -> Vec3<f64> {
        match self {
            Extent::Uniform(h) => Vec3::new(h, h, h),
            Extent::PerAxis(v) => v,
        }
    }
}

/// Row-major matrix; a 3x3 matrix is embedded with zero translation.
#[derive(Copy, Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MatrixConfig {
    Affine([[f64; 4]; 4]),
    Linear([[f64; 3]; 3]),
}

impl MatrixConfig {
    pub fn to_matrix(&self) -> Matrix4x4<f64> {
        match *self {
            MatrixConfig::Affine(m) => Matrix4x4::new(m),
            MatrixConfig::Linear(m) => Matrix4x4::from_linear(&Matrix3x3::new(m)),
        }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    Heart,
    Mitchell,
    Sunflower,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrimitiveConfig {
    Ball {
        center: Vec3<f64>,
        radius: f64,
    },
    #[serde(alias = "box", alias = "cube")]
    Cuboid {
        center: Vec3<f64>,
        half_extent: Extent,
    },
    Cylinder {
        center: Vec3<f64>,
        axis: Vec3<f64>,
        radius: f64,
        height: f64,
    },
    Paraboloid {
        y_min: f64,
        y_max: f64,
        #[serde(default)]
        material: Option<MaterialId>,
    },
    DoubleSidedParaboloid {
        y_min: f64,
        y_max: f64,
        #[serde(default)]
        material: Option<MaterialId>,
    },
    Plane {
        point: Vec3<f64>,
        normal: Vec3<f64>,
    },
    #[serde(rename = "plane_uv")]
    PlaneUV {
        point: Vec3<f64>,
        normal: Vec3<f64>,
        forward: Vec3<f64>,
    },
    Implicit {
        surface: SurfaceKind,
        #[serde(default)]
        step_count: Option<usize>,
        #[serde(default)]
        material: Option<MaterialId>,
    },
    Transform {
        inner: Box<PrimitiveConfig>,
        matrix: MatrixConfig,
        #[serde(default)]
        material: Option<MaterialId>,
        /// Reject singular matrices instead of falling back to identity.
        #[serde(default)]
        strict: bool,
    },
}

impl PrimitiveConfig {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn load<P: AsRef<Path>>(path: &P) -> Result<Self> {
        let file = File::open(path)?;
        PrimitiveConfig::from_reader(BufReader::new(file))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PrimitiveConfig::Ball { .. } => "ball",
            PrimitiveConfig::Cuboid { .. } => "cuboid",
            PrimitiveConfig::Cylinder { .. } => "cylinder",
            PrimitiveConfig::Paraboloid { .. } => "paraboloid",
            PrimitiveConfig::DoubleSidedParaboloid { .. } => "double_sided_paraboloid",
            PrimitiveConfig::Plane { .. } => "plane",
            PrimitiveConfig::PlaneUV { .. } => "plane_uv",
            PrimitiveConfig::Implicit { .. } => "implicit",
            PrimitiveConfig::Transform { .. } => "transform",
        }
    }

    /// Validates the parameters and builds the primitive.
    pub fn build(&self) -> Result<Box<dyn Geometry>> {
        debug!("building {} primitive", self.kind());

        let geometry: Box<dyn Geometry> = match self {
            PrimitiveConfig::Ball { center, radius } => Box::new(Ball::new(*center, positive("radius", *radius)?)),
            PrimitiveConfig::Cuboid { center, half_extent } => {
                let half_extent = half_extent.to_vec();
                positive("half extent x", half_extent.x)?;
                positive("half extent y", half_extent.y)?;
                positive("half extent z", half_extent.z)?;
                Box::new(Cuboid::new(*center, half_extent))
            }
            PrimitiveConfig::Cylinder { center, axis, radius, height } => Box::new(Cylinder::new(
                *center,
                non_zero("cylinder axis", *axis)?,
                positive("radius", *radius)?,
                positive("height", *height)?,
            )),
            PrimitiveConfig::Paraboloid { y_min, y_max, material } => {
                ordered(*y_min, *y_max)?;
                Box::new(Paraboloid::new(*y_min, *y_max, *material))
            }
            PrimitiveConfig::DoubleSidedParaboloid { y_min, y_max, material } => {
                ordered(*y_min, *y_max)?;
                Box::new(DoubleSidedParaboloid::new(*y_min, *y_max, *material))
            }
            PrimitiveConfig::Plane { point, normal } => Box::new(Plane::new(*point, non_zero("plane normal", *normal)?)),
            PrimitiveConfig::PlaneUV { point, normal, forward } => {
                let normal = non_zero("plane normal", *normal)?;
                let forward = non_zero("forward direction", *forward)?;
                // The projected forward direction vanishes when it is parallel to the normal.
                let n = normal.unit();
                non_zero("forward direction", forward - n.scale(forward.dot(&n)))?;
                Box::new(PlaneUV::new(*point, normal, forward))
            }
            PrimitiveConfig::Implicit { surface, step_count, material } => {
                let mut implicit = match surface {
                    SurfaceKind::Heart => surfaces::heart(),
                    SurfaceKind::Mitchell => surfaces::mitchell(),
                    SurfaceKind::Sunflower => surfaces::sunflower(),
                };
                if let Some(steps) = *step_count {
                    if steps == 0 {
                        return Err(Error::InvalidStepCount);
                    }
                    implicit = implicit.with_step_count(steps);
                }
                Box::new(implicit.with_material(*material))
            }
            PrimitiveConfig::Transform { inner, matrix, material, strict } => {
                let inner = inner.build()?;
                let matrix = matrix.to_matrix();
                let transform = if *strict {
                    Transform::try_from_boxed(inner, matrix)?
                } else {
                    Transform::from_boxed(inner, matrix)
                };
                Box::new(transform.with_material(*material))
            }
        };

        Ok(geometry)
    }
}

impl FromStr for PrimitiveConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

fn positive(what: &'static str, value: f64) -> Result<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(Error::NonPositive { what, value })
    }
}

fn non_zero(what: &'static str, v: Vec3<f64>) -> Result<Vec3<f64>> {
    v.try_unit().map(|_| v).ok_or(Error::ZeroVector(what))
}

fn ordered(min: f64, max: f64) -> Result<()> {
    if min <= max {
        Ok(())
    } else {
        Err(Error::InvalidRange { min, max })
    }
}

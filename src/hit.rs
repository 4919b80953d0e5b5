use crate::vec3::Vec3;

/// Opaque handle to a material owned by the shading layer.
#[derive(Copy, Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MaterialId(pub u32);

/// Result of testing a ray against a primitive.
///
/// When `hit` is false the remaining fields carry no meaning and must not be
/// read; `t` is then infinite and `point`/`normal` are zero.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitRecord {
    pub hit: bool,
    pub t: f64,
    pub point: Vec3<f64>,
    pub normal: Vec3<f64>,
    pub material: Option<MaterialId>,
    pub uv: Option<(f64, f64)>,
}

impl HitRecord {
    pub fn new(t: f64, point: Vec3<f64>, normal: Vec3<f64>) -> Self {
        Self {
            hit: true,
            t,
            point,
            normal,
            material: None,
            uv: None,
        }
    }

    #[inline]
    pub fn miss() -> Self {
        Self {
            hit: false,
            t: f64::INFINITY,
            point: Vec3::zero(),
            normal: Vec3::zero(),
            material: None,
            uv: None,
        }
    }

    pub fn with_material(mut self, material: Option<MaterialId>) -> Self {
        self.material = material;
        self
    }

    pub fn with_uv(mut self, u: f64, v: f64) -> Self {
        self.uv = Some((u, v));
        self
    }
}

impl Default for HitRecord {
    fn default() -> Self {
        HitRecord::miss()
    }
}

//! Material trait for surface scattering.

use crate::hittable::HitRecord;
use crate::sampling::{gen_f32, random_in_unit_sphere, random_unit_vector};
use crate::texture::{SolidColor, Texture};
use oray_math::{Ray, Vec3, Vec3Ext};
use rand::RngCore;
use std::sync::Arc;

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// A ray leaving a surface and the color filter applied to what it sees.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    pub scattered: Ray,
    pub attenuation: Color,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed. All randomness comes from `rng`.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore)
        -> Option<ScatterResult>;
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
    tint: Option<Color>,
}

impl Lambertian {
    /// Diffuse surface colored by `albedo`.
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo, tint: None }
    }

    /// Diffuse surface of a single color.
    pub fn from_color(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }

    /// Multiply the texture by a constant color.
    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = Some(tint);
        self
    }

    pub fn albedo(&self) -> &Arc<dyn Texture> {
        &self.albedo
    }

    pub fn set_albedo(&mut self, albedo: Arc<dyn Texture>) {
        self.albedo = albedo;
    }

    pub fn tint(&self) -> Option<Color> {
        self.tint
    }

    pub fn set_tint(&mut self, tint: Option<Color>) {
        self.tint = tint;
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.near_zero() {
            scatter_direction = rec.normal;
        }

        let mut attenuation = self.albedo.value(rec.u, rec.v, rec.p);
        if let Some(tint) = self.tint {
            attenuation *= tint;
        }

        Some(ScatterResult {
            scattered: Ray::new(rec.p, scatter_direction),
            attenuation,
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }

    pub fn set_fuzz(&mut self, fuzz: f32) {
        self.fuzz = fuzz.clamp(0.0, 1.0);
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = ray_in.direction().normalize().reflect(rec.normal);
        let direction = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz pushed the ray below the surface
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterResult {
            scattered: Ray::new(rec.p, direction),
            attenuation: self.albedo,
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    pub fn ior(&self) -> f32 {
        self.ior
    }

    pub fn set_ior(&mut self, ior: f32) {
        self.ior = ior;
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ratio: f32) -> f32 {
        let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
                unit_direction.reflect(rec.normal)
            } else {
                unit_direction.refract(rec.normal, refraction_ratio)
            };

        Some(ScatterResult {
            scattered: Ray::new(rec.p, direction),
            attenuation: Color::ONE,
        })
    }
}

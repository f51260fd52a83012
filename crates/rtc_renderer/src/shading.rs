//! Microfacet shading for one path vertex.
//!
//! Specular reflection uses isotropic GGX with visible-normal sampling
//! (Heitz 2017, "A Simpler and Exact Sampling Routine for the GGX
//! Distribution of Visible Normals"); diffuse uses cosine-weighted
//! hemisphere sampling. Both evaluators return a weight that is already
//! divided by the sampling PDF.

use rtc_core::{Color, Material};
use rtc_math::{pow5, Ray, Vec2, Vec3};
use std::f32::consts::PI;

/// Smallest GGX alpha; keeps the Smith terms away from 0/0.
const MIN_ALPHA: f32 = 1.0e-3;

/// Result of sampling one lobe at a hit.
///
/// `ray` continues the path, or is terminated when the sample carried no
/// energy; `weight` is then zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounce {
    pub weight: Color,
    pub ray: Ray,
}

impl Bounce {
    fn terminate(ray: &Ray) -> Self {
        Self {
            weight: Color::ZERO,
            ray: ray.terminated(),
        }
    }
}

/// Reflectance at normal incidence: `0.08 * specular` for dielectrics,
/// blended towards albedo by `metallic`.
pub fn fresnel_f0(material: &Material) -> Color {
    Color::splat(0.08 * material.specular).lerp(material.albedo, material.metallic)
}

/// Schlick Fresnel with a roughness-dependent grazing reflectance
/// `max(f0, 1 - roughness)`.
pub fn fresnel(f0: Color, cos_theta: f32, roughness: f32) -> Color {
    let f90 = f0.max(Color::splat(1.0 - roughness));
    f0 + (f90 - f0) * pow5(1.0 - cos_theta.clamp(0.0, 1.0))
}

/// Smith masking term `G1` for GGX.
pub fn smith_masking(n_dot_v: f32, alpha: f32) -> f32 {
    let a2 = alpha * alpha;
    let denom = n_dot_v + (a2 + (1.0 - a2) * n_dot_v * n_dot_v).sqrt();
    2.0 * n_dot_v / denom
}

/// Height-correlated Smith masking-shadowing term `G2` for GGX.
pub fn smith_shadowing(n_dot_v: f32, n_dot_l: f32, alpha: f32) -> f32 {
    let a2 = alpha * alpha;
    let i = n_dot_v * (a2 + (1.0 - a2) * n_dot_l * n_dot_l).sqrt();
    let o = n_dot_l * (a2 + (1.0 - a2) * n_dot_v * n_dot_v).sqrt();
    2.0 * n_dot_v * n_dot_l / (i + o)
}

/// `G2 / G1(V)`: the whole BRDF·cos/PDF factor of a VNDF sample apart from
/// Fresnel. The distribution term cancels against the sampling PDF.
pub fn smith_joint(n_dot_v: f32, n_dot_l: f32, alpha: f32) -> f32 {
    smith_shadowing(n_dot_v, n_dot_l, alpha) / smith_masking(n_dot_v, alpha)
}

/// A unit vector perpendicular to `n`, built against the axis `n` is least
/// aligned with.
pub fn perpendicular_vector(n: Vec3) -> Vec3 {
    let a = n.abs();
    let axis = if a.x <= a.y && a.x <= a.z {
        Vec3::X
    } else if a.y <= a.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    n.cross(axis).normalize()
}

/// Right-handed orthonormal frame `[tangent, bitangent, n]` around `n`.
pub fn tangent_frame(n: Vec3) -> [Vec3; 3] {
    let tangent = perpendicular_vector(n);
    [tangent, n.cross(tangent), n]
}

#[inline]
fn to_world(frame: &[Vec3; 3], v: Vec3) -> Vec3 {
    frame[0] * v.x + frame[1] * v.y + frame[2] * v.z
}

#[inline]
fn to_local(frame: &[Vec3; 3], v: Vec3) -> Vec3 {
    Vec3::new(v.dot(frame[0]), v.dot(frame[1]), v.dot(frame[2]))
}

/// Cosine-weighted direction around `n`; returns the direction and its PDF
/// `NoL / pi`.
pub fn sample_cos_hemisphere(xi: Vec2, n: Vec3) -> (Vec3, f32) {
    let phi = 2.0 * PI * xi.x;
    let sin_theta = xi.y.sqrt();
    let cos_theta = (1.0 - xi.y).sqrt();

    let local = Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);
    let l = to_world(&tangent_frame(n), local).normalize();

    let pdf = n.dot(l).max(0.0) / PI;
    (l, pdf)
}

/// Sample a GGX microfacet normal visible from `v`.
///
/// Works in tangent space (normal along +Z); `v` must lie in the upper
/// hemisphere. The view is stretched into the alpha = 1 configuration, a
/// point is picked on the projected disk (two half-disks weighted by their
/// projected area), lifted onto the hemisphere and unstretched.
pub fn sample_ggx_vndf(xi: Vec2, v: Vec3, alpha: f32) -> Vec3 {
    let vh = Vec3::new(alpha * v.x, alpha * v.y, v.z).normalize();

    let t1 = if vh.z < 0.9999 {
        vh.cross(Vec3::Z).normalize()
    } else {
        Vec3::X
    };
    let t2 = t1.cross(vh);

    let a = 1.0 / (1.0 + vh.z);
    let r = xi.x.sqrt();
    let phi = if xi.y < a {
        xi.y / a * PI
    } else {
        PI + (xi.y - a) / (1.0 - a) * PI
    };

    let p1 = r * phi.cos();
    let p2 = r * phi.sin() * if xi.y < a { 1.0 } else { vh.z };

    let nh = t1 * p1 + t2 * p2 + vh * (1.0 - p1 * p1 - p2 * p2).max(0.0).sqrt();

    Vec3::new(alpha * nh.x, alpha * nh.y, nh.z.max(0.0)).normalize()
}

/// Sample the specular lobe at `position`.
///
/// `normal` is the shading normal and `geometric_normal` the surface normal
/// used to offset the continuation ray; both must face the incoming ray.
pub fn evaluate_specular(
    xi: Vec2,
    material: &Material,
    ray: &Ray,
    position: Vec3,
    normal: Vec3,
    geometric_normal: Vec3,
) -> Bounce {
    let roughness = material.roughness;
    let alpha = (roughness * roughness).max(MIN_ALPHA);

    let r = ray.direction;
    let v = -r;

    let n_dot_v = normal.dot(v);
    if n_dot_v <= 0.0 {
        return Bounce::terminate(ray);
    }

    let frame = tangent_frame(normal);
    let h = to_world(&frame, sample_ggx_vndf(xi, to_local(&frame, v), alpha));
    let l = r - 2.0 * r.dot(h) * h;

    let n_dot_l = normal.dot(l);
    if n_dot_l <= 0.0 {
        return Bounce::terminate(ray);
    }

    let l_dot_h = l.dot(h).clamp(0.0, 1.0);

    let f = fresnel(fresnel_f0(material), l_dot_h, roughness);
    let g = smith_joint(n_dot_v, n_dot_l, alpha);

    Bounce {
        weight: f * g,
        ray: Ray::redirect(position, geometric_normal, l),
    }
}

/// Sample the diffuse lobe at `position`.
///
/// The weight is `albedo * (1 - F) / pi * (1 - metallic) * (1 - translucency)
/// * NoL / pdf`.
pub fn evaluate_diffuse(
    xi: Vec2,
    material: &Material,
    ray: &Ray,
    position: Vec3,
    normal: Vec3,
    geometric_normal: Vec3,
) -> Bounce {
    let (l, pdf) = sample_cos_hemisphere(xi, normal);
    let n_dot_l = normal.dot(l);

    if n_dot_l <= 0.0 || pdf <= 0.0 {
        return Bounce::terminate(ray);
    }

    let v_dot_n = (-ray.direction).dot(normal).clamp(0.0, 1.0);
    let f = fresnel(fresnel_f0(material), v_dot_n, material.roughness);

    let diffuse = material.albedo * (Color::ONE - f);
    let multiplier = 1.0 / PI
        * (1.0 - material.metallic)
        * (1.0 - material.translucency)
        * n_dot_l
        / pdf;

    Bounce {
        weight: diffuse * multiplier,
        ray: Ray::redirect(position, geometric_normal, l),
    }
}

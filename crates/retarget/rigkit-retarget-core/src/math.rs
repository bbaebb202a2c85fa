//! Frame math kernel: pure vector/frame helpers shared by the estimators.
//!
//! No shared state. Anything that can hit a near-zero magnitude returns
//! `TrackError::DegenerateVector` instead of producing NaN.

use nalgebra::{Matrix3, Matrix4, Rotation3, UnitQuaternion, Vector3};

use crate::error::TrackError;

pub type Vec3 = Vector3<f64>;
pub type Quat = UnitQuaternion<f64>;

/// Magnitudes at or below this are treated as degenerate.
pub const EPSILON: f64 = 1e-9;

#[inline]
pub fn vector_length(v: Vec3) -> f64 {
    v.norm()
}

pub fn normalize(v: Vec3) -> Result<Vec3, TrackError> {
    let length = v.norm();
    if length <= EPSILON {
        return Err(TrackError::DegenerateVector { length });
    }
    Ok(v / length)
}

/// Angle between two vectors in [0, π]. The dot product is clamped before
/// `acos` to absorb floating-point overshoot on near-parallel inputs.
pub fn angle_between(a: Vec3, b: Vec3) -> Result<f64, TrackError> {
    let a = normalize(a)?;
    let b = normalize(b)?;
    Ok(a.dot(&b).clamp(-1.0, 1.0).acos())
}

#[inline]
pub fn center_point(a: Vec3, b: Vec3) -> Vec3 {
    (a + b) * 0.5
}

/// Orthogonal projection of `p` onto the line through `a` and `b`.
pub fn project_point_on_line(p: Vec3, a: Vec3, b: Vec3) -> Result<Vec3, TrackError> {
    let ab = b - a;
    let denom = ab.norm_squared();
    if denom <= EPSILON * EPSILON {
        return Err(TrackError::DegenerateVector {
            length: denom.sqrt(),
        });
    }
    Ok(a + ab * ((p - a).dot(&ab) / denom))
}

/// Unit normal of the triangle spanned by three points.
pub fn plane_normal(plane: &[Vec3; 3]) -> Result<Vec3, TrackError> {
    normalize((plane[1] - plane[0]).cross(&(plane[2] - plane[0])))
}

/// Remove from `v` its component parallel to the triangle's normal.
pub fn project_vector_on_plane(plane: &[Vec3; 3], v: Vec3) -> Result<Vec3, TrackError> {
    let normal = plane_normal(plane)?;
    Ok(v - normal * v.dot(&normal))
}

/// Project a point onto the plane of the triangle.
pub fn project_point_on_plane(plane: &[Vec3; 3], p: Vec3) -> Result<Vec3, TrackError> {
    let normal = plane_normal(plane)?;
    Ok(p - normal * (p - plane[0]).dot(&normal))
}

/// Signed distance of `p` from the triangle's plane. The sign follows the
/// triangle's winding order.
pub fn signed_plane_distance(plane: &[Vec3; 3], p: Vec3) -> Result<f64, TrackError> {
    let normal = plane_normal(plane)?;
    Ok((p - plane[0]).dot(&normal))
}

/// Rotation matrix whose rows are the given basis vectors.
///
/// Invariant: the basis lands in the rows rather than the columns, so
/// `decompose` on this matrix yields the INVERSE of the rotation that maps
/// the identity basis onto (tangent, normal, binormal). Callers rely on this
/// sign convention.
#[rustfmt::skip]
pub fn orthonormal_frame(tangent: Vec3, normal: Vec3, binormal: Vec3) -> Matrix4<f64> {
    Matrix4::new(
        tangent.x,  tangent.y,  tangent.z,  0.0,
        normal.x,   normal.y,   normal.z,   0.0,
        binormal.x, binormal.y, binormal.z, 0.0,
        0.0,        0.0,        0.0,        1.0,
    )
}

/// Split a transform matrix into (location, rotation, scale).
///
/// Scale is measured per column; columns are renormalized before the
/// rotation is extracted, so non-unit frames still decompose cleanly.
pub fn decompose(m: &Matrix4<f64>) -> (Vec3, Quat, Vec3) {
    let location = Vec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);

    let mut columns = [
        Vec3::new(m[(0, 0)], m[(1, 0)], m[(2, 0)]),
        Vec3::new(m[(0, 1)], m[(1, 1)], m[(2, 1)]),
        Vec3::new(m[(0, 2)], m[(1, 2)], m[(2, 2)]),
    ];
    let mut scale = Vec3::zeros();
    for (i, column) in columns.iter_mut().enumerate() {
        let len = column.norm();
        scale[i] = len;
        if len > EPSILON {
            *column /= len;
        }
    }

    let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(
        Matrix3::from_columns(&columns),
    ));
    (location, rotation, scale)
}

/// Points of a circle of `radius` around `axis`, centered at `center`.
///
/// `in_plane` fixes the circle's zero direction: its rejection from `axis`
/// becomes the starting basis vector, which keeps the generated circle's
/// orientation stable frame to frame. When the hint is (near) parallel to the
/// axis, a world axis is substituted deterministically.
pub fn circle_around_vector(
    axis: Vec3,
    center: Vec3,
    radius: f64,
    count: usize,
    in_plane: Vec3,
) -> Result<Vec<Vec3>, TrackError> {
    let axis = normalize(axis)?;

    let mut rejected = in_plane - axis * in_plane.dot(&axis);
    if rejected.norm() <= EPSILON {
        let world = if axis.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
        rejected = world - axis * world.dot(&axis);
    }
    let u = normalize(rejected)?;
    let w = axis.cross(&u);

    Ok((0..count)
        .map(|i| {
            let theta = std::f64::consts::TAU * (i as f64) / (count as f64);
            center + (u * theta.cos() + w * theta.sin()) * radius
        })
        .collect())
}

/// Index of the point nearest to `target` by squared distance.
pub fn closest_point_index(target: Vec3, points: &[Vec3]) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            let da = (target - **a).norm_squared();
            let db = (target - **b).norm_squared();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
}

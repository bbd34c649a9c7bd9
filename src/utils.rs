// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! contains useful type definitions and conversion functions.
use nalgebra::{Quaternion, Rotation3, SVector, UnitQuaternion};

/// A Vector with 6 entries, one per task-space degree of freedom
pub type Vector6 = SVector<f64, 6>;

/// converts a quaternion given as `[w, x, y, z]` to a rotation matrix.
///
/// The quaternion is normalized first, so any non-zero quaternion is accepted.
/// Returns `None` if the quaternion has (close to) zero norm or non-finite entries.
pub fn quaternion_to_rotation(wxyz: &[f64; 4]) -> Option<Rotation3<f64>> {
    if wxyz.iter().any(|x| !x.is_finite()) {
        return None;
    }
    let quaternion = Quaternion::new(wxyz[0], wxyz[1], wxyz[2], wxyz[3]);
    UnitQuaternion::try_new(quaternion, f64::EPSILON).map(|unit| unit.to_rotation_matrix())
}


#[cfg(test)]
mod test {
    use super::test_utils::float_compare;
    use crate::utils::quaternion_to_rotation;

    #[test]
    fn quaternion_is_normalized() {
        let rotation = quaternion_to_rotation(&[0., 1., 0., 1.]).unwrap();
        let matrix = rotation.matrix();
        // 180 deg about (1,0,1)/sqrt(2): maps x onto z and z onto x, flips y
        float_compare(matrix[(0, 0)], 0., 1e-12);
        float_compare(matrix[(2, 0)], 1., 1e-12);
        float_compare(matrix[(1, 1)], -1., 1e-12);
        float_compare(matrix[(0, 2)], 1., 1e-12);
        float_compare(matrix.determinant(), 1., 1e-12);

        let scaled = quaternion_to_rotation(&[0., 3., 0., 3.]).unwrap();
        assert!((scaled.matrix() - matrix).norm() < 1e-12);
    }

    #[test]
    fn degenerate_quaternion() {
        assert!(quaternion_to_rotation(&[0.; 4]).is_none());
        assert!(quaternion_to_rotation(&[f64::NAN, 1., 0., 0.]).is_none());
    }
}

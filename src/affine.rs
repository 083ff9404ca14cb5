use nalgebra::{Matrix4, Vector3, Vector4};

/// 4x4 transform from voxel indices `(i, j, k, 1)` to physical
/// coordinates `(x, y, z, 1)` in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine(pub Matrix4<f64>);

impl Default for Affine {
    fn default() -> Self {
        Self(Matrix4::identity())
    }
}

impl Affine {
    /// Build from the three axis columns and the translation.
    pub fn from_columns(
        x_axis: Vector3<f64>,
        y_axis: Vector3<f64>,
        z_axis: Vector3<f64>,
        origin: Vector3<f64>,
    ) -> Self {
        Self(Matrix4::from_columns(&[
            x_axis.push(0.0),
            y_axis.push(0.0),
            z_axis.push(0.0),
            origin.push(1.0),
        ]))
    }

    /// Build from the top three rows, as stored in a NIfTI sform.
    pub fn from_rows(rows: [[f64; 4]; 3]) -> Self {
        let mut matrix = Matrix4::identity();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                matrix[(r, c)] = *value;
            }
        }
        Self(matrix)
    }

    /// Top three rows.
    pub fn rows(&self) -> [[f64; 4]; 3] {
        let m = &self.0;
        [0, 1, 2].map(|r| [m[(r, 0)], m[(r, 1)], m[(r, 2)], m[(r, 3)]])
    }

    /// Column `axis` (0 = X, 1 = Y, 2 = Z) of the rotation/scale block.
    pub fn axis(&self, axis: usize) -> Vector3<f64> {
        self.0.fixed_view::<3, 1>(0, axis).into_owned()
    }

    pub fn origin(&self) -> Vector3<f64> {
        self.0.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Voxel size along each array axis (column norms).
    pub fn spacing(&self) -> [f64; 3] {
        [0, 1, 2].map(|axis| self.axis(axis).norm())
    }

    /// Map voxel indices to physical coordinates.
    pub fn apply(&self, index: [f64; 3]) -> Vector3<f64> {
        let point = self.0 * Vector4::new(index[0], index[1], index[2], 1.0);
        point.xyz()
    }

    /// Element-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Affine, tolerance: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_and_columns_agree() {
        let affine = Affine::from_columns(
            Vector3::new(-0.5, 0.0, 0.0),
            Vector3::new(0.0, -0.75, 0.0),
            Vector3::new(0.0, 0.0, 5.0),
            Vector3::new(10.0, 20.0, 30.0),
        );

        let rows = affine.rows();
        assert_eq!(rows[0], [-0.5, 0.0, 0.0, 10.0]);
        assert_eq!(rows[1], [0.0, -0.75, 0.0, 20.0]);
        assert_eq!(rows[2], [0.0, 0.0, 5.0, 30.0]);
        assert_eq!(Affine::from_rows(rows), affine);
        assert_eq!(affine.spacing(), [0.5, 0.75, 5.0]);
    }

    #[test]
    fn apply_maps_indices_to_world() {
        let affine = Affine::from_columns(
            Vector3::new(-0.5, 0.0, 0.0),
            Vector3::new(0.0, -0.75, 0.0),
            Vector3::new(0.0, 0.0, 5.0),
            Vector3::new(10.0, 20.0, 30.0),
        );
        assert_eq!(affine.apply([0.0, 0.0, 0.0]), affine.origin());
        assert_eq!(affine.apply([2.0, 4.0, 1.0]), Vector3::new(9.0, 17.0, 35.0));
    }
}

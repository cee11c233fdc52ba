//! MNA matrix assembly and solving.

use tracing::trace;

use super::scalar::Scalar;
use crate::circuit::Netlist;
use crate::components::SourceValue;

/// Column whose pivot vanished during LU factorization.
///
/// The column index is the MNA unknown that could not be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingularPivot(pub usize);

/// MNA matrix system Ax = z over the scalar field `T`.
#[derive(Debug, Clone)]
pub struct MnaMatrix<T: Scalar> {
    /// System matrix A (row-major)
    pub a: Vec<T>,
    /// Source vector z
    pub z: Vec<T>,
    /// Solution vector x
    pub x: Vec<T>,
    /// Matrix dimension
    pub size: usize,
    /// LU decomposition of A (unit lower triangle below the diagonal)
    pub lu: Vec<T>,
    /// Pivot indices for LU decomposition
    pub pivots: Vec<usize>,
}

impl<T: Scalar> MnaMatrix<T> {
    /// Create a zeroed MNA system of the given dimension.
    pub fn new(size: usize) -> Self {
        Self {
            a: vec![T::zero(); size * size],
            z: vec![T::zero(); size],
            x: vec![T::zero(); size],
            size,
            lu: vec![T::zero(); size * size],
            pivots: (0..size).collect(),
        }
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> T {
        self.a[row * self.size + col]
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: T) {
        self.a[row * self.size + col] += value;
    }

    /// Stamp a conductance between two nodes.
    /// For a conductance G between nodes n1 and n2:
    ///   A[n1,n1] += G
    ///   A[n2,n2] += G
    ///   A[n1,n2] -= G
    ///   A[n2,n1] -= G
    ///
    /// A ground endpoint (`None`) only leaves the diagonal term of the other.
    pub fn stamp_conductance(&mut self, n1: Option<usize>, n2: Option<usize>, g: T) {
        if let Some(i) = n1 {
            self.add(i, i, g);
        }
        if let Some(j) = n2 {
            self.add(j, j, g);
        }
        if let (Some(i), Some(j)) = (n1, n2) {
            self.add(i, j, -g);
            self.add(j, i, -g);
        }
    }

    /// Stamp a voltage source between two nodes with branch current at index br.
    /// V[n+] - V[n-] = E
    pub fn stamp_voltage_source(&mut self, n_pos: Option<usize>, n_neg: Option<usize>, br: usize, voltage: T) {
        // B and C = B^T; D stays zero
        if let Some(i) = n_pos {
            self.add(br, i, T::one());
            self.add(i, br, T::one());
        }
        if let Some(j) = n_neg {
            self.add(br, j, -T::one());
            self.add(j, br, -T::one());
        }
        self.z[br] = voltage;
    }

    /// Perform LU decomposition with scaled partial pivoting.
    ///
    /// Each row carries a scale: the largest entry modulus that has
    /// contributed to it, starting from its entries in A and growing with
    /// every elimination step applied to it. A column is singular when its
    /// best candidate is not above `pivot_tolerance` times the scale of its
    /// row, i.e. when everything left in the column is cancellation residue.
    pub fn factor(&mut self, pivot_tolerance: f64) -> Result<(), SingularPivot> {
        let n = self.size;
        self.lu.copy_from_slice(&self.a);

        for (i, p) in self.pivots.iter_mut().enumerate() {
            *p = i;
        }

        let mut scales: Vec<f64> = self
            .a
            .chunks(n.max(1))
            .take(n)
            .map(|row| row.iter().map(|v| v.modulus()).fold(0.0, f64::max))
            .collect();

        for k in 0..n {
            // Find pivot by size relative to its row
            let mut best = 0.0;
            let mut max_row = k;

            for i in k..n {
                let ratio = relative(self.lu[i * n + k].modulus(), scales[i]);
                if ratio > best {
                    best = ratio;
                    max_row = i;
                }
            }

            if !(best > pivot_tolerance) {
                trace!(column = k, pivot = best, pivot_tolerance, "pivot below threshold");
                return Err(SingularPivot(k));
            }

            // Swap rows if needed
            if max_row != k {
                self.pivots.swap(k, max_row);
                scales.swap(k, max_row);
                for j in 0..n {
                    self.lu.swap(k * n + j, max_row * n + j);
                }
            }

            // Eliminate
            let pivot = self.lu[k * n + k];
            for i in (k + 1)..n {
                let factor = self.lu[i * n + k] / pivot;
                self.lu[i * n + k] = factor;
                for j in (k + 1)..n {
                    let u = self.lu[k * n + j];
                    self.lu[i * n + j] -= factor * u;
                }
                scales[i] = scales[i].max(factor.modulus() * scales[k]);
            }
        }

        Ok(())
    }

    /// Solve the system using the pre-computed LU decomposition.
    pub fn solve(&mut self) {
        let n = self.size;

        // Apply pivot permutation to z
        for i in 0..n {
            self.x[i] = self.z[self.pivots[i]];
        }

        // Forward substitution (L * y = Pb)
        for i in 0..n {
            for j in 0..i {
                let l = self.lu[i * n + j];
                let y = self.x[j];
                self.x[i] -= l * y;
            }
        }

        // Back substitution (U * x = y)
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                let u = self.lu[i * n + j];
                let y = self.x[j];
                self.x[i] -= u * y;
            }
            self.x[i] = self.x[i] / self.lu[i * n + i];
        }
    }

    /// Ratio of the largest to the smallest pivot modulus of the last
    /// factorization.
    ///
    /// A cheap lower bound on the condition number; large values mean the
    /// solution has lost precision.
    pub fn condition_estimate(&self) -> f64 {
        let n = self.size;
        let (min, max) = (0..n)
            .map(|i| self.lu[i * n + i].modulus())
            .fold((f64::INFINITY, 0.0f64), |(lo, hi), d| (lo.min(d), hi.max(d)));
        if n == 0 {
            1.0
        } else {
            max / min
        }
    }

    /// Get the solved value of a node voltage (0 for ground).
    pub fn voltage(&self, node: Option<usize>) -> T {
        match node {
            Some(i) => self.x[i],
            None => T::zero(), // Ground
        }
    }
}

fn relative(value: f64, scale: f64) -> f64 {
    if scale > 0.0 {
        value / scale
    } else {
        0.0
    }
}

/// Convert a source value into the field it is solved in.
pub fn source_scalar<T: Scalar>(value: &SourceValue) -> T {
    match *value {
        SourceValue::Dc(v) => T::from_real(v),
        SourceValue::Phasor {
            magnitude,
            phase_deg,
        } => T::from_polar(magnitude, phase_deg.to_radians()),
    }
}

/// Stamp every component of the netlist into the MNA matrix.
pub fn stamp_netlist<T: Scalar>(netlist: &Netlist, matrix: &mut MnaMatrix<T>) {
    for r in netlist.resistors() {
        let n1 = netlist.node_index(&r.nodes[0]);
        let n2 = netlist.node_index(&r.nodes[1]);
        matrix.stamp_conductance(n1, n2, T::from_real(r.conductance()));
    }

    for (k, v) in netlist.sources().iter().enumerate() {
        let n1 = netlist.node_index(&v.nodes[0]);
        let n2 = netlist.node_index(&v.nodes[1]);
        let br = netlist.branch_index(k);
        matrix.stamp_voltage_source(n1, n2, br, source_scalar(&v.value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Resistor, VoltageSource};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use num_complex::Complex64;

    fn divider() -> Netlist {
        Netlist::new(
            vec![Resistor::new("R1", "1", "2", 1000.0), Resistor::new("R2", "2", "0", 2000.0)],
            vec![VoltageSource::dc("V1", "1", "0", 10.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_divider_stamps() {
        let netlist = divider();
        let mut m = MnaMatrix::<f64>::new(netlist.matrix_size());
        stamp_netlist(&netlist, &mut m);

        // G block
        assert_abs_diff_eq!(m.get(0, 0), 1e-3);
        assert_abs_diff_eq!(m.get(0, 1), -1e-3);
        assert_abs_diff_eq!(m.get(1, 0), -1e-3);
        assert_abs_diff_eq!(m.get(1, 1), 1e-3 + 0.5e-3);
        // B, C = B^T, D = 0
        assert_eq!(m.get(0, 2), 1.0);
        assert_eq!(m.get(2, 0), 1.0);
        assert_eq!(m.get(1, 2), 0.0);
        assert_eq!(m.get(2, 2), 0.0);
        // z
        assert_eq!(m.z, vec![0.0, 0.0, 10.0]);
    }

    #[test]
    fn test_factor_and_solve() {
        let netlist = divider();
        let mut m = MnaMatrix::<f64>::new(netlist.matrix_size());
        stamp_netlist(&netlist, &mut m);
        m.factor(1e-13).unwrap();
        m.solve();
        assert_abs_diff_eq!(m.x[0], 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(m.x[1], 20.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(m.x[2], -10.0 / 3000.0, epsilon = 1e-12);
        assert!(m.condition_estimate() >= 1.0);
    }

    #[test]
    fn test_singular_pivot_reported() {
        // 2x2 conductance block of an ungrounded resistor
        let mut m = MnaMatrix::<f64>::new(2);
        m.stamp_conductance(Some(0), Some(1), 1e-3);
        assert_eq!(m.factor(1e-13), Err(SingularPivot(1)));
    }

    #[test]
    fn test_wide_conductance_range_factors() {
        // 1 mOhm shunt on node 1, 100 GOhm divider from node 1 to node 2
        let mut m = MnaMatrix::<f64>::new(3);
        m.stamp_conductance(Some(0), None, 1e3);
        m.stamp_conductance(Some(0), Some(1), 1e-11);
        m.stamp_conductance(Some(1), None, 1e-11);
        m.stamp_voltage_source(Some(0), None, 2, 1.0);

        m.factor(1e-13).unwrap();
        m.solve();
        assert_relative_eq!(m.x[0], 1.0, max_relative = 1e-9);
        assert_relative_eq!(m.x[1], 0.5, max_relative = 1e-6);
        assert_relative_eq!(m.x[2], -1e3, max_relative = 1e-9);
        assert!(m.condition_estimate() > 1e12);
    }

    #[test]
    fn test_zero_row_is_singular() {
        let mut m = MnaMatrix::<f64>::new(2);
        m.stamp_conductance(Some(0), None, 1.0);
        assert_eq!(m.factor(1e-13), Err(SingularPivot(1)));
    }

    #[test]
    fn test_complex_stamps() {
        let netlist = Netlist::new(
            vec![Resistor::new("R1", "1", "0", 50.0)],
            vec![VoltageSource::ac("V1", "1", "0", 2.0, 90.0)],
        )
        .unwrap();
        let mut m = MnaMatrix::<Complex64>::new(netlist.matrix_size());
        stamp_netlist(&netlist, &mut m);
        assert_abs_diff_eq!(m.get(0, 0).re, 0.02);
        assert_abs_diff_eq!(m.z[1].re, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.z[1].im, 2.0, epsilon = 1e-12);

        m.factor(1e-13).unwrap();
        m.solve();
        assert_abs_diff_eq!(m.x[0].im, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.x[1].im, -0.04, epsilon = 1e-12);
    }
}

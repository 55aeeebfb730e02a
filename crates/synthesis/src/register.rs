// This code is part of Qiskit.
//
// (C) Copyright IBM 2025
//
// This code is licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// copyright notice, and modified files need to carry a notice indicating
// that they have been altered from the originals.

use crate::error::CompileError;

/// The largest register we will attempt to tabulate.  Everything downstream is allocated as a
/// dense array of `2 ** num_qubits` floats, so this is already far past what is practical.
pub const MAX_QUBITS: usize = 30;

/// The bit weights of a quantum register, used to decode a computational-basis bit pattern into
/// the number it represents.
///
/// Bit `q` of a pattern index is the state of qubit `q`, and the pattern decodes to the sum of the
/// weights of all qubits in the active state.  Weights are arbitrary finite reals, so this covers
/// unsigned integers (`2 ** q`) as well as signed and unsigned fixed-point encodings.
#[derive(Clone, Debug, PartialEq)]
pub struct RegisterSpec {
    /// Weight of each qubit, indexed by qubit.
    weights: Vec<f64>,
}

impl RegisterSpec {
    /// Create a register from weights written in bit-string order.
    ///
    /// The leftmost weight belongs to the leftmost character of a written bit pattern, which is
    /// the most significant qubit: for `n` weights, qubit `q` carries `weights[n - 1 - q]`.  For
    /// example `[2., 1.]` is a 2-bit unsigned integer with qubit 0 as its least significant bit,
    /// and `[-0.5, 0.25, 0.125]` is a 3-bit signed fixed-point number in `[-0.5, 0.5)`.
    pub fn new(weights: &[f64]) -> Result<Self, CompileError> {
        Self::from_qubit_weights(weights.iter().rev().copied().collect())
    }

    /// Create a register from weights indexed by qubit, so that qubit `q` carries `weights[q]`.
    pub fn from_qubit_weights(weights: Vec<f64>) -> Result<Self, CompileError> {
        if weights.len() > MAX_QUBITS {
            return Err(CompileError::TooManyQubits {
                num_qubits: weights.len(),
                max: MAX_QUBITS,
            });
        }
        if let Some((qubit, weight)) = weights.iter().enumerate().find(|(_, w)| !w.is_finite()) {
            return Err(CompileError::NonFiniteWeight {
                qubit,
                weight: *weight,
            });
        }
        Ok(Self { weights })
    }

    /// An `n`-bit unsigned integer register, where qubit `q` carries `2 ** q`.
    pub fn unsigned_integer(num_qubits: usize) -> Result<Self, CompileError> {
        Self::from_qubit_weights((0..num_qubits).map(|q| (q as f64).exp2()).collect())
    }

    /// An `n`-bit unsigned fixed-point register covering `[0, 1)` in steps of `2 ** -n`.
    pub fn unsigned_fixed_point(num_qubits: usize) -> Result<Self, CompileError> {
        Self::from_qubit_weights(
            (0..num_qubits)
                .map(|q| (q as f64 - num_qubits as f64).exp2())
                .collect(),
        )
    }

    /// An `n`-bit two's-complement fixed-point register covering `[-0.5, 0.5)`.
    ///
    /// The most significant qubit carries `-1/2` and qubit `q` below it carries `2 ** (q - n)`.
    pub fn signed_fixed_point(num_qubits: usize) -> Result<Self, CompileError> {
        let mut weights: Vec<f64> = (0..num_qubits)
            .map(|q| (q as f64 - num_qubits as f64).exp2())
            .collect();
        if let Some(sign) = weights.last_mut() {
            *sign = -0.5;
        }
        Self::from_qubit_weights(weights)
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.weights.len()
    }

    /// The number of distinct bit patterns of the register, `2 ** num_qubits`.
    #[inline]
    pub fn num_patterns(&self) -> usize {
        1 << self.weights.len()
    }

    /// The weight carried by a single qubit.
    #[inline]
    pub fn weight(&self, qubit: usize) -> f64 {
        self.weights[qubit]
    }

    /// The weights indexed by qubit.
    #[inline]
    pub fn qubit_weights(&self) -> &[f64] {
        &self.weights
    }

    /// Decode a bit pattern into the value it represents.  Bits above the register width are
    /// ignored.
    pub fn value(&self, pattern: usize) -> f64 {
        self.weights
            .iter()
            .enumerate()
            .filter(|(qubit, _)| pattern & (1 << qubit) != 0)
            .map(|(_, weight)| weight)
            .sum()
    }

    /// Iterate over the decoded values of every bit pattern, in increasing pattern order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        (0..self.num_patterns()).map(|pattern| self.value(pattern))
    }

    /// The smallest value the register can represent.
    pub fn min_value(&self) -> f64 {
        self.weights.iter().filter(|w| **w < 0.).sum()
    }

    /// The largest value the register can represent.
    pub fn max_value(&self) -> f64 {
        self.weights.iter().filter(|w| **w > 0.).sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bit_string_order_puts_qubit_zero_last() {
        let register = RegisterSpec::new(&[2., 1.]).unwrap();
        let values: Vec<f64> = register.values().collect();
        assert_eq!(values, [0., 1., 2., 3.]);
        assert_eq!(register.weight(0), 1.);
        assert_eq!(register.weight(1), 2.);
    }

    #[test]
    fn unsigned_integer_matches_pattern_index() {
        let register = RegisterSpec::unsigned_integer(5).unwrap();
        for pattern in 0..register.num_patterns() {
            assert_eq!(register.value(pattern), pattern as f64);
        }
    }

    #[test]
    fn signed_fixed_point_range() {
        let register = RegisterSpec::signed_fixed_point(3).unwrap();
        assert_eq!(register.qubit_weights(), &[0.125, 0.25, -0.5]);
        assert_eq!(register.min_value(), -0.5);
        assert_eq!(register.max_value(), 0.375);
        let mut values: Vec<f64> = register.values().collect();
        values.sort_by(f64::total_cmp);
        let expected: Vec<f64> = (-4..4).map(|i| i as f64 / 8.).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn unsigned_fixed_point_range() {
        let register = RegisterSpec::unsigned_fixed_point(2).unwrap();
        let values: Vec<f64> = register.values().collect();
        assert_eq!(values, [0., 0.25, 0.5, 0.75]);
    }

    #[test]
    fn empty_register_has_single_pattern() {
        let register = RegisterSpec::new(&[]).unwrap();
        assert_eq!(register.num_patterns(), 1);
        assert_eq!(register.value(0), 0.);
    }

    #[test]
    fn rejects_non_finite_weights() {
        assert_eq!(
            RegisterSpec::new(&[1., f64::NAN, 2.]).unwrap_err().to_string(),
            CompileError::NonFiniteWeight {
                qubit: 1,
                weight: f64::NAN
            }
            .to_string()
        );
        assert!(matches!(
            RegisterSpec::from_qubit_weights(vec![f64::INFINITY]),
            Err(CompileError::NonFiniteWeight { qubit: 0, .. })
        ));
    }

    #[test]
    fn rejects_oversized_registers() {
        assert_eq!(
            RegisterSpec::unsigned_integer(MAX_QUBITS + 1),
            Err(CompileError::TooManyQubits {
                num_qubits: MAX_QUBITS + 1,
                max: MAX_QUBITS
            })
        );
    }
}

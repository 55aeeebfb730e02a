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

//! Transforms between a dense lookup table and its decomposition into one rotation coefficient per
//! set of control qubits.
//!
//! A table `f` over `n`-bit patterns can be written uniquely as
//!
//! ```text
//! f(m) = sum over S ⊆ bits(m) of c(S)
//! ```
//!
//! so that the circuit applying an `R(c(S))` rotation controlled on every qubit of `S`, for every
//! `S`, applies exactly `R(f(m))` to basis state `m`.  The coefficients are the Möbius transform
//! of the table over the lattice of subsets,
//!
//! ```text
//! c(S) = sum over T ⊆ S of (-1) ** |S \ T| * f(T)
//! ```
//!
//! and the table is recovered by the zeta transform (the plain subset sum).  Both are computed in
//! place with `n` doubling passes of `2 ** (n - 1)` additions each, rather than the `4 ** n` pairs
//! of the direct formula.

use rayon::prelude::*;

use crate::control_subset::ControlSubset;
use crate::getenv_use_multiple_threads;
use crate::lookup_table::LookupTable;

/// Registers with at least this many qubits have their transforms run in parallel.
pub const PARALLEL_THRESHOLD: usize = 14;

/// Below this half-width, a doubling pass is parallelised over whole blocks rather than within
/// each block.
const MIN_PARALLEL_BLOCK: usize = 1 << 12;

/// One doubling pass: for every pattern with bit `level` set, combine its entry with the entry of
/// the same pattern with that bit cleared.
///
/// The slice splits into blocks of `2 ** (level + 1)` entries whose upper halves are updated from
/// their lower halves, so no two writes ever touch the same index.
fn doubling_pass<F>(values: &mut [f64], level: usize, combine: F, parallel: bool)
where
    F: Fn(&mut f64, f64) + Sync + Send,
{
    let half = 1 << level;
    let serial_block = |block: &mut [f64]| {
        let (low, high) = block.split_at_mut(half);
        high.iter_mut()
            .zip(low.iter())
            .for_each(|(high, low)| combine(high, *low));
    };
    if !parallel {
        values.chunks_mut(2 * half).for_each(serial_block);
    } else if half < MIN_PARALLEL_BLOCK {
        values.par_chunks_mut(2 * half).for_each(serial_block);
    } else {
        values.chunks_mut(2 * half).for_each(|block| {
            let (low, high) = block.split_at_mut(half);
            high.par_iter_mut()
                .zip(low.par_iter())
                .for_each(|(high, low)| combine(high, *low));
        });
    }
}

fn num_levels(len: usize) -> usize {
    debug_assert!(len.is_power_of_two());
    len.trailing_zeros() as usize
}

/// Whether a transform over `num_qubits` should use the thread pool.
fn use_parallel(num_qubits: usize) -> bool {
    num_qubits >= PARALLEL_THRESHOLD && getenv_use_multiple_threads()
}

/// In-place Möbius transform: turn a dense table into its subset coefficients.
///
/// The length of `values` must be a power of two.
pub fn mobius_transform(values: &mut [f64]) {
    let levels = num_levels(values.len());
    mobius_transform_with(values, use_parallel(levels));
}

/// In-place zeta transform: turn subset coefficients back into the dense table they sum to.
///
/// The length of `values` must be a power of two.
pub fn zeta_transform(values: &mut [f64]) {
    let levels = num_levels(values.len());
    zeta_transform_with(values, use_parallel(levels));
}

pub(crate) fn mobius_transform_with(values: &mut [f64], parallel: bool) {
    for level in 0..num_levels(values.len()) {
        doubling_pass(values, level, |high, low| *high -= low, parallel);
    }
}

pub(crate) fn zeta_transform_with(values: &mut [f64], parallel: bool) {
    for level in 0..num_levels(values.len()) {
        doubling_pass(values, level, |high, low| *high += low, parallel);
    }
}

/// The exact rotation coefficient of every set of control qubits.
///
/// This always holds all `2 ** n` subsets, including those whose coefficient is zero, indexed by
/// the subset mask.
#[derive(Clone, Debug, PartialEq)]
pub struct CoefficientMap {
    num_qubits: usize,
    coefficients: Vec<f64>,
}

impl CoefficientMap {
    #[tracing::instrument(level = "debug", skip_all, fields(num_qubits = table.num_qubits()))]
    pub fn from_table(table: &LookupTable) -> Self {
        let mut coefficients = table.values().to_vec();
        mobius_transform(&mut coefficients);
        tracing::debug!(
            nonzero = coefficients.iter().filter(|c| **c != 0.).count(),
            "computed subset coefficients"
        );
        Self {
            num_qubits: table.num_qubits(),
            coefficients,
        }
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The number of subsets, which is always `2 ** num_qubits`.
    #[inline]
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    #[inline]
    pub fn get(&self, subset: ControlSubset) -> f64 {
        self.coefficients[subset.mask()]
    }

    /// The coefficients indexed by subset mask.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.coefficients
    }

    /// Every subset with its coefficient, in ascending mask order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (ControlSubset, f64)> + '_ {
        self.coefficients
            .iter()
            .enumerate()
            .map(|(mask, coeff)| (ControlSubset::from_mask(mask), *coeff))
    }

    /// The angle applied to a single bit pattern: the sum of the coefficients of every subset of
    /// its active qubits.
    pub fn reconstruct(&self, pattern: usize) -> f64 {
        let mut total = 0.;
        let mut sub = pattern;
        loop {
            total += self.coefficients[sub];
            if sub == 0 {
                break;
            }
            sub = (sub - 1) & pattern;
        }
        total
    }

    /// The angle applied to every bit pattern.
    pub fn reconstruct_all(&self) -> Vec<f64> {
        let mut values = self.coefficients.clone();
        zeta_transform(&mut values);
        values
    }
}

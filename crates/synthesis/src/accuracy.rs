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

use rayon::prelude::*;

use crate::approximation::PrunedMap;
use crate::cost_model::CostModel;
use crate::getenv_use_multiple_threads;
use crate::lookup_table::LookupTable;
use crate::subset_transform::{zeta_transform, PARALLEL_THRESHOLD};

/// The achieved accuracy and size of a (possibly pruned) rotation circuit.
///
/// The errors are exact: every input's angle is reconstructed from the retained terms and compared
/// against the lookup table.  The worst-case error is never larger than the conservative bound
/// used while pruning.
#[derive(Clone, Debug, PartialEq)]
pub struct AccuracyReport {
    pub worst_case_error: f64,
    pub average_error: f64,
    pub retained_terms: usize,
    pub gate_cost: u64,
    /// The largest number of controls on any retained term.
    pub max_controls: usize,
    /// Ancillas needed to compute the largest control condition, one fewer than its controls.
    pub ancilla_count: usize,
}

impl AccuracyReport {
    pub fn evaluate(table: &LookupTable, circuit: &PrunedMap, cost_model: &dyn CostModel) -> Self {
        let mut approximate = vec![0.; table.len()];
        for (subset, coeff) in circuit {
            approximate[subset.mask()] = *coeff;
        }
        zeta_transform(&mut approximate);

        let exact = table.values();
        let error = |(approx, exact): (&f64, &f64)| (approx - exact).abs();
        let (worst_case_error, total_error) =
            if table.num_qubits() >= PARALLEL_THRESHOLD && getenv_use_multiple_threads() {
                approximate
                    .par_iter()
                    .zip(exact.par_iter())
                    .map(error)
                    .fold(|| (0., 0.), |(max, sum), err| (f64::max(max, err), sum + err))
                    .reduce(|| (0., 0.), |(a_max, a_sum), (b_max, b_sum)| {
                        (f64::max(a_max, b_max), a_sum + b_sum)
                    })
            } else {
                approximate
                    .iter()
                    .zip(exact.iter())
                    .map(error)
                    .fold((0., 0.), |(max, sum), err| (f64::max(max, err), sum + err))
            };

        let max_controls = circuit.keys().map(|s| s.len()).max().unwrap_or(0);
        Self {
            worst_case_error,
            average_error: total_error / table.len() as f64,
            retained_terms: circuit.len(),
            gate_cost: circuit
                .keys()
                .map(|s| cost_model.cost(s.len()))
                .fold(0, u64::saturating_add),
            max_controls,
            ancilla_count: max_controls.saturating_sub(1),
        }
    }
}

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

//! Greedy removal of rotation terms under a gate-cost budget or an error budget.
//!
//! Only terms that cost something are ever removed: the unconditional and singly-controlled
//! rotations are free under every valid cost model, so dropping them would lose accuracy for no
//! saving.  Removing the term of subset `S` changes the angle of exactly the inputs whose active
//! qubits include `S`, by `-c(S)`.  Several removed terms can all apply to the same input, so the
//! sum of the removed magnitudes is a sound bound on the worst-case error of every input.

use std::cmp::Ordering;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::control_subset::ControlSubset;
use crate::cost_model::CostModel;
use crate::error::ApproximationError;
use crate::subset_transform::CoefficientMap;

/// Rotation terms keyed by their control qubits, in ascending subset order.
pub type PrunedMap = IndexMap<ControlSubset, f64, ::ahash::RandomState>;

/// The statistic by which removal candidates are ranked, smallest first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PruningOrder {
    /// The absolute value of the coefficient, which is the error its removal can introduce.
    #[default]
    Magnitude,
    /// The absolute value of the coefficient divided by the cost of its gate, preferring to remove
    /// expensive gates that contribute little.
    MagnitudePerCost,
}

/// How candidates with equal ranking statistics are ordered.  Remaining ties are broken by
/// ascending subset mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TieBreak {
    /// Remove terms with more controls first; they cost more for the same error.
    #[default]
    LargerSubsetFirst,
    SmallerSubsetFirst,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    subset: ControlSubset,
    magnitude: f64,
    cost: u64,
}

impl PruningOrder {
    #[inline]
    fn key(&self, candidate: &Candidate) -> f64 {
        match self {
            PruningOrder::Magnitude => candidate.magnitude,
            PruningOrder::MagnitudePerCost => candidate.magnitude / candidate.cost as f64,
        }
    }

    /// The total order in which candidates are removed.
    fn compare(&self, tie_break: TieBreak, a: &Candidate, b: &Candidate) -> Ordering {
        self.key(a)
            .total_cmp(&self.key(b))
            .then_with(|| match tie_break {
                TieBreak::LargerSubsetFirst => b.subset.len().cmp(&a.subset.len()),
                TieBreak::SmallerSubsetFirst => a.subset.len().cmp(&b.subset.len()),
            })
            .then_with(|| a.subset.cmp(&b.subset))
    }
}

/// A pruned circuit together with the figures of merit of the pruning.
#[derive(Clone, Debug, PartialEq)]
pub struct ApproximationResult {
    circuit: PrunedMap,
    gate_cost: u64,
    error_bound: f64,
    removed_terms: usize,
}

impl ApproximationResult {
    /// The retained rotation terms.
    #[inline]
    pub fn circuit(&self) -> &PrunedMap {
        &self.circuit
    }

    pub fn into_circuit(self) -> PrunedMap {
        self.circuit
    }

    /// The total cost of the retained terms.
    #[inline]
    pub fn gate_cost(&self) -> u64 {
        self.gate_cost
    }

    /// The sum of the magnitudes of the removed terms, which bounds the error of every input.
    #[inline]
    pub fn error_bound(&self) -> f64 {
        self.error_bound
    }

    #[inline]
    pub fn removed_terms(&self) -> usize {
        self.removed_terms
    }
}

/// Prunes a complete coefficient map.  Every call starts again from the full set of terms.
pub struct Approximator<'a> {
    coefficients: &'a CoefficientMap,
    cost_model: &'a dyn CostModel,
    order: PruningOrder,
    tie_break: TieBreak,
}

impl<'a> Approximator<'a> {
    pub fn new(
        coefficients: &'a CoefficientMap,
        cost_model: &'a dyn CostModel,
        order: PruningOrder,
        tie_break: TieBreak,
    ) -> Self {
        Self {
            coefficients,
            cost_model,
            order,
            tie_break,
        }
    }

    /// The cost of the complete, unpruned circuit.
    pub fn full_cost(&self) -> u64 {
        self.coefficients
            .iter()
            .map(|(subset, _)| self.cost_model.cost(subset.len()))
            .fold(0, u64::saturating_add)
    }

    /// Every costly term, in removal order.
    fn candidates(&self) -> Vec<Candidate> {
        self.coefficients
            .iter()
            .filter_map(|(subset, coeff)| {
                let cost = self.cost_model.cost(subset.len());
                (!subset.is_empty() && cost > 0).then_some(Candidate {
                    subset,
                    magnitude: coeff.abs(),
                    cost,
                })
            })
            .sorted_by(|a, b| self.order.compare(self.tie_break, a, b))
            .collect()
    }

    /// Remove terms in order until the total cost is at most `max_count`.
    ///
    /// The floor is the circuit of only the free terms, whose cost is zero, so every non-negative
    /// budget can be met.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn up_to_gate_count(
        &self,
        max_count: i64,
    ) -> Result<ApproximationResult, ApproximationError> {
        if max_count < 0 {
            return Err(ApproximationError::InvalidArgument(format!(
                "the gate-count budget must be non-negative, but is {max_count}"
            )));
        }
        let budget = max_count as u64;
        let mut total_cost = self.full_cost();
        let mut removed = Vec::new();
        for candidate in self.candidates() {
            if total_cost <= budget {
                break;
            }
            total_cost -= candidate.cost;
            removed.push(candidate);
        }
        Ok(self.assemble(&removed, total_cost))
    }

    /// Remove terms in order while the sum of the removed magnitudes stays within `error_bound`.
    ///
    /// Removal stops at the first term that would exceed the bound, even if a later one would
    /// still fit.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn up_to_error(
        &self,
        error_bound: f64,
    ) -> Result<ApproximationResult, ApproximationError> {
        // Written to also reject NaN.
        if !(error_bound >= 0.) {
            return Err(ApproximationError::InvalidArgument(format!(
                "the error bound must be non-negative, but is {error_bound}"
            )));
        }
        let mut total_cost = self.full_cost();
        let mut accumulated = 0.;
        let mut removed = Vec::new();
        for candidate in self.candidates() {
            if accumulated + candidate.magnitude > error_bound {
                break;
            }
            accumulated += candidate.magnitude;
            total_cost -= candidate.cost;
            removed.push(candidate);
        }
        Ok(self.assemble(&removed, total_cost))
    }

    fn assemble(&self, removed: &[Candidate], gate_cost: u64) -> ApproximationResult {
        let mut keep = vec![true; self.coefficients.len()];
        for candidate in removed {
            keep[candidate.subset.mask()] = false;
        }
        let circuit: PrunedMap = self
            .coefficients
            .iter()
            .filter(|(subset, _)| keep[subset.mask()])
            .collect();
        let error_bound = removed.iter().map(|c| c.magnitude).sum();
        tracing::debug!(
            removed = removed.len(),
            retained = circuit.len(),
            gate_cost,
            error_bound,
            "pruned rotation terms"
        );
        ApproximationResult {
            circuit,
            gate_cost,
            error_bound,
            removed_terms: removed.len(),
        }
    }
}

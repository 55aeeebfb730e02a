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

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::fmt::Display;
use std::sync::Arc;

use crate::accuracy::AccuracyReport;
use crate::approximation::{ApproximationResult, Approximator, PrunedMap, PruningOrder, TieBreak};
use crate::cost_model::{validate_cost_model, CostModel, LinearToffoliCost};
use crate::error::{ApproximationError, CompileError};
use crate::lookup_table::LookupTable;
use crate::register::RegisterSpec;
use crate::subset_transform::CoefficientMap;

/// Settings of a [RotationCompiler].
#[derive(Clone)]
pub struct CompilerOptions {
    cost_model: Arc<dyn CostModel>,
    pruning_order: PruningOrder,
    tie_break: TieBreak,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            cost_model: Arc::new(LinearToffoliCost::default()),
            pruning_order: PruningOrder::default(),
            tie_break: TieBreak::default(),
        }
    }
}

impl fmt::Debug for CompilerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilerOptions")
            .field("pruning_order", &self.pruning_order)
            .field("tie_break", &self.tie_break)
            .finish_non_exhaustive()
    }
}

impl CompilerOptions {
    pub fn with_cost_model<C: CostModel + 'static>(mut self, cost_model: C) -> Self {
        self.cost_model = Arc::new(cost_model);
        self
    }

    pub fn with_pruning_order(mut self, pruning_order: PruningOrder) -> Self {
        self.pruning_order = pruning_order;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    #[inline]
    pub fn cost_model(&self) -> &dyn CostModel {
        self.cost_model.as_ref()
    }

    #[inline]
    pub fn pruning_order(&self) -> PruningOrder {
        self.pruning_order
    }

    #[inline]
    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }
}

/// Compiles a function of a register's value into multi-controlled rotations, and prunes them.
///
/// Construction does all the exact work once: it tabulates the function over every bit pattern
/// and decomposes the table into one coefficient per set of control qubits.  A compiler only
/// exists if that succeeded.  The approximation calls then always start again from the complete
/// decomposition; each one replaces the previously held result rather than pruning it further.
#[derive(Clone, Debug)]
pub struct RotationCompiler {
    register: RegisterSpec,
    table: LookupTable,
    coefficients: CoefficientMap,
    options: CompilerOptions,
    result: Option<ApproximationResult>,
}

impl RotationCompiler {
    /// Compile `function` with the default options.  The function is undefined wherever it
    /// returns a non-finite value.
    pub fn new<F>(register: RegisterSpec, function: F) -> Result<Self, CompileError>
    where
        F: Fn(f64) -> f64,
    {
        Self::with_options(register, function, CompilerOptions::default())
    }

    /// Compile a fallible `function` with the default options.
    pub fn try_new<F, E>(register: RegisterSpec, function: F) -> Result<Self, CompileError>
    where
        F: FnMut(f64) -> Result<f64, E>,
        E: Display,
    {
        Self::try_with_options(register, function, CompilerOptions::default())
    }

    pub fn with_options<F>(
        register: RegisterSpec,
        function: F,
        options: CompilerOptions,
    ) -> Result<Self, CompileError>
    where
        F: Fn(f64) -> f64,
    {
        Self::try_with_options(register, |x| Ok::<_, Infallible>(function(x)), options)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(num_qubits = register.num_qubits()))]
    pub fn try_with_options<F, E>(
        register: RegisterSpec,
        function: F,
        options: CompilerOptions,
    ) -> Result<Self, CompileError>
    where
        F: FnMut(f64) -> Result<f64, E>,
        E: Display,
    {
        validate_cost_model(options.cost_model(), register.num_qubits())?;
        let table = LookupTable::try_build(&register, function)?;
        let coefficients = CoefficientMap::from_table(&table);
        Ok(Self {
            register,
            table,
            coefficients,
            options,
            result: None,
        })
    }

    fn approximator(&self) -> Approximator<'_> {
        Approximator::new(
            &self.coefficients,
            self.options.cost_model(),
            self.options.pruning_order,
            self.options.tie_break,
        )
    }

    /// Prune the complete circuit until its gate cost is at most `max_count`.
    ///
    /// On error, the previously held approximation is kept.
    pub fn approximate_up_to_toffoli_count_of(
        &mut self,
        max_count: i64,
    ) -> Result<&ApproximationResult, ApproximationError> {
        let result = self.approximator().up_to_gate_count(max_count)?;
        Ok(&*self.result.insert(result))
    }

    /// Prune the complete circuit while the summed magnitude of the removed terms stays within
    /// `error_bound`.
    ///
    /// On error, the previously held approximation is kept.
    pub fn approximate_up_to_an_error_of(
        &mut self,
        error_bound: f64,
    ) -> Result<&ApproximationResult, ApproximationError> {
        let result = self.approximator().up_to_error(error_bound)?;
        Ok(&*self.result.insert(result))
    }

    /// Discard any approximation, returning to the exact circuit.
    pub fn reset(&mut self) {
        self.result = None;
    }

    /// The current rotation terms: the last approximation, or every term of the exact
    /// decomposition if there has been none.
    pub fn circuit(&self) -> Cow<'_, PrunedMap> {
        match &self.result {
            Some(result) => Cow::Borrowed(result.circuit()),
            None => Cow::Owned(self.coefficients.iter().collect()),
        }
    }

    /// The total cost of the current circuit.
    pub fn toffoli_count(&self) -> u64 {
        match &self.result {
            Some(result) => result.gate_cost(),
            None => self.approximator().full_cost(),
        }
    }

    /// Ancillas needed by the largest control condition of the current circuit.
    pub fn ancilla_count(&self) -> usize {
        let max_controls = match &self.result {
            Some(result) => result.circuit().keys().map(|s| s.len()).max().unwrap_or(0),
            None => self.register.num_qubits(),
        };
        max_controls.saturating_sub(1)
    }

    /// Measure the current circuit against the lookup table.
    pub fn accuracy(&self) -> AccuracyReport {
        AccuracyReport::evaluate(&self.table, &self.circuit(), self.options.cost_model())
    }

    /// The result of the last successful approximation call, if there is one.
    #[inline]
    pub fn last_result(&self) -> Option<&ApproximationResult> {
        self.result.as_ref()
    }

    #[inline]
    pub fn coefficients(&self) -> &CoefficientMap {
        &self.coefficients
    }

    #[inline]
    pub fn lookup_table(&self) -> &LookupTable {
        &self.table
    }

    #[inline]
    pub fn register(&self) -> &RegisterSpec {
        &self.register
    }

    #[inline]
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::control_subset::ControlSubset;

    fn square_compiler() -> RotationCompiler {
        RotationCompiler::new(RegisterSpec::new(&[2., 1.]).unwrap(), |x| x * x).unwrap()
    }

    #[test]
    fn unapproximated_circuit_is_the_full_decomposition() {
        let compiler = square_compiler();
        let circuit = compiler.circuit();
        assert!(matches!(circuit, Cow::Owned(_)));
        let terms: Vec<(usize, f64)> = circuit.iter().map(|(s, c)| (s.mask(), *c)).collect();
        assert_eq!(terms, [(0, 0.), (1, 1.), (2, 4.), (3, 4.)]);
        assert_eq!(compiler.toffoli_count(), 2);
        assert_eq!(compiler.ancilla_count(), 1);
        assert!(compiler.last_result().is_none());
    }

    #[test]
    fn failed_call_keeps_previous_result() {
        let mut compiler = square_compiler();
        let first = compiler.approximate_up_to_toffoli_count_of(0).unwrap().clone();
        assert!(compiler.approximate_up_to_toffoli_count_of(-3).is_err());
        assert!(compiler.approximate_up_to_an_error_of(-1.).is_err());
        assert_eq!(compiler.last_result(), Some(&first));
        assert!(!compiler
            .circuit()
            .contains_key(&ControlSubset::from_qubits([0, 1])));
    }

    #[test]
    fn reset_restores_exact_circuit() {
        let mut compiler = square_compiler();
        compiler.approximate_up_to_toffoli_count_of(0).unwrap();
        assert_eq!(compiler.accuracy().worst_case_error, 4.);
        compiler.reset();
        assert_eq!(compiler.circuit().len(), 4);
        assert_eq!(compiler.accuracy().worst_case_error, 0.);
    }

    #[test]
    fn invalid_cost_model_aborts_construction() {
        let options = CompilerOptions::default().with_cost_model(|k: usize| k as u64);
        let register = RegisterSpec::unsigned_integer(2).unwrap();
        let err = RotationCompiler::with_options(register, |x| x, options).unwrap_err();
        assert!(matches!(
            err,
            CompileError::InvalidCostModel {
                num_controls: 1,
                ..
            }
        ));
    }

    #[test]
    fn undefined_function_aborts_construction() {
        let register = RegisterSpec::signed_fixed_point(4).unwrap();
        let err = RotationCompiler::new(register, f64::ln).unwrap_err();
        assert!(matches!(err, CompileError::Evaluation { .. }));
    }

    #[test]
    fn options_debug_omits_cost_model() {
        let options = CompilerOptions::default().with_tie_break(TieBreak::SmallerSubsetFirst);
        assert_eq!(
            format!("{options:?}"),
            "CompilerOptions { pruning_order: Magnitude, tie_break: SmallerSubsetFirst, .. }"
        );
    }
}

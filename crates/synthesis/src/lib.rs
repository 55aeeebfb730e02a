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

//! Synthesis of function-rotation lookup tables as sparse sets of multi-controlled rotations.
//!
//! A function `f` of the value held in an `n`-qubit register is tabulated over all `2 ** n` bit
//! patterns, decomposed exactly into one rotation per set of control qubits, and then pruned to
//! trade accuracy for gate cost.

use std::env;

pub mod accuracy;
pub mod approximation;
pub mod control_subset;
pub mod cost_model;
pub mod error;
pub mod lookup_table;
pub mod register;
pub mod rotation_compiler;
pub mod subset_transform;

#[cfg(feature = "python")]
mod py_rotation_circuit;

pub use accuracy::AccuracyReport;
pub use approximation::{ApproximationResult, Approximator, PrunedMap, PruningOrder, TieBreak};
pub use control_subset::ControlSubset;
pub use cost_model::{CostModel, LinearToffoliCost};
pub use error::{ApproximationError, CompileError};
pub use lookup_table::LookupTable;
pub use register::RegisterSpec;
pub use rotation_compiler::{CompilerOptions, RotationCompiler};
pub use subset_transform::CoefficientMap;

/// Whether the large-register paths may use the rayon thread pool.
///
/// Set `LUT_SYNTHESIS_IN_PARALLEL=TRUE` when the caller is itself running in a parallel context
/// to stay single-threaded, unless `LUT_SYNTHESIS_FORCE_THREADS=TRUE` is also set.
#[inline]
pub fn getenv_use_multiple_threads() -> bool {
    let parallel_context = env::var("LUT_SYNTHESIS_IN_PARALLEL")
        .unwrap_or_else(|_| "FALSE".to_string())
        .to_uppercase()
        == "TRUE";
    let force_threads = env::var("LUT_SYNTHESIS_FORCE_THREADS")
        .unwrap_or_else(|_| "FALSE".to_string())
        .to_uppercase()
        == "TRUE";
    !parallel_context || force_threads
}

#[cfg(feature = "python")]
pub use py_rotation_circuit::synthesis;

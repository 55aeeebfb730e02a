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

use thiserror::Error;

/// Errors that can occur while building a [RotationCompiler](crate::RotationCompiler).
///
/// Every one of these aborts construction; there is never a partially-built compiler.  In Python
/// space they are all raised as `ValueError`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The target function failed, or returned a non-finite angle, at a value reachable by the
    /// register.
    #[error("function undefined at register value {value} (bit pattern {pattern:#b}): {reason}")]
    Evaluation {
        pattern: usize,
        value: f64,
        reason: String,
    },
    #[error("the weight of qubit {qubit} must be finite, but is {weight}")]
    NonFiniteWeight { qubit: usize, weight: f64 },
    #[error("a register of {num_qubits} qubits exceeds the supported maximum of {max}")]
    TooManyQubits { num_qubits: usize, max: usize },
    #[error("a lookup table must have a power-of-two number of entries, but got {0}")]
    InvalidTableLength(usize),
    #[error("invalid cost model at {num_controls} controls: {reason}")]
    InvalidCostModel {
        num_controls: usize,
        reason: &'static str,
    },
}

/// Errors raised by the approximation calls.  These leave the compiler in its previous state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApproximationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

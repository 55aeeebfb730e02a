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

use std::convert::Infallible;
use std::fmt::Display;

use crate::error::CompileError;
use crate::register::RegisterSpec;

/// Above this many qubits, tabulating the function (`2 ** n` evaluations) and transforming the
/// table (`n * 2 ** n` operations) stops being quick.
pub const RECOMMENDED_MAX_QUBITS: usize = 16;

/// The rotation angle for every bit pattern of a register.
///
/// Entry `m` is the target function evaluated at the value that bit pattern `m` decodes to.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupTable {
    num_qubits: usize,
    values: Vec<f64>,
}

impl LookupTable {
    /// Tabulate an infallible function over every value of the register.
    ///
    /// A non-finite angle (for example `ln(0)` or `1 / 0`) means the function is not defined at
    /// that register value, and is reported as [CompileError::Evaluation].
    pub fn build<F>(register: &RegisterSpec, function: F) -> Result<Self, CompileError>
    where
        F: Fn(f64) -> f64,
    {
        Self::try_build(register, |x| Ok::<_, Infallible>(function(x)))
    }

    /// Tabulate a fallible function over every value of the register, in increasing bit-pattern
    /// order.  The first failure aborts the whole build.
    pub fn try_build<F, E>(register: &RegisterSpec, mut function: F) -> Result<Self, CompileError>
    where
        F: FnMut(f64) -> Result<f64, E>,
        E: Display,
    {
        let num_qubits = register.num_qubits();
        if num_qubits > RECOMMENDED_MAX_QUBITS {
            tracing::warn!(
                num_qubits,
                "tabulating a register of {num_qubits} qubits requires {} function evaluations",
                register.num_patterns()
            );
        }
        let mut values = Vec::with_capacity(register.num_patterns());
        for (pattern, value) in register.values().enumerate() {
            let angle = function(value).map_err(|err| CompileError::Evaluation {
                pattern,
                value,
                reason: err.to_string(),
            })?;
            if !angle.is_finite() {
                return Err(CompileError::Evaluation {
                    pattern,
                    value,
                    reason: format!("non-finite result {angle}"),
                });
            }
            values.push(angle);
        }
        Ok(Self { num_qubits, values })
    }

    /// Wrap already-computed angles.  The number of entries must be a power of two, and every
    /// entry must be finite.
    pub fn from_values(values: Vec<f64>) -> Result<Self, CompileError> {
        if !values.len().is_power_of_two() {
            return Err(CompileError::InvalidTableLength(values.len()));
        }
        let num_qubits = values.len().trailing_zeros() as usize;
        if num_qubits > crate::register::MAX_QUBITS {
            return Err(CompileError::TooManyQubits {
                num_qubits,
                max: crate::register::MAX_QUBITS,
            });
        }
        if let Some((pattern, angle)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(CompileError::Evaluation {
                pattern,
                value: pattern as f64,
                reason: format!("non-finite table entry {angle}"),
            });
        }
        Ok(Self { num_qubits, values })
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; even a zero-qubit table has its single unconditional entry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, pattern: usize) -> f64 {
        self.values[pattern]
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

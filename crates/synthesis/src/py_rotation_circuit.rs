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

use numpy::PyArray1;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyFrozenSet};

use crate::approximation::{PruningOrder, TieBreak};
use crate::cost_model::LinearToffoliCost;
use crate::error::{ApproximationError, CompileError};
use crate::register::RegisterSpec;
use crate::rotation_compiler::{CompilerOptions, RotationCompiler};

impl From<CompileError> for PyErr {
    fn from(value: CompileError) -> PyErr {
        PyValueError::new_err(value.to_string())
    }
}
impl From<ApproximationError> for PyErr {
    fn from(value: ApproximationError) -> PyErr {
        PyValueError::new_err(value.to_string())
    }
}

fn parse_pruning_order(order: &str) -> PyResult<PruningOrder> {
    match order {
        "magnitude" => Ok(PruningOrder::Magnitude),
        "magnitude_per_cost" => Ok(PruningOrder::MagnitudePerCost),
        _ => Err(PyValueError::new_err(format!(
            "unknown pruning order '{order}', expected 'magnitude' or 'magnitude_per_cost'"
        ))),
    }
}

fn parse_tie_break(tie_break: &str) -> PyResult<TieBreak> {
    match tie_break {
        "larger_first" => Ok(TieBreak::LargerSubsetFirst),
        "smaller_first" => Ok(TieBreak::SmallerSubsetFirst),
        _ => Err(PyValueError::new_err(format!(
            "unknown tie break '{tie_break}', expected 'larger_first' or 'smaller_first'"
        ))),
    }
}

/// A lookup table of rotation angles compiled into multi-controlled rotations.
///
/// Args:
///     fractional_values (list[float]): the value carried by each qubit of the register, indexed
///         by qubit.  A bit pattern represents the sum of the values of its active qubits.
///     function (Callable[[float], float]): the rotation angle as a function of the register
///         value.  It must be defined for every value the register can represent.
///     toffolis_per_control (int): Toffoli gates charged per control beyond the first.
///     pruning_order (str): ``"magnitude"`` or ``"magnitude_per_cost"``.
///     tie_break (str): ``"larger_first"`` or ``"smaller_first"``.
///
/// Raises:
///     ValueError: if the function is undefined anywhere on the register.  An exception raised
///         by ``function`` itself is attached as the cause.
#[pyclass(name = "RotationCircuit", module = "lut_synthesis._accelerate.synthesis")]
pub struct PyRotationCircuit {
    inner: RotationCompiler,
}

#[pymethods]
impl PyRotationCircuit {
    #[new]
    #[pyo3(signature = (
        fractional_values,
        function,
        toffolis_per_control=2,
        pruning_order="magnitude",
        tie_break="larger_first",
    ))]
    fn py_new(
        py: Python,
        fractional_values: Vec<f64>,
        function: &Bound<PyAny>,
        toffolis_per_control: u64,
        pruning_order: &str,
        tie_break: &str,
    ) -> PyResult<Self> {
        let register = RegisterSpec::from_qubit_weights(fractional_values)?;
        let options = CompilerOptions::default()
            .with_cost_model(LinearToffoliCost {
                toffolis_per_control,
            })
            .with_pruning_order(parse_pruning_order(pruning_order)?)
            .with_tie_break(parse_tie_break(tie_break)?);

        let mut raised: Option<PyErr> = None;
        let compiled = RotationCompiler::try_with_options(
            register,
            |value| {
                function
                    .call1((value,))
                    .and_then(|angle| angle.extract::<f64>())
                    .map_err(|err| {
                        let message = err.to_string();
                        raised = Some(err);
                        message
                    })
            },
            options,
        );
        match compiled {
            Ok(inner) => Ok(Self { inner }),
            Err(err) => {
                let py_err: PyErr = err.into();
                if raised.is_some() {
                    py_err.set_cause(py, raised);
                }
                Err(py_err)
            }
        }
    }

    /// Drop the cheapest-to-lose rotations while the summed magnitude of everything dropped stays
    /// within ``error_upper_bound``.  Always starts from the exact circuit.
    fn approximate_up_to_an_error_of(&mut self, error_upper_bound: f64) -> PyResult<()> {
        self.inner.approximate_up_to_an_error_of(error_upper_bound)?;
        Ok(())
    }

    /// Drop the cheapest-to-lose rotations until the Toffoli count is at most ``max_count``.
    /// Always starts from the exact circuit.
    fn approximate_up_to_toffoli_count_of(&mut self, max_count: i64) -> PyResult<()> {
        self.inner.approximate_up_to_toffoli_count_of(max_count)?;
        Ok(())
    }

    /// Return to the exact circuit.
    fn reset(&mut self) {
        self.inner.reset()
    }

    /// The rotations as a ``dict`` from the frozenset of control qubits to the rotation angle.
    #[getter]
    fn circuit<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let out = PyDict::new(py);
        for (subset, coeff) in self.inner.circuit().iter() {
            out.set_item(PyFrozenSet::new(py, subset.qubits())?, *coeff)?;
        }
        Ok(out)
    }

    #[getter]
    fn toffoli_count(&self) -> u64 {
        self.inner.toffoli_count()
    }

    #[getter]
    fn ancilla_count(&self) -> usize {
        self.inner.ancilla_count()
    }

    #[getter]
    fn register_size(&self) -> usize {
        self.inner.register().num_qubits()
    }

    /// The exact angle of every bit pattern, as a Numpy array.
    #[getter]
    fn lookup_table<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        PyArray1::from_slice(py, self.inner.lookup_table().values())
    }

    /// The coefficient of every subset of control qubits, indexed by subset mask.
    #[getter]
    fn coefficients<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        PyArray1::from_slice(py, self.inner.coefficients().as_slice())
    }

    /// The exact error and size of the current circuit, as a ``dict``.
    fn accuracy<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let report = self.inner.accuracy();
        let out = PyDict::new(py);
        out.set_item("worst_case_error", report.worst_case_error)?;
        out.set_item("average_error", report.average_error)?;
        out.set_item("retained_terms", report.retained_terms)?;
        out.set_item("gate_cost", report.gate_cost)?;
        out.set_item("max_controls", report.max_controls)?;
        out.set_item("ancilla_count", report.ancilla_count)?;
        Ok(out)
    }

    fn __repr__(&self) -> String {
        format!(
            "<RotationCircuit on {} qubits: {} rotations, {} Toffolis>",
            self.inner.register().num_qubits(),
            self.inner.circuit().len(),
            self.inner.toffoli_count(),
        )
    }
}

pub fn synthesis(m: &Bound<PyModule>) -> PyResult<()> {
    m.add_class::<PyRotationCircuit>()?;
    Ok(())
}

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

/// An estimate of the auxiliary-gate overhead of a rotation with a given number of controls.
///
/// A valid model is free for zero and one controls (a bare or singly-controlled rotation needs no
/// multi-control synthesis), strictly positive from two controls on, and non-decreasing.  Any
/// `Fn(usize) -> u64` closure is a cost model.
pub trait CostModel: Send + Sync {
    fn cost(&self, num_controls: usize) -> u64;
}

impl<F> CostModel for F
where
    F: Fn(usize) -> u64 + Send + Sync,
{
    #[inline]
    fn cost(&self, num_controls: usize) -> u64 {
        self(num_controls)
    }
}

/// Toffoli count of a `k`-controlled rotation computed into one ancilla by a V-chain of
/// `k - 1` Toffolis, then uncomputed: `2 * (k - 1)` for the default of two per control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinearToffoliCost {
    pub toffolis_per_control: u64,
}

impl Default for LinearToffoliCost {
    fn default() -> Self {
        Self {
            toffolis_per_control: 2,
        }
    }
}

impl CostModel for LinearToffoliCost {
    #[inline]
    fn cost(&self, num_controls: usize) -> u64 {
        self.toffolis_per_control * num_controls.saturating_sub(1) as u64
    }
}

/// Check the shape of a cost model for every control count up to `max_controls`.
pub fn validate_cost_model(
    model: &dyn CostModel,
    max_controls: usize,
) -> Result<(), CompileError> {
    let mut previous = 0;
    for num_controls in 0..=max_controls {
        let cost = model.cost(num_controls);
        let reason = match num_controls {
            0 | 1 if cost != 0 => Some("rotations with fewer than two controls must be free"),
            0 | 1 => None,
            _ if cost == 0 => Some("rotations with two or more controls must have positive cost"),
            _ if cost < previous => Some("cost must not decrease with more controls"),
            _ => None,
        };
        if let Some(reason) = reason {
            return Err(CompileError::InvalidCostModel {
                num_controls,
                reason,
            });
        }
        previous = cost;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_is_twice_controls_minus_one() {
        let model = LinearToffoliCost::default();
        let costs: Vec<u64> = (0..6).map(|k| model.cost(k)).collect();
        assert_eq!(costs, [0, 0, 2, 4, 6, 8]);
        assert_eq!(validate_cost_model(&model, 20), Ok(()));
    }

    #[test]
    fn closures_are_cost_models() {
        let quadratic = |k: usize| if k < 2 { 0 } else { (k * k) as u64 };
        assert_eq!(quadratic.cost(3), 9);
        assert_eq!(validate_cost_model(&quadratic, 10), Ok(()));
    }

    #[test]
    fn rejects_costly_single_control() {
        assert_eq!(
            validate_cost_model(&|k: usize| k as u64, 4),
            Err(CompileError::InvalidCostModel {
                num_controls: 1,
                reason: "rotations with fewer than two controls must be free"
            })
        );
    }

    #[test]
    fn rejects_free_multi_control() {
        let model = LinearToffoliCost {
            toffolis_per_control: 0,
        };
        assert!(matches!(
            validate_cost_model(&model, 3),
            Err(CompileError::InvalidCostModel { num_controls: 2, .. })
        ));
        // Nothing beyond a single control to check.
        assert_eq!(validate_cost_model(&model, 1), Ok(()));
    }

    #[test]
    fn rejects_decreasing_cost() {
        let model = |k: usize| -> u64 {
            match k {
                0 | 1 => 0,
                2 => 5,
                _ => 3,
            }
        };
        assert!(matches!(
            validate_cost_model(&model, 3),
            Err(CompileError::InvalidCostModel { num_controls: 3, .. })
        ));
    }
}

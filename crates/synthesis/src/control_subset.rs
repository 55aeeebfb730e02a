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

use std::fmt;

use itertools::Itertools;
use smallvec::SmallVec;

/// A set of control qubits, stored as a bit-mask where bit `q` is set if qubit `q` is a control.
///
/// The empty subset is the unconditional (global) rotation.  Subsets are ordered by their mask,
/// which is the canonical order used everywhere a deterministic iteration order is needed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ControlSubset(usize);

impl ControlSubset {
    #[inline]
    pub const fn from_mask(mask: usize) -> Self {
        Self(mask)
    }

    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn from_qubits<I>(qubits: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        Self(qubits.into_iter().fold(0, |mask, q| mask | (1 << q)))
    }

    #[inline]
    pub const fn mask(&self) -> usize {
        self.0
    }

    /// The number of control qubits.
    #[inline]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(&self, qubit: u32) -> bool {
        self.0 & (1 << qubit) != 0
    }

    #[inline]
    pub const fn is_subset_of(&self, other: &ControlSubset) -> bool {
        self.0 & !other.0 == 0
    }

    /// The control qubits in ascending order.
    pub fn qubits(&self) -> SmallVec<[u32; 8]> {
        let mut qubits = SmallVec::new();
        let mut mask = self.0;
        while mask != 0 {
            qubits.push(mask.trailing_zeros());
            mask &= mask - 1;
        }
        qubits
    }
}

impl fmt::Display for ControlSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.qubits().iter().map(|q| format!("q{q}")).join(", ")
        )
    }
}

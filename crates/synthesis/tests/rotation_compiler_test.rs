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

use approx::assert_abs_diff_eq;
use lut_synthesis::{
    CompilerOptions, ControlSubset, CostModel, LinearToffoliCost, PruningOrder, RegisterSpec,
    RotationCompiler,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

const TOL: f64 = 1e-9;

/// A compiler for a random table, built by looking the register value up in a random vector.
fn random_compiler(rng: &mut Pcg64Mcg, num_qubits: usize) -> RotationCompiler {
    let angles: Vec<f64> = (0..1 << num_qubits)
        .map(|_| rng.gen_range(-1.0..1.0))
        .collect();
    let register = RegisterSpec::unsigned_integer(num_qubits).unwrap();
    RotationCompiler::new(register, |x| angles[x as usize]).unwrap()
}

fn masks(compiler: &RotationCompiler) -> Vec<usize> {
    compiler.circuit().keys().map(|s| s.mask()).collect()
}

#[test]
fn square_of_two_bit_register() {
    let mut compiler =
        RotationCompiler::new(RegisterSpec::new(&[2., 1.]).unwrap(), |x| x * x).unwrap();
    assert_eq!(compiler.lookup_table().values(), &[0., 1., 4., 9.]);
    assert_eq!(compiler.coefficients().as_slice(), &[0., 1., 4., 4.]);
    assert_eq!(compiler.toffoli_count(), 2);

    let result = compiler.approximate_up_to_toffoli_count_of(0).unwrap();
    let terms: Vec<(ControlSubset, f64)> =
        result.circuit().iter().map(|(s, c)| (*s, *c)).collect();
    assert_eq!(
        terms,
        [
            (ControlSubset::empty(), 0.),
            (ControlSubset::from_qubits([0]), 1.),
            (ControlSubset::from_qubits([1]), 4.),
        ]
    );
    assert_eq!(result.gate_cost(), 0);
    assert_eq!(result.error_bound(), 4.);
    assert_eq!(compiler.accuracy().worst_case_error, 4.);
}

#[test]
fn exact_round_trip_for_random_tables() {
    let mut rng = Pcg64Mcg::seed_from_u64(20251019);
    for num_qubits in 0..=12 {
        let compiler = random_compiler(&mut rng, num_qubits);
        let table = compiler.lookup_table();
        let coefficients = compiler.coefficients();
        assert_eq!(coefficients.len(), 1 << num_qubits);
        for (pattern, expected) in table.values().iter().enumerate() {
            assert_abs_diff_eq!(coefficients.reconstruct(pattern), *expected, epsilon = TOL);
        }
        assert_abs_diff_eq!(compiler.accuracy().worst_case_error, 0., epsilon = TOL);
    }
}

#[test]
fn zero_budget_leaves_only_free_terms() {
    let mut rng = Pcg64Mcg::seed_from_u64(3);
    for num_qubits in 0..8 {
        let mut compiler = random_compiler(&mut rng, num_qubits);
        let result = compiler.approximate_up_to_toffoli_count_of(0).unwrap();
        assert_eq!(result.gate_cost(), 0);
        assert!(result.circuit().contains_key(&ControlSubset::empty()));
        assert!(result.circuit().keys().all(|s| s.len() < 2));
        assert_eq!(result.circuit().len(), num_qubits + 1);
        assert_eq!(compiler.ancilla_count(), 0);
    }
}

#[test]
fn zero_error_keeps_every_nonzero_term() {
    // The cube on an unsigned 3-bit register has no zero coefficient.
    let register = RegisterSpec::from_qubit_weights(vec![1., 2., 4.]).unwrap();
    let mut compiler = RotationCompiler::new(register, |x| x * x * x).unwrap();
    let exact = compiler.circuit().into_owned();
    let result = compiler.approximate_up_to_an_error_of(0.).unwrap();
    assert_eq!(result.removed_terms(), 0);
    assert_eq!(result.circuit(), &exact);
    assert_eq!(compiler.toffoli_count(), 3 * 2 + 4);
}

#[test]
fn removed_terms_grow_with_the_error_bound() {
    let mut rng = Pcg64Mcg::seed_from_u64(11);
    let mut compiler = random_compiler(&mut rng, 6);
    let mut previous_removed = 0;
    let mut previous_bound = 0.;
    let mut previous_circuit = compiler.circuit().into_owned();
    for step in 0..40 {
        let bound = step as f64 * 0.25;
        let result = compiler.approximate_up_to_an_error_of(bound).unwrap().clone();
        assert!(result.removed_terms() >= previous_removed);
        assert!(result.error_bound() >= previous_bound);
        assert!(result.error_bound() <= bound);
        // Each result is a sub-circuit of the one for a smaller bound.
        assert!(result
            .circuit()
            .keys()
            .all(|s| previous_circuit.contains_key(s)));
        assert!(compiler.accuracy().worst_case_error <= result.error_bound() + TOL);
        previous_removed = result.removed_terms();
        previous_bound = result.error_bound();
        previous_circuit = result.into_circuit();
    }
}

#[test]
fn gate_cost_follows_the_count_budget() {
    let mut rng = Pcg64Mcg::seed_from_u64(5);
    let mut compiler = random_compiler(&mut rng, 6);
    let full_cost = compiler.toffoli_count();
    let mut previous_cost = full_cost;
    let mut previous_bound = 0.;
    for budget in (0..=full_cost as i64).rev().step_by(7) {
        let result = compiler.approximate_up_to_toffoli_count_of(budget).unwrap();
        assert!(result.gate_cost() <= budget as u64);
        assert!(result.gate_cost() <= previous_cost);
        assert!(result.error_bound() >= previous_bound);
        previous_cost = result.gate_cost();
        previous_bound = result.error_bound();
        assert!(compiler.accuracy().worst_case_error <= previous_bound + TOL);
    }
}

#[test]
fn approximations_always_restart_from_the_exact_circuit() {
    let mut rng = Pcg64Mcg::seed_from_u64(17);
    let mut compiler = random_compiler(&mut rng, 5);
    let fresh_loose = compiler.clone().approximate_up_to_an_error_of(0.3).unwrap().clone();
    let fresh_count = compiler
        .clone()
        .approximate_up_to_toffoli_count_of(40)
        .unwrap()
        .clone();

    compiler.approximate_up_to_toffoli_count_of(0).unwrap();
    assert_eq!(compiler.approximate_up_to_an_error_of(0.3).unwrap(), &fresh_loose);
    compiler.approximate_up_to_an_error_of(5.).unwrap();
    assert_eq!(
        compiler.approximate_up_to_toffoli_count_of(40).unwrap(),
        &fresh_count
    );
}

#[test]
fn circuit_is_in_ascending_subset_order() {
    let mut rng = Pcg64Mcg::seed_from_u64(23);
    let mut compiler = random_compiler(&mut rng, 4);
    let exact = masks(&compiler);
    assert_eq!(exact, (0..16).collect::<Vec<_>>());
    compiler.approximate_up_to_toffoli_count_of(10).unwrap();
    let pruned = masks(&compiler);
    assert!(pruned.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn custom_cost_model_drives_pruning() {
    // The triple term is cheap to lose relative to its price, so it goes first even though one of
    // the pair terms has a smaller magnitude.
    let cost = |k: usize| -> u64 {
        match k {
            0 | 1 => 0,
            2 => 1,
            k => 10 * k as u64,
        }
    };
    let options = CompilerOptions::default()
        .with_cost_model(cost)
        .with_pruning_order(PruningOrder::MagnitudePerCost);
    let register = RegisterSpec::signed_fixed_point(3).unwrap();
    let mut compiler =
        RotationCompiler::with_options(register, |x| (x + 1.).sqrt(), options).unwrap();
    assert_eq!(compiler.toffoli_count(), 3 + 30);
    let result = compiler.approximate_up_to_toffoli_count_of(3).unwrap();
    assert_eq!(result.gate_cost(), 3);
    assert!(!result.circuit().contains_key(&ControlSubset::from_qubits([0, 1, 2])));
}

#[test]
fn default_options_use_two_toffolis_per_control() {
    let options = CompilerOptions::default();
    assert_eq!(options.cost_model().cost(5), LinearToffoliCost::default().cost(5));
    assert_eq!(options.cost_model().cost(5), 8);
}

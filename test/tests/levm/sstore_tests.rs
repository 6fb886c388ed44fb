use super::*;
use dualgas_levm::{Settlement, StatusCode};

fn split_config() -> VmConfig {
    config(Revision::Shanghai, 3, scenario_params())
}

// ==================== Split regime ====================

#[test]
fn deleting_three_slots_refunds_storage_gas() {
    let mut host = warm_host(&[1, 2, 3], 1);
    let mut state = top_frame(150_000, &split_config());

    for slot in 1..=3 {
        sstore(&mut state, &mut host, slot, 0);
    }

    assert_eq!(state.status, StatusCode::Success);
    assert_eq!(state.gas_left, 141_282);
    assert_eq!(state.gas_state.storage_gas_consumed(), 0);
    assert_eq!(state.gas_state.storage_gas_refund(), 60_000);
    assert_eq!(state.gas_state.speculative_cpu_gas_consumed(), 8_400);
    assert_eq!(state.gas_state.cpu_gas_refund(), 0);
}

#[test]
fn adding_three_slots_consumes_storage_gas() {
    let mut host = warm_host(&[1, 2, 3], 0);
    let mut state = top_frame(150_000, &split_config());

    for slot in 1..=3 {
        sstore(&mut state, &mut host, slot, 1);
    }

    assert_eq!(state.gas_left, 81_282);
    assert_eq!(state.gas_state.storage_gas_consumed(), 60_000);
    assert_eq!(state.gas_state.storage_gas_refund(), 0);
    assert_eq!(state.gas_state.speculative_cpu_gas_consumed(), 8_400);
}

#[test]
fn add_then_delete_settles_to_warm_accesses() {
    let mut host = warm_host(&[1, 2, 3], 0);
    let mut state = top_frame(150_000, &split_config());

    for slot in 1..=3 {
        sstore(&mut state, &mut host, slot, 1);
    }
    for slot in 1..=3 {
        sstore(&mut state, &mut host, slot, 0);
    }
    assert_eq!(state.gas_left, 81_282 - 3 * (6 + 100));

    let result = state.finalize().unwrap();
    let settlement = Settlement::from_result(150_000, &result, 3).unwrap();

    // Twelve pushes and six warm accesses.
    assert_eq!(settlement.gas_used, 12 * 3 + 6 * 100);
    assert_eq!(settlement.storage_gas_consumed, 0);
    assert_eq!(settlement.storage_gas_refund, 0);
    assert_eq!(settlement.speculative_cpu_gas_consumed, 0);
    assert_eq!(settlement.gas_refund, 0);
    assert_eq!(settlement.real_cpu_gas_used(), settlement.gas_used);
}

#[test]
fn default_set_cost_matches_the_single_pool_price() {
    let mut host = warm_host(&[7], 0);
    let mut state = top_frame(100_000, &config(Revision::Shanghai, 3, GasParameters::default()));

    sstore(&mut state, &mut host, 7, 1);

    assert_eq!(state.gas_left, 100_000 - 6 - 20_000);
    assert_eq!(state.gas_state.storage_gas_consumed(), 17_100);
    assert_eq!(state.gas_state.speculative_cpu_gas_consumed(), 2_800);
}

#[test]
fn cold_slot_pays_the_surcharge_as_real_compute_gas() {
    let mut host = InMemoryHost::default();
    let mut state = top_frame(100_000, &split_config());

    sstore(&mut state, &mut host, 1, 1);

    assert_eq!(state.gas_left, 100_000 - 6 - (2_100 + 100 + 20_000 + 2_800));
    assert_eq!(state.gas_state.storage_gas_consumed(), 20_000);
}

#[test]
fn rewriting_the_same_value_only_pays_access() {
    let mut host = warm_host(&[1], 5);
    let mut state = top_frame(10_000, &split_config());

    sstore(&mut state, &mut host, 1, 5);

    assert_eq!(state.gas_left, 10_000 - 6 - 100);
    assert_eq!(state.gas_state.storage_gas_consumed(), 0);
    assert_eq!(state.gas_state.speculative_cpu_gas_consumed(), 0);
}

#[test]
fn out_of_gas_during_sstore_burns_the_frame() {
    let mut host = warm_host(&[1], 0);
    let mut state = top_frame(10_000, &split_config());

    sstore(&mut state, &mut host, 1, 1);

    assert_eq!(state.status, StatusCode::OutOfGas);
    let result = state.finalize().unwrap();
    assert_eq!(result.gas_left, 0);
    assert_eq!(result.storage_gas_consumed, 0);
}

#[test]
fn stored_values_are_visible_to_sload() {
    let mut host = warm_host(&[4], 0);
    let mut state = top_frame(100_000, &split_config());

    sstore(&mut state, &mut host, 4, 99);
    assert_eq!(sload(&mut state, &mut host, 4), U256::from(99));
}

// ==================== Single pool ====================

#[test]
fn revision_schedule_accumulates_refunds() {
    let mut host = warm_host(&[1, 2, 3], 0);
    let mut state = top_frame(150_000, &config(Revision::Shanghai, 0, scenario_params()));

    for slot in 1..=3 {
        sstore(&mut state, &mut host, slot, 1);
    }
    for slot in 1..=3 {
        sstore(&mut state, &mut host, slot, 0);
    }

    // Version zero ignores the configured set cost.
    assert_eq!(state.gas_left, 150_000 - 12 * 3 - 3 * 20_000 - 3 * 100);
    assert_eq!(state.gas_state.cpu_gas_refund(), 3 * 19_900);

    let result = state.finalize().unwrap();
    let settlement = Settlement::from_result(150_000, &result, 0).unwrap();
    assert_eq!(settlement.gas_refund, 3 * 19_900);
    assert_eq!(settlement.gas_used, 12 * 3 + 3 * 20_000 + 3 * 100);
}

#[test]
fn parameter_versions_below_three_never_touch_the_ledger() {
    for version in [1, 2] {
        let mut host = warm_host(&[1, 2], 3);
        let mut state = top_frame(100_000, &config(Revision::Shanghai, version, scenario_params()));

        sstore(&mut state, &mut host, 1, 0);
        sstore(&mut state, &mut host, 2, 4);

        assert_eq!(state.gas_left, 100_000 - 12 - 2 * 2_900);
        assert_eq!(state.gas_state.storage_gas_consumed(), 0);
        assert_eq!(state.gas_state.storage_gas_refund(), 0);
        assert_eq!(state.gas_state.speculative_cpu_gas_consumed(), 0);
        assert_eq!(state.gas_state.cpu_gas_refund(), 4_800);
    }
}

#[test]
fn pre_net_metering_revisions_charge_flat_costs() {
    let mut host = InMemoryHost::default();
    let mut state = top_frame(100_000, &config(Revision::Byzantium, 0, GasParameters::default()));

    sstore(&mut state, &mut host, 1, 1);
    sstore(&mut state, &mut host, 1, 2);
    sstore(&mut state, &mut host, 1, 0);

    assert_eq!(state.gas_left, 100_000 - 18 - 20_000 - 5_000 - 5_000);
    assert_eq!(state.gas_state.cpu_gas_refund(), 15_000);
}

#[test]
fn single_and_split_pools_price_each_transition_alike() {
    // (original value, new value, warm charge)
    let transitions = [
        (5, 5, 100),
        (0, 1, 22_900),
        (5, 0, 2_900),
        (5, 6, 2_900),
    ];

    for (original, new, expected) in transitions {
        let mut charges = Vec::new();
        for version in [1, 3] {
            let mut host = warm_host(&[1], original);
            let mut state = top_frame(100_000, &config(Revision::Shanghai, version, scenario_params()));

            sstore(&mut state, &mut host, 1, new);
            assert_eq!(state.status, StatusCode::Success);
            let charged = 100_000 - 6 - state.gas_left;

            if version == 3 {
                let ledger = &state.gas_state;
                assert_eq!(
                    charged,
                    100 + ledger.storage_gas_consumed() + ledger.speculative_cpu_gas_consumed()
                );
            }
            charges.push(charged);
        }
        assert_eq!(charges, vec![expected, expected], "{original} -> {new}");
    }
}

use super::*;
use dualgas_levm::{CallKind, FrameResult, InternalError, Settlement, StatusCode, VMError};

const NEW_ACCOUNT: Address = Address::repeat_byte(0xee);

fn account_params() -> GasParameters {
    GasParameters {
        new_account: 25005,
        tx_create: 32005,
        ..Default::default()
    }
}

/// Frame that has already pushed the seven CALL operands.
fn caller(gas: i64, version: u64) -> ExecutionState {
    let mut state = top_frame(gas, &config(Revision::Shanghai, version, account_params()));
    for _ in 0..7 {
        push(&mut state, 0);
    }
    state.stack.clear();
    state
}

fn child_frame(parent: &ExecutionState, kind: CallKind, gas: i64) -> ExecutionState {
    let msg = parent.msg.child(kind, CONTRACT, gas, U256::zero());
    let config = VmConfig::new(parent.rev, parent.version, parent.gas_params);
    let mut child = ExecutionState::with_config(msg, &config, Bytes::new());
    child.inherit_call_stack(parent.call_stack());
    child
}

// ==================== CALL ====================

#[test]
fn value_call_to_new_account_charges_up_front() {
    let mut host = InMemoryHost::default();
    let mut state = caller(100_000, 3);

    let child_gas = state
        .charge_call(&mut host, NEW_ACCOUNT, U256::one(), U256::from(10))
        .unwrap();

    assert_eq!(child_gas, 2_310);
    assert_eq!(state.gas_left, 65_674);
    assert_eq!(state.gas_state.storage_gas_consumed(), 25_005);
    assert_eq!(state.gas_state.speculative_cpu_gas_consumed(), 6_700);
}

#[test]
fn successful_child_ledger_is_folded_into_the_caller() {
    let mut host = InMemoryHost::default();
    let mut state = caller(100_000, 3);
    let child_gas = state
        .charge_call(&mut host, NEW_ACCOUNT, U256::one(), U256::from(10))
        .unwrap();

    let result = FrameResult {
        gas_left: 0,
        gas_refund: 200,
        storage_gas_consumed: 3,
        storage_gas_refund: 100,
        ..Default::default()
    };
    state.return_from_child(child_gas, &result).unwrap();

    assert_eq!(state.gas_left, 63_367);
    assert_eq!(state.gas_state.storage_gas_consumed(), 25_005);
    assert_eq!(state.gas_state.storage_gas_refund(), 97);
    assert_eq!(state.gas_state.speculative_cpu_gas_consumed(), 6_700);
    assert_eq!(state.gas_state.cpu_gas_refund(), 200);
}

#[test]
fn failed_child_only_costs_the_gas_it_used() {
    for status in [StatusCode::Revert, StatusCode::OutOfGas] {
        let mut host = InMemoryHost::default();
        let mut state = caller(100_000, 3);
        let child_gas = state
            .charge_call(&mut host, NEW_ACCOUNT, U256::one(), U256::from(10))
            .unwrap();

        let result = FrameResult {
            status,
            gas_left: 1_000,
            ..Default::default()
        };
        state.return_from_child(child_gas, &result).unwrap();

        assert_eq!(state.gas_left, 64_364);
        assert_eq!(state.gas_state.storage_gas_refund(), 0);
        assert_eq!(state.gas_state.cpu_gas_refund(), 0);
    }
}

#[test]
fn single_and_split_pools_charge_the_same_total() {
    let mut settlements = Vec::new();
    for version in [1, 3] {
        let mut host = InMemoryHost::default();
        host.warm_account(NEW_ACCOUNT);
        let mut state = caller(100_000, version);

        let child_gas = state
            .charge_call(&mut host, NEW_ACCOUNT, U256::one(), U256::from(2_500))
            .unwrap();
        assert_eq!(child_gas, 4_800);

        let spent = FrameResult::default();
        state.return_from_child(child_gas, &spent).unwrap();
        assert_eq!(state.gas_left, 100_000 - 21 - (100 + 25_005 + 9_000 + 2_500));

        let result = state.finalize().unwrap();
        settlements.push(Settlement::from_result(100_000, &result, version).unwrap());
    }

    let [single, split] = [&settlements[0], &settlements[1]];
    assert_eq!(single.gas_used, split.gas_used);
    assert_eq!(single.storage_gas_consumed, 0);
    assert_eq!(split.storage_gas_consumed, 25_005);
    assert_eq!(split.speculative_cpu_gas_consumed, 6_700);
    assert_eq!(
        split.real_cpu_gas_used(),
        single.gas_used - 25_005 - 6_700
    );
}

#[test]
fn storage_freed_by_a_child_cancels_storage_bought_by_its_caller() {
    let mut host = warm_host(&[1], 0);
    let mut parent = top_frame(200_000, &config(Revision::Shanghai, 3, scenario_params()));

    sstore(&mut parent, &mut host, 1, 1);
    let child_gas = parent
        .charge_call(&mut host, CONTRACT, U256::zero(), U256::from(50_000))
        .unwrap();
    assert_eq!(child_gas, 50_000);

    let mut child = child_frame(&parent, CallKind::Call, child_gas);
    assert_eq!(child.depth(), 1);
    assert_eq!(child.call_stack(), &[CONTRACT, CONTRACT]);
    sstore(&mut child, &mut host, 1, 0);
    let child_result = child.finalize().unwrap();
    assert_eq!(child_result.storage_gas_refund, 20_000);
    assert_eq!(child_result.gas_refund, 2_800);

    parent.return_from_child(child_gas, &child_result).unwrap();
    let result = parent.finalize().unwrap();
    let settlement = Settlement::from_result(200_000, &result, 3).unwrap();

    // Two stores worth of pushes plus three warm accesses.
    assert_eq!(settlement.gas_used, 12 + 300);
    assert_eq!(settlement.storage_gas_consumed, 0);
    assert_eq!(settlement.speculative_cpu_gas_consumed, 0);
}

#[test]
fn static_child_cannot_store() {
    let mut host = warm_host(&[1], 0);
    let mut parent = top_frame(100_000, &config(Revision::Shanghai, 3, scenario_params()));
    let child_gas = parent
        .charge_call(&mut host, CONTRACT, U256::zero(), U256::from(5_000))
        .unwrap();

    let mut child = child_frame(&parent, CallKind::StaticCall, child_gas);
    assert!(child.in_static_mode());
    sstore(&mut child, &mut host, 1, 1);
    assert_eq!(child.status, StatusCode::StaticModeViolation);

    let result = child.finalize().unwrap();
    parent.return_from_child(child_gas, &result).unwrap();
    assert_eq!(parent.gas_left, 100_000 - 100 - 5_000);
    assert_eq!(parent.gas_state.storage_gas_consumed(), 0);
}

// ==================== CREATE ====================

#[test]
fn create_charges_base_cost_as_storage_gas() {
    let mut state = top_frame(50_000, &config(Revision::Shanghai, 3, account_params()));
    for _ in 0..3 {
        push(&mut state, 0);
    }

    let child_gas = state.charge_create().unwrap();
    assert_eq!(state.gas_left, 17_986);
    assert_eq!(child_gas, 17_705);

    let result = FrameResult {
        gas_left: 5,
        gas_refund: 100,
        storage_gas_consumed: 2_000,
        storage_gas_refund: 1_000,
        ..Default::default()
    };
    state.return_from_child(child_gas, &result).unwrap();

    assert_eq!(state.gas_left, 1_286);
    assert_eq!(state.gas_state.storage_gas_consumed(), 33_005);
    assert_eq!(state.gas_state.storage_gas_refund(), 0);
    assert_eq!(state.gas_state.cpu_gas_refund(), 100);
}

#[test]
fn create_in_static_frame_is_rejected() {
    let mut state = top_frame(50_000, &config(Revision::Shanghai, 3, account_params()));
    state.msg.is_static = true;
    assert_eq!(
        state.charge_create().unwrap_err(),
        VMError::from(dualgas_levm::ExceptionalHalt::OpcodeNotAllowedInStaticContext)
    );
}

#[test]
fn child_reporting_more_gas_than_given_is_an_internal_error() {
    let mut state = caller(100_000, 3);
    let result = FrameResult {
        gas_left: 11,
        ..Default::default()
    };
    assert_eq!(
        state.return_from_child(10, &result).unwrap_err(),
        VMError::from(InternalError::Underflow)
    );
}

use super::*;
use dualgas_levm::{GasState, StatusCode, StorageStatus, storage_cost::StorageCostTable};
use hex_literal::hex;

#[test]
fn config_document_selects_the_split_regime() {
    let config: VmConfig = serde_json::from_str(
        r#"{
            "revision": "Cancun",
            "version": 3,
            "gas_parameters": { "sset": 22900, "new_account": 25005 }
        }"#,
    )
    .unwrap();
    assert_eq!(config.revision, Revision::Cancun);
    assert_eq!(config.gas_parameters.tx_create, 32000);

    let mut host = warm_host(&[1], 0);
    let mut state = top_frame(100_000, &config);
    sstore(&mut state, &mut host, 1, 1);
    assert_eq!(state.gas_state.storage_gas_consumed(), 20_000);
}

#[test]
fn empty_config_is_the_revision_schedule() {
    let config: VmConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, VmConfig::default());
    assert_eq!(config.version, 0);
    assert_eq!(config.revision, "Shanghai".parse::<Revision>().unwrap());
}

#[test]
fn discounted_parameters_scale_storage_prices() {
    let params = scenario_params()
        .apply_discount_factor(U256::one(), U256::from(2))
        .unwrap();
    assert_eq!(params.sset, 11_450);

    let mut host = warm_host(&[1], 0);
    let mut state = top_frame(100_000, &config(Revision::Shanghai, 3, params));
    sstore(&mut state, &mut host, 1, 1);

    assert_eq!(state.gas_left, 100_000 - 6 - 11_450);
    assert_eq!(state.gas_state.storage_gas_consumed(), 8_550);
    assert_eq!(state.gas_state.speculative_cpu_gas_consumed(), 2_800);
}

#[test]
fn pooled_frame_forgets_the_previous_frame() {
    let split = config(Revision::Shanghai, 3, scenario_params());
    let single = config(Revision::Shanghai, 1, scenario_params());
    let mut host = warm_host(&[1, 2], 0);
    let mut state = top_frame(100_000, &split);

    sstore(&mut state, &mut host, 1, 1);
    push(&mut state, 0);
    assert_eq!(state.stack.len(), 1);

    state.reset_with_config(
        Message::call(SENDER, CONTRACT, 50_000),
        &single,
        Bytes::copy_from_slice(&hex!("600160015500")),
    );
    assert_eq!(state.gas_left, 50_000);
    assert!(state.stack.is_empty());
    assert!(state.memory.is_empty());
    assert_eq!(state.gas_state, GasState::new(1));
    assert_eq!(state.status, StatusCode::Success);
    assert_eq!(state.original_code.len(), 6);

    sstore(&mut state, &mut host, 2, 1);
    assert_eq!(state.gas_left, 50_000 - 6 - 22_900);
    assert_eq!(state.gas_state, GasState::new(1));

    // Resetting twice is the same as resetting once.
    let msg = Message::call(SENDER, CONTRACT, 50_000);
    state.reset_with_config(msg.clone(), &split, Bytes::new());
    state.reset_with_config(msg, &split, Bytes::new());
    assert_eq!(state.gas_state, GasState::new(3));
    assert_eq!(state.gas_left, 50_000);
}

#[test]
fn revision_tables_follow_the_hard_forks() {
    let istanbul = StorageCostTable::for_revision(Revision::Istanbul);
    let berlin = StorageCostTable::for_revision(Revision::Berlin);
    let london = StorageCostTable::for_revision(Revision::London);

    assert_eq!(istanbul[StorageStatus::Assigned].gas_cost, 800);
    assert_eq!(berlin[StorageStatus::Assigned].gas_cost, 100);
    assert_eq!(berlin[StorageStatus::Deleted].gas_refund, 15_000);
    assert_eq!(london[StorageStatus::Deleted].gas_refund, 4_800);
    assert_eq!(
        london,
        StorageCostTable::for_revision(Revision::Prague)
    );
}

#![no_main]

use arbitrary::Arbitrary;
use common::TokenRef;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};
use staking_pool::{StakingPool, StakingPoolClient, TransferBatch, TransferTx};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { amount: u32, stake_id: u8 },
    Income { amount: u32 },
    Advance { secs: u16 },
    Claim { stake_id: u8 },
    Withdraw { stake_id: u8 },
    WithdrawPartial { stake_id: u8, numerator: u8, denominator: u8 },
    Transfer { stake_id: u8, to: u8 },
}

const RELEASE_PERIOD: u64 = 1_000;

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let deposit_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let contract_id = env.register(StakingPool, ());
    let client = StakingPoolClient::new(&env, &contract_id);
    client.initialize(
        &soroban_sdk::vec![&env, Address::generate(&env)],
        &TokenRef::single(deposit_token.clone()),
        &TokenRef::single(reward_token.clone()),
        &RELEASE_PERIOD,
    );

    let users: Vec<Address> = (0..4).map(|_| Address::generate(&env)).collect();
    let mut income: i128 = 0;

    // Rejected calls are expected; a host panic or a broken balance is not.
    for (i, action) in actions.into_iter().enumerate() {
        let caller = &users[i % users.len()];
        match action {
            FuzzAction::Deposit { amount, stake_id } => {
                let amount = i128::from(amount);
                if amount > 0 {
                    StellarAssetClient::new(&env, &deposit_token).mint(caller, &amount);
                }
                let _ = client.try_deposit(caller, &amount, &u64::from(stake_id));
            }
            FuzzAction::Income { amount } => {
                let amount = i128::from(amount);
                if amount > 0 {
                    StellarAssetClient::new(&env, &reward_token).mint(&contract_id, &amount);
                    income += amount;
                }
            }
            FuzzAction::Advance { secs } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now + u64::from(secs));
            }
            FuzzAction::Claim { stake_id } => {
                let _ = client.try_claim(caller, &u64::from(stake_id));
            }
            FuzzAction::Withdraw { stake_id } => {
                let _ = client.try_withdraw(caller, &u64::from(stake_id));
            }
            FuzzAction::WithdrawPartial {
                stake_id,
                numerator,
                denominator,
            } => {
                let _ = client.try_withdraw_partial(
                    caller,
                    &u64::from(stake_id),
                    &u64::from(numerator),
                    &u64::from(denominator),
                );
            }
            FuzzAction::Transfer { stake_id, to } => {
                let batch = TransferBatch {
                    from: caller.clone(),
                    txs: soroban_sdk::vec![
                        &env,
                        TransferTx {
                            to: users[usize::from(to) % users.len()].clone(),
                            stake_id: u64::from(stake_id),
                            amount: 1,
                        },
                    ],
                };
                let _ = client.try_transfer(caller, &soroban_sdk::vec![&env, batch]);
            }
        }

        let rewards = TokenClient::new(&env, &reward_token);
        let held = rewards.balance(&contract_id);
        let paid: i128 = users.iter().map(|u| rewards.balance(u)).sum();
        assert_eq!(held + paid, income);
        assert!(client.get_last_rewards() <= held);
        assert_eq!(
            TokenClient::new(&env, &deposit_token).balance(&contract_id),
            client.get_total_stake()
        );
    }
});

extern crate std;

use common::{BalanceRequest, TokenRef};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    vec, Address, Env,
};

use crate::{
    ContractError, OperatorParam, OperatorUpdate, StakingPool, StakingPoolClient, TransferBatch,
    TransferTx,
};

fn setup() -> (Env, StakingPoolClient<'static>, Address, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let deposit_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let reward_token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();

    let client = StakingPoolClient::new(&env, &env.register(StakingPool, ()));
    client.initialize(
        &vec![&env, Address::generate(&env)],
        &TokenRef::single(deposit_token.clone()),
        &TokenRef::single(reward_token.clone()),
        &1_000,
    );
    (env, client, deposit_token, reward_token)
}

/// A fresh owner holding one stake of `amount`.
fn owner_with_stake(
    env: &Env,
    client: &StakingPoolClient,
    deposit_token: &Address,
    amount: i128,
) -> (Address, u64) {
    let owner = Address::generate(env);
    StellarAssetClient::new(env, deposit_token).mint(&owner, &amount);
    let id = client.deposit(&owner, &amount, &0);
    (owner, id)
}

fn batch(env: &Env, from: &Address, to: &Address, stake_id: u64, amount: i128) -> TransferBatch {
    TransferBatch {
        from: from.clone(),
        txs: vec![
            env,
            TransferTx {
                to: to.clone(),
                stake_id,
                amount,
            },
        ],
    }
}

// ── transfer ──────────────────────────────────────────────────────────────────

#[test]
fn test_owner_transfers_stake() {
    let (env, client, deposit_token, _) = setup();
    let (alice, id) = owner_with_stake(&env, &client, &deposit_token, 1_000);
    let bob = Address::generate(&env);

    client.transfer(&alice, &vec![&env, batch(&env, &alice, &bob, id, 1)]);

    assert_eq!(client.get_stake(&id).owner, bob);
    assert_eq!(client.get_owner_stakes(&alice).len(), 0);
    assert_eq!(client.get_owner_stakes(&bob), vec![&env, id]);
    assert_eq!(client.get_total_stake(), 1_000);
}

#[test]
fn test_unclaimed_rewards_travel_with_the_stake() {
    let (env, client, deposit_token, reward_token) = setup();
    let (alice, id) = owner_with_stake(&env, &client, &deposit_token, 1_000);
    let bob = Address::generate(&env);

    env.ledger().set_timestamp(1_000);
    StellarAssetClient::new(&env, &reward_token).mint(&client.address, &900);

    client.transfer(&alice, &vec![&env, batch(&env, &alice, &bob, id, 1)]);

    assert_eq!(
        client.try_claim(&alice, &id),
        Err(Ok(ContractError::NotOwner))
    );
    assert_eq!(client.claim(&bob, &id), 900);
    assert_eq!(TokenClient::new(&env, &reward_token).balance(&bob), 900);

    client.withdraw(&bob, &id);
    assert_eq!(TokenClient::new(&env, &deposit_token).balance(&bob), 1_000);
}

#[test]
fn test_operator_transfers_on_behalf_of_owner() {
    let (env, client, deposit_token, _) = setup();
    let (alice, id) = owner_with_stake(&env, &client, &deposit_token, 1_000);
    let operator = Address::generate(&env);
    let carol = Address::generate(&env);

    client.update_operators(
        &alice,
        &vec![
            &env,
            OperatorUpdate::AddOperator(OperatorParam {
                owner: alice.clone(),
                operator: operator.clone(),
                stake_id: id,
            }),
        ],
    );
    assert!(client.is_operator(&alice, &operator, &id));

    client.transfer(&operator, &vec![&env, batch(&env, &alice, &carol, id, 1)]);
    assert_eq!(client.get_stake(&id).owner, carol);
}

#[test]
fn test_removed_operator_loses_approval() {
    let (env, client, deposit_token, _) = setup();
    let (alice, id) = owner_with_stake(&env, &client, &deposit_token, 1_000);
    let operator = Address::generate(&env);
    let param = OperatorParam {
        owner: alice.clone(),
        operator: operator.clone(),
        stake_id: id,
    };

    client.update_operators(
        &alice,
        &vec![
            &env,
            OperatorUpdate::AddOperator(param.clone()),
            OperatorUpdate::RemoveOperator(param),
        ],
    );
    assert!(!client.is_operator(&alice, &operator, &id));

    assert_eq!(
        client.try_transfer(&operator, &vec![&env, batch(&env, &alice, &operator, id, 1)]),
        Err(Ok(ContractError::NotOperator))
    );
}

#[test]
fn test_transfer_revokes_previous_owners_operators() {
    let (env, client, deposit_token, _) = setup();
    let (alice, id) = owner_with_stake(&env, &client, &deposit_token, 1_000);
    let operator = Address::generate(&env);
    let bob = Address::generate(&env);

    client.update_operators(
        &alice,
        &vec![
            &env,
            OperatorUpdate::AddOperator(OperatorParam {
                owner: alice.clone(),
                operator: operator.clone(),
                stake_id: id,
            }),
        ],
    );

    client.transfer(&alice, &vec![&env, batch(&env, &alice, &bob, id, 1)]);
    assert!(!client.is_operator(&alice, &operator, &id));

    // Back with alice, the old approval stays gone.
    client.transfer(&bob, &vec![&env, batch(&env, &bob, &alice, id, 1)]);
    assert_eq!(client.get_stake(&id).owner, alice);
    assert!(!client.is_operator(&alice, &operator, &id));
    assert_eq!(
        client.try_transfer(&operator, &vec![&env, batch(&env, &alice, &operator, id, 1)]),
        Err(Ok(ContractError::NotOperator))
    );
}

#[test]
fn test_withdraw_revokes_operators() {
    let (env, client, deposit_token, _) = setup();
    let (alice, id) = owner_with_stake(&env, &client, &deposit_token, 1_000);
    let operator = Address::generate(&env);

    client.update_operators(
        &alice,
        &vec![
            &env,
            OperatorUpdate::AddOperator(OperatorParam {
                owner: alice.clone(),
                operator: operator.clone(),
                stake_id: id,
            }),
        ],
    );
    client.withdraw(&alice, &id);

    assert!(!client.is_operator(&alice, &operator, &id));
}

#[test]
fn test_operator_updates_must_name_the_sender() {
    let (env, client, deposit_token, _) = setup();
    let (alice, id) = owner_with_stake(&env, &client, &deposit_token, 1_000);
    let mallory = Address::generate(&env);

    let result = client.try_update_operators(
        &mallory,
        &vec![
            &env,
            OperatorUpdate::AddOperator(OperatorParam {
                owner: alice.clone(),
                operator: mallory.clone(),
                stake_id: id,
            }),
        ],
    );
    assert_eq!(result, Err(Ok(ContractError::NotOwner)));
    assert!(!client.is_operator(&alice, &mallory, &id));
}

#[test]
fn test_stranger_cannot_transfer() {
    let (env, client, deposit_token, _) = setup();
    let (alice, id) = owner_with_stake(&env, &client, &deposit_token, 1_000);
    let mallory = Address::generate(&env);

    match client.try_transfer(&mallory, &vec![&env, batch(&env, &alice, &mallory, id, 1)]) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NotOperator),
        _ => unreachable!("Expected NotOperator error"),
    }
    assert_eq!(client.get_stake(&id).owner, alice);
}

#[test]
fn test_transfer_amount_rules() {
    let (env, client, deposit_token, _) = setup();
    let (alice, id) = owner_with_stake(&env, &client, &deposit_token, 1_000);
    let (bob, bob_id) = owner_with_stake(&env, &client, &deposit_token, 1_000);

    // Zero is a no-op.
    client.transfer(&alice, &vec![&env, batch(&env, &alice, &bob, id, 0)]);
    assert_eq!(client.get_stake(&id).owner, alice);

    assert_eq!(
        client.try_transfer(&alice, &vec![&env, batch(&env, &alice, &bob, id, 2)]),
        Err(Ok(ContractError::InsufficientBalance))
    );
    assert_eq!(
        client.try_transfer(&alice, &vec![&env, batch(&env, &alice, &bob, id, -1)]),
        Err(Ok(ContractError::InvalidInput))
    );
    // Alice does not hold bob's stake.
    assert_eq!(
        client.try_transfer(&alice, &vec![&env, batch(&env, &alice, &alice, bob_id, 1)]),
        Err(Ok(ContractError::InsufficientBalance))
    );
    assert_eq!(
        client.try_transfer(&alice, &vec![&env, batch(&env, &alice, &bob, 77, 1)]),
        Err(Ok(ContractError::StakeNotFound))
    );
}

#[test]
fn test_failed_batch_rolls_back_earlier_moves() {
    let (env, client, deposit_token, _) = setup();
    let (alice, id) = owner_with_stake(&env, &client, &deposit_token, 1_000);
    let bob = Address::generate(&env);

    let batches = vec![
        &env,
        TransferBatch {
            from: alice.clone(),
            txs: vec![
                &env,
                TransferTx {
                    to: bob.clone(),
                    stake_id: id,
                    amount: 1,
                },
                TransferTx {
                    to: bob.clone(),
                    stake_id: 404,
                    amount: 1,
                },
            ],
        },
    ];
    assert_eq!(
        client.try_transfer(&alice, &batches),
        Err(Ok(ContractError::StakeNotFound))
    );
    assert_eq!(client.get_stake(&id).owner, alice);
}

// ── balance_of ────────────────────────────────────────────────────────────────

#[test]
fn test_balance_of_reports_ownership() {
    let (env, client, deposit_token, _) = setup();
    let (alice, id) = owner_with_stake(&env, &client, &deposit_token, 1_000);
    let bob = Address::generate(&env);

    let responses = client.balance_of(&vec![
        &env,
        BalanceRequest {
            owner: alice.clone(),
            token_id: id,
        },
        BalanceRequest {
            owner: bob.clone(),
            token_id: id,
        },
    ]);

    assert_eq!(responses.len(), 2);
    assert_eq!(responses.get(0).unwrap().balance, 1);
    assert_eq!(responses.get(0).unwrap().request.owner, alice);
    assert_eq!(responses.get(1).unwrap().balance, 0);

    assert_eq!(
        client.try_balance_of(&vec![
            &env,
            BalanceRequest {
                owner: bob,
                token_id: 999,
            },
        ]),
        Err(Ok(ContractError::StakeNotFound))
    );
}

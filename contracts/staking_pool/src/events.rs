#![allow(deprecated)] // events().publish migration tracked separately

use common::TokenRef;
use soroban_sdk::{symbol_short, Address, Env, Vec};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the pool is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub administrators: Vec<Address>,
    pub deposit_token: TokenRef,
    pub reward_token: TokenRef,
    pub max_release_period: u64,
    pub timestamp: u64,
}

/// Fired whenever newly observed income advances the discount factor.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IncomeSettledEvent {
    pub income: i128,
    pub disc_factor: i128,
    pub total_stake: i128,
    pub timestamp: u64,
}

/// Fired when the unvested part of a settlement is credited to the other
/// stakes. `weight` is the stake weight that received it, zero when the
/// forfeit is held back for later stakers.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForfeitRedistributedEvent {
    pub forfeit: i128,
    pub disc_factor: i128,
    pub weight: i128,
    pub timestamp: u64,
}

/// Fired when a deposit creates or tops up a stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub owner: Address,
    pub stake_id: u64,
    pub token_amount: i128,
    pub new_weight: i128,
    pub age_timestamp: u64,
    pub timestamp: u64,
}

/// Fired for every stake settlement that accrued a reward.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub owner: Address,
    pub stake_id: u64,
    pub accrued: i128,
    pub released: i128,
    pub timestamp: u64,
}

/// Fired when principal leaves the pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub owner: Address,
    pub stake_id: u64,
    pub principal: i128,
    pub remaining_weight: i128,
    pub timestamp: u64,
}

/// Fired when a position changes hands.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeTransferredEvent {
    pub from: Address,
    pub to: Address,
    pub stake_id: u64,
    pub timestamp: u64,
}

/// Fired when an operator approval is granted or revoked.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorUpdatedEvent {
    pub owner: Address,
    pub operator: Address,
    pub stake_id: u64,
    pub timestamp: u64,
}

/// Fired when governance changes the vesting duration.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MaxReleasePeriodSetEvent {
    pub max_release_period: u64,
    pub timestamp: u64,
}

/// Fired on every administrator registry change.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdministratorEvent {
    pub caller: Address,
    pub administrator: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    administrators: Vec<Address>,
    deposit_token: TokenRef,
    reward_token: TokenRef,
    max_release_period: u64,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            administrators,
            deposit_token,
            reward_token,
            max_release_period,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_income_settled(env: &Env, income: i128, disc_factor: i128, total_stake: i128) {
    env.events().publish(
        (symbol_short!("SETTLED"),),
        IncomeSettledEvent {
            income,
            disc_factor,
            total_stake,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_forfeit_redistributed(env: &Env, forfeit: i128, disc_factor: i128, weight: i128) {
    env.events().publish(
        (symbol_short!("FORFEIT"),),
        ForfeitRedistributedEvent {
            forfeit,
            disc_factor,
            weight,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposited(
    env: &Env,
    owner: Address,
    stake_id: u64,
    token_amount: i128,
    new_weight: i128,
    age_timestamp: u64,
) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), owner.clone()),
        DepositedEvent {
            owner,
            stake_id,
            token_amount,
            new_weight,
            age_timestamp,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_claimed(
    env: &Env,
    owner: Address,
    stake_id: u64,
    accrued: i128,
    released: i128,
) {
    env.events().publish(
        (symbol_short!("CLAIMED"), owner.clone()),
        RewardClaimedEvent {
            owner,
            stake_id,
            accrued,
            released,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(
    env: &Env,
    owner: Address,
    stake_id: u64,
    principal: i128,
    remaining_weight: i128,
) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), owner.clone()),
        WithdrawnEvent {
            owner,
            stake_id,
            principal,
            remaining_weight,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_stake_transferred(env: &Env, from: Address, to: Address, stake_id: u64) {
    env.events().publish(
        (symbol_short!("XFER"), from.clone()),
        StakeTransferredEvent {
            from,
            to,
            stake_id,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_operator_added(env: &Env, owner: Address, operator: Address, stake_id: u64) {
    env.events().publish(
        (symbol_short!("OP_ADD"), owner.clone()),
        OperatorUpdatedEvent {
            owner,
            operator,
            stake_id,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_operator_removed(env: &Env, owner: Address, operator: Address, stake_id: u64) {
    env.events().publish(
        (symbol_short!("OP_REM"), owner.clone()),
        OperatorUpdatedEvent {
            owner,
            operator,
            stake_id,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_max_release_period_set(env: &Env, max_release_period: u64) {
    env.events().publish(
        (symbol_short!("RLS_SET"),),
        MaxReleasePeriodSetEvent {
            max_release_period,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_administrator_proposed(env: &Env, caller: Address, administrator: Address) {
    env.events().publish(
        (symbol_short!("ADM_PROP"), caller.clone()),
        AdministratorEvent {
            caller,
            administrator,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_administrator_set(env: &Env, administrator: Address) {
    env.events().publish(
        (symbol_short!("ADM_SET"), administrator.clone()),
        AdministratorEvent {
            caller: administrator.clone(),
            administrator,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_administrator_removed(env: &Env, caller: Address, administrator: Address) {
    env.events().publish(
        (symbol_short!("ADM_REM"), caller.clone()),
        AdministratorEvent {
            caller,
            administrator,
            timestamp: env.ledger().timestamp(),
        },
    );
}

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::ContractError;

// ── Storage keys ────────────────────────────────────────────────────────────

const TOTAL_STAKE: Symbol = symbol_short!("TOT_STAKE");
const LAST_STAKE_ID: Symbol = symbol_short!("LAST_ID");

// Persistent entries use tuple keys: (prefix, ...)
const STAKE: Symbol = symbol_short!("STAKE");
const OWNER_INDEX: Symbol = symbol_short!("OWN_IDX");
const OPERATOR: Symbol = symbol_short!("OPERATOR");
const OPERATOR_INDEX: Symbol = symbol_short!("OPS_IDX");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

/// One staking position.
///
/// `checkpoint` is the discount factor at the stake's last full settlement;
/// `age_timestamp` is the weighted origin used for vesting.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Stake {
    pub owner: Address,
    pub weight: i128,
    pub checkpoint: i128,
    pub age_timestamp: u64,
}

fn stake_key(stake_id: u64) -> (Symbol, u64) {
    (STAKE, stake_id)
}

fn owner_key(owner: &Address) -> (Symbol, Address) {
    (OWNER_INDEX, owner.clone())
}

fn operator_key(owner: &Address, operator: &Address, stake_id: u64) -> (Symbol, Address, Address, u64) {
    (OPERATOR, owner.clone(), operator.clone(), stake_id)
}

fn operator_index_key(owner: &Address, stake_id: u64) -> (Symbol, Address, u64) {
    (OPERATOR_INDEX, owner.clone(), stake_id)
}

// ── Totals ──────────────────────────────────────────────────────────────────

pub fn total_stake(env: &Env) -> i128 {
    env.storage().instance().get(&TOTAL_STAKE).unwrap_or(0)
}

pub fn increase_total_stake(env: &Env, amount: i128) -> Result<i128, ContractError> {
    let total = total_stake(env)
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticError)?;
    env.storage().instance().set(&TOTAL_STAKE, &total);
    Ok(total)
}

pub fn decrease_total_stake(env: &Env, amount: i128) -> Result<i128, ContractError> {
    let total = total_stake(env)
        .checked_sub(amount)
        .filter(|total| *total >= 0)
        .ok_or(ContractError::ArithmeticError)?;
    env.storage().instance().set(&TOTAL_STAKE, &total);
    Ok(total)
}

pub fn last_stake_id(env: &Env) -> u64 {
    env.storage().instance().get(&LAST_STAKE_ID).unwrap_or(0)
}

/// Allocates a fresh stake id. Ids start at 1; 0 means "create new".
pub fn next_stake_id(env: &Env) -> Result<u64, ContractError> {
    let id = last_stake_id(env)
        .checked_add(1)
        .ok_or(ContractError::ArithmeticError)?;
    env.storage().instance().set(&LAST_STAKE_ID, &id);
    Ok(id)
}

// ── Stake records ───────────────────────────────────────────────────────────

pub fn get_stake(env: &Env, stake_id: u64) -> Option<Stake> {
    let key = stake_key(stake_id);
    let stake: Option<Stake> = env.storage().persistent().get(&key);
    if stake.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    stake
}

pub fn load_stake(env: &Env, stake_id: u64) -> Result<Stake, ContractError> {
    get_stake(env, stake_id).ok_or(ContractError::StakeNotFound)
}

/// Loads a stake and checks that `owner` holds it.
pub fn load_owned(env: &Env, stake_id: u64, owner: &Address) -> Result<Stake, ContractError> {
    let stake = load_stake(env, stake_id)?;
    if stake.owner != *owner {
        return Err(ContractError::NotOwner);
    }
    Ok(stake)
}

pub fn store_stake(env: &Env, stake_id: u64, stake: &Stake) {
    let key = stake_key(stake_id);
    env.storage().persistent().set(&key, stake);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Stores a new stake and registers it in its owner's index.
pub fn insert_stake(env: &Env, stake_id: u64, stake: &Stake) {
    store_stake(env, stake_id, stake);
    index_add(env, &stake.owner, stake_id);
}

/// Deletes a stake, drops it from its owner's index and revokes the owner's
/// operators for it.
pub fn remove_stake(env: &Env, stake_id: u64, stake: &Stake) {
    env.storage().persistent().remove(&stake_key(stake_id));
    index_remove(env, &stake.owner, stake_id);
    clear_operators(env, &stake.owner, stake_id);
}

/// Hands a stake to `to`. Weight, checkpoint and age are untouched; the
/// previous owner's operators lose their approval for it.
pub fn move_stake(env: &Env, stake_id: u64, stake: &mut Stake, to: &Address) {
    index_remove(env, &stake.owner, stake_id);
    clear_operators(env, &stake.owner, stake_id);
    stake.owner = to.clone();
    insert_stake(env, stake_id, stake);
}

// ── Owner index ─────────────────────────────────────────────────────────────

pub fn owner_stakes(env: &Env, owner: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&owner_key(owner))
        .unwrap_or(Vec::new(env))
}

fn index_add(env: &Env, owner: &Address, stake_id: u64) {
    let key = owner_key(owner);
    let mut ids = owner_stakes(env, owner);
    if ids.first_index_of(stake_id).is_none() {
        ids.push_back(stake_id);
    }
    env.storage().persistent().set(&key, &ids);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn index_remove(env: &Env, owner: &Address, stake_id: u64) {
    let key = owner_key(owner);
    let mut ids = owner_stakes(env, owner);
    if let Some(pos) = ids.first_index_of(stake_id) {
        ids.remove(pos);
    }
    if ids.is_empty() {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &ids);
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

// ── Operators ───────────────────────────────────────────────────────────────

pub fn set_operator(env: &Env, owner: &Address, operator: &Address, stake_id: u64, approved: bool) {
    let key = operator_key(owner, operator, stake_id);
    let index_key = operator_index_key(owner, stake_id);
    let mut operators: Vec<Address> = env
        .storage()
        .persistent()
        .get(&index_key)
        .unwrap_or(Vec::new(env));
    let position = operators.first_index_of(operator);

    if approved {
        env.storage().persistent().set(&key, &true);
        env.storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
        if position.is_none() {
            operators.push_back(operator.clone());
        }
    } else {
        env.storage().persistent().remove(&key);
        if let Some(pos) = position {
            operators.remove(pos);
        }
    }

    if operators.is_empty() {
        env.storage().persistent().remove(&index_key);
    } else {
        env.storage().persistent().set(&index_key, &operators);
        env.storage()
            .persistent()
            .extend_ttl(&index_key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

fn clear_operators(env: &Env, owner: &Address, stake_id: u64) {
    let index_key = operator_index_key(owner, stake_id);
    let operators: Vec<Address> = env
        .storage()
        .persistent()
        .get(&index_key)
        .unwrap_or(Vec::new(env));
    for operator in operators.iter() {
        env.storage()
            .persistent()
            .remove(&operator_key(owner, &operator, stake_id));
    }
    env.storage().persistent().remove(&index_key);
}

pub fn is_operator(env: &Env, owner: &Address, operator: &Address, stake_id: u64) -> bool {
    env.storage()
        .persistent()
        .has(&operator_key(owner, operator, stake_id))
}

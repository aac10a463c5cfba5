//! Discount-factor accumulator.
//!
//! The discount factor is the reward paid per unit of stake weight since pool
//! genesis, scaled by [`PRECISION`]. It starts at `PRECISION` and never
//! decreases. Income is the growth of the pool's own reward-token balance
//! over `last_rewards`:
//!
//! ```text
//! income     = current_rewards − last_rewards
//! numerator  = income × PRECISION + residue
//! increment  = numerator / total_stake
//! residue'   = numerator − increment × total_stake
//! ```
//!
//! `residue` keeps the scaled remainder of the floor division so that no
//! income is lost to rounding; it is attributed by a later settlement.
//!
//! Forfeited rewards are folded in by [`redistribute`] within the request
//! that forfeits them, over every stake weight except the settled slice.

use soroban_sdk::{symbol_short, Env, Symbol};

use crate::{events, ledger, ContractError};

/// Fixed-point scale of the discount factor (12 decimal places).
pub const PRECISION: i128 = 1_000_000_000_000;

const DISC_FACTOR: Symbol = symbol_short!("DISC_FACT");
const LAST_REWARDS: Symbol = symbol_short!("LAST_RWD");
const CURRENT_REWARDS: Symbol = symbol_short!("CUR_RWD");
const RESIDUE: Symbol = symbol_short!("RESIDUE");

/// Outcome of projecting newly observed income onto the accumulator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Projection {
    pub income: i128,
    pub increment: i128,
    pub residue: i128,
}

// ── Pure math ───────────────────────────────────────────────────────────────

/// Projects `observed − last` onto `total_stake` units of weight.
///
/// Returns `None` while no stake exists: the income stays parked in the
/// balance and is picked up by the first settlement with stake.
pub fn project(
    observed: i128,
    last: i128,
    total_stake: i128,
    residue: i128,
) -> Result<Option<Projection>, ContractError> {
    if observed < last {
        return Err(ContractError::RewardBalanceDecreased);
    }
    if total_stake <= 0 {
        return Ok(None);
    }
    let income = observed - last;
    let numerator = income
        .checked_mul(PRECISION)
        .and_then(|scaled| scaled.checked_add(residue))
        .ok_or(ContractError::ArithmeticError)?;
    let increment = numerator / total_stake;
    Ok(Some(Projection {
        income,
        increment,
        residue: numerator - increment * total_stake,
    }))
}

/// Reward accrued by `weight` units between `checkpoint` and `disc_factor`.
pub fn accrued(weight: i128, disc_factor: i128, checkpoint: i128) -> Result<i128, ContractError> {
    let growth = disc_factor
        .checked_sub(checkpoint)
        .filter(|growth| *growth >= 0)
        .ok_or(ContractError::ArithmeticError)?;
    weight
        .checked_mul(growth)
        .map(|scaled| scaled / PRECISION)
        .ok_or(ContractError::ArithmeticError)
}

// ── Storage ─────────────────────────────────────────────────────────────────

pub fn init(env: &Env) {
    let storage = env.storage().instance();
    storage.set(&DISC_FACTOR, &PRECISION);
    storage.set(&LAST_REWARDS, &0i128);
    storage.set(&CURRENT_REWARDS, &0i128);
    storage.set(&RESIDUE, &0i128);
}

pub fn disc_factor(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DISC_FACTOR)
        .unwrap_or(PRECISION)
}

pub fn last_rewards(env: &Env) -> i128 {
    env.storage().instance().get(&LAST_REWARDS).unwrap_or(0)
}

pub fn set_last_rewards(env: &Env, value: i128) {
    env.storage().instance().set(&LAST_REWARDS, &value);
}

pub fn current_rewards(env: &Env) -> i128 {
    env.storage().instance().get(&CURRENT_REWARDS).unwrap_or(0)
}

pub fn set_current_rewards(env: &Env, value: i128) {
    env.storage().instance().set(&CURRENT_REWARDS, &value);
}

pub fn residue(env: &Env) -> i128 {
    env.storage().instance().get(&RESIDUE).unwrap_or(0)
}

/// Folds the income observed in `current_rewards` into the discount factor.
pub fn settle_income(env: &Env) -> Result<(), ContractError> {
    let total_stake = ledger::total_stake(env);
    let observed = current_rewards(env);
    let Some(projection) = project(observed, last_rewards(env), total_stake, residue(env))? else {
        return Ok(());
    };

    let disc = disc_factor(env)
        .checked_add(projection.increment)
        .ok_or(ContractError::ArithmeticError)?;

    let storage = env.storage().instance();
    storage.set(&DISC_FACTOR, &disc);
    storage.set(&LAST_REWARDS, &observed);
    storage.set(&RESIDUE, &projection.residue);

    if projection.income > 0 {
        events::publish_income_settled(env, projection.income, disc, total_stake);
    }
    Ok(())
}

/// Credits a settlement's unvested `forfeit` to `weight` units of stake.
///
/// The forfeit goes back into `last_rewards` so it is never seen as fresh
/// income. With no `weight` to receive it, it stays unattributed until the
/// pool empties and [`sweep`] hands it to the next stakers.
pub fn redistribute(env: &Env, forfeit: i128, weight: i128) -> Result<(), ContractError> {
    if forfeit <= 0 {
        return Ok(());
    }
    let last = last_rewards(env);
    let observed = last
        .checked_add(forfeit)
        .ok_or(ContractError::ArithmeticError)?;

    let mut disc = disc_factor(env);
    if let Some(projection) = project(observed, last, weight, residue(env))? {
        disc = disc
            .checked_add(projection.increment)
            .ok_or(ContractError::ArithmeticError)?;
        let storage = env.storage().instance();
        storage.set(&DISC_FACTOR, &disc);
        storage.set(&RESIDUE, &projection.residue);
    }
    set_last_rewards(env, observed);

    events::publish_forfeit_redistributed(env, forfeit, disc, weight);
    Ok(())
}

/// Resets the income baseline once the last stake has left, turning whatever
/// the pool still holds into income for the next stakers.
pub fn sweep(env: &Env) {
    set_last_rewards(env, 0);
    env.storage().instance().set(&RESIDUE, &0i128);
}

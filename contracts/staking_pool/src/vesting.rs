use soroban_sdk::{Address, Env};

use crate::{accumulator, events, ledger::{self, Stake}, ContractError, PoolConfig};

/// Result of settling (part of) a stake against the discount factor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Settlement {
    pub accrued: i128,
    pub released: i128,
}

// ── Pure math ───────────────────────────────────────────────────────────────

/// Vesting age of a stake, capped at the release period.
pub fn capped_age(now: u64, age_timestamp: u64, max_release_period: u64) -> u64 {
    now.saturating_sub(age_timestamp).min(max_release_period)
}

/// Linear release: `accrued × age / max_release_period`, floored.
pub fn released(accrued: i128, age: u64, max_release_period: u64) -> Result<i128, ContractError> {
    if max_release_period == 0 {
        return Err(ContractError::InvalidInput);
    }
    let age = age.min(max_release_period);
    accrued
        .checked_mul(i128::from(age))
        .map(|scaled| scaled / i128::from(max_release_period))
        .ok_or(ContractError::ArithmeticError)
}

/// Age timestamp of a stake after growing from `old_weight` to `new_weight`.
///
/// The old weight keeps its (capped) age, the added weight starts at zero,
/// and the result is their weighted average:
/// `now − old_weight × age / new_weight`.
pub fn blended_age_timestamp(
    now: u64,
    old_weight: i128,
    age: u64,
    new_weight: i128,
) -> Result<u64, ContractError> {
    if new_weight <= 0 || old_weight < 0 || old_weight > new_weight {
        return Err(ContractError::ArithmeticError);
    }
    let elapsed = old_weight
        .checked_mul(i128::from(age))
        .map(|scaled| scaled / new_weight)
        .ok_or(ContractError::ArithmeticError)?;
    let elapsed = u64::try_from(elapsed).map_err(|_| ContractError::ArithmeticError)?;
    now.checked_sub(elapsed).ok_or(ContractError::ArithmeticError)
}

// ── Stake settlement ────────────────────────────────────────────────────────

/// Settles `slice` units of `stake` and pays the vested reward to `recipient`.
///
/// The whole accrued amount leaves `last_rewards` and the released part
/// leaves the pool. The forfeited remainder is credited to every other unit
/// of stake weight before this call returns, so settling the same weight
/// again within one timestamp finds nothing. The checkpoint advances past
/// that credit only when the full weight is settled; a partial slice leaves
/// the remaining weight's accrual pending, forfeit share included.
pub fn settle_stake(
    env: &Env,
    config: &PoolConfig,
    stake_id: u64,
    stake: &mut Stake,
    slice: i128,
    recipient: &Address,
) -> Result<Settlement, ContractError> {
    if slice < 0 || slice > stake.weight {
        return Err(ContractError::ArithmeticError);
    }
    let accrued = accumulator::accrued(slice, accumulator::disc_factor(env), stake.checkpoint)?;
    let age = capped_age(
        env.ledger().timestamp(),
        stake.age_timestamp,
        config.max_release_period,
    );
    let released = released(accrued, age, config.max_release_period)?;

    if accrued > 0 {
        let last = accumulator::last_rewards(env)
            .checked_sub(accrued)
            .filter(|last| *last >= 0)
            .ok_or(ContractError::ArithmeticError)?;
        accumulator::set_last_rewards(env, last);

        common::transfer(
            env,
            &config.reward_token,
            &env.current_contract_address(),
            recipient,
            released,
        )?;
        events::publish_reward_claimed(env, stake.owner.clone(), stake_id, accrued, released);

        let others = ledger::total_stake(env)
            .checked_sub(slice)
            .ok_or(ContractError::ArithmeticError)?;
        accumulator::redistribute(env, accrued - released, others)?;
    }

    if slice == stake.weight {
        stake.checkpoint = accumulator::disc_factor(env);
    }

    Ok(Settlement { accrued, released })
}

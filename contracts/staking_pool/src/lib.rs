#![no_std]

pub mod accumulator;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod reconcile;
pub mod vesting;

#[cfg(test)]
mod test_positions;

use common::{administrable, AdministratorState, BalanceRequest, BalanceResponse, TokenRef};
use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Address, Env, Symbol, Vec};

pub use errors::{ContractError, ErrorCategory};
pub use ledger::Stake;

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Public-facing types ──────────────────────────────────────────────────────

/// Pool configuration, fixed at `initialize` except for the release period.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    pub deposit_token: TokenRef,
    pub reward_token: TokenRef,
    /// Vesting duration in seconds.
    pub max_release_period: u64,
}

/// What a (partial) withdrawal paid out.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawReceipt {
    pub principal: i128,
    pub reward: i128,
    pub remaining_weight: i128,
}

/// Read-only preview of what `claim` would settle right now.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimPreview {
    pub accrued: i128,
    pub released: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OperatorParam {
    pub owner: Address,
    pub operator: Address,
    pub stake_id: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OperatorUpdate {
    AddOperator(OperatorParam),
    RemoveOperator(OperatorParam),
}

/// A single position move. `amount` is 0 (no-op) or 1 (the whole stake).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferTx {
    pub to: Address,
    pub stake_id: u64,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferBatch {
    pub from: Address,
    pub txs: Vec<TransferTx>,
}

pub(crate) fn load_config(env: &Env) -> Result<PoolConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingPool;

#[contractimpl]
impl StakingPool {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the pool.
    ///
    /// * `administrators`     – initial active administrators (non-empty).
    /// * `deposit_token`      – asset locked by stakers.
    /// * `reward_token`       – asset whose balance growth is distributed.
    /// * `max_release_period` – vesting duration in seconds (> 0).
    pub fn initialize(
        env: Env,
        administrators: Vec<Address>,
        deposit_token: TokenRef,
        reward_token: TokenRef,
        max_release_period: u64,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if max_release_period == 0 {
            return Err(ContractError::InvalidInput);
        }
        if deposit_token.same_asset(&reward_token) {
            return Err(ContractError::TokensIdentical);
        }

        administrable::init_administrators(&env, &administrators)?;

        let config = PoolConfig {
            deposit_token: deposit_token.clone(),
            reward_token: reward_token.clone(),
            max_release_period,
        };
        env.storage().instance().set(&CONFIG, &config);
        env.storage().instance().set(&INITIALIZED, &true);
        accumulator::init(&env);
        Self::extend_instance_ttl(&env);

        events::publish_initialized(
            &env,
            administrators,
            deposit_token,
            reward_token,
            max_release_period,
        );

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `token_amount` into stake `stake_id`, or into a new stake when
    /// `stake_id` is 0. Returns the id of the stake that received the deposit.
    ///
    /// Topping up an existing stake settles it at its current weight first,
    /// so the fresh amount has no share in what that settlement forfeits,
    /// and then blends its age with the fresh, unaged amount.
    pub fn deposit(
        env: Env,
        sender: Address,
        token_amount: i128,
        stake_id: u64,
    ) -> Result<u64, ContractError> {
        Self::require_initialized(&env)?;
        sender.require_auth();

        if token_amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        reconcile::begin(&env, &sender)?;
        Self::internal_deposit(&env, &env.current_contract_address(), token_amount, stake_id)
    }

    /// Settle stake `stake_id` and pay out its vested reward.
    ///
    /// The unvested part is credited to the other stakes. Returns the amount
    /// paid.
    pub fn claim(env: Env, sender: Address, stake_id: u64) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        sender.require_auth();

        reconcile::begin(&env, &sender)?;
        Self::internal_claim(&env, &env.current_contract_address(), stake_id)
    }

    /// Settle stake `stake_id`, return its whole principal and delete it.
    pub fn withdraw(
        env: Env,
        sender: Address,
        stake_id: u64,
    ) -> Result<WithdrawReceipt, ContractError> {
        Self::require_initialized(&env)?;
        sender.require_auth();

        reconcile::begin(&env, &sender)?;
        Self::internal_withdraw(&env, &env.current_contract_address(), stake_id, 1, 1)
    }

    /// Withdraw `ratio_numerator / ratio_denominator` of stake `stake_id`.
    ///
    /// Only the withdrawn slice is settled; the remaining weight keeps its
    /// checkpoint and age.
    pub fn withdraw_partial(
        env: Env,
        sender: Address,
        stake_id: u64,
        ratio_numerator: u64,
        ratio_denominator: u64,
    ) -> Result<WithdrawReceipt, ContractError> {
        Self::require_initialized(&env)?;
        sender.require_auth();

        if ratio_denominator == 0 {
            return Err(ContractError::InvalidInput);
        }
        if ratio_numerator > ratio_denominator {
            return Err(ContractError::InvalidRatio);
        }

        reconcile::begin(&env, &sender)?;
        Self::internal_withdraw(
            &env,
            &env.current_contract_address(),
            stake_id,
            ratio_numerator,
            ratio_denominator,
        )
    }

    // ── Positions ───────────────────────────────────────────────────────────

    /// Grant or revoke operators. Every update must name `sender` as owner.
    pub fn update_operators(
        env: Env,
        sender: Address,
        updates: Vec<OperatorUpdate>,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        sender.require_auth();

        for update in updates.iter() {
            match update {
                OperatorUpdate::AddOperator(param) => {
                    if param.owner != sender {
                        return Err(ContractError::NotOwner);
                    }
                    ledger::set_operator(&env, &param.owner, &param.operator, param.stake_id, true);
                    events::publish_operator_added(&env, param.owner, param.operator, param.stake_id);
                }
                OperatorUpdate::RemoveOperator(param) => {
                    if param.owner != sender {
                        return Err(ContractError::NotOwner);
                    }
                    ledger::set_operator(&env, &param.owner, &param.operator, param.stake_id, false);
                    events::publish_operator_removed(
                        &env,
                        param.owner,
                        param.operator,
                        param.stake_id,
                    );
                }
            }
        }
        Ok(())
    }

    /// Move whole stakes between owners.
    ///
    /// `sender` must be each batch's `from` or an operator `from` approved
    /// for the stake. A moved stake keeps its unclaimed rewards; the previous
    /// owner's operators lose their approval for it.
    pub fn transfer(
        env: Env,
        sender: Address,
        batches: Vec<TransferBatch>,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        sender.require_auth();

        for batch in batches.iter() {
            for tx in batch.txs.iter() {
                let mut stake = ledger::load_stake(&env, tx.stake_id)?;
                if batch.from != sender
                    && !ledger::is_operator(&env, &batch.from, &sender, tx.stake_id)
                {
                    return Err(ContractError::NotOperator);
                }
                if tx.amount < 0 {
                    return Err(ContractError::InvalidInput);
                }
                if tx.amount == 0 {
                    continue;
                }
                if tx.amount != 1 || stake.owner != batch.from {
                    return Err(ContractError::InsufficientBalance);
                }
                if tx.to == batch.from {
                    continue;
                }

                ledger::move_stake(&env, tx.stake_id, &mut stake, &tx.to);
                events::publish_stake_transferred(&env, batch.from.clone(), tx.to, tx.stake_id);
            }
        }
        Ok(())
    }

    /// Position balances: 1 when `owner` holds stake `token_id`, else 0.
    pub fn balance_of(
        env: Env,
        requests: Vec<BalanceRequest>,
    ) -> Result<Vec<BalanceResponse>, ContractError> {
        let mut responses = Vec::new(&env);
        for request in requests.iter() {
            let stake = ledger::load_stake(&env, request.token_id)?;
            let balance = if stake.owner == request.owner { 1 } else { 0 };
            responses.push_back(BalanceResponse { request, balance });
        }
        Ok(responses)
    }

    // ── Governance ──────────────────────────────────────────────────────────

    /// Change the vesting duration. Administrators only.
    pub fn update_max_release_period(
        env: Env,
        caller: Address,
        max_release_period: u64,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        administrable::verify_is_admin(&env, &caller)?;

        if max_release_period == 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut config = load_config(&env)?;
        config.max_release_period = max_release_period;
        env.storage().instance().set(&CONFIG, &config);

        events::publish_max_release_period_set(&env, max_release_period);
        Ok(())
    }

    pub fn propose_administrator(
        env: Env,
        caller: Address,
        administrator: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        administrable::propose_administrator(&env, &caller, &administrator)?;

        events::publish_administrator_proposed(&env, caller, administrator);
        Ok(())
    }

    /// Accept a pending administrator proposal for `caller`.
    pub fn set_administrator(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        administrable::set_administrator(&env, &caller)?;

        events::publish_administrator_set(&env, caller);
        Ok(())
    }

    pub fn remove_administrator(
        env: Env,
        caller: Address,
        administrator: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        administrable::remove_administrator(&env, &caller, &administrator)?;

        events::publish_administrator_removed(&env, caller, administrator);
        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    pub fn get_disc_factor(env: Env) -> i128 {
        accumulator::disc_factor(&env)
    }

    pub fn get_total_stake(env: Env) -> i128 {
        ledger::total_stake(&env)
    }

    pub fn get_stake(env: Env, stake_id: u64) -> Result<Stake, ContractError> {
        ledger::load_stake(&env, stake_id)
    }

    pub fn get_owner_stakes(env: Env, owner: Address) -> Vec<u64> {
        ledger::owner_stakes(&env, &owner)
    }

    pub fn get_max_release_period(env: Env) -> Result<u64, ContractError> {
        Ok(load_config(&env)?.max_release_period)
    }

    pub fn get_administrator_state(env: Env, administrator: Address) -> Option<AdministratorState> {
        administrable::get_state(&env, &administrator)
    }

    pub fn get_last_stake_id(env: Env) -> u64 {
        ledger::last_stake_id(&env)
    }

    /// Reward balance already accounted for by the accumulator.
    pub fn get_last_rewards(env: Env) -> i128 {
        accumulator::last_rewards(&env)
    }

    pub fn is_operator(env: Env, owner: Address, operator: Address, stake_id: u64) -> bool {
        ledger::is_operator(&env, &owner, &operator, stake_id)
    }

    pub fn get_config(env: Env) -> Result<PoolConfig, ContractError> {
        load_config(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    /// Return what claiming `stake_id` would settle now, without mutating
    /// state. Income not yet observed by the pool is included.
    pub fn get_claimable(env: Env, stake_id: u64) -> Result<ClaimPreview, ContractError> {
        let config = load_config(&env)?;
        let stake = ledger::load_stake(&env, stake_id)?;

        let observed = common::balance(&env, &config.reward_token, &env.current_contract_address());
        let disc = match accumulator::project(
            observed,
            accumulator::last_rewards(&env),
            ledger::total_stake(&env),
            accumulator::residue(&env),
        )? {
            Some(projection) => accumulator::disc_factor(&env)
                .checked_add(projection.increment)
                .ok_or(ContractError::ArithmeticError)?,
            None => accumulator::disc_factor(&env),
        };

        let accrued = accumulator::accrued(stake.weight, disc, stake.checkpoint)?;
        let age = vesting::capped_age(
            env.ledger().timestamp(),
            stake.age_timestamp,
            config.max_release_period,
        );
        let released = vesting::released(accrued, age, config.max_release_period)?;

        Ok(ClaimPreview { accrued, released })
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Self::extend_instance_ttl(env);
        Ok(())
    }

    fn extend_instance_ttl(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

// ── Continuations ────────────────────────────────────────────────────────────
//
// Each continuation runs after `reconcile::begin` and opens with
// `reconcile::resume`, which rejects any invoker other than the pool, closes
// the in-flight slot and settles income.

impl StakingPool {
    pub(crate) fn internal_deposit(
        env: &Env,
        invoker: &Address,
        token_amount: i128,
        stake_id: u64,
    ) -> Result<u64, ContractError> {
        let sender = reconcile::resume(env, invoker)?;
        let config = load_config(env)?;
        let now = env.ledger().timestamp();

        let (stake_id, stake) = if stake_id == 0 {
            let stake = Stake {
                owner: sender.clone(),
                weight: token_amount,
                checkpoint: accumulator::disc_factor(env),
                age_timestamp: now,
            };
            let id = ledger::next_stake_id(env)?;
            ledger::insert_stake(env, id, &stake);
            (id, stake)
        } else {
            let mut stake = ledger::load_owned(env, stake_id, &sender)?;
            let old_weight = stake.weight;
            vesting::settle_stake(env, &config, stake_id, &mut stake, old_weight, &sender)?;

            let age = vesting::capped_age(now, stake.age_timestamp, config.max_release_period);
            let new_weight = old_weight
                .checked_add(token_amount)
                .ok_or(ContractError::ArithmeticError)?;
            stake.age_timestamp = vesting::blended_age_timestamp(now, old_weight, age, new_weight)?;
            stake.weight = new_weight;
            ledger::store_stake(env, stake_id, &stake);
            (stake_id, stake)
        };

        common::transfer(
            env,
            &config.deposit_token,
            &sender,
            &env.current_contract_address(),
            token_amount,
        )?;
        ledger::increase_total_stake(env, token_amount)?;

        events::publish_deposited(
            env,
            sender,
            stake_id,
            token_amount,
            stake.weight,
            stake.age_timestamp,
        );

        Ok(stake_id)
    }

    pub(crate) fn internal_claim(
        env: &Env,
        invoker: &Address,
        stake_id: u64,
    ) -> Result<i128, ContractError> {
        let sender = reconcile::resume(env, invoker)?;
        let config = load_config(env)?;

        let mut stake = ledger::load_owned(env, stake_id, &sender)?;
        let weight = stake.weight;
        let settlement = vesting::settle_stake(env, &config, stake_id, &mut stake, weight, &sender)?;
        ledger::store_stake(env, stake_id, &stake);

        Ok(settlement.released)
    }

    pub(crate) fn internal_withdraw(
        env: &Env,
        invoker: &Address,
        stake_id: u64,
        ratio_numerator: u64,
        ratio_denominator: u64,
    ) -> Result<WithdrawReceipt, ContractError> {
        let sender = reconcile::resume(env, invoker)?;
        let config = load_config(env)?;

        let mut stake = ledger::load_owned(env, stake_id, &sender)?;
        let slice = stake
            .weight
            .checked_mul(i128::from(ratio_numerator))
            .and_then(|scaled| scaled.checked_div(i128::from(ratio_denominator)))
            .ok_or(ContractError::ArithmeticError)?;

        let settlement = vesting::settle_stake(env, &config, stake_id, &mut stake, slice, &sender)?;

        stake.weight -= slice;
        if stake.weight == 0 {
            ledger::remove_stake(env, stake_id, &stake);
        } else {
            ledger::store_stake(env, stake_id, &stake);
        }

        let total = ledger::decrease_total_stake(env, slice)?;
        if total == 0 {
            accumulator::sweep(env);
        }

        common::transfer(
            env,
            &config.deposit_token,
            &env.current_contract_address(),
            &sender,
            slice,
        )?;

        events::publish_withdrawn(env, sender, stake_id, slice, stake.weight);

        Ok(WithdrawReceipt {
            principal: slice,
            reward: settlement.released,
            remaining_weight: stake.weight,
        })
    }
}

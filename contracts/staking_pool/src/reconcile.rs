//! Two-phase reward reconciliation.
//!
//! A public entry point opens the pool's single in-flight request slot with
//! [`begin`], which asks the reward token for the pool's balance and routes
//! the answer to [`on_reward_balance`]. The business continuation then calls
//! [`resume`], which closes the slot and settles the accumulator before the
//! operation itself runs.
//!
//! Each phase keeps its own guard: the balance must come from the configured
//! reward token and describe the pool itself, and only the pool may resume.
//!
//! `common::query_balance` always reports the queried token as the
//! responder, so the responder check in [`on_reward_balance`] never fails
//! on a request opened by [`begin`]. It only rejects direct calls made with
//! a foreign responder.

use common::BalanceResponse;
use soroban_sdk::{symbol_short, Address, Env, Symbol, Vec};

use crate::{accumulator, load_config, ContractError};

const SENDER: Symbol = symbol_short!("RQ_SENDER");

pub fn pending_sender(env: &Env) -> Option<Address> {
    env.storage().instance().get(&SENDER)
}

/// Opens a request for `sender` and records the pool's reward balance.
pub fn begin(env: &Env, sender: &Address) -> Result<(), ContractError> {
    if env.storage().instance().has(&SENDER) {
        return Err(ContractError::RequestInProgress);
    }
    let config = load_config(env)?;
    env.storage().instance().set(&SENDER, sender);

    common::query_balance(
        env,
        &config.reward_token,
        &env.current_contract_address(),
        |responder, responses| on_reward_balance(env, responder, responses),
    )
}

/// Balance callback. Stores the observed balance as `current_rewards`.
pub fn on_reward_balance(
    env: &Env,
    responder: &Address,
    responses: Vec<BalanceResponse>,
) -> Result<(), ContractError> {
    let config = load_config(env)?;
    if *responder != config.reward_token.address {
        return Err(ContractError::InvalidSender);
    }
    if !env.storage().instance().has(&SENDER) {
        return Err(ContractError::NoPendingRequest);
    }

    let response = responses
        .get(0)
        .ok_or(ContractError::InvalidBalanceRequest)?;
    if response.request.owner != env.current_contract_address()
        || response.request.token_id != config.reward_token.token_id
        || response.balance < 0
    {
        return Err(ContractError::InvalidBalanceRequest);
    }

    accumulator::set_current_rewards(env, response.balance);
    Ok(())
}

/// Closes the open request and settles income. Returns the original sender.
pub fn resume(env: &Env, invoker: &Address) -> Result<Address, ContractError> {
    if *invoker != env.current_contract_address() {
        return Err(ContractError::NotInternal);
    }
    let sender = pending_sender(env).ok_or(ContractError::NoPendingRequest)?;
    env.storage().instance().remove(&SENDER);

    accumulator::settle_income(env)?;
    Ok(sender)
}

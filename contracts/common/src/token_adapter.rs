use soroban_sdk::{contractclient, contracttype, token, vec, Address, Env, Vec};

use crate::CommonError;

// ── Token references ─────────────────────────────────────────────────────────

/// Which token interface a [`TokenRef`] speaks.
///
/// - `Single` – a SEP-41 fungible token; `token_id` is ignored.
/// - `Multi`  – a multi-asset contract holding many fungible assets, each
///              addressed by a `u64` token id.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum TokenStandard {
    Single = 1,
    Multi = 2,
}

/// A fungible asset the pool moves or observes.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenRef {
    pub address: Address,
    pub token_id: u64,
    pub standard: TokenStandard,
}

impl TokenRef {
    pub fn single(address: Address) -> Self {
        Self {
            address,
            token_id: 0,
            standard: TokenStandard::Single,
        }
    }

    pub fn multi(address: Address, token_id: u64) -> Self {
        Self {
            address,
            token_id,
            standard: TokenStandard::Multi,
        }
    }

    /// True when both references resolve to the same on-chain asset.
    ///
    /// Token ids only discriminate between two multi-asset references.
    pub fn same_asset(&self, other: &TokenRef) -> bool {
        if self.address != other.address {
            return false;
        }
        match (self.standard, other.standard) {
            (TokenStandard::Multi, TokenStandard::Multi) => self.token_id == other.token_id,
            _ => true,
        }
    }
}

// ── Balance query types ──────────────────────────────────────────────────────

/// One `(owner, token_id)` balance lookup.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BalanceRequest {
    pub owner: Address,
    pub token_id: u64,
}

/// Answer to a [`BalanceRequest`], echoing the request it answers.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BalanceResponse {
    pub request: BalanceRequest,
    pub balance: i128,
}

// ── Multi-asset interface ────────────────────────────────────────────────────

/// The subset of a multi-asset token contract the adapter relies on.
#[contractclient(name = "MultiTokenClient")]
pub trait MultiTokenInterface {
    fn transfer(env: Env, from: Address, to: Address, token_id: u64, amount: i128);
    fn balance(env: Env, owner: Address, token_id: u64) -> i128;
}

// ── Adapter ──────────────────────────────────────────────────────────────────

/// Moves `amount` of `token` from `from` to `to`.
///
/// A zero amount is a no-op; a negative one is rejected before any
/// cross-contract call is made.
pub fn transfer(
    env: &Env,
    token: &TokenRef,
    from: &Address,
    to: &Address,
    amount: i128,
) -> Result<(), CommonError> {
    if amount < 0 {
        return Err(CommonError::NegativeAmount);
    }
    if amount == 0 {
        return Ok(());
    }
    match token.standard {
        TokenStandard::Single => {
            token::Client::new(env, &token.address).transfer(from, to, &amount);
        }
        TokenStandard::Multi => {
            MultiTokenClient::new(env, &token.address).transfer(
                from,
                to,
                &token.token_id,
                &amount,
            );
        }
    }
    Ok(())
}

/// Reads `owner`'s balance of `token`.
pub fn balance(env: &Env, token: &TokenRef, owner: &Address) -> i128 {
    match token.standard {
        TokenStandard::Single => token::Client::new(env, &token.address).balance(owner),
        TokenStandard::Multi => {
            MultiTokenClient::new(env, &token.address).balance(owner, &token.token_id)
        }
    }
}

/// Queries `owner`'s balance of `token` and delivers the answer to
/// `callback` as `(responder, responses)`.
///
/// The responder is always the token contract that was asked, so the
/// receiving side can check it against its own configuration.
pub fn query_balance<R>(
    env: &Env,
    token: &TokenRef,
    owner: &Address,
    callback: impl FnOnce(&Address, Vec<BalanceResponse>) -> R,
) -> R {
    let response = BalanceResponse {
        request: BalanceRequest {
            owner: owner.clone(),
            token_id: token.token_id,
        },
        balance: balance(env, token, owner),
    };
    callback(&token.address, vec![env, response])
}

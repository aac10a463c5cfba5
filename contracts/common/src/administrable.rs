use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::CommonError;

// ── Storage Keys ─────────────────────────────────────────────────────────────

const ADMIN_STATE_PREFIX: Symbol = symbol_short!("ADM_STATE");
const ADMINS_SEEDED: Symbol = symbol_short!("ADM_SEED");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

// ── Administrator State ──────────────────────────────────────────────────────

/// Two-step administrator lifecycle.
///
/// - `Proposed` – nominated by an active administrator, not yet accepted.
///                Holds no privileges.
/// - `Set`      – accepted; passes `verify_is_admin`.
///
/// Addresses without an entry are not administrators at all.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AdministratorState {
    Proposed = 0,
    Set = 1,
}

// ── Storage Helpers ──────────────────────────────────────────────────────────

fn admin_state_key(admin: &Address) -> (Symbol, Address) {
    (ADMIN_STATE_PREFIX, admin.clone())
}

fn extend_ttl(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn set_state(env: &Env, admin: &Address, state: AdministratorState) {
    let key = admin_state_key(admin);
    env.storage().persistent().set(&key, &state);
    extend_ttl(env, &key);
}

// ── Core Functions ───────────────────────────────────────────────────────────

/// Seeds the registry with the initial set of active administrators.
///
/// Fails with `InvalidInput` for an empty list and `AlreadyInitialized` when
/// the registry was seeded before.
pub fn init_administrators(env: &Env, administrators: &Vec<Address>) -> Result<(), CommonError> {
    if env.storage().instance().has(&ADMINS_SEEDED) {
        return Err(CommonError::AlreadyInitialized);
    }
    if administrators.is_empty() {
        return Err(CommonError::InvalidInput);
    }
    for admin in administrators.iter() {
        set_state(env, &admin, AdministratorState::Set);
    }
    env.storage().instance().set(&ADMINS_SEEDED, &true);
    Ok(())
}

/// Retrieves the administrator state of an address, if any.
pub fn get_state(env: &Env, admin: &Address) -> Option<AdministratorState> {
    let key = admin_state_key(admin);
    let state: Option<AdministratorState> = env.storage().persistent().get(&key);
    if state.is_some() {
        extend_ttl(env, &key);
    }
    state
}

/// Returns true only for accepted (`Set`) administrators.
pub fn is_admin(env: &Env, admin: &Address) -> bool {
    get_state(env, admin) == Some(AdministratorState::Set)
}

/// Guard: fails unless `caller` is an active administrator.
///
/// The caller must have already been authenticated via `require_auth()`.
pub fn verify_is_admin(env: &Env, caller: &Address) -> Result<(), CommonError> {
    if !env.storage().instance().has(&ADMINS_SEEDED) {
        return Err(CommonError::NotInitialized);
    }
    if !is_admin(env, caller) {
        return Err(CommonError::AccessDenied);
    }
    Ok(())
}

// ── Propose / Accept / Remove ────────────────────────────────────────────────

/// Nominates `proposed` as an administrator.
///
/// Only an active administrator may call this. Proposing an address that is
/// already active leaves it active.
pub fn propose_administrator(
    env: &Env,
    caller: &Address,
    proposed: &Address,
) -> Result<(), CommonError> {
    verify_is_admin(env, caller)?;
    if !is_admin(env, proposed) {
        set_state(env, proposed, AdministratorState::Proposed);
    }
    Ok(())
}

/// Accepts a pending nomination: `Proposed` becomes `Set`.
pub fn set_administrator(env: &Env, caller: &Address) -> Result<(), CommonError> {
    if get_state(env, caller) != Some(AdministratorState::Proposed) {
        return Err(CommonError::NotProposed);
    }
    set_state(env, caller, AdministratorState::Set);
    Ok(())
}

/// Removes `target` from the registry entirely, whatever its state.
///
/// Only an active administrator may call this; removing oneself is allowed.
pub fn remove_administrator(
    env: &Env,
    caller: &Address,
    target: &Address,
) -> Result<(), CommonError> {
    verify_is_admin(env, caller)?;
    env.storage().persistent().remove(&admin_state_key(target));
    Ok(())
}

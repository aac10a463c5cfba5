//! Test-only multi-asset token used to exercise `TokenStandard::Multi`.

use soroban_sdk::{contract, contracterror, contractimpl, panic_with_error, Address, Env};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum MockTokenError {
    InsufficientBalance = 1,
    NegativeAmount = 2,
}

#[contract]
pub struct MockMultiToken;

fn read(env: &Env, owner: &Address, token_id: u64) -> i128 {
    env.storage()
        .persistent()
        .get(&(owner.clone(), token_id))
        .unwrap_or(0)
}

fn write(env: &Env, owner: &Address, token_id: u64, amount: i128) {
    env.storage()
        .persistent()
        .set(&(owner.clone(), token_id), &amount);
}

#[contractimpl]
impl MockMultiToken {
    pub fn mint(env: Env, to: Address, token_id: u64, amount: i128) {
        if amount < 0 {
            panic_with_error!(&env, MockTokenError::NegativeAmount);
        }
        let current = read(&env, &to, token_id);
        write(&env, &to, token_id, current + amount);
    }

    pub fn transfer(env: Env, from: Address, to: Address, token_id: u64, amount: i128) {
        from.require_auth();
        if amount < 0 {
            panic_with_error!(&env, MockTokenError::NegativeAmount);
        }
        let from_balance = read(&env, &from, token_id);
        if from_balance < amount {
            panic_with_error!(&env, MockTokenError::InsufficientBalance);
        }
        write(&env, &from, token_id, from_balance - amount);
        let to_balance = read(&env, &to, token_id);
        write(&env, &to, token_id, to_balance + amount);
    }

    pub fn balance(env: Env, owner: Address, token_id: u64) -> i128 {
        read(&env, &owner, token_id)
    }
}

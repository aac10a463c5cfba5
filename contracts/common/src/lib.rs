//! Shared building blocks for the staking pool contracts.
//!
//! This crate provides:
//! - [`CommonError`]: error codes returned by the shared helpers.
//! - [`administrable`]: the proposed/set administrator registry and the
//!   `verify_is_admin` guard.
//! - [`token_adapter`]: transfers and own-balance queries over the two
//!   supported token standards (single-asset SEP-41 and multi-asset).
//!
//! Contract-specific errors convert from [`CommonError`] at the contract
//! boundary so that callers only ever observe the contract's own error enum.

#![no_std]

use soroban_sdk::contracterror;

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod administrable;
pub mod token_adapter;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use administrable::*;
pub use token_adapter::*;

// ── Shared error enum ────────────────────────────────────────────────────────

/// Error codes shared by the helper modules.
///
/// # Code ranges
/// | Range   | Purpose                        |
/// |---------|--------------------------------|
/// | 1 – 9   | Lifecycle / initialisation     |
/// | 10 – 19 | Authentication & authorisation |
/// | 30 – 39 | Validation / input             |
#[contracterror]
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
#[repr(u32)]
pub enum CommonError {
    // ── Lifecycle (1–9) ──────────────────────────────────────
    /// The administrator registry has not been seeded yet.
    NotInitialized = 1,

    /// The administrator registry was already seeded.
    AlreadyInitialized = 2,

    // ── Auth (10–19) ─────────────────────────────────────────
    /// The caller is not an active administrator.
    AccessDenied = 10,

    /// The caller tried to accept an administrator role nobody proposed.
    NotProposed = 11,

    // ── Validation (30–39) ───────────────────────────────────
    /// One or more input parameters are invalid (e.g. empty administrator
    /// list).
    InvalidInput = 30,

    /// A token amount handed to the adapter was negative.
    NegativeAmount = 31,
}

//! Confirmation prompts for irreversible actions.

use std::fmt;

/// Asks the user to approve an action.
pub trait Confirmer: Send + Sync + fmt::Debug {
    /// Return `true` to proceed.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Approves everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirmer for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Declines everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl Confirmer for NeverConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

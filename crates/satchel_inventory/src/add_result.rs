//! Outcome of an add request

use satchel_core::Rejection;
use serde::{Deserialize, Serialize};

/// How much of an add request was honored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddOutcome {
    /// Nothing was added
    AddedNone,
    /// Part of the request was added
    AddedSome,
    /// Everything was added
    AddedAll,
}

/// Result of [`crate::Inventory::try_add`].
///
/// Invariant: `actual_amount_given <= amount_to_give`, and the outcome always
/// agrees with the two amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddResult {
    pub outcome: AddOutcome,
    /// Requested quantity
    pub amount_to_give: u32,
    /// Quantity actually absorbed
    pub actual_amount_given: u32,
    /// Human readable message, empty on full success
    pub message: String,
    /// Machine readable reason for a shortfall
    pub rejection: Option<Rejection>,
}

impl AddResult {
    /// Nothing added; message taken from the rejection
    pub fn added_none(requested: u32, rejection: Rejection) -> Self {
        Self::added_none_with_message(requested, rejection, rejection.to_string())
    }

    /// Nothing added, with an explicit message
    pub fn added_none_with_message(
        requested: u32,
        rejection: Rejection,
        message: impl Into<String>,
    ) -> Self {
        Self {
            outcome: AddOutcome::AddedNone,
            amount_to_give: requested,
            actual_amount_given: 0,
            message: message.into(),
            rejection: Some(rejection),
        }
    }

    /// Partial success
    pub fn added_some(requested: u32, given: u32, message: impl Into<String>) -> Self {
        debug_assert!(given > 0 && given < requested);
        Self {
            outcome: AddOutcome::AddedSome,
            amount_to_give: requested,
            actual_amount_given: given,
            message: message.into(),
            rejection: None,
        }
    }

    /// Full success
    pub fn added_all(requested: u32) -> Self {
        Self {
            outcome: AddOutcome::AddedAll,
            amount_to_give: requested,
            actual_amount_given: requested,
            message: String::new(),
            rejection: None,
        }
    }

    /// Units that were not absorbed
    pub fn remaining(&self) -> u32 {
        self.amount_to_give - self.actual_amount_given
    }

    /// Check if at least one unit went in
    pub fn is_success(&self) -> bool {
        self.actual_amount_given > 0
    }
}

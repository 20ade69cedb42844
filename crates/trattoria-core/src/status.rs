//! # Status State Machines
//!
//! Lifecycle states for orders, payments, reservations and kitchen
//! requests. Every move is checked against a fixed transition table; a move
//! the table does not list fails with `InvalidTransition` and leaves the
//! record untouched.

use crate::types::TrattoriaError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A status enum with a fixed transition table.
pub trait Lifecycle: Copy + Eq + fmt::Debug {
    /// Stable lowercase name, used in errors and output.
    fn name(self) -> &'static str;

    /// Whether the table allows `self -> next`.
    fn allows(self, next: Self) -> bool;

    /// Whether no further transition is possible.
    fn is_terminal(self) -> bool;

    /// Validate `self -> next` and return `next`.
    fn advance(self, next: Self) -> Result<Self, TrattoriaError> {
        if self.allows(next) {
            Ok(next)
        } else {
            Err(TrattoriaError::InvalidTransition {
                from: self.name(),
                to: next.name(),
            })
        }
    }
}

// =============================================================================
// ORDER
// =============================================================================

/// Where an order is in the kitchen-to-table flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Placed,
    Preparing,
    Served,
    Completed,
    Cancelled,
}

impl Lifecycle for OrderStatus {
    fn name(self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Preparing => "preparing",
            Self::Served => "served",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    fn allows(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Placed, Self::Preparing)
                | (Self::Preparing, Self::Served)
                | (Self::Served, Self::Completed)
                | (Self::Placed | Self::Preparing | Self::Served, Self::Cancelled)
        )
    }

    fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

// =============================================================================
// PAYMENT
// =============================================================================

/// Settlement state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl Lifecycle for PaymentStatus {
    fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    fn allows(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Completed | Self::Failed) | (Self::Completed, Self::Refunded)
        )
    }

    fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Refunded)
    }
}

// =============================================================================
// RESERVATION
// =============================================================================

/// State of a table reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Seated,
    Completed,
    Cancelled,
    NoShow,
}

impl Lifecycle for ReservationStatus {
    fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Seated => "seated",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no-show",
        }
    }

    fn allows(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Seated)
                | (Self::Seated, Self::Completed)
                | (Self::Pending | Self::Confirmed, Self::Cancelled)
                | (Self::Confirmed, Self::NoShow)
        )
    }

    fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }
}

// =============================================================================
// ORDER REQUEST
// =============================================================================

/// Kitchen progress of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrderRequestStatus {
    Pending,
    InKitchen,
    Ready,
    Delivered,
}

impl Lifecycle for OrderRequestStatus {
    fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InKitchen => "in-kitchen",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
        }
    }

    fn allows(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InKitchen)
                | (Self::InKitchen, Self::Ready)
                | (Self::Ready, Self::Delivered)
        )
    }

    fn is_terminal(self) -> bool {
        self == Self::Delivered
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_happy_path() {
        let status = OrderStatus::Placed
            .advance(OrderStatus::Preparing)
            .and_then(|s| s.advance(OrderStatus::Served))
            .and_then(|s| s.advance(OrderStatus::Completed))
            .expect("happy path");
        assert!(status.is_terminal());
    }

    #[test]
    fn order_cannot_skip_or_reopen() {
        assert_eq!(
            OrderStatus::Placed.advance(OrderStatus::Served),
            Err(TrattoriaError::InvalidTransition {
                from: "placed",
                to: "served"
            })
        );
        assert!(OrderStatus::Completed.advance(OrderStatus::Cancelled).is_err());
        assert!(OrderStatus::Cancelled.advance(OrderStatus::Placed).is_err());
    }

    #[test]
    fn payment_refund_only_after_completion() {
        assert!(PaymentStatus::Pending.advance(PaymentStatus::Refunded).is_err());
        assert_eq!(
            PaymentStatus::Completed.advance(PaymentStatus::Refunded),
            Ok(PaymentStatus::Refunded)
        );
        assert!(PaymentStatus::Failed.is_terminal());
    }

    #[test]
    fn reservation_no_show_needs_confirmation() {
        assert!(
            ReservationStatus::Pending
                .advance(ReservationStatus::NoShow)
                .is_err()
        );
        assert!(
            ReservationStatus::Confirmed
                .advance(ReservationStatus::NoShow)
                .is_ok()
        );
        assert!(ReservationStatus::Seated.advance(ReservationStatus::Cancelled).is_err());
    }

    #[test]
    fn request_moves_forward_only() {
        assert!(
            OrderRequestStatus::Ready
                .advance(OrderRequestStatus::InKitchen)
                .is_err()
        );
        assert!(OrderRequestStatus::Delivered.is_terminal());
        assert!(!OrderRequestStatus::Pending.is_terminal());
    }
}

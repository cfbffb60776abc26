use crate::domain::OrderStatus;

/// Custom actions for Order entities.
///
/// Status only moves through these actions; plain updates never touch it.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    /// Moves to the next status of the forward flow. No-op once terminal.
    Advance,
    /// Cancels a non-terminal order. Nothing is restocked or refunded.
    Cancel,
    /// Links the external payment event that settled the order.
    LinkPayment { method: String, payment_id: String },
    /// Sets or clears the card processing fee, in percent.
    SetFeeRate(Option<f64>),
}

/// A persisted status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub revision: u64,
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    /// `None` when the order was already terminal.
    Advance(Option<Transition>),
    Cancel(Transition),
    /// Carries the new revision.
    LinkPayment(u64),
    SetFeeRate(u64),
}

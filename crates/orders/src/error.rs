//! Error types for the shipping event ledger.

use driftwood_core::BatchLineId;
use thiserror::Error;

/// Validation failures raised while recording shipping events.
///
/// All variants are raised before any state is touched: a failed `record`
/// call leaves the ledger exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The event type code is not registered with this ledger.
    #[error("unknown shipping event type '{0}'")]
    UnknownEventType(String),

    /// The line is not part of the batch the event was recorded against.
    #[error("line {0} is not part of the batch")]
    UnknownLine(BatchLineId),

    /// An event must cover at least one line.
    #[error("shipping event covers no lines")]
    EmptyEvent,

    /// The resolved quantity for a line was zero.
    ///
    /// Happens when the caller passes 0 ("default to remaining") and the
    /// line has already fully passed this event type.
    #[error("no remaining quantity on line {line_id} for event type '{event_type}'")]
    ZeroQuantity {
        /// The affected line.
        line_id: BatchLineId,
        /// The event type being recorded.
        event_type: String,
    },

    /// An earlier-sequenced event has not been passed for this quantity.
    ///
    /// Signals a genuine process-ordering violation (e.g. marking items
    /// "delivered" before "dispatched"); never retried or downgraded.
    #[error(
        "invalid quantity {quantity} for event type '{event_type}' on line {line_id}: \
         prior event '{prior_event_type}' has only passed {prior_quantity} unit(s)"
    )]
    PriorEventIncomplete {
        /// The affected line.
        line_id: BatchLineId,
        /// The event type being recorded.
        event_type: String,
        /// The earlier-sequenced event type that is incomplete.
        prior_event_type: String,
        /// The quantity the caller asked to record.
        quantity: u32,
        /// The cumulative quantity recorded under the earlier type.
        prior_quantity: u32,
    },

    /// Recording this quantity would exceed the line's total quantity.
    ///
    /// Indicates a data-entry or double-submission bug upstream.
    #[error(
        "invalid quantity {quantity} for event type '{event_type}' on line {line_id}: \
         {already_recorded} of {line_quantity} unit(s) already recorded"
    )]
    QuantityExceedsLineTotal {
        /// The affected line.
        line_id: BatchLineId,
        /// The event type being recorded.
        event_type: String,
        /// The quantity the caller asked to record.
        quantity: u32,
        /// Cumulative quantity already recorded under this type.
        already_recorded: u32,
        /// The line's fixed total quantity.
        line_quantity: u32,
    },
}

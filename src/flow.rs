//! Marker types for the phases of a payment attempt.
//!
//! A payment attempt moves `Created → Requested → {Verified | Failed}`. There
//! is no retried state: the framework never replays a flow on its own.

/// Ask the gateway to open a payment and hand back a redirect instruction.
#[derive(Debug, Clone, Copy)]
pub struct Purchase;

/// Confirm a payment the payer was redirected back from.
#[derive(Debug, Clone, Copy)]
pub struct Verify;

/// The extra settlement round-trip some gateways require after a successful
/// verification.
#[derive(Debug, Clone, Copy)]
pub struct Settle;

#[derive(Debug, Clone, Copy, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum FlowName {
    Purchase,
    Verify,
    Settle,
}

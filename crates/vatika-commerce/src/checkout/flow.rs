//! Checkout flow state machine.
//!
//! ```text
//! Idle --begin--> Submitting --finish(confirmed)--> Confirmed --reset--> Idle
//!                     |
//!                     +--finish(failed | cancelled)--> Idle
//! ```
//!
//! Booked lines only leave the cart on confirmation. Any other ending leaves
//! it exactly as it was so the user can retry.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::cart::{CartSnapshot, CartStore};
use crate::checkout::{BookingReceipt, BookingRequest, BookingSubmitter, ContactDetails, SubmissionError};
use crate::config::CheckoutConfig;
use crate::error::CommerceError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Where the checkout currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckoutState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A submission is pending; the UI should lock its controls.
    Submitting,
    /// The last booking went through and the cart was cleared.
    Confirmed,
}

impl CheckoutState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "idle",
            CheckoutState::Submitting => "submitting",
            CheckoutState::Confirmed => "confirmed",
        }
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a submission attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Confirmed(BookingReceipt),
    Failed(SubmissionError),
    Cancelled,
}

/// A booking that has been started but not yet finished.
///
/// Holds the snapshot taken at [`CheckoutFlow::begin`] and the request
/// built from it.
#[derive(Debug, Clone)]
pub struct PendingBooking {
    snapshot: CartSnapshot,
    request: BookingRequest,
}

impl PendingBooking {
    /// Cart contents as they were when checkout began.
    pub fn snapshot(&self) -> &CartSnapshot {
        &self.snapshot
    }

    /// The request that will be submitted.
    pub fn request(&self) -> &BookingRequest {
        &self.request
    }
}

/// Drives one session's checkout attempts.
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    state: CheckoutState,
    timeout: Duration,
    last_failure: Option<SubmissionError>,
    last_receipt: Option<BookingReceipt>,
    booked: Option<CartSnapshot>,
}

impl CheckoutFlow {
    /// Create an idle flow with the default submission timeout.
    pub fn new() -> Self {
        Self::with_config(&CheckoutConfig::default())
    }

    /// Create an idle flow.
    pub fn with_config(config: &CheckoutConfig) -> Self {
        Self::with_timeout(config.submission_timeout())
    }

    /// Create an idle flow with an explicit submission timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            state: CheckoutState::Idle,
            timeout,
            last_failure: None,
            last_receipt: None,
            booked: None,
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// True while a submission is pending.
    pub fn is_submitting(&self) -> bool {
        self.state == CheckoutState::Submitting
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Error from the most recent failed attempt, cleared on success.
    pub fn last_failure(&self) -> Option<&SubmissionError> {
        self.last_failure.as_ref()
    }

    /// Receipt from the most recent confirmed booking.
    pub fn last_receipt(&self) -> Option<&BookingReceipt> {
        self.last_receipt.as_ref()
    }

    /// Start a checkout from the current cart.
    ///
    /// Only allowed while idle. The cart must have at least one line whose
    /// item still exists, and the contact details must validate.
    pub fn begin(
        &mut self,
        store: &CartStore,
        contact: ContactDetails,
    ) -> Result<PendingBooking, CommerceError> {
        if self.state != CheckoutState::Idle {
            return Err(self.invalid_transition(CheckoutState::Submitting));
        }

        let snapshot = store.snapshot();
        if snapshot.bookable_lines().next().is_none() {
            return Err(CommerceError::EmptyCart);
        }
        contact.validate()?;

        let request = BookingRequest::from_snapshot(&snapshot, contact);
        self.state = CheckoutState::Submitting;
        self.booked = Some(snapshot.clone());
        debug!(
            lines = request.lines.len(),
            total = %request.total,
            "checkout started"
        );

        Ok(PendingBooking { snapshot, request })
    }

    /// Hand the pending booking to `submitter`, giving up after the
    /// configured timeout. Never touches the cart.
    pub async fn submit(
        &self,
        pending: &PendingBooking,
        submitter: &dyn BookingSubmitter,
    ) -> CheckoutOutcome {
        match tokio::time::timeout(self.timeout, submitter.submit(&pending.request)).await {
            Ok(Ok(receipt)) => CheckoutOutcome::Confirmed(receipt),
            Ok(Err(e)) => CheckoutOutcome::Failed(e),
            Err(_) => CheckoutOutcome::Failed(SubmissionError::Timeout(self.timeout)),
        }
    }

    /// Like [`CheckoutFlow::submit`], but yields
    /// [`CheckoutOutcome::Cancelled`] if `cancel` resolves first.
    pub async fn submit_until<C>(
        &self,
        pending: &PendingBooking,
        submitter: &dyn BookingSubmitter,
        cancel: C,
    ) -> CheckoutOutcome
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            outcome = self.submit(pending, submitter) => outcome,
            _ = cancel => {
                debug!("checkout submission cancelled");
                CheckoutOutcome::Cancelled
            }
        }
    }

    /// Apply the outcome of a submission.
    ///
    /// On confirmation the lines captured by [`CheckoutFlow::begin`] are
    /// taken out of the cart and the receipt returned; anything added while
    /// the submission was pending stays. On failure or cancellation the flow
    /// goes back to idle and the cart is left alone.
    pub fn finish(
        &mut self,
        outcome: CheckoutOutcome,
        store: &mut CartStore,
    ) -> Result<BookingReceipt, CommerceError> {
        if self.state != CheckoutState::Submitting {
            let to = match outcome {
                CheckoutOutcome::Confirmed(_) => CheckoutState::Confirmed,
                _ => CheckoutState::Idle,
            };
            return Err(self.invalid_transition(to));
        }

        match outcome {
            CheckoutOutcome::Confirmed(receipt) => {
                match self.booked.take() {
                    Some(booked) => store.confirm_checkout(&booked),
                    None => store.clear(),
                }
                self.state = CheckoutState::Confirmed;
                self.last_failure = None;
                self.last_receipt = Some(receipt.clone());
                info!(booking_id = %receipt.booking_id, "booking confirmed");
                Ok(receipt)
            }
            CheckoutOutcome::Failed(e) => {
                self.state = CheckoutState::Idle;
                self.booked = None;
                warn!(error = %e, retryable = e.is_retryable(), "booking submission failed");
                self.last_failure = Some(e.clone());
                Err(CommerceError::Submission(e))
            }
            CheckoutOutcome::Cancelled => {
                self.state = CheckoutState::Idle;
                self.booked = None;
                info!("booking cancelled, cart kept");
                Err(CommerceError::CheckoutCancelled)
            }
        }
    }

    /// Begin, submit and finish in one go.
    pub async fn checkout(
        &mut self,
        store: &mut CartStore,
        contact: ContactDetails,
        submitter: &dyn BookingSubmitter,
    ) -> Result<BookingReceipt, CommerceError> {
        let pending = self.begin(store, contact)?;
        let outcome = self.submit(&pending, submitter).await;
        self.finish(outcome, store)
    }

    /// Drop a pending booking without an outcome, e.g. when the user
    /// navigates away. No-op unless submitting.
    pub fn abandon(&mut self) {
        if self.state == CheckoutState::Submitting {
            debug!("pending checkout abandoned");
            self.state = CheckoutState::Idle;
            self.booked = None;
        }
    }

    /// Return a confirmed flow to idle so another booking can start.
    pub fn reset(&mut self) -> Result<(), CommerceError> {
        match self.state {
            CheckoutState::Submitting => Err(self.invalid_transition(CheckoutState::Idle)),
            _ => {
                self.state = CheckoutState::Idle;
                Ok(())
            }
        }
    }

    fn invalid_transition(&self, to: CheckoutState) -> CommerceError {
        CommerceError::InvalidCheckoutTransition {
            from: self.state.as_str().to_string(),
            to: to.as_str().to_string(),
        }
    }
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

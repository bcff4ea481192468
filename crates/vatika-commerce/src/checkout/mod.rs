//! Checkout handoff.
//!
//! Turns a cart snapshot plus contact details into a booking request,
//! hands it to a [`BookingSubmitter`], and clears the cart only once the
//! submitter confirms.

mod contact;
mod flow;
mod message;
mod request;

pub use contact::ContactDetails;
pub use flow::{CheckoutFlow, CheckoutOutcome, CheckoutState, PendingBooking};
pub use message::{booking_line_items, build_booking_message};
pub use request::{BookingLine, BookingReceipt, BookingRequest, BookingSubmitter, SubmissionError};

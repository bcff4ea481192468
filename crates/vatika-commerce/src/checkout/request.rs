//! The booking request handed to the outside world, and the submitter
//! interface that carries it.

use std::time::Duration;

use crate::cart::CartSnapshot;
use crate::checkout::message::build_booking_message;
use crate::checkout::ContactDetails;
use crate::ids::{BookingId, ItemId};
use crate::money::Money;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One booked service, with its price captured at booking time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingLine {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Everything a submitter needs to place a booking enquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Human-readable summary.
    pub message: String,
    /// Who is booking.
    pub contact: ContactDetails,
    /// Structured lines; stale cart lines are not included.
    pub lines: Vec<BookingLine>,
    /// Sum of line totals.
    pub total: Money,
    pub created_at: DateTime<Utc>,
}

impl BookingRequest {
    /// Build a request from a snapshot.
    pub fn from_snapshot(snapshot: &CartSnapshot, contact: ContactDetails) -> Self {
        let lines = snapshot
            .bookable_lines()
            .map(|(line, item)| BookingLine {
                item_id: line.item_id.clone(),
                name: item.name.clone(),
                quantity: line.quantity,
                unit_price: item.unit_price,
                line_total: line.line_total,
            })
            .collect();

        Self {
            message: build_booking_message(snapshot),
            contact,
            lines,
            total: snapshot.total_price,
            created_at: Utc::now(),
        }
    }

    /// Sum of quantities across lines.
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

/// Acknowledgement from a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub booking_id: BookingId,
}

impl BookingReceipt {
    pub fn new(booking_id: impl Into<BookingId>) -> Self {
        Self {
            booking_id: booking_id.into(),
        }
    }
}

/// Why a submission did not go through.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The receiving side refused the booking.
    #[error("Booking rejected: {0}")]
    Rejected(String),

    /// The booking could not be delivered.
    #[error("Transport error: {0}")]
    Transport(String),

    /// No answer within the configured time.
    #[error("Submission timed out after {0:?}")]
    Timeout(Duration),
}

impl SubmissionError {
    /// Whether trying again might help.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SubmissionError::Transport(_) | SubmissionError::Timeout(_)
        )
    }
}

/// Delivers a booking request: email relay, HTTP endpoint, or a mock.
#[async_trait]
pub trait BookingSubmitter: Send + Sync {
    /// Submit the request.
    async fn submit(&self, request: &BookingRequest) -> Result<BookingReceipt, SubmissionError>;
}

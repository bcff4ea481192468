//! Checkout handoff against mock submitters: the cart is cleared only on
//! confirmation and left untouched by failure, timeout or cancellation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use vatika_cache::Cache;
use vatika_commerce::cart::PersistedCart;
use vatika_commerce::prelude::*;

/// Records every request and answers with a fixed result after a delay.
struct MockSubmitter {
    delay: Duration,
    result: Result<BookingReceipt, SubmissionError>,
    requests: Mutex<Vec<BookingRequest>>,
    calls: AtomicUsize,
}

impl MockSubmitter {
    fn accepting() -> Self {
        Self::answering(Ok(BookingReceipt::new("bk-42")))
    }

    fn answering(result: Result<BookingReceipt, SubmissionError>) -> Self {
        Self {
            delay: Duration::ZERO,
            result,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl BookingSubmitter for MockSubmitter {
    async fn submit(&self, request: &BookingRequest) -> Result<BookingReceipt, SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.clone()
    }
}

fn contact() -> ContactDetails {
    ContactDetails::new("Asha Verma", "asha@example.com", "+91 98765 43210")
        .with_event_type(ServiceCategory::Wedding)
        .with_notes("Evening ceremony")
}

fn cart_with_two_items() -> (CartStore, Cache) {
    let a = CatalogItem::new("a", "A", Money::from_rupees(50), ServiceCategory::Wedding);
    let b = CatalogItem::new("b", "B", Money::from_rupees(30), ServiceCategory::Wedding);
    let catalog = Arc::new(InMemoryCatalog::with_items([a.clone(), b.clone()]).unwrap());

    let cache = Cache::in_memory();
    let mut store = CartStore::restore(catalog, Arc::new(cache.clone()), &CartConfig::default());
    store.add_item(&a).unwrap();
    store.add_item(&a).unwrap();
    store.add_item(&b).unwrap();
    (store, cache)
}

#[tokio::test]
async fn confirmed_booking_clears_cart_and_storage() {
    let (mut store, cache) = cart_with_two_items();
    let submitter = MockSubmitter::accepting();
    let mut flow = CheckoutFlow::new();

    let receipt = flow.checkout(&mut store, contact(), &submitter).await.unwrap();

    assert_eq!(receipt.booking_id.as_str(), "bk-42");
    assert_eq!(flow.state(), CheckoutState::Confirmed);
    assert!(store.snapshot().is_empty());
    assert_eq!(
        cache.get::<PersistedCart>("cart").unwrap(),
        Some(PersistedCart::default())
    );

    let requests = submitter.requests.lock();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].message,
        "I'd like to book the following services:\n\n\
         A (\u{20b9}50) x 2\nB (\u{20b9}30) x 1\n\n\
         Total: \u{20b9}130"
    );
    assert_eq!(requests[0].total, Money::from_rupees(130));
    assert_eq!(requests[0].total_items(), 3);
    assert_eq!(requests[0].contact.event_type, Some(ServiceCategory::Wedding));
}

#[tokio::test]
async fn failed_booking_keeps_cart_and_allows_retry() {
    let (mut store, cache) = cart_with_two_items();
    let before = store.snapshot();
    let saved_before: Option<PersistedCart> = cache.get("cart").unwrap();
    let mut flow = CheckoutFlow::new();

    let failing = MockSubmitter::answering(Err(SubmissionError::Transport("503".into())));
    let err = flow.checkout(&mut store, contact(), &failing).await.unwrap_err();

    assert!(matches!(err, CommerceError::Submission(SubmissionError::Transport(_))));
    assert!(err.is_retryable());
    assert_eq!(store.snapshot(), before);
    assert_eq!(
        serde_json::to_string(&store.snapshot()).unwrap(),
        serde_json::to_string(&before).unwrap()
    );
    assert_eq!(cache.get::<PersistedCart>("cart").unwrap(), saved_before);
    assert_eq!(flow.state(), CheckoutState::Idle);

    let working = MockSubmitter::accepting();
    flow.checkout(&mut store, contact(), &working).await.unwrap();
    assert!(store.is_empty());
    assert!(flow.last_failure().is_none());
}

#[tokio::test]
async fn rejected_booking_is_not_retryable() {
    let (mut store, _cache) = cart_with_two_items();
    let mut flow = CheckoutFlow::new();
    let submitter = MockSubmitter::answering(Err(SubmissionError::Rejected("blocked".into())));

    let err = flow.checkout(&mut store, contact(), &submitter).await.unwrap_err();
    assert!(!err.is_retryable());
    assert_eq!(store.total_items(), 3);
}

#[tokio::test]
async fn slow_submitter_times_out() {
    let (mut store, _cache) = cart_with_two_items();
    let before = store.snapshot();
    let mut flow = CheckoutFlow::with_timeout(Duration::from_millis(20));
    let submitter = MockSubmitter::accepting().slow(Duration::from_secs(5));

    let err = flow.checkout(&mut store, contact(), &submitter).await.unwrap_err();

    assert!(matches!(
        err,
        CommerceError::Submission(SubmissionError::Timeout(d)) if d == Duration::from_millis(20)
    ));
    assert_eq!(flow.state(), CheckoutState::Idle);
    assert_eq!(store.snapshot(), before);
}

#[tokio::test]
async fn cancelled_submission_returns_to_idle() {
    let (mut store, _cache) = cart_with_two_items();
    let before = store.snapshot();
    let mut flow = CheckoutFlow::new();
    let submitter = MockSubmitter::accepting().slow(Duration::from_secs(5));

    let pending = flow.begin(&store, contact()).unwrap();
    assert!(flow.is_submitting());

    let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
    cancel_tx.send(()).unwrap();
    let outcome = flow
        .submit_until(&pending, &submitter, async {
            let _ = cancel_rx.await;
        })
        .await;
    assert_eq!(outcome, CheckoutOutcome::Cancelled);

    let err = flow.finish(outcome, &mut store).unwrap_err();
    assert!(matches!(err, CommerceError::CheckoutCancelled));
    assert_eq!(flow.state(), CheckoutState::Idle);
    assert_eq!(store.snapshot(), before);
}

#[tokio::test]
async fn cart_stays_editable_while_submitting() {
    let (mut store, cache) = cart_with_two_items();
    let extra = CatalogItem::new("b", "B", Money::from_rupees(30), ServiceCategory::Wedding);
    let mut flow = CheckoutFlow::new();
    let submitter = MockSubmitter::accepting();

    let pending = flow.begin(&store, contact()).unwrap();
    store.add_item(&extra).unwrap();
    assert_eq!(pending.snapshot().total_items, 3);

    let outcome = flow.submit(&pending, &submitter).await;
    assert_eq!(submitter.requests.lock()[0].total, Money::from_rupees(130));
    flow.finish(outcome, &mut store).unwrap();

    // Only the booked units leave; the one added mid-submission stays.
    assert_eq!(store.quantity_of(&ItemId::new("a")), 0);
    assert_eq!(store.quantity_of(&ItemId::new("b")), 1);
    assert_eq!(store.total_items(), 1);
    assert_eq!(
        cache.get::<PersistedCart>("cart").unwrap().map(|c| c.lines.len()),
        Some(1)
    );
}

#[tokio::test]
async fn item_added_during_submission_survives_confirmation() {
    let (mut store, _cache) = cart_with_two_items();
    let extra = CatalogItem::new("c", "C", Money::from_rupees(15), ServiceCategory::Wedding);
    let mut flow = CheckoutFlow::new();
    let submitter = MockSubmitter::accepting();

    let pending = flow.begin(&store, contact()).unwrap();
    store.add_item(&extra).unwrap();
    let outcome = flow.submit(&pending, &submitter).await;
    flow.finish(outcome, &mut store).unwrap();

    assert_eq!(store.line_count(), 1);
    assert_eq!(store.quantity_of(&extra.id), 1);
}

#[tokio::test]
async fn checkout_requires_bookable_items_and_contact() {
    let catalog = Arc::new(InMemoryCatalog::with_items([CatalogItem::new(
        "a",
        "A",
        Money::from_rupees(10),
        ServiceCategory::Other,
    )])
    .unwrap());
    let mut store = CartStore::new(catalog.clone());
    let submitter = MockSubmitter::accepting();
    let mut flow = CheckoutFlow::new();

    let err = flow.checkout(&mut store, contact(), &submitter).await.unwrap_err();
    assert!(matches!(err, CommerceError::EmptyCart));

    // A cart whose only line went stale has nothing to book.
    if let Some(a) = catalog.get_item(&ItemId::new("a")) {
        store.add_item(&a).unwrap();
    }
    catalog.remove(&ItemId::new("a"));
    let err = flow.checkout(&mut store, contact(), &submitter).await.unwrap_err();
    assert!(matches!(err, CommerceError::EmptyCart));

    catalog
        .upsert(CatalogItem::new("a", "A", Money::from_rupees(10), ServiceCategory::Other))
        .unwrap();
    let err = flow
        .checkout(&mut store, ContactDetails::new("", "asha@example.com", "1"), &submitter)
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::Validation(_)));

    assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
    assert_eq!(flow.state(), CheckoutState::Idle);
    assert_eq!(store.total_items(), 1);
}

mod common;

use common::FakeClient;
use provisionctl_core::{
    AttributeType, CancellationToken, CoreError, ResourceHandle, ResourceProvisioner,
    ResourceSpec,
};
use std::time::Duration;
use tokio::time::Instant;

fn my_test_table() -> ResourceSpec {
    ResourceSpec::builder("MyTestTable")
        .partition_key("id", AttributeType::String)
        .build()
        .unwrap()
}

const INTERVAL: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// Convergence
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn create_then_wait_observes_active() {
    let client = FakeClient::becomes_active_after(5);
    let provisioner = ResourceProvisioner::new(&client);

    let mut handle = provisioner.create(&my_test_table()).await.unwrap();
    provisioner
        .await_ready(&mut handle, INTERVAL, Duration::from_secs(5))
        .await
        .unwrap();

    assert!(handle.is_ready());
    assert_eq!(client.submit_calls(), 1);
    assert_eq!(client.status_calls(), 6);
}

#[tokio::test(start_paused = true)]
async fn active_after_two_polls_completes_in_about_200ms() {
    let client = FakeClient::becomes_active_after(2);
    let provisioner = ResourceProvisioner::new(&client);

    let start = Instant::now();
    let mut handle = provisioner.create(&my_test_table()).await.unwrap();
    provisioner
        .await_ready(&mut handle, INTERVAL, Duration::from_secs(5))
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(200), "took {elapsed:?}");
    assert!(elapsed < Duration::from_millis(300), "took {elapsed:?}");
}

// ---------------------------------------------------------------------------
// Conflicts and invalid specs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn existing_name_yields_already_exists_without_duplicate_request() {
    let client = FakeClient::becomes_active_after(0).with_existing_table("MyTestTable");
    let provisioner = ResourceProvisioner::new(&client);

    let err = provisioner.create(&my_test_table()).await.unwrap_err();

    assert!(matches!(err, CoreError::AlreadyExists { ref name } if name == "MyTestTable"));
    assert_eq!(client.submit_calls(), 1);
    assert_eq!(client.status_calls(), 0);
}

#[tokio::test]
async fn spec_without_partition_key_is_rejected_locally() {
    let client = FakeClient::becomes_active_after(0);
    let provisioner = ResourceProvisioner::new(&client);

    let spec = ResourceSpec::new(
        "MyTestTable",
        vec![provisionctl_core::KeyAttribute::sort("ts", AttributeType::Number)],
        None,
    );
    let err = provisioner.create(&spec).await.unwrap_err();

    assert!(matches!(err, CoreError::InvalidSpec(_)));
    assert_eq!(client.submit_calls(), 0);
}

#[tokio::test]
async fn empty_name_is_rejected_locally() {
    let client = FakeClient::becomes_active_after(0);
    let provisioner = ResourceProvisioner::new(&client);

    let spec = ResourceSpec::new(
        "",
        vec![provisionctl_core::KeyAttribute::partition(
            "id",
            AttributeType::String,
        )],
        None,
    );
    let err = provisioner.create(&spec).await.unwrap_err();

    assert!(err.is_bad_request());
    assert_eq!(client.submit_calls(), 0);
}

// ---------------------------------------------------------------------------
// Terminal failures and timeouts
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn never_ready_times_out_near_deadline() {
    let client = FakeClient::never_ready();
    let provisioner = ResourceProvisioner::new(&client);
    let timeout = Duration::from_secs(1);

    let mut handle = provisioner.create(&my_test_table()).await.unwrap();
    let start = Instant::now();
    let err = provisioner
        .await_ready(&mut handle, INTERVAL, timeout)
        .await
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(err.is_timeout());
    assert!(elapsed >= timeout, "gave up early: {elapsed:?}");
    assert!(elapsed <= timeout + INTERVAL, "overshot: {elapsed:?}");
    assert!(!handle.is_ready());
}

#[tokio::test(start_paused = true)]
async fn timeout_not_a_multiple_of_interval_is_not_overshot() {
    let client = FakeClient::never_ready();
    let provisioner = ResourceProvisioner::new(&client);
    let timeout = Duration::from_millis(250);

    let mut handle = provisioner.create(&my_test_table()).await.unwrap();
    let start = Instant::now();
    let err = provisioner
        .await_ready(&mut handle, INTERVAL, timeout)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Timeout { .. }));
    let elapsed = start.elapsed();
    assert!(elapsed >= timeout, "gave up early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(300), "slept past deadline: {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn failed_on_first_poll_stops_immediately() {
    let client = FakeClient::fails_after(0);
    let provisioner = ResourceProvisioner::new(&client);

    let mut handle = provisioner.create(&my_test_table()).await.unwrap();
    let err = provisioner
        .await_ready(&mut handle, INTERVAL, Duration::from_secs(5))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::ProvisioningFailed { .. }));
    assert_eq!(client.status_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn not_found_keeps_polling_until_timeout() {
    // Nothing was submitted, so every poll reports NOT_FOUND
    let client = FakeClient::becomes_active_after(0);
    let provisioner = ResourceProvisioner::new(&client);

    let mut handle = ResourceHandle::existing("Missing");
    let err = provisioner
        .await_ready(&mut handle, INTERVAL, Duration::from_millis(500))
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(client.status_calls(), 6);
}

// ---------------------------------------------------------------------------
// Idempotence and cancellation
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn await_ready_twice_makes_no_extra_calls() {
    let client = FakeClient::becomes_active_after(1);
    let provisioner = ResourceProvisioner::new(&client);

    let mut handle = provisioner.create(&my_test_table()).await.unwrap();
    provisioner
        .await_ready(&mut handle, INTERVAL, Duration::from_secs(5))
        .await
        .unwrap();
    let calls_after_first = client.status_calls();

    let start = Instant::now();
    provisioner
        .await_ready(&mut handle, INTERVAL, Duration::from_secs(5))
        .await
        .unwrap();
    provisioner
        .await_ready(&mut handle, INTERVAL, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(client.status_calls(), calls_after_first);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn cancel_during_wait_stops_polling() {
    let client = FakeClient::never_ready();
    let provisioner = ResourceProvisioner::new(&client);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(350)).await;
        trigger.cancel();
    });

    let mut handle = provisioner.create(&my_test_table()).await.unwrap();
    let start = Instant::now();
    let err = provisioner
        .await_ready_cancellable(&mut handle, INTERVAL, Duration::from_secs(60), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Cancelled { .. }));
    assert!(start.elapsed() < Duration::from_millis(400));
    // Polls at 0, 100, 200 and 300ms
    assert_eq!(client.status_calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn slow_status_call_is_cut_off_at_deadline() {
    let client = FakeClient::never_ready().with_status_delay(Duration::from_secs(10));
    let provisioner = ResourceProvisioner::new(&client);
    let timeout = Duration::from_secs(1);

    let mut handle = provisioner.create(&my_test_table()).await.unwrap();
    let start = Instant::now();
    let err = provisioner
        .await_ready(&mut handle, INTERVAL, timeout)
        .await
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(err.is_timeout(), "unexpected error: {err:?}");
    assert!(elapsed >= timeout, "gave up early: {elapsed:?}");
    assert!(elapsed <= timeout + INTERVAL, "overran: {elapsed:?}");
    assert_eq!(client.status_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_interrupts_in_flight_status_call() {
    let client = FakeClient::never_ready().with_status_delay(Duration::from_secs(10));
    let provisioner = ResourceProvisioner::new(&client);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let mut handle = provisioner.create(&my_test_table()).await.unwrap();
    let start = Instant::now();
    let err = provisioner
        .await_ready_cancellable(&mut handle, INTERVAL, Duration::from_secs(60), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Cancelled { .. }));
    assert!(start.elapsed() < Duration::from_millis(100));
}

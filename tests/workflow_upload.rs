//! Integration tests for the two-phase upload protocol in isolation.

mod common;

use common::{attachment, server_error, test_config, ticket, MockTransport};

use autocare_client::api::ApiTransport;
use autocare_client::error::{ApiError, UploadError};
use autocare_client::upload::UploadOrchestrator;
use mockall::Sequence;
use std::sync::Arc;

fn orchestrator(mock: MockTransport) -> UploadOrchestrator {
    let transport: Arc<dyn ApiTransport> = Arc::new(mock);
    UploadOrchestrator::new(transport, &test_config())
}

#[tokio::test]
async fn successful_pipeline_returns_public_locator() {
    let mut mock = MockTransport::new();
    let mut seq = Sequence::new();
    mock.expect_request_upload_ticket()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(ticket()));
    // Causal dependency: the transfer is only issued after the ticket resolves
    mock.expect_transfer()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));

    let locator = orchestrator(mock)
        .upload_resource(&attachment())
        .await
        .unwrap();
    assert_eq!(locator, "https://bucket.example/car.jpg");
}

#[tokio::test]
async fn transfer_exhausts_retries_on_persistent_transient_failure() {
    let mut mock = MockTransport::new();
    mock.expect_request_upload_ticket()
        .times(1)
        .returning(|_| Ok(ticket()));
    mock.expect_transfer()
        .times(3)
        .returning(|_, _, _| Err(server_error()));

    let err = orchestrator(mock)
        .upload_resource(&attachment())
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::Transfer(_)));
}

#[tokio::test]
async fn transfer_recovers_after_single_timeout() {
    let mut mock = MockTransport::new();
    mock.expect_request_upload_ticket()
        .times(1)
        .returning(|_| Ok(ticket()));

    let mut seq = Sequence::new();
    mock.expect_transfer()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Err(ApiError::Timeout));
    mock.expect_transfer()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));

    let locator = orchestrator(mock)
        .upload_resource(&attachment())
        .await
        .unwrap();
    assert_eq!(locator, ticket().public_resource_locator);
}

#[tokio::test]
async fn declared_mime_type_travels_to_both_phases() {
    let mut mock = MockTransport::new();
    mock.expect_request_upload_ticket()
        .withf(|request| request.mime_type == "image/jpeg")
        .times(1)
        .returning(|_| Ok(ticket()));
    mock.expect_transfer()
        .withf(|_, mime_type, _| mime_type == "image/jpeg")
        .times(1)
        .returning(|_, _, _| Ok(()));

    orchestrator(mock)
        .upload_resource(&attachment())
        .await
        .unwrap();
}

//! Error classification through the full pipeline.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use bytes::Bytes;
    use http::{Response, StatusCode};
    use http_body_util::Full;

    use stratus_runtime::{CallOptions, ClientConfig, SdkError, ServiceErrorKind};
    use stratus_transport::TransportError;

    use crate::model::{GetMatch, GetMatchInput, ListMatches, ListMatchesInput};
    use crate::server::{error_response, match_service, FixtureHandler, FixtureServer};
    use crate::{client_for, test_match_id};

    fn always(response: fn() -> Response<Full<Bytes>>) -> FixtureHandler {
        Arc::new(move |_parts, _body| response())
    }

    async fn list(client: &stratus_runtime::Client) -> Result<(), SdkError> {
        client
            .invoke::<ListMatches>(ListMatchesInput::default())
            .await
            .map(|_| ())
    }

    #[tokio::test]
    async fn test_should_classify_registered_json_error_code() {
        let server = FixtureServer::start(always(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                "ValidationException",
                "limit out of range",
            )
        }))
        .await;
        let client = client_for(&server.endpoint());

        match list(&client).await {
            Err(SdkError::Service(error)) => {
                assert_eq!(error.kind(), ServiceErrorKind::InvalidParameter);
                assert_eq!(error.code(), "ValidationException");
                assert_eq!(error.message(), "limit out of range");
                assert_eq!(error.status(), StatusCode::BAD_REQUEST);
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_should_fall_back_for_unregistered_error_code() {
        let server = FixtureServer::start(always(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                "FrobnicationException",
                "cannot frobnicate",
            )
        }))
        .await;
        let client = client_for(&server.endpoint());

        match list(&client).await {
            Err(SdkError::Service(error)) => {
                assert_eq!(error.kind(), ServiceErrorKind::Unmodeled);
                assert_eq!(error.code(), "FrobnicationException");
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_should_classify_xml_error_body() {
        let server = FixtureServer::start(always(|| {
            Response::builder()
                .status(StatusCode::FORBIDDEN)
                .header("content-type", "application/xml")
                .body(Full::new(Bytes::from_static(
                    b"<?xml version=\"1.0\"?>\
                      <ErrorResponse><Error>\
                      <Code>AccessDenied</Code>\
                      <Message>no token</Message>\
                      <RequestId>xml-req-1</RequestId>\
                      </Error></ErrorResponse>",
                )))
                .expect("static response parts are valid")
        }))
        .await;
        let client = client_for(&server.endpoint());

        match list(&client).await {
            Err(SdkError::Service(error)) => {
                assert_eq!(error.kind(), ServiceErrorKind::AccessDenied);
                assert_eq!(error.code(), "AccessDenied");
                assert_eq!(error.request_id(), Some("xml-req-1"));
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_should_report_unmarshal_for_malformed_error_body() {
        let server = FixtureServer::start(always(|| {
            Response::builder()
                .status(StatusCode::BAD_REQUEST)
                .body(Full::new(Bytes::from_static(b"not json, not xml")))
                .expect("static response parts are valid")
        }))
        .await;
        let client = client_for(&server.endpoint());

        assert!(matches!(
            list(&client).await,
            Err(SdkError::Unmarshal { .. })
        ));
    }

    #[tokio::test]
    async fn test_should_suppress_not_found_when_requested() {
        let server = FixtureServer::start(match_service()).await;
        let client = client_for(&server.endpoint());

        let options = CallOptions {
            suppress_not_found: true,
            ..CallOptions::default()
        };
        let outcome = client
            .invoke_detailed::<GetMatch>(
                GetMatchInput {
                    id: test_match_id("missing"),
                },
                options,
            )
            .await
            .unwrap();
        assert!(outcome.suppressed_not_found);
        assert_eq!(outcome.output.record, None);
    }

    #[tokio::test]
    async fn test_should_report_unmarshal_when_suppressed_not_found_body_is_malformed() {
        // Suppression only applies when the 404 body reads as a success;
        // a body that is neither the output shape nor an error falls back
        // to classification, which cannot parse it either.
        let server = FixtureServer::start(always(|| {
            Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Full::new(Bytes::from_static(b"not json, not xml")))
                .expect("static response parts are valid")
        }))
        .await;
        let client = client_for(&server.endpoint());

        let options = CallOptions {
            suppress_not_found: true,
            ..CallOptions::default()
        };
        let result = client
            .invoke_detailed::<GetMatch>(
                GetMatchInput {
                    id: test_match_id("garbled"),
                },
                options,
            )
            .await;
        assert!(matches!(result, Err(SdkError::Unmarshal { .. })));
    }

    #[tokio::test]
    async fn test_should_classify_error_body_despite_not_found_suppression() {
        // A 404 carrying an error body is a real fault, not an absent
        // resource: it must classify normally even with suppression on.
        let server = FixtureServer::start(always(|| {
            error_response(
                StatusCode::NOT_FOUND,
                "ResourceNotFoundException",
                "no such match",
            )
        }))
        .await;
        let client = client_for(&server.endpoint());

        let options = CallOptions {
            suppress_not_found: true,
            ..CallOptions::default()
        };
        let result = client
            .invoke_detailed::<GetMatch>(
                GetMatchInput {
                    id: test_match_id("faulted"),
                },
                options,
            )
            .await;
        match result {
            Err(SdkError::Service(error)) => {
                assert_eq!(error.kind(), ServiceErrorKind::NotFound);
                assert_eq!(error.code(), "ResourceNotFoundException");
                assert_eq!(error.message(), "no such match");
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_should_surface_not_found_without_suppression() {
        let server = FixtureServer::start(match_service()).await;
        let client = client_for(&server.endpoint());

        let result = client
            .invoke::<GetMatch>(GetMatchInput {
                id: test_match_id("missing"),
            })
            .await;
        match result {
            Err(SdkError::Service(error)) => {
                assert_eq!(error.kind(), ServiceErrorKind::NotFound);
                assert_eq!(error.code(), "ResourceNotFoundException");
                assert_eq!(error.request_id(), Some("fixture-404"));
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_should_surface_connect_fault_from_dead_endpoint() {
        // Bind then drop so the port is known to be closed.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = client_for(&endpoint);
        assert!(matches!(
            list(&client).await,
            Err(SdkError::Transport(TransportError::Connect(_)))
        ));
    }

    #[tokio::test]
    async fn test_should_surface_read_timeout_from_stalled_server() {
        crate::init_tracing();
        let server =
            FixtureServer::start_with_latency(match_service(), Duration::from_secs(30)).await;

        let config = ClientConfig::builder()
            .service("matches")
            .endpoint(server.endpoint())
            .read_timeout(Duration::from_millis(250))
            .build();
        let client = stratus_runtime::Client::builder(config)
            .build()
            .expect("client construction cannot fail with a running runtime");

        match list(&client).await {
            Err(SdkError::Transport(TransportError::TimedOut(limit))) => {
                assert_eq!(limit, Duration::from_millis(250));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_should_cancel_request_already_in_flight() {
        let server =
            FixtureServer::start_with_latency(match_service(), Duration::from_secs(30)).await;
        let client = client_for(&server.endpoint());

        let options = CallOptions::default();
        let cancel = options.cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel.cancel();
        });

        let started = std::time::Instant::now();
        let result = client
            .invoke_detailed::<ListMatches>(ListMatchesInput::default(), options)
            .await;
        assert!(matches!(result, Err(SdkError::Cancelled)));
        // The call returned on cancellation, not by waiting out the server.
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}

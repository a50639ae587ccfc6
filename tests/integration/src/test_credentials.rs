//! Credential resolution driven through the full pipeline.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use stratus_auth::{AuthError, Credentials, RefreshCredentials, RefreshingCredentialsProvider};
    use stratus_runtime::{Client, ClientConfig, SdkError};

    use crate::init_tracing;
    use crate::model::{ListMatches, ListMatchesInput};
    use crate::server::{match_service, recording, FixtureServer};

    struct CountingSource {
        calls: Arc<AtomicU32>,
        fail: bool,
    }

    #[async_trait]
    impl RefreshCredentials for CountingSource {
        async fn refresh(&self) -> Result<Credentials, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AuthError::RefreshFailed("identity service down".to_owned()));
            }
            tokio::task::yield_now().await;
            Ok(Credentials::new("AKIDFRESH", "secret")
                .with_expiration(Utc::now() + Duration::hours(1)))
        }
    }

    fn client_with_source(endpoint: String, source: CountingSource) -> Client {
        init_tracing();
        let config = ClientConfig::builder().endpoint(endpoint).build();
        Client::builder(config)
            .credentials(Arc::new(RefreshingCredentialsProvider::new(source)))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_should_refresh_once_across_concurrent_calls() {
        let server = FixtureServer::start(match_service()).await;
        let calls = Arc::new(AtomicU32::new(0));
        let client = client_with_source(
            server.endpoint(),
            CountingSource {
                calls: calls.clone(),
                fail: false,
            },
        );

        let mut handles = Vec::new();
        for _ in 0..16 {
            let client = client.clone();
            handles.push(tokio::spawn(async move {
                client.invoke::<ListMatches>(ListMatchesInput::default()).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_should_fail_call_without_sending_when_refresh_fails() {
        let (handler, seen) = recording(match_service());
        let server = FixtureServer::start(handler).await;
        let calls = Arc::new(AtomicU32::new(0));
        let client = client_with_source(
            server.endpoint(),
            CountingSource {
                calls,
                fail: true,
            },
        );

        let result = client
            .invoke::<ListMatches>(ListMatchesInput::default())
            .await;
        assert!(matches!(
            result,
            Err(SdkError::Credentials(AuthError::RefreshFailed(_)))
        ));
        assert!(seen.lock().unwrap().is_empty(), "nothing should reach the wire");
    }
}

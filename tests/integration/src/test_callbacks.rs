//! Callback delivery, including main-thread routing under load.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Arc, Mutex};
    use std::thread::ThreadId;
    use std::time::Duration;

    use stratus_runtime::{CallOptions, Client, MainThreadDispatcher, SdkError};
    use stratus_transport::TransportError;

    use crate::model::{MatchRecord, PutMatch};
    use crate::server::{match_service, FixtureServer};
    use crate::{client_for, test_match_id};

    fn record(id: String) -> MatchRecord {
        MatchRecord {
            id,
            white: "anna".to_owned(),
            black: "pia".to_owned(),
            winner: None,
        }
    }

    #[tokio::test]
    async fn test_should_deliver_success_through_callback() {
        let server = FixtureServer::start(match_service()).await;
        let client = client_for(&server.endpoint());

        let (tx, rx) = mpsc::channel();
        let id = test_match_id("cb");
        client.invoke_with_callback::<PutMatch, _>(
            record(id.clone()),
            CallOptions::default(),
            move |result| {
                tx.send(result).unwrap();
            },
        );

        let result =
            tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)).unwrap())
                .await
                .unwrap();
        let outcome = result.unwrap();
        assert_eq!(outcome.output.id, id);
        assert!(!outcome.suppressed_not_found);
    }

    #[tokio::test]
    async fn test_should_deliver_transport_fault_through_callback() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let client = client_for(&endpoint);

        let (tx, rx) = mpsc::channel();
        client.invoke_with_callback::<PutMatch, _>(
            record(test_match_id("cbfail")),
            CallOptions::default(),
            move |result| {
                tx.send(result.err()).unwrap();
            },
        );

        let error =
            tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)).unwrap())
                .await
                .unwrap();
        assert!(matches!(
            error,
            Some(SdkError::Transport(TransportError::Connect(_)))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_deliver_all_callbacks_on_ticking_thread_under_load() {
        const CALLS: usize = 24;

        let server = FixtureServer::start(match_service()).await;
        let dispatcher = Arc::new(MainThreadDispatcher::new(CALLS));
        let config = stratus_runtime::ClientConfig::builder()
            .endpoint(server.endpoint())
            .build();
        let client = Client::builder(config)
            .dispatcher(dispatcher.clone())
            .build()
            .unwrap();

        let delivered: Arc<Mutex<Vec<ThreadId>>> = Arc::new(Mutex::new(Vec::new()));
        let ok = Arc::new(AtomicUsize::new(0));

        for n in 0..CALLS {
            let delivered = delivered.clone();
            let ok = ok.clone();
            let options = CallOptions {
                execute_callback_on_main_thread: true,
                ..CallOptions::default()
            };
            client.invoke_with_callback::<PutMatch, _>(
                record(format!("load-{n}")),
                options,
                move |result| {
                    delivered.lock().unwrap().push(std::thread::current().id());
                    if result.is_ok() {
                        ok.fetch_add(1, Ordering::SeqCst);
                    }
                },
            );
        }

        // Drain the queue the way a host loop would: tick, then compare the
        // ids recorded during that tick against the ticking thread, with no
        // await between capture and check.
        let mut total = 0;
        while total < CALLS {
            let ticking_thread = std::thread::current().id();
            let before = delivered.lock().unwrap().len();
            let ran = dispatcher.tick();
            let after = delivered.lock().unwrap();
            assert_eq!(after.len(), before + ran);
            assert!(after[before..].iter().all(|id| *id == ticking_thread));
            drop(after);

            total += ran;
            if total < CALLS {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        }

        assert_eq!(ok.load(Ordering::SeqCst), CALLS);
    }
}

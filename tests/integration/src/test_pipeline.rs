//! Full-pipeline round trips against the fixture match service.

#[cfg(test)]
mod tests {
    use stratus_runtime::SdkError;

    use crate::model::{
        GetMatch, GetMatchInput, ListMatches, ListMatchesInput, MatchRecord, PutMatch,
    };
    use crate::server::{match_service, recording, FixtureServer};
    use crate::{client_for, test_match_id};

    fn record(id: &str, white: &str, black: &str) -> MatchRecord {
        MatchRecord {
            id: id.to_owned(),
            white: white.to_owned(),
            black: black.to_owned(),
            winner: Some(white.to_owned()),
        }
    }

    #[tokio::test]
    async fn test_should_round_trip_put_get_list() {
        let server = FixtureServer::start(match_service()).await;
        let client = client_for(&server.endpoint());

        let first = test_match_id("rt");
        let second = test_match_id("rt");
        client
            .invoke::<PutMatch>(record(&first, "magnus", "hikaru"))
            .await
            .unwrap();
        let put = client
            .invoke::<PutMatch>(record(&second, "ding", "magnus"))
            .await
            .unwrap();
        assert_eq!(put.id, second);
        assert_eq!(put.revision, 2);

        let fetched = client
            .invoke::<GetMatch>(GetMatchInput { id: first.clone() })
            .await
            .unwrap();
        assert_eq!(fetched.record, Some(record(&first, "magnus", "hikaru")));

        let listed = client
            .invoke::<ListMatches>(ListMatchesInput {
                player: Some("magnus".to_owned()),
                limit: Some(10),
            })
            .await
            .unwrap();
        assert_eq!(listed.matches.len(), 2);

        let limited = client
            .invoke::<ListMatches>(ListMatchesInput {
                player: None,
                limit: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(limited.matches.len(), 1);
    }

    #[tokio::test]
    async fn test_should_stamp_operation_headers_on_the_wire() {
        let (handler, seen) = recording(match_service());
        let server = FixtureServer::start(handler).await;
        let client = client_for(&server.endpoint());

        client
            .invoke::<PutMatch>(record(&test_match_id("hdr"), "anna", "pia"))
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert_eq!(request.method, http::Method::POST);
        assert_eq!(request.path_and_query, "/matches");
        assert_eq!(request.headers.get("x-stratus-target").unwrap(), "PutMatch");
        assert!(request
            .headers
            .get("user-agent")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("stratus/"));
        assert_eq!(
            request.headers.get("content-type").unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_should_encode_query_parameters_on_the_wire() {
        let (handler, seen) = recording(match_service());
        let server = FixtureServer::start(handler).await;
        let client = client_for(&server.endpoint());

        client
            .invoke::<ListMatches>(ListMatchesInput {
                player: Some("j/o".to_owned()),
                limit: Some(5),
            })
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].path_and_query, "/matches?player=j%2Fo&limit=5");
    }

    #[tokio::test]
    async fn test_should_reject_invalid_input_before_sending() {
        let (handler, seen) = recording(match_service());
        let server = FixtureServer::start(handler).await;
        let client = client_for(&server.endpoint());

        let result = client.invoke::<PutMatch>(record("", "a", "b")).await;
        assert!(matches!(result, Err(SdkError::Marshal(_))));
        assert!(seen.lock().unwrap().is_empty(), "nothing should reach the wire");
    }
}

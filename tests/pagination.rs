//! Pagination behaviour against a mocked list endpoint.
//!
//! Uses wiremock to serve synthetic pages and count requests.

use futures::{StreamExt, TryStreamExt};
use quetz_client::{list_channels, paginate, Channel, QuetzClient, QuetzError, User};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn channel_json(name: &str) -> Value {
    json!({
        "name": name,
        "description": null,
        "private": false,
        "size_limit": null,
        "ttl": 36000,
        "mirror_channel_url": null,
        "mirror_mode": null,
        "members_count": 1,
        "size": 0
    })
}

fn user_json(i: u64) -> Value {
    json!({"id": format!("id-{i}"), "username": format!("user{i}")})
}

/// Mount one page of a synthetic endpoint holding `total` users.
async fn mount_user_page(server: &MockServer, skip: u64, limit: u64, total: u64) {
    let items: Vec<Value> = (skip..(skip + limit).min(total)).map(user_json).collect();
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("skip", skip.to_string()))
        .and(query_param("limit", limit.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": items,
            "count": total,
            "skip": skip,
            "limit": limit
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

#[tokio::test]
async fn test_list_channels_across_two_pages() {
    let mock_server = MockServer::start().await;
    let names = ["a", "b", "c", "d"];

    for (skip, page) in [(0, &names[..2]), (2, &names[2..])] {
        let result: Vec<Value> = page.iter().map(|n| channel_json(n)).collect();
        Mock::given(method("GET"))
            .and(path("/api/channels"))
            .and(query_param("skip", skip.to_string()))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": result,
                "count": 4,
                "skip": skip,
                "limit": 2
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = QuetzClient::from_api_key(&mock_server.uri(), "key").unwrap();
    let channels: Vec<Channel> = list_channels(&client, 2)
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    let got: Vec<&str> = channels.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(got, names);
    assert_eq!(request_count(&mock_server).await, 2);
}

#[tokio::test]
async fn test_item_and_request_counts_for_various_sizes() {
    for (total, page_size) in [(0u64, 3u32), (1, 1), (5, 2), (6, 3), (7, 10)] {
        let mock_server = MockServer::start().await;
        let pages = if total == 0 {
            1
        } else {
            total.div_ceil(u64::from(page_size))
        };
        for p in 0..pages {
            mount_user_page(&mock_server, p * u64::from(page_size), u64::from(page_size), total)
                .await;
        }

        let client = QuetzClient::from_api_key(&mock_server.uri(), "key").unwrap();
        let users: Vec<User> = paginate::<User>(&client, "api/users", Vec::new(), page_size)
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        let expected: Vec<String> = (0..total).map(|i| format!("user{i}")).collect();
        let got: Vec<String> = users.into_iter().map(|u| u.username).collect();
        assert_eq!(got, expected, "total={total} page_size={page_size}");
        assert_eq!(request_count(&mock_server).await as u64, pages);
    }
}

#[tokio::test]
async fn test_zero_page_size_is_rejected_before_any_request() {
    let mock_server = MockServer::start().await;
    let client = QuetzClient::from_api_key(&mock_server.uri(), "key").unwrap();

    let err = list_channels(&client, 0).unwrap_err();

    assert!(matches!(err, QuetzError::Config(_)));
    assert_eq!(request_count(&mock_server).await, 0);
}

#[tokio::test]
async fn test_nothing_is_requested_until_polled() {
    let mock_server = MockServer::start().await;
    mount_user_page(&mock_server, 0, 2, 4).await;
    let client = QuetzClient::from_api_key(&mock_server.uri(), "key").unwrap();

    let mut pager = paginate::<User>(&client, "api/users", Vec::new(), 2).unwrap();
    assert_eq!(request_count(&mock_server).await, 0);

    // Both items of the first page come from a single request
    let first = pager.next().await.unwrap().unwrap();
    let second = pager.next().await.unwrap().unwrap();
    assert_eq!(first.username, "user0");
    assert_eq!(second.username, "user1");
    assert_eq!(request_count(&mock_server).await, 1);

    // Abandoning the stream issues no further requests
    drop(pager);
    assert_eq!(request_count(&mock_server).await, 1);
}

#[tokio::test]
async fn test_empty_page_terminates_despite_count() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [],
            "count": 100,
            "skip": 0,
            "limit": 10
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = QuetzClient::from_api_key(&mock_server.uri(), "key").unwrap();
    let users: Vec<User> = paginate::<User>(&client, "api/users", Vec::new(), 10)
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert!(users.is_empty());
}

#[tokio::test]
async fn test_short_page_advances_offset_by_page_size() {
    let mock_server = MockServer::start().await;

    // The server returns one item less than requested on the first page
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [user_json(0)],
            "count": 3,
            "skip": 0,
            "limit": 2
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("skip", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [user_json(2)],
            "count": 3,
            "skip": 2,
            "limit": 2
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = QuetzClient::from_api_key(&mock_server.uri(), "key").unwrap();
    let users: Vec<User> = paginate::<User>(&client, "api/users", Vec::new(), 2)
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    let got: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(got, ["user0", "user2"]);
}

#[tokio::test]
async fn test_api_error_surfaces_at_consumption_time() {
    let mock_server = MockServer::start().await;
    mount_user_page(&mock_server, 0, 2, 4).await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("skip", "2"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "database is down"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = QuetzClient::from_api_key(&mock_server.uri(), "key").unwrap();
    let mut pager = paginate::<User>(&client, "api/users", Vec::new(), 2).unwrap();

    assert!(pager.next().await.unwrap().is_ok());
    assert!(pager.next().await.unwrap().is_ok());

    let err = pager.next().await.unwrap().unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.detail().as_deref(), Some("database is down"));
    match err {
        QuetzError::Api { path, body, .. } => {
            assert_eq!(path, "api/users");
            assert_eq!(body, r#"{"detail":"database is down"}"#);
        }
        other => panic!("expected API error, got {other:?}"),
    }

    // The stream ends after an error
    assert!(pager.next().await.is_none());
}

#[tokio::test]
async fn test_invalid_item_yields_decode_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [user_json(0), {"username": "no-id"}],
            "count": 2,
            "skip": 0,
            "limit": 10
        })))
        .mount(&mock_server)
        .await;

    let client = QuetzClient::from_api_key(&mock_server.uri(), "key").unwrap();
    let results: Vec<_> = paginate::<User>(&client, "api/users", Vec::new(), 10)
        .unwrap()
        .collect()
        .await;

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(QuetzError::Decode { record: "user", .. })
    ));
}

#[tokio::test]
async fn test_malformed_envelope_is_decode_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [user_json(0)]})))
        .mount(&mock_server)
        .await;

    let client = QuetzClient::from_api_key(&mock_server.uri(), "key").unwrap();
    let result: Result<Vec<User>, _> = paginate::<User>(&client, "api/users", Vec::new(), 10)
        .unwrap()
        .try_collect()
        .await;

    assert!(matches!(
        result,
        Err(QuetzError::Decode {
            record: "list envelope",
            ..
        })
    ));
}

#[tokio::test]
async fn test_each_call_is_a_fresh_sequence() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [user_json(0)],
            "count": 1,
            "skip": 0,
            "limit": 5
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = QuetzClient::from_api_key(&mock_server.uri(), "key").unwrap();
    for _ in 0..2 {
        let users: Vec<User> = paginate::<User>(&client, "api/users", Vec::new(), 5)
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(users.len(), 1);
    }
}

#[tokio::test]
async fn test_bare_array_response_is_a_single_page() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([user_json(0), user_json(1)])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = QuetzClient::from_api_key(&mock_server.uri(), "key").unwrap();
    let users: Vec<User> = paginate::<User>(&client, "api/users", Vec::new(), 1)
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    let got: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(got, ["user0", "user1"]);
}

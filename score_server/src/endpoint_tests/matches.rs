use actix_web::{http::StatusCode, test::TestRequest, web};
use score_engine::{
    db_types::{MatchStatus, StatsSummary},
    events::EventProducers,
    MatchLifecycleApi,
    MatchStoreError,
    MemoryCache,
};
use serde_json::json;

use super::{
    helpers::{memory_api, send, send_with_policy, TestApi},
    mocks::{MockCache, MockStore},
};
use crate::{config::DEFAULT_CONTENT_SECURITY_POLICY, data_objects::MatchResponse};

async fn create(api: &TestApi, team_a: &str, team_b: &str, scheduled_at: &str) -> MatchResponse {
    let body = json!({ "team_a": team_a, "team_b": team_b, "scheduled_at": scheduled_at });
    let res = send(api, TestRequest::post().uri("/matches").set_json(body)).await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    res.json()
}

fn ids(matches: &[MatchResponse]) -> Vec<i64> {
    matches.iter().map(|m| m.record.id).collect()
}

#[actix_web::test]
async fn create_match() {
    let api = memory_api();
    let m = create(&api, "Alpha", "Beta", "2024-06-14T19:00:00").await;
    assert_eq!(m.record.id, 1);
    assert_eq!(m.record.status, MatchStatus::InProgress);
    assert_eq!((m.record.score_a, m.record.score_b), (0, 0));
    assert_eq!(m.record.scheduled_at.to_rfc3339(), "2024-06-14T19:00:00+00:00");
    assert_eq!(m.result, "Draw: 0 x 0");
}

#[actix_web::test]
async fn create_match_with_offset_timestamp() {
    let api = memory_api();
    let m = create(&api, "Alpha", "Beta", "2024-06-14T21:00:00+02:00").await;
    assert_eq!(m.record.scheduled_at.to_rfc3339(), "2024-06-14T19:00:00+00:00");
}

#[actix_web::test]
async fn create_match_rejects_bad_input() {
    let api = memory_api();
    let cases = [
        json!({ "team_a": "", "team_b": "Beta", "scheduled_at": "2024-06-14T19:00:00" }),
        json!({ "team_b": "Beta", "scheduled_at": "2024-06-14T19:00:00" }),
        json!({ "team_a": "Alpha", "team_b": "Beta" }),
        json!({ "team_a": "Alpha", "team_b": "Beta", "scheduled_at": "next tuesday" }),
        json!({ "team_a": 7, "team_b": "Beta", "scheduled_at": "2024-06-14T19:00:00" }),
    ];
    for body in cases {
        let res = send(&api, TestRequest::post().uri("/matches").set_json(&body)).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{body}");
        assert!(!res.error_message().is_empty());
    }
    let stats = send(&api, TestRequest::get().uri("/matches/stats")).await.json::<StatsSummary>();
    assert_eq!(stats.total, 0);
}

#[actix_web::test]
async fn fetch_match() {
    let api = memory_api();
    let created = create(&api, "Alpha", "Beta", "2024-06-14T19:00:00").await;
    let res = send(&api, TestRequest::get().uri("/matches/1")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json::<MatchResponse>(), created);

    let res = send(&api, TestRequest::get().uri("/matches/999")).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.error_message(), "The data was not found. Match #999 was not found");

    let res = send(&api, TestRequest::get().uri("/matches/abc")).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn score_and_close_scenario() {
    let api = memory_api();
    create(&api, "Alpha", "Beta", "2024-06-14T19:00:00").await;

    let res = send(&api, TestRequest::put().uri("/matches/1/score").set_json(json!({"score_a": 3, "score_b": 1}))).await;
    assert_eq!(res.status, StatusCode::OK);
    let m = res.json::<MatchResponse>();
    assert_eq!((m.record.score_a, m.record.score_b), (3, 1));
    assert_eq!(m.result, "Alpha won 3 x 1");
    assert!(m.record.updated_at.is_some());

    let res = send(&api, TestRequest::put().uri("/matches/1/status?status=closed")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json::<MatchResponse>().record.status, MatchStatus::Closed);

    let res = send(&api, TestRequest::put().uri("/matches/1/score").set_json(json!({"score_a": 4, "score_b": 1}))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let res = send(&api, TestRequest::put().uri("/matches/1/status?status=CLOSED")).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let m = send(&api, TestRequest::get().uri("/matches/1")).await.json::<MatchResponse>();
    assert_eq!((m.record.score_a, m.record.score_b, m.record.status), (3, 1, MatchStatus::Closed));
}

#[actix_web::test]
async fn score_update_errors() {
    let api = memory_api();
    create(&api, "Alpha", "Beta", "2024-06-14T19:00:00").await;
    let res = send(&api, TestRequest::put().uri("/matches/1/score").set_json(json!({"score_a": -1, "score_b": 0}))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let res = send(&api, TestRequest::put().uri("/matches/1/score").set_json(json!({"score_a": 1}))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let res = send(&api, TestRequest::put().uri("/matches/9/score").set_json(json!({"score_a": 1, "score_b": 0}))).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    let m = send(&api, TestRequest::get().uri("/matches/1")).await.json::<MatchResponse>();
    assert_eq!((m.record.score_a, m.record.score_b), (0, 0));
}

#[actix_web::test]
async fn status_changes_other_than_closing_are_rejected() {
    let api = memory_api();
    create(&api, "Alpha", "Beta", "2024-06-14T19:00:00").await;
    for uri in ["/matches/1/status?status=IN_PROGRESS", "/matches/1/status?status=PAUSED", "/matches/1/status"] {
        let res = send(&api, TestRequest::put().uri(uri)).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{uri}");
    }
    let res = send(&api, TestRequest::put().uri("/matches/5/status?status=CLOSED")).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_and_filter() {
    let api = memory_api();
    create(&api, "Alpha", "Beta", "2024-06-14T19:00:00").await;
    create(&api, "Gamma", "Delta", "2024-06-16T15:00:00").await;
    create(&api, "Epsilon", "Zeta", "2024-06-15T21:00:00").await;
    send(&api, TestRequest::put().uri("/matches/2/status?status=CLOSED")).await;

    let all = send(&api, TestRequest::get().uri("/matches")).await.json::<Vec<MatchResponse>>();
    assert_eq!(ids(&all), vec![2, 3, 1]);

    let open = send(&api, TestRequest::get().uri("/matches?status=in_progress")).await.json::<Vec<MatchResponse>>();
    assert_eq!(ids(&open), vec![3, 1]);
    let open = send(&api, TestRequest::get().uri("/matches/in_progress")).await.json::<Vec<MatchResponse>>();
    assert_eq!(ids(&open), vec![3, 1]);
    let closed = send(&api, TestRequest::get().uri("/matches/closed")).await.json::<Vec<MatchResponse>>();
    assert_eq!(ids(&closed), vec![2]);

    let uri = "/matches?from=2024-06-14T19:00:00&to=2024-06-15T21:00:00";
    let range = send(&api, TestRequest::get().uri(uri)).await.json::<Vec<MatchResponse>>();
    assert_eq!(ids(&range), vec![3, 1]);

    // Status wins over a range
    let uri = "/matches?status=CLOSED&from=2024-06-14T19:00:00&to=2024-06-15T21:00:00";
    let closed = send(&api, TestRequest::get().uri(uri)).await.json::<Vec<MatchResponse>>();
    assert_eq!(ids(&closed), vec![2]);

    for uri in ["/matches?status=PAUSED", "/matches?from=2024-06-14T19:00:00", "/matches?from=today&to=tomorrow"] {
        let res = send(&api, TestRequest::get().uri(uri)).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[actix_web::test]
async fn stats() {
    let api = memory_api();
    create(&api, "Alpha", "Beta", "2024-06-14T19:00:00").await;
    create(&api, "Gamma", "Delta", "2024-06-14T21:00:00").await;
    send(&api, TestRequest::put().uri("/matches/1/status?status=CLOSED")).await;
    let res = send(&api, TestRequest::get().uri("/matches/stats")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json::<serde_json::Value>(), json!({"total": 2, "in_progress": 1, "closed": 1}));
}

#[actix_web::test]
async fn delete_match() {
    let api = memory_api();
    create(&api, "Alpha", "Beta", "2024-06-14T19:00:00").await;
    let res = send(&api, TestRequest::get().uri("/matches/1")).await;
    assert_eq!(res.status, StatusCode::OK);
    let res = send(&api, TestRequest::delete().uri("/matches/1")).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(res.body.is_empty());
    let res = send(&api, TestRequest::get().uri("/matches/1")).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    let res = send(&api, TestRequest::delete().uri("/matches/1")).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn security_policy_header() {
    let api = memory_api();
    let res = send(&api, TestRequest::get().uri("/matches/404")).await;
    assert_eq!(res.csp.as_deref(), Some(DEFAULT_CONTENT_SECURITY_POLICY));
    let res = send_with_policy(&api, TestRequest::get().uri("/matches"), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.csp.is_none());
}

#[actix_web::test]
async fn store_failures_are_server_errors() {
    let _ = env_logger::try_init();
    let mut store = MockStore::new();
    store.expect_find_by_id().returning(|_| Err(MatchStoreError::DatabaseError("database is locked".into())));
    store.expect_list_all().returning(|| Err(MatchStoreError::DatabaseError("database is locked".into())));
    let mut cache = MockCache::new();
    cache.expect_get().returning(|_| Ok(None));
    let api = web::Data::new(MatchLifecycleApi::new(store, cache, EventProducers::default()));

    let res = send(&api, TestRequest::get().uri("/matches/1")).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!res.error_message().contains("database is locked"));
    assert!(res.error_message().contains("could not complete the request"));
    let res = send(&api, TestRequest::get().uri("/matches")).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!res.error_message().contains("database"));
}

#[actix_web::test]
async fn cache_failures_are_invisible_to_clients() {
    let api = web::Data::new(MatchLifecycleApi::new(
        score_engine::InMemoryDatabase::new(),
        {
            let mut cache = MockCache::new();
            cache.expect_put().returning(|_| Err(score_engine::CacheError::Unavailable("offline".into())));
            cache.expect_get().returning(|_| Err(score_engine::CacheError::Unavailable("offline".into())));
            cache
        },
        EventProducers::default(),
    ));
    let body = json!({ "team_a": "Alpha", "team_b": "Beta", "scheduled_at": "2024-06-14T19:00:00" });
    let res = send(&api, TestRequest::post().uri("/matches").set_json(body)).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let res = send(&api, TestRequest::get().uri("/matches/1")).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[actix_web::test]
async fn cached_matches_are_served_after_create() {
    let api = web::Data::new(MatchLifecycleApi::new(
        score_engine::InMemoryDatabase::new(),
        MemoryCache::default(),
        EventProducers::default(),
    ));
    let body = json!({ "team_a": "Alpha", "team_b": "Beta", "scheduled_at": "2024-06-14T19:00:00" });
    send(&api, TestRequest::post().uri("/matches").set_json(body)).await;
    let cached = score_engine::ResultCache::get(api.cache(), 1).await.unwrap();
    assert!(cached.is_some());
}

use crate::helpers::{BASE_URL, TestState, error_kinds, harvest, init_app, owner_header};
use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::test;
use chrono::Local;
use serde_json::{Value, json};

fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[actix_web::test]
async fn add_harvest_returns_the_stored_entry() {
    let state = TestState::new();
    let owner = state.user("alice").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/harvests")
        .insert_header(owner_header(owner))
        .set_json(harvest(&today(), "apple", 1000, "1.50"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp.headers().get(LOCATION).unwrap().to_str().unwrap().to_owned();
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(location, format!("{BASE_URL}/harvests/{}", body["id"]));
    assert_eq!(body["fruit"], "apple");
    assert_eq!(body["amount"], 1000);
    assert_eq!(body["price"], "1.50");
    assert_eq!(body["value"].as_str().unwrap().parse::<f64>().unwrap(), 1500.0);
    assert_eq!(body["label"], format!("Apple {}", today()));
}

#[actix_web::test]
async fn resubmitting_the_same_key_is_a_conflict() {
    let state = TestState::new();
    let owner = state.user("alice").await;
    let app = init_app!(state);
    let submission = harvest(&today(), "apple", 1000, 1.5);

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let req = test::TestRequest::post()
            .uri("/harvests")
            .insert_header(owner_header(owner))
            .set_json(&submission)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);

        if expected == StatusCode::CONFLICT {
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(error_kinds(&body), vec!["DuplicateEntry"]);
            assert_eq!(body["errors"][0]["field"], Value::Null);
        }
    }
}

#[actix_web::test]
async fn same_key_for_another_owner_is_accepted() {
    let state = TestState::new();
    let alice = state.user("alice").await;
    let bob = state.user("bob").await;
    let app = init_app!(state);

    for owner in [alice, bob] {
        let req = test::TestRequest::post()
            .uri("/harvests")
            .insert_header(owner_header(owner))
            .set_json(harvest("2024-06-01", "cherry", 50, 4))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }
}

#[actix_web::test]
async fn out_of_bounds_submission_lists_every_error() {
    let state = TestState::new();
    let owner = state.user("alice").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/harvests")
        .insert_header(owner_header(owner))
        .set_json(harvest("1900-01-01", "cherry", 10_000_000, 100))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    let kinds = error_kinds(&body);
    for kind in ["DateTooEarly", "AmountOutOfBounds", "PriceOutOfBounds"] {
        assert!(kinds.iter().any(|k| k == kind), "{kind} missing from {kinds:?}");
    }
}

#[actix_web::test]
async fn incomplete_submission_names_each_missing_field() {
    let state = TestState::new();
    let owner = state.user("alice").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/harvests")
        .insert_header(owner_header(owner))
        .set_json(json!({ "fruit": "apple", "amount": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    let missing: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["kind"] == "MissingField")
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(missing, vec!["date", "amount", "price"]);
}

#[actix_web::test]
async fn requests_without_owner_are_unauthorized() {
    let state = TestState::new();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/harvests")
        .set_json(harvest("2024-06-01", "apple", 100, 1))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/harvests")
        .insert_header(("X-Owner-Id", "not-a-number"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn unknown_owner_is_forbidden() {
    let state = TestState::new();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/harvests")
        .insert_header(("X-Owner-Id", "99"))
        .set_json(harvest("2024-06-01", "apple", 100, 1))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn editing_respects_self_exclusion_and_other_keys() {
    let state = TestState::new();
    let owner = state.user("alice").await;
    let app = init_app!(state);

    let mut ids = Vec::new();
    for fruit in ["apple", "cherry"] {
        let req = test::TestRequest::post()
            .uri("/harvests")
            .insert_header(owner_header(owner))
            .set_json(harvest("2024-06-01", fruit, 100, 1))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(body["id"].as_i64().unwrap());
    }

    let req = test::TestRequest::put()
        .uri(&format!("/harvests/{}", ids[0]))
        .insert_header(owner_header(owner))
        .set_json(harvest("2024-06-01", "apple", 222, 10))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["amount"], 222);
    assert_eq!(body["value"].as_str().unwrap().parse::<f64>().unwrap(), 2220.0);

    let req = test::TestRequest::put()
        .uri(&format!("/harvests/{}", ids[1]))
        .insert_header(owner_header(owner))
        .set_json(harvest("2024-06-01", "apple", 100, 1))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::put()
        .uri("/harvests/4242")
        .insert_header(owner_header(owner))
        .set_json(harvest("2024-06-01", "raspberry", 100, 1))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn listing_filters_and_paginates() {
    let state = TestState::new();
    let owner = state.user("alice").await;
    let app = init_app!(state);

    for (date, fruit) in [
        ("2024-06-05", "apple"),
        ("2024-06-01", "apple"),
        ("2024-06-03", "apple"),
        ("2024-06-04", "apple"),
        ("2024-06-02", "cherry"),
        ("2023-06-02", "apple"),
    ] {
        let req = test::TestRequest::post()
            .uri("/harvests")
            .insert_header(owner_header(owner))
            .set_json(harvest(date, fruit, 100, 1))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/harvests?year=2024&fruit=apple&page=2")
        .insert_header(owner_header(owner))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["totalItems"], 4);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["page"], 2);
    let dates: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-06-05"]);

    let req = test::TestRequest::get()
        .uri("/harvests")
        .insert_header(owner_header(owner))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["totalItems"], 6);
    assert_eq!(body["items"][0]["date"], "2023-06-02");
}

#[actix_web::test]
async fn unknown_fruit_filter_is_a_bad_request() {
    let state = TestState::new();
    let owner = state.user("alice").await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/harvests?fruit=banana")
        .insert_header(owner_header(owner))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn harvests_are_private_to_their_owner() {
    let state = TestState::new();
    let alice = state.user("alice").await;
    let bob = state.user("bob").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/harvests")
        .insert_header(owner_header(alice))
        .set_json(harvest("2024-06-01", "strawberry", 100, "2.20"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/harvests/{}", body["id"]);

    for method in [test::TestRequest::get(), test::TestRequest::delete()] {
        let req = method.uri(&uri).insert_header(owner_header(bob)).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(owner_header(alice))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(owner_header(alice))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

use crate::helpers::{TestState, harvest, init_app, owner_header};
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

#[actix_web::test]
async fn users_can_be_created_once() {
    let state = TestState::new();
    let app = init_app!(state);

    let create = |username: &str| {
        test::TestRequest::post()
            .uri("/admin/users")
            .set_json(json!({ "username": username }))
            .to_request()
    };

    let resp = test::call_service(&app, create("alice")).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "alice");

    assert_eq!(test::call_service(&app, create("alice")).await.status(), StatusCode::CONFLICT);
    assert_eq!(test::call_service(&app, create("  ")).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn deleting_a_user_removes_their_harvests() {
    let state = TestState::new();
    let alice = state.user("alice").await;
    let bob = state.user("bob").await;
    let app = init_app!(state);

    for (owner, date) in [(alice, "2024-06-01"), (alice, "2024-06-02"), (bob, "2024-06-01")] {
        let req = test::TestRequest::post()
            .uri("/harvests")
            .insert_header(owner_header(owner))
            .set_json(harvest(date, "apple", 100, 1))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/admin/users").to_request();
    let users: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(users[0]["harvestCount"], 2);
    assert_eq!(users[1]["harvestCount"], 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/admin/users/{alice}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::delete()
        .uri(&format!("/admin/users/{alice}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/admin/harvests/count").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "count": 1 }));
}

#[actix_web::test]
async fn bulk_delete_reports_missing_ids() {
    let state = TestState::new();
    let owner = state.user("alice").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/harvests")
        .insert_header(owner_header(owner))
        .set_json(harvest("2024-06-01", "apple", 100, 1))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri("/admin/harvests")
        .set_json(json!({ "ids": [created["id"], 77] }))
        .to_request();
    let outcome: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        outcome,
        json!([
            { "id": created["id"], "deleted": true },
            { "id": 77, "deleted": false },
        ])
    );

    let req = test::TestRequest::delete()
        .uri("/admin/harvests")
        .set_json(json!({ "ids": [] }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn harvests_of_a_user_can_be_listed_with_filters() {
    let state = TestState::new();
    let alice = state.user("alice").await;
    let bob = state.user("bob").await;
    let app = init_app!(state);

    for (owner, date, fruit) in [
        (alice, "2024-06-01", "apple"),
        (alice, "2024-06-02", "cherry"),
        (alice, "2023-06-01", "apple"),
        (bob, "2024-06-01", "apple"),
    ] {
        let req = test::TestRequest::post()
            .uri("/harvests")
            .insert_header(owner_header(owner))
            .set_json(harvest(date, fruit, 100, 1))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/admin/users/{alice}/harvests"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["harvests"]["totalItems"], 3);

    let req = test::TestRequest::get()
        .uri(&format!("/admin/users/{alice}/harvests?year=2024&fruit=apple"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["harvests"]["totalItems"], 1);
    assert_eq!(body["harvests"]["items"][0]["date"], "2024-06-01");
    assert_eq!(body["harvests"]["items"][0]["owner"], alice.0);

    let req = test::TestRequest::get()
        .uri(&format!("/admin/users/{bob}/harvests?year=2023"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["harvests"]["totalItems"], 0);
}

#[actix_web::test]
async fn listing_harvests_of_an_unknown_user_is_not_found() {
    let state = TestState::new();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/admin/users/404/harvests?fruit=apple")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = test::read_body(resp).await;
    assert_eq!(body, "User with given id does not exist.");
}

#[actix_web::test]
async fn bulk_user_delete_reports_each_id() {
    let state = TestState::new();
    let alice = state.user("alice").await;
    let bob = state.user("bob").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/harvests")
        .insert_header(owner_header(alice))
        .set_json(harvest("2024-06-01", "apple", 100, 1))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::delete()
        .uri("/admin/users")
        .set_json(json!({ "ids": [alice.0, 77] }))
        .to_request();
    let outcome: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        outcome,
        json!([
            { "id": alice.0, "deleted": true },
            { "id": 77, "deleted": false },
        ])
    );

    let req = test::TestRequest::get().uri("/admin/users").to_request();
    let users: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(users, json!([{ "id": bob.0, "username": "bob", "harvestCount": 0 }]));

    let req = test::TestRequest::delete()
        .uri("/admin/users")
        .set_json(json!({ "ids": [] }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

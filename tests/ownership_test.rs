mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use std::time::Duration;

async fn owner_create(t: &TestApp, user_id: i64, subject: &str) -> serde_json::Value {
    let (status, json) = t
        .send(multipart_request(
            "POST",
            &format!("/users/{}/complaints", user_id),
            Caller::User(user_id),
            &complaint_fields(subject),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "owner create failed: {}", json);
    json
}

#[tokio::test]
async fn test_owner_files_under_own_id() {
    let t = setup().await;
    let alice = t.signup("alice@example.com").await;
    let bob = t.signup("bob@example.com").await;

    // A user_id in the payload does not override the path owner
    let bob_str = bob.to_string();
    let mut fields = complaint_fields("Mine");
    fields.push(("user_id", bob_str.as_str()));
    let (status, json) = t
        .send(multipart_request(
            "POST",
            &format!("/users/{}/complaints", alice),
            Caller::User(alice),
            &fields,
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user_id"], alice);
}

#[tokio::test]
async fn test_owner_list_is_newest_first_and_private() {
    let t = setup().await;
    let alice = t.signup("alice@example.com").await;
    let bob = t.signup("bob@example.com").await;

    for subject in ["oldest", "middle", "newest"] {
        owner_create(&t, alice, subject).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    owner_create(&t, bob, "bob's").await;

    let (status, json) = t
        .send(request(
            "GET",
            &format!("/users/{}/complaints", alice),
            Caller::User(alice),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let subjects: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["subject"].as_str().unwrap())
        .collect();
    assert_eq!(subjects, vec!["newest", "middle", "oldest"]);

    // Admin sees everyone's complaints
    let (_, json) = t.send(request("GET", "/complaints", admin())).await;
    assert_eq!(json.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_foreign_complaint_looks_missing() {
    let t = setup().await;
    let alice = t.signup("alice@example.com").await;
    let bob = t.signup("bob@example.com").await;

    let bobs = owner_create(&t, bob, "Bob's complaint").await["id"]
        .as_i64()
        .unwrap();
    let missing = bobs + 1000;

    let base = format!("/users/{}/complaints", alice);
    let caller = Caller::User(alice);

    for id in [bobs, missing] {
        let (status, json) = t
            .send(request("GET", &format!("{}/{}", base, id), caller))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Complaint not found or not yours");

        let (status, json) = t
            .send(multipart_request(
                "PUT",
                &format!("{}/{}", base, id),
                caller,
                &[("status", "hijacked")],
                None,
            ))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Complaint not found or not yours");

        let (status, json) = t
            .send(json_request(
                "PUT",
                &format!("{}/{}/feedback", base, id),
                Some(caller),
                &json!({ "rating": 1 }),
            ))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Complaint not found or not yours");

        let (status, json) = t
            .send(request("DELETE", &format!("{}/{}/attachment", base, id), caller))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Complaint not found or not yours");

        let (status, json) = t
            .send(request("DELETE", &format!("{}/{}", base, id), caller))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Complaint not found or not yours");
    }

    // Bob's complaint is untouched
    let (status, json) = t
        .send(request("GET", &format!("/complaints/{}", bobs), admin()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "open");
    assert!(json["rating"].is_null());
}

#[tokio::test]
async fn test_owner_update_and_feedback() {
    let t = setup().await;
    let alice = t.signup("alice@example.com").await;
    let id = owner_create(&t, alice, "Noisy neighbour").await["id"]
        .as_i64()
        .unwrap();
    let uri = format!("/users/{}/complaints/{}", alice, id);

    // Owners may set priority
    let (status, json) = t
        .send(json_request(
            "PUT",
            &uri,
            Some(Caller::User(alice)),
            &json!({ "priority": "low", "description": "" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["priority"], "low");
    assert_eq!(json["description"], "");
    assert_eq!(json["subject"], "Noisy neighbour");

    let (status, _) = t
        .send(multipart_request("PUT", &uri, Caller::User(alice), &[], None))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = t
        .send(json_request(
            "PUT",
            &format!("{}/feedback", uri),
            Some(Caller::User(alice)),
            &json!({ "rating": 2, "comment": "meh" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["complaint"]["rating"], 2);
    assert_eq!(json["complaint"]["user_id"], alice);

    let (status, json) = t.send(request("DELETE", &uri, Caller::User(alice))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["deleted"]["id"], id);

    let (status, _) = t.send(request("GET", &uri, Caller::User(alice))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_identity_must_match_path() {
    let t = setup().await;
    let alice = t.signup("alice@example.com").await;
    let bob = t.signup("bob@example.com").await;

    let uri = format!("/users/{}/complaints", alice);

    let (status, _) = t.send(request("GET", &uri, Caller::User(bob))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t.send(request("GET", &uri, Caller::Anonymous)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The admin role does not stand in for the owner header
    let (status, _) = t.send(request("GET", &uri, admin())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t
        .send(multipart_request(
            "POST",
            &uri,
            Caller::User(bob),
            &complaint_fields("Spoofed"),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, json) = t.send(request("GET", "/complaints", admin())).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unregistered_owner_can_file() {
    let t = setup().await;
    let ghost = 42;

    let (status, json) = t
        .send(multipart_request(
            "POST",
            &format!("/users/{}/complaints", ghost),
            Caller::User(ghost),
            &complaint_fields("No account yet"),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["user_id"], ghost);

    let (status, json) = t
        .send(multipart_request(
            "POST",
            &format!("/users/{}/complaints", ghost),
            Caller::User(ghost),
            &complaint_fields("With a file"),
            Some(("a.txt", &b"hi"[..])),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    let path = json["attachment_path"].as_str().unwrap();
    assert_eq!(std::fs::read(path).unwrap(), b"hi");
    assert_eq!(t.stored_blobs(), 1);

    let (status, json) = t
        .send(request(
            "GET",
            &format!("/users/{}/complaints", ghost),
            Caller::User(ghost),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);
}

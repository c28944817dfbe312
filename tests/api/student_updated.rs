use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{student, student_update, TestApp};

async fn outcome_of(response: reqwest::Response) -> String {
    let body: serde_json::Value = response.json().await.expect("Response body is not JSON.");

    body["outcome"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn acceptance_sends_one_email_to_the_student() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(path("/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_student_update(&student_update(student("Pending"), student("Accepted")))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(outcome_of(response).await, "sent");

    let received_requests = &test_app.email_server.received_requests().await.unwrap();
    let email: serde_json::Value = serde_json::from_slice(&received_requests[0].body).unwrap();

    assert_eq!(
        email["personalizations"][0]["to"][0]["email"].as_str(),
        Some("a@x.com")
    );
    assert_eq!(
        email["subject"].as_str(),
        Some("Congratulations! You Have Been Accepted")
    );
    assert!(email["content"][0]["value"]
        .as_str()
        .unwrap()
        .contains("Ana Reyes"));
}

#[tokio::test]
async fn legacy_name_fields_are_used_in_the_email() {
    let test_app = TestApp::spawn_app().await;
    let before = serde_json::json!({
        "id": "stu-1",
        "status": "Pending",
        "email": "a@x.com",
        "fname": "Ana",
        "lname": "Reyes"
    });
    let mut after = before.clone();
    after["status"] = "Accepted".into();

    Mock::given(path("/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_student_update(&student_update(before, after))
        .await;

    assert_eq!(outcome_of(response).await, "sent");

    let received_requests = &test_app.email_server.received_requests().await.unwrap();
    let email: serde_json::Value = serde_json::from_slice(&received_requests[0].body).unwrap();

    assert!(email["content"][0]["value"]
        .as_str()
        .unwrap()
        .contains("Dear Ana Reyes,"));
}

#[tokio::test]
async fn acceptance_from_any_other_status_sends_an_email() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(path("/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&test_app.email_server)
        .await;

    let mut without_status = student("Pending");
    without_status.as_object_mut().unwrap().remove("status");

    let test_cases = vec![
        (student("Waitlisted"), "a dashboard-defined status"),
        (student_with_null_status(), "a null status"),
        (without_status, "no status at all"),
    ];

    for (before, description) in test_cases {
        let response = test_app
            .post_student_update(&student_update(before, student("Accepted")))
            .await;

        assert_eq!(
            200,
            response.status().as_u16(),
            "The API did not succeed when the record moved to Accepted from {}",
            description
        );
        assert_eq!(
            outcome_of(response).await,
            "sent",
            "No email was sent when the record moved to Accepted from {}",
            description
        );
    }
}

fn student_with_null_status() -> serde_json::Value {
    let mut student = student("Pending");
    student["status"] = serde_json::Value::Null;
    student
}

#[tokio::test]
async fn updates_that_are_not_an_acceptance_send_nothing() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    let mut changed_email = student("Accepted");
    changed_email["email"] = "new@x.com".into();

    // Table-driven: every case is a valid update that must not notify the student
    let test_cases = vec![
        (
            student_update(student("Accepted"), changed_email),
            "accepted record with a changed email",
        ),
        (
            student_update(student("Rejected"), student("Pending")),
            "rejected record moved back to pending",
        ),
        (
            student_update(student("Accepted"), student("Rejected")),
            "accepted record rejected",
        ),
        (
            student_update(student("Pending"), student("Pending")),
            "pending record rewritten",
        ),
        (
            student_update(student("Pending"), student("Waitlisted")),
            "pending record moved to a dashboard-defined status",
        ),
    ];

    for (body, description) in test_cases {
        let response = test_app.post_student_update(&body).await;

        assert_eq!(
            200,
            response.status().as_u16(),
            "The API did not succeed when the update was {}",
            description
        );
        assert_eq!(
            outcome_of(response).await,
            "skipped",
            "An email was attempted when the update was {}",
            description
        );
    }
}

#[tokio::test]
async fn relay_failure_is_not_propagated() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_student_update(&student_update(student("Rejected"), student("Accepted")))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(outcome_of(response).await, "failed");
}

#[tokio::test]
async fn updates_without_a_valid_token_are_rejected_with_401() {
    let test_app = TestApp::spawn_app().await;
    let body = student_update(student("Pending"), student("Accepted"));

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    for token in [None, Some("wrong-token")] {
        let response = test_app.post_student_update_with_token(&body, token).await;

        assert_eq!(response.status().as_u16(), 401);
    }
}

#[tokio::test]
async fn malformed_updates_without_a_token_are_rejected_with_401() {
    let test_app = TestApp::spawn_app().await;
    let test_cases = vec![
        (serde_json::json!({ "before": student("Pending") }), "missing after snapshot"),
        (serde_json::json!("not a student update"), "not an object"),
    ];

    for (invalid_body, description) in test_cases {
        let response = test_app
            .post_student_update_with_token(&invalid_body, None)
            .await;

        assert_eq!(
            401,
            response.status().as_u16(),
            "The API did not fail with 401 status when an unauthenticated payload was {}",
            description
        );
    }
}

#[tokio::test]
async fn malformed_updates_are_rejected_with_400() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    let mut other_record = student("Accepted");
    other_record["id"] = "stu-2".into();
    let mut invalid_email = student("Accepted");
    invalid_email["email"] = "ana.reyes".into();
    let mut missing_name = student("Accepted");
    missing_name.as_object_mut().unwrap().remove("lastName");

    let test_cases = vec![
        (serde_json::json!({ "before": student("Pending") }), "missing after snapshot"),
        (
            student_update(student("Pending"), other_record),
            "snapshots of different records",
        ),
        (
            student_update(student("Pending"), invalid_email),
            "accepted record with an invalid email",
        ),
        (
            student_update(student("Pending"), missing_name),
            "accepted record without a last name",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_student_update(&invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
    }
}

// tests/exam_tests.rs

mod common;

use std::collections::HashSet;

use common::{register_and_login, seed_questions, spawn_app, unique_category};
use serde_json::json;

async fn start_exam(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    exam_kind: &str,
    quota: serde_json::Value,
) -> reqwest::Response {
    client
        .post(format!("{}/api/exams", address))
        .bearer_auth(token)
        .json(&json!({
            "exam_kind": exam_kind,
            "quota": quota
        }))
        .send()
        .await
        .expect("Request failed")
}

#[tokio::test]
async fn start_exam_creates_contiguous_slots_without_repeats() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;

    let verbal = unique_category("verbal");
    let math = unique_category("math");
    let verbal_ids: HashSet<String> = seed_questions(&pool, "spi", &verbal, 3, 2)
        .await
        .into_iter()
        .map(|id| id.to_string())
        .collect();
    let math_ids: HashSet<String> = seed_questions(&pool, "spi", &math, 2, 2)
        .await
        .into_iter()
        .map(|id| id.to_string())
        .collect();

    let resp = start_exam(
        &client,
        &address,
        &token,
        "spi",
        json!([
            { "category": verbal, "count": 2 },
            { "category": math, "count": 1 }
        ]),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 201);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse json");
    let session_id = body["session_id"].as_str().expect("session_id missing");

    let results: serde_json::Value = client
        .get(format!("{}/api/exams/{}/results", address, session_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Failed to parse json");

    let slots = results["slots"].as_array().expect("slots missing");
    assert_eq!(slots.len(), 3);

    // Slot numbers form the sequence 1..=3
    let numbers: Vec<i64> = slots
        .iter()
        .map(|s| s["slot_number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);

    // No question appears twice within the session
    let question_ids: HashSet<&str> = slots
        .iter()
        .map(|s| s["question_id"].as_str().unwrap())
        .collect();
    assert_eq!(question_ids.len(), 3);

    // Category blocks follow the request order: slots 1-2 verbal, slot 3 math
    for slot in &slots[..2] {
        let qid = slot["question_id"].as_str().unwrap();
        assert!(verbal_ids.contains(qid), "slot {} is not verbal", slot["slot_number"]);
    }
    let qid = slots[2]["question_id"].as_str().unwrap();
    assert!(math_ids.contains(qid), "slot 3 is not math");
}

#[tokio::test]
async fn duplicate_quota_categories_are_rejected() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;

    let verbal = unique_category("verbal");
    seed_questions(&pool, "spi", &verbal, 1, 2).await;

    // Two blocks of the same 1-question category would have to redraw
    // the same question, so the request is rejected outright.
    let resp = start_exam(
        &client,
        &address,
        &token,
        "spi",
        json!([
            { "category": verbal, "count": 1 },
            { "category": verbal, "count": 1 }
        ]),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 400);

    // Nothing half-created is left behind
    let in_progress: serde_json::Value = client
        .get(format!("{}/api/exams/in-progress", address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Failed to parse json");
    assert!(in_progress["session_id"].is_null());
}

#[tokio::test]
async fn insufficient_questions_aborts_the_whole_start() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;

    let verbal = unique_category("verbal");
    seed_questions(&pool, "spi", &verbal, 3, 2).await;

    let resp = start_exam(
        &client,
        &address,
        &token,
        "spi",
        json!([{ "category": verbal, "count": 5 }]),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 422);

    let body: serde_json::Value = resp.json().await.expect("Failed to parse json");
    let message = body["error"].as_str().unwrap_or_default();
    assert!(message.contains("requested 5"), "got: {}", message);
    assert!(message.contains("available 3"), "got: {}", message);

    // The aborted start must not leave a half-created session behind
    let in_progress: serde_json::Value = client
        .get(format!("{}/api/exams/in-progress", address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Failed to parse json");
    assert!(in_progress["session_id"].is_null());
}

#[tokio::test]
async fn save_answer_judges_and_overwrites() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;

    let category = unique_category("logic");
    seed_questions(&pool, "cabgab", &category, 1, 2).await;

    let resp = start_exam(
        &client,
        &address,
        &token,
        "cabgab",
        json!([{ "category": category, "count": 1 }]),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 201);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse json");
    let session_id = body["session_id"].as_str().unwrap().to_string();

    // Wrong answer first
    let saved: serde_json::Value = client
        .put(format!("{}/api/exams/{}/answers/1", address, session_id))
        .bearer_auth(&token)
        .json(&json!({ "answer": 3 }))
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Failed to parse json");
    assert_eq!(saved["is_correct"], false);

    // Overwrite with the right one; last write wins
    let saved: serde_json::Value = client
        .put(format!("{}/api/exams/{}/answers/1", address, session_id))
        .bearer_auth(&token)
        .json(&json!({ "answer": 2 }))
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Failed to parse json");
    assert_eq!(saved["is_correct"], true);

    let results: serde_json::Value = client
        .get(format!("{}/api/exams/{}/results", address, session_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Failed to parse json");
    assert_eq!(results["correct_count"], 1);
    assert_eq!(results["total"], 1);
    assert_eq!(results["accuracy_rate"], 100.0);
    assert_eq!(results["slots"][0]["user_answer"], 2);
}

#[tokio::test]
async fn answer_out_of_range_is_rejected() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;

    let category = unique_category("range");
    seed_questions(&pool, "spi", &category, 1, 1).await;

    let resp = start_exam(
        &client,
        &address,
        &token,
        "spi",
        json!([{ "category": category, "count": 1 }]),
    )
    .await;
    let body: serde_json::Value = resp.json().await.expect("Failed to parse json");
    let session_id = body["session_id"].as_str().unwrap().to_string();

    let resp = client
        .put(format!("{}/api/exams/{}/answers/1", address, session_id))
        .bearer_auth(&token)
        .json(&json!({ "answer": 5 }))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status().as_u16(), 400);

    // Unknown slot is a 404
    let resp = client
        .put(format!("{}/api/exams/{}/answers/99", address, session_id))
        .bearer_auth(&token)
        .json(&json!({ "answer": 1 }))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn finish_is_idempotent_and_blocks_further_answers() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;

    let category = unique_category("finish");
    seed_questions(&pool, "spi", &category, 2, 1).await;

    let resp = start_exam(
        &client,
        &address,
        &token,
        "spi",
        json!([{ "category": category, "count": 2 }]),
    )
    .await;
    let body: serde_json::Value = resp.json().await.expect("Failed to parse json");
    let session_id = body["session_id"].as_str().unwrap().to_string();

    let resp = client
        .post(format!("{}/api/exams/{}/finish", address, session_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Request failed");
    assert!(resp.status().is_success());

    // Finishing twice is fine
    let resp = client
        .post(format!("{}/api/exams/{}/finish", address, session_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Request failed");
    assert!(resp.status().is_success());

    // But answering afterwards is not
    let resp = client
        .put(format!("{}/api/exams/{}/answers/1", address, session_id))
        .bearer_auth(&token)
        .json(&json!({ "answer": 1 }))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status().as_u16(), 400);

    let results: serde_json::Value = client
        .get(format!("{}/api/exams/{}/results", address, session_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Failed to parse json");
    assert_eq!(results["is_finished"], true);
    // Unanswered slots count against the score
    assert_eq!(results["correct_count"], 0);
    assert_eq!(results["total"], 2);
    assert_eq!(results["accuracy_rate"], 0.0);
}

#[tokio::test]
async fn in_progress_and_next_slot_support_resume() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;

    let category = unique_category("resume");
    seed_questions(&pool, "spi", &category, 3, 1).await;

    let resp = start_exam(
        &client,
        &address,
        &token,
        "spi",
        json!([{ "category": category, "count": 3 }]),
    )
    .await;
    let body: serde_json::Value = resp.json().await.expect("Failed to parse json");
    let session_id = body["session_id"].as_str().unwrap().to_string();

    // The fresh session is reported as in progress for its kind
    let in_progress: serde_json::Value = client
        .get(format!("{}/api/exams/in-progress?exam_kind=spi", address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Failed to parse json");
    assert_eq!(in_progress["session_id"], session_id.as_str());

    // ...but not for the other kind
    let in_progress: serde_json::Value = client
        .get(format!("{}/api/exams/in-progress?exam_kind=cabgab", address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Failed to parse json");
    assert!(in_progress["session_id"].is_null());

    // Answer the first slot, then the next slot is 2
    client
        .put(format!("{}/api/exams/{}/answers/1", address, session_id))
        .bearer_auth(&token)
        .json(&json!({ "answer": 1 }))
        .send()
        .await
        .expect("Request failed");

    let next: serde_json::Value = client
        .get(format!("{}/api/exams/{}/next-slot", address, session_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Failed to parse json");
    assert_eq!(next["next_slot"], 2);

    // Finishing clears the in-progress pointer
    client
        .post(format!("{}/api/exams/{}/finish", address, session_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Request failed");

    let in_progress: serde_json::Value = client
        .get(format!("{}/api/exams/in-progress?exam_kind=spi", address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Failed to parse json");
    assert!(in_progress["session_id"].is_null());
}

#[tokio::test]
async fn sampling_eventually_covers_the_whole_pool() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;

    let category = unique_category("coverage");
    let seeded: HashSet<String> = seed_questions(&pool, "spi", &category, 3, 1)
        .await
        .into_iter()
        .map(|id| id.to_string())
        .collect();

    // One-question draws over many sessions should touch every question.
    // 30 draws miss a given question with probability (2/3)^30 ~ 5e-6.
    let mut seen: HashSet<String> = HashSet::new();
    for _ in 0..30 {
        let resp = start_exam(
            &client,
            &address,
            &token,
            "spi",
            json!([{ "category": category, "count": 1 }]),
        )
        .await;
        let body: serde_json::Value = resp.json().await.expect("Failed to parse json");
        let session_id = body["session_id"].as_str().unwrap().to_string();

        let results: serde_json::Value = client
            .get(format!("{}/api/exams/{}/results", address, session_id))
            .bearer_auth(&token)
            .send()
            .await
            .expect("Request failed")
            .json()
            .await
            .expect("Failed to parse json");
        seen.insert(
            results["slots"][0]["question_id"]
                .as_str()
                .unwrap()
                .to_string(),
        );

        client
            .post(format!("{}/api/exams/{}/finish", address, session_id))
            .bearer_auth(&token)
            .send()
            .await
            .expect("Request failed");
    }

    assert_eq!(seen, seeded);
}

#[tokio::test]
async fn history_list_shows_own_sessions_newest_first() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;

    let category = unique_category("history");
    seed_questions(&pool, "spi", &category, 2, 1).await;

    let mut session_ids = Vec::new();
    for _ in 0..2 {
        let resp = start_exam(
            &client,
            &address,
            &token,
            "spi",
            json!([{ "category": category, "count": 1 }]),
        )
        .await;
        let body: serde_json::Value = resp.json().await.expect("Failed to parse json");
        session_ids.push(body["session_id"].as_str().unwrap().to_string());
    }

    let history: serde_json::Value = client
        .get(format!("{}/api/exams", address))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Request failed")
        .json()
        .await
        .expect("Failed to parse json");

    let entries = history.as_array().expect("history must be an array");
    assert_eq!(entries.len(), 2);
    // Newest first
    assert_eq!(entries[0]["id"], session_ids[1].as_str());
    assert_eq!(entries[1]["id"], session_ids[0].as_str());
    assert_eq!(entries[0]["total"], 1);
}

#[tokio::test]
async fn sessions_are_invisible_to_other_users() {
    let (address, pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;
    let other_token = register_and_login(&client, &address).await;

    let category = unique_category("privacy");
    seed_questions(&pool, "spi", &category, 1, 1).await;

    let resp = start_exam(
        &client,
        &address,
        &token,
        "spi",
        json!([{ "category": category, "count": 1 }]),
    )
    .await;
    let body: serde_json::Value = resp.json().await.expect("Failed to parse json");
    let session_id = body["session_id"].as_str().unwrap().to_string();

    // Another user sees a plain 404, same as a nonexistent session
    let resp = client
        .get(format!("{}/api/exams/{}/results", address, session_id))
        .bearer_auth(&other_token)
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status().as_u16(), 404);

    let resp = client
        .post(format!("{}/api/exams/{}/finish", address, session_id))
        .bearer_auth(&other_token)
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn invalid_exam_kind_is_rejected() {
    let (address, _pool) = spawn_app().await;
    let client = reqwest::Client::new();
    let token = register_and_login(&client, &address).await;

    let resp = start_exam(
        &client,
        &address,
        &token,
        "toeic",
        json!([{ "category": "whatever", "count": 1 }]),
    )
    .await;
    assert_eq!(resp.status().as_u16(), 400);
}

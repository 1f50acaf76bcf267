use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{App, test, web};
use interview_core::EXECUTIVE_FACULTY;
use interview_server::error::ACCESS_DENIED;
use interview_server::prometheus;
use interview_server::session::USER_HEADER;
use interview_server::store::Store;
use interview_store_db::{InterviewDb, Interviewer, StudentRecord};
use interview_utils_test::{CanonicalTempDir, sample_questions};
use serde_json::{Value, json};

macro_rules! app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($store.clone()))
                .configure(interview_server::configure),
        )
        .await
    };
}

fn student(id: &str, faculty: &str, program: &str) -> StudentRecord {
    StudentRecord {
        student_id: id.into(),
        student_name: format!("Student {id}"),
        program: program.into(),
        faculty: faculty.into(),
        campus: "Main".into(),
        level: "Bachelor".into(),
        ..Default::default()
    }
}

fn interviewer(id: &str, faculty: &str) -> Interviewer {
    Interviewer {
        staff_id: id.into(),
        staff_name: format!("Staff {id}"),
        staff_faculty: faculty.into(),
    }
}

/// Sample catalog, two Engineering students, one Medicine student, an
/// Engineering interviewer `S01`, a Medicine interviewer `S02` and an
/// executive `S99`.
fn seeded() -> Store {
    let mut db = InterviewDb::open_memory().unwrap();
    db.seed_questions(sample_questions()).unwrap();
    db.create_student(&student("6401", "Engineering", "Computer")).unwrap();
    db.create_student(&student("6402", "Engineering", "Civil")).unwrap();
    db.create_student(&student("6403", "Medicine", "Nursing")).unwrap();
    db.create_interviewer(&interviewer("S01", "Engineering")).unwrap();
    db.create_interviewer(&interviewer("S02", "Medicine")).unwrap();
    db.create_interviewer(&interviewer("S99", EXECUTIVE_FACULTY)).unwrap();
    Store::new(db)
}

fn submission(student_id: &str) -> Value {
    json!({
        "student_id": student_id,
        "interviewer_id": "S01",
        "answers": [
            { "question_id": "1", "answer_text": "มี" },
            { "question_id": "1.1", "answer_text": "เรียนไม่ทัน" },
            { "question_id": "2", "answer_text": "ไม่มี" },
        ]
    })
}

#[actix_web::test]
async fn test_login() {
    let store = seeded();
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "staff_id": "S01" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["staff_faculty"], "Engineering");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "staff_id": "NOPE" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_session_required() {
    let store = seeded();
    let app = app!(store);

    let req = test::TestRequest::get().uri("/api/students").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/students")
        .insert_header((USER_HEADER, "GHOST"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_faculty_isolation() {
    let store = seeded();
    let app = app!(store);

    let req = test::TestRequest::get()
        .uri("/api/students")
        .insert_header((USER_HEADER, "S01"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 2);
    for s in body["data"].as_array().unwrap() {
        assert_eq!(s["faculty"], "Engineering");
    }

    let req = test::TestRequest::get()
        .uri("/api/students/6403")
        .insert_header((USER_HEADER, "S01"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], ACCESS_DENIED);

    let req = test::TestRequest::get()
        .uri("/api/students/faculty/Medicine")
        .insert_header((USER_HEADER, "S01"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/students/9999")
        .insert_header((USER_HEADER, "S01"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/students")
        .insert_header((USER_HEADER, "S99"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 3);
}

#[actix_web::test]
async fn test_create_interview() {
    let store = seeded();
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/api/interviews")
        .insert_header((USER_HEADER, "S01"))
        .set_json(submission("6401"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["student_id"], "6401");
    assert_eq!(body["data"]["completed"], true);
    let ids: Vec<&str> = body["data"]["answers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["question_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["1", "1.1", "2"]);

    // A second interview of the same student is a conflict
    let req = test::TestRequest::post()
        .uri("/api/interviews")
        .insert_header((USER_HEADER, "S01"))
        .set_json(submission("6401"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri("/api/students/not-interviewed")
        .insert_header((USER_HEADER, "S01"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["student_id"], "6402");
}

#[actix_web::test]
async fn test_create_interview_rejections() {
    let store = seeded();
    let app = app!(store);

    // Student of another faculty
    let req = test::TestRequest::post()
        .uri("/api/interviews")
        .insert_header((USER_HEADER, "S01"))
        .set_json(submission("6403"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // No answers at all
    let req = test::TestRequest::post()
        .uri("/api/interviews")
        .insert_header((USER_HEADER, "S01"))
        .set_json(json!({ "student_id": "6401", "interviewer_id": "S01" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Unknown question
    let req = test::TestRequest::post()
        .uri("/api/interviews")
        .insert_header((USER_HEADER, "S01"))
        .set_json(json!({
            "student_id": "6401",
            "interviewer_id": "S01",
            "answers": [
                { "question_id": "1", "answer_text": "มี" },
                { "question_id": "42", "answer_text": "?" },
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Third of five entries lacks its answer text
    let req = test::TestRequest::post()
        .uri("/api/interviews")
        .insert_header((USER_HEADER, "S01"))
        .set_json(json!({
            "student_id": "6401",
            "interviewer_id": "S01",
            "answers": [
                { "question_id": "1", "answer_text": "มี" },
                { "question_id": "1.1", "answer_text": "เรียนไม่ทัน" },
                { "question_id": "2" },
                { "question_id": "3", "answer_text": "ไม่มี" },
                { "question_id": "4", "answer_text": "ไม่มี" },
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Recording under another interviewer's name
    let mut as_other = submission("6401");
    as_other["interviewer_id"] = json!("S02");
    let req = test::TestRequest::post()
        .uri("/api/interviews")
        .insert_header((USER_HEADER, "S01"))
        .set_json(&as_other)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Nothing was written by any of the attempts
    let req = test::TestRequest::get()
        .uri("/api/interviews")
        .insert_header((USER_HEADER, "S99"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 0);
    let answers = store
        .db_operation(|db| {
            let count: i64 = db
                .connection()
                .query_row("SELECT COUNT(*) FROM interview_answer", [], |row| row.get(0))
                .map_err(interview_store_db::Error::from)?;
            Ok(count)
        })
        .await
        .unwrap();
    assert_eq!(answers, 0);
}

#[actix_web::test]
async fn test_interviewer_defaults_to_session() {
    let store = seeded();
    let app = app!(store);

    let mut body = submission("6401");
    body.as_object_mut().unwrap().remove("interviewer_id");
    let req = test::TestRequest::post()
        .uri("/api/interviews")
        .insert_header((USER_HEADER, "S01"))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["data"]["interviewer_id"], "S01");

    // Executives may record on behalf of an interviewer
    let mut body = submission("6403");
    body["interviewer_id"] = json!("S02");
    let req = test::TestRequest::post()
        .uri("/api/interviews")
        .insert_header((USER_HEADER, "S99"))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["data"]["interviewer_faculty"], "Medicine");
}

#[actix_web::test]
async fn test_update_and_delete_interview() {
    let store = seeded();
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/api/interviews")
        .insert_header((USER_HEADER, "S01"))
        .set_json(submission("6401"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["interview_id"].as_i64().unwrap();

    let update = json!({ "answers": [
        { "question_id": "1.1", "answer_text": "ตามเพื่อนไม่ทัน" },
        { "question_id": "3", "answer_text": "ไม่มี" },
    ]});
    for _ in 0..2 {
        let req = test::TestRequest::put()
            .uri(&format!("/api/interviews/{id}"))
            .insert_header((USER_HEADER, "S01"))
            .set_json(&update)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 4);
        assert_eq!(body["data"][1]["answer_text"], "ตามเพื่อนไม่ทัน");
    }

    // Out of scope for a Medicine interviewer
    let req = test::TestRequest::delete()
        .uri(&format!("/api/interviews/{id}"))
        .insert_header((USER_HEADER, "S02"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/interviews/{id}"))
        .insert_header((USER_HEADER, "S01"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/interviews/{id}"))
        .insert_header((USER_HEADER, "S01"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_visible_questions() {
    let store = seeded();
    let app = app!(store);

    for (answer, shows_follow_up) in [("มี", true), ("ไม่มี", false)] {
        let req = test::TestRequest::post()
            .uri("/api/questions/visible")
            .insert_header((USER_HEADER, "S01"))
            .set_json(json!({ "answers": { "1": answer } }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let ids: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|q| q["question_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids.contains(&"1.1"), shows_follow_up, "{answer}");
        assert!(!ids.contains(&"2.1"));
        assert_eq!(ids[0], "1");
    }
}

#[actix_web::test]
async fn test_visible_questions_accept_form_values() {
    let store = seeded();
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/api/questions/visible")
        .insert_header((USER_HEADER, "S01"))
        .set_json(json!({ "answers": { "1": ["มี"], "2": 5 } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["question_id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"1.1"));
    assert!(!ids.contains(&"2.1"));
}

#[actix_web::test]
async fn test_question_validation() {
    let store = seeded();
    let app = app!(store);

    // Choice question without options
    let req = test::TestRequest::post()
        .uri("/api/questions")
        .insert_header((USER_HEADER, "S99"))
        .set_json(json!({ "question_id": "7", "question_text": "?", "question_type": "radio" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Condition looking ahead
    let req = test::TestRequest::post()
        .uri("/api/questions")
        .insert_header((USER_HEADER, "S99"))
        .set_json(json!({
            "question_id": "7",
            "question_text": "Anything else?",
            "question_type": "text",
            "condition_logic": "8:eq:มี"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/questions")
        .insert_header((USER_HEADER, "S99"))
        .set_json(json!({
            "question_id": "6.1",
            "question_text": "Anything else?",
            "question_type": "text",
            "condition_logic": "6:eq:มี"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/questions/6.1")
        .insert_header((USER_HEADER, "S01"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["condition_logic"], "6:eq:มี");
}

#[actix_web::test]
async fn test_export() {
    let store = seeded();
    let app = app!(store);

    for student_id in ["6401", "6402"] {
        let req = test::TestRequest::post()
            .uri("/api/interviews")
            .insert_header((USER_HEADER, "S01"))
            .set_json(submission(student_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/interviews/export")
        .insert_header((USER_HEADER, "S02"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert_eq!(text.trim_start_matches('\u{feff}').lines().count(), 1);

    let req = test::TestRequest::get()
        .uri("/api/interviews/export")
        .insert_header((USER_HEADER, "S01"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("interview_data_"));

    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.starts_with('\u{feff}'));
    assert_eq!(text.lines().count(), 3);
}

#[actix_web::test]
async fn test_statistics() {
    let store = seeded();
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/api/interviews")
        .insert_header((USER_HEADER, "S01"))
        .set_json(submission("6401"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/interviews/statistics")
        .insert_header((USER_HEADER, "S01"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total_students"], 2);
    assert_eq!(body["data"]["interviewed"], 1);
    assert_eq!(body["data"]["completion_rate"], 50.0);

    let req = test::TestRequest::get()
        .uri("/api/students/summary")
        .insert_header((USER_HEADER, "S99"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 3);
}

#[actix_web::test]
async fn test_health_and_version_on_file_database() {
    let dir = CanonicalTempDir::new().unwrap();
    let store = Store::open(&dir.db_path()).unwrap();
    let app = app!(store);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "OK");

    let req = test::TestRequest::get().uri("/version").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(std::str::from_utf8(&body).unwrap().starts_with("interview-server "));
}

#[actix_web::test]
async fn test_metrics_middleware_records_routes() {
    let store = seeded();
    let metrics = prometheus::initialize_metrics().unwrap();
    let app = test::init_service(
        App::new()
            .wrap(prometheus::PrometheusMiddleware::new(metrics.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(metrics.clone()))
            .configure(interview_server::configure)
            .route("/metrics", web::get().to(prometheus::metrics_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.contains("interview_http_requests_total"));
    assert!(text.contains("path=\"/health\""));
}

use super::models::PresignQuery;
use crate::common::test_helpers::{extract_response_body, get, setup_test_app};
use crate::config::Config;
use axum::http::StatusCode;
use rstest::rstest;

#[tokio::test]
async fn test_presign_returns_url_and_key() {
    let app = setup_test_app(Config::for_tests());

    let response = get(&app, "/presign?fileName=flyer.png&fileType=image/png").await;
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    let (status, body) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::OK);

    let key = body["key"].as_str().expect("key should be a string");
    let (prefix, rest) = key.split_once('/').expect("key should have a prefix");
    let (millis, name) = rest.split_once('-').expect("key should have a timestamp");
    assert_eq!(prefix, "uploads");
    assert_eq!(name, "flyer.png");
    assert!(millis.parse::<i64>().is_ok(), "timestamp should be numeric: {millis}");

    let url = body["uploadUrl"].as_str().expect("uploadUrl should be a string");
    assert!(url.contains("test-bucket"));
    assert!(url.contains(key));
    assert!(url.contains("X-Amz-Expires=60"));
}

#[tokio::test]
async fn test_presign_uses_configured_prefix_and_expiry() {
    let mut config = Config::for_tests();
    config.upload_prefix = "member-photos".to_string();
    config.presign_expiry_secs = 300;
    let app = setup_test_app(config);

    let (status, body) =
        extract_response_body(get(&app, "/presign?fileName=me.jpg&fileType=image/jpeg").await)
            .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["key"].as_str().unwrap().starts_with("member-photos/"));
    assert!(body["uploadUrl"].as_str().unwrap().contains("X-Amz-Expires=300"));
}

#[rstest]
#[case("/presign")]
#[case("/presign?fileName=flyer.png")]
#[case("/presign?fileType=image/png")]
#[case("/presign?fileName=&fileType=image/png")]
#[case("/presign?fileName=flyer.png&fileType=%20%20")]
#[tokio::test]
async fn test_presign_requires_both_parameters(#[case] uri: &str) {
    let app = setup_test_app(Config::for_tests());

    let (status, body) = extract_response_body(get(&app, uri).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["error"]["message"], "Missing fileName or fileType");
}

#[tokio::test]
async fn test_presign_without_bucket_is_a_server_error() {
    let mut config = Config::for_tests();
    config.upload_bucket = None;
    let app = setup_test_app(config);

    let (status, body) =
        extract_response_body(get(&app, "/presign?fileName=a.txt&fileType=text/plain").await)
            .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    assert!(!body.to_string().contains("UPLOAD_BUCKET"));
}

#[test]
fn test_required_trims_parameters() {
    let query = PresignQuery {
        file_name: Some("  notes.pdf ".to_string()),
        file_type: Some("application/pdf".to_string()),
    };

    let (name, kind) = query.required().unwrap();
    assert_eq!(name, "notes.pdf");
    assert_eq!(kind, "application/pdf");
}

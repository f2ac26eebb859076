//! Problem Details test helpers
//!
//! Assert the HTTP error contract without depending on backend types.

use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Mirror of the backend's Problem Details body.
#[derive(Debug, Deserialize, Serialize)]
struct ProblemDetailsLike {
    #[serde(rename = "type")]
    type_: String,
    title: String,
    status: u16,
    detail: String,
    code: String,
}

/// Assert that raw response parts conform to the error contract:
/// status, `code`, body `status`, and optionally a detail substring.
pub fn assert_problem_details_from_parts(
    status: StatusCode,
    body_bytes: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
    expected_detail_contains: Option<&str>,
) {
    assert_eq!(status, expected_status);

    let body_str =
        String::from_utf8(body_bytes.to_vec()).expect("Response body should be valid UTF-8");
    let problem: ProblemDetailsLike = serde_json::from_str(&body_str)
        .expect("Response body should be valid ProblemDetails JSON");

    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.status, expected_status.as_u16());
    assert!(
        problem.type_.ends_with(&format!("/errors/{expected_code}")),
        "type URI '{}' should end with the error code",
        problem.type_
    );

    if let Some(expected_detail) = expected_detail_contains {
        assert!(
            problem.detail.contains(expected_detail),
            "Expected detail to contain '{}', but got '{}'",
            expected_detail,
            problem.detail
        );
    }
}

/// Assert that a ServiceResponse conforms to the error contract.
pub async fn assert_problem_details_from_service_response(
    resp: actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
    expected_code: &str,
    expected_status: StatusCode,
    expected_detail_contains: Option<&str>,
) {
    let status = resp.status();
    let body = actix_web::test::read_body(resp).await;

    assert_problem_details_from_parts(
        status,
        &body,
        expected_code,
        expected_status,
        expected_detail_contains,
    );
}

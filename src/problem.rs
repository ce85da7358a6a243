//! RFC 7807 problem details.
//!
//! [`Problem`] holds the five standard members. Application problems extend
//! it by embedding it with `#[serde(flatten)]`, which puts their own members
//! next to the standard ones in the JSON document:
//!
//! ```rust
//! use http::StatusCode;
//! use serde::Serialize;
//! use webapputil::problem::{Problem, send_problem};
//! use webapputil::Response;
//!
//! #[derive(Serialize)]
//! struct OutOfCredit {
//!     #[serde(flatten)]
//!     problem: Problem,
//!     balance: i64,
//!     accounts: Vec<String>,
//! }
//!
//! let body = OutOfCredit {
//!     problem: Problem::default()
//!         .with_type("https://example.com/probs/out-of-credit")
//!         .with_title("You do not have enough credit.")
//!         .with_detail("Your current balance is 30, but that costs 50.")
//!         .with_instance("/account/12345/msgs/abc"),
//!     balance: 30,
//!     accounts: vec!["/account/12345".into(), "/account/67890".into()],
//! };
//!
//! let res = send_problem(Response::builder(), StatusCode::FORBIDDEN, &body)?;
//! assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
//! # Ok::<(), webapputil::Error>(())
//! ```

use bytes::{BufMut, BytesMut};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::response::{ContentType, IntoResponse, Response, ResponseBuilder};

/// Media type of a problem detail document.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Base problem detail. Every member is optional and left out of the JSON
/// when empty.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
#[must_use]
pub struct Problem {
    /// URI reference identifying the problem type.
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub type_url: String,
    /// Short, human-readable summary of the problem type.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// HTTP status code restated in the body. `Some(0)` counts as unset.
    #[serde(skip_serializing_if = "status_is_unset")]
    pub status: Option<u16>,
    /// Explanation specific to this occurrence.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
    /// URI reference identifying this occurrence.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub instance: String,
}

fn status_is_unset(status: &Option<u16>) -> bool {
    matches!(status, None | Some(0))
}

impl Problem {
    /// A problem whose `status` is `status` and whose `title` is the
    /// status's canonical reason phrase.
    pub fn from_status(status: StatusCode) -> Self {
        Self {
            title: status.canonical_reason().unwrap_or_default().to_owned(),
            status: Some(status.as_u16()),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status.as_u16());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = instance.into();
        self
    }
}

/// Writes `problem` as an `application/problem+json` response.
///
/// The content type replaces whatever `res` already carried, then the
/// status is set, then the body is encoded. `status` is used verbatim and
/// need not match `problem`'s own `status` member.
///
/// # Errors
///
/// [`Error::Serialization`] when `problem` cannot be encoded. Nothing is
/// logged here; the caller decides what to do with the error.
pub fn send_problem<P>(res: ResponseBuilder, status: StatusCode, problem: &P) -> Result<Response, Error>
where
    P: Serialize + ?Sized,
{
    let res = res.content_type(ContentType::ProblemJson).status(status);

    let mut body = BytesMut::new().writer();
    serde_json::to_writer(&mut body, problem)?;

    Ok(res.finish(body.into_inner().freeze()))
}

/// Sends the problem with its own `status`, or `500` when it has none.
impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = self
            .status
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // A `Problem` holds only strings and an integer, so encoding cannot fail.
        send_problem(Response::builder(), status, &self)
            .unwrap_or_else(|_| Response::status(StatusCode::INTERNAL_SERVER_ERROR))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use http::header::{CONTENT_TYPE, HeaderValue};
    use serde::ser::Error as _;
    use serde_json::{Value, json};

    use super::*;

    fn body_json(res: &Response) -> Value {
        serde_json::from_slice(res.body()).unwrap()
    }

    #[test]
    fn empty_members_are_omitted() {
        let p = Problem::default().with_title("Bad");
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"title":"Bad"}"#);

        assert_eq!(serde_json::to_string(&Problem::default()).unwrap(), "{}");
    }

    #[test]
    fn zero_status_is_omitted() {
        let p: Problem = serde_json::from_str(r#"{"status":0,"title":"x"}"#).unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"title":"x"}"#);

        let p = Problem { status: Some(0), ..Problem::default() };
        assert_eq!(serde_json::to_string(&p).unwrap(), "{}");
        assert_eq!(p.into_response().status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn sends_exact_body_and_status() {
        let p = Problem::default()
            .with_type("https://example.com/x")
            .with_title("Bad")
            .with_status(StatusCode::BAD_REQUEST);

        let res = send_problem(Response::builder(), StatusCode::BAD_REQUEST, &p).unwrap();

        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            res.body().as_ref(),
            br#"{"type":"https://example.com/x","title":"Bad","status":400}"#
        );
    }

    #[test]
    fn content_type_is_set_once_over_prior_value() {
        let builder = Response::builder()
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(CONTENT_TYPE, HeaderValue::from_static("text/html"));

        let res = send_problem(builder, StatusCode::NOT_FOUND, &Problem::default()).unwrap();

        let values: Vec<_> = res.headers().get_all(CONTENT_TYPE).iter().collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0], APPLICATION_PROBLEM_JSON);
    }

    #[test]
    fn status_argument_is_written_verbatim() {
        let p = Problem::from_status(StatusCode::CONFLICT);
        let res = send_problem(Response::builder(), StatusCode::IM_A_TEAPOT, &p).unwrap();

        assert_eq!(res.status_code(), StatusCode::IM_A_TEAPOT);
        assert_eq!(body_json(&res)["status"], 409);
    }

    #[test]
    fn extension_members_are_flattened() {
        #[derive(Serialize)]
        struct InvalidParam {
            name: &'static str,
            reason: &'static str,
        }

        #[derive(Serialize)]
        struct ValidationProblem {
            #[serde(flatten)]
            problem: Problem,
            #[serde(rename = "invalid-params")]
            invalid_params: Vec<InvalidParam>,
        }

        let p = ValidationProblem {
            problem: Problem::default()
                .with_type("https://example.net/validation-error")
                .with_title("Your request parameters didn't validate."),
            invalid_params: vec![
                InvalidParam { name: "age", reason: "must be a positive integer" },
                InvalidParam { name: "color", reason: "must be 'green', 'red' or 'blue'" },
            ],
        };

        let res = send_problem(Response::builder(), StatusCode::BAD_REQUEST, &p).unwrap();

        assert_eq!(
            body_json(&res),
            json!({
                "type": "https://example.net/validation-error",
                "title": "Your request parameters didn't validate.",
                "invalid-params": [
                    { "name": "age", "reason": "must be a positive integer" },
                    { "name": "color", "reason": "must be 'green', 'red' or 'blue'" },
                ],
            })
        );
    }

    #[test]
    fn unserializable_value_is_returned_as_error() {
        struct Broken;

        impl Serialize for Broken {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(S::Error::custom("refusing to serialize"))
            }
        }

        let err = send_problem(Response::builder(), StatusCode::BAD_REQUEST, &Broken).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().contains("refusing to serialize"));
    }

    #[test]
    fn map_with_non_string_keys_fails_to_encode() {
        let mut extra = BTreeMap::new();
        extra.insert(vec![1_u8], "x");

        assert!(send_problem(Response::builder(), StatusCode::BAD_REQUEST, &extra).is_err());
    }

    #[test]
    fn problem_into_response_uses_own_status() {
        let res = Problem::from_status(StatusCode::NOT_FOUND)
            .with_detail("no such account")
            .into_response();

        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(res.headers()[CONTENT_TYPE], APPLICATION_PROBLEM_JSON);
        assert_eq!(
            body_json(&res),
            json!({ "title": "Not Found", "status": 404, "detail": "no such account" })
        );
    }

    #[test]
    fn problem_without_status_responds_500() {
        let res = Problem::default().with_title("Boom").into_response();
        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn parses_partial_documents() {
        let p: Problem = serde_json::from_str(r#"{"title":"Bad","status":400,"extra":true}"#).unwrap();
        assert_eq!(p, Problem::default().with_title("Bad").with_status(StatusCode::BAD_REQUEST));
    }
}

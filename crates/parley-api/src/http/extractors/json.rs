//! `ValidatedJson`: JSON body extraction followed by `validator` checks.
//!
//! Both a malformed body and a body that fails validation are reported as
//! `400 {"message":"Validation error","details":[...]}`.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::http::error::AppError;

/// A deserialized and validated JSON request body.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(vec![rejection.body_text()]))?;

        value
            .validate()
            .map_err(|errors| AppError::Validation(describe(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten validation errors into one line each, sorted.
///
/// Uses the rule's message when it has one, else `field: code`.
fn describe(errors: &ValidationErrors) -> Vec<String> {
    let mut details: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{field}: {}", err.code),
            })
        })
        .collect();
    details.sort();
    details
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(length(min = 3, message = "name is too short"))]
        name: String,
        #[validate(range(max = 10))]
        #[serde(default)]
        count: u32,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_body() {
        let ValidatedJson(probe) =
            ValidatedJson::<Probe>::from_request(request(r#"{"name":"abc"}"#), &())
                .await
                .unwrap();
        assert_eq!(probe.name, "abc");
    }

    #[tokio::test]
    async fn rejects_invalid_field() {
        let err =
            ValidatedJson::<Probe>::from_request(request(r#"{"name":"ab","count":11}"#), &())
                .await
                .unwrap_err();
        match err {
            AppError::Validation(details) => {
                assert_eq!(details, vec!["count: range", "name is too short"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejects_malformed_json() {
        let err = ValidatedJson::<Probe>::from_request(request("{not json"), &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_missing_field() {
        let err = ValidatedJson::<Probe>::from_request(request("{}"), &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}

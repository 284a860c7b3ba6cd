//! Request extractors whose rejections are [`AppError`]s, so malformed input
//! gets the same JSON error body as any other validation failure.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Request,
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON request body.
pub struct JsonBody<T>(pub T);

/// Query string parameters.
pub struct QueryParams<T>(pub T);

/// Path parameters.
pub struct PathParam<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation("body", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::validation("query", rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::validation("path", rejection.body_text())
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) = axum::extract::Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) = axum::extract::Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Form {
        name: String,
    }

    #[derive(Debug, Deserialize)]
    struct Paging {
        page: i64,
    }

    fn json_request(body: &'static str) -> Request {
        axum::http::Request::post("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let JsonBody(form) = JsonBody::<Form>::from_request(json_request(r#"{"name":"Widget"}"#), &())
            .await
            .unwrap();
        assert_eq!(form.name, "Widget");
    }

    #[tokio::test]
    async fn missing_field_is_a_body_validation_error() {
        let err = JsonBody::<Form>::from_request(json_request("{}"), &())
            .await
            .err()
            .unwrap();
        match err {
            AppError::Validation { field, message } => {
                assert_eq!(field, "body");
                assert!(message.contains("name"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_query_is_a_query_validation_error() {
        let (mut parts, _) = axum::http::Request::get("/?page=2").body(()).unwrap().into_parts();
        let QueryParams(paging) = QueryParams::<Paging>::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(paging.page, 2);

        let (mut parts, _) = axum::http::Request::get("/?page=last").body(()).unwrap().into_parts();
        let err = QueryParams::<Paging>::from_request_parts(&mut parts, &()).await.err().unwrap();
        assert!(matches!(err, AppError::Validation { field: "query", .. }));
    }
}

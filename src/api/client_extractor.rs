use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};

use crate::api::error::ApiError;
use crate::config::ClientIdMode;
use crate::model::{ClientId, SignInResponse, CLIENT_ID_HEADER};

pub const UNAUTHORIZED_MESSAGE: &str =
    "Authentication failed. Provide a valid client ID in the X-Client-ID header.";

/// Resolves the caller's client id before any `/todos` handler runs.
///
/// A usable `X-Client-ID` header is taken as is. Without one, permissive mode
/// mints a new id and echoes it on the response; strict mode answers 401.
pub async fn resolve_client_id(
    State(mode): State<ClientIdMode>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(client_id) = client_id_from_headers(request.headers()) {
        request.extensions_mut().insert(client_id);
        return Ok(next.run(request).await);
    }

    match mode {
        ClientIdMode::Strict => {
            log::warn!(
                "Rejected {} {}: missing client id",
                request.method(),
                request.uri().path()
            );
            Err(ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()))
        }
        ClientIdMode::Permissive => {
            let client_id = ClientId::generate();
            log::info!("Minted client id {}", client_id);

            request.extensions_mut().insert(client_id.clone());
            let mut response = next.run(request).await;
            attach_client_id(response.headers_mut(), &client_id);
            Ok(response)
        }
    }
}

/// Axum extractor for the client id placed in request extensions by `resolve_client_id`
#[async_trait]
impl<S> FromRequestParts<S> for ClientId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ClientId>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()))
    }
}

/// `POST /sign_in`: reuse the supplied client id or mint a new one
pub async fn sign_in(headers: HeaderMap) -> Response {
    let client_id = client_id_from_headers(&headers).unwrap_or_else(|| {
        let client_id = ClientId::generate();
        log::info!("Minted client id {} at sign-in", client_id);
        client_id
    });

    let mut response = Json(SignInResponse {
        client_id: client_id.clone(),
    })
    .into_response();
    attach_client_id(response.headers_mut(), &client_id);
    response
}

pub fn client_id_from_headers(headers: &HeaderMap) -> Option<ClientId> {
    extract_header_value(headers, CLIENT_ID_HEADER).and_then(|value| ClientId::parse(&value))
}

pub fn attach_client_id(headers: &mut HeaderMap, client_id: &ClientId) {
    if let Ok(value) = HeaderValue::from_str(client_id.as_str()) {
        headers.insert(HeaderName::from_static(CLIENT_ID_HEADER), value);
    }
}

/// Extract header value as string
fn extract_header_value(headers: &HeaderMap, header_name: &str) -> Option<String> {
    headers
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_id_from_headers(&headers), None);

        headers.insert(
            HeaderName::from_static(CLIENT_ID_HEADER),
            HeaderValue::from_static("client-123"),
        );
        assert_eq!(
            client_id_from_headers(&headers).map(|id| id.to_string()),
            Some("client-123".to_string())
        );
    }

    #[test]
    fn test_blank_header_counts_as_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(CLIENT_ID_HEADER),
            HeaderValue::from_static(""),
        );
        assert_eq!(client_id_from_headers(&headers), None);
    }

    #[test]
    fn test_attach_client_id_round_trips() {
        let client_id = ClientId::generate();
        let mut headers = HeaderMap::new();
        attach_client_id(&mut headers, &client_id);

        assert_eq!(client_id_from_headers(&headers), Some(client_id));
    }

    #[tokio::test]
    async fn test_sign_in_reuses_supplied_id() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(CLIENT_ID_HEADER),
            HeaderValue::from_static("existing"),
        );

        let response = sign_in(headers).await;

        assert_eq!(response.headers()[CLIENT_ID_HEADER], "existing");
    }
}

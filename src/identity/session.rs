use axum::{extract::FromRequestParts, http::request::Parts};

/// What the upstream auth layer knows about the caller. Threaded explicitly
/// through identity resolution; never held as ambient global state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub account_id: Option<String>,
    pub nickname: Option<String>,
}

impl SessionContext {
    pub fn guest(nickname: &str) -> Self {
        Self {
            account_id: None,
            nickname: Some(nickname.to_string()),
        }
    }
}

/// Header names populated by the auth proxy in front of this service.
pub const ACCOUNT_ID_HEADER: &str = "x-account-id";
pub const NICKNAME_HEADER: &str = "x-nickname";

/// Extraction is total: a request with missing or unreadable identity
/// headers yields an empty context, which resolves to the default guest.
/// Gameplay stays usable when identity is unresolved.
#[async_trait::async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_value = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
        };

        Ok(SessionContext {
            account_id: header_value(ACCOUNT_ID_HEADER),
            nickname: header_value(NICKNAME_HEADER),
        })
    }
}

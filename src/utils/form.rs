use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;

use crate::utils::error::AppError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Decoded `application/x-www-form-urlencoded` body.
///
/// Unlike `axum::Form`, every value of a repeated key is kept, which is how
/// browsers submit multi-select fields such as `genres`.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn parse(body: &[u8]) -> Self {
        Self {
            pairs: url::form_urlencoded::parse(body).into_owned().collect(),
        }
    }

    /// First value for `key`, as submitted.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First value for `key`, trimmed. Empty when the key is absent.
    pub fn text(&self, key: &str) -> String {
        self.raw(key).map(str::trim).unwrap_or_default().to_string()
    }

    /// Trimmed value, `None` when absent or blank.
    pub fn optional(&self, key: &str) -> Option<String> {
        Some(self.text(key)).filter(|value| !value.is_empty())
    }

    /// Every non-blank value submitted for `key`, in submission order.
    pub fn all(&self, key: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Checkbox semantics: absent means unchecked.
    pub fn flag(&self, key: &str) -> bool {
        self.raw(key)
            .map(|v| {
                matches!(
                    v.trim().to_ascii_lowercase().as_str(),
                    "y" | "on" | "true" | "1"
                )
            })
            .unwrap_or(false)
    }
}

impl FromIterator<(String, String)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(content_type) = req.headers().get(CONTENT_TYPE) {
            let is_form = content_type
                .to_str()
                .map(|v| v.starts_with(FORM_CONTENT_TYPE))
                .unwrap_or(false);
            if !is_form {
                return Err(AppError::ValidationError(format!(
                    "Expected a {} body",
                    FORM_CONTENT_TYPE
                )));
            }
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::ValidationError(rejection.body_text()))?;

        Ok(Self::parse(&body))
    }
}

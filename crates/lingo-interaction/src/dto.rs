//! Wire types of the translation backend.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActivateBody<'a> {
    pub code: &'a str,
    pub user_id: i64,
    pub device_id: &'a str,
}

/// Body of `/api/activate` and `/api/check`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ActivateResponse {
    pub success: bool,
    pub token: Option<String>,
    pub expire_timestamp: Option<i64>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TranslateBody<'a> {
    pub text: &'a str,
    pub source_lang: &'a str,
    pub target_lang: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct TranslateResponse {
    pub success: bool,
    pub translated_text: Option<String>,
    pub error: Option<String>,
}

//! One-shot flash messages carried between a redirect and the next page.

use std::collections::BTreeMap;

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::FieldErrors;

/// Cookie holding the pending flash.
pub const FLASH_COOKIE: &str = "flash";

/// Largest encoded value written to the cookie. Browsers drop cookies over 4 KB.
pub const MAX_FLASH_VALUE_BYTES: usize = 3072;

/// Outcome of the previous form submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Flash {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: FieldErrors,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub old: BTreeMap<String, String>,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Flash {
            success: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn errors(errors: FieldErrors, old: BTreeMap<String, String>) -> Self {
        Flash {
            success: None,
            errors,
            old,
        }
    }

    fn encoded(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        urlencoding::encode(&json).into_owned()
    }

    /// Encode into a short-lived cookie scoped to the whole site.
    ///
    /// When the encoded flash is too large, the longest re-displayed values
    /// are left out until it fits; messages and errors are always kept.
    pub fn to_cookie(&self) -> Cookie<'static> {
        let mut flash = self.clone();
        let mut value = flash.encoded();
        while value.len() > MAX_FLASH_VALUE_BYTES {
            let Some(longest) = flash
                .old
                .iter()
                .max_by_key(|(_, v)| v.len())
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            flash.old.remove(&longest);
            value = flash.encoded();
        }

        Cookie::build(FLASH_COOKIE, value)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(Duration::minutes(5))
            .finish()
    }

    /// Decode a cookie value; anything unreadable is dropped.
    ///
    /// Accepts the value with or without the percent-encoding already removed.
    pub fn from_cookie_value(value: &str) -> Option<Self> {
        if let Ok(flash) = serde_json::from_str(value) {
            return Some(flash);
        }
        let json = urlencoding::decode(value).ok()?;
        serde_json::from_str(&json).ok()
    }

    /// Cookie that clears a consumed flash.
    pub fn removal_cookie() -> Cookie<'static> {
        let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
        cookie.make_removal();
        cookie
    }
}

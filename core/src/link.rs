//! Link reference resolution.
//!
//! Self links point at the backend's own origin, which is often not the
//! origin the client talks to (a dev proxy, a gateway). Only the path and
//! query of a link are kept; the client's base URL supplies the origin.

use url::Url;

use crate::error::ApiError;

/// Reduce a link reference to an origin-relative request target.
///
/// `http://h:8080/be/users/1?x=1` becomes `/be/users/1?x=1`. Relative
/// references are kept, with a leading `/` added when missing.
pub fn request_target(href: &str) -> Result<String, ApiError> {
    let href = href.trim();
    if href.is_empty() {
        return Err(ApiError::InvalidLink("empty href".to_string()));
    }
    match Url::parse(href) {
        Ok(url) => {
            if url.cannot_be_a_base() {
                return Err(ApiError::InvalidLink(href.to_string()));
            }
            let mut target = url.path().to_string();
            if let Some(query) = url.query() {
                target.push('?');
                target.push_str(query);
            }
            Ok(target)
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let href = href.split('#').next().unwrap_or_default();
            if href.starts_with("//") {
                // scheme-relative: drop the authority as well
                let rest = &href[2..];
                return Ok(match rest.find('/') {
                    Some(i) => rest[i..].to_string(),
                    None => "/".to_string(),
                });
            }
            if href.starts_with('/') {
                Ok(href.to_string())
            } else {
                Ok(format!("/{href}"))
            }
        }
        Err(e) => Err(ApiError::InvalidLink(format!("{href}: {e}"))),
    }
}

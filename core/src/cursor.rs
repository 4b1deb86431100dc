//! Pagination cursor codec.
//!
//! # Design
//! The admin API returns a `next` link on list responses. The link itself is
//! never reused: the API root the server sees may differ from the base the
//! client was configured with, so only the `offset` parameter is portable.
//! `decode` extracts it, `encode` turns it back into a query fragment.
//! Both are pure and never fail; anything unusable degrades to an empty
//! token, which means "no further page".

use url::form_urlencoded;

pub(crate) const OFFSET_PARAM: &str = "offset";

/// Extract the offset token from a `next` link.
///
/// Accepts absolute (`https://host/routes?offset=..`) and relative
/// (`/routes?offset=..`) links.
pub fn decode(next: Option<&str>) -> String {
    let Some(link) = next.map(str::trim).filter(|link| !link.is_empty()) else {
        return String::new();
    };
    let Some((_, query)) = link.split_once('?') else {
        return String::new();
    };
    let query = query.split('#').next().unwrap_or_default();

    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == OFFSET_PARAM)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// Render an offset token as an `offset=..` query fragment (no leading `?`).
pub fn encode(offset: &str) -> String {
    if offset.is_empty() {
        return String::new();
    }
    form_urlencoded::Serializer::new(String::new())
        .append_pair(OFFSET_PARAM, offset)
        .finish()
}

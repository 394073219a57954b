//! Header handling for forwarded requests and responses.
//!
//! Hop-by-hop headers describe a single connection and are dropped before a
//! message is passed on, in both directions.

use axum::http::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONNECTION, HOST, PROXY_AUTHENTICATE,
    PROXY_AUTHORIZATION, TE, TRAILER, TRANSFER_ENCODING, UPGRADE,
};

use crate::error::ProxyError;
use crate::upstream::Destination;

static HOP_BY_HOP: [HeaderName; 7] = [
    CONNECTION,
    TRANSFER_ENCODING,
    TE,
    TRAILER,
    UPGRADE,
    PROXY_AUTHORIZATION,
    PROXY_AUTHENTICATE,
];

/// Remove hop-by-hop headers, including any named in `Connection`.
pub fn filter_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| HeaderName::from_bytes(token.as_bytes()).ok())
        .collect();

    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
    for name in listed {
        headers.remove(&name);
    }
    headers.remove("keep-alive");
}

/// Point a request's headers at `destination`: `Host` is the backend
/// authority and `Authorization` is replaced when a key is configured.
pub fn prepare_outbound(headers: &mut HeaderMap, destination: &Destination) -> Result<(), ProxyError> {
    filter_hop_by_hop(headers);

    let host = HeaderValue::from_str(&destination.authority())
        .map_err(|_| ProxyError::InvalidHeader("host"))?;
    headers.insert(HOST, host);

    if let Some(authorization) = destination.authorization() {
        headers.insert(AUTHORIZATION, authorization.clone());
    }
    Ok(())
}

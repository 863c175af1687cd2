//! Proxy and TCP forward target normalization.
//!
//! # Responsibilities
//! - Expand a bare port (`3000`) to a loopback URL
//! - Default a missing scheme to `http://`
//! - Restrict schemes to http, https and https+insecure
//! - Restrict hosts to the local machine
//!
//! # Design Decisions
//! - Output is `scheme://host[:port]`; path, query and fragment are dropped
//! - `localhost` is rewritten to `127.0.0.1` so equal targets compare equal
//! - Host and port are read as written; the URL parser only checks syntax and
//!   scheme, since it folds shorthand IPv4 (`127.1`) and elides default ports

use url::Url;

use crate::error::{ServeError, ServeResult};

const LOOPBACK: &str = "127.0.0.1";

/// Normalize a `proxy` handler argument into a base URL.
pub fn normalize_proxy_target(raw: &str) -> ServeResult<String> {
    if is_all_digits(raw) {
        let port = parse_port(raw)?;
        return Ok(format!("http://{}:{}", LOOPBACK, port));
    }

    let target = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };

    let url = Url::parse(&target).map_err(|source| ServeError::InvalidUrl {
        target: raw.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" | "https+insecure" => {}
        other => return Err(ServeError::UnsupportedScheme(other.to_string())),
    }

    let (host, port) = split_authority(&target);
    if host != "localhost" && host != LOOPBACK {
        return Err(ServeError::NonLoopbackHost(host.to_string()));
    }

    let mut normalized = format!("{}://{}", url.scheme(), LOOPBACK);
    if !port.is_empty() {
        normalized.push(':');
        normalized.push_str(port);
    }
    Ok(normalized)
}

/// Host and port of `target`'s authority, exactly as written.
fn split_authority(target: &str) -> (&str, &str) {
    let rest = target.split_once("://").map_or(target, |(_, rest)| rest);
    let end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let authority = &rest[..end];
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);

    if let Some(bracketed) = host_port.strip_prefix('[') {
        return match bracketed.split_once(']') {
            Some((host, tail)) => (host, tail.strip_prefix(':').unwrap_or("")),
            None => (host_port, ""),
        };
    }
    host_port.rsplit_once(':').unwrap_or((host_port, ""))
}

/// Parse the destination port of a `tcp` forward.
pub fn normalize_tcp_target(raw: &str) -> ServeResult<u16> {
    if !is_all_digits(raw) {
        return Err(ServeError::InvalidPort(raw.to_string()));
    }
    parse_port(raw)
}

/// Loopback `host:port` for a TCP forward destination.
pub fn tcp_forward_addr(port: u16) -> String {
    format!("{}:{}", LOOPBACK, port)
}

fn parse_port(raw: &str) -> ServeResult<u16> {
    match raw.parse::<u16>() {
        Ok(0) | Err(_) => Err(ServeError::InvalidPort(raw.to_string())),
        Ok(port) => Ok(port),
    }
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

use axum::http::Request;
use std::net::IpAddr;
use tower_governor::{GovernorError, key_extractor::KeyExtractor};

/// IP key extractor for the login limiter.
/// Tries X-Forwarded-For, X-Real-IP, then peer address, then falls back to localhost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackIpKeyExtractor;

impl KeyExtractor for FallbackIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        Ok(client_ip(req))
    }
}

fn client_ip<T>(req: &Request<T>) -> IpAddr {
    // First hop of X-Forwarded-For (reverse proxy)
    if let Some(ip) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|chain| chain.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
    {
        return ip;
    }

    if let Some(ip) = req
        .headers()
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.trim().parse::<IpAddr>().ok())
    {
        return ip;
    }

    if let Some(connect_info) = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
    {
        return connect_info.0.ip();
    }

    // Unidentifiable callers share one bucket
    IpAddr::V4(std::net::Ipv4Addr::LOCALHOST)
}

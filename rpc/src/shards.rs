//! Choosing the endpoint that serves the sender's shard.

use shardblast_types::ShardId;
use std::net::IpAddr;

use crate::error::RpcError;
use crate::node::NodeRpc;

/// Whether `node` points at a literal IP address rather than a DNS name.
///
/// `http://127.0.0.1:9500` is an IP endpoint; `https://api.s0.example.io` is not.
pub fn is_ip_endpoint(node: &str) -> bool {
    let rest = node
        .strip_prefix("http://")
        .or_else(|| node.strip_prefix("https://"))
        .unwrap_or(node);
    let authority = rest.split('/').next().unwrap_or(rest);
    if let Some(bracketed) = authority.strip_prefix('[') {
        return bracketed
            .split(']')
            .next()
            .is_some_and(|host| host.parse::<IpAddr>().is_ok());
    }
    let host = authority.split(':').next().unwrap_or(authority);
    host.parse::<IpAddr>().is_ok()
}

/// Endpoint URL to use for `shard`.
///
/// A node given by IP is assumed to serve the requested shard and is used as-is.
/// Otherwise the node's sharding structure decides.
pub async fn resolve_shard_endpoint<N: NodeRpc>(
    rpc: &N,
    node: &str,
    shard: ShardId,
) -> Result<String, RpcError> {
    if is_ip_endpoint(node) {
        return Ok(node.to_string());
    }
    let structure = rpc.sharding_structure().await?;
    structure
        .into_iter()
        .find(|s| s.shard_id == shard.value())
        .map(|s| {
            tracing::debug!(%shard, endpoint = %s.http, "resolved shard endpoint");
            s.http
        })
        .ok_or(RpcError::ShardNotFound(shard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_endpoints() {
        assert!(is_ip_endpoint("http://127.0.0.1:9500"));
        assert!(is_ip_endpoint("https://10.0.0.1"));
        assert!(is_ip_endpoint("192.168.1.1:9500/rpc"));
        assert!(is_ip_endpoint("http://[::1]:9500"));
    }

    #[test]
    fn dns_endpoints() {
        assert!(!is_ip_endpoint("https://api.s0.pga.hmny.io"));
        assert!(!is_ip_endpoint("http://localhost:9500"));
        assert!(!is_ip_endpoint(""));
    }
}

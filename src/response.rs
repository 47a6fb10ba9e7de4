//! GraphQL wire envelope and connection flattening.
//!
//! The service answers every query with the standard GraphQL envelope and
//! wraps collections in one of two connection shapes: `{ nodes: [...] }` or
//! `{ edges: [{ node: ... }, ...] }`. The shape is resolved once here and
//! flattened into the records in exact server order; nothing downstream
//! reorders, sorts or deduplicates.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Body POSTed to the GraphQL endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct Request<'a> {
    pub query: &'a str,
    pub variables: Value,
}

/// Top-level GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<QueryError>,
}

/// One error reported by the GraphQL layer.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryError {
    pub message: String,
}

/// Returns the named member of the response tree.
pub(crate) fn member<'a>(data: &'a Value, field: &'static str) -> Result<&'a Value> {
    data.get(field).ok_or(Error::MalformedResponseShape(field))
}

/// The two collection envelopes the service answers with.
pub(crate) enum Connection<'a> {
    Nodes(&'a [Value]),
    Edges(&'a [Value]),
}

impl<'a> Connection<'a> {
    /// Resolves which envelope `tree` carries.
    pub(crate) fn resolve(tree: &'a Value, path: &'static str) -> Result<Self> {
        if let Some(nodes) = tree.get("nodes").and_then(Value::as_array) {
            return Ok(Self::Nodes(nodes));
        }
        if let Some(edges) = tree.get("edges").and_then(Value::as_array) {
            return Ok(Self::Edges(edges));
        }
        Err(Error::MalformedResponseShape(path))
    }

    /// Flattens to the records in server order.
    pub(crate) fn records(self, path: &'static str) -> Result<Vec<&'a Value>> {
        match self {
            Self::Nodes(nodes) => Ok(nodes.iter().collect()),
            Self::Edges(edges) => edges
                .iter()
                .map(|edge| edge.get("node").ok_or(Error::MalformedResponseShape(path)))
                .collect(),
        }
    }
}

/// Resolves the connection at `field` and flattens it in one step.
pub(crate) fn records<'a>(data: &'a Value, field: &'static str) -> Result<Vec<&'a Value>> {
    Connection::resolve(member(data, field)?, field)?.records(field)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_edges_preserve_server_order() {
        let data = json!({
            "getTransactionHistory": {
                "edges": [
                    { "node": { "id": "C" } },
                    { "node": { "id": "A" } },
                    { "node": { "id": "B" } },
                ]
            }
        });

        let records = records(&data, "getTransactionHistory").unwrap();
        let ids: Vec<_> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["C", "A", "B"]);
    }

    #[test]
    fn test_nodes_shape() {
        let data = json!({
            "users": { "nodes": [ { "username": "alpha" }, { "username": "beta" } ] }
        });

        let records = records(&data, "users").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["username"], "alpha");
    }

    #[test]
    fn test_unrecognized_envelope_is_malformed() {
        let data = json!({ "users": { "items": [] } });
        assert!(matches!(
            records(&data, "users").unwrap_err(),
            Error::MalformedResponseShape("users")
        ));

        let data = json!({});
        assert!(matches!(
            records(&data, "users").unwrap_err(),
            Error::MalformedResponseShape("users")
        ));
    }

    #[test]
    fn test_edge_without_node_is_malformed() {
        let data = json!({
            "getWorkerDetails": { "edges": [ { "cursor": "abc" } ] }
        });
        assert!(matches!(
            records(&data, "getWorkerDetails").unwrap_err(),
            Error::MalformedResponseShape("getWorkerDetails")
        ));
    }

    #[test]
    fn test_envelope_deserialization() {
        let text = r#"{
            "data": { "getProfileHashrate": "123000" },
            "errors": []
        }"#;
        let envelope: Envelope = serde_json::from_str(text).unwrap();
        assert!(envelope.errors.is_empty());
        assert!(envelope.data.is_some());

        let text = r#"{ "errors": [ { "message": "unauthorized" } ] }"#;
        let envelope: Envelope = serde_json::from_str(text).unwrap();
        assert_eq!(envelope.errors[0].message, "unauthorized");
        assert!(envelope.data.is_none());
    }
}

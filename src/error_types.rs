use crate::graph::NodeId;
use thiserror::Error;

/// Error codes returnable from graph, triangulation and junction tree operations

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriangulationError {
    /// Malformed or inconsistent input data, e.g. a missing domain size
    #[error("Graph error: {0}")]
    GraphError(String),
    /// A node that is not present in the (working or original) graph
    #[error("Node {0} not found")]
    NotFound(NodeId),
    /// An operation invoked in a state in which it is not permitted
    #[error("Operation not allowed: {0}")]
    OperationNotAllowed(&'static str),
}

/// Error type returned by settings validation

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A field holds a value that is not recognised
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
}

#[test]
fn test_error_messages() {
    let e = TriangulationError::NotFound(3);
    assert_eq!(e.to_string(), "Node 3 not found");

    let e = TriangulationError::OperationNotAllowed("elimination order exhausted");
    assert_eq!(
        e.to_string(),
        "Operation not allowed: elimination order exhausted"
    );

    let e = SettingsError::BadFieldValue("elimination_method");
    assert_eq!(e.to_string(), "Bad value for field \"elimination_method\"");
}

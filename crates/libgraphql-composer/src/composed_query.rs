use indexmap::IndexMap;
use serde::Serialize;

/// Externally supplied variable values, passed through untouched.
pub type VariablesMap = IndexMap<String, serde_json::Value>;

/// The result of [`QueryComposer::build`](crate::QueryComposer::build): the
/// final query text paired with the caller's variables.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComposedQuery {
    pub query: String,
    pub variables: VariablesMap,
}

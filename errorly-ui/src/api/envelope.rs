//! Response envelope shared by every Errorly endpoint.

use serde::Deserialize;
use serde_json::Value;

/// `{ success, data?, error? }`
///
/// `error` is kept as a raw value; servers are not consistent about sending
/// a string there.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<Value>,
}

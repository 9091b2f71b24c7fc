//! Client configuration, network presets and RPC view types.

use std::collections::HashMap;
use std::time::Duration;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A public Rooch network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoochNetwork {
    /// A node running on this machine.
    Local,
    /// The development network.
    Dev,
    /// The public test network.
    Test,
    /// The main network.
    Main,
}

impl RoochNetwork {
    /// Default RPC endpoint.
    pub fn url(&self) -> &'static str {
        match self {
            Self::Local => "http://127.0.0.1:6767",
            Self::Dev => "https://dev-seed.rooch.network",
            Self::Test => "https://test-seed.rooch.network",
            Self::Main => "https://main-seed.rooch.network",
        }
    }

    /// Builtin chain id.
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Local => 4,
            Self::Dev => 3,
            Self::Test => 2,
            Self::Main => 1,
        }
    }
}

/// Configuration for an [`HttpTransport`](crate::transport::HttpTransport).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// JSON-RPC endpoint URL.
    pub url: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// Extra headers sent with every request.
    pub headers: HashMap<String, String>,
}

impl ClientConfig {
    /// Configuration for a network preset.
    pub fn for_network(network: RoochNetwork) -> Self {
        Self {
            url: network.url().to_string(),
            ..Default::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: RoochNetwork::Local.url().to_string(),
            request_timeout: Some(Duration::from_secs(30)),
            headers: HashMap::new(),
        }
    }
}

/// Options for state queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateOptions {
    /// Ask the node to decode Move values into JSON.
    pub decode: bool,
    /// Include display fields.
    pub show_display: bool,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            decode: true,
            show_display: true,
        }
    }
}

/// Options for transaction submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOptions {
    /// Return the execution output along with the receipt.
    pub with_output: bool,
}

impl Default for TxOptions {
    fn default() -> Self {
        Self { with_output: true }
    }
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Cursor to pass for the next page.
    #[serde(default)]
    pub next_cursor: Option<String>,
    /// Whether another page follows.
    #[serde(default)]
    pub has_next_page: bool,
}

impl<T> Page<T> {
    /// A page with no items and nothing after it.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            next_cursor: None,
            has_next_page: false,
        }
    }
}

/// Result of `rooch_executeViewFunction`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnnotatedFunctionResultView {
    /// `"Executed"` on success, otherwise an abort or error description.
    pub vm_status: Value,
    /// Return values, present when execution succeeded.
    #[serde(default)]
    pub return_values: Option<Vec<AnnotatedFunctionReturnValueView>>,
}

impl AnnotatedFunctionResultView {
    /// True when the VM reported `Executed`.
    pub fn is_executed(&self) -> bool {
        self.vm_status.as_str() == Some("Executed")
    }

    /// The decoded value of the first return value.
    pub fn first_decoded_value(&self) -> Option<&Value> {
        self.return_values
            .as_ref()
            .and_then(|values| values.first())
            .map(|v| &v.decoded_value)
    }
}

/// One return value of a view function.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnnotatedFunctionReturnValueView {
    /// Raw return value.
    pub value: FunctionReturnValueView,
    /// JSON rendering of the value.
    #[serde(default)]
    pub decoded_value: Value,
}

/// A raw return value: its type and `0x` hex bytes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FunctionReturnValueView {
    /// Move type of the value.
    pub type_tag: String,
    /// Canonical encoding as `0x` hex.
    pub value: String,
}

/// An object's state as returned by `rooch_getStates`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectStateView {
    /// Object id.
    pub id: String,
    /// Owner address.
    #[serde(default)]
    pub owner: Option<String>,
    /// Move type of the object value.
    #[serde(default)]
    pub object_type: Option<String>,
    /// Canonical encoding of the value as `0x` hex.
    #[serde(default)]
    pub value: String,
    /// JSON rendering of the value, when decoding was requested.
    #[serde(default)]
    pub decoded_value: Option<Value>,
    /// Display fields, when requested.
    #[serde(default)]
    pub display_fields: Option<Value>,
}

/// A key/state pair from `rooch_listStates`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StateKVView {
    /// Field key.
    pub field_key: String,
    /// The state under that key.
    pub state: ObjectStateView,
}

/// Execution receipt returned by `rooch_executeRawTransaction`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecuteTransactionResponseView {
    /// Position of the transaction in the sequencer's order.
    #[serde(default)]
    pub sequence_info: Value,
    /// Execution outcome.
    pub execution_info: TransactionExecutionInfoView,
    /// Changesets and events, when requested.
    #[serde(default)]
    pub output: Option<Value>,
    /// Abort or error details for failed execution.
    #[serde(default)]
    pub error_info: Option<Value>,
}

impl ExecuteTransactionResponseView {
    /// True when the status type is `executed`.
    pub fn is_executed(&self) -> bool {
        self.execution_info
            .status
            .get("type")
            .and_then(Value::as_str)
            == Some("executed")
    }
}

/// Execution outcome of one transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionExecutionInfoView {
    /// Transaction hash as `0x` hex.
    pub tx_hash: String,
    /// Gas consumed.
    #[serde(deserialize_with = "u64_from_str_or_number")]
    pub gas_used: u64,
    /// Status object, with a `type` field such as `executed` or `moveabort`.
    pub status: Value,
    /// State root after execution.
    #[serde(default)]
    pub state_root: Option<String>,
    /// Event accumulator root.
    #[serde(default)]
    pub event_root: Option<String>,
}

/// Read a `u64` the node may send as a decimal string or a JSON number.
pub fn u64_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn u64_from_str_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    u64_from_value(&value)
        .ok_or_else(|| D::Error::custom(format!("expected u64 string or number, got {value}")))
}

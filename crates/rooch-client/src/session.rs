//! Session keys: scopes, on-chain session records and their decoding.
//!
//! An account's session keys live in a table whose handle is embedded in the
//! account's `0x3::session_key::SessionKeys` resource. Entries come back from
//! the node as nested JSON (`{type, value: {...}}` wrappers around each Move
//! struct); the decoders here walk that structure without assuming more than
//! the field names.

use std::fmt;
use std::str::FromStr;

use rooch_primitives::address::RoochAddress;
use serde::Serialize;
use serde_json::Value;

use crate::types::{u64_from_value, ObjectStateView};
use crate::ClientError;

/// Resource type holding an account's session key table.
pub const SESSION_KEYS_RESOURCE: &str = "0x3::session_key::SessionKeys";

/// Functions a session key may call, as `address::module::function`.
/// `*` matches any module or function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionScope {
    /// Module address.
    pub module_address: RoochAddress,
    /// Module name or `*`.
    pub module_name: String,
    /// Function name or `*`.
    pub function_name: String,
}

impl SessionScope {
    /// Build a scope from its parts.
    pub fn new(
        module_address: RoochAddress,
        module_name: impl Into<String>,
        function_name: impl Into<String>,
    ) -> Self {
        Self {
            module_address,
            module_name: module_name.into(),
            function_name: function_name.into(),
        }
    }
}

impl FromStr for SessionScope {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split("::").collect();
        let [address, module, function] = parts.as_slice() else {
            return Err(ClientError::UnexpectedResponse(format!(
                "session scope must be address::module::function, got '{s}'"
            )));
        };
        Ok(Self::new(address.parse()?, *module, *function))
    }
}

impl fmt::Display for SessionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            self.module_address.short_hex(),
            self.module_name,
            self.function_name
        )
    }
}

/// A session key record as stored on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    /// Name of the application the key was created for.
    pub app_name: String,
    /// URL of that application.
    pub app_url: String,
    /// Authentication key (`0x` hex) identifying the session key.
    pub authentication_key: String,
    /// Allowed calls, each rendered `address::module::function`.
    pub scopes: Vec<String>,
    /// Creation time, seconds.
    pub create_time: u64,
    /// Last use, seconds.
    pub last_active_time: u64,
    /// Seconds of inactivity after which the key expires.
    pub max_inactive_interval: u64,
}

/// Parameters for creating a session key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSessionArgs {
    /// Application name.
    pub app_name: String,
    /// Application URL.
    pub app_url: String,
    /// Authentication key of the session keypair (its Rooch address bytes).
    pub authentication_key: Vec<u8>,
    /// Allowed calls.
    pub scopes: Vec<SessionScope>,
    /// Seconds of inactivity after which the key expires.
    pub max_inactive_interval: u64,
}

/// Table handle id inside a `SessionKeys` resource state, if present.
pub(crate) fn session_table_handle(state: &ObjectStateView) -> Option<String> {
    state
        .decoded_value
        .as_ref()?
        .pointer("/value/value/value/keys/value/handle/value/id")?
        .as_str()
        .map(str::to_string)
}

/// Decode one session table entry. Returns `None` when the entry has no
/// decoded value or lacks a required field.
pub(crate) fn decode_session_info(state: &ObjectStateView) -> Option<SessionInfo> {
    let fields = state.decoded_value.as_ref()?.pointer("/value/value/value")?;
    let text = |name: &str| fields.get(name).and_then(Value::as_str).map(str::to_string);
    let number = |name: &str| fields.get(name).and_then(u64_from_value);

    let scopes = fields
        .get("scopes")
        .and_then(|s| s.get("value").or(Some(s)))
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(render_scope).collect())
        .unwrap_or_default();

    Some(SessionInfo {
        app_name: text("app_name")?,
        app_url: text("app_url")?,
        authentication_key: text("authentication_key")?,
        scopes,
        create_time: number("create_time")?,
        last_active_time: number("last_active_time")?,
        max_inactive_interval: number("max_inactive_interval")?,
    })
}

/// Render a scope from either a `[address, module, function]` tuple or a
/// struct object (optionally wrapped in `{type, value}`).
fn render_scope(scope: &Value) -> Option<String> {
    if let Some(parts) = scope.as_array() {
        let parts: Vec<&str> = parts.iter().map(Value::as_str).collect::<Option<_>>()?;
        return match parts.as_slice() {
            [address, module, function] => Some(format!("{address}::{module}::{function}")),
            _ => None,
        };
    }
    let fields = match scope.get("value") {
        Some(inner) if inner.is_object() => inner,
        _ => scope,
    };
    let part = |name: &str| fields.get(name).and_then(Value::as_str);
    Some(format!(
        "{}::{}::{}",
        part("module_address")?,
        part("module_name")?,
        part("function_name")?
    ))
}

//! The Rooch client: chain queries, view calls, submission and session keys.

use std::sync::OnceLock;

use rooch_crypto::Keypair;
use rooch_message::SigningEnvelope;
use rooch_primitives::address::RoochAddress;
use rooch_primitives::bcs::U256;
use rooch_primitives::type_tag::TypeTag;
use rooch_transaction::{FunctionCall, Transaction};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::calls;
use crate::error::ClientError;
use crate::session::{
    decode_session_info, session_table_handle, CreateSessionArgs, SessionInfo,
    SESSION_KEYS_RESOURCE,
};
use crate::transport::{HttpTransport, RpcTransport};
use crate::types::{
    u64_from_value, AnnotatedFunctionResultView, ClientConfig, ExecuteTransactionResponseView,
    ObjectStateView, Page, RoochNetwork, StateKVView, StateOptions, TxOptions,
};

/// Async client for a Rooch node.
///
/// The chain id is fetched once and cached for the client's lifetime.
/// Sequence numbers are fetched fresh for every submission; concurrent
/// submissions from one sender must be serialized by the caller.
#[derive(Debug)]
pub struct RoochClient<T: RpcTransport = HttpTransport> {
    /// Transport every request goes through.
    transport: T,
    /// Chain id, once known.
    chain_id: OnceLock<u64>,
}

impl RoochClient<HttpTransport> {
    /// Create a client speaking JSON-RPC over HTTP.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }

    /// Create a client for a network preset.
    pub fn for_network(network: RoochNetwork) -> Result<Self, ClientError> {
        Self::new(ClientConfig::for_network(network))
    }
}

impl<T: RpcTransport> RoochClient<T> {
    /// Create a client over any transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            chain_id: OnceLock::new(),
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn request<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<R, ClientError> {
        let value = self.transport.request(method, params).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Chain id of the connected node.
    pub async fn get_chain_id(&self) -> Result<u64, ClientError> {
        if let Some(chain_id) = self.chain_id.get() {
            return Ok(*chain_id);
        }

        let value: Value = self.request("rooch_getChainID", vec![]).await?;
        let chain_id = u64_from_value(&value)
            .ok_or_else(|| ClientError::UnexpectedResponse(format!("chain id: {value}")))?;
        debug!(chain_id, "fetched chain id");

        // A concurrent fetch may have won; both saw the same node.
        Ok(*self.chain_id.get_or_init(|| chain_id))
    }

    /// Run a read-only function against current state.
    pub async fn execute_view_function(
        &self,
        call: &FunctionCall,
    ) -> Result<AnnotatedFunctionResultView, ClientError> {
        let ty_args: Vec<String> = call.ty_args.iter().map(ToString::to_string).collect();
        let params = json!({
            "function_id": call.function_id.to_string(),
            "ty_args": ty_args,
            "args": call.hex_args(),
        });
        self.request("rooch_executeViewFunction", vec![params]).await
    }

    /// Run a view function and return its first decoded value, failing
    /// unless the VM reports `Executed`.
    async fn view_value(&self, call: &FunctionCall) -> Result<Value, ClientError> {
        let result = self.execute_view_function(call).await?;
        if !result.is_executed() {
            return Err(ClientError::ViewFunctionFailed {
                function: call.function_id.to_string(),
                status: result.vm_status.to_string(),
            });
        }
        result.first_decoded_value().cloned().ok_or_else(|| {
            ClientError::UnexpectedResponse(format!("{} returned no value", call.function_id))
        })
    }

    /// Current sequence number of `address`.
    pub async fn get_sequence_number(&self, address: RoochAddress) -> Result<u64, ClientError> {
        let value = self.view_value(&calls::sequence_number_call(address)?).await?;
        let sequence_number = u64_from_value(&value)
            .ok_or_else(|| ClientError::UnexpectedResponse(format!("sequence number: {value}")))?;
        debug!(address = %address.short_hex(), sequence_number, "fetched sequence number");
        Ok(sequence_number)
    }

    /// Balance of `coin_type` held by `address`.
    pub async fn get_balance(
        &self,
        address: RoochAddress,
        coin_type: TypeTag,
    ) -> Result<U256, ClientError> {
        let value = self.view_value(&calls::balance_call(address, coin_type)?).await?;
        let text = match &value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return Err(ClientError::UnexpectedResponse(format!("balance: {value}"))),
        };
        Ok(U256::from_dec_str(&text)?)
    }

    /// Whether the session key `authentication_key` of `address` has expired.
    pub async fn session_is_expired(
        &self,
        address: RoochAddress,
        authentication_key: &[u8],
    ) -> Result<bool, ClientError> {
        let call = calls::is_expired_session_key_call(address, authentication_key)?;
        let value = self.view_value(&call).await?;
        value
            .as_bool()
            .ok_or_else(|| ClientError::UnexpectedResponse(format!("expired flag: {value}")))
    }

    /// States at `access_path`. Missing objects are left out.
    pub async fn get_states(
        &self,
        access_path: &str,
        options: StateOptions,
    ) -> Result<Vec<ObjectStateView>, ClientError> {
        let states: Vec<Option<ObjectStateView>> = self
            .request("rooch_getStates", vec![json!(access_path), json!(options)])
            .await?;
        Ok(states.into_iter().flatten().collect())
    }

    /// One page of the states under `access_path`.
    pub async fn list_states(
        &self,
        access_path: &str,
        cursor: Option<&str>,
        limit: Option<u64>,
        options: StateOptions,
    ) -> Result<Page<StateKVView>, ClientError> {
        let params = vec![
            json!(access_path),
            json!(cursor),
            json!(limit.map(|l| l.to_string())),
            json!(options),
        ];
        self.request("rooch_listStates", params).await
    }

    /// Submit an encoded signed transaction (`0x` hex).
    pub async fn execute_raw_transaction(
        &self,
        tx_hex: &str,
    ) -> Result<ExecuteTransactionResponseView, ClientError> {
        let params = vec![json!(tx_hex), json!(TxOptions::default())];
        self.request("rooch_executeRawTransaction", params).await
    }

    /// Prepare `tx` for the signer's account, sign it through `envelope`
    /// and submit it.
    pub async fn sign_and_execute_transaction<K: Keypair>(
        &self,
        tx: &mut Transaction,
        signer: &K,
        envelope: &SigningEnvelope,
    ) -> Result<ExecuteTransactionResponseView, ClientError> {
        let sender = signer.rooch_address();
        let chain_id = self.get_chain_id().await?;
        let sequence_number = self.get_sequence_number(sender).await?;

        tx.prepare(sender, sequence_number, chain_id)?;
        tx.sign(signer, envelope)?;

        let response = self.execute_raw_transaction(&tx.to_hex()?).await?;
        debug!(
            sender = %sender.short_hex(),
            sequence_number,
            tx_hash = %response.execution_info.tx_hash,
            executed = response.is_executed(),
            "transaction submitted"
        );
        Ok(response)
    }

    /// Session keys registered for `address`, newest first.
    ///
    /// An account that has never created a session key has no table; that
    /// yields an empty page.
    pub async fn get_session_keys(
        &self,
        address: RoochAddress,
        cursor: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Page<SessionInfo>, ClientError> {
        let access_path = format!("/resource/{}/{}", address.to_hex(), SESSION_KEYS_RESOURCE);
        let states = self.get_states(&access_path, StateOptions::default()).await?;

        let Some(handle) = states.first().and_then(session_table_handle) else {
            warn!(address = %address.short_hex(), "session key table handle missing or malformed");
            return Ok(Page::empty());
        };

        let page = self
            .list_states(
                &format!("/table/{handle}"),
                cursor,
                limit,
                StateOptions::default(),
            )
            .await?;

        let mut data = Vec::with_capacity(page.data.len());
        for entry in &page.data {
            match decode_session_info(&entry.state) {
                Some(info) => data.push(info),
                None => warn!(key = %entry.field_key, "skipping undecodable session key entry"),
            }
        }
        data.sort_by(|a, b| b.create_time.cmp(&a.create_time));

        Ok(Page {
            data,
            next_cursor: page.next_cursor,
            has_next_page: page.has_next_page,
        })
    }

    /// Register a session key for the signer's account.
    pub async fn create_session_key<K: Keypair>(
        &self,
        signer: &K,
        args: &CreateSessionArgs,
    ) -> Result<ExecuteTransactionResponseView, ClientError> {
        let mut tx = calls::create_session_key(args)?;
        self.sign_and_execute_transaction(&mut tx, signer, &SigningEnvelope::RawTxHash)
            .await
    }

    /// Remove a session key from the signer's account.
    pub async fn remove_session_key<K: Keypair>(
        &self,
        signer: &K,
        authentication_key: &[u8],
    ) -> Result<ExecuteTransactionResponseView, ClientError> {
        let mut tx = calls::remove_session_key(authentication_key)?;
        self.sign_and_execute_transaction(&mut tx, signer, &SigningEnvelope::RawTxHash)
            .await
    }

    /// Send `amount` of `coin_type` from the signer to `recipient`.
    pub async fn transfer_coin<K: Keypair>(
        &self,
        signer: &K,
        recipient: RoochAddress,
        amount: U256,
        coin_type: TypeTag,
    ) -> Result<ExecuteTransactionResponseView, ClientError> {
        let mut tx = calls::transfer_coin(recipient, amount, coin_type)?;
        self.sign_and_execute_transaction(&mut tx, signer, &SigningEnvelope::RawTxHash)
            .await
    }
}

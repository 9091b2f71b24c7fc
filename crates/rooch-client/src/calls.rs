//! Builders for the framework calls the client submits on a caller's behalf.

use rooch_primitives::address::RoochAddress;
use rooch_primitives::bcs::U256;
use rooch_primitives::type_tag::TypeTag;
use rooch_transaction::{FunctionArg, FunctionCall, Transaction};

use crate::session::CreateSessionArgs;
use crate::ClientError;

pub(crate) const SEQUENCE_NUMBER_FUNCTION: &str = "0x2::account::sequence_number";
pub(crate) const BALANCE_FUNCTION: &str = "0x3::account_coin_store::balance";
pub(crate) const IS_EXPIRED_SESSION_KEY_FUNCTION: &str = "0x3::session_key::is_expired_session_key";
const CREATE_SESSION_KEY_FUNCTION: &str =
    "0x3::session_key::create_session_key_with_multi_scope_entry";
const REMOVE_SESSION_KEY_FUNCTION: &str = "0x3::session_key::remove_session_key_entry";
const TRANSFER_COIN_FUNCTION: &str = "0x3::transfer::transfer_coin";

/// Transaction registering a session key with the given scopes.
pub fn create_session_key(args: &CreateSessionArgs) -> Result<Transaction, ClientError> {
    let mut addresses = Vec::with_capacity(args.scopes.len());
    let mut modules = Vec::with_capacity(args.scopes.len());
    let mut functions = Vec::with_capacity(args.scopes.len());
    for scope in &args.scopes {
        addresses.push(scope.module_address);
        modules.push(scope.module_name.clone());
        functions.push(scope.function_name.clone());
    }

    let call = FunctionCall::parse(
        CREATE_SESSION_KEY_FUNCTION,
        vec![],
        vec![
            args.app_name.as_str().into(),
            args.app_url.as_str().into(),
            args.authentication_key.clone().into(),
            addresses.into(),
            modules.into(),
            functions.into(),
            args.max_inactive_interval.into(),
        ],
    )?;
    Ok(Transaction::new(call))
}

/// Transaction removing the session key with `authentication_key`.
pub fn remove_session_key(authentication_key: &[u8]) -> Result<Transaction, ClientError> {
    let call = FunctionCall::parse(
        REMOVE_SESSION_KEY_FUNCTION,
        vec![],
        vec![authentication_key.to_vec().into()],
    )?;
    Ok(Transaction::new(call))
}

/// Transaction sending `amount` of `coin_type` to `recipient`.
pub fn transfer_coin(
    recipient: RoochAddress,
    amount: U256,
    coin_type: TypeTag,
) -> Result<Transaction, ClientError> {
    let call = FunctionCall::parse(
        TRANSFER_COIN_FUNCTION,
        vec![coin_type],
        vec![recipient.into(), amount.into()],
    )?;
    Ok(Transaction::new(call))
}

pub(crate) fn sequence_number_call(address: RoochAddress) -> Result<FunctionCall, ClientError> {
    Ok(FunctionCall::parse(
        SEQUENCE_NUMBER_FUNCTION,
        vec![],
        vec![FunctionArg::Address(address)],
    )?)
}

pub(crate) fn balance_call(
    address: RoochAddress,
    coin_type: TypeTag,
) -> Result<FunctionCall, ClientError> {
    Ok(FunctionCall::parse(
        BALANCE_FUNCTION,
        vec![coin_type],
        vec![FunctionArg::Address(address)],
    )?)
}

pub(crate) fn is_expired_session_key_call(
    address: RoochAddress,
    authentication_key: &[u8],
) -> Result<FunctionCall, ClientError> {
    Ok(FunctionCall::parse(
        IS_EXPIRED_SESSION_KEY_FUNCTION,
        vec![],
        vec![
            FunctionArg::Address(address),
            FunctionArg::Bytes(authentication_key.to_vec()),
        ],
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionScope;
    use rooch_primitives::bcs::to_bytes;
    use rooch_transaction::MoveAction;

    fn function_call(tx: &Transaction) -> &FunctionCall {
        match tx.action() {
            MoveAction::Function(call) => call,
            other => panic!("expected function call, got {:?}", other),
        }
    }

    #[test]
    fn test_create_session_key_args() {
        let args = CreateSessionArgs {
            app_name: "demo".into(),
            app_url: "https://demo.app".into(),
            authentication_key: vec![0xab; 32],
            scopes: vec![
                SessionScope::new(RoochAddress::THREE, "empty", "*"),
                SessionScope::new(RoochAddress::ONE, "*", "*"),
            ],
            max_inactive_interval: 3600,
        };
        let tx = create_session_key(&args).unwrap();
        let call = function_call(&tx);
        assert_eq!(
            call.function_id.function_name.as_str(),
            "create_session_key_with_multi_scope_entry"
        );
        assert_eq!(call.args.len(), 7);
        assert_eq!(call.args[0], to_bytes("demo").unwrap());
        assert_eq!(
            call.args[3],
            to_bytes(&vec![RoochAddress::THREE, RoochAddress::ONE]).unwrap()
        );
        assert_eq!(
            call.args[5],
            to_bytes(&vec!["*".to_string(), "*".to_string()]).unwrap()
        );
        assert_eq!(call.args[6], 3600u64.to_le_bytes().to_vec());
    }

    #[test]
    fn test_transfer_coin_carries_coin_type() {
        let coin: TypeTag = "0x3::gas_coin::RGas".parse().unwrap();
        let tx = transfer_coin(RoochAddress::TWO, U256::from(5u64), coin.clone()).unwrap();
        let call = function_call(&tx);
        assert_eq!(call.ty_args, vec![coin]);
        assert_eq!(call.args[0], RoochAddress::TWO.to_bytes().to_vec());
        assert_eq!(call.args[1], U256::from(5u64).to_le_bytes().to_vec());
    }

    #[test]
    fn test_remove_session_key_encodes_vector() {
        let tx = remove_session_key(&[1, 2, 3]).unwrap();
        assert_eq!(function_call(&tx).args, vec![vec![3, 1, 2, 3]]);
    }
}

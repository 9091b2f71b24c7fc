//! Move actions: what a transaction asks the VM to do.

use std::fmt;
use std::str::FromStr;

use rooch_primitives::address::RoochAddress;
use rooch_primitives::bcs::{read_variant_index, Decode, Encode};
use rooch_primitives::type_tag::{Identifier, ModuleId, TypeTag};
use rooch_primitives::util::{BcsReader, BcsWriter};
use rooch_primitives::PrimitivesError;

use crate::function_arg::FunctionArg;
use crate::TransactionError;

/// A fully qualified entry function `address::module::function`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionId {
    pub module_id: ModuleId,
    pub function_name: Identifier,
}

impl FunctionId {
    pub fn new(module_id: ModuleId, function_name: Identifier) -> Self {
        FunctionId {
            module_id,
            function_name,
        }
    }

    /// Parse `address::module::function`. The address may be short hex,
    /// full hex or bech32m.
    pub fn parse(text: &str) -> Result<Self, TransactionError> {
        let parts: Vec<&str> = text.split("::").collect();
        let [address, module, function] = parts.as_slice() else {
            return Err(TransactionError::InvalidFunctionId(format!(
                "expected address::module::function, got '{}'",
                text
            )));
        };
        let address = RoochAddress::from_str(address.trim())
            .map_err(|e| TransactionError::InvalidFunctionId(format!("{}: {}", text, e)))?;
        let module = Identifier::new(module.trim())
            .map_err(|e| TransactionError::InvalidFunctionId(format!("{}: {}", text, e)))?;
        let function = Identifier::new(function.trim())
            .map_err(|e| TransactionError::InvalidFunctionId(format!("{}: {}", text, e)))?;
        Ok(FunctionId::new(ModuleId::new(address, module), function))
    }
}

impl FromStr for FunctionId {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FunctionId::parse(s)
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module_id, self.function_name)
    }
}

impl Encode for FunctionId {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        self.module_id.encode(writer)?;
        self.function_name.encode(writer)
    }
}

impl Decode for FunctionId {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        Ok(FunctionId {
            module_id: ModuleId::decode(reader)?,
            function_name: Identifier::decode(reader)?,
        })
    }
}

/// A call to an entry function with type arguments and encoded arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub function_id: FunctionId,
    pub ty_args: Vec<TypeTag>,
    /// Each argument already in its canonical encoding.
    pub args: Vec<Vec<u8>>,
}

impl FunctionCall {
    /// Build a call, encoding each argument.
    pub fn new(
        function_id: FunctionId,
        ty_args: Vec<TypeTag>,
        args: Vec<FunctionArg>,
    ) -> Result<Self, TransactionError> {
        let args = args
            .iter()
            .map(FunctionArg::encode)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FunctionCall {
            function_id,
            ty_args,
            args,
        })
    }

    /// Build a call from function id text.
    pub fn parse(
        function_id: &str,
        ty_args: Vec<TypeTag>,
        args: Vec<FunctionArg>,
    ) -> Result<Self, TransactionError> {
        Self::new(FunctionId::parse(function_id)?, ty_args, args)
    }

    /// Arguments as `0x`-prefixed hex, the form view calls take over RPC.
    pub fn hex_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| format!("0x{}", hex::encode(arg)))
            .collect()
    }
}

impl Encode for FunctionCall {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        self.function_id.encode(writer)?;
        self.ty_args.encode(writer)?;
        self.args.encode(writer)
    }
}

impl Decode for FunctionCall {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        Ok(FunctionCall {
            function_id: FunctionId::decode(reader)?,
            ty_args: Vec::decode(reader)?,
            args: Vec::decode(reader)?,
        })
    }
}

/// A script: compiled bytecode plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCall {
    pub code: Vec<u8>,
    pub ty_args: Vec<TypeTag>,
    pub args: Vec<Vec<u8>>,
}

impl Encode for ScriptCall {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        self.code.encode(writer)?;
        self.ty_args.encode(writer)?;
        self.args.encode(writer)
    }
}

impl Decode for ScriptCall {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        Ok(ScriptCall {
            code: Vec::decode(reader)?,
            ty_args: Vec::decode(reader)?,
            args: Vec::decode(reader)?,
        })
    }
}

/// The action a transaction performs.
///
/// Variant indices: Script = 0, Function = 1, ModuleBundle = 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveAction {
    Script(ScriptCall),
    Function(FunctionCall),
    /// Modules to publish, each as compiled bytecode.
    ModuleBundle(Vec<Vec<u8>>),
}

impl MoveAction {
    /// Shorthand for a function call action.
    pub fn call_function(
        function_id: &str,
        ty_args: Vec<TypeTag>,
        args: Vec<FunctionArg>,
    ) -> Result<Self, TransactionError> {
        Ok(MoveAction::Function(FunctionCall::parse(
            function_id,
            ty_args,
            args,
        )?))
    }
}

impl From<FunctionCall> for MoveAction {
    fn from(call: FunctionCall) -> Self {
        MoveAction::Function(call)
    }
}

impl Encode for MoveAction {
    fn encode(&self, writer: &mut BcsWriter) -> Result<(), PrimitivesError> {
        match self {
            MoveAction::Script(call) => {
                writer.write_uleb128(0);
                call.encode(writer)
            }
            MoveAction::Function(call) => {
                writer.write_uleb128(1);
                call.encode(writer)
            }
            MoveAction::ModuleBundle(modules) => {
                writer.write_uleb128(2);
                modules.encode(writer)
            }
        }
    }
}

impl Decode for MoveAction {
    fn decode(reader: &mut BcsReader<'_>) -> Result<Self, PrimitivesError> {
        match read_variant_index(reader, "MoveAction", 3)? {
            0 => Ok(MoveAction::Script(ScriptCall::decode(reader)?)),
            1 => Ok(MoveAction::Function(FunctionCall::decode(reader)?)),
            _ => Ok(MoveAction::ModuleBundle(Vec::decode(reader)?)),
        }
    }
}

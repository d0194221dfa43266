//! Transaction payload model
//!
//! Mirrors the JSON payloads accepted by Aptos wallets:
//! - `entry_function_payload`: call into a published Move function
//! - `script_payload`: one-off compiled Move script
//! - `multisig_payload`: execution of a multisig account transaction
//!
//! Entry function arguments are a closed set of value kinds. Large integers
//! (u64/u128/u256) must travel as decimal strings, so [`EntryArgument`]
//! refuses to serialize them raw; run the payload through
//! [`normalize_payload`] first.

mod normalize;

pub use normalize::{normalize_argument, normalize_payload};

use crate::error::{SubmitterError, SubmitterResult};

use alloy_primitives::U256;
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Payload handed to the wallet for signing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionPayload {
    EntryFunctionPayload(EntryFunctionPayload),
    ScriptPayload(ScriptPayload),
    MultisigPayload(MultisigPayload),
}

impl TransactionPayload {
    /// Build an entry function call
    pub fn entry_function(
        function: impl Into<String>,
        type_arguments: Vec<String>,
        arguments: Vec<EntryArgument>,
    ) -> Self {
        TransactionPayload::EntryFunctionPayload(EntryFunctionPayload {
            function: function.into(),
            type_arguments,
            arguments,
        })
    }

    pub fn is_entry_function(&self) -> bool {
        matches!(self, TransactionPayload::EntryFunctionPayload(_))
    }

    /// Wire name of the payload kind
    pub fn kind(&self) -> &'static str {
        match self {
            TransactionPayload::EntryFunctionPayload(_) => "entry_function_payload",
            TransactionPayload::ScriptPayload(_) => "script_payload",
            TransactionPayload::MultisigPayload(_) => "multisig_payload",
        }
    }

    /// Called function, if this payload targets one directly
    pub fn function(&self) -> Option<&str> {
        match self {
            TransactionPayload::EntryFunctionPayload(entry) => Some(&entry.function),
            TransactionPayload::MultisigPayload(multisig) => multisig
                .transaction_payload
                .as_ref()
                .map(|entry| entry.function.as_str()),
            TransactionPayload::ScriptPayload(_) => None,
        }
    }

    /// Render the payload as wallet-ready JSON
    ///
    /// Fails if a large integer argument was not normalized.
    pub fn to_json(&self) -> SubmitterResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Direct call into an on-chain Move function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    /// Fully qualified function id, e.g. `0x1::coin::transfer`
    pub function: String,
    #[serde(default)]
    pub type_arguments: Vec<String>,
    #[serde(default)]
    pub arguments: Vec<EntryArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptPayload {
    pub code: ScriptBytecode,
    #[serde(default)]
    pub type_arguments: Vec<String>,
    #[serde(default)]
    pub arguments: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptBytecode {
    /// Hex encoded compiled script
    pub bytecode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigPayload {
    pub multisig_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_payload: Option<EntryFunctionPayload>,
}

/// Largest integer a JSON number carries without losing precision (2^53 - 1)
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// One positional entry function argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryArgument {
    Number(serde_json::Number),
    String(String),
    /// Integer beyond the JSON safe range; must become a string before signing
    LargeInteger(U256),
    Bool(bool),
    /// Move `vector<T>` argument
    Nested(Vec<EntryArgument>),
}

impl EntryArgument {
    /// Integer argument; values past [`MAX_SAFE_INTEGER`] become `LargeInteger`
    pub fn number(value: u64) -> Self {
        if value > MAX_SAFE_INTEGER {
            EntryArgument::LargeInteger(U256::from(value))
        } else {
            EntryArgument::Number(value.into())
        }
    }

    pub fn large(value: u128) -> Self {
        EntryArgument::LargeInteger(U256::from(value))
    }

    /// True if this value or anything nested in it is a raw large integer
    pub fn contains_large_integer(&self) -> bool {
        match self {
            EntryArgument::LargeInteger(_) => true,
            EntryArgument::Nested(items) => items.iter().any(Self::contains_large_integer),
            _ => false,
        }
    }
}

impl From<&str> for EntryArgument {
    fn from(value: &str) -> Self {
        EntryArgument::String(value.to_string())
    }
}

impl From<String> for EntryArgument {
    fn from(value: String) -> Self {
        EntryArgument::String(value)
    }
}

impl From<bool> for EntryArgument {
    fn from(value: bool) -> Self {
        EntryArgument::Bool(value)
    }
}

impl From<U256> for EntryArgument {
    fn from(value: U256) -> Self {
        EntryArgument::LargeInteger(value)
    }
}

impl From<Vec<EntryArgument>> for EntryArgument {
    fn from(value: Vec<EntryArgument>) -> Self {
        EntryArgument::Nested(value)
    }
}

impl TryFrom<Value> for EntryArgument {
    type Error = SubmitterError;

    fn try_from(value: Value) -> SubmitterResult<Self> {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(value) => Ok(EntryArgument::number(value)),
                None => Ok(EntryArgument::Number(n)),
            },
            Value::String(s) => Ok(EntryArgument::String(s)),
            Value::Bool(b) => Ok(EntryArgument::Bool(b)),
            Value::Array(items) => items
                .into_iter()
                .map(EntryArgument::try_from)
                .collect::<SubmitterResult<Vec<_>>>()
                .map(EntryArgument::Nested),
            Value::Null => Err(SubmitterError::InvalidPayload(
                "null is not a valid entry function argument".to_string(),
            )),
            Value::Object(_) => Err(SubmitterError::InvalidPayload(
                "objects are not valid entry function arguments".to_string(),
            )),
        }
    }
}

impl Serialize for EntryArgument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EntryArgument::Number(n) => n.serialize(serializer),
            EntryArgument::String(s) => serializer.serialize_str(s),
            EntryArgument::Bool(b) => serializer.serialize_bool(*b),
            EntryArgument::Nested(items) => items.serialize(serializer),
            EntryArgument::LargeInteger(value) => Err(S::Error::custom(format!(
                "large integer {} must be converted to a decimal string before submission",
                value
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for EntryArgument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        EntryArgument::try_from(value).map_err(D::Error::custom)
    }
}

/// Wallet submission options, passed through untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gas_amount: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_unit_price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_timestamp_secs: Option<u64>,
}

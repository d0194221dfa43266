//! Large integer normalization for entry function arguments

use super::{EntryArgument, EntryFunctionPayload, TransactionPayload};

/// Rewrite every large integer argument of an entry function call to its
/// decimal string form. Other payload kinds are returned as-is.
pub fn normalize_payload(payload: TransactionPayload) -> TransactionPayload {
    match payload {
        TransactionPayload::EntryFunctionPayload(EntryFunctionPayload {
            function,
            type_arguments,
            arguments,
        }) => TransactionPayload::EntryFunctionPayload(EntryFunctionPayload {
            function,
            type_arguments,
            arguments: arguments.into_iter().map(normalize_argument).collect(),
        }),
        other => other,
    }
}

/// Normalize a single argument, descending into vectors
pub fn normalize_argument(argument: EntryArgument) -> EntryArgument {
    match argument {
        EntryArgument::LargeInteger(value) => EntryArgument::String(value.to_string()),
        EntryArgument::Nested(items) => {
            EntryArgument::Nested(items.into_iter().map(normalize_argument).collect())
        }
        other => other,
    }
}

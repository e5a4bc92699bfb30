//! Turns a [`SendRequest`] into an unsigned [`TransactionDraft`].

use shardblast_types::{Address, SendRequest};

use crate::draft::TransactionDraft;
use crate::error::TransactionError;
use crate::gas::intrinsic_gas;
use crate::units::{amount_to_base, gas_price_to_base};

/// Build the draft for one send request. The request is left untouched.
pub fn build(request: &SendRequest) -> Result<TransactionDraft, TransactionError> {
    let payload = request.payload_bytes();
    let gas_limit = intrinsic_gas(payload, false)?;
    let amount = amount_to_base(request.amount)?;
    let receiver = Address::parse(&request.receiver)?;

    let draft = TransactionDraft {
        nonce: request.nonce,
        gas_limit,
        receiver,
        from_shard: request.sender_shard,
        to_shard: request.receiver_shard,
        amount,
        gas_price: gas_price_to_base(request.gas_price),
        payload: payload.to_vec(),
    };
    tracing::trace!(nonce = draft.nonce, gas = draft.gas_limit, "built draft");
    Ok(draft)
}

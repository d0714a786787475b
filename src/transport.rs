//! Ledger unit envelopes as seen by the message layer.
//!
//! The ledger itself lives elsewhere. Inbound, it hands over the issuance
//! time, the address (the channel) and the already-decoded body. Outbound,
//! it takes an address, an ASCII body and a freshness tag.

use serde::{Deserialize, Serialize};

use crate::trytes;

/// Capacity of a unit's signature-fragments field, in trytes
pub const SIGNATURE_FRAGMENTS_TRYTE_LENGTH: usize = 2187;

/// Length of a unit's tag field, in trytes
pub const TAG_TRYTE_LENGTH: usize = 27;

/// Ceiling on the serialized wire payload, in characters
pub const MAX_PAYLOAD_LENGTH: usize = SIGNATURE_FRAGMENTS_TRYTE_LENGTH / 3 * 2;

/// A unit received from the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundUnit {
    pub issuance_timestamp: i64,
    pub address: String,
    pub body: String,
}

/// A unit ready to be handed to the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundUnit {
    pub address: String,
    pub body: String,
    pub tag: String,
}

impl OutboundUnit {
    /// What a peer sees once the ledger has attached this unit at `issuance_timestamp`
    pub fn received_at(&self, issuance_timestamp: i64) -> InboundUnit {
        InboundUnit {
            issuance_timestamp,
            address: self.address.clone(),
            body: self.body.clone(),
        }
    }
}

/// Freshness tag: minutes since the Unix epoch as a balanced-ternary tryte number
pub fn life_sign_tag(timestamp_millis: i64) -> String {
    trytes::from_number(timestamp_millis / 60_000, TAG_TRYTE_LENGTH)
}

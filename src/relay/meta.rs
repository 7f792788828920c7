use serde::{Deserialize, Serialize};

use crate::relay::WireFormat;

/// Freshness metadata bound into the proof. Must carry the block height of the
/// session used for the attempt.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayMeta {
    pub block_height: u64,
}

impl RelayMeta {
    pub fn new(block_height: u64) -> Self {
        RelayMeta { block_height }
    }
}

impl WireFormat for RelayMeta {
    const NAME: &'static str = "relay meta";

    fn is_valid(&self) -> bool {
        self.block_height > 0
    }
}

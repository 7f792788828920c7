use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::relay::RelayResponse;

/// One participant's answer in a consensus round.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConsensusNode {
    pub node: Node,
    pub already_in_consensus: bool,
    pub relay_response: RelayResponse,
}

impl ConsensusNode {
    pub fn new(node: Node, already_in_consensus: bool, relay_response: RelayResponse) -> Self {
        ConsensusNode {
            node,
            already_in_consensus,
            relay_response,
        }
    }
}

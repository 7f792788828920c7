use serde::{Deserialize, Serialize};

use crate::consensus::challenge::{MajorityResponse, MinorityResponse};
use crate::consensus::consensus_node::ConsensusNode;
use crate::crypto::{hash, RelayHash};
use crate::node::Node;

/// Aggregate of a consensus round. `signature` and `payload` come from the
/// round's first response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConsensusRelayResponse {
    pub signature: String,
    pub payload: String,
    pub consensus_nodes: Vec<ConsensusNode>,
}

impl ConsensusRelayResponse {
    pub fn new(signature: &str, payload: &str, consensus_nodes: Vec<ConsensusNode>) -> Self {
        ConsensusRelayResponse {
            signature: signature.to_string(),
            payload: payload.to_string(),
            consensus_nodes,
        }
    }

    ///
    /// Groups participants by the SHA3-256 hash of their response payload, in
    /// order of first appearance.
    ///
    fn groups(&self) -> Vec<(RelayHash, Vec<&ConsensusNode>)> {
        let mut groups: Vec<(RelayHash, Vec<&ConsensusNode>)> = vec![];
        for consensus_node in &self.consensus_nodes {
            let payload_hash = hash(consensus_node.relay_response.payload.as_bytes());
            match groups.iter_mut().find(|(h, _)| *h == payload_hash) {
                Some((_, members)) => members.push(consensus_node),
                None => groups.push((payload_hash, vec![consensus_node])),
            }
        }
        groups
    }

    // largest group; ties go to the one seen first
    fn majority_group(&self) -> Option<(RelayHash, Vec<&ConsensusNode>)> {
        let mut majority: Option<(RelayHash, Vec<&ConsensusNode>)> = None;
        for group in self.groups() {
            let larger = match &majority {
                Some((_, members)) => group.1.len() > members.len(),
                None => true,
            };
            if larger {
                majority = Some(group);
            }
        }
        majority
    }

    pub fn majority_count(&self) -> usize {
        self.majority_group()
            .map(|(_, members)| members.len())
            .unwrap_or(0)
    }

    /// True when strictly more than half of the participants agree.
    pub fn consensus_result(&self) -> bool {
        !self.consensus_nodes.is_empty() && self.majority_count() * 2 > self.consensus_nodes.len()
    }

    pub fn majority_response(&self) -> Option<MajorityResponse> {
        let (_, members) = self.majority_group()?;
        MajorityResponse::new(
            members
                .iter()
                .map(|member| member.relay_response.clone())
                .collect(),
        )
        .ok()
    }

    /// The first response outside the majority group.
    pub fn minority_response(&self) -> Option<MinorityResponse> {
        let (majority_hash, _) = self.majority_group()?;
        self.consensus_nodes
            .iter()
            .find(|member| hash(member.relay_response.payload.as_bytes()) != majority_hash)
            .and_then(|member| MinorityResponse::new(member.relay_response.clone()).ok())
    }

    /// The first participant that answered with the majority.
    pub fn arbiter(&self) -> Option<Node> {
        self.majority_group()
            .and_then(|(_, members)| members.first().map(|member| member.node.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::fixtures::{make_nodes, make_relay_response};

    fn round(payloads: &[&str]) -> ConsensusRelayResponse {
        let nodes = make_nodes(payloads.len());
        let consensus_nodes: Vec<ConsensusNode> = nodes
            .into_iter()
            .zip(payloads.iter())
            .map(|(node, payload)| ConsensusNode::new(node, true, make_relay_response(payload)))
            .collect();
        let first = consensus_nodes[0].relay_response.clone();
        ConsensusRelayResponse::new(&first.signature, &first.payload, consensus_nodes)
    }

    #[test]
    fn two_of_three_is_a_majority() {
        let aggregate = round(&["A", "A", "B"]);
        assert!(aggregate.consensus_result());
        assert_eq!(aggregate.majority_count(), 2);
        assert_eq!(aggregate.majority_response().unwrap().relays.len(), 2);
        assert_eq!(aggregate.minority_response().unwrap().relay.payload, "B");
        assert_eq!(aggregate.arbiter().unwrap(), aggregate.consensus_nodes[0].node);
    }

    #[test]
    fn majority_need_not_include_the_first_response() {
        let aggregate = round(&["B", "A", "A"]);
        assert!(aggregate.consensus_result());
        assert_eq!(aggregate.payload, "B");
        assert_eq!(aggregate.majority_response().unwrap().relays[0].payload, "A");
        assert_eq!(aggregate.minority_response().unwrap().relay.payload, "B");
        assert_eq!(aggregate.arbiter().unwrap(), aggregate.consensus_nodes[1].node);
    }

    #[test]
    fn all_distinct_has_no_majority_but_a_split() {
        let aggregate = round(&["A", "B", "C"]);
        assert!(!aggregate.consensus_result());
        assert_eq!(aggregate.majority_count(), 1);
        assert_eq!(aggregate.majority_response().unwrap().relays[0].payload, "A");
        assert_eq!(aggregate.minority_response().unwrap().relay.payload, "B");
    }

    #[test]
    fn even_split_is_not_a_majority() {
        let aggregate = round(&["A", "B", "B", "A"]);
        assert!(!aggregate.consensus_result());
        assert_eq!(aggregate.majority_count(), 2);
        assert_eq!(aggregate.majority_response().unwrap().relays[0].payload, "A");
    }

    #[test]
    fn unanimous_round_has_no_minority() {
        let aggregate = round(&["A"]);
        assert!(aggregate.consensus_result());
        assert!(aggregate.minority_response().is_none());

        let empty = ConsensusRelayResponse::new("", "", vec![]);
        assert!(!empty.consensus_result());
        assert!(empty.majority_response().is_none());
        assert!(empty.arbiter().is_none());
    }

    #[test]
    fn wire_format() {
        let aggregate = round(&["A", "A"]);
        let json = serde_json::to_value(&aggregate).unwrap();
        assert_eq!(json["payload"], "A");
        assert_eq!(json["consensus_nodes"].as_array().unwrap().len(), 2);
        assert_eq!(json["consensus_nodes"][0]["already_in_consensus"], true);
        assert_eq!(json["consensus_nodes"][0]["relay_response"]["response"], "A");
    }
}

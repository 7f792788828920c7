use std::collections::HashSet;

use tracing::{event, Level};

use crate::aat::AuthToken;
use crate::consensus::challenge::{ChallengeRequest, ChallengeResponse};
use crate::consensus::consensus_node::ConsensusNode;
use crate::consensus::consensus_relay_response::ConsensusRelayResponse;
use crate::dispatcher::{RelayDispatcher, RelayOptions};
use crate::error::RelayError;
use crate::networking::routes::Route;

/// How a consensus round was settled.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsensusOutcome {
    /// Strictly more than half of the nodes agreed.
    Verified(ConsensusRelayResponse),
    /// No majority, returned because disputed responses are accepted.
    Disputed(ConsensusRelayResponse),
    /// No majority; the dispute was submitted to an arbiter.
    Challenged(ChallengeResponse),
}

impl RelayDispatcher {
    ///
    /// Sends the same relay to `consensus_node_count` distinct session nodes,
    /// one after another, and compares their payloads.
    ///
    /// Any failed round fails the whole call. Without a majority, the result
    /// is returned as disputed when `accept_disputed_responses` is set and is
    /// otherwise challenged at the arbiter.
    ///
    pub async fn send_consensus_relay(
        &self,
        data: &str,
        chain: &str,
        aat: &AuthToken,
        options: &RelayOptions,
    ) -> Result<ConsensusOutcome, RelayError> {
        let node_count = self.configuration().consensus_node_count;
        if node_count == 0 {
            return Err(RelayError::ConsensusNodeCountZero);
        }
        let options = options.clone().with_consensus(true);

        let mut excluded: HashSet<String> = HashSet::new();
        let mut consensus_nodes: Vec<ConsensusNode> = Vec::with_capacity(node_count);
        for round in 0..node_count {
            let (node, response) = self
                .dispatch(data, chain, aat, &options, &excluded)
                .await
                .map_err(|err| {
                    event!(Level::WARN, "consensus round {} failed: {}", round + 1, err);
                    err
                })?;
            event!(
                Level::DEBUG,
                "consensus round {} answered by {}",
                round + 1,
                node.service_url
            );
            excluded.insert(node.public_key.clone());
            consensus_nodes.push(ConsensusNode::new(node, true, response));
        }

        // the first round's response stands for the whole round
        let first = consensus_nodes[0].relay_response.clone();
        let aggregate = ConsensusRelayResponse::new(&first.signature, &first.payload, consensus_nodes);
        self.resolve_consensus(aggregate).await
    }

    async fn resolve_consensus(
        &self,
        aggregate: ConsensusRelayResponse,
    ) -> Result<ConsensusOutcome, RelayError> {
        let total = aggregate.consensus_nodes.len();
        if aggregate.consensus_result() {
            event!(
                Level::INFO,
                "consensus verified by {} of {} nodes",
                aggregate.majority_count(),
                total
            );
            return Ok(ConsensusOutcome::Verified(aggregate));
        }
        if self.configuration().accept_disputed_responses {
            event!(
                Level::INFO,
                "accepting disputed consensus, largest agreement {} of {}",
                aggregate.majority_count(),
                total
            );
            return Ok(ConsensusOutcome::Disputed(aggregate));
        }

        let (majority, minority, arbiter) = match (
            aggregate.majority_response(),
            aggregate.minority_response(),
            aggregate.arbiter(),
        ) {
            (Some(majority), Some(minority), Some(arbiter)) => (majority, minority, arbiter),
            _ => return Err(RelayError::ConsensusUnresolved),
        };

        let challenge = ChallengeRequest::new(majority, minority).to_json_value()?;
        event!(Level::INFO, "submitting challenge to {}", arbiter.service_url);
        let reply = self
            .transport()
            .send(&arbiter, Route::Challenge, &challenge, &self.transport_options())
            .await
            .map_err(|err| RelayError::Challenge(err.with_node_public_key(&arbiter.public_key)))?;
        Ok(ConsensusOutcome::Challenged(ChallengeResponse::from_json_value(reply)?))
    }
}

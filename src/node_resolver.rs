use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::configuration::Configuration;
use crate::error::RelayError;
use crate::node::Node;
use crate::session::Session;

/// How the receiving node of one relay attempt is chosen.
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    /// Any session member, or the requested node if it belongs to the session.
    Single,
    /// A session member not yet used in the current consensus round. Nodes are
    /// identified by public key.
    Consensus { excluded: &'a HashSet<String> },
}

///
/// Picks the service node for one relay attempt. Pure apart from the random
/// source; never retries.
///
pub fn resolve_node<R: Rng + ?Sized>(
    rng: &mut R,
    session: &Session,
    configuration: &Configuration,
    selection: Selection<'_>,
    requested: Option<&Node>,
) -> Result<Node, RelayError> {
    if let Some(node) = requested {
        if !session.contains_node(node) {
            return Err(RelayError::NodeNotInSession);
        }
    }

    match selection {
        Selection::Single => match requested {
            Some(node) => Ok(node.clone()),
            None => session
                .nodes
                .choose(rng)
                .cloned()
                .ok_or(RelayError::InsufficientSessionNodes {
                    required: 1,
                    available: 0,
                }),
        },
        Selection::Consensus { excluded } => {
            if configuration.consensus_node_count > session.nodes.len() {
                return Err(RelayError::InsufficientSessionNodes {
                    required: configuration.consensus_node_count,
                    available: session.nodes.len(),
                });
            }
            if let Some(node) = requested {
                if !excluded.contains(&node.public_key) {
                    return Ok(node.clone());
                }
            }
            let eligible: Vec<&Node> = session
                .nodes
                .iter()
                .filter(|node| !excluded.contains(&node.public_key))
                .collect();
            eligible
                .choose(rng)
                .map(|node| (*node).clone())
                .ok_or(RelayError::NoEligibleNode)
        }
    }
}

/*!

# Consensus Relays

A consensus relay sends the same payload to `consensus_node_count` distinct
nodes of the current session, one round after another, and compares the
SHA3-256 hashes of their answers.

```text
rounds      A  A  B          A  B  C
majority    A (2 of 3)       A (1 of 3)
outcome     Verified         Disputed, or Challenged at the arbiter
```

A round is verified when strictly more than half of the nodes agree. When
they do not, the result is either returned as disputed (with
`accept_disputed_responses`) or submitted as a `ChallengeRequest` to the
first node that answered with the largest group.

*/

pub mod challenge;
pub mod consensus_node;
pub mod consensus_relay_response;
pub mod coordinator;

pub use challenge::{ChallengeRequest, ChallengeResponse, MajorityResponse, MinorityResponse};
pub use consensus_node::ConsensusNode;
pub use consensus_relay_response::ConsensusRelayResponse;
pub use coordinator::ConsensusOutcome;

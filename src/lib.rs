/*!
# Relay Client

A client-side engine for submitting relays (proxied RPC calls) to the service
nodes of a session, with optional N-way consensus verification and challenge
submission when nodes disagree.

Every relay carries a `RelayProof` signed with the client key delegated by an
application authentication token (`AuthToken`). The proof binds the payload,
the session block height and the receiving node, so a node can prove the work
it did and the client can hold it to its answer.

# Usage

```text
let dispatcher = RelayDispatcher::new(configuration, session_manager, keybase, transport);
let outcome = dispatcher.send(data, "0022", &aat, &RelayOptions::new()).await?;
let verified = dispatcher.send_consensus_relay(data, "0022", &aat, &RelayOptions::new()).await?;
```

Sessions, keys and the network are supplied through the `SessionManager`,
`Keybase` and `RelayTransport` traits. `StaticSessionManager`,
`InMemoryKeybase` and `HttpTransport` are ready-made implementations.

*/
pub mod aat;
pub mod configuration;
pub mod consensus;
pub mod crypto;
pub mod dispatcher;
pub mod error;
pub mod keybase;
pub mod keypair;
pub mod networking;
pub mod node;
pub mod node_resolver;
pub mod relay;
pub mod session;

#[cfg(test)]
pub mod test_utilities;

pub use error::{Error, RelayError, Result};

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{event, Level};

use crate::aat::AuthToken;
use crate::configuration::Configuration;
use crate::consensus::consensus_node::ConsensusNode;
use crate::crypto::{address_from_public_key, generate_entropy};
use crate::error::RelayError;
use crate::keybase::Keybase;
use crate::networking::rpc_error::RpcError;
use crate::networking::transport::{RelayTransport, TransportOptions};
use crate::node::Node;
use crate::node_resolver::{resolve_node, Selection};
use crate::relay::proof_builder::proof_bytes;
use crate::relay::{
    RelayHeaders, RelayMeta, RelayPayload, RelayProof, RelayRequest, RelayResponse, RequestHash,
};
use crate::session::{Session, SessionManager};

///
/// Optional parts of a relay call.
///
/// Defaults: no headers, empty method and path, a random session node, and
/// no consensus.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelayOptions {
    pub headers: Option<RelayHeaders>,
    pub method: String,
    pub path: String,
    /// Send to this node instead of a random one. It must belong to the session.
    pub node: Option<Node>,
    /// Return a `ConsensusNode` rather than a plain response.
    pub consensus_enabled: bool,
}

impl RelayOptions {
    pub fn new() -> Self {
        RelayOptions::default()
    }

    pub fn with_headers(mut self, headers: RelayHeaders) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_string();
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.node = Some(node);
        self
    }

    pub fn with_consensus(mut self, consensus_enabled: bool) -> Self {
        self.consensus_enabled = consensus_enabled;
        self
    }
}

/// Result of a successful relay.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome {
    Response(RelayResponse),
    Consensus(ConsensusNode),
}

impl RelayOutcome {
    pub fn relay_response(&self) -> &RelayResponse {
        match self {
            RelayOutcome::Response(response) => response,
            RelayOutcome::Consensus(consensus_node) => &consensus_node.relay_response,
        }
    }
}

///
/// Runs relay attempts end to end: session lookup, node resolution, proof
/// construction and signing, transport, and recovery from stale sessions.
///
pub struct RelayDispatcher {
    configuration: Configuration,
    session_manager: Arc<dyn SessionManager>,
    keybase: Arc<dyn Keybase>,
    transport: Arc<dyn RelayTransport>,
}

impl RelayDispatcher {
    pub fn new(
        configuration: Configuration,
        session_manager: Arc<dyn SessionManager>,
        keybase: Arc<dyn Keybase>,
        transport: Arc<dyn RelayTransport>,
    ) -> Self {
        RelayDispatcher {
            configuration,
            session_manager,
            keybase,
            transport,
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub(crate) fn transport(&self) -> &Arc<dyn RelayTransport> {
        &self.transport
    }

    pub(crate) fn transport_options(&self) -> TransportOptions {
        TransportOptions::from(&self.configuration)
    }

    /// Sends one relay. Successful non-consensus relays register the serving
    /// node as a dispatcher candidate.
    pub async fn send(
        &self,
        data: &str,
        chain: &str,
        aat: &AuthToken,
        options: &RelayOptions,
    ) -> Result<RelayOutcome, RelayError> {
        let (node, response) = self
            .dispatch(data, chain, aat, options, &HashSet::new())
            .await?;

        if options.consensus_enabled {
            return Ok(RelayOutcome::Consensus(ConsensusNode::new(
                node, true, response,
            )));
        }
        self.session_manager.add_new_dispatcher(&node).await;
        Ok(RelayOutcome::Response(response))
    }

    ///
    /// Sends one relay, recovering from stale sessions. Each recovery episode
    /// makes at most `max_session_refresh_retries` refresh attempts; after a
    /// successful refresh the relay is rebuilt from scratch (fresh node, entropy
    /// and proof) against the new session.
    ///
    pub(crate) async fn dispatch(
        &self,
        data: &str,
        chain: &str,
        aat: &AuthToken,
        options: &RelayOptions,
        excluded: &HashSet<String>,
    ) -> Result<(Node, RelayResponse), RelayError> {
        loop {
            let session = self
                .session_manager
                .get_current_session(aat, chain, &self.configuration)
                .await
                .map_err(RelayError::Session)?;

            let (node, result) = self
                .attempt(&session, data, chain, aat, options, excluded)
                .await?;

            let error = match result {
                Ok(response) => return Ok((node, response)),
                Err(error) => error,
            };
            if !error.is_stale_session() {
                event!(
                    Level::WARN,
                    "relay to {} failed: {}",
                    node.service_url,
                    error
                );
                return Err(RelayError::Transport(
                    error.with_node_public_key(&node.public_key),
                ));
            }

            event!(
                Level::INFO,
                "session at height {} reported stale by {}",
                session.session_block_height(),
                node.service_url
            );
            if !self
                .refresh_stale_session(&session, &error, aat, chain)
                .await
            {
                return Err(RelayError::Transport(
                    error.with_node_public_key(&node.public_key),
                ));
            }
        }
    }

    ///
    /// One relay attempt against `session`. Errors returned directly are
    /// local failures; the inner result is what the node answered.
    ///
    async fn attempt(
        &self,
        session: &Session,
        data: &str,
        chain: &str,
        aat: &AuthToken,
        options: &RelayOptions,
        excluded: &HashSet<String>,
    ) -> Result<(Node, Result<RelayResponse, RpcError>), RelayError> {
        let selection = if options.consensus_enabled {
            Selection::Consensus { excluded }
        } else {
            Selection::Single
        };
        let node = resolve_node(
            &mut rand::thread_rng(),
            session,
            &self.configuration,
            selection,
            options.node.as_ref(),
        )?;

        let payload = RelayPayload::new(data, &options.method, &options.path, options.headers.clone());

        //
        // only an unlocked client key can sign the proof
        //
        let client_address = address_from_public_key(&aat.client_public_key)?;
        if !self.keybase.is_unlocked(&client_address).await {
            return Err(RelayError::AccountLocked {
                address: client_address,
            });
        }

        let session_block_height = session.session_block_height();
        let meta = RelayMeta::new(session_block_height);
        let request_hash = RequestHash::new(payload.clone(), meta)?;

        //
        // fresh entropy for every attempt, retries included
        //
        let entropy = generate_entropy();
        let unsigned = proof_bytes(
            entropy,
            session_block_height,
            &node.public_key,
            chain,
            aat,
            &request_hash,
        )?;
        let signature = self
            .keybase
            .sign_with_unlocked_account(&client_address, &unsigned)
            .await
            .map_err(RelayError::Signing)?;

        let proof = RelayProof::new(
            entropy,
            session_block_height,
            &node.public_key,
            chain,
            aat.clone(),
            &hex::encode(signature),
            &request_hash.hash()?,
        )?;
        let request = RelayRequest::new(payload, meta, proof)?;

        event!(
            Level::DEBUG,
            "relaying to {} at session height {}",
            node.service_url,
            session_block_height
        );
        let result = self
            .transport
            .relay(&node, &request, &self.transport_options())
            .await;
        Ok((node, result))
    }

    ///
    /// Discards `stale` and tries to obtain a session at a different height.
    /// The first iteration uses the session embedded in the error when there
    /// is one; the others ask for a new session. Returns whether a refreshed
    /// session is now current.
    ///
    async fn refresh_stale_session(
        &self,
        stale: &Session,
        error: &RpcError,
        aat: &AuthToken,
        chain: &str,
    ) -> bool {
        self.session_manager.destroy_session(aat, chain).await;

        let stale_height = stale.session_block_height();
        for iteration in 0..self.configuration.max_session_refresh_retries {
            let refreshed = match (&error.session, iteration) {
                (Some(hint), 0) => {
                    self.session_manager
                        .update_current_session(hint, aat, chain, &self.configuration)
                        .await
                }
                _ => {
                    self.session_manager
                        .request_new_session(aat, chain, &self.configuration)
                        .await
                }
            };

            match refreshed {
                Ok(session) if session.session_block_height() != stale_height => {
                    event!(
                        Level::INFO,
                        "session refreshed from height {} to {}",
                        stale_height,
                        session.session_block_height()
                    );
                    return true;
                }
                Ok(_) => {
                    event!(
                        Level::DEBUG,
                        "refresh {} returned the same session height {}",
                        iteration + 1,
                        stale_height
                    );
                }
                Err(err) => {
                    event!(Level::WARN, "refresh {} failed: {}", iteration + 1, err);
                }
            }
        }
        event!(
            Level::WARN,
            "could not refresh session for chain {} after {} attempts",
            chain,
            self.configuration.max_session_refresh_retries
        );
        false
    }
}

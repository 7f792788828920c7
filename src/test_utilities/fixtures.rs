use std::sync::Arc;

use crate::aat::{AuthToken, AAT_VERSION};
use crate::configuration::Configuration;
use crate::crypto::generate_entropy;
use crate::dispatcher::RelayDispatcher;
use crate::keybase::InMemoryKeybase;
use crate::keypair::Keypair;
use crate::node::Node;
use crate::relay::proof_builder::proof_bytes;
use crate::relay::{RelayMeta, RelayPayload, RelayProof, RelayRequest, RelayResponse, RequestHash};
use crate::session::{Session, SessionHeader};
use crate::test_utilities::mocks::{MockSessionManager, MockTransport};

pub const TEST_CHAIN: &str = "0022";

/// `count` distinct nodes with deterministic keys, all serving `TEST_CHAIN`.
pub fn make_nodes(count: usize) -> Vec<Node> {
    (0..count)
        .map(|i| {
            Node::new(
                &format!("{:040x}", i + 1),
                &format!("{:064x}", i + 1),
                false,
                &format!("https://node{}.example:443", i),
                vec![TEST_CHAIN.to_string()],
            )
            .unwrap()
        })
        .collect()
}

pub fn make_session(chain: &str, session_block_height: u64, nodes: Vec<Node>) -> Session {
    let header = SessionHeader {
        app_public_key: format!("{:064x}", 0xa99u32),
        chain: chain.to_string(),
        session_block_height,
    };
    Session::new(header, &format!("{:064x}", session_block_height), nodes)
}

/// A token delegating a fresh client key, and that client key.
pub fn make_aat() -> (AuthToken, Keypair) {
    let application = Keypair::new();
    let client = Keypair::new();
    let aat = AuthToken::generate(AAT_VERSION, &client.public_key_hex(), &application).unwrap();
    (aat, client)
}

/// A correctly signed request to the first of `make_nodes`.
pub fn make_relay_request(session_block_height: u64) -> RelayRequest {
    let (aat, client) = make_aat();
    let servicer = make_nodes(1).remove(0);
    let payload = RelayPayload::new("{}", "POST", "/v1/query/height", None);
    let meta = RelayMeta::new(session_block_height);
    let request_hash = RequestHash::new(payload.clone(), meta).unwrap();
    let entropy = generate_entropy();
    let unsigned = proof_bytes(
        entropy,
        session_block_height,
        &servicer.public_key,
        TEST_CHAIN,
        &aat,
        &request_hash,
    )
    .unwrap();
    let proof = RelayProof::new(
        entropy,
        session_block_height,
        &servicer.public_key,
        TEST_CHAIN,
        aat,
        &hex::encode(client.sign(&unsigned).unwrap()),
        &request_hash.hash().unwrap(),
    )
    .unwrap();
    RelayRequest::new(payload, meta, proof).unwrap()
}

pub fn make_relay_response(payload: &str) -> RelayResponse {
    RelayResponse::new("0a0b", payload, make_relay_request(5).proof).unwrap()
}

///
/// A dispatcher wired to spies: a scripted session manager serving one
/// session, a recording transport, and an in-memory keybase holding the
/// client key of `aat`.
///
pub struct TestContext {
    pub configuration: Configuration,
    pub aat: AuthToken,
    pub session: Session,
    pub session_manager: Arc<MockSessionManager>,
    pub transport: Arc<MockTransport>,
    pub keybase: Arc<InMemoryKeybase>,
}

impl TestContext {
    /// Client key imported and unlocked.
    pub async fn new(configuration: Configuration, session: Session) -> TestContext {
        let context = TestContext::locked(configuration, session).await;
        let address = crate::crypto::address_from_public_key(&context.aat.client_public_key).unwrap();
        context.keybase.unlock(&address).await.unwrap();
        context
    }

    /// Client key imported but never unlocked.
    pub async fn locked(configuration: Configuration, session: Session) -> TestContext {
        let (aat, client) = make_aat();
        let keybase = Arc::new(InMemoryKeybase::new());
        keybase.import(client).await.unwrap();
        TestContext {
            configuration,
            aat,
            session_manager: Arc::new(MockSessionManager::new(session.clone())),
            session,
            transport: Arc::new(MockTransport::new()),
            keybase,
        }
    }

    pub fn dispatcher(&self) -> RelayDispatcher {
        RelayDispatcher::new(
            self.configuration.clone(),
            self.session_manager.clone(),
            self.keybase.clone(),
            self.transport.clone(),
        )
    }
}

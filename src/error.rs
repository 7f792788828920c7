use thiserror::Error;

use crate::networking::rpc_error::RpcError;

/// Boxed error used at the collaborator boundary (session manager, keybase)
/// and by the binary.
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;

/// The stage of a relay or consensus call at which it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Construction,
    Session,
    NodeResolution,
    Signing,
    Transport,
    Consensus,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("malformed {0}")]
    Malformed(&'static str),

    #[error("failed to obtain a session: {0}")]
    Session(#[source] Error),

    #[error("provided node is not part of the current session for this application")]
    NodeNotInSession,

    #[error("not enough session nodes for consensus: required {required}, available {available}")]
    InsufficientSessionNodes { required: usize, available: usize },

    #[error("every session node has already been used in this consensus round")]
    NoEligibleNode,

    #[error("client account {address} is not unlocked in the keybase")]
    AccountLocked { address: String },

    #[error("failed to sign relay proof: {0}")]
    Signing(#[source] Error),

    #[error("relay failed: {0}")]
    Transport(RpcError),

    #[error("consensus node count must be greater than zero")]
    ConsensusNodeCountZero,

    #[error("cannot resolve consensus without accept-disputed and without distinguishable majority/minority")]
    ConsensusUnresolved,

    #[error("failed to submit challenge: {0}")]
    Challenge(RpcError),
}

impl RelayError {
    pub fn stage(&self) -> FailureStage {
        match self {
            RelayError::Malformed(_) => FailureStage::Construction,
            RelayError::Session(_) => FailureStage::Session,
            RelayError::NodeNotInSession
            | RelayError::InsufficientSessionNodes { .. }
            | RelayError::NoEligibleNode => FailureStage::NodeResolution,
            RelayError::AccountLocked { .. } | RelayError::Signing(_) => FailureStage::Signing,
            RelayError::Transport(_) => FailureStage::Transport,
            RelayError::ConsensusNodeCountZero
            | RelayError::ConsensusUnresolved
            | RelayError::Challenge(_) => FailureStage::Consensus,
        }
    }

    /// Transport, session and challenge failures depend on network state and may
    /// succeed later. Everything else needs a change on the caller's side.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RelayError::Session(_) | RelayError::Transport(_) | RelayError::Challenge(_)
        )
    }

    pub fn rpc_error(&self) -> Option<&RpcError> {
        match self {
            RelayError::Transport(err) | RelayError::Challenge(err) => Some(err),
            _ => None,
        }
    }
}

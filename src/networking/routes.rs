/// Fixed RPC routes on a service node's base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Relay,
    Challenge,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Relay => "/v1/client/relay",
            Route::Challenge => "/v1/client/challenge",
        }
    }
}

/*!

# Networking Interfaces and Methods

## Introduction

Relays and challenges are submitted to service nodes as JSON over HTTPS. Each
submission targets a fixed route on the node's `service_url`:

```text
POST /v1/client/relay       RelayRequest
POST /v1/client/challenge   ChallengeRequest
```

The `RelayTransport` trait carries these calls so the dispatcher can be driven
by any transport. `HttpTransport` is the reqwest-backed implementation.

## Responses

A successful relay returns

```json
{ "response": "<upstream payload>", "signature": "<servicer signature>" }
```

which the transport pairs with the proof it sent to form a `RelayResponse`.

## Errors

Failed calls return a non-2xx status with

```json
{
  "error": { "code": 60, "codespace": "pocketcore", "message": "..." },
  "dispatch": { "session": { ... } }
}
```

Codes 60 (invalid block height), 75 (out-of-sync request) and 14 (out-of-sync
session) mean the client's session view is outdated. Their `dispatch.session`,
when present, is the session the servicer expects and is used as a fast path
to refresh the client's cache.

Transport failures that never reach a node (timeouts, refused connections,
TLS errors) are reported as an `RpcError` without a code.

*/

pub mod http_transport;
pub mod routes;
pub mod rpc_error;
pub mod transport;

pub use http_transport::HttpTransport;
pub use routes::Route;
pub use rpc_error::RpcError;
pub use transport::{RelayTransport, TransportOptions};

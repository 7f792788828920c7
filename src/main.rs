/*!
# Relay Command Line Interface

## Help

```bash
relay_rust help
```

## Example Usage

```bash
relay_rust relay --session=session.json --aat=aat.json --key=<client secret hex> \
    --chain=0022 --data='{"method":"eth_blockNumber","params":[],"id":1,"jsonrpc":"2.0"}'

relay_rust consensus --config=relay --nodes=3 --session=session.json --aat=aat.json \
    --key=<client secret hex> --chain=0022 --data='{}' --method=POST --path=/v1/query/height
```

The configuration file is optional; `RELAY_*` environment variables override
it (e.g. `RELAY_ACCEPT_DISPUTED_RESPONSES=true`).

## Dev

To run from source:

```bash
cargo run -- --help
```
*/

use std::sync::Arc;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use tracing::{event, Level};

use relay_rust::aat::AuthToken;
use relay_rust::configuration::Configuration;
use relay_rust::consensus::ConsensusOutcome;
use relay_rust::dispatcher::{RelayDispatcher, RelayOptions, RelayOutcome};
use relay_rust::keybase::InMemoryKeybase;
use relay_rust::keypair::Keypair;
use relay_rust::networking::HttpTransport;
use relay_rust::session::{Session, StaticSessionManager};

fn relay_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name("config")
            .short("c")
            .long("config")
            .takes_value(true)
            .default_value("config")
            .help("config file name"),
        Arg::with_name("session")
            .short("s")
            .long("session")
            .takes_value(true)
            .required(true)
            .help("Path to the session JSON"),
        Arg::with_name("aat")
            .short("a")
            .long("aat")
            .takes_value(true)
            .required(true)
            .help("Path to the application authentication token JSON"),
        Arg::with_name("key")
            .short("k")
            .long("key")
            .takes_value(true)
            .required(true)
            .help("Client secret key, hex encoded"),
        Arg::with_name("chain")
            .long("chain")
            .takes_value(true)
            .required(true)
            .help("Relay chain identifier, e.g. 0022"),
        Arg::with_name("data")
            .short("d")
            .long("data")
            .takes_value(true)
            .default_value("")
            .help("Payload forwarded to the chain"),
        Arg::with_name("method")
            .short("m")
            .long("method")
            .takes_value(true)
            .default_value("")
            .help("HTTP method for REST chains"),
        Arg::with_name("path")
            .short("p")
            .long("path")
            .takes_value(true)
            .default_value("")
            .help("HTTP path for REST chains"),
    ]
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> relay_rust::Result<T> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&contents)?)
}

///
/// Builds a dispatcher over the session file, an in-memory keybase holding
/// the unlocked client key and the HTTP transport.
///
async fn build_dispatcher(
    matches: &ArgMatches<'_>,
    configuration: Configuration,
) -> relay_rust::Result<(RelayDispatcher, AuthToken)> {
    let session: Session = read_json(matches.value_of("session").unwrap_or_default()).await?;
    let aat: AuthToken = read_json(matches.value_of("aat").unwrap_or_default()).await?;
    if !aat.is_valid() {
        return Err("application authentication token is malformed".into());
    }

    let client = Keypair::from_secret_hex(matches.value_of("key").unwrap_or_default())?;
    if client.public_key_hex() != aat.client_public_key {
        return Err("client key does not match the token's client public key".into());
    }

    let keybase = InMemoryKeybase::new();
    let address = keybase.import(client).await?;
    keybase.unlock(&address).await?;

    let session_manager =
        StaticSessionManager::new().with_max_dispatchers(configuration.max_dispatchers);
    session_manager.publish(&aat, session).await;

    let dispatcher = RelayDispatcher::new(
        configuration,
        Arc::new(session_manager),
        Arc::new(keybase),
        Arc::new(HttpTransport::new()),
    );
    Ok((dispatcher, aat))
}

fn relay_options(matches: &ArgMatches<'_>) -> RelayOptions {
    RelayOptions::new()
        .with_method(matches.value_of("method").unwrap_or_default())
        .with_path(matches.value_of("path").unwrap_or_default())
}

#[tokio::main]
pub async fn main() -> relay_rust::Result<()> {
    tracing_subscriber::fmt::init();

    //
    // handle command-line arguments
    //
    let matches = App::new("Relay Client")
        .about("Sends relays to the service nodes of a session")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("relay")
                .about("Send a relay to one session node")
                .args(&relay_args()),
        )
        .subcommand(
            SubCommand::with_name("consensus")
                .about("Send a relay to several session nodes and compare their answers")
                .args(&relay_args())
                .arg(
                    Arg::with_name("nodes")
                        .short("n")
                        .long("nodes")
                        .takes_value(true)
                        .help("Number of nodes to query, overrides consensus_node_count"),
                ),
        )
        .get_matches();

    let (name, sub_matches) = match matches.subcommand() {
        (name, Some(sub_matches)) => (name, sub_matches),
        _ => return Err("missing subcommand".into()),
    };

    let mut configuration = Configuration::load(sub_matches.value_of("config").unwrap_or_default())?;
    if let Some(nodes) = sub_matches.value_of("nodes") {
        configuration = configuration.with_consensus_node_count(nodes.parse()?);
    }

    let chain = sub_matches.value_of("chain").unwrap_or_default().to_string();
    let data = sub_matches.value_of("data").unwrap_or_default().to_string();
    let options = relay_options(sub_matches);
    let (dispatcher, aat) = build_dispatcher(sub_matches, configuration).await?;

    let output = match name {
        "relay" => match dispatcher.send(&data, &chain, &aat, &options).await? {
            RelayOutcome::Response(response) => serde_json::to_string_pretty(&response)?,
            RelayOutcome::Consensus(consensus_node) => {
                serde_json::to_string_pretty(&consensus_node)?
            }
        },
        "consensus" => match dispatcher
            .send_consensus_relay(&data, &chain, &aat, &options)
            .await?
        {
            ConsensusOutcome::Verified(aggregate) => serde_json::to_string_pretty(&aggregate)?,
            ConsensusOutcome::Disputed(aggregate) => {
                event!(Level::WARN, "nodes did not agree, returning disputed result");
                serde_json::to_string_pretty(&aggregate)?
            }
            ConsensusOutcome::Challenged(challenge) => serde_json::to_string_pretty(&challenge)?,
        },
        other => return Err(format!("unknown subcommand {}", other).into()),
    };
    println!("{}", output);
    Ok(())
}

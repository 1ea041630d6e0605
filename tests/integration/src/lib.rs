//! Integration tests for Dynaquery.
//!
//! Most tests run the builders end to end against the in-memory store. The
//! tests in `test_endpoint` need a DynamoDB-compatible server at
//! `localhost:4566` and are `#[ignore]`d; run them with:
//! ```text
//! cargo test -p dynaquery-integration -- --ignored
//! ```

use std::sync::{Arc, Once};

use aws_credential_types::Credentials;
use aws_sdk_dynamodb::config::{BehaviorVersion, Region};
use dynaquery_memory::{KeySchema, KeyType, MemoryClient, MemoryStoreConfig};

pub mod fixtures;

use fixtures::{BIG_TABLE, COMPOSITE_TABLE, HASH_TABLE};

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A memory store holding the seeded hash and composite fixture tables.
#[must_use]
pub fn memory_client() -> Arc<MemoryClient> {
    memory_client_with(MemoryStoreConfig::default())
}

/// Like [`memory_client`], with explicit store limits.
#[must_use]
pub fn memory_client_with(config: MemoryStoreConfig) -> Arc<MemoryClient> {
    init_tracing();
    let client = MemoryClient::with_config(config);
    client
        .create_table(HASH_TABLE, KeySchema::hash("id", KeyType::S))
        .unwrap();
    client
        .create_table(
            COMPOSITE_TABLE,
            KeySchema::composite("name", KeyType::S, "powerLevel", KeyType::N),
        )
        .unwrap();
    client
        .create_table(BIG_TABLE, KeySchema::hash("id", KeyType::S))
        .unwrap();
    client.seed(HASH_TABLE, fixtures::hash_seed()).unwrap();
    client
        .seed(COMPOSITE_TABLE, fixtures::composite_seed())
        .unwrap();
    Arc::new(client)
}

/// Fill the big table of `client`. Kept separate because it holds ~48 MB.
pub fn seed_big_table(client: &MemoryClient) {
    client.seed(BIG_TABLE, fixtures::big_seed()).unwrap();
}

/// Endpoint URL for the server.
fn endpoint_url() -> String {
    std::env::var("DYNAMODB_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:4566".to_owned())
}

/// Create a configured DynamoDB client pointing at the local server.
#[must_use]
pub fn dynamodb_client() -> aws_sdk_dynamodb::Client {
    init_tracing();

    let creds = Credentials::new("test", "test", None, None, "integration-test");

    let config = aws_sdk_dynamodb::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(creds)
        .endpoint_url(endpoint_url())
        .build();

    aws_sdk_dynamodb::Client::from_conf(config)
}

/// Generate a unique table name for an endpoint test.
#[must_use]
pub fn test_table_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("{prefix}-{id}")
}

mod test_endpoint;
mod test_find;
mod test_find_many;
mod test_insert;

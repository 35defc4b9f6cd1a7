pub mod audit_repo;
pub mod notification_repo;
pub mod provider_repo;
pub mod repository_error;
pub mod request_repo;
pub mod settings_repo;
pub mod user_repo;

use mongodb::options::{ClientOptions, Credential, ResolverConfig};
use mongodb::{Client, Database};

use crate::config::mongo_conf::MongoConfig;

/// Build a shared database handle from config. Every repository takes the
/// handle instead of owning its own client, so tests can swap the whole
/// persistence layer behind the repository traits.
pub async fn connect(config: &MongoConfig) -> Result<Database, mongodb::error::Error> {
    let mut client_options =
        ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare())
            .await?;
    client_options.app_name = Some("WasitBackend".to_string());
    client_options.max_pool_size = Some(config.pool_size);
    client_options.connect_timeout = Some(std::time::Duration::from_secs(
        config.connection_timeout_secs,
    ));

    if let (Some(ref username), Some(ref password)) = (&config.username, &config.password) {
        client_options.credential = Some(
            Credential::builder()
                .username(username.clone())
                .password(password.clone())
                .build(),
        );
    }

    let client = Client::with_options(client_options)?;
    Ok(client.database(&config.database))
}

mod authority_server;
mod server_config;

pub use authority_server::AuthorityServer;
pub use server_config::ServerConfig;

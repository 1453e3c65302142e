mod server;
pub use server::FestoonServer;

mod server_config;
pub use server_config::ServerConfig;

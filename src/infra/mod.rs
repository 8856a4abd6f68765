pub mod environment;
pub mod http_client;

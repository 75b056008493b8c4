pub mod resolver;

pub use resolver::{build_transport, ProxyConfig, ProxyCredentials, ProxyScheme};

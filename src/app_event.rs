use crate::ssh_config::ConnectionConfig;

#[derive(Debug, Clone)]
pub enum SshEvent {
    Connecting,
    Connected,
    Disconnected,
    Error(String),
}

/// Result of a background `ssh -G` resolution for one host alias.
#[derive(Debug, Clone)]
pub enum ConfigEvent {
    Loaded(String, ConnectionConfig),
    Failed(String, String),
}

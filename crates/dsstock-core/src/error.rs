use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read site registry {path}: {source}")]
    RegistryFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse site registry: {0}")]
    RegistryFileParse(#[from] serde_yaml::Error),

    #[error("site registry validation failed: {0}")]
    Validation(String),
}

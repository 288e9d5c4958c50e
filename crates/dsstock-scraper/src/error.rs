use thiserror::Error;

/// A single retrieval failed. Always recovered by the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}

/// Why an extraction unit (one site, or one model's stock page) produced nothing.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("fetch failed: {0}")]
    Transport(#[from] FetchError),

    #[error("no embedded data payload in {url}")]
    MissingPayload { url: String },

    #[error("embedded data payload in {url} is not valid JSON: {source}")]
    MalformedPayload {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no stock signal found")]
    NoSignal,
}

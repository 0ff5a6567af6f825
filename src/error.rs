use thiserror::Error;

/// Failures surfaced by `MatchInfoService::get_match_info`
#[derive(Debug, Error)]
pub enum MatchInfoError {
    /// Match id was zero or negative; rejected before any I/O
    #[error("match id must be strictly positive (got {0})")]
    InvalidMatchId(i64),

    /// No Steam Web API key configured
    #[error("missing Steam Web API key (set STEAM_API_KEY)")]
    MissingCredential,

    /// Match details call failed or returned something that is not match data
    #[error("no data received from the Steam Web API")]
    NoUpstreamData,

    /// Upstream answered but reported an error for this match
    #[error("message from the Steam Web API:\n{0}")]
    UpstreamError(String),
}

/// Failures of a single upstream JSON request
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unsupported URL scheme in {0}")]
    UnsupportedScheme(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("response body is not JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("invalid channel url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported channel url scheme '{0}', expected ws or wss")]
    UnsupportedScheme(String),
    #[error("invalid channel setting: {0}")]
    InvalidSetting(String),
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

pub type ChannelResult<T> = std::result::Result<T, ChannelError>;

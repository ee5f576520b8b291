use thiserror::Error;

/// Why a weather lookup produced no snapshot.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The location was empty after trimming; no request was sent.
    #[error("location query is blank")]
    BlankQuery,

    /// Network, TLS or timeout failure from the HTTP client.
    #[error("weather provider unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("weather provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The body could not be mapped into a snapshot.
    #[error("malformed weather response: {0}")]
    Malformed(String),
}

/// Why a rate lookup produced no usable quote.
#[derive(Debug, Error)]
pub enum RateError {
    #[error("rate provider unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("rate provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed rate response: {0}")]
    Malformed(String),
}

/// Why an amount could not take the locale-aware formatting path.
#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("'{0}' is not a well-formed ISO 4217 code")]
    InvalidCode(String),

    #[error("no locale data for currency {0}")]
    UnsupportedCurrency(String),

    #[error("amount {0} is not finite")]
    NonFinite(f64),
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

use thiserror::Error;

/// Rejections from the image intake checks. Nothing here is fatal; the
/// candidate is simply cleared and the message shown to the user.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unsupported file type: {0}. Use PNG, JPEG, WEBP or GIF")]
    UnsupportedType(String),

    #[error("image is too large ({0} bytes). The limit is 5 MiB")]
    TooLarge(u64),
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("location unavailable")]
    LocationUnavailable,

    #[error("weather request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("weather provider error ({status}): {body}")]
    Provider {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("weather payload malformed: {0}")]
    Malformed(String),
}

/// Everything that can end an analysis cycle early.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("no image selected")]
    MissingImage,

    #[error("could not fetch weather for the care guide: {0}")]
    Weather(#[from] WeatherError),

    #[error("analysis request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("analysis service error ({status})")]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("could not read the analysis response: {0}")]
    Parse(String),

    // Well-formed answer that declines the image (e.g. not a plant).
    #[error("{0}")]
    Rejected(String),
}

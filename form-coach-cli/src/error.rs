use thiserror::Error;

/// Errors raised while reading a recorded frame stream
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Line {line}: malformed frame record: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Line {line}: frame {frame} has invalid image size {width}x{height}")]
    InvalidImageSize {
        line: usize,
        frame: u64,
        width: f32,
        height: f32,
    },

    #[error("Frame rate must be positive and schedulable, got {0}")]
    InvalidFrameRate(f64),
}

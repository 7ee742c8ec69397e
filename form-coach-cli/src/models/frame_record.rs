use form_coach_engine::Landmark;
use serde::{Deserialize, Serialize};

use crate::error::ReplayError;

/// One recorded estimator frame, as stored in a JSON Lines replay file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame: u64,

    #[serde(default)]
    pub timestamp_ms: Option<u64>,

    /// Image size used to denormalize landmark coordinates
    pub width: f32,
    pub height: f32,

    /// Empty when no body was detected
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
}

impl FrameRecord {
    fn validate(self, line: usize) -> Result<Self, ReplayError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(ReplayError::InvalidImageSize {
                line,
                frame: self.frame,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// Parse a JSON Lines frame stream. Blank lines are skipped; line numbers in
/// errors are 1-based.
pub fn parse_records(contents: &str) -> Result<Vec<FrameRecord>, ReplayError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            let line_no = idx + 1;
            serde_json::from_str::<FrameRecord>(line)
                .map_err(|source| ReplayError::MalformedRecord {
                    line: line_no,
                    source,
                })?
                .validate(line_no)
        })
        .collect()
}

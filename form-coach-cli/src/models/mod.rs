pub mod frame_record;
pub mod session_summary;

pub use frame_record::{parse_records, FrameRecord};
pub use session_summary::SessionSummary;

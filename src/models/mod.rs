pub mod payload;
pub mod record;
pub mod status;
pub mod summary;

pub use payload::ReportPayload;
pub use record::{Annotation, DEFAULT_PROJECT, TestRecord, normalize_duration, record_id};
pub use status::TestStatus;
pub use summary::Summary;

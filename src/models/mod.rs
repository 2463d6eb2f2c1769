pub mod capture;
pub mod processed;

pub use capture::{classify, CaptureFile, ContentRecord, FileCategory};
pub use processed::{ProcessStatus, ProcessedResult};

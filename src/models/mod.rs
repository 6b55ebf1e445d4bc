pub mod lab;

pub use lab::{LabRequest, LabResponse, LabResult, DEFAULT_TEST_TYPES};

// Use cases exposed to callers of the engine
pub mod report_service;

pub use report_service::ReportService;

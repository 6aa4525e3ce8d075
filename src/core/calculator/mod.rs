pub mod timeline;
pub mod timesheet;

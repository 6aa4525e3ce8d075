pub mod employee;
pub mod geofence;
pub mod leave;
pub mod punch;
pub mod review;
pub mod timesheet;

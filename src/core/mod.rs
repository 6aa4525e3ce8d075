pub mod approval;
pub mod calculator;
pub mod clock;
pub mod config;
pub mod geofence;
pub mod leave;
pub mod leave_logic;
pub mod ledger;
pub mod log;
pub mod punch;
pub mod review;
pub mod timesheet;

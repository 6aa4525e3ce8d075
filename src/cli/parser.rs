use crate::export::ExportFormat;
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for rTimeLedger
/// CLI application to track punches, timesheets and leave with SQLite
#[derive(Parser)]
#[command(
    name = "rtimeledger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Employee time and leave ledger: geofenced punches, timesheets, leave and approvals on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Use this configuration file instead of the standard one
    #[arg(global = true, long = "config")]
    pub config: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReviewKind {
    Approve,
    Reject,
    /// Ask the requester for more information
    Info,
    /// Send a rejected or info-requested timesheet day back to review
    Resubmit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum HalfDay {
    Am,
    Pm,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Register and list employees
    Employee {
        #[command(subcommand)]
        action: EmployeeAction,
    },

    /// Record a punch (in, out, break, resume)
    Punch {
        employee: String,

        /// in | out | break | resume (also clock-in, clock-out, break-start, break-end)
        kind: String,

        #[arg(long = "at", help = "Punch instant (YYYY-MM-DD HH:MM), default now")]
        at: Option<String>,

        #[arg(long = "lat", requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long = "lon", requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        #[arg(long = "accuracy", help = "GPS accuracy in meters", default_value_t = 10.0)]
        accuracy: f64,

        #[arg(long = "no-gps", help = "Location permission denied on the device", conflicts_with = "lat")]
        no_gps: bool,

        #[arg(long = "offline", help = "Punch captured while offline and synced later")]
        offline: bool,

        #[arg(long = "captured-at", help = "When the location was sampled (YYYY-MM-DD HH:MM)")]
        captured_at: Option<String>,

        #[arg(long = "site", help = "Site id, overriding the employee's home site")]
        site: Option<String>,

        #[arg(long = "note")]
        note: Option<String>,

        #[arg(long = "force", help = "Record without a usable location (flagged)")]
        force: bool,
    },

    /// Show the current session state of an employee
    Status {
        employee: String,

        #[arg(long = "at", help = "Evaluate at this instant (YYYY-MM-DD HH:MM)")]
        at: Option<String>,
    },

    /// Show the timesheet of one day
    Day {
        employee: String,

        /// YYYY-MM-DD, default today
        date: Option<String>,

        #[arg(long = "json", help = "Print as JSON")]
        json: bool,
    },

    /// Show the timesheet of the week containing a date
    Week {
        employee: String,

        /// Any date of the week (YYYY-MM-DD), default today
        date: Option<String>,

        #[arg(long = "json", help = "Print as JSON")]
        json: bool,
    },

    /// Add a manual work entry
    Entry {
        employee: String,

        date: String,

        #[arg(long = "in", help = "Start time (HH:MM)")]
        start: String,

        #[arg(long = "out", help = "End time (HH:MM)")]
        end: String,

        #[arg(long = "break", help = "Break in minutes", default_value_t = 0)]
        break_minutes: i64,

        #[arg(long = "comment", default_value = "")]
        comment: String,
    },

    /// Close an open session left without clock-out
    Close {
        employee: String,

        /// Work date of the open session (YYYY-MM-DD)
        date: String,

        #[arg(long = "at", help = "Clock-out instant (YYYY-MM-DD HH:MM)")]
        at: String,

        #[arg(long = "note")]
        note: Option<String>,
    },

    /// Leave requests and balances
    Leave {
        #[command(subcommand)]
        action: LeaveAction,
    },

    /// Approve, reject or request info on leave requests and timesheets
    Review {
        #[arg(value_enum)]
        action: ReviewKind,

        #[arg(long = "leave", help = "Leave request id (repeatable)")]
        leave: Vec<i64>,

        #[arg(long = "employee", help = "Employee whose timesheet is reviewed")]
        employee: Option<String>,

        #[arg(long = "day", requires = "employee", help = "Timesheet day YYYY-MM-DD (repeatable)")]
        day: Vec<String>,

        #[arg(long = "week", requires = "employee", help = "Any date of a timesheet week (repeatable)")]
        week: Vec<String>,

        #[arg(long = "note")]
        note: Option<String>,

        #[arg(long = "reviewer", default_value = "manager")]
        reviewer: String,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "op", help = "Only this operation")]
        operation: Option<String>,

        #[arg(long = "target", help = "Only this target")]
        target: Option<String>,
    },

    /// Export day timesheets
    Export {
        employee: String,

        #[arg(long, value_enum)]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "YYYY, YYYY-MM, YYYY-MM-DD or a 'start:end' range")]
        range: String,

        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum EmployeeAction {
    Add {
        id: String,

        #[arg(long = "name")]
        name: String,

        #[arg(long = "team", default_value = "")]
        team: String,

        #[arg(long = "site")]
        site: Option<String>,
    },
    List,
}

#[derive(Subcommand)]
pub enum LeaveAction {
    /// Submit a leave request
    Submit {
        employee: String,

        #[arg(help = "Leave type id (e.g. vacation, sick)")]
        leave_type: String,

        #[arg(long = "from")]
        from: String,

        #[arg(long = "to", help = "Last day (inclusive), default --from")]
        to: Option<String>,

        #[arg(long = "half", value_enum, conflicts_with_all = ["to", "hours"])]
        half: Option<HalfDay>,

        #[arg(long = "hours", help = "HH:MM-HH:MM", conflicts_with = "to")]
        hours: Option<String>,

        #[arg(long = "reason", default_value = "")]
        reason: String,

        #[arg(long = "allow-overdraw", help = "Submit even above the available balance")]
        allow_overdraw: bool,
    },

    /// List leave requests
    List {
        #[arg(long = "employee")]
        employee: Option<String>,

        #[arg(long = "status", help = "pending | approved | rejected | needs_info")]
        status: Option<String>,
    },

    /// Show or set balances
    Balance {
        employee: String,

        #[arg(long = "type", requires = "set")]
        leave_type: Option<String>,

        #[arg(long = "set", requires = "leave_type", help = "New entitlement in days")]
        set: Option<f64>,
    },

    /// Credit monthly accrual
    Accrue {
        employee: String,
        leave_type: String,

        #[arg(long = "months", default_value_t = 1)]
        months: u32,
    },

    /// Year-end carry-over onto a new allowance
    Rollover {
        employee: String,
        leave_type: String,

        #[arg(long = "allowance")]
        allowance: f64,
    },

    /// Send a request back to review after an info request
    Resubmit { id: i64 },

    /// Show teammates' leave overlapping a request
    Conflicts { id: i64 },
}

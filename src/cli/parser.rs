use crate::export::ExportFormat;
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for shiftledger
/// Attendance and timesheet ledger for shift monitors, backed by SQLite
#[derive(Parser)]
#[command(
    name = "shiftledger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Attendance and timesheet ledger for shift monitors and their directors (SQLite)",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Id of the verified caller the command runs as
    #[arg(global = true, long = "as", value_name = "USER_ID")]
    pub as_user: Option<i64>,

    /// Pin "today" (YYYY-MM-DD), for tests
    #[arg(global = true, long = "today", hide = true)]
    pub today: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

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

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "op", help = "Only show one operation (e.g. authorize, adjust)")]
        operation: Option<String>,

        #[arg(long = "last", value_name = "N", help = "Only show the last N rows")]
        last: Option<usize>,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Register and manage users
    #[command(subcommand)]
    User(UserCmd),

    /// Weekly schedule slots
    #[command(subcommand)]
    Schedule(ScheduleCmd),

    /// Daily attendance: listing, marking and director decisions
    #[command(subcommand)]
    Attendance(AttendanceCmd),

    /// Manual hour adjustments (directors)
    #[command(subcommand)]
    Adjust(AdjustCmd),

    /// Typed settings stored in the database (hourly rate, semester weeks...)
    #[command(subcommand)]
    Setting(SettingCmd),

    /// Hours and finance reports
    #[command(subcommand)]
    Report(ReportCmd),
}

#[derive(Subcommand)]
pub enum UserCmd {
    /// Register a new monitor
    Register {
        username: String,
        name: String,
        #[arg(
            long,
            env = "SHIFTLEDGER_PASSWORD",
            hide_env_values = true,
            help = "Password; read from stdin when omitted"
        )]
        password: Option<String>,
    },

    /// Provision a director (the first one needs no --as)
    Director {
        username: String,
        name: String,
        #[arg(
            long,
            env = "SHIFTLEDGER_PASSWORD",
            hide_env_values = true,
            help = "Password; read from stdin when omitted"
        )]
        password: Option<String>,
    },

    /// List users
    List {
        #[arg(long, help = "Filter by role: MONITOR or DIRECTOR")]
        role: Option<String>,
    },

    /// Search monitors by username or name
    Search { query: String },

    /// Show one user
    Show { id: i64 },

    /// Delete a user with all their data
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum ScheduleCmd {
    /// Add one slot
    Add {
        #[arg(long, help = "Monitor id (defaults to the caller)")]
        monitor: Option<i64>,

        #[arg(long, help = "Weekday 0=Mon .. 6=Sun")]
        day: i64,

        #[arg(long, help = "Shift: M=Morning, T=Afternoon")]
        shift: String,

        #[arg(long, help = "Site: SA=San Antonio, BA=Barcelona")]
        site: String,
    },

    /// Add several slots, best effort (WEEKDAY:SHIFT:SITE, e.g. 0:M:SA)
    Bulk {
        #[arg(long)]
        monitor: Option<i64>,

        #[arg(required = true, value_name = "SLOT")]
        slots: Vec<String>,
    },

    /// Replace the whole schedule (WEEKDAY:SHIFT:SITE, e.g. 0:M:SA)
    Replace {
        #[arg(long)]
        monitor: Option<i64>,

        #[arg(required = true, value_name = "SLOT")]
        slots: Vec<String>,
    },

    /// Change one slot
    Edit {
        id: i64,

        #[arg(long)]
        monitor: Option<i64>,

        #[arg(long)]
        day: i64,

        #[arg(long)]
        shift: String,

        #[arg(long)]
        site: String,
    },

    /// Delete one slot
    Del {
        id: i64,

        #[arg(long)]
        monitor: Option<i64>,
    },

    /// List the slots of one monitor
    List {
        #[arg(long)]
        monitor: Option<i64>,
    },

    /// Every monitor's schedule (directors)
    Fleet {
        #[command(flatten)]
        filter: SlotFilterArgs,

        #[arg(long, help = "Weekday 0=Mon .. 6=Sun")]
        day: Option<i64>,

        #[arg(long)]
        monitor: Option<i64>,
    },
}

#[derive(Args, Clone, Default)]
pub struct SlotFilterArgs {
    #[arg(long, help = "Shift: M or T")]
    pub shift: Option<String>,

    #[arg(long, help = "Site: SA or BA")]
    pub site: Option<String>,
}

#[derive(Subcommand)]
pub enum AttendanceCmd {
    /// All blocks of a day, generated on demand (directors)
    Day {
        #[arg(long, help = "Date (YYYY-MM-DD), defaults to today")]
        date: Option<String>,

        #[command(flatten)]
        filter: SlotFilterArgs,

        #[arg(long, help = "pendiente | autorizado | rechazado | recuperado")]
        state: Option<String>,
    },

    /// One monitor's blocks of a day
    Mine {
        #[arg(long)]
        date: Option<String>,

        #[arg(long, help = "Monitor id (directors only, defaults to the caller)")]
        monitor: Option<i64>,
    },

    /// Mark presence for a shift (monitors)
    Mark {
        #[arg(long)]
        date: Option<String>,

        #[arg(long, help = "Shift: M or T")]
        shift: String,
    },

    /// Authorize a block (directors)
    Authorize { id: i64 },

    /// Reject a block (directors)
    Reject { id: i64 },

    /// Recover a missed pending block of a past day (directors)
    Recover { id: i64 },

    /// Show one record
    Show { id: i64 },

    /// Delete one record (directors)
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum AdjustCmd {
    /// Add a signed hour correction
    Add {
        #[arg(long)]
        monitor: i64,

        #[arg(long, allow_hyphen_values = true, help = "Signed hours, e.g. -2.5 or 5")]
        hours: f64,

        #[arg(long)]
        reason: String,

        #[arg(long)]
        date: Option<String>,

        #[arg(long = "record", help = "Linked attendance record id")]
        record: Option<i64>,
    },

    /// List corrections, newest first
    List {
        #[arg(long)]
        monitor: Option<i64>,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,
    },

    /// Show one correction
    Show { id: i64 },

    /// Delete one correction
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum SettingCmd {
    /// List every setting
    List,

    /// Show one setting
    Get { key: String },

    /// Create a setting
    Set {
        key: String,

        #[arg(allow_hyphen_values = true)]
        value: String,

        #[arg(long = "type", default_value = "string", help = "decimal | integer | boolean | string")]
        kind: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Change the value of an existing setting
    Update {
        key: String,

        #[arg(allow_hyphen_values = true)]
        value: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a setting
    Del { key: String },

    /// Create the default hourly rate and semester length when missing
    Init,
}

#[derive(Args, Clone)]
pub struct ExportArgs {
    #[arg(long, value_enum, requires = "file")]
    pub format: Option<ExportFormat>,

    #[arg(long, value_name = "FILE")]
    pub file: Option<String>,

    #[arg(long, short = 'f')]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum ReportCmd {
    /// Hours of one monitor (defaults to the caller)
    Hours {
        #[arg(long)]
        monitor: Option<i64>,

        #[arg(long, short, help = "YYYY, YYYY-MM, YYYY-MM-DD or FROM:TO (default: this month)")]
        period: Option<String>,

        #[command(flatten)]
        filter: SlotFilterArgs,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Hours of every monitor
    Fleet {
        #[arg(long, short)]
        period: Option<String>,

        #[command(flatten)]
        filter: SlotFilterArgs,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Semester projection of one monitor
    Finance {
        #[arg(long)]
        monitor: i64,

        #[arg(long, default_value_t = 0)]
        weeks_worked: i64,

        #[arg(long, help = "Semester length (default: configured)")]
        total_weeks: Option<i64>,

        #[arg(long, short, help = "Also show actual hours for this period")]
        period: Option<String>,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Semester projection of every monitor
    FleetFinance {
        #[arg(long, default_value_t = 0)]
        weeks_worked: i64,

        #[arg(long)]
        total_weeks: Option<i64>,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Executive summary of a period
    Summary {
        #[arg(long, short)]
        period: Option<String>,

        #[arg(long, default_value_t = 0)]
        weeks_worked: i64,

        #[arg(long, help = "Top monitors shown (default: report_limit)")]
        limit: Option<usize>,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Week by week comparison
    Weekly {
        #[arg(long, short)]
        period: Option<String>,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Weekly scheduled hours by site and shift
    Scheduled {
        #[command(flatten)]
        export: ExportArgs,
    },
}

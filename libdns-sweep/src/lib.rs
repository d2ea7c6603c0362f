mod command;
mod dns;
mod ping;
mod prober;
mod table;
mod types;
mod whois;

pub use command::{CommandOutput, CommandRunner, ProbeInvocationError, SystemRunner};
pub use prober::Prober;
pub use table::{assemble, ResultTable, TableError};
pub use types::{CommandPaths, ProbeConfig, ProbeKind, ProbeResult, ScanProfile, NOT_AVAILABLE};

mod finding;
mod package;
mod report;
mod script;

pub use finding::{Remediation, ScriptFinding};
pub use package::Package;
pub use report::{OsInfo, Report, ReportSummary};
pub use script::Script;

use crate::command::{ensure_operand, output_lines, CommandRunner, ProbeInvocationError};
use std::time::Duration;

/// Record type requested from `dig`. `Any` omits the type, leaving the choice to dig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    A,
    Ns,
    Any,
}

pub async fn dig_short(
    runner: &dyn CommandRunner,
    dig: &str,
    record: RecordType,
    domain: &str,
    timeout: Duration,
) -> Result<Vec<String>, ProbeInvocationError> {
    ensure_operand(dig, domain)?;
    let args: Vec<&str> = match record {
        RecordType::A => vec!["+short", "A", domain],
        RecordType::Ns => vec!["+short", "NS", domain],
        RecordType::Any => vec!["+short", domain],
    };

    let output = runner.run(dig, &args, timeout).await?.require_success(dig)?;
    Ok(parse_short(&output.stdout))
}

/// dig writes resolver diagnostics (`;; connection timed out ...`) to stdout even in short mode.
fn parse_short(stdout: &str) -> Vec<String> {
    output_lines(stdout)
        .into_iter()
        .filter(|line| !line.starts_with(';'))
        .collect()
}

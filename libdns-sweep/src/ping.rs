use crate::command::{ensure_operand, CommandRunner};
use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;
use tracing::debug;

lazy_static! {
    // 64 bytes from host.example (93.184.216.34): icmp_seq=1 ttl=56 time=11.6 ms
    static ref NAMED_REPLY: Regex = Regex::new(r"bytes from (\S+) \(([^)\s]+)\):").unwrap();
    // 64 bytes from 93.184.216.34: icmp_seq=1 ttl=56 time=11.6 ms
    static ref NUMERIC_REPLY: Regex = Regex::new(r"bytes from (\S+): ").unwrap();
}

/// Sends a single echo request to `address` and describes the outcome.
///
/// Yields `"<source> (<address>)"` when a reply was seen, where the source is
/// the reverse-resolved name if ping printed one. Everything else, including
/// a failed invocation, yields `"<address> (not reachable)"`.
pub async fn ping_once(
    runner: &dyn CommandRunner,
    ping: &str,
    address: &str,
    timeout: Duration,
) -> String {
    let args = ping_args(address, timeout);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let run = match ensure_operand(ping, address) {
        Ok(()) => runner.run(ping, &args, timeout).await,
        Err(e) => Err(e),
    };
    let source = match run {
        Ok(output) if output.success => reply_source(&output.stdout),
        Ok(output) => {
            debug!(address, code = ?output.code, "no echo reply");
            None
        }
        Err(e) => {
            debug!(address, error = %e, "ping failed");
            None
        }
    };

    match source {
        Some(source) => format!("{} ({})", source, address),
        None => format!("{} (not reachable)", address),
    }
}

/// Arguments for one echo request that waits at most `timeout` for the reply.
///
/// `-W` counts seconds in iputils and milliseconds in the BSD-derived pings.
pub(crate) fn ping_args(address: &str, timeout: Duration) -> Vec<String> {
    let mut args = vec!["-c".to_string(), "1".to_string()];

    if cfg!(target_os = "linux") {
        args.extend(["-W".to_string(), timeout.as_secs().max(1).to_string()]);
    } else if cfg!(any(target_os = "macos", target_os = "freebsd", target_os = "dragonfly")) {
        args.extend(["-W".to_string(), timeout.as_millis().max(1).to_string()]);
    }

    args.push(address.to_string());
    args
}

fn reply_source(stdout: &str) -> Option<String> {
    if let Some(caps) = NAMED_REPLY.captures(stdout) {
        return Some(caps[1].to_string());
    }
    NUMERIC_REPLY
        .captures(stdout)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_wait_is_in_seconds() {
        assert_eq!(
            ping_args("1.2.3.4", Duration::from_secs(10)),
            ["-c", "1", "-W", "10", "1.2.3.4"]
        );
        assert_eq!(
            ping_args("1.2.3.4", Duration::from_millis(300)),
            ["-c", "1", "-W", "1", "1.2.3.4"]
        );
    }

    #[cfg(any(target_os = "macos", target_os = "freebsd", target_os = "dragonfly"))]
    #[test]
    fn bsd_wait_is_in_milliseconds() {
        assert_eq!(
            ping_args("1.2.3.4", Duration::from_secs(10)),
            ["-c", "1", "-W", "10000", "1.2.3.4"]
        );
    }

    #[test]
    fn address_is_the_last_argument() {
        let args = ping_args("2606:2800:220:1::1", Duration::from_secs(5));
        assert_eq!(args.first().map(String::as_str), Some("-c"));
        assert_eq!(args.last().map(String::as_str), Some("2606:2800:220:1::1"));
    }

    #[tokio::test]
    async fn option_like_address_is_not_reachable_without_running_ping() {
        use crate::command::{CommandOutput, ProbeInvocationError};
        use async_trait::async_trait;

        struct Unreachable;

        #[async_trait]
        impl CommandRunner for Unreachable {
            async fn run(
                &self,
                _program: &str,
                _args: &[&str],
                _timeout: Duration,
            ) -> Result<CommandOutput, ProbeInvocationError> {
                panic!("ping must not be spawned for an option-like address");
            }
        }

        let value = ping_once(&Unreachable, "ping", "-f", Duration::from_secs(1)).await;
        assert_eq!(value, "-f (not reachable)");
    }

    #[test]
    fn extracts_reverse_name() {
        let stdout = "PING 93.184.216.34 (93.184.216.34) 56(84) bytes of data.\n\
            64 bytes from edge.example.net (93.184.216.34): icmp_seq=1 ttl=56 time=11.6 ms\n";
        assert_eq!(reply_source(stdout).as_deref(), Some("edge.example.net"));
    }

    #[test]
    fn falls_back_to_numeric_source() {
        let stdout = "PING 1.2.3.4 (1.2.3.4) 56(84) bytes of data.\n\
            64 bytes from 1.2.3.4: icmp_seq=1 ttl=56 time=11.6 ms\n";
        assert_eq!(reply_source(stdout).as_deref(), Some("1.2.3.4"));
    }

    #[test]
    fn ipv6_source_keeps_colons() {
        let stdout = "64 bytes from 2606:2800:220:1::1: icmp_seq=1 ttl=52 time=9.1 ms\n";
        assert_eq!(reply_source(stdout).as_deref(), Some("2606:2800:220:1::1"));
    }

    #[test]
    fn header_alone_is_not_a_reply() {
        let stdout = "PING 1.2.3.4 (1.2.3.4) 56(84) bytes of data.\n\n\
            --- 1.2.3.4 ping statistics ---\n1 packets transmitted, 0 received, 100% packet loss\n";
        assert_eq!(reply_source(stdout), None);
    }
}

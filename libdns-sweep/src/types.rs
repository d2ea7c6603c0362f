use serde::Deserialize;
use std::{collections::BTreeMap, fmt, time::Duration};

/// Sentinel recorded for a WHOIS lookup that yielded no status.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProbeKind {
    A,
    Ns,
    Ping,
    WhoisStatus,
    Dig,
}

impl ProbeKind {
    /// Kinds whose values spread across numbered columns instead of one cell.
    pub fn is_repeated(self) -> bool {
        matches!(self, ProbeKind::Ns | ProbeKind::Dig)
    }

    pub fn column_name(self) -> &'static str {
        match self {
            ProbeKind::A => "A Record",
            ProbeKind::Ns => "NS Record",
            ProbeKind::Ping => "Ping Result",
            ProbeKind::WhoisStatus => "WHOIS Status",
            ProbeKind::Dig => "Dig Result",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanProfile {
    #[default]
    DnsOnly,
    DnsAndPingWhois,
    RawDig,
}

impl ScanProfile {
    /// Enabled probes, in the order their fixed columns appear.
    pub fn probes(self) -> &'static [ProbeKind] {
        match self {
            ScanProfile::DnsOnly => &[ProbeKind::A, ProbeKind::Ns],
            ScanProfile::DnsAndPingWhois => &[
                ProbeKind::A,
                ProbeKind::Ping,
                ProbeKind::WhoisStatus,
                ProbeKind::Ns,
            ],
            ScanProfile::RawDig => &[ProbeKind::Dig],
        }
    }
}

impl fmt::Display for ScanProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanProfile::DnsOnly => "dns_only",
            ScanProfile::DnsAndPingWhois => "dns_and_ping_whois",
            ScanProfile::RawDig => "raw_dig",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResult {
    pub domain: String,
    pub values: BTreeMap<ProbeKind, Vec<String>>,
    pub duration: Duration,
}

impl ProbeResult {
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            ..Self::default()
        }
    }

    /// Values recorded for `kind`; empty when the probe was disabled or failed.
    pub fn get(&self, kind: ProbeKind) -> &[String] {
        self.values.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn insert(&mut self, kind: ProbeKind, values: Vec<String>) {
        self.values.insert(kind, values);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommandPaths {
    pub dig: String,
    pub ping: String,
    pub whois: String,
}

impl Default for CommandPaths {
    fn default() -> Self {
        Self {
            dig: "dig".to_string(),
            ping: "ping".to_string(),
            whois: "whois".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub timeout: Duration,
    pub profile: ScanProfile,
    pub commands: CommandPaths,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            profile: ScanProfile::default(),
            commands: CommandPaths::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_enable_expected_probes() {
        assert_eq!(ScanProfile::DnsOnly.probes(), &[ProbeKind::A, ProbeKind::Ns]);
        assert!(ScanProfile::DnsAndPingWhois.probes().contains(&ProbeKind::Ping));
        assert_eq!(ScanProfile::RawDig.probes(), &[ProbeKind::Dig]);
    }

    #[test]
    fn missing_probe_reads_as_empty() {
        let result = ProbeResult::new("a.example");
        assert!(result.get(ProbeKind::Ns).is_empty());
    }
}

use crate::{
    command::{CommandRunner, SystemRunner},
    dns::{dig_short, RecordType},
    ping::ping_once,
    types::{ProbeConfig, ProbeKind, ProbeResult, NOT_AVAILABLE},
    whois::whois_status,
};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};
use tracing::{info, warn};

pub struct Prober {
    runner: Arc<dyn CommandRunner>,
    config: ProbeConfig,
}

impl Prober {
    pub fn with_config(config: ProbeConfig) -> Self {
        Self::with_runner(config, Arc::new(SystemRunner))
    }

    pub fn with_runner(config: ProbeConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner, config }
    }

    /// Runs every probe in `enabled` against `domain`.
    ///
    /// Probe failures are logged and degrade to empty values or sentinels for
    /// that probe only; this never fails.
    pub async fn run_probes(&self, domain: &str, enabled: &[ProbeKind]) -> ProbeResult {
        let start = Instant::now();
        let mut result = ProbeResult::new(domain);

        let needs_addresses = enabled
            .iter()
            .any(|kind| matches!(kind, ProbeKind::A | ProbeKind::Ping));
        let addresses = if needs_addresses {
            self.dig(RecordType::A, domain).await
        } else {
            Vec::new()
        };

        for &kind in enabled {
            let values = match kind {
                ProbeKind::A => addresses.clone(),
                ProbeKind::Ns => self.dig(RecordType::Ns, domain).await,
                ProbeKind::Dig => self.dig(RecordType::Any, domain).await,
                ProbeKind::Ping => self.ping_all(&addresses).await,
                ProbeKind::WhoisStatus => vec![self.whois(domain).await],
            };
            result.insert(kind, values);
        }

        result.duration = start.elapsed();
        result
    }

    /// Probes `domains` one after another with the configured profile.
    ///
    /// `cancel` is checked between domains only; a probe in flight always
    /// runs to completion or timeout. A domain still being probed when `cancel`
    /// is raised is discarded. Returns the results of completed domains.
    pub async fn scan_all(&self, domains: &[String], cancel: &AtomicBool) -> Vec<ProbeResult> {
        let enabled = self.config.profile.probes();
        let mut results = Vec::with_capacity(domains.len());

        for (index, domain) in domains.iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                warn!(scanned = index, total = domains.len(), "scan cancelled");
                break;
            }

            let result = self.run_probes(domain, enabled).await;
            if cancel.load(Ordering::Relaxed) {
                warn!(
                    domain = %result.domain,
                    scanned = index,
                    total = domains.len(),
                    "scan cancelled, discarding interrupted domain"
                );
                break;
            }
            info!(
                domain = %result.domain,
                index = index + 1,
                total = domains.len(),
                elapsed_ms = result.duration.as_millis() as u64,
                "scanned"
            );
            results.push(result);
        }

        results
    }

    async fn dig(&self, record: RecordType, domain: &str) -> Vec<String> {
        let dig = self.config.commands.dig.as_str();
        match dig_short(self.runner.as_ref(), dig, record, domain, self.config.timeout).await {
            Ok(values) => values,
            Err(e) => {
                warn!(domain, ?record, error = %e, "dig probe failed");
                Vec::new()
            }
        }
    }

    async fn ping_all(&self, addresses: &[String]) -> Vec<String> {
        let ping = self.config.commands.ping.as_str();
        let mut results = Vec::with_capacity(addresses.len());
        for address in addresses {
            results.push(ping_once(self.runner.as_ref(), ping, address, self.config.timeout).await);
        }
        results
    }

    async fn whois(&self, domain: &str) -> String {
        let whois = self.config.commands.whois.as_str();
        match whois_status(self.runner.as_ref(), whois, domain, self.config.timeout).await {
            Ok(status) => status,
            Err(e) => {
                warn!(domain, error = %e, "whois probe failed");
                NOT_AVAILABLE.to_string()
            }
        }
    }
}

//! Heuristic post-mortem for one pre-crash snapshot and the event log
//! entries captured when the crash was noticed.
//!
//! Rules are evaluated in table order and every match is appended. The
//! resulting order is what the activity log and the report show.

use serde::{Deserialize, Serialize};

use super::event_log::EventLogEntry;
use super::snapshot::{GpuVendor, SystemSnapshot};
use crate::core::config::SecurityServiceConfig;

pub const NO_ISSUES: &str = "No obvious issues detected";
pub const NO_RECOMMENDATIONS: &str = "Check full crash report for details";

/// RAM usage strictly above this is reported
pub const HIGH_MEMORY_PERCENT: f32 = 90.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrashAnalysis {
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Default)]
struct Findings {
    issues: Vec<String>,
    recommendations: Vec<String>,
}

impl Findings {
    fn issue(&mut self, text: impl Into<String>) {
        self.issues.push(text.into());
    }

    fn recommend(&mut self, text: impl Into<String>) {
        self.recommendations.push(text.into());
    }
}

type SnapshotRule = fn(&CrashAnalyzer, &SystemSnapshot, &mut Findings);

/// Checks against the snapshot alone, in evaluation order.
const SNAPSHOT_RULES: &[(&str, SnapshotRule)] = &[
    ("hardware-scheduling", hardware_scheduling_rule),
    ("security-service", security_service_rule),
    ("high-memory", high_memory_rule),
];

const VENDOR_TIPS: &[(GpuVendor, &str)] = &[
    (GpuVendor::Amd, "AMD: Disable Anti-Lag, Boost, Enhanced Sync"),
    (GpuVendor::Nvidia, "NVIDIA: Check for shader cache issues"),
];

/// Substring rule applied to each event log message.
#[derive(Debug, Clone)]
struct EventRule {
    name: &'static str,
    /// Only checked when the snapshot's GPU is from this vendor
    vendor: Option<GpuVendor>,
    /// Lowercase substrings; any one is enough
    markers: Vec<String>,
    issue: String,
    recommendation: String,
}

impl EventRule {
    fn matches(&self, message: &str, vendor: GpuVendor) -> bool {
        if self.vendor.is_some_and(|required| required != vendor) {
            return false;
        }
        self.markers.iter().any(|marker| message.contains(marker.as_str()))
    }
}

/// Ordered rule table. Pure: no I/O, no state between calls.
#[derive(Debug, Clone)]
pub struct CrashAnalyzer {
    service_name: String,
    event_rules: Vec<EventRule>,
}

impl Default for CrashAnalyzer {
    fn default() -> Self {
        Self::new(&SecurityServiceConfig::default())
    }
}

impl CrashAnalyzer {
    pub fn new(service: &SecurityServiceConfig) -> Self {
        let name = service.display_name.clone();

        let event_rules = vec![
            EventRule {
                name: "gpu-timeout",
                vendor: None,
                markers: markers(&["tdr", "timeout"]),
                issue: "GPU Timeout (TDR) detected".to_string(),
                recommendation: "Increase TDR timeout in registry".to_string(),
            },
            EventRule {
                name: "amd-driver",
                vendor: Some(GpuVendor::Amd),
                markers: markers(&["amduw", "atikmdag", "amdvlk"]),
                issue: "AMD driver crash detected".to_string(),
                recommendation: "Clean reinstall AMD drivers with DDU".to_string(),
            },
            EventRule {
                name: "nvidia-driver",
                vendor: Some(GpuVendor::Nvidia),
                markers: markers(&["nvlddmkm", "nvidia"]),
                issue: "NVIDIA driver crash detected".to_string(),
                recommendation: "Update/rollback NVIDIA drivers".to_string(),
            },
            EventRule {
                name: "security-service-error",
                vendor: None,
                markers: service.log_markers.iter().map(|m| m.to_lowercase()).collect(),
                issue: format!("{name} error detected"),
                recommendation: format!("Reinstall {name}"),
            },
        ];

        Self {
            service_name: name,
            event_rules,
        }
    }

    pub fn analyze(&self, snapshot: &SystemSnapshot, events: &[EventLogEntry]) -> CrashAnalysis {
        let mut findings = Findings::default();
        let vendor = snapshot.gpu_vendor();

        for (_, rule) in SNAPSHOT_RULES {
            rule(self, snapshot, &mut findings);
        }

        // Duplicates are kept: two matching entries yield two findings.
        for event in events {
            let message = event.message.to_lowercase();
            for rule in self.event_rules.iter().filter(|r| r.matches(&message, vendor)) {
                log::debug!("Rule {} matched event from {}", rule.name, event.source);
                findings.issue(rule.issue.clone());
                findings.recommend(rule.recommendation.clone());
            }
        }

        if let Some((_, tip)) = VENDOR_TIPS.iter().find(|(v, _)| *v == vendor) {
            findings.recommend(*tip);
        }

        CrashAnalysis {
            issues: or_placeholder(findings.issues, NO_ISSUES),
            recommendations: or_placeholder(findings.recommendations, NO_RECOMMENDATIONS),
        }
    }
}

/// Analyze with the default rule table.
pub fn analyze(snapshot: &SystemSnapshot, events: &[EventLogEntry]) -> CrashAnalysis {
    CrashAnalyzer::default().analyze(snapshot, events)
}

fn hardware_scheduling_rule(_: &CrashAnalyzer, snapshot: &SystemSnapshot, out: &mut Findings) {
    if snapshot.hags_enabled != Some(true) {
        return;
    }

    out.issue("HAGS is ENABLED - disable it!");
    out.recommend("Turn off Hardware-Accelerated GPU Scheduling in Windows graphics settings");

    if snapshot.gpu_vendor() == GpuVendor::Amd {
        out.issue("AMD + HAGS = frequent crashes");
    }
}

fn security_service_rule(analyzer: &CrashAnalyzer, snapshot: &SystemSnapshot, out: &mut Findings) {
    if snapshot.security_running() {
        return;
    }

    out.issue(format!("{} was NOT running", analyzer.service_name));
    out.recommend(format!("Game needs {} to run", analyzer.service_name));
}

fn high_memory_rule(_: &CrashAnalyzer, snapshot: &SystemSnapshot, out: &mut Findings) {
    let percent = snapshot.memory.percent;
    if percent <= HIGH_MEMORY_PERCENT {
        return;
    }

    out.issue(format!("High RAM usage: {percent:.0}%"));
    out.recommend("Close background apps or add more RAM");
}

fn markers(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|m| m.to_string()).collect()
}

fn or_placeholder(items: Vec<String>, placeholder: &str) -> Vec<String> {
    if items.is_empty() {
        vec![placeholder.to_string()]
    } else {
        items
    }
}

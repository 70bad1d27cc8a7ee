use crashwatch::core::config::SecurityServiceConfig;
use crashwatch::core::crash_monitor::{analyze, CrashAnalyzer, GpuInfo, GpuVendor};

use super::support::{entry, snapshot};

#[test]
fn test_clean_nvidia_snapshot_gets_placeholder_issue_and_vendor_tip() {
    let mut snap = snapshot(true);
    snap.gpu_info = Some(GpuInfo {
        name: "NVIDIA GeForce RTX 4080".to_string(),
        driver_version: None,
        vendor: GpuVendor::Nvidia,
    });

    let analysis = analyze(&snap, &[]);
    assert_eq!(analysis.issues, vec!["No obvious issues detected"]);
    assert_eq!(
        analysis.recommendations,
        vec!["NVIDIA: Check for shader cache issues"]
    );
}

#[test]
fn test_unknown_vendor_without_findings_gets_both_placeholders() {
    let mut snap = snapshot(true);
    snap.gpu_info = None;

    let analysis = analyze(&snap, &[]);
    assert_eq!(analysis.issues, vec!["No obvious issues detected"]);
    assert_eq!(
        analysis.recommendations,
        vec!["Check full crash report for details"]
    );
}

#[test]
fn test_amd_with_hags_and_driver_crash() {
    let mut snap = snapshot(true);
    snap.hags_enabled = Some(true);
    let events = [entry("Display", "Display driver amduw23g stopped responding")];

    let analysis = analyze(&snap, &events);
    assert!(analysis.issues.contains(&"HAGS is ENABLED - disable it!".to_string()));
    assert!(analysis.issues.contains(&"AMD + HAGS = frequent crashes".to_string()));
    assert!(analysis.issues.contains(&"AMD driver crash detected".to_string()));
    assert!(analysis
        .recommendations
        .contains(&"Clean reinstall AMD drivers with DDU".to_string()));
    assert_eq!(
        analysis.recommendations.last().map(String::as_str),
        Some("AMD: Disable Anti-Lag, Boost, Enhanced Sync")
    );
}

#[test]
fn test_missing_security_service_uses_configured_name() {
    let service = SecurityServiceConfig {
        display_name: "Guard".to_string(),
        ..Default::default()
    };
    let mut snap = snapshot(true);
    snap.security_process = None;

    let analysis = CrashAnalyzer::new(&service).analyze(&snap, &[]);
    assert!(analysis.issues.contains(&"Guard was NOT running".to_string()));
    assert!(analysis
        .recommendations
        .contains(&"Game needs Guard to run".to_string()));
}

#[test]
fn test_matching_entries_each_add_a_finding() {
    let snap = snapshot(true);
    let events = [
        entry("Display", "TDR recovery"),
        entry("Display", "Video timeout"),
    ];

    let analysis = analyze(&snap, &events);
    let tdr = analysis
        .issues
        .iter()
        .filter(|i| *i == "GPU Timeout (TDR) detected")
        .count();
    assert_eq!(tdr, 2);
}

#[test]
fn test_high_memory_threshold_is_strict() {
    let mut snap = snapshot(true);
    snap.memory.percent = 90.0;
    assert!(!analyze(&snap, &[])
        .issues
        .iter()
        .any(|i| i.starts_with("High RAM usage")));

    snap.memory.percent = 93.4;
    assert!(analyze(&snap, &[])
        .issues
        .contains(&"High RAM usage: 93%".to_string()));
}

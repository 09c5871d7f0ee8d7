use watchdesk_core::{Health, LatestScan, StatusTone, Watch, WatchId};

fn scan(changes: bool, level: Option<&str>) -> LatestScan {
    LatestScan {
        id: WatchId::from(90),
        changes,
        change_level: level.map(ToOwned::to_owned),
        change_summary: None,
        current_summary: None,
        scan_date: "2024-03-01T10:00:00Z".to_string(),
        additions: vec!["added line".to_string()],
        deletions: Vec::new(),
        modifications: Vec::new(),
    }
}

fn watch(status: &str, latest_scan: Option<LatestScan>) -> Watch {
    Watch {
        id: WatchId::from(1),
        title: "Example".to_string(),
        desc: String::new(),
        url: "https://example.com".to_string(),
        status: status.to_string(),
        created_date: "2024-03-01T09:00:00Z".to_string(),
        latest_scan,
    }
}

#[test]
fn health_follows_change_level() {
    assert_eq!(Health::of(&watch("active", None)), Health::NoScan);
    assert_eq!(Health::of(&watch("active", Some(scan(false, Some("major"))))), Health::Stable);
    assert_eq!(Health::of(&watch("active", Some(scan(true, Some("HIGH"))))), Health::Major);
    assert_eq!(Health::of(&watch("active", Some(scan(true, Some("major"))))), Health::Major);
    assert_eq!(Health::of(&watch("active", Some(scan(true, Some("Medium"))))), Health::Moderate);
    assert_eq!(Health::of(&watch("active", Some(scan(true, Some("moderate"))))), Health::Moderate);
    assert_eq!(Health::of(&watch("active", Some(scan(true, Some("low"))))), Health::Minor);
    assert_eq!(Health::of(&watch("active", Some(scan(true, None)))), Health::Minor);
}

#[test]
fn health_ignores_everything_but_latest_scan() {
    let latest = Some(scan(true, Some("moderate")));
    let mut other = watch("error", latest.clone());
    other.title = "Something else".to_string();
    other.url = "https://other.example.org/path".to_string();
    other.created_date = "garbage".to_string();

    assert_eq!(Health::of(&watch("active", latest)), Health::of(&other));
}

#[test]
fn unchanged_scan_reports_no_effective_changes() {
    let stable = scan(false, None);
    assert!(stable.effective_changes().is_empty());
    assert_eq!(scan(true, None).effective_changes().additions.len(), 1);
}

#[test]
fn descriptions_prefer_change_summary() {
    let mut latest = scan(true, Some("major"));
    assert_eq!(Health::Major.describe(Some(&latest)), "Major changes detected");
    latest.change_summary = Some("Prices dropped".to_string());
    assert_eq!(Health::Major.describe(Some(&latest)), "Prices dropped");
    assert_eq!(Health::NoScan.describe(None), "No scans available yet");
}

#[test]
fn status_tones() {
    assert_eq!(StatusTone::for_status("active"), StatusTone::Default);
    assert_eq!(StatusTone::for_status("paused"), StatusTone::Secondary);
    assert_eq!(StatusTone::for_status("error"), StatusTone::Destructive);
    assert_eq!(StatusTone::for_status("Healthy"), StatusTone::Outline);
}

use cadence_scheduler::core::compute::compute_next_run_at;
use cadence_scheduler::core::cron::is_valid_cron_string;
use cadence_scheduler::core::model::JobSnapshot;
use cadence_scheduler::core::timezone::is_valid_timezone;
use chrono::Utc;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    assert!(is_valid_cron_string("0 0 * * *"));
    assert!(is_valid_timezone("America/New_York"));

    let now = Utc::now().timestamp_millis();

    let nightly = JobSnapshot {
        repeat_interval: Some("0 0 * * *".to_owned()),
        timezone: Some("America/New_York".to_owned()),
        last_run_at: Some(now),
        previous_next_run_at: Some(now),
        ..JobSnapshot::new("nightly-report", "job-1")
    };
    println!("nightly  -> {:?}", compute_next_run_at(&nightly).next_run_at);

    let polling = JobSnapshot {
        repeat_interval: Some("2 hours".to_owned()),
        last_run_at: Some(now),
        previous_next_run_at: Some(now),
        ..JobSnapshot::new("poll-feed", "job-2")
    };
    println!("polling  -> {:?}", compute_next_run_at(&polling).next_run_at);

    let bounded = JobSnapshot {
        repeat_interval: Some("FREQ=DAILY;COUNT=5".to_owned()),
        last_run_at: Some(now),
        start_runs_at: Some(now),
        ..JobSnapshot::new("drip-campaign", "job-3")
    };
    let out = compute_next_run_at(&bounded);
    println!("bounded  -> {:?} (no more after {:?})", out.next_run_at, out.no_more_at);

    let afternoon = JobSnapshot {
        repeat_at: Some("3:00pm".to_owned()),
        ..JobSnapshot::new("afternoon-digest", "job-4")
    };
    println!("repeat-at -> {:?}", compute_next_run_at(&afternoon).next_run_at);

    let broken = JobSnapshot {
        repeat_interval: Some("every so often".to_owned()),
        last_run_at: Some(now),
        ..JobSnapshot::new("broken", "job-5")
    };
    let out = compute_next_run_at(&broken);
    println!("broken   -> {:?}", out.failure_reason());
}

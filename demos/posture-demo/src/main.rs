//! Stance Posture Demo
//!
//! Runs one scripted monitoring session against a synthetic detector:
//! - calibration on an upright pose
//! - phases of good, uneven, slouched and head-tilted posture
//! - notifications printed as they arrive
//! - statistics kept in a JSON file across runs
//!
//! Usage: `posture-demo [stats.json]`. Ctrl-C stops the session early.

use std::sync::Arc;
use std::time::Duration;

use stance_core::{MonitorConfig, SensitivityLevel};
use stance_runtime::{init_tracing, ChannelNotifier, JsonFileStatsStore, LogFormat, Monitor};
use stance_test::{
    head_tilted, slouched, uneven_shoulders, upright, DetectorResponse, SyntheticDetector,
};
use tracing::{info, warn};

const PHASE: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(LogFormat::Pretty);

    let stats_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "posture-stats.json".to_string());

    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║           Stance Demo - Scripted Posture Session           ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!("Statistics file: {}", stats_path);
    println!();

    let detector = Arc::new(SyntheticDetector::steady(upright()).with_jitter(1.5, 42));
    let (notifier, mut notifications) = ChannelNotifier::new();

    let config = MonitorConfig {
        sensitivity: SensitivityLevel::Medium,
        calibration_delay: Duration::from_millis(500),
        ..MonitorConfig::default()
    };

    let monitor = Monitor::builder(Arc::clone(&detector))
        .config(config)
        .notifier(notifier)
        .store(JsonFileStatsStore::new(&stats_path))
        .build();

    tokio::spawn(async move {
        while let Some(notification) = notifications.recv().await {
            println!("[{:?}] {}", notification.kind, notification.message);
        }
    });

    monitor.calibrate().await?;
    monitor.start()?;

    let phases = [
        ("upright", upright()),
        ("uneven shoulders", uneven_shoulders(14.0)),
        ("upright", upright()),
        ("slouching", slouched(35.0)),
        ("head tilted", head_tilted(25.0)),
        ("upright", upright()),
    ];

    let mut updates = monitor.subscribe();
    let script = async {
        for (name, pose) in phases {
            info!(phase = name, duration = ?PHASE, "phase started");
            detector.set_fallback(DetectorResponse::Pose(pose));
            tokio::time::sleep(PHASE).await;

            let snapshot = updates.borrow_and_update().clone();
            println!(
                "score {:>3}  status {:?}  ratio {:>3}%  | {}",
                snapshot.score, snapshot.status, snapshot.posture_ratio, snapshot.feedback
            );
        }
    };

    tokio::select! {
        _ = script => {}
        _ = tokio::signal::ctrl_c() => warn!("interrupted, stopping early"),
    }

    let closed = monitor.stop()?;
    let snapshot = monitor.snapshot();
    let counters = &snapshot.counters;
    info!(
        sessions = snapshot.sessions_count,
        ratio = snapshot.posture_ratio,
        "demo session closed"
    );

    // let the printer drain
    tokio::time::sleep(Duration::from_millis(50)).await;

    println!();
    println!(
        "Session: good {:.1}s, bad {:.1}s, ratio {}%",
        closed.good_time,
        closed.bad_time,
        closed.posture_ratio()
    );
    println!(
        "All time: {} sessions, ratio {}%",
        snapshot.sessions_count, snapshot.posture_ratio
    );
    println!(
        "Ticks: {} total, {} assessed, {} low confidence, {} alerts",
        counters.ticks, counters.assessed, counters.low_confidence, counters.alerts
    );

    Ok(())
}

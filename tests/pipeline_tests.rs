//! Training pipeline, observers and pacing

use std::{
    io::{BufRead, BufReader},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use intruder::{
    Result,
    pipeline::{
        Cadence, JsonlObserver, MetricsObserver, Observer, TickScheduler, TrainingConfig,
        TrainingPipeline, TrainingResult, compare_motion,
    },
    trainer::{Scoreboard, TickRecord, Trainer},
};
use tempfile::tempdir;

mod common;

/// Records the order of observer callbacks
struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl Observer for EventLog {
    fn on_run_start(&mut self, total_ticks: u64) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(format!("start:{total_ticks}"));
        Ok(())
    }

    fn on_tick(&mut self, record: &TickRecord) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(format!("tick:{}", record.tick));
        Ok(())
    }

    fn on_run_end(&mut self, scoreboard: &Scoreboard) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(format!("end:{}", scoreboard.total()));
        Ok(())
    }
}

#[test]
fn test_observer_event_sequence() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut trainer = Trainer::new(&common::small_config(6, 6, 1)).unwrap();
    let mut pipeline = TrainingPipeline::new(TrainingConfig { ticks: 3 }).with_observer(Box::new(
        EventLog {
            events: Arc::clone(&events),
        },
    ));

    pipeline.run(&mut trainer).unwrap();

    assert_eq!(
        *events.lock().unwrap(),
        vec!["start:3", "tick:0", "tick:1", "tick:2", "end:3"]
    );
}

#[test]
fn test_jsonl_observer_writes_one_line_per_tick() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("ticks.jsonl");
    let mut trainer = Trainer::new(&common::small_config(8, 8, 2)).unwrap();

    TrainingPipeline::new(TrainingConfig { ticks: 25 })
        .with_observer(Box::new(JsonlObserver::new(&path).unwrap()))
        .run(&mut trainer)
        .unwrap();

    let file = std::fs::File::open(&path).unwrap();
    let lines: Vec<String> = BufReader::new(file).lines().map(|l| l.unwrap()).collect();
    assert_eq!(lines.len(), 25);
    for (tick, line) in lines.iter().enumerate() {
        let record: TickRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.tick, tick as u64);
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["state"].as_str().unwrap().len(), 9);
    }
}

#[test]
fn test_metrics_observer_builds_reward_curve() {
    let mut trainer = Trainer::new(&common::small_config(10, 10, 3)).unwrap();
    let observer = MetricsObserver::new(40);
    let metrics = observer.handle();

    let result = TrainingPipeline::new(TrainingConfig { ticks: 100 })
        .with_observer(Box::new(observer))
        .run(&mut trainer)
        .unwrap();

    let metrics = metrics.lock().unwrap();
    let ticks: Vec<u64> = metrics.reward_curve.iter().map(|p| p.tick).collect();
    assert_eq!(ticks, vec![40, 80, 100]);
    assert_eq!(metrics.scoreboard.total(), 100);
    assert_eq!(metrics.explored + metrics.exploited, 100);
    assert!((metrics.scoreboard.mean_reward() - result.mean_reward).abs() < 1e-12);
}

#[test]
fn test_reward_curve_counts_ticks_per_run() {
    let mut trainer = Trainer::new(&common::small_config(10, 10, 3)).unwrap();
    TrainingPipeline::new(TrainingConfig { ticks: 20 })
        .run(&mut trainer)
        .unwrap();

    let observer = MetricsObserver::new(40);
    let metrics = observer.handle();
    TrainingPipeline::new(TrainingConfig { ticks: 30 })
        .with_observer(Box::new(observer))
        .run(&mut trainer)
        .unwrap();

    let metrics = metrics.lock().unwrap();
    let ticks: Vec<u64> = metrics.reward_curve.iter().map(|p| p.tick).collect();
    assert_eq!(ticks, vec![30]);
    assert_eq!(metrics.scoreboard.total(), 30);
    assert_eq!(trainer.time(), 50);
}

#[test]
fn test_metrics_observer_restarts_windows_on_each_run() {
    let mut trainer = Trainer::new(&common::small_config(10, 10, 8)).unwrap();
    let mut observer = MetricsObserver::new(10);
    let metrics = observer.handle();

    observer.on_run_start(15).unwrap();
    for _ in 0..15 {
        observer.on_tick(&trainer.step().unwrap()).unwrap();
    }
    observer.on_run_end(&Scoreboard::default()).unwrap();

    observer.on_run_start(12).unwrap();
    for _ in 0..12 {
        observer.on_tick(&trainer.step().unwrap()).unwrap();
    }
    observer.on_run_end(&Scoreboard::default()).unwrap();

    let ticks: Vec<u64> = metrics
        .lock()
        .unwrap()
        .reward_curve
        .iter()
        .map(|p| p.tick)
        .collect();
    assert_eq!(ticks, vec![10, 15, 10, 12]);
}

#[test]
fn test_training_result_json_round_trip() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("result.json");
    let mut trainer = Trainer::new(&common::small_config(6, 6, 4)).unwrap();
    let result = TrainingPipeline::new(TrainingConfig { ticks: 30 })
        .run(&mut trainer)
        .unwrap();

    result.save(&path).unwrap();
    assert_eq!(TrainingResult::load(&path).unwrap(), result);
}

#[test]
fn test_comparison_shares_the_world() {
    let comparison = compare_motion(&common::small_config(10, 10, 6), 50).unwrap();
    assert_eq!(comparison.learned.total_ticks, 50);
    assert_eq!(comparison.baseline.total_ticks, 50);
    let learned = Trainer::new(&common::small_config(10, 10, 6)).unwrap();
    let baseline = Trainer::new(
        &common::small_config(10, 10, 6).with_motion(intruder::app::MotionMode::Baseline),
    )
    .unwrap();
    assert_eq!(learned.world().to_string(), baseline.world().to_string());
}

#[test]
fn test_cadence_switch_cancels_pending_tick() {
    let mut scheduler = TickScheduler::new(Cadence::Slow);
    let start = Instant::now();
    scheduler.arm_at(start);

    assert!(scheduler.set_cadence(Cadence::Fast));
    assert!(scheduler.pending().is_none());
    assert!(!scheduler.poll_at(start + Duration::from_secs(1)));

    let deadline = scheduler.arm_at(start);
    assert_eq!(deadline - start, Duration::from_millis(20));
}

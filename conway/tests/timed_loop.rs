use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use conway::{Controller, LifeConfig, RunState, StrategyKind, TokioScheduler};

fn timed_controller(wakes: &Arc<AtomicUsize>) -> Controller<TokioScheduler> {
    let counter = Arc::clone(wakes);
    let scheduler = TokioScheduler::new()
        .expect("runtime")
        .with_waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    let cfg = LifeConfig {
        width: 24,
        height: 16,
        fps: 10,
        strategy: StrategyKind::Full,
        seed: Some(42),
        ..LifeConfig::default()
    };
    Controller::new(&cfg, scheduler).expect("valid config")
}

fn wait_for_wakes(wakes: &AtomicUsize, count: usize) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while wakes.load(Ordering::SeqCst) < count && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(2));
    }
    assert!(wakes.load(Ordering::SeqCst) >= count, "timer never fired");
}

#[test]
fn step_runs_once_its_delay_elapses() {
    let wakes = Arc::new(AtomicUsize::new(0));
    let mut life = timed_controller(&wakes);
    life.start();
    assert_eq!(life.engine().generation(), 1);
    assert_eq!(life.on_frame(), 0);

    wait_for_wakes(&wakes, 1);
    assert_eq!(life.on_frame(), 1);
    assert_eq!(life.engine().generation(), 2);
    life.stop();
}

#[test]
fn stop_during_the_delay_abandons_the_step() {
    let wakes = Arc::new(AtomicUsize::new(0));
    let mut life = timed_controller(&wakes);
    life.start();
    life.stop();
    let board = life.board().clone();

    // The timer still fires; the step it hands back must not run.
    wait_for_wakes(&wakes, 1);
    assert_eq!(life.on_frame(), 0);
    assert_eq!(life.run_state(), RunState::Idle);
    assert_eq!(life.engine().generation(), 1);
    assert_eq!(life.board(), &board);
}

#[test]
fn restart_during_the_delay_ignores_the_old_session() {
    let wakes = Arc::new(AtomicUsize::new(0));
    let mut life = timed_controller(&wakes);
    life.start();
    life.stop();
    life.start();
    assert_eq!(life.engine().generation(), 2);

    // Both timers fire; only the current session's step advances the board.
    wait_for_wakes(&wakes, 2);
    assert_eq!(life.on_frame(), 1);
    assert_eq!(life.engine().generation(), 3);
    life.stop();
}

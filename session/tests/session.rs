use std::time::Duration;

use grid_chase_core::{
    AdversarySpawn, CellCoord, Direction, Event, Layout, LevelConfig, Outcome, SessionStatus,
    SetupError,
};
use grid_chase_session::{Message, Session, SessionConfig, SessionError};
use grid_chase_system_input::keycode;

fn slow_config(grid_size: u32) -> SessionConfig {
    SessionConfig {
        grid_size,
        refresh_rate: Duration::from_secs(3600),
        ..SessionConfig::default()
    }
}

fn fast_config(grid_size: u32) -> SessionConfig {
    SessionConfig {
        grid_size,
        refresh_rate: Duration::from_millis(2),
        ..SessionConfig::default()
    }
}

fn corridor() -> Layout {
    let mut layout = Layout::with_player(CellCoord::new(1, 5), Direction::Right);
    layout.food.push(CellCoord::new(2, 5));
    layout
}

/// Player at (1, 1) whose only neighbouring adversary can step nowhere else.
fn trap() -> Layout {
    let mut layout = Layout::with_player(CellCoord::new(1, 1), Direction::Up);
    layout.adversaries.push(AdversarySpawn {
        cell: CellCoord::new(2, 1),
        facing: Direction::Left,
    });
    layout.walls.extend([
        CellCoord::new(2, 0),
        CellCoord::new(3, 1),
        CellCoord::new(2, 2),
    ]);
    layout
}

#[test]
fn invalid_configuration_is_rejected() {
    let config = SessionConfig {
        refresh_rate: Duration::ZERO,
        ..SessionConfig::default()
    };
    assert!(matches!(
        Session::new(config),
        Err(SessionError::Setup(SetupError::InvalidConfiguration(_)))
    ));
}

#[test]
fn unsatisfiable_level_is_rejected() {
    let config = SessionConfig {
        grid_size: 2,
        ..SessionConfig::default()
    };
    assert!(matches!(
        Session::new(config),
        Err(SessionError::Setup(SetupError::UnsatisfiableLayout { .. }))
    ));
}

#[test]
fn equal_seeds_generate_equal_sessions() {
    let first = Session::new(SessionConfig::default()).expect("session");
    let second = Session::new(SessionConfig::default()).expect("session");
    assert_eq!(first.frame(), second.frame());
    assert_eq!(first.status(), SessionStatus::NotStarted);
}

#[test]
fn ticks_before_start_do_nothing() {
    let mut session = Session::from_layout(slow_config(10), &corridor()).expect("session");
    assert!(session.tick().is_empty());
    assert_eq!(session.frame().player.cell, CellCoord::new(1, 5));
}

#[test]
fn manual_ticks_follow_the_latest_input() {
    let mut session = Session::from_layout(slow_config(10), &corridor()).expect("session");
    let started = session.start().expect("clock spawns");
    assert_eq!(
        started,
        vec![Event::StatusChanged {
            from: SessionStatus::NotStarted,
            to: SessionStatus::Running,
        }]
    );

    let _ = session.tick();
    assert_eq!(session.frame().score, 1);
    assert_eq!(session.frame().player.cell, CellCoord::new(2, 5));

    assert!(session.process(Message::Input(keycode::ARROW_UP)).is_empty());
    assert!(session.process(Message::Input(keycode::KEY_S)).is_empty());
    let _ = session.process(Message::Tick);
    assert_eq!(session.frame().player.cell, CellCoord::new(2, 6));
    assert_eq!(session.frame().player.facing, Direction::Down);

    session.stop();
}

#[test]
fn paused_sessions_hold_still() {
    let mut session = Session::from_layout(slow_config(10), &corridor()).expect("session");
    let _ = session.start().expect("clock spawns");

    let _ = session.process(Message::Pause);
    assert_eq!(session.status(), SessionStatus::Paused);
    assert!(session.process(Message::Tick).is_empty());
    assert_eq!(session.frame().tick, 0);

    let _ = session.process(Message::Resume);
    assert_eq!(session.status(), SessionStatus::Running);
    let _ = session.process(Message::Tick);
    assert_eq!(session.frame().tick, 1);
}

#[test]
fn run_returns_once_the_player_is_caught() {
    let mut session = Session::from_layout(fast_config(5), &trap()).expect("session");
    let _ = session.start().expect("clock spawns");

    let mut finished = Vec::new();
    session
        .run(|frame, events| {
            for event in events {
                if let Event::SessionFinished { outcome, .. } = event {
                    finished.push((frame.tick, *outcome));
                }
            }
        })
        .expect("loop exits cleanly");

    assert_eq!(session.status(), SessionStatus::Finished);
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].0, 1);
    assert!(matches!(finished[0].1, Outcome::Caught { .. }));
}

#[test]
fn handle_stops_the_loop() {
    let layout = Layout::with_player(CellCoord::new(1, 1), Direction::Up);
    let mut session = Session::from_layout(fast_config(6), &layout).expect("session");
    let handle = session.handle();
    let _ = session.start().expect("clock spawns");

    let mut frames = 0;
    session
        .run(|frame, _| {
            frames += 1;
            if frame.tick == 3 {
                handle.stop().expect("session is listening");
            }
        })
        .expect("loop exits cleanly");

    assert!(frames >= 3);
    assert_eq!(session.status(), SessionStatus::Running);
}

#[test]
fn inputs_sent_through_the_handle_steer_the_player() {
    let layout = Layout::with_player(CellCoord::new(2, 2), Direction::Up);
    let mut session = Session::from_layout(fast_config(8), &layout).expect("session");
    let handle = session.handle();
    handle.send_input(keycode::ARROW_RIGHT).expect("queued");
    let _ = session.start().expect("clock spawns");

    session
        .run(|frame, _| {
            if frame.tick == 2 {
                handle.stop().expect("session is listening");
            }
        })
        .expect("loop exits cleanly");

    let frame = session.frame();
    assert_eq!(frame.player.facing, Direction::Right);
    assert_eq!(frame.player.cell.row(), 2);
    assert!(frame.player.cell.column() >= 4);
}

#[test]
fn run_without_a_clock_returns_immediately() {
    let mut session = Session::from_layout(slow_config(10), &corridor()).expect("session");
    let mut called = false;
    session.run(|_, _| called = true).expect("nothing to run");
    assert!(!called);
}

#[test]
fn default_level_counts_reach_the_world() {
    let config = SessionConfig {
        level: LevelConfig {
            adversaries: 1,
            energizers: 0,
            food: Some(2),
        },
        ..slow_config(9)
    };
    let session = Session::new(config).expect("session");
    let frame = session.frame();
    assert_eq!(frame.adversaries.len(), 1);
    assert_eq!(
        frame
            .cells
            .iter()
            .filter(|kind| **kind == grid_chase_core::EntityKind::Food)
            .count(),
        2
    );
}

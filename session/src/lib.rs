#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session controller that drives a Grid Chase world in real time.
//!
//! A [`Session`] owns the world, the seeded random source and the input
//! handler. Clock ticks and raw key codes reach it as [`Message`] values on a
//! single channel, so every mutation happens on the thread that calls
//! [`Session::run`] and inputs received between two ticks collapse to the
//! latest one.

mod clock;
mod config;

use std::sync::mpsc::{self, Receiver, Sender};

use grid_chase_core::{Command, Direction, Event, Frame, Layout, SessionStatus, SetupError};
use grid_chase_system_input::InputHandler;
use grid_chase_system_level_generation::LevelGenerator;
use grid_chase_world::{self as world, query, World};
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::clock::Clock;
pub use crate::config::{SessionConfig, DEFAULT_SEED};

/// Messages consumed by the session loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
    /// Advance the world by one tick.
    Tick,
    /// Raw key code produced by an input source.
    Input(u32),
    /// Suspend ticking.
    Pause,
    /// Continue ticking after a pause.
    Resume,
    /// Cancel the clock and leave the session loop.
    Stop,
}

/// Errors reported by the session controller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session could not be set up.
    #[error(transparent)]
    Setup(#[from] SetupError),
    /// The clock thread could not be spawned.
    #[error("failed to spawn the session clock")]
    Clock(#[source] std::io::Error),
    /// The session no longer receives messages.
    #[error("session is no longer receiving messages")]
    Closed,
}

/// Cloneable sender used by input sources and other threads.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    sender: Sender<Message>,
}

impl SessionHandle {
    /// Forwards a raw key code.
    pub fn send_input(&self, code: u32) -> Result<(), SessionError> {
        self.send(Message::Input(code))
    }

    /// Requests a pause.
    pub fn pause(&self) -> Result<(), SessionError> {
        self.send(Message::Pause)
    }

    /// Requests a resume.
    pub fn resume(&self) -> Result<(), SessionError> {
        self.send(Message::Resume)
    }

    /// Asks the session loop to stop.
    pub fn stop(&self) -> Result<(), SessionError> {
        self.send(Message::Stop)
    }

    fn send(&self, message: Message) -> Result<(), SessionError> {
        self.sender
            .send(message)
            .map_err(|_| SessionError::Closed)
    }
}

/// Real-time controller around a single world.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    world: World,
    rng: ChaCha8Rng,
    input: InputHandler,
    sender: Sender<Message>,
    receiver: Receiver<Message>,
    clocks: Vec<Clock>,
}

impl Session {
    /// Creates a session on a freshly generated level.
    ///
    /// The seed drives both level generation and adversary movement, so equal
    /// configurations replay identically.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let layout = LevelGenerator::new(config.level).generate(config.grid_size, &mut rng)?;
        Self::assemble(config, &layout, rng)
    }

    /// Creates a session on a prepared level. The level counts in `config` are
    /// ignored.
    pub fn from_layout(config: SessionConfig, layout: &Layout) -> Result<Self, SessionError> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::assemble(config, layout, rng)
    }

    fn assemble(
        config: SessionConfig,
        layout: &Layout,
        rng: ChaCha8Rng,
    ) -> Result<Self, SessionError> {
        let world = World::from_layout(config.grid_size, layout)?;
        let (sender, receiver) = mpsc::channel();
        Ok(Self {
            config,
            world,
            rng,
            input: InputHandler::new(),
            sender,
            receiver,
            clocks: Vec::new(),
        })
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns a handle that feeds this session's message loop.
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            sender: self.sender.clone(),
        }
    }

    /// Moves the world into the running state and spawns a clock thread.
    ///
    /// Every call spawns another clock. Calling `start` twice without a
    /// [`Session::stop`] in between therefore ticks the world twice per
    /// interval.
    pub fn start(&mut self) -> Result<Vec<Event>, SessionError> {
        let events = self.execute(Command::Start);
        let clock =
            Clock::spawn(self.config.refresh_rate, self.sender.clone()).map_err(SessionError::Clock)?;
        self.clocks.push(clock);
        info!(
            "session started on a {size}x{size} grid, ticking every {:?}",
            self.config.refresh_rate,
            size = self.config.grid_size
        );
        Ok(events)
    }

    /// Cancels every running clock. Ticks already queued are still delivered.
    pub fn stop(&mut self) {
        if self.clocks.is_empty() {
            return;
        }
        for clock in self.clocks.drain(..) {
            clock.cancel();
        }
        info!("session clock stopped at tick {}", query::tick_index(&self.world));
    }

    /// Suspends ticking.
    pub fn pause(&mut self) -> Vec<Event> {
        self.execute(Command::Pause)
    }

    /// Continues ticking after a pause.
    pub fn resume(&mut self) -> Vec<Event> {
        self.execute(Command::Resume)
    }

    /// Records a raw key code as the pending direction.
    pub fn record_input(&mut self, code: u32) -> Option<Direction> {
        let direction = self.input.record(code);
        if let Some(direction) = direction {
            debug!("pending direction set to {direction:?}");
        }
        direction
    }

    /// Advances the world by one tick using the pending direction.
    ///
    /// Stops the clock once the session has finished.
    pub fn tick(&mut self) -> Vec<Event> {
        let events = self.execute(Command::Tick {
            pending: self.input.pending(),
        });
        if self.status() == SessionStatus::Finished {
            self.stop();
        }
        events
    }

    /// Handles a single message and returns the events it produced.
    pub fn process(&mut self, message: Message) -> Vec<Event> {
        match message {
            Message::Tick => self.tick(),
            Message::Input(code) => {
                let _ = self.record_input(code);
                Vec::new()
            }
            Message::Pause => self.pause(),
            Message::Resume => self.resume(),
            Message::Stop => {
                self.stop();
                Vec::new()
            }
        }
    }

    /// Drains messages until the session finishes or a stop is requested.
    ///
    /// `on_frame` receives a snapshot after every message that changed the
    /// world, together with the events describing the change. Returns
    /// immediately when no clock is running.
    pub fn run<F>(&mut self, mut on_frame: F) -> Result<(), SessionError>
    where
        F: FnMut(&Frame, &[Event]),
    {
        if self.clocks.is_empty() {
            debug!("run called without a running clock");
            return Ok(());
        }

        loop {
            let message = self.receiver.recv().map_err(|_| SessionError::Closed)?;
            let events = self.process(message);
            if !events.is_empty() {
                on_frame(&self.frame(), &events);
            }
            if message == Message::Stop || self.status() == SessionStatus::Finished {
                return Ok(());
            }
        }
    }

    /// Snapshot of the current world state.
    #[must_use]
    pub fn frame(&self) -> Frame {
        query::frame(&self.world)
    }

    /// Current session status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        query::status(&self.world)
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    fn execute(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut self.rng, &mut events);
        events
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}

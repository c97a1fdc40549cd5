use std::time::Duration;

use rand::Rng;

use crate::presence::channel::{PlayerCommand, PlayerStateEvent, ServerMessage};

/// Presence challenge timing knobs.
///
/// The challenge delay is drawn uniformly from `[min, max]` on every arm;
/// deployments tune the window through configuration.
#[derive(Debug, Clone)]
pub struct PresenceConfig {
    pub challenge_min_secs: u64,
    pub challenge_max_secs: u64,
    pub countdown_secs: u32,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            challenge_min_secs: 30,
            challenge_max_secs: 60,
            countdown_secs: 30,
        }
    }
}

/// Timer and messaging side effects requested by the monitor.
///
/// The socket driver owns the actual timers; the monitor only tracks which
/// handles are outstanding, so `teardown` is a single audit point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Send(ServerMessage),
    ArmChallenge(Duration),
    DisarmChallenge,
    ArmCountdown,
    DisarmCountdown,
}

/// Inputs that drive the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    Player(PlayerStateEvent),
    ChallengeFired,
    CountdownTick,
    Acknowledged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prompt {
    Inactive,
    Counting(u32),
    Locked,
}

/// The presence state machine for one playback session.
///
/// Single-threaded and event-driven: player notifications, timer firings,
/// and acknowledgments come in, commands and timer arm/disarm requests come
/// out. Nothing here blocks.
pub struct PresenceMonitor {
    cfg: PresenceConfig,
    playing: bool,
    prompt: Prompt,
    challenge_armed: bool,
    countdown_armed: bool,
}

impl PresenceMonitor {
    pub fn new(cfg: PresenceConfig) -> Self {
        Self {
            cfg,
            playing: false,
            prompt: Prompt::Inactive,
            challenge_armed: false,
            countdown_armed: false,
        }
    }

    /// The number of outstanding timer handles.
    pub fn pending_timers(&self) -> usize {
        self.challenge_armed as usize + self.countdown_armed as usize
    }

    /// Whether a challenge prompt is currently blocking playback.
    pub fn prompt_active(&self) -> bool {
        self.prompt != Prompt::Inactive
    }

    /// Advances the machine by one event.
    pub fn handle(&mut self, event: MonitorEvent) -> Vec<Action> {
        let mut out = Vec::new();

        match event {
            MonitorEvent::Player(PlayerStateEvent::Playing) => {
                self.playing = true;
                self.arm_challenge(&mut out);
            }

            MonitorEvent::Player(PlayerStateEvent::Paused) => {
                // A pause during an active prompt is the monitor's own doing;
                // the prompt stays up. Anything else is a user pause.
                self.playing = false;
                self.disarm_challenge(&mut out);
            }

            MonitorEvent::Player(PlayerStateEvent::Ended) => {
                self.playing = false;
                self.disarm_challenge(&mut out);
                self.disarm_countdown(&mut out);
                if self.prompt != Prompt::Inactive {
                    self.prompt = Prompt::Inactive;
                    out.push(Action::Send(ServerMessage::Clear));
                }
            }

            MonitorEvent::ChallengeFired => {
                self.challenge_armed = false;
                if self.playing && self.prompt == Prompt::Inactive {
                    self.prompt = Prompt::Counting(self.cfg.countdown_secs);
                    out.push(Action::Send(ServerMessage::Command {
                        command: PlayerCommand::Pause,
                    }));
                    out.push(Action::Send(ServerMessage::Prompt {
                        countdown: self.cfg.countdown_secs,
                        locked: false,
                    }));
                    self.countdown_armed = true;
                    out.push(Action::ArmCountdown);
                } else {
                    // the challenge only means anything during active viewing
                    self.arm_challenge(&mut out);
                }
            }

            MonitorEvent::CountdownTick => {
                if let Prompt::Counting(remaining) = self.prompt {
                    let remaining = remaining.saturating_sub(1);
                    if remaining == 0 {
                        // no auto-resume: locked until an explicit acknowledgment
                        self.prompt = Prompt::Locked;
                        self.disarm_countdown(&mut out);
                        out.push(Action::Send(ServerMessage::Command {
                            command: PlayerCommand::Pause,
                        }));
                        out.push(Action::Send(ServerMessage::Prompt {
                            countdown: 0,
                            locked: true,
                        }));
                    } else {
                        self.prompt = Prompt::Counting(remaining);
                        out.push(Action::Send(ServerMessage::Prompt {
                            countdown: remaining,
                            locked: false,
                        }));
                    }
                }
            }

            MonitorEvent::Acknowledged => {
                if self.prompt != Prompt::Inactive {
                    self.prompt = Prompt::Inactive;
                    self.disarm_countdown(&mut out);
                    out.push(Action::Send(ServerMessage::Clear));
                    out.push(Action::Send(ServerMessage::Command {
                        command: PlayerCommand::Play,
                    }));
                    self.arm_challenge(&mut out);
                }
            }
        }

        out
    }

    /// Disarms every outstanding timer, whatever the current state.
    pub fn teardown(&mut self) -> Vec<Action> {
        let mut out = Vec::new();
        self.disarm_challenge(&mut out);
        self.disarm_countdown(&mut out);
        self.prompt = Prompt::Inactive;
        self.playing = false;
        out
    }

    fn arm_challenge(&mut self, out: &mut Vec<Action>) {
        if self.challenge_armed || self.prompt != Prompt::Inactive {
            return;
        }

        let secs = rand::thread_rng()
            .gen_range(self.cfg.challenge_min_secs..=self.cfg.challenge_max_secs);
        self.challenge_armed = true;
        out.push(Action::ArmChallenge(Duration::from_secs(secs)));
    }

    fn disarm_challenge(&mut self, out: &mut Vec<Action>) {
        if self.challenge_armed {
            self.challenge_armed = false;
            out.push(Action::DisarmChallenge);
        }
    }

    fn disarm_countdown(&mut self, out: &mut Vec<Action>) {
        if self.countdown_armed {
            self.countdown_armed = false;
            out.push(Action::DisarmCountdown);
        }
    }
}

use coursecast::presence::channel::{PlayerCommand, PlayerStateEvent, ServerMessage};
use coursecast::presence::monitor::{Action, MonitorEvent, PresenceConfig, PresenceMonitor};

fn short_cfg() -> PresenceConfig {
    PresenceConfig {
        challenge_min_secs: 30,
        challenge_max_secs: 60,
        countdown_secs: 3,
    }
}

fn commands(actions: &[Action]) -> Vec<PlayerCommand> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::Send(ServerMessage::Command { command }) => Some(*command),
            _ => None,
        })
        .collect()
}

fn challenge_arms(actions: &[Action]) -> usize {
    actions
        .iter()
        .filter(|a| matches!(a, Action::ArmChallenge(_)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playing_arms_exactly_one_challenge_timer() {
        let mut monitor = PresenceMonitor::new(short_cfg());

        let actions = monitor.handle(MonitorEvent::Player(PlayerStateEvent::Playing));
        assert_eq!(challenge_arms(&actions), 1);
        assert_eq!(monitor.pending_timers(), 1);

        // a second "playing" notification must not stack another timer
        let actions = monitor.handle(MonitorEvent::Player(PlayerStateEvent::Playing));
        assert_eq!(challenge_arms(&actions), 0);
        assert_eq!(monitor.pending_timers(), 1);
    }

    #[test]
    fn challenge_delay_is_drawn_from_the_configured_window() {
        let cfg = short_cfg();
        for _ in 0..50 {
            let mut monitor = PresenceMonitor::new(cfg.clone());
            let actions = monitor.handle(MonitorEvent::Player(PlayerStateEvent::Playing));
            let delay = actions
                .iter()
                .find_map(|a| match a {
                    Action::ArmChallenge(d) => Some(*d),
                    _ => None,
                })
                .expect("challenge timer not armed");
            assert!(delay.as_secs() >= cfg.challenge_min_secs);
            assert!(delay.as_secs() <= cfg.challenge_max_secs);
        }
    }

    #[test]
    fn challenge_fire_prompts_and_issues_exactly_one_pause() {
        let mut monitor = PresenceMonitor::new(short_cfg());
        monitor.handle(MonitorEvent::Player(PlayerStateEvent::Playing));

        let actions = monitor.handle(MonitorEvent::ChallengeFired);

        assert!(monitor.prompt_active());
        assert_eq!(commands(&actions), vec![PlayerCommand::Pause]);
        assert_eq!(challenge_arms(&actions), 0);
        assert!(actions.contains(&Action::ArmCountdown));
        assert!(actions.contains(&Action::Send(ServerMessage::Prompt {
            countdown: 3,
            locked: false,
        })));
    }

    #[test]
    fn challenge_fire_while_not_playing_reschedules_instead() {
        let mut monitor = PresenceMonitor::new(short_cfg());
        monitor.handle(MonitorEvent::Player(PlayerStateEvent::Playing));
        monitor.handle(MonitorEvent::Player(PlayerStateEvent::Paused));

        // a timer that raced the user's pause must not prompt
        let actions = monitor.handle(MonitorEvent::ChallengeFired);

        assert!(!monitor.prompt_active());
        assert!(commands(&actions).is_empty());
        assert_eq!(challenge_arms(&actions), 1);
    }

    #[test]
    fn acknowledge_plays_and_schedules_exactly_one_new_timer() {
        let mut monitor = PresenceMonitor::new(short_cfg());
        monitor.handle(MonitorEvent::Player(PlayerStateEvent::Playing));
        monitor.handle(MonitorEvent::ChallengeFired);

        let actions = monitor.handle(MonitorEvent::Acknowledged);

        assert!(!monitor.prompt_active());
        assert_eq!(commands(&actions), vec![PlayerCommand::Play]);
        assert_eq!(challenge_arms(&actions), 1);
        assert!(actions.contains(&Action::Send(ServerMessage::Clear)));

        // the "playing" event that follows the play command must not stack a
        // second challenge timer
        let actions = monitor.handle(MonitorEvent::Player(PlayerStateEvent::Playing));
        assert_eq!(challenge_arms(&actions), 0);
        assert_eq!(monitor.pending_timers(), 1);
    }

    #[test]
    fn countdown_exhaustion_locks_without_auto_resume() {
        let mut monitor = PresenceMonitor::new(short_cfg());
        monitor.handle(MonitorEvent::Player(PlayerStateEvent::Playing));
        monitor.handle(MonitorEvent::ChallengeFired);

        monitor.handle(MonitorEvent::CountdownTick);
        monitor.handle(MonitorEvent::CountdownTick);
        let actions = monitor.handle(MonitorEvent::CountdownTick);

        assert!(monitor.prompt_active());
        assert!(actions.contains(&Action::DisarmCountdown));
        assert!(actions.contains(&Action::Send(ServerMessage::Prompt {
            countdown: 0,
            locked: true,
        })));
        assert_eq!(commands(&actions), vec![PlayerCommand::Pause]);

        // locked means locked: further ticks do nothing, no play is ever sent
        let actions = monitor.handle(MonitorEvent::CountdownTick);
        assert!(actions.is_empty());
        assert!(monitor.prompt_active());

        // only an explicit acknowledgment resumes
        let actions = monitor.handle(MonitorEvent::Acknowledged);
        assert_eq!(commands(&actions), vec![PlayerCommand::Play]);
        assert!(!monitor.prompt_active());
    }

    #[test]
    fn monitor_caused_pause_keeps_the_prompt() {
        let mut monitor = PresenceMonitor::new(short_cfg());
        monitor.handle(MonitorEvent::Player(PlayerStateEvent::Playing));
        monitor.handle(MonitorEvent::ChallengeFired);

        // the player reports the pause the monitor itself requested
        let actions = monitor.handle(MonitorEvent::Player(PlayerStateEvent::Paused));

        assert!(monitor.prompt_active());
        assert!(commands(&actions).is_empty());
    }

    #[test]
    fn user_pause_cancels_the_pending_challenge() {
        let mut monitor = PresenceMonitor::new(short_cfg());
        monitor.handle(MonitorEvent::Player(PlayerStateEvent::Playing));

        let actions = monitor.handle(MonitorEvent::Player(PlayerStateEvent::Paused));

        assert!(actions.contains(&Action::DisarmChallenge));
        assert_eq!(monitor.pending_timers(), 0);
        assert!(!monitor.prompt_active());
    }

    #[test]
    fn ended_clears_everything() {
        let mut monitor = PresenceMonitor::new(short_cfg());
        monitor.handle(MonitorEvent::Player(PlayerStateEvent::Playing));
        monitor.handle(MonitorEvent::ChallengeFired);
        monitor.handle(MonitorEvent::CountdownTick);

        let actions = monitor.handle(MonitorEvent::Player(PlayerStateEvent::Ended));

        assert!(!monitor.prompt_active());
        assert_eq!(monitor.pending_timers(), 0);
        assert!(actions.contains(&Action::Send(ServerMessage::Clear)));
    }

    #[test]
    fn teardown_leaves_zero_pending_timers_from_every_state() {
        let scenarios: Vec<(&str, Vec<MonitorEvent>)> = vec![
            ("fresh", vec![]),
            ("playing", vec![MonitorEvent::Player(PlayerStateEvent::Playing)]),
            (
                "prompt counting",
                vec![
                    MonitorEvent::Player(PlayerStateEvent::Playing),
                    MonitorEvent::ChallengeFired,
                ],
            ),
            (
                "prompt locked",
                vec![
                    MonitorEvent::Player(PlayerStateEvent::Playing),
                    MonitorEvent::ChallengeFired,
                    MonitorEvent::CountdownTick,
                    MonitorEvent::CountdownTick,
                    MonitorEvent::CountdownTick,
                ],
            ),
            (
                "user paused",
                vec![
                    MonitorEvent::Player(PlayerStateEvent::Playing),
                    MonitorEvent::Player(PlayerStateEvent::Paused),
                ],
            ),
            (
                "acknowledged",
                vec![
                    MonitorEvent::Player(PlayerStateEvent::Playing),
                    MonitorEvent::ChallengeFired,
                    MonitorEvent::Acknowledged,
                ],
            ),
        ];

        for (name, events) in scenarios {
            let mut monitor = PresenceMonitor::new(short_cfg());
            for event in events {
                monitor.handle(event);
            }

            monitor.teardown();
            assert_eq!(monitor.pending_timers(), 0, "timers leaked after: {}", name);

            // teardown is idempotent
            let actions = monitor.teardown();
            assert!(actions.is_empty(), "second teardown acted after: {}", name);
        }
    }
}

use std::pin::Pin;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    Extension,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::time::{interval_at, sleep, Instant, Interval, Sleep};

use crate::{
    error::{AppError, Result},
    models::claims::{PlayerClaims, Provider},
    presence::{
        channel::ClientMessage,
        monitor::{Action, MonitorEvent, PresenceConfig, PresenceMonitor},
    },
    state::AppState,
};

/// Opens the presence channel for a hosted-file playback session.
pub async fn presence_socket(
    State(state): State<AppState>,
    Extension(claims): Extension<PlayerClaims>,
    ws: WebSocketUpgrade,
) -> Result<Response> {
    if claims.provider != Provider::HostedFile {
        return Err(AppError::Validation("Not a hosted-file session".to_string()));
    }

    tracing::info!(
        "👁️ Presence channel opened - {} {}/{}",
        claims.sub,
        claims.course_id,
        claims.lesson_id
    );

    let cfg = state.config.presence.clone();
    Ok(ws.on_upgrade(move |socket| run_presence(socket, cfg)))
}

/// Drives one presence session: socket events in, monitor actions out.
///
/// The monitor decides; this loop owns the actual timers. Every `Disarm*`
/// action drops the corresponding timer future, so nothing ever fires
/// against a torn-down session.
async fn run_presence(socket: WebSocket, cfg: PresenceConfig) {
    let mut monitor = PresenceMonitor::new(cfg);
    let (mut tx, mut rx) = socket.split();

    let mut challenge: Option<Pin<Box<Sleep>>> = None;
    let mut countdown: Option<Interval> = None;

    loop {
        let event = tokio::select! {
            msg = rx.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    match sonic_rs::from_str::<ClientMessage>(&text) {
                        Ok(ClientMessage::PlayerState { state }) => MonitorEvent::Player(state),
                        Ok(ClientMessage::Acknowledge) => MonitorEvent::Acknowledged,
                        Err(_) => {
                            tracing::debug!("Dropping unrecognized presence payload");
                            continue;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    tracing::debug!("Presence socket error: {}", e);
                    break;
                }
            },
            _ = async { challenge.as_mut().unwrap().await }, if challenge.is_some() => {
                challenge = None;
                MonitorEvent::ChallengeFired
            }
            _ = async { countdown.as_mut().unwrap().tick().await }, if countdown.is_some() => {
                MonitorEvent::CountdownTick
            }
        };

        for action in monitor.handle(event) {
            match action {
                Action::Send(msg) => {
                    let text = match sonic_rs::to_string(&msg) {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::error!("Presence message serialization failed: {}", e);
                            continue;
                        }
                    };

                    if tx.send(Message::Text(text.into())).await.is_err() {
                        // peer is gone; timers drop with this frame
                        monitor.teardown();
                        tracing::info!("👁️ Presence channel closed mid-send");
                        return;
                    }
                }
                Action::ArmChallenge(delay) => {
                    tracing::debug!("⏲️ Challenge armed for {:?}", delay);
                    challenge = Some(Box::pin(sleep(delay)));
                }
                Action::DisarmChallenge => challenge = None,
                Action::ArmCountdown => {
                    let period = std::time::Duration::from_secs(1);
                    countdown = Some(interval_at(Instant::now() + period, period));
                }
                Action::DisarmCountdown => countdown = None,
            }
        }
    }

    monitor.teardown();
    tracing::info!("👁️ Presence channel closed");
}

use serde::{Deserialize, Serialize};

/// Player state notifications accepted from the player surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStateEvent {
    Playing,
    Paused,
    Ended,
}

/// The only two commands the monitor may issue to the player surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerCommand {
    Play,
    Pause,
}

/// Messages accepted from the playback page.
///
/// The enum is closed: any other payload shape fails to decode and the
/// message is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "PLAYER_STATE")]
    PlayerState { state: PlayerStateEvent },
    #[serde(rename = "PRESENCE_ACK")]
    Acknowledge,
}

/// Messages sent to the playback page.
///
/// `Command` is the restricted player control contract; `Prompt` and `Clear`
/// only drive the overlay view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "PARENT_COMMAND")]
    Command { command: PlayerCommand },
    #[serde(rename = "PRESENCE_PROMPT")]
    Prompt { countdown: u32, locked: bool },
    #[serde(rename = "PRESENCE_CLEAR")]
    Clear,
}

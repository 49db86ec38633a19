//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the story reader in the
//! browser and the local host for narrated playback.

use serde::{Deserialize, Serialize};
use storyland_core::StoryId;

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================
// NOTE: The audio itself plays in the browser. The client only reports the
// playback position and asks for word stepping.
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Opens a story for narration. Loading another story resets the cursor.
    LoadStory {
        story_id: StoryId,
        /// `en` or `ar`; defaults to the stored preference.
        #[serde(default)]
        language: Option<String>,
    },

    /// The current playback position of the audio element, in seconds.
    Position { seconds: f64 },

    /// Steps the highlight to the following word.
    NextWord,

    /// Steps the highlight to the preceding word.
    PreviousWord,

    /// Asks for the current word again so the client can replay it.
    RepeatWord,

    /// The narration audio reached its end.
    PlaybackEnded,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Confirms the story is loaded and how many words have cues.
    StoryLoaded { story_id: StoryId, word_count: usize },

    /// The word at `index` should be highlighted. `start` and `end` are its
    /// span in the audio, in seconds; stepping clients seek to `start`.
    WordActive {
        index: usize,
        word: String,
        start: f64,
        end: f64,
    },

    /// No word is being spoken; remove the highlight.
    WordCleared,

    /// Playback ended and the completion was recorded.
    StoryCompleted {
        story_id: StoryId,
        first_completion: bool,
        stars_awarded: u32,
        total_stars: u32,
    },

    /// Reports an error to the client, which should display an error message.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_parse_from_tagged_json() {
        let load: ClientMessage =
            serde_json::from_str(r#"{"type":"load_story","story_id":2,"language":"ar"}"#).unwrap();
        assert_eq!(
            load,
            ClientMessage::LoadStory {
                story_id: 2,
                language: Some("ar".to_string())
            }
        );

        let position: ClientMessage =
            serde_json::from_str(r#"{"type":"position","seconds":1.25}"#).unwrap();
        assert_eq!(position, ClientMessage::Position { seconds: 1.25 });

        let ended: ClientMessage = serde_json::from_str(r#"{"type":"playback_ended"}"#).unwrap();
        assert_eq!(ended, ClientMessage::PlaybackEnded);

        let repeat: ClientMessage = serde_json::from_str(r#"{"type":"repeat_word"}"#).unwrap();
        assert_eq!(repeat, ClientMessage::RepeatWord);
    }

    #[test]
    fn server_messages_carry_a_snake_case_tag() {
        let json = serde_json::to_value(ServerMessage::WordActive {
            index: 3,
            word: "Bunny".to_string(),
            start: 2.4,
            end: 2.8,
        })
        .unwrap();
        assert_eq!(json["type"], "word_active");
        assert_eq!(json["index"], 3);
        assert_eq!(json["start"], 2.4);
        assert_eq!(json["end"], 2.8);

        let cleared = serde_json::to_string(&ServerMessage::WordCleared).unwrap();
        assert_eq!(cleared, r#"{"type":"word_cleared"}"#);
    }
}

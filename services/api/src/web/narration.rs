//! services/api/src/web/narration.rs
//!
//! The per-connection narration state: which story is loaded for which
//! profile, and how each client message moves the word cursor.

use std::sync::Arc;
use storyland_core::{
    Language, NarrationSession, NarrationUpdate, PlaybackEvent, Profile, StoryId,
};
use tracing::{debug, info, warn};

use crate::web::protocol::{ClientMessage, ServerMessage};
use crate::web::rest::record_completion;
use crate::web::state::AppState;

/// One narration socket. Owns the session of the loaded story, if any.
pub struct NarrationConnection {
    app_state: Arc<AppState>,
    profile: Profile,
    session: Option<NarrationSession>,
}

impl NarrationConnection {
    pub fn new(app_state: Arc<AppState>, profile: Profile) -> Self {
        Self {
            app_state,
            profile,
            session: None,
        }
    }

    /// True while the profile this socket was opened for is still the one
    /// logged in. Logout or a new login ends the socket's right to record
    /// progress.
    pub fn profile_is_active(&self) -> bool {
        self.app_state
            .profiles
            .active()
            .is_some_and(|active| active.id == self.profile.id)
    }

    /// Applies one client message and returns the reply, if the client
    /// needs one. Position reports that do not change the word get none.
    pub async fn handle(&mut self, message: ClientMessage) -> Option<ServerMessage> {
        if !self.profile_is_active() {
            warn!(
                profile_id = %self.profile.id,
                "Narration message from a profile that is no longer active"
            );
            return Some(Self::error("Log in again to keep reading."));
        }

        match message {
            ClientMessage::LoadStory { story_id, language } => {
                Some(self.load_story(story_id, language).await)
            }
            ClientMessage::PlaybackEnded => {
                let Some(session) = self.session.as_mut() else {
                    return Some(Self::not_loaded());
                };
                let story_id = session.story().id;
                session.handle(PlaybackEvent::Ended);
                Some(self.complete(story_id).await)
            }
            cursor_move => {
                let Some(session) = self.session.as_mut() else {
                    return Some(Self::not_loaded());
                };
                let update = match cursor_move {
                    ClientMessage::Position { seconds } => {
                        session.handle(PlaybackEvent::Position(seconds))
                    }
                    ClientMessage::NextWord => session.next_word(),
                    ClientMessage::PreviousWord => session.previous_word(),
                    ClientMessage::RepeatWord => match session.repeat_word() {
                        Some(update) => Some(update),
                        None => return Some(Self::error("No word to repeat.")),
                    },
                    _ => None,
                };
                update.and_then(Self::word_message)
            }
        }
    }

    async fn load_story(&mut self, story_id: StoryId, language: Option<String>) -> ServerMessage {
        let language = match language {
            Some(raw) => match raw.parse::<Language>() {
                Ok(language) => language,
                Err(e) => return Self::error(&e.to_string()),
            },
            None => match self.app_state.preferences.load_language().await {
                Ok(language) => language,
                Err(e) => {
                    warn!("Falling back to English narration: {}", e);
                    Language::SOURCE
                }
            },
        };

        match self.app_state.catalog.find_story(story_id, language) {
            Ok(story) => {
                let word_count = story.timestamps.len();
                info!(story_id, %language, word_count, "Narration story loaded");
                self.session = Some(NarrationSession::new(story));
                ServerMessage::StoryLoaded {
                    story_id,
                    word_count,
                }
            }
            Err(e) => {
                warn!("Narration could not load story {}: {}", story_id, e);
                Self::error(&format!("Story {story_id} not found."))
            }
        }
    }

    async fn complete(&self, story_id: StoryId) -> ServerMessage {
        match record_completion(&self.app_state, &self.profile, story_id).await {
            Ok(completion) => {
                debug!(story_id, first = completion.first_completion, "Narration finished");
                ServerMessage::StoryCompleted {
                    story_id,
                    first_completion: completion.first_completion,
                    stars_awarded: completion.stars_awarded,
                    total_stars: completion.total_stars,
                }
            }
            Err((_, message)) => Self::error(&message),
        }
    }

    /// Completion is reported by `complete`, so `Finished` maps to nothing.
    fn word_message(update: NarrationUpdate) -> Option<ServerMessage> {
        match update {
            NarrationUpdate::Word {
                index,
                word,
                start,
                end,
            } => Some(ServerMessage::WordActive {
                index,
                word,
                start,
                end,
            }),
            NarrationUpdate::Cleared => Some(ServerMessage::WordCleared),
            NarrationUpdate::Finished { .. } => None,
        }
    }

    fn not_loaded() -> ServerMessage {
        Self::error("Load a story before starting playback.")
    }

    fn error(message: &str) -> ServerMessage {
        ServerMessage::Error {
            message: message.to_string(),
        }
    }
}

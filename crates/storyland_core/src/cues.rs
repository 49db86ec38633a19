//! crates/storyland_core/src/cues.rs
//!
//! The audio cue index maps a playback position to the word being narrated.
//! Timestamps are ordered by `start` and never overlap, so a binary search on
//! `end` finds the only candidate word.

use crate::domain::{Story, StoryId, WordTimestamp};

/// Index of the word whose span contains `position`, or `None` in a gap.
/// A position on a shared boundary belongs to the earlier word.
pub fn word_index_at(timestamps: &[WordTimestamp], position: f64) -> Option<usize> {
    if !position.is_finite() {
        return None;
    }
    let index = timestamps.partition_point(|t| t.end < position);
    timestamps
        .get(index)
        .filter(|t| t.start <= position)
        .map(|_| index)
}

pub fn word_at(story: &Story, position: f64) -> Option<usize> {
    word_index_at(&story.timestamps, position)
}

/// The following word, without wrapping around.
pub fn next(story: &Story, current: usize) -> Option<usize> {
    current
        .checked_add(1)
        .filter(|&i| i < story.timestamps.len())
}

pub fn previous(story: &Story, current: usize) -> Option<usize> {
    current
        .checked_sub(1)
        .filter(|&i| i < story.timestamps.len())
}

/// True when every span is finite with `start <= end` and each word starts
/// no earlier than the previous one ends.
pub fn is_well_ordered(timestamps: &[WordTimestamp]) -> bool {
    timestamps
        .iter()
        .all(|t| t.start.is_finite() && t.end.is_finite() && t.start <= t.end)
        && timestamps.windows(2).all(|pair| pair[1].start >= pair[0].end)
}

//=========================================================================================
// Cursor
//=========================================================================================

/// A change of the highlighted word.
#[derive(Debug, Clone, PartialEq)]
pub enum CueChange {
    Entered(usize),
    Cleared,
}

/// The single "current word" cursor of the story being narrated.
#[derive(Debug, Default, Clone)]
pub struct CueCursor {
    current: Option<usize>,
}

impl CueCursor {
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Moves the cursor to the word at `position`, reporting only real changes.
    pub fn seek(&mut self, story: &Story, position: f64) -> Option<CueChange> {
        let found = word_at(story, position);
        if found == self.current {
            return None;
        }
        self.current = found;
        Some(match found {
            Some(index) => CueChange::Entered(index),
            None => CueChange::Cleared,
        })
    }

    /// Advances one word. From an empty cursor this selects the first word.
    pub fn step_next(&mut self, story: &Story) -> Option<usize> {
        let target = match self.current {
            None => (!story.timestamps.is_empty()).then_some(0),
            Some(index) => next(story, index),
        };
        if target.is_some() {
            self.current = target;
        }
        target
    }

    pub fn step_previous(&mut self, story: &Story) -> Option<usize> {
        let target = self.current.and_then(|index| previous(story, index));
        if target.is_some() {
            self.current = target;
        }
        target
    }
}

//=========================================================================================
// Narration Session
//=========================================================================================

/// Events reported by the audio player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    /// The playback position, in seconds.
    Position(f64),
    Ended,
}

/// What the reader should show after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum NarrationUpdate {
    /// The word to highlight, with its span so the player can seek to it.
    Word {
        index: usize,
        word: String,
        start: f64,
        end: f64,
    },
    Cleared,
    Finished { story_id: StoryId },
}

/// Drives the cue cursor of one loaded story from playback events.
/// Loading another story means building a new session.
#[derive(Debug, Clone)]
pub struct NarrationSession {
    story: Story,
    cursor: CueCursor,
}

impl NarrationSession {
    pub fn new(story: Story) -> Self {
        Self {
            story,
            cursor: CueCursor::default(),
        }
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    pub fn current(&self) -> Option<usize> {
        self.cursor.current()
    }

    fn word_update(&self, index: usize) -> Option<NarrationUpdate> {
        self.story
            .timestamps
            .get(index)
            .map(|t| NarrationUpdate::Word {
                index,
                word: t.word.clone(),
                start: t.start,
                end: t.end,
            })
    }

    pub fn handle(&mut self, event: PlaybackEvent) -> Option<NarrationUpdate> {
        match event {
            PlaybackEvent::Position(seconds) => match self.cursor.seek(&self.story, seconds)? {
                CueChange::Entered(index) => self.word_update(index),
                CueChange::Cleared => Some(NarrationUpdate::Cleared),
            },
            PlaybackEvent::Ended => {
                self.cursor.reset();
                Some(NarrationUpdate::Finished {
                    story_id: self.story.id,
                })
            }
        }
    }

    pub fn next_word(&mut self) -> Option<NarrationUpdate> {
        let index = self.cursor.step_next(&self.story)?;
        self.word_update(index)
    }

    pub fn previous_word(&mut self) -> Option<NarrationUpdate> {
        let index = self.cursor.step_previous(&self.story)?;
        self.word_update(index)
    }

    /// Re-emits the current word without moving the cursor. `None` when no
    /// word is highlighted.
    pub fn repeat_word(&self) -> Option<NarrationUpdate> {
        self.word_update(self.cursor.current()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn story_with(spans: &[(f64, f64)]) -> Story {
        let mut story = seed::english_stories().remove(0);
        story.timestamps = spans
            .iter()
            .enumerate()
            .map(|(i, &(start, end))| WordTimestamp {
                word: format!("w{i}"),
                start,
                end,
            })
            .collect();
        story
    }

    #[test]
    fn boundary_and_gap_positions() {
        let story = story_with(&[(0.0, 0.5), (0.5, 1.0), (2.0, 2.5)]);
        assert_eq!(word_at(&story, 0.0), Some(0));
        assert_eq!(word_at(&story, 0.5), Some(0));
        assert_eq!(word_at(&story, 1.5), None);
        assert_eq!(word_at(&story, 2.5), Some(2));
        assert_eq!(word_at(&story, -1.0), None);
        assert_eq!(word_at(&story, f64::NAN), None);
    }

    #[test]
    fn stepping_does_not_wrap() {
        let story = story_with(&[(0.0, 0.5), (0.5, 1.0)]);
        assert_eq!(next(&story, 0), Some(1));
        assert_eq!(next(&story, 1), None);
        assert_eq!(previous(&story, 1), Some(0));
        assert_eq!(previous(&story, 0), None);
        assert_eq!(previous(&story, 7), None);
    }

    #[test]
    fn seed_timestamps_are_well_ordered() {
        for story in seed::english_stories() {
            assert!(!story.timestamps.is_empty());
            assert!(is_well_ordered(&story.timestamps), "story {}", story.id);
        }
        assert!(!is_well_ordered(&story_with(&[(0.0, 1.0), (0.5, 1.5)]).timestamps));
        assert!(!is_well_ordered(&story_with(&[(1.0, 0.5)]).timestamps));
    }

    #[test]
    fn cursor_reports_changes_only() {
        let story = story_with(&[(0.0, 0.5), (0.5, 1.0), (2.0, 2.5)]);
        let mut cursor = CueCursor::default();
        assert_eq!(cursor.seek(&story, 0.1), Some(CueChange::Entered(0)));
        assert_eq!(cursor.seek(&story, 0.2), None);
        assert_eq!(cursor.seek(&story, 0.7), Some(CueChange::Entered(1)));
        assert_eq!(cursor.seek(&story, 1.5), Some(CueChange::Cleared));
        assert_eq!(cursor.seek(&story, 1.6), None);
    }

    #[test]
    fn cursor_steps_from_empty() {
        let story = story_with(&[(0.0, 0.5), (0.5, 1.0)]);
        let mut cursor = CueCursor::default();
        assert_eq!(cursor.step_previous(&story), None);
        assert_eq!(cursor.step_next(&story), Some(0));
        assert_eq!(cursor.step_next(&story), Some(1));
        assert_eq!(cursor.step_next(&story), None);
        assert_eq!(cursor.current(), Some(1));
    }

    fn once() -> NarrationUpdate {
        NarrationUpdate::Word {
            index: 0,
            word: "Once".to_string(),
            start: 0.0,
            end: 0.4,
        }
    }

    #[test]
    fn session_emits_words_and_finish() {
        let mut session = NarrationSession::new(seed::english_stories().remove(0));
        assert_eq!(session.handle(PlaybackEvent::Position(0.2)), Some(once()));
        assert_eq!(session.handle(PlaybackEvent::Position(1.4)), Some(NarrationUpdate::Cleared));
        assert_eq!(session.next_word(), Some(once()));
        assert_eq!(
            session.handle(PlaybackEvent::Ended),
            Some(NarrationUpdate::Finished { story_id: 1 })
        );
        assert_eq!(session.current(), None);
    }

    #[test]
    fn repeat_re_emits_the_current_word_in_place() {
        let mut session = NarrationSession::new(seed::english_stories().remove(0));
        assert_eq!(session.repeat_word(), None);

        session.next_word();
        let upon = session.next_word();
        assert!(matches!(
            upon,
            Some(NarrationUpdate::Word { index: 1, start, end, .. }) if start == 0.4 && end == 0.75
        ));
        assert_eq!(session.repeat_word(), upon);
        assert_eq!(session.current(), Some(1));
    }
}

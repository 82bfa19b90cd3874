use serde::Serialize;
use std::collections::BTreeSet;

use crate::*;

/// Counts gathered over a walk through a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub frame_count: usize,
    pub dump_indices: Vec<usize>,
    pub player_ids: BTreeSet<i32>,
    pub max_players_in_frame: usize,
    pub ball_samples: usize,
    pub interpolated_frames: usize,
    pub frames_without_ball: usize,
    pub last_logical_position: Option<usize>,
}

impl SessionSummary {
    fn add_frame(&mut self, view: &FrameView) {
        self.frame_count += 1;
        if self.dump_indices.last() != Some(&view.dump_index) {
            self.dump_indices.push(view.dump_index);
        }
        self.player_ids
            .extend(view.frame.players.iter().map(|player| player.id));
        self.max_players_in_frame = self.max_players_in_frame.max(view.frame.players.len());
        if view.ball.sample.is_some() {
            self.ball_samples += 1;
        } else if view.ball.is_interpolated() {
            self.interpolated_frames += 1;
        } else {
            self.frames_without_ball += 1;
        }
        self.last_logical_position = Some(view.logical_position);
    }

    pub fn as_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Builds a [`SessionSummary`], optionally stopping after `limit` frames.
#[derive(Debug, Clone, Default)]
pub struct SessionSummaryCollector {
    summary: SessionSummary,
    limit: Option<usize>,
}

impl SessionSummaryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            summary: SessionSummary::default(),
            limit: Some(limit),
        }
    }

    pub fn summarize<S: DumpSource>(
        self,
        cursor: &mut FrameCursor<S>,
    ) -> ReplayResult<SessionSummary> {
        Ok(self.process_session(cursor)?.summary)
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }
}

impl FrameHandler for SessionSummaryCollector {
    fn handle_frame(&mut self, view: &FrameView) -> ReplayResult<FrameControl> {
        self.summary.add_frame(view);
        match self.limit {
            Some(limit) if self.summary.frame_count >= limit => Ok(FrameControl::Stop),
            _ => Ok(FrameControl::Continue),
        }
    }
}

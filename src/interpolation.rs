use crate::*;
use glam::Vec2;
use std::collections::HashMap;

/// A ball position that was actually observed, tagged with the logical
/// position of the frame it was observed in.
#[derive(Debug, Clone, Copy, PartialEq, new)]
pub struct BallSample {
    pub logical_position: usize,
    pub position: Vec2,
}

/// Linearly interpolate the ball over the frames strictly between `start` and
/// `end`, yielding `(logical_position, position)` pairs.
///
/// The interpolation amount for a frame is its offset from `start` divided by
/// the offset of `end` from the start of the lookahead window, which begins
/// at `start`.
pub fn interpolate_gap(
    start: &BallSample,
    end: &BallSample,
) -> ReplayResult<impl Iterator<Item = (usize, Vec2)>> {
    if end.logical_position <= start.logical_position {
        return ReplayError::new_result(ReplayErrorVariant::InterpolationOrder {
            start: start.logical_position,
            end: end.logical_position,
        });
    }

    let (start, end) = (*start, *end);
    let next_offset = (end.logical_position - start.logical_position) as f32;
    Ok(
        (start.logical_position + 1..end.logical_position).map(move |logical_position| {
            let offset = (logical_position - start.logical_position) as f32;
            (
                logical_position,
                start.position.lerp(end.position, offset / next_offset),
            )
        }),
    )
}

/// Turns sparse ball observations into a per-frame ball position.
///
/// Every real observation replaces the cached window with the interpolated
/// positions leading up to the next observation in the same chunk. Frames
/// without an observation are answered from that window, or not at all.
#[derive(Debug, Clone, Default)]
pub struct BallInterpolator {
    cache: HashMap<usize, Vec2>,
}

impl BallInterpolator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ball_at(
        &mut self,
        logical_position: usize,
        sample: Option<Vec2>,
        next_sample: Option<BallSample>,
    ) -> ReplayResult<Option<Vec2>> {
        if let Some(position) = sample {
            self.cache.clear();
            if let Some(next_sample) = next_sample {
                let current = BallSample::new(logical_position, position);
                self.cache.extend(interpolate_gap(&current, &next_sample)?);
                log::debug!(
                    "Interpolating ball over frames {}..{}",
                    logical_position + 1,
                    next_sample.logical_position
                );
            }
            return Ok(Some(position));
        }
        Ok(self.cache.get(&logical_position).copied())
    }

    pub fn cached(&self, logical_position: usize) -> Option<Vec2> {
        self.cache.get(&logical_position).copied()
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

use glam::Vec2;
use std::path::Path;
use tracking_replay::*;

/// A frame whose single player id encodes where the frame came from.
fn frame(player_id: i32, ball: Option<[f32; 2]>) -> Frame {
    Frame {
        ball_position: ball.map(|b| b.to_vec()),
        players: vec![PlayerObservation {
            id: player_id,
            camera_id: 0,
            pose: PoseDump::default(),
            position: vec![player_id as f32, 0.0],
        }],
    }
}

fn dump(frames: Vec<Frame>) -> DumpFile {
    DumpFile {
        cameras: CameraTable::new(vec![vec![0.0, 0.0, 10.0]]),
        frames: frames
            .into_iter()
            .enumerate()
            .map(|(i, f)| (i as i64, f))
            .collect(),
    }
}

/// `sizes[n]` frames for dump `n`, player ids `100 * n + i`, no ball.
fn dumps_with_sizes(sizes: &[usize]) -> Vec<DumpFile> {
    sizes
        .iter()
        .enumerate()
        .map(|(n, size)| {
            dump(
                (0..*size)
                    .map(|i| frame((100 * n + i) as i32, None))
                    .collect(),
            )
        })
        .collect()
}

fn write_dumps(directory: &Path, dumps: &[DumpFile]) {
    for (index, dump) in dumps.iter().enumerate() {
        std::fs::write(
            directory.join(format!("{}.json", index)),
            dump.to_json().expect("Dump should serialize"),
        )
        .expect("Dump should be written");
    }
}

fn player_id(view: &FrameView) -> i32 {
    view.frame.players[0].id
}

/// Advance until exhaustion, returning (logical position, dump index, player id).
fn drain<S: DumpSource>(cursor: &mut FrameCursor<S>) -> Vec<(usize, usize, i32)> {
    let mut seen = Vec::new();
    while cursor.advance().unwrap() {
        let view = cursor.current().unwrap();
        seen.push((view.logical_position, view.dump_index, player_id(&view)));
    }
    seen
}

fn ball_positions<S: DumpSource>(cursor: &mut FrameCursor<S>) -> Vec<Option<Vec2>> {
    let mut positions = Vec::new();
    while let Some(view) = cursor.next_frame().unwrap() {
        positions.push(view.ball.position);
    }
    positions
}

fn handler<F>(f: F) -> F
where
    F: FnMut(&FrameView) -> ReplayResult<FrameControl>,
{
    f
}

fn assert_close(actual: Option<Vec2>, expected: Vec2) {
    let actual = actual.expect("Expected a ball position");
    assert!(
        actual.abs_diff_eq(expected, 1e-6),
        "{actual:?} != {expected:?}"
    );
}

#[test]
fn test_visits_every_frame_once_across_dump_files() {
    let directory = tempfile::tempdir().unwrap();
    write_dumps(directory.path(), &dumps_with_sizes(&[3, 1, 4]));

    let mut cursor = FrameCursor::open(directory.path());
    let seen = drain(&mut cursor);

    assert_eq!(
        seen,
        vec![
            (0, 0, 0),
            (1, 0, 1),
            (2, 0, 2),
            (3, 1, 100),
            (4, 2, 200),
            (5, 2, 201),
            (6, 2, 202),
            (7, 2, 203),
        ]
    );
    assert!(cursor.is_exhausted());
    assert_eq!(cursor.sequencer().dumps_loaded(), 3);
    assert_eq!(cursor.sequencer().frames_loaded(), 8);
}

#[test]
fn test_current_before_advance_fails() {
    let mut cursor = FrameCursor::new(MemoryDumps::new(dumps_with_sizes(&[2])));
    assert_eq!(cursor.state(), CursorState::Uninitialized);
    let error = cursor.current().unwrap_err();
    assert!(matches!(
        error.variant,
        ReplayErrorVariant::CursorNotPositioned
    ));
    assert_eq!(cursor.logical_position(), None);
}

#[test]
fn test_exhaustion_is_terminal() {
    let mut cursor = FrameCursor::new(MemoryDumps::new(dumps_with_sizes(&[2])));
    assert!(cursor.advance().unwrap());
    assert!(cursor.advance().unwrap());
    assert!(!cursor.advance().unwrap());
    assert!(!cursor.advance().unwrap());
    assert_eq!(cursor.state(), CursorState::Exhausted);
    assert!(matches!(
        cursor.current().unwrap_err().variant,
        ReplayErrorVariant::CursorExhausted
    ));
    assert_eq!(cursor.sequencer().dumps_loaded(), 1);
}

#[test]
fn test_single_dump_session() {
    let directory = tempfile::tempdir().unwrap();
    let config = ReplayConfig::default().with_project_location(directory.path());
    std::fs::create_dir(config.layout().dumps_dir()).unwrap();
    write_dumps(&config.layout().dumps_dir(), &dumps_with_sizes(&[5]));

    let mut cursor = FrameCursor::from_config(&config);
    assert_eq!(drain(&mut cursor).len(), 5);
    assert_eq!(cursor.sequencer().next_dump_index(), 1);
}

#[test]
fn test_empty_dumps_directory_ends_immediately() {
    let directory = tempfile::tempdir().unwrap();
    let mut cursor = FrameCursor::open(directory.path());
    assert!(!cursor.advance().unwrap());
    assert!(cursor.is_exhausted());
}

#[test]
fn test_empty_chunk_ends_session() {
    let mut cursor = FrameCursor::new(MemoryDumps::new(dumps_with_sizes(&[2, 0, 3])));
    let seen = drain(&mut cursor);
    assert_eq!(seen.len(), 2);
    assert!(cursor.is_exhausted());
}

#[test]
fn test_malformed_dump_is_fatal() {
    let directory = tempfile::tempdir().unwrap();
    write_dumps(directory.path(), &dumps_with_sizes(&[1]));
    std::fs::write(directory.path().join("1.json"), "{\"cameras\": 3}").unwrap();

    let mut cursor = FrameCursor::open(directory.path());
    assert!(cursor.advance().unwrap());
    let error = cursor.advance().unwrap_err();
    assert!(matches!(
        error.variant,
        ReplayErrorVariant::MalformedDump { .. }
    ));
    assert!(!cursor.advance().unwrap());
}

#[test]
fn test_ball_is_interpolated_between_samples() {
    let session = dump(vec![
        frame(0, None),
        frame(1, None),
        frame(2, Some([1.0, 1.0])),
        frame(3, None),
        frame(4, None),
        frame(5, Some([4.0, 4.0])),
    ]);
    let mut cursor = FrameCursor::new(MemoryDumps::new(vec![session]));
    let positions = ball_positions(&mut cursor);

    let (first, second) = (Vec2::new(1.0, 1.0), Vec2::new(4.0, 4.0));
    assert_eq!(positions.len(), 6);
    assert_eq!(positions[0], None);
    assert_eq!(positions[1], None);
    assert_eq!(positions[2], Some(first));
    assert_close(positions[3], first.lerp(second, 1.0 / 3.0));
    assert_close(positions[4], first.lerp(second, 2.0 / 3.0));
    assert_eq!(positions[5], Some(second));
}

#[test]
fn test_ball_view_reports_next_sample() {
    let session = dump(vec![
        frame(0, Some([0.0, 0.0])),
        frame(1, None),
        frame(2, Some([2.0, 0.0])),
    ]);
    let mut cursor = FrameCursor::new(MemoryDumps::new(vec![session]));

    let view = cursor.next_frame().unwrap().unwrap();
    assert_eq!(
        view.ball.next_sample,
        Some(BallSample::new(2, Vec2::new(2.0, 0.0)))
    );
    assert!(!view.ball.is_interpolated());

    let view = cursor.next_frame().unwrap().unwrap();
    assert!(view.ball.is_interpolated());
    assert_close(view.ball.position, Vec2::new(1.0, 0.0));
}

#[test]
fn test_interpolation_does_not_cross_dump_files() {
    let first = dump(vec![
        frame(0, Some([0.0, 0.0])),
        frame(1, None),
        frame(2, None),
    ]);
    let second = dump(vec![frame(100, Some([3.0, 3.0])), frame(101, None)]);
    let mut cursor = FrameCursor::new(MemoryDumps::new(vec![first, second]));

    assert_eq!(
        ball_positions(&mut cursor),
        vec![
            Some(Vec2::ZERO),
            None,
            None,
            Some(Vec2::new(3.0, 3.0)),
            None,
        ]
    );
}

#[test]
fn test_frame_key_gaps_do_not_add_frames() {
    let mut session = DumpFile {
        cameras: CameraTable::new(vec![vec![0.0, 0.0]]),
        ..DumpFile::default()
    };
    session.frames.insert(0, frame(0, Some([0.0, 0.0])));
    session.frames.insert(5, frame(5, None));
    session.frames.insert(9, frame(9, Some([2.0, 2.0])));
    let mut cursor = FrameCursor::new(MemoryDumps::new(vec![session]));

    let positions = ball_positions(&mut cursor);
    assert_eq!(positions.len(), 3);
    assert_close(positions[1], Vec2::new(1.0, 1.0));
}

#[test]
fn test_reset_keeps_resident_chunk_and_logical_position() {
    let mut cursor = FrameCursor::new(MemoryDumps::new(dumps_with_sizes(&[3, 2])));
    assert!(cursor.advance().unwrap());
    assert!(cursor.advance().unwrap());
    assert_eq!(cursor.logical_position(), Some(1));

    cursor.reset();
    assert_eq!(cursor.state(), CursorState::Positioned);
    assert_eq!(cursor.sequencer().next_dump_index(), 1);
    {
        let view = cursor.current().unwrap();
        assert_eq!(player_id(&view), 0);
        assert_eq!(view.logical_position, 1);
    }

    // The rest of the resident chunk, then straight on to dump 1.
    assert_eq!(drain(&mut cursor), vec![(2, 0, 1), (3, 0, 2), (4, 1, 100), (5, 1, 101)]);
}

#[test]
fn test_reset_on_first_frame_moves_on_to_next_dump() {
    let mut cursor = FrameCursor::new(MemoryDumps::new(dumps_with_sizes(&[2, 2])));
    assert!(cursor.advance().unwrap());
    cursor.reset();
    {
        let view = cursor.current().unwrap();
        assert_eq!(view.dump_index, 0);
        assert_eq!(player_id(&view), 0);
        assert_eq!(view.logical_position, 0);
    }

    // Dump 0 is not delivered a second time.
    assert_eq!(drain(&mut cursor), vec![(1, 0, 1), (2, 1, 100), (3, 1, 101)]);
    assert!(cursor.is_exhausted());
}

#[test]
fn test_reset_after_exhaustion_starts_over() {
    let mut cursor = FrameCursor::new(MemoryDumps::new(dumps_with_sizes(&[2])));
    assert_eq!(drain(&mut cursor).len(), 2);

    cursor.reset();
    assert_eq!(cursor.state(), CursorState::Uninitialized);
    assert_eq!(drain(&mut cursor), vec![(2, 0, 0), (3, 0, 1)]);
}

#[test]
fn test_process_with_closure_can_stop_early() {
    let mut cursor = FrameCursor::new(MemoryDumps::new(dumps_with_sizes(&[2, 2])));
    let mut ids = Vec::new();
    let mut stop_after_three = handler(|view| {
        ids.push(player_id(view));
        Ok(if ids.len() == 3 {
            FrameControl::Stop
        } else {
            FrameControl::Continue
        })
    });
    let handled = cursor.process(&mut stop_after_three).unwrap();
    assert_eq!(handled, 3);
    assert_eq!(ids, vec![0, 1, 100]);
    assert!(!cursor.is_exhausted());
}

#[test]
fn test_session_summary() {
    let first = dump(vec![
        frame(1, None),
        frame(2, Some([0.0, 0.0])),
        frame(1, None),
        frame(3, Some([3.0, 0.0])),
    ]);
    let second = dump(vec![frame(4, None)]);
    let mut cursor = FrameCursor::new(MemoryDumps::new(vec![first, second]));

    let summary = SessionSummaryCollector::new()
        .summarize(&mut cursor)
        .unwrap();
    assert_eq!(summary.frame_count, 5);
    assert_eq!(summary.dump_indices, vec![0, 1]);
    assert_eq!(
        summary.player_ids.iter().cloned().collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
    assert_eq!(summary.max_players_in_frame, 1);
    assert_eq!(summary.ball_samples, 2);
    assert_eq!(summary.interpolated_frames, 1);
    assert_eq!(summary.frames_without_ball, 2);
    assert_eq!(summary.last_logical_position, Some(4));
    assert!(summary.as_json().unwrap().contains("\"frame_count\": 5"));
}

#[test]
fn test_session_summary_limit() {
    let mut cursor = FrameCursor::new(MemoryDumps::new(dumps_with_sizes(&[4, 4])));
    let summary = SessionSummaryCollector::with_limit(6)
        .summarize(&mut cursor)
        .unwrap();
    assert_eq!(summary.frame_count, 6);
    assert_eq!(summary.dump_indices, vec![0, 1]);
}

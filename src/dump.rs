use crate::*;
use glam::{Mat3, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Row-major nested numeric array as written by the tracking pipeline.
pub type Matrix = Vec<Vec<f32>>;

/// Per-camera position vectors, indexed by camera id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CameraTable(Vec<Vec<f32>>);

impl CameraTable {
    pub fn new(positions: Vec<Vec<f32>>) -> Self {
        Self(positions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, camera_id: usize) -> Option<&[f32]> {
        self.0.get(camera_id).map(|v| &v[..])
    }

    /// The first two components of the camera position, the plane the ball
    /// and player positions live in.
    pub fn planar_position(&self, camera_id: usize) -> Option<Vec2> {
        self.get(camera_id).and_then(planar)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f32]> {
        self.0.iter().map(|v| &v[..])
    }
}

/// Body pose and shape payload of one player observation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseDump {
    #[serde(default)]
    pub verts: Vec<Matrix>,
    #[serde(default)]
    pub pose: Vec<Vec<Matrix>>,
    #[serde(default)]
    pub betas: Vec<Vec<f32>>,
    #[serde(default)]
    pub joints3d: Vec<Matrix>,
    #[serde(default)]
    pub smpl_joints2d: Vec<Matrix>,
}

impl PoseDump {
    /// Number of bones in the first pose entry.
    pub fn bone_count(&self) -> usize {
        self.pose.first().map(|bones| bones.len()).unwrap_or(0)
    }

    /// Per-bone rotation matrices of the first pose entry, in
    /// [`BONE_NAMES`] order. Returns `None` if there is no pose or any bone
    /// is not a 3x3 matrix.
    pub fn bone_rotations(&self) -> Option<Vec<Mat3>> {
        self.pose.first()?.iter().map(matrix_to_glam).collect()
    }

    /// Shape coefficients of the first betas entry.
    pub fn shape_coefficients(&self) -> &[f32] {
        self.betas.first().map(|b| &b[..]).unwrap_or(&[])
    }
}

fn matrix_to_glam(rows: &Matrix) -> Option<Mat3> {
    match &rows[..] {
        [r0, r1, r2] if r0.len() == 3 && r1.len() == 3 && r2.len() == 3 => {
            Some(Mat3::from_cols_array_2d(&[
                [r0[0], r0[1], r0[2]],
                [r1[0], r1[1], r1[2]],
                [r2[0], r2[1], r2[2]],
            ])
            .transpose())
        }
        _ => None,
    }
}

fn planar(values: &[f32]) -> Option<Vec2> {
    match values {
        [x, y, ..] => Some(Vec2::new(*x, *y)),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerObservation {
    pub id: i32,
    pub camera_id: usize,
    #[serde(default)]
    pub pose: PoseDump,
    pub position: Vec<f32>,
}

impl PlayerObservation {
    pub fn planar_position(&self) -> Option<Vec2> {
        planar(&self.position)
    }

    /// Position of the camera this observation was taken from.
    pub fn camera_position(&self, cameras: &CameraTable) -> Option<Vec2> {
        cameras.planar_position(self.camera_id)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub ball_position: Option<Vec<f32>>,
    #[serde(default)]
    pub players: Vec<PlayerObservation>,
}

impl Frame {
    /// The ball position observed in this frame, if the ball was detected.
    pub fn ball_sample(&self) -> Option<Vec2> {
        self.ball_position.as_deref().and_then(planar)
    }

    pub fn player(&self, player_id: i32) -> Option<&PlayerObservation> {
        self.players.iter().find(|p| p.id == player_id)
    }
}

/// The on-disk record of a single dump file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DumpFile {
    pub cameras: CameraTable,
    pub frames: BTreeMap<i64, Frame>,
}

impl DumpFile {
    pub fn to_json(&self) -> ReplayResult<String> {
        serde_json::to_string(self).map_err(|e| {
            ReplayError::new(ReplayErrorVariant::MalformedDump {
                dump: "<in memory>".to_string(),
                message: e.to_string(),
            })
        })
    }
}

/// The materialized content of one dump file, frames in ascending key order.
#[derive(Debug, Clone, PartialEq)]
pub struct DumpChunk {
    pub index: usize,
    pub cameras: CameraTable,
    pub frames: Vec<Frame>,
    pub frame_keys: Vec<i64>,
}

impl DumpChunk {
    pub fn from_dump_file(index: usize, file: DumpFile, label: &str) -> ReplayResult<Self> {
        validate_dump(&file, label)?;
        let (frame_keys, frames): (Vec<i64>, Vec<Frame>) = file.frames.into_iter().unzip();
        Ok(Self {
            index,
            cameras: file.cameras,
            frames,
            frame_keys,
        })
    }

    pub fn from_slice(index: usize, data: &[u8], label: &str) -> ReplayResult<Self> {
        let file: DumpFile = serde_json::from_slice(data).map_err(|e| {
            ReplayError::new(ReplayErrorVariant::MalformedDump {
                dump: label.to_string(),
                message: e.to_string(),
            })
        })?;
        Self::from_dump_file(index, file, label)
    }

    /// Rebuild the on-disk record, keyed by the original frame keys.
    pub fn to_dump_file(&self) -> DumpFile {
        DumpFile {
            cameras: self.cameras.clone(),
            frames: self
                .frame_keys
                .iter()
                .cloned()
                .zip(self.frames.iter().cloned())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, frame_index: usize) -> Option<&Frame> {
        self.frames.get(frame_index)
    }
}

fn validate_dump(file: &DumpFile, label: &str) -> ReplayResult<()> {
    for (camera_id, position) in file.cameras.iter().enumerate() {
        if position.len() < 2 {
            return ReplayError::new_result(ReplayErrorVariant::ShortCameraPosition {
                dump: label.to_string(),
                camera_id,
                len: position.len(),
            });
        }
    }
    for (frame_key, frame) in file.frames.iter() {
        if let Some(ball_position) = &frame.ball_position {
            if ball_position.len() < 2 {
                return ReplayError::new_result(ReplayErrorVariant::ShortBallPosition {
                    dump: label.to_string(),
                    frame_key: *frame_key,
                    len: ball_position.len(),
                });
            }
        }
        if let Some(player) = frame
            .players
            .iter()
            .find(|p| p.camera_id >= file.cameras.len())
        {
            return ReplayError::new_result(ReplayErrorVariant::UnknownCameraId {
                dump: label.to_string(),
                frame_key: *frame_key,
                player_id: player.id,
                camera_id: player.camera_id,
                camera_count: file.cameras.len(),
            });
        }
    }
    Ok(())
}

/// Parse the dump file at `path`. A file that does not exist yields
/// `Ok(None)`, which callers treat as the end of the session.
pub fn parse_dump<P: AsRef<Path>>(index: usize, path: P) -> ReplayResult<Option<DumpChunk>> {
    let path = path.as_ref();
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return ReplayError::new_result(ReplayErrorVariant::DumpIo {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    };
    DumpChunk::from_slice(index, &data, &path.display().to_string()).map(Some)
}

pub static DUMPS_FOLDER: &str = "dumps";
pub static TEXTURES_FOLDER: &str = "textures";
pub static DUMP_EXTENSION: &str = "json";
pub static PITCH_TEXTURE_FILE: &str = "pitch.jpg";
pub static PLAYER_TEXTURE_PREFIX: &str = "player_";
pub static PLAYER_TEXTURE_EXTENSION: &str = "png";

/// Milliseconds between two frame advances when playback is paced.
pub static DEFAULT_FRAME_INTERVAL_MS: u64 = 100;

/// SMPL joint order used by the per-bone rotation matrices in a pose dump.
pub static BONE_NAMES: [&str; 24] = [
    "Pelvis",
    "L_Hip",
    "R_Hip",
    "Spine1",
    "L_Knee",
    "R_Knee",
    "Spine2",
    "L_Ankle",
    "R_Ankle",
    "Spine3",
    "L_Foot",
    "R_Foot",
    "Neck",
    "L_Collar",
    "R_Collar",
    "Head",
    "L_Shoulder",
    "R_Shoulder",
    "L_Elbow",
    "R_Elbow",
    "L_Wrist",
    "R_Wrist",
    "L_Hand",
    "R_Hand",
];

pub fn bone_name(index: usize) -> Option<&'static str> {
    BONE_NAMES.get(index).copied()
}

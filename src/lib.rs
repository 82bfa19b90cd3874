mod collector;
mod config;
mod constants;
mod cursor;
mod dump;
mod error;
mod interpolation;
mod playback;
mod sequencer;


pub use crate::collector::*;
pub use crate::config::*;
pub use crate::constants::*;
pub use crate::cursor::*;
pub use crate::dump::*;
pub use crate::error::*;
pub use crate::interpolation::*;
pub use crate::playback::*;
pub use crate::sequencer::*;

#[macro_use]
extern crate derive_new;

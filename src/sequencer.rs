use crate::*;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Where numbered dumps come from. Returning `Ok(None)` for an index means
/// the dump does not exist, which ends the session.
pub trait DumpSource {
    fn load_dump(&mut self, index: usize) -> ReplayResult<Option<DumpChunk>>;

    /// Human readable name of the dump at `index`, used in logs and errors.
    fn describe(&self, index: usize) -> String;
}

/// Dumps stored as `{index}.{extension}` files in one directory.
#[derive(Debug, Clone)]
pub struct DumpDirectory {
    directory: PathBuf,
    extension: String,
}

impl DumpDirectory {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
            extension: DUMP_EXTENSION.to_string(),
        }
    }

    pub fn with_extension<E: Into<String>>(mut self, extension: E) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn dump_path(&self, index: usize) -> PathBuf {
        self.directory.join(format!("{}.{}", index, self.extension))
    }
}

impl DumpSource for DumpDirectory {
    fn load_dump(&mut self, index: usize) -> ReplayResult<Option<DumpChunk>> {
        parse_dump(index, self.dump_path(index))
    }

    fn describe(&self, index: usize) -> String {
        self.dump_path(index).display().to_string()
    }
}

/// Dump files that are already in memory, in session order.
#[derive(Debug, Clone, Default)]
pub struct MemoryDumps {
    dumps: Vec<DumpFile>,
}

impl MemoryDumps {
    pub fn new(dumps: Vec<DumpFile>) -> Self {
        Self { dumps }
    }

    pub fn push(&mut self, dump: DumpFile) {
        self.dumps.push(dump);
    }
}

impl DumpSource for MemoryDumps {
    fn load_dump(&mut self, index: usize) -> ReplayResult<Option<DumpChunk>> {
        self.dumps
            .get(index)
            .cloned()
            .map(|dump| DumpChunk::from_dump_file(index, dump, &self.describe(index)))
            .transpose()
    }

    fn describe(&self, index: usize) -> String {
        format!("memory dump {}", index)
    }
}

/// Loads dumps 0, 1, 2, ... on demand, keeping exactly one resident.
pub struct DumpSequencer<S = DumpDirectory> {
    source: S,
    next_dump_index: usize,
    chunk: Option<DumpChunk>,
    dumps_loaded: usize,
    frames_loaded: usize,
}

impl<S: DumpSource> DumpSequencer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            next_dump_index: 0,
            chunk: None,
            dumps_loaded: 0,
            frames_loaded: 0,
        }
    }

    /// Replace the resident chunk with the next numbered dump. Returns
    /// `Ok(false)` when that dump does not exist, in which case no chunk is
    /// resident afterwards.
    pub fn load_next(&mut self) -> ReplayResult<bool> {
        let index = self.next_dump_index;
        self.chunk = None;
        info!("Loading dump: {}...", self.source.describe(index));
        match self.source.load_dump(index)? {
            Some(chunk) => {
                info!(
                    "Dump {} loaded with {} frames",
                    self.source.describe(index),
                    chunk.len()
                );
                self.dumps_loaded += 1;
                self.frames_loaded += chunk.len();
                self.chunk = Some(chunk);
                self.next_dump_index += 1;
                Ok(true)
            }
            None => {
                debug!("Dump {} does not exist", self.source.describe(index));
                Ok(false)
            }
        }
    }

    pub fn chunk(&self) -> Option<&DumpChunk> {
        self.chunk.as_ref()
    }

    pub fn next_dump_index(&self) -> usize {
        self.next_dump_index
    }

    /// Treat dump 0 as the resident dump without touching the resident
    /// chunk, so the next load is dump 1. With nothing resident the next
    /// load is dump 0.
    pub fn rewind(&mut self) {
        self.next_dump_index = if self.chunk.is_some() { 1 } else { 0 };
    }

    pub fn dumps_loaded(&self) -> usize {
        self.dumps_loaded
    }

    pub fn frames_loaded(&self) -> usize {
        self.frames_loaded
    }
}

//! Replaces the source's UUID-keyed filesystem mailboxes and process-global
//! paths with an explicit session object: a working directory plus a
//! message-bus handle, passed into every operation that needs them instead
//! of being reached for globally.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::bus::{MessageBus, RedisBus};

pub struct RunSession<B: MessageBus> {
    pub run_uuid: Uuid,
    pub working_dir: PathBuf,
    pub bus: B,
}

impl RunSession<RedisBus> {
    pub fn connect(redis_url: &str, run_uuid: Uuid, working_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        Ok(Self {
            run_uuid,
            working_dir: working_dir.into(),
            bus: RedisBus::connect(redis_url)?,
        })
    }
}

impl<B: MessageBus> RunSession<B> {
    pub fn new(run_uuid: Uuid, working_dir: impl Into<PathBuf>, bus: B) -> Self {
        Self {
            run_uuid,
            working_dir: working_dir.into(),
            bus,
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::consts::VERBOSE_ENV;
use crate::error::SpawnError;

use super::{PrefetchRequest, Prefetcher};

/// Re-executes the current binary as a detached worker process
#[derive(Debug, Clone)]
pub(crate) struct ProcessPrefetcher {
    exe: Option<PathBuf>,
    /// Env-file values the worker would not otherwise inherit
    forwarded_env: Vec<(String, String)>,
}

impl ProcessPrefetcher {
    pub(crate) fn new(exe: Option<PathBuf>, forwarded_env: Vec<(String, String)>) -> Self {
        Self { exe, forwarded_env }
    }

    fn command(&self, request: &PrefetchRequest<'_>) -> Result<Command, SpawnError> {
        let exe = self.exe.as_deref().ok_or(SpawnError::NoExecutable)?;

        let mut cmd = Command::new(exe);
        cmd.args(request.worker_args())
            .envs(self.forwarded_env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .env(VERBOSE_ENV, request.verbose.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = exe.parent().filter(|d| !d.as_os_str().is_empty()) {
            cmd.current_dir(dir);
        }

        // Own process group: a Ctrl-C aimed at the shell's foreground job
        // does not reach the worker.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        Ok(cmd)
    }
}

impl Prefetcher for ProcessPrefetcher {
    fn start(&self, request: &PrefetchRequest<'_>) -> Result<u32, SpawnError> {
        let child = self.command(request)?.spawn().map_err(SpawnError::Spawn)?;
        // Dropping the handle neither waits for nor kills the child.
        Ok(child.id())
    }
}

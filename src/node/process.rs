//! Dev node child process.

use std::path::Path;
use std::process::Child;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;

use crate::{debug, utils::exec::Cmd};

/// A running `--dev --tmp` node. Killed and reaped on drop, or by the
/// interrupt handler if the command is cut short.
pub struct NodeProcess {
    child: Arc<Mutex<Child>>,
    pid: u32,
    rpc_port: u16,
}

impl NodeProcess {
    pub fn spawn(binary: &Path, rpc_port: u16) -> Result<Self> {
        let child = Cmd::new(binary)
            .args(["--dev", "--tmp", "--rpc-port"])
            .arg(rpc_port.to_string())
            .spawn()?;
        let pid = child.id();
        debug!("node"; "spawned {} (pid {}) on port {}", binary.display(), pid, rpc_port);

        let child = Arc::new(Mutex::new(child));
        crate::core::register_child(&child);
        Ok(Self {
            child,
            pid,
            rpc_port,
        })
    }

    pub fn rpc_port(&self) -> u16 {
        self.rpc_port
    }

    pub fn id(&self) -> u32 {
        self.pid
    }
}

impl Drop for NodeProcess {
    fn drop(&mut self) {
        let mut child = self.child.lock();
        let _ = child.kill();
        let _ = child.wait();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    #[test]
    fn test_spawn_passes_dev_flags_and_kills_on_drop() {
        let temp = TempDir::new().unwrap();
        let args_file = temp.path().join("args");
        let script = temp.path().join("node");
        fs::write(
            &script,
            format!("#!/bin/sh\necho \"$@\" > {}\nexec sleep 30\n", args_file.display()),
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let node = NodeProcess::spawn(&script, 9955).unwrap();
        assert_eq!(node.rpc_port(), 9955);

        let mut args = String::new();
        for _ in 0..100 {
            args = fs::read_to_string(&args_file).unwrap_or_default();
            if args.ends_with('\n') {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        assert_eq!(args.trim(), "--dev --tmp --rpc-port 9955");

        let pid = node.id();
        drop(node);
        // reaped: the pid no longer has a /proc entry on Linux
        #[cfg(target_os = "linux")]
        assert!(!Path::new(&format!("/proc/{pid}")).exists());
        let _ = pid;
    }

    #[test]
    fn test_spawn_missing_binary_is_error() {
        assert!(NodeProcess::spawn(Path::new("/nonexistent/node"), 9944).is_err());
    }
}

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::Result;
use sysinfo::{get_current_pid, Signal, System};

use super::daemon_path::to_daemon_path;

pub fn daemon_executable() -> PathBuf {
    to_daemon_path(env::current_exe().expect("Can't operate without an executable"))
}

pub fn kill_previous_daemons(name: &Path) {
    let system = System::new_all();
    let current_id = get_current_pid().unwrap();
    for (pid, process) in system.processes().iter() {
        if *pid == current_id {
            continue;
        }
        if matches!(process.parent(), Some(p) if p == current_id) {
            continue;
        }

        if process
            .exe()
            .filter(|v| v.exists())
            .filter(|v| name == *v)
            .is_some()
        {
            // This will forcefully terminate the process on Windows. Anything better will require a
            // lot more work.
            if process.kill_with(Signal::Term).is_none() {
                process.kill();
            }
            process.wait();
        }
    }
}

/// Shuts down any previous daemon and starts a fresh one. The daemon binary
/// detaches itself, so a plain spawn is enough on this side.
pub fn restart_daemon(dir: Option<PathBuf>) -> Result<()> {
    let daemon = daemon_executable();
    kill_previous_daemons(&daemon);

    let mut command = std::process::Command::new(daemon);
    if let Some(dir) = dir {
        command.arg("--dir");
        command.arg(dir);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        use std::process::Stdio;
        command.process_group(0);
        command.stdin(Stdio::null());
        command.stdout(Stdio::null());
    }

    println!("Spawning");
    #[allow(clippy::zombie_processes)]
    let _ = command.spawn()?;
    println!("Success");
    Ok(())
}

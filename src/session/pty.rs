//! PTY plumbing: pseudo-terminal allocation, descriptor flags, window
//! size updates, and the child spawn contract.

use std::io;
use std::os::fd::{AsRawFd, BorrowedFd, OwnedFd};
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use nix::pty::openpty;
use nix::sys::termios::Termios;

use crate::config::SessionConfig;

/// Allocate a PTY pair with the given initial window size.
pub(super) fn open_pair(rows: u16, cols: u16) -> io::Result<(OwnedFd, OwnedFd)> {
    let winsize = libc::winsize {
        ws_row: rows,
        ws_col: cols,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let pair = openpty(Some(&winsize), None::<&Termios>).map_err(io::Error::from)?;
    Ok((pair.master, pair.slave))
}

/// Put the master into non-blocking mode and mark it close-on-exec so the
/// child never inherits it.
#[allow(unsafe_code)]
pub(super) fn prepare_master(master: &OwnedFd) -> io::Result<()> {
    let fd = master.as_raw_fd();
    // SAFETY: plain fcntl on a descriptor we own; no memory is involved.
    unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFL);
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        if libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) < 0 {
            return Err(io::Error::last_os_error());
        }
        if libc::fcntl(fd, libc::F_SETFD, libc::FD_CLOEXEC) < 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

/// Push a new window size to the kernel side of the PTY. The child learns
/// about it via SIGWINCH.
#[allow(unsafe_code)]
pub(super) fn set_window_size(master: BorrowedFd<'_>, rows: u16, cols: u16) -> io::Result<()> {
    let winsize = libc::winsize {
        ws_row: rows,
        ws_col: cols,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    // SAFETY: TIOCSWINSZ reads the winsize struct, which outlives the call.
    let res = unsafe { libc::ioctl(master.as_raw_fd(), libc::TIOCSWINSZ as _, &winsize) };
    if res < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Spawn the configured shell as the PTY's child.
///
/// The child gets its own session with the slave as controlling terminal,
/// stdio dup'd onto the slave, the configured working directory, a
/// `TERM`/`LANG` baseline under the caller's environment overrides, and a
/// login-shell `argv[0]` (`-zsh` style). Descriptors above the stdio trio
/// are close-on-exec and do not survive into the shell.
#[allow(unsafe_code)]
pub(super) fn spawn_shell(config: &SessionConfig, slave: OwnedFd) -> io::Result<Child> {
    let shell = config.resolve_shell();
    let shell_name = Path::new(&shell)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("sh")
        .to_owned();

    let mut cmd = Command::new(&shell);
    cmd.args(&config.shell_args);
    cmd.arg0(format!("-{shell_name}"));

    cmd.env("TERM", "xterm-256color");
    cmd.env("LANG", "en_US.UTF-8");
    for (key, value) in &config.env {
        cmd.env(key, value);
    }

    if let Some(dir) = &config.working_dir {
        cmd.current_dir(dir);
    }

    cmd.stdin(Stdio::from(slave.try_clone()?));
    cmd.stdout(Stdio::from(slave.try_clone()?));
    cmd.stderr(Stdio::from(slave));

    // SAFETY: the hook runs between fork and exec and only performs
    // async-signal-safe syscalls.
    unsafe {
        cmd.pre_exec(|| {
            if libc::setsid() < 0 {
                return Err(io::Error::last_os_error());
            }
            // stdin is the slave; adopt it as the controlling terminal.
            if libc::ioctl(0, libc::TIOCSCTTY as _, 0) < 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        });
    }

    cmd.spawn()
}

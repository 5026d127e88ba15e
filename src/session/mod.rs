//! PTY session supervisor.
//!
//! Owns the child shell, the master descriptor, and the reader thread that
//! pumps PTY output into the parser. The shared `Term` is the hand-off
//! point: the reader parses into it in arrival order, the host locks it to
//! read the grid. Writes to the PTY are serialized through one writer
//! handle, so each `write_input` call is atomic with respect to others.

mod pty;

use std::fs::File;
use std::io::{self, ErrorKind, Read, Write};
use std::os::fd::{AsFd, OwnedFd};
use std::process::Child;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{info, warn};
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use parking_lot::Mutex;
use thiserror::Error;

use crate::config::SessionConfig;
use crate::event::{Event, EventListener};
use crate::parser::Processor;
use crate::term::Term;

/// PTY reads drain in chunks of this size.
const READ_BUFFER_SIZE: usize = 8192;

/// How long the reader sleeps in poll before re-checking the running flag,
/// in milliseconds.
const READER_POLL_INTERVAL_MS: u8 = 100;

/// Grace period between SIGTERM and SIGKILL during stop.
const STOP_GRACE: Duration = Duration::from_millis(100);

/// Session errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The PTY open syscall was refused.
    #[error("failed to open pty: {0}")]
    OpenFailed(#[source] io::Error),
    /// The child could not be spawned.
    #[error("failed to spawn shell: {0}")]
    ForkFailed(#[source] io::Error),
    /// `start` was called on a running session.
    #[error("session is already running")]
    AlreadyRunning,
    /// The operation requires a running session.
    #[error("session is not running")]
    NotRunning,
    /// A non-retriable write-side failure.
    #[error("pty i/o error: {0}")]
    Io(#[from] io::Error),
}

/// A terminal session: one shell child on one PTY, feeding one `Term`.
///
/// Multiple sessions coexist in a process without shared state.
pub struct Session<T: EventListener + Clone> {
    config: SessionConfig,
    listener: T,
    term: Arc<Mutex<Term<T>>>,
    running: Arc<AtomicBool>,
    master: Option<OwnedFd>,
    writer: Option<Arc<Mutex<File>>>,
    child: Arc<Mutex<Option<Child>>>,
    reader: Option<JoinHandle<()>>,
}

impl<T: EventListener + Clone> Session<T> {
    /// Create a session. No resources are acquired until [`Session::start`].
    pub fn new(config: SessionConfig, listener: T) -> Self {
        let term = Term::new(
            config.rows as usize,
            config.cols as usize,
            config.max_scrollback,
            listener.clone(),
        );
        Self {
            config,
            listener,
            term: Arc::new(Mutex::new(term)),
            running: Arc::new(AtomicBool::new(false)),
            master: None,
            writer: None,
            child: Arc::new(Mutex::new(None)),
            reader: None,
        }
    }

    /// Shared handle to the terminal state. Lock it to read the grid,
    /// cursor, and dirty rows.
    pub fn term(&self) -> &Arc<Mutex<Term<T>>> {
        &self.term
    }

    /// Whether a child is currently attached.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Open the PTY, spawn the shell, and start the reader.
    pub fn start(&mut self) -> Result<(), Error> {
        if self.is_running() {
            return Err(Error::AlreadyRunning);
        }

        let (master, slave) =
            pty::open_pair(self.config.rows, self.config.cols).map_err(Error::OpenFailed)?;
        pty::prepare_master(&master).map_err(Error::OpenFailed)?;

        let child = pty::spawn_shell(&self.config, slave).map_err(Error::ForkFailed)?;
        info!("spawned shell (pid {})", child.id());
        *self.child.lock() = Some(child);

        let writer = Arc::new(Mutex::new(File::from(
            master.try_clone().map_err(Error::OpenFailed)?,
        )));
        let reader_file = File::from(master.try_clone().map_err(Error::OpenFailed)?);

        self.running.store(true, Ordering::SeqCst);
        self.reader = Some(spawn_reader(
            reader_file,
            Arc::clone(&self.term),
            Arc::clone(&self.running),
            Arc::clone(&self.child),
            self.listener.clone(),
        ));

        self.writer = Some(writer);
        self.master = Some(master);
        Ok(())
    }

    /// Stop the session: signal the reader down, terminate and reap the
    /// child, and close the master. Idempotent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(mut child) = self.child.lock().take() {
            let pid = Pid::from_raw(child.id() as i32);
            let _ = kill(pid, Signal::SIGTERM);

            let deadline = Instant::now() + STOP_GRACE;
            let mut status = None;
            while Instant::now() < deadline {
                match child.try_wait() {
                    Ok(Some(s)) => {
                        status = Some(s);
                        break;
                    }
                    Ok(None) => thread::sleep(Duration::from_millis(10)),
                    Err(_) => break,
                }
            }

            let status = match status {
                Some(status) => Ok(status),
                None => {
                    let _ = child.kill();
                    child.wait()
                }
            };
            let code = status.map_or(-1, exit_code);
            info!("shell stopped with code {code}");
            self.listener.send_event(Event::ChildExit(code));
        }

        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
        self.writer = None;
        // Dropping the last descriptor closes the PTY.
        self.master = None;
    }

    /// Write caller bytes to the PTY. `\n` is translated to `\r` (the Enter
    /// convention on the wire). Blocks while the kernel applies
    /// backpressure; transient interruptions are retried.
    pub fn write_input(&self, bytes: &[u8]) -> Result<(), Error> {
        if !self.is_running() {
            return Err(Error::NotRunning);
        }
        let writer = self.writer.as_ref().ok_or(Error::NotRunning)?;

        let translated: Vec<u8> = bytes
            .iter()
            .map(|&b| if b == b'\n' { b'\r' } else { b })
            .collect();

        let mut file = writer.lock();
        let mut remaining: &[u8] = &translated;
        while !remaining.is_empty() {
            match file.write(remaining) {
                Ok(0) => {
                    return Err(Error::Io(io::Error::new(
                        ErrorKind::WriteZero,
                        "pty accepted no bytes",
                    )));
                }
                Ok(n) => remaining = &remaining[n..],
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    wait_writable(&file)?;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(Error::Io(e)),
            }
        }
        Ok(())
    }

    /// Resize the terminal. The grid is reshaped first so bytes the child
    /// emits in response to SIGWINCH land in a grid of the right size.
    pub fn resize(&self, rows: u16, cols: u16) -> Result<(), Error> {
        if !self.is_running() {
            return Err(Error::NotRunning);
        }
        let master = self.master.as_ref().ok_or(Error::NotRunning)?;

        self.term.lock().resize(rows as usize, cols as usize);
        pty::set_window_size(master.as_fd(), rows, cols)?;
        Ok(())
    }

    /// Deliver a signal to the child.
    pub fn signal(&self, sig: i32) -> Result<(), Error> {
        if !self.is_running() {
            return Err(Error::NotRunning);
        }
        let guard = self.child.lock();
        let child = guard.as_ref().ok_or(Error::NotRunning)?;
        let signal =
            Signal::try_from(sig).map_err(|e| Error::Io(io::Error::from(e)))?;
        kill(Pid::from_raw(child.id() as i32), signal).map_err(|e| Error::Io(io::Error::from(e)))
    }
}

impl<T: EventListener + Clone> Drop for Session<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Child exit status as an i32: the exit code, or -1 when signaled.
fn exit_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

/// Block until the writer descriptor accepts more bytes.
fn wait_writable(file: &File) -> io::Result<()> {
    loop {
        let mut fds = [PollFd::new(file.as_fd(), PollFlags::POLLOUT)];
        match poll(&mut fds, PollTimeout::NONE) {
            Ok(_) => return Ok(()),
            Err(nix::errno::Errno::EINTR) => {}
            Err(e) => return Err(io::Error::from(e)),
        }
    }
}

/// The reader context: drain the master in chunks, feed the parser in
/// arrival order, reap the child on EOF.
fn spawn_reader<T: EventListener + Clone>(
    mut file: File,
    term: Arc<Mutex<Term<T>>>,
    running: Arc<AtomicBool>,
    child: Arc<Mutex<Option<Child>>>,
    listener: T,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("pty-reader".into())
        .spawn(move || {
            let mut parser = Processor::new();
            let mut buf = [0u8; READ_BUFFER_SIZE];
            // Set when the child side is gone (EOF or read error). A stop()
            // shutdown leaves this false and owns the reap itself.
            let mut child_gone = false;

            while running.load(Ordering::SeqCst) {
                match file.read(&mut buf) {
                    Ok(0) => {
                        child_gone = true;
                        break;
                    }
                    Ok(n) => {
                        parser.advance(&mut *term.lock(), &buf[..n]);
                        listener.send_event(Event::Wakeup);
                    }
                    Err(e) if e.kind() == ErrorKind::WouldBlock => {
                        let mut fds = [PollFd::new(file.as_fd(), PollFlags::POLLIN)];
                        match poll(&mut fds, PollTimeout::from(READER_POLL_INTERVAL_MS)) {
                            Ok(_) | Err(nix::errno::Errno::EINTR) => {}
                            Err(e) => {
                                warn!("pty poll failed: {e}");
                                child_gone = true;
                                break;
                            }
                        }
                    }
                    Err(e) if e.kind() == ErrorKind::Interrupted => {}
                    Err(e) => {
                        // EIO is the normal end-of-session on Linux PTYs.
                        if e.raw_os_error() != Some(libc::EIO) {
                            warn!("pty read failed: {e}");
                        }
                        child_gone = true;
                        break;
                    }
                }
            }

            // The grid keeps the contents as of the last parsed byte.
            if child_gone {
                if let Some(mut child) = child.lock().take() {
                    let code = child.wait().map_or(-1, exit_code);
                    info!("shell exited with code {code}");
                    listener.send_event(Event::ChildExit(code));
                }
                running.store(false, Ordering::SeqCst);
            }
        })
        .expect("failed to spawn pty reader thread")
}

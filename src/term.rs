//! Raw terminal access
//!
//! [`TerminalGuard`] switches stdin to raw mode, enters the alternate screen
//! and hides the cursor. Dropping the guard restores all three, so the
//! terminal is usable again after errors and unwinding panics.

use std::io::{self, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};

use log::{debug, warn};
use nix::poll::{poll, PollFd, PollFlags};
use nix::sys::termios::{self, LocalFlags, SetArg, SpecialCharacterIndices, Termios};
use nix::unistd;

const ENTER_ALT_SCREEN: &str = "\x1b[?1049h";
const LEAVE_ALT_SCREEN: &str = "\x1b[?1049l";
const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";

fn nix_to_io(e: nix::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

/// RAII guard for raw mode and the alternate screen
pub struct TerminalGuard {
    original: Termios,
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen
    pub fn new() -> io::Result<Self> {
        let original = termios::tcgetattr(io::stdin()).map_err(nix_to_io)?;

        let mut raw = original.clone();

        // Disable canonical mode, echo and signal keys (Ctrl-C arrives as a byte)
        raw.local_flags.remove(LocalFlags::ICANON);
        raw.local_flags.remove(LocalFlags::ECHO);
        raw.local_flags.remove(LocalFlags::ISIG);
        raw.local_flags.remove(LocalFlags::IEXTEN);

        // Block until at least one byte is available
        raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
        raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;

        termios::tcsetattr(io::stdin(), SetArg::TCSANOW, &raw).map_err(nix_to_io)?;

        let guard = Self { original };
        let mut stdout = io::stdout();
        write!(stdout, "{}{}", ENTER_ALT_SCREEN, HIDE_CURSOR)?;
        stdout.flush()?;

        debug!("Terminal in raw mode");
        Ok(guard)
    }

    /// Read whatever bytes are available, blocking for at least one
    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        read_fd(io::stdin().as_raw_fd(), buf)
    }

    /// Wait up to `timeout_ms` for input. Returns true when stdin is readable.
    pub fn poll_input(&self, timeout_ms: i32) -> io::Result<bool> {
        let stdin = io::stdin();
        poll_fd(stdin.as_fd(), timeout_ms)
    }
}

/// Unbuffered read, so nothing is held back from [`poll_fd`]
fn read_fd(fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match unistd::read(fd, buf) {
            Ok(n) => return Ok(n),
            Err(nix::errno::Errno::EINTR) => continue,
            Err(e) => return Err(nix_to_io(e)),
        }
    }
}

fn poll_fd(fd: BorrowedFd<'_>, timeout_ms: i32) -> io::Result<bool> {
    let mut fds = [PollFd::new(&fd, PollFlags::POLLIN)];
    match poll(&mut fds, timeout_ms) {
        Ok(n) => Ok(n > 0),
        Err(nix::errno::Errno::EINTR) => Ok(false),
        Err(e) => Err(nix_to_io(e)),
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = write!(stdout, "\x1b[0m{}{}", SHOW_CURSOR, LEAVE_ALT_SCREEN);
        let _ = stdout.flush();
        if let Err(e) = termios::tcsetattr(io::stdin(), SetArg::TCSANOW, &self.original) {
            warn!("Failed to restore terminal mode: {}", e);
        }
    }
}

/// Terminal size as (columns, rows), if stdout is a terminal
pub fn window_size() -> Option<(u16, u16)> {
    let mut ws = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };

    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some((ws.ws_col, ws.ws_row))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::net::UnixStream;

    #[test]
    fn test_unread_bytes_stay_visible_to_poll() {
        let (mut tx, rx) = UnixStream::pair().unwrap();
        let mut data = vec![b'z'; 2000];
        data.extend_from_slice(b"\x1b[C");
        tx.write_all(&data).unwrap();

        let mut buf = [0u8; 1024];
        let n = read_fd(rx.as_raw_fd(), &mut buf).unwrap();
        assert_eq!(n, 1024);
        assert!(poll_fd(rx.as_fd(), 0).unwrap());

        let mut rest = Vec::new();
        while rest.len() < data.len() - n {
            let m = read_fd(rx.as_raw_fd(), &mut buf).unwrap();
            rest.extend_from_slice(&buf[..m]);
        }
        assert!(rest.ends_with(b"\x1b[C"));
        assert!(!poll_fd(rx.as_fd(), 0).unwrap());
    }
}

//! Controlling-terminal helpers: window size and screen mode.

use std::io::{self, IsTerminal, Write};
use std::os::fd::{AsRawFd, RawFd};

const ENTER_ALT_SCREEN: &str = "\x1b[?1049h";
const LEAVE_ALT_SCREEN: &str = "\x1b[?1049l";
const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const CLEAR_SCREEN: &str = "\x1b[2J";
const RESET_ATTRS: &str = "\x1b[0m";

/// Get the window size of the terminal behind `fd`, as (cols, rows).
pub fn window_size_of(fd: RawFd) -> io::Result<(u16, u16)> {
    let mut size: libc::winsize = unsafe { std::mem::zeroed() };

    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ as _, &mut size) };

    if result == -1 {
        Err(io::Error::last_os_error())
    } else if size.ws_col == 0 || size.ws_row == 0 {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "terminal reported a zero window size",
        ))
    } else {
        Ok((size.ws_col, size.ws_row))
    }
}

/// Window size of stdout.
pub fn window_size() -> io::Result<(u16, u16)> {
    window_size_of(io::stdout().as_raw_fd())
}

/// Whether stdout is attached to a terminal.
pub fn stdout_is_terminal() -> bool {
    io::stdout().is_terminal()
}

/// Switches to the alternate screen with the cursor hidden, and restores
/// both on drop.
pub struct ScreenGuard<W: Write> {
    out: W,
}

impl<W: Write> ScreenGuard<W> {
    pub fn enter(mut out: W) -> io::Result<Self> {
        write!(out, "{ENTER_ALT_SCREEN}{HIDE_CURSOR}{CLEAR_SCREEN}")?;
        out.flush()?;
        Ok(Self { out })
    }
}

impl<W: Write> Drop for ScreenGuard<W> {
    fn drop(&mut self) {
        let restore = write!(self.out, "{RESET_ATTRS}{SHOW_CURSOR}{LEAVE_ALT_SCREEN}")
            .and_then(|_| self.out.flush());
        if let Err(err) = restore {
            tracing::warn!(%err, "failed to restore terminal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_enters_and_restores() {
        let mut out = Vec::new();
        {
            let _guard = ScreenGuard::enter(&mut out).unwrap();
        }
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(ENTER_ALT_SCREEN));
        assert!(text.contains(HIDE_CURSOR));
        assert!(text.ends_with(&format!("{SHOW_CURSOR}{LEAVE_ALT_SCREEN}")));
    }

    #[test]
    fn window_size_of_a_non_tty_fails() {
        let file = tempfile::tempfile().unwrap();
        assert!(window_size_of(file.as_raw_fd()).is_err());
    }
}

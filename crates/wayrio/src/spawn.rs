//! Helper process launching
//!
//! New windows are populated by a shell command spawned through a
//! double-fork: the intermediate child detaches into its own session,
//! forks the real command, writes the grandchild's pid back through a
//! pipe, and exits. The compositor reaps the intermediate immediately and
//! keeps the pid to correlate the window that eventually connects.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("unable to create pipe: {0}")]
    Pipe(io::Error),
    #[error("fork failed: {0}")]
    Fork(io::Error),
    #[error("helper reported no child pid")]
    NoChild,
    #[error("command contains an interior nul byte")]
    BadCommand,
}

/// Spawn `command` via `/bin/sh -c` in a detached session and return the
/// pid of the command process itself.
pub fn spawn_command(command: &str) -> Result<i32, SpawnError> {
    let shell = std::ffi::CString::new("/bin/sh").map_err(|_| SpawnError::BadCommand)?;
    let flag = std::ffi::CString::new("-c").map_err(|_| SpawnError::BadCommand)?;
    let cmd = std::ffi::CString::new(command).map_err(|_| SpawnError::BadCommand)?;

    let mut fd = [0; 2];
    // SAFETY: fd is a valid two-element array for pipe(2).
    if unsafe { libc::pipe(fd.as_mut_ptr()) } != 0 {
        return Err(SpawnError::Pipe(io::Error::last_os_error()));
    }
    let [read_fd, write_fd] = fd;

    // SAFETY: single-threaded fork/exec dance mirroring the classic
    // double-fork daemon pattern; only async-signal-safe calls run in the
    // children before exec/_exit.
    unsafe {
        let pid = libc::fork();
        if pid == 0 {
            libc::setsid();
            let mut set: libc::sigset_t = std::mem::zeroed();
            libc::sigemptyset(&mut set);
            libc::sigprocmask(libc::SIG_SETMASK, &set, std::ptr::null_mut());
            libc::close(read_fd);
            let child = libc::fork();
            if child == 0 {
                libc::close(write_fd);
                libc::execl(
                    shell.as_ptr(),
                    shell.as_ptr(),
                    flag.as_ptr(),
                    cmd.as_ptr(),
                    std::ptr::null::<libc::c_char>(),
                );
                libc::_exit(0);
            }
            write_all(write_fd, &child.to_ne_bytes());
            libc::close(write_fd);
            libc::_exit(0);
        } else if pid < 0 {
            let err = io::Error::last_os_error();
            libc::close(read_fd);
            libc::close(write_fd);
            return Err(SpawnError::Fork(err));
        }

        libc::close(write_fd);
        let mut buf = [0u8; 4];
        let got = read_all(read_fd, &mut buf);
        libc::close(read_fd);
        libc::waitpid(pid, std::ptr::null_mut(), 0);

        let child = i32::from_ne_bytes(buf);
        if !got || child <= 0 {
            return Err(SpawnError::NoChild);
        }
        Ok(child)
    }
}

/// Write the whole buffer to a raw fd, retrying short writes.
unsafe fn write_all(fd: libc::c_int, buf: &[u8]) -> bool {
    let mut done = 0;
    while done < buf.len() {
        let n = libc::write(
            fd,
            buf[done..].as_ptr() as *const libc::c_void,
            buf.len() - done,
        );
        if n <= 0 {
            return false;
        }
        done += n as usize;
    }
    true
}

/// Read the whole buffer from a raw fd, retrying short reads.
unsafe fn read_all(fd: libc::c_int, buf: &mut [u8]) -> bool {
    let mut done = 0;
    while done < buf.len() {
        let n = libc::read(
            fd,
            buf[done..].as_mut_ptr() as *mut libc::c_void,
            buf.len() - done,
        );
        if n <= 0 {
            return false;
        }
        done += n as usize;
    }
    true
}

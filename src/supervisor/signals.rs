//! Signal forwarding to the supervised server.
//!
//! On Unix, SIGINT and SIGTERM delivered to the launcher are re-sent to the
//! child so the server can shut down on its own terms, and the launcher keeps
//! waiting until it has. Elsewhere the console already delivers Ctrl-C to
//! every process attached to it, so nothing is installed.
//!
//! Handlers go in before the child is spawned. A signal that lands before the
//! pid is known is held and delivered as soon as [`ForwardingGuard::attach`]
//! runs.

#[cfg(test)]
pub(crate) static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(unix)]
mod imp {
    use std::sync::atomic::{AtomicI32, Ordering};

    /// Signals re-sent to the child.
    pub const FORWARDED: [libc::c_int; 2] = [libc::SIGINT, libc::SIGTERM];

    /// Pid of the current child, 0 when none.
    static CHILD_PID: AtomicI32 = AtomicI32::new(0);

    /// Last signal received while no child was attached, 0 when none.
    static PENDING: AtomicI32 = AtomicI32::new(0);

    extern "C" fn forward_handler(sig: libc::c_int) {
        // Only async-signal-safe calls in here.
        let pid = CHILD_PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, sig);
            }
        } else {
            PENDING.store(sig, Ordering::SeqCst);
        }
    }

    /// Forwards signals while alive and restores the previous handlers on drop.
    pub struct ForwardingGuard {
        previous: Vec<(libc::c_int, libc::sighandler_t)>,
    }

    impl ForwardingGuard {
        /// Take over SIGINT and SIGTERM, holding them until a child is attached.
        pub fn install() -> Self {
            CHILD_PID.store(0, Ordering::SeqCst);
            PENDING.store(0, Ordering::SeqCst);
            let previous = FORWARDED
                .iter()
                .map(|&sig| {
                    let old = unsafe { libc::signal(sig, forward_handler as libc::sighandler_t) };
                    (sig, old)
                })
                .collect();
            Self { previous }
        }

        /// Start forwarding to `pid`, delivering anything held so far.
        pub fn attach(&self, pid: u32) {
            CHILD_PID.store(pid as i32, Ordering::SeqCst);
            let held = PENDING.swap(0, Ordering::SeqCst);
            if held != 0 {
                tracing::debug!("Delivering held signal {} to pid {}", held, pid);
                unsafe {
                    libc::kill(pid as libc::pid_t, held);
                }
            }
            tracing::debug!("Forwarding SIGINT and SIGTERM to pid {}", pid);
        }
    }

    impl Drop for ForwardingGuard {
        fn drop(&mut self) {
            let attached = CHILD_PID.swap(0, Ordering::SeqCst) > 0;
            let held = PENDING.swap(0, Ordering::SeqCst);
            for &(sig, old) in &self.previous {
                if old != libc::SIG_ERR {
                    unsafe {
                        libc::signal(sig, old);
                    }
                }
            }
            // No child ever saw it, so it was meant for us.
            if !attached && held != 0 {
                unsafe {
                    libc::raise(held);
                }
            }
        }
    }
}

#[cfg(not(unix))]
mod imp {
    /// No-op on platforms without POSIX signals.
    pub struct ForwardingGuard;

    impl ForwardingGuard {
        pub fn install() -> Self {
            Self
        }

        pub fn attach(&self, _pid: u32) {}
    }
}

pub use imp::ForwardingGuard;

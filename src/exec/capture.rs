// src/exec/capture.rs

//! Concurrent draining of a child's stdout and stderr.
//!
//! A child that writes more than the OS pipe buffer to one stream blocks
//! until somebody reads it. If the parent only waits for exit, or reads the
//! streams one after the other, both sides can end up waiting forever. The
//! capture therefore runs one Tokio task per stream, started right after the
//! spawn, each appending to a buffer that only it writes to.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const READ_CHUNK: usize = 8 * 1024;

/// Bytes collected from both streams once capture has finished.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// `false` if a drain task was still running at the deadline and had to
    /// be aborted; the buffers then hold whatever arrived before that.
    pub complete: bool,
}

/// One drain task plus the buffer it fills.
struct Drain {
    buffer: Arc<Mutex<Vec<u8>>>,
    handle: Option<JoinHandle<()>>,
}

impl Drain {
    fn spawn<R>(reader: Option<R>, channel: &'static str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let handle = reader.map(|reader| {
            let buffer = Arc::clone(&buffer);
            tokio::spawn(drain(reader, buffer, channel))
        });
        Self { buffer, handle }
    }

    async fn join(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            if let Err(err) = handle.await {
                warn!(error = %err, "output drain task did not finish cleanly");
            }
            self.handle = None;
        }
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    fn take_bytes(&self) -> Vec<u8> {
        std::mem::take(&mut *lock(&self.buffer))
    }
}

/// Reads `reader` to end-of-stream. A read error ends the task; whatever was
/// read before it stays in the buffer.
async fn drain<R>(mut reader: R, buffer: Arc<Mutex<Vec<u8>>>, channel: &'static str)
where
    R: AsyncRead + Unpin,
{
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                lock(&buffer).extend_from_slice(&chunk[..n]);
            }
            Err(err) => {
                debug!(channel, error = %err, "read error while draining; keeping partial output");
                break;
            }
        }
    }
}

fn lock(buffer: &Mutex<Vec<u8>>) -> MutexGuard<'_, Vec<u8>> {
    buffer.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drains both output streams of a started process.
pub struct StreamCapture {
    stdout: Drain,
    stderr: Drain,
}

impl StreamCapture {
    /// Start draining. A missing stream is treated as already at end-of-stream.
    pub fn attach<O, E>(stdout: Option<O>, stderr: Option<E>) -> Self
    where
        O: AsyncRead + Unpin + Send + 'static,
        E: AsyncRead + Unpin + Send + 'static,
    {
        Self {
            stdout: Drain::spawn(stdout, "stdout"),
            stderr: Drain::spawn(stderr, "stderr"),
        }
    }

    /// Wait until both streams reached end-of-stream.
    pub async fn await_completion(self) -> CapturedOutput {
        self.finish(None).await
    }

    /// Like [`await_completion`](Self::await_completion), but gives up after
    /// `grace` and aborts the remaining drain tasks.
    ///
    /// Used once the process has exited or was killed: a grandchild that
    /// inherited the pipes may keep them open long after the process itself
    /// is gone.
    pub async fn await_completion_within(self, grace: Duration) -> CapturedOutput {
        self.finish(Some(grace)).await
    }

    async fn finish(self, grace: Option<Duration>) -> CapturedOutput {
        let Self {
            mut stdout,
            mut stderr,
        } = self;

        let both = async {
            stdout.join().await;
            stderr.join().await;
        };

        let complete = match grace {
            None => {
                both.await;
                true
            }
            Some(grace) => tokio::time::timeout(grace, both).await.is_ok(),
        };

        if !complete {
            debug!(
                grace_ms = grace.map(|g| g.as_millis() as u64),
                "output streams still open after grace period; abandoning capture"
            );
            stdout.abort();
            stderr.abort();
        }

        CapturedOutput {
            stdout: stdout.take_bytes(),
            stderr: stderr.take_bytes(),
            complete,
        }
    }
}

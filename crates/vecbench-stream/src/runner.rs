// SPDX-License-Identifier: MIT OR Apache-2.0
//! Single benchmark child process supervision.
//!
//! A runner owns exactly one child process and one channel. The child runs
//! under `stdbuf -o0` so its records stream out as they are produced, with
//! stdout and stderr merged into a single pipe. A dedicated reader thread
//! parses each line and forwards [`RunnerEvent`]s; when the merged stream
//! reaches EOF it sends one [`RunnerEvent::Finished`] terminal marker.
//!
//! A parse failure ends the reader without the marker. The consumer observes
//! the disconnected channel and recovers the underlying error by finishing
//! the runner.

use std::io::{BufRead as _, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;
use tracing::{debug, warn};
use vecbench_core::{BenchmarkRecord, Result, VecbenchError};

/// Prefix of the non-data banner line benchmark binaries print before their
/// records.
pub const BANNER_PREFIX: &str = "Loop";

/// One message from a benchmark runner's reader thread.
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerEvent {
    /// A parsed per-function observation.
    Record(BenchmarkRecord),
    /// Terminal marker: the child's output stream has ended.
    Finished,
}

/// Supervisor for one running benchmark binary.
pub struct BenchmarkRunner {
    binary: PathBuf,
    child: Child,
    reader: JoinHandle<Result<()>>,
    events: Receiver<RunnerEvent>,
}

impl BenchmarkRunner {
    /// Launches `binary` and starts streaming its output.
    ///
    /// # Errors
    ///
    /// Returns [`VecbenchError::ExternalTool`] if the child cannot be
    /// spawned, or an I/O error if the pipe or reader thread cannot be set
    /// up.
    pub fn launch(binary: &Path) -> Result<Self> {
        let (pipe, stdout_writer) = os_pipe::pipe()?;
        let stderr_writer = stdout_writer.try_clone()?;

        let mut command = Command::new("stdbuf");
        command
            .arg("-o0")
            .arg(binary)
            .stdin(Stdio::null())
            .stdout(stdout_writer)
            .stderr(stderr_writer);
        let child = command.spawn().map_err(|e| {
            VecbenchError::ExternalTool(format!("failed to launch {}: {e}", binary.display()))
        })?;
        // The command still holds write ends of the pipe; dropping it is
        // what lets the reader see EOF when the child exits.
        drop(command);

        debug!(binary = %binary.display(), pid = child.id(), "benchmark child started");

        let (sender, events) = channel();
        let reader = std::thread::Builder::new()
            .name(format!("bench-reader-{}", child.id()))
            .spawn(move || read_records(pipe, &sender))?;

        Ok(Self {
            binary: binary.to_path_buf(),
            child,
            reader,
            events,
        })
    }

    /// Path of the binary under supervision.
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Blocking-receives the next event from the reader thread.
    ///
    /// Returns `None` when the channel is disconnected, i.e. the producer
    /// died before sending its terminal marker; call
    /// [`BenchmarkRunner::finish`] to recover the underlying error.
    pub fn recv_event(&self) -> Option<RunnerEvent> {
        self.events.recv().ok()
    }

    /// Joins the reader thread and waits for the child to exit.
    ///
    /// # Errors
    ///
    /// Propagates the reader thread's parse or I/O error, or the failure to
    /// reap the child.
    pub fn finish(mut self) -> Result<ExitStatus> {
        let read_result = self
            .reader
            .join()
            .unwrap_or_else(|_| Err(VecbenchError::ExternalTool("reader thread panicked".to_owned())));
        if read_result.is_err() {
            // The stream is already useless; don't wait on a child that may
            // keep writing into a dead pipe.
            let _ = self.child.kill();
        }
        let status = self.child.wait()?;
        read_result?;
        if !status.success() {
            warn!(binary = %self.binary.display(), %status, "benchmark child exited abnormally");
        }
        Ok(status)
    }

    /// Kills the child and reaps it, discarding whatever the stream held.
    pub fn abort(mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        drop(self.events);
        let _ = self.reader.join();
    }
}

fn read_records(pipe: os_pipe::PipeReader, events: &Sender<RunnerEvent>) -> Result<()> {
    for line in BufReader::new(pipe).lines() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with(BANNER_PREFIX) {
            continue;
        }
        let record = BenchmarkRecord::from_output_line(&line)?;
        if events.send(RunnerEvent::Record(record)).is_err() {
            // Consumer is gone; nothing left to report to.
            return Ok(());
        }
    }
    let _ = events.send(RunnerEvent::Finished);
    Ok(())
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::os::unix::fs::PermissionsExt as _;

    fn script(body: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.sh");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh\n{body}").unwrap();
        file.flush().unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        (dir, path)
    }

    fn drain(runner: &BenchmarkRunner) -> Vec<RunnerEvent> {
        let mut events = Vec::new();
        while let Some(event) = runner.recv_event() {
            let finished = event == RunnerEvent::Finished;
            events.push(event);
            if finished {
                break;
            }
        }
        events
    }

    #[test]
    fn test_streams_records_then_terminal_marker() {
        let (_dir, path) = script(
            "echo 'Loop \tTime(sec) \tChecksum'\necho 's000 1.5 abc'\necho 's001 0.5 def'",
        );
        let runner = BenchmarkRunner::launch(&path).unwrap();
        let events = drain(&runner);
        runner.finish().unwrap();

        assert_eq!(events.len(), 3);
        assert!(matches!(
            &events[0],
            RunnerEvent::Record(r) if r.function_name == "s000"
        ));
        assert!(matches!(
            &events[1],
            RunnerEvent::Record(r) if r.function_name == "s001"
        ));
        assert_eq!(events[2], RunnerEvent::Finished);
    }

    #[test]
    fn test_banner_and_blank_lines_are_discarded() {
        let (_dir, path) = script("echo 'Loop banner'\necho ''\necho 's000 1.0 x'");
        let runner = BenchmarkRunner::launch(&path).unwrap();
        let events = drain(&runner);
        runner.finish().unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_stderr_is_merged_into_the_stream() {
        let (_dir, path) = script("echo 's000 1.0 x' 1>&2");
        let runner = BenchmarkRunner::launch(&path).unwrap();
        let events = drain(&runner);
        runner.finish().unwrap();
        assert!(matches!(
            &events[0],
            RunnerEvent::Record(r) if r.function_name == "s000"
        ));
    }

    #[test]
    fn test_malformed_line_surfaces_on_finish() {
        let (_dir, path) = script("echo 'not a record line at all'");
        let runner = BenchmarkRunner::launch(&path).unwrap();
        // Producer dies without the marker; channel disconnects.
        assert_eq!(runner.recv_event(), None);
        let err = runner.finish().unwrap_err();
        assert!(matches!(err, VecbenchError::MalformedLine { .. }));
    }

    #[test]
    fn test_missing_binary_surfaces_as_stream_failure() {
        // stdbuf itself spawns fine; its complaint about the missing binary
        // lands on the merged stream, where it is not a valid record.
        let runner = BenchmarkRunner::launch(Path::new("/nonexistent/bench")).unwrap();
        assert_eq!(runner.recv_event(), None);
        assert!(runner.finish().is_err());
    }
}

// src/exec/sink.rs

//! Destinations for captured output lines.
//!
//! Every line the child prints is handed to each sink in turn, in order,
//! and each sink flushes before the next line is read so a reader of the
//! log (or the console) sees output as it happens.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter, Stdout};

use crate::errors::{Result, RunnerError};

pub type SinkFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Something that accepts one line of process output at a time.
pub trait LineSink: Send {
    /// Write `line` followed by a newline and flush.
    fn write_line<'a>(&'a mut self, line: &'a str) -> SinkFuture<'a>;
}

/// Echoes lines to this process's stdout.
pub struct ConsoleSink {
    out: Stdout,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            out: tokio::io::stdout(),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSink for ConsoleSink {
    fn write_line<'a>(&'a mut self, line: &'a str) -> SinkFuture<'a> {
        Box::pin(async move {
            write_and_flush(&mut self.out, line)
                .await
                .map_err(|e| RunnerError::io("<stdout>", e))
        })
    }
}

/// Writes lines to the raw log file on disk.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileSink {
    /// Create (or truncate) the log file, creating its parent directory if
    /// it does not exist yet. Repeated calls on the same path are fine.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| RunnerError::io(parent, e))?;
        }

        let file = File::create(&path)
            .await
            .map_err(|e| RunnerError::io(&path, e))?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }
}

impl LineSink for FileSink {
    fn write_line<'a>(&'a mut self, line: &'a str) -> SinkFuture<'a> {
        Box::pin(async move {
            write_and_flush(&mut self.writer, line)
                .await
                .map_err(|e| RunnerError::io(&self.path, e))
        })
    }
}

/// Forwards each line to every wrapped sink, in the order they were added.
///
/// The first failing sink aborts the write; later sinks do not see that line.
#[derive(Default)]
pub struct FanOut<'s> {
    sinks: Vec<&'s mut dyn LineSink>,
}

impl<'s> FanOut<'s> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with(mut self, sink: &'s mut dyn LineSink) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl LineSink for FanOut<'_> {
    fn write_line<'a>(&'a mut self, line: &'a str) -> SinkFuture<'a> {
        Box::pin(async move {
            for sink in self.sinks.iter_mut() {
                sink.write_line(line).await?;
            }
            Ok(())
        })
    }
}

async fn write_and_flush<W>(writer: &mut W, line: &str) -> std::io::Result<()>
where
    W: AsyncWriteExt + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

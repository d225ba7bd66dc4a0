//! Stream pumps: drain one child stream and republish every read as an event.

use super::encoding::OutputDecoder;
use super::events::{EventSink, ShellEvent, ShellOutput, StreamLabel};
use serde::Serialize;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

/// Upper bound of a single read, and so of a single event's raw payload.
pub const PUMP_BUFFER_SIZE: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "reason", content = "error")]
pub enum PumpExit {
    EndOfStream,
    ReadError(String),
}

/// What a pump did before it stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PumpReport {
    pub stream: StreamLabel,
    pub chunks: u64,
    pub bytes: u64,
    pub exit: PumpExit,
}

pub struct StreamPump<R> {
    label: StreamLabel,
    source: R,
    decoder: OutputDecoder,
    sink: Arc<dyn EventSink>,
}

impl<R> StreamPump<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pub fn new(label: StreamLabel, source: R, decoder: OutputDecoder, sink: Arc<dyn EventSink>) -> Self {
        Self {
            label,
            source,
            decoder,
            sink,
        }
    }

    /// Runs the pump as its own task. The handle resolves once the stream is done.
    pub fn spawn(self) -> JoinHandle<PumpReport> {
        tokio::spawn(self.run())
    }

    #[instrument(skip(self), fields(stream = %self.label))]
    pub async fn run(mut self) -> PumpReport {
        let mut buf = vec![0u8; PUMP_BUFFER_SIZE];
        let mut chunks = 0u64;
        let mut bytes = 0u64;

        let exit = loop {
            match self.source.read(&mut buf).await {
                Ok(0) => {
                    debug!("End of stream");
                    break PumpExit::EndOfStream;
                }
                Ok(n) => {
                    chunks += 1;
                    bytes += n as u64;
                    let text = self.decoder.decode(&buf[..n]);
                    self.sink
                        .publish(ShellEvent::Output(ShellOutput {
                            stream: self.label,
                            text,
                            byte_count: n,
                        }))
                        .await;
                }
                Err(e) => {
                    warn!(error = %e, "Read from shell stream failed; stopping pump");
                    break PumpExit::ReadError(e.to_string());
                }
            }
        };

        debug!(chunks, bytes, "Stream pump finished");
        PumpReport {
            stream: self.label,
            chunks,
            bytes,
            exit,
        }
    }
}

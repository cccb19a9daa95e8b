//! Parallel decoding of independent DEFLATE streams.
//!
//! Architecture:
//! - Main thread: hand out stream indices, collect results by index
//! - Worker pool: run one complete decode session per stream
//!
//! Sessions share nothing but the fixed Huffman trees.

use crossbeam::channel::{bounded, Receiver, Sender};

use crate::error::{Error, Result};

/// Configuration for batch decoding
#[derive(Clone, Debug, Default)]
pub struct BatchConfig {
    /// Number of worker threads (0 = auto, 1 = decode on the calling thread)
    pub num_threads: usize,
}

/// Result of decoding a single stream
struct DecodedStream {
    /// Position of the stream in the input slice
    index: usize,
    result: Result<Vec<u8>>,
}

/// Decodes many raw DEFLATE streams on a worker pool
pub struct BatchInflater {
    config: BatchConfig,
}

impl BatchInflater {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    fn effective_threads(&self, streams: usize) -> usize {
        let threads = match self.config.num_threads {
            0 => num_cpus::get().clamp(1, 32),
            n => n.clamp(1, 32),
        };
        threads.min(streams.max(1))
    }

    /// Decode every input, returning one result per input in input order
    ///
    /// The outer error is reserved for worker failures; a malformed stream
    /// only fails its own entry.
    pub fn decompress_all<T: AsRef<[u8]> + Sync>(
        &self,
        inputs: &[T],
    ) -> Result<Vec<Result<Vec<u8>>>> {
        let num_threads = self.effective_threads(inputs.len());
        tracing::debug!(streams = inputs.len(), threads = num_threads, "batch decode");

        // For single thread, decode in place
        if num_threads == 1 {
            return Ok(inputs.iter().map(|input| crate::decompress_bytes(input.as_ref())).collect());
        }

        // Every index fits in the job channel, so dispatch never blocks
        let (job_tx, job_rx): (Sender<usize>, Receiver<usize>) = bounded(inputs.len());
        let (result_tx, result_rx): (Sender<DecodedStream>, Receiver<DecodedStream>) =
            bounded(num_threads * 4);

        // Use crossbeam's scoped threads to borrow the inputs
        let result = crossbeam::scope(|scope| {
            for _ in 0..num_threads {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();

                scope.spawn(move |_| {
                    worker_thread(inputs, job_rx, result_tx);
                });
            }

            // Drop our copies of the channels that workers use
            drop(job_rx);
            drop(result_tx);

            for index in 0..inputs.len() {
                if job_tx.send(index).is_err() {
                    break;
                }
            }
            drop(job_tx);

            let mut results: Vec<Option<Result<Vec<u8>>>> =
                (0..inputs.len()).map(|_| None).collect();
            for decoded in result_rx.iter() {
                results[decoded.index] = Some(decoded.result);
            }
            results
        });

        let results = result.map_err(|_| Error::Internal("Thread panicked".to_string()))?;

        Ok(results
            .into_iter()
            .map(|result| {
                result.unwrap_or_else(|| {
                    Err(Error::Internal("Worker exited without a result".to_string()))
                })
            })
            .collect())
    }
}

/// Decode each input on a worker pool sized by `config`
pub fn decompress_batch<T: AsRef<[u8]> + Sync>(
    inputs: &[T],
    config: BatchConfig,
) -> Result<Vec<Result<Vec<u8>>>> {
    BatchInflater::new(config).decompress_all(inputs)
}

/// Worker thread function: decodes streams until the job channel closes
fn worker_thread<T: AsRef<[u8]>>(
    inputs: &[T],
    job_rx: Receiver<usize>,
    result_tx: Sender<DecodedStream>,
) {
    while let Ok(index) = job_rx.recv() {
        let result = crate::decompress_bytes(inputs[index].as_ref());

        if result_tx.send(DecodedStream { index, result }).is_err() {
            // Main thread has stopped, exit
            break;
        }
    }
}

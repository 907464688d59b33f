use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, never, select, Receiver, Sender};

use crate::cancel::CancelToken;
use crate::error::ScanError;
use crate::expression::Expressions;
use crate::logger::{NoopLogger, ScanLogger};
use crate::results::{ContentMatch, FileMatch, MatchResult};

use super::matcher::{
    build_content_matchers, build_file_matchers, ContentMatcherSet, FileMatcherSet,
};
use super::processor::FileProcessor;
use super::walker;

/// Jobs queued ahead of the pool; oversized relative to the result buffers
/// so directory I/O bursts from the walker don't stall it.
const JOB_BUFFER_PER_WORKER: usize = 10;

/// A compiled scanner: two immutable matcher collections plus a logger
/// handle, shared read-only across the worker pool for the duration of each
/// scan.
pub struct Scanner {
    file_matchers: FileMatcherSet,
    content_matchers: ContentMatcherSet,
    logger: Arc<dyn ScanLogger>,
}

impl Scanner {
    /// Compiles every expression in the batch.
    ///
    /// Construction is all or nothing: one broken pattern means no scanner,
    /// and every broken pattern in the batch is reported, not just the first.
    pub fn new(expressions: &Expressions) -> Result<Self, Vec<ScanError>> {
        let (file_matchers, mut errs) = build_file_matchers(&expressions.file_exps);
        let (content_matchers, content_errs) = build_content_matchers(&expressions.content_exps);
        errs.extend(content_errs);
        if !errs.is_empty() {
            return Err(errs);
        }
        Ok(Self {
            file_matchers,
            content_matchers,
            logger: Arc::new(NoopLogger),
        })
    }

    /// Replaces the default no-op logger.
    pub fn set_logger(&mut self, logger: Arc<dyn ScanLogger>) {
        self.logger = logger;
    }

    /// Runs a scan and hands every record to the matching callback.
    ///
    /// Callbacks are invoked serially from the calling thread, so they may
    /// hold unsynchronized state; they gate pipeline progress and must not
    /// block indefinitely. The call returns once the walker and every worker
    /// have finished and all buffered records have been dispatched. No
    /// spawned thread outlives the call.
    pub fn scan_with_callback<FM, CM, EH>(
        &self,
        cancel: &CancelToken,
        roots: &[PathBuf],
        worker_count: usize,
        mut on_file_match: FM,
        mut on_content_match: CM,
        mut on_error: EH,
    ) where
        FM: FnMut(FileMatch),
        CM: FnMut(ContentMatch),
        EH: FnMut(ScanError),
    {
        if roots.is_empty() {
            on_error(ScanError::InvalidArgument);
            return;
        }
        let worker_count = worker_count.max(1);

        let (job_tx, job_rx) = bounded::<PathBuf>(worker_count * JOB_BUFFER_PER_WORKER);
        let (fm_tx, fm_rx) = bounded::<FileMatch>(worker_count);
        let (cm_tx, cm_rx) = bounded::<ContentMatch>(worker_count);
        let (err_tx, err_rx) = bounded::<ScanError>(worker_count);

        thread::scope(|s| {
            for worker_id in 1..=worker_count {
                let cancel = cancel.clone();
                let job_rx = job_rx.clone();
                let fm_tx = fm_tx.clone();
                let cm_tx = cm_tx.clone();
                let err_tx = err_tx.clone();
                s.spawn(move || self.worker(&cancel, worker_id, job_rx, fm_tx, cm_tx, err_tx));
            }
            {
                let cancel = cancel.clone();
                let err_tx = err_tx.clone();
                let logger = Arc::clone(&self.logger);
                s.spawn(move || {
                    walker::walk_roots(&cancel, roots, job_tx, err_tx, logger.as_ref())
                });
            }
            // This thread keeps no senders: when the walker and every worker
            // return, the receivers below disconnect, which both signals
            // completion and drains whatever is still buffered.
            drop(job_rx);
            drop(fm_tx);
            drop(cm_tx);
            drop(err_tx);

            let mut fm_rx = fm_rx;
            let mut cm_rx = cm_rx;
            let mut err_rx = err_rx;
            let mut open = 3;
            while open > 0 {
                select! {
                    recv(fm_rx) -> msg => match msg {
                        Ok(r) => on_file_match(r),
                        Err(_) => {
                            fm_rx = never();
                            open -= 1;
                        }
                    },
                    recv(cm_rx) -> msg => match msg {
                        Ok(r) => on_content_match(r),
                        Err(_) => {
                            cm_rx = never();
                            open -= 1;
                        }
                    },
                    recv(err_rx) -> msg => match msg {
                        Ok(e) => on_error(e),
                        Err(_) => {
                            err_rx = never();
                            open -= 1;
                        }
                    },
                }
            }
        });
        self.logger.debug("scan pipeline drained");
    }

    /// Collecting variant of [`scan_with_callback`](Self::scan_with_callback):
    /// results and errors come back in one go once the pipeline drains.
    pub fn scan(
        &self,
        cancel: &CancelToken,
        roots: &[PathBuf],
        worker_count: usize,
    ) -> (MatchResult, Vec<ScanError>) {
        let mut file_matches = Vec::new();
        let mut content_matches = Vec::new();
        let mut errors = Vec::new();
        self.scan_with_callback(
            cancel,
            roots,
            worker_count,
            |r| file_matches.push(r),
            |r| content_matches.push(r),
            |e| errors.push(e),
        );
        (
            MatchResult {
                file_matches,
                content_matches,
            },
            errors,
        )
    }

    /// Worker loop: pull a path, run both matcher collections over it,
    /// publish records and errors. Returns when the job channel closes or
    /// cancellation is observed at the loop head; an in-flight file is always
    /// finished first.
    fn worker(
        &self,
        cancel: &CancelToken,
        worker_id: usize,
        jobs: Receiver<PathBuf>,
        file_matches: Sender<FileMatch>,
        content_matches: Sender<ContentMatch>,
        errors: Sender<ScanError>,
    ) {
        self.logger.debug(&format!("starting worker: {}", worker_id));
        let alarm = cancel.alarm();
        let mut processor = FileProcessor::new(&self.file_matchers, &self.content_matchers);
        loop {
            if cancel.is_cancelled() {
                self.logger
                    .debug(&format!("force stopping worker: {}", worker_id));
                break;
            }
            let path = select! {
                recv(alarm) -> _ => {
                    self.logger
                        .debug(&format!("force stopping worker: {}", worker_id));
                    break;
                }
                recv(jobs) -> msg => match msg {
                    Ok(path) => path,
                    Err(_) => break,
                },
            };

            for record in processor.match_paths(&path) {
                if file_matches.send(record).is_err() {
                    return;
                }
            }

            let (records, io_err) = processor.match_contents(&path);
            for record in records {
                if content_matches.send(record).is_err() {
                    return;
                }
            }
            if let Some(e) = io_err {
                if errors.send(e).is_err() {
                    return;
                }
            }
        }
        self.logger.debug(&format!("stopped worker: {}", worker_id));
    }
}

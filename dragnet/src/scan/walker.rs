use std::path::{Path, PathBuf};

use crossbeam_channel::{select, Sender};
use walkdir::WalkDir;

use crate::cancel::CancelToken;
use crate::error::ScanError;
use crate::logger::ScanLogger;

/// Walks the roots depth first, in lexicographic directory order, feeding
/// every non-directory entry to the job channel.
///
/// Per-entry failures (unreadable directory, stat error, missing root) go to
/// the error channel and the walk moves on. Symbolic links are skipped and
/// never followed. Dropping `jobs` on return is the workers' end-of-input
/// signal, so this function owns the sender.
pub(crate) fn walk_roots(
    cancel: &CancelToken,
    roots: &[PathBuf],
    jobs: Sender<PathBuf>,
    errors: Sender<ScanError>,
    logger: &dyn ScanLogger,
) {
    for root in roots {
        logger.debug(&format!("walking directory: {}", root.display()));
        if !walk_root(cancel, root, &jobs, &errors) {
            logger.debug("received cancellation, not walking further");
            break;
        }
    }
    logger.debug("closing jobs channel");
}

/// Returns false once cancellation is observed; remaining roots are skipped.
fn walk_root(
    cancel: &CancelToken,
    root: &Path,
    jobs: &Sender<PathBuf>,
    errors: &Sender<ScanError>,
) -> bool {
    let alarm = cancel.alarm();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        if cancel.is_cancelled() {
            return false;
        }
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                if errors.send(ScanError::Walk(e)).is_err() {
                    return false;
                }
                continue;
            }
        };
        let file_type = entry.file_type();
        if file_type.is_dir() || file_type.is_symlink() {
            continue;
        }
        // Anything else (regular file, socket, FIFO) becomes a job; the
        // worker's open decides what to make of it.
        select! {
            send(jobs, entry.into_path()) -> res => {
                if res.is_err() {
                    return false;
                }
            }
            recv(alarm) -> _ => return false,
        }
    }
    true
}

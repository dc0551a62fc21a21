// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::{AllPaths, CancelToken, Path, PathError, PathFinder};
use crate::{IntersectionId, StreetNetwork};

/// Runs a [PathFinder] search on a background thread, so that an interactive
/// consumer is not blocked while the path is computed.
#[derive(Debug)]
pub struct PathFindingWorker {
    handle: JoinHandle<Result<(Path, AllPaths), PathError>>,
    progress: Receiver<Vec<String>>,
    cancel: CancelToken,
}

impl PathFindingWorker {
    /// Starts searching for the path between `origin` and `destination`.
    ///
    /// If `show_intermediate_results` is set, a message is published on
    /// [PathFindingWorker::progress] after every iteration of the search. Each message
    /// holds the ids of segments relaxed since the previous one, so all messages
    /// received so far together form the set of segments relaxed so far.
    pub fn spawn(
        mut finder: PathFinder,
        origin: IntersectionId,
        destination: IntersectionId,
        network: Arc<StreetNetwork>,
        show_intermediate_results: bool,
    ) -> Self {
        let (tx, progress) = mpsc::channel();
        let cancel = CancelToken::default();
        finder.set_cancel_token(cancel.clone());

        if show_intermediate_results {
            // Observers get an append-only list, so only its new tail has to be sent
            let mut sent: usize = 0;
            finder.add_observer(move |segment_ids: &[String]| {
                let fresh = segment_ids.get(sent..).unwrap_or_default().to_vec();
                sent = segment_ids.len();

                // The receiver may have been dropped, and that's fine
                let _ = tx.send(fresh);
            });
        }

        let handle = thread::spawn(move || {
            let mut all_paths = AllPaths::default();
            let path = finder.find_path(origin, destination, &network, &mut all_paths)?;
            Ok((path, all_paths))
        });

        Self {
            handle,
            progress,
            cancel,
        }
    }

    /// Intermediate results of the search. The channel closes once the search ends.
    pub fn progress(&self) -> &Receiver<Vec<String>> {
        &self.progress
    }

    /// Requests cancellation of the search; [PathFindingWorker::join] will then
    /// return [PathError::Cancelled] unless the search has already finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the search to finish and returns the path together with
    /// the paths of all other reached intersections.
    pub fn join(self) -> Result<(Path, AllPaths), PathError> {
        self.handle.join().map_err(|_| PathError::WorkerPanicked)?
    }
}

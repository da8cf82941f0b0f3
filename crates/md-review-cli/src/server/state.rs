//! Shared state for the review server

use glob::Pattern;
use md_review_engine::{
    AnnotatedDocument, Feedback, FolderNode, LoadTicket, ReviewError, ReviewMode, ReviewSession,
    ReviewTarget, io,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

/// Where documents are read from.
#[derive(Debug, Clone)]
pub enum Source {
    File { path: PathBuf },
    Folder { root: PathBuf, tree: FolderNode },
}

/// The session together with the document most recently loaded into it.
#[derive(Debug)]
pub struct Review {
    pub session: ReviewSession,
    pub document: Option<AnnotatedDocument>,
}

impl Review {
    /// Starts loading `path`. The previous document is dropped at once so no
    /// selection resolves against it while the new file is read.
    pub fn begin_load(&mut self, path: &str) -> Result<LoadTicket, ReviewError> {
        let ticket = self.session.begin_load(path)?;
        self.document = None;
        Ok(ticket)
    }
}

pub struct AppState {
    pub source: Source,
    review: Mutex<Review>,
    completion: Mutex<Option<oneshot::Sender<Feedback>>>,
}

impl AppState {
    /// Builds the state for `target`; the receiver yields the finished feedback once.
    pub fn new(
        target: ReviewTarget,
        ignore: &[Pattern],
    ) -> Result<(Self, oneshot::Receiver<Feedback>), io::IoError> {
        let (source, mode) = match target {
            ReviewTarget::File { path, label } => {
                (Source::File { path }, ReviewMode::Single(label))
            }
            ReviewTarget::Folder { root, label } => {
                let tree = io::build_folder_tree(&root, ignore)?;
                log::info!("Serving {} markdown files from {}", tree.files().len(), root.display());
                (Source::Folder { root, tree }, ReviewMode::Folder(label))
            }
        };
        let mut session = ReviewSession::new(mode);
        session.subscribe(|event| log::debug!("Session event: {event:?}"));

        let (tx, rx) = oneshot::channel();
        let state = Self {
            source,
            review: Mutex::new(Review {
                session,
                document: None,
            }),
            completion: Mutex::new(Some(tx)),
        };
        Ok((state, rx))
    }

    pub fn review(&self) -> MutexGuard<'_, Review> {
        self.review.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn tree(&self) -> Option<&FolderNode> {
        match &self.source {
            Source::Folder { tree, .. } => Some(tree),
            Source::File { .. } => None,
        }
    }

    /// Hands `feedback` to whoever is waiting on the server. Returns false if
    /// the review was already completed.
    pub fn complete(&self, feedback: Feedback) -> bool {
        let sender = self
            .completion
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match sender {
            Some(tx) => tx.send(feedback).is_ok(),
            None => {
                log::debug!("Ignoring repeated completion");
                false
            }
        }
    }
}

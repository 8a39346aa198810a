//! Dataset fetch + decode, off the caller's thread.

use std::sync::mpsc;
use std::thread::JoinHandle;

use crate::dataset::DccmDataset;
use crate::error::DccmError;
use crate::options::DatasetKey;
use crate::source::{load_dataset, DatasetSource};

/// A load the manager asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Generation stamped by the manager.
    pub generation: u64,
    /// Dataset being loaded.
    pub key: DatasetKey,
    /// Resolved URL or path.
    pub location: String,
}

/// Result of a [`LoadRequest`].
#[derive(Debug)]
pub struct LoadOutcome {
    /// Generation of the request this answers.
    pub generation: u64,
    /// Dataset that was requested.
    pub key: DatasetKey,
    /// Decoded dataset or the reason it could not be produced.
    pub result: Result<DccmDataset, DccmError>,
}

impl LoadOutcome {
    fn run(source: &dyn DatasetSource, request: LoadRequest) -> Self {
        Self {
            generation: request.generation,
            result: load_dataset(source, &request.location),
            key: request.key,
        }
    }
}

enum LoaderMessage {
    Load(LoadRequest),
    Shutdown,
}

type SharedSource = Box<dyn DatasetSource + Send>;

/// Runs loads either on a background thread or synchronously.
pub enum DatasetLoader {
    /// One named worker thread; only the newest queued request runs.
    Background(BackgroundLoader),
    /// Loads run inside [`submit`](Self::submit); the outcome is handed out
    /// by the next [`try_recv`](Self::try_recv).
    Inline {
        /// Where bytes come from.
        source: SharedSource,
        /// Outcome waiting to be collected.
        ready: Option<LoadOutcome>,
    },
}

impl DatasetLoader {
    /// Spawn a background loader reading from `source`.
    ///
    /// # Errors
    ///
    /// [`DccmError::ThreadSpawn`] if the worker thread cannot be started.
    pub fn background(
        source: impl DatasetSource + Send + 'static,
    ) -> Result<Self, DccmError> {
        Ok(Self::Background(BackgroundLoader::spawn(Box::new(source))?))
    }

    /// Synchronous loader reading from `source`.
    pub fn inline(source: impl DatasetSource + Send + 'static) -> Self {
        Self::Inline {
            source: Box::new(source),
            ready: None,
        }
    }

    /// Queue a load. Older requests that have not started are superseded.
    pub fn submit(&mut self, request: LoadRequest) {
        match self {
            Self::Background(worker) => worker.submit(request),
            Self::Inline { source, ready } => {
                *ready = Some(LoadOutcome::run(source.as_ref(), request));
            }
        }
    }

    /// Next finished load, if any. Never blocks.
    pub fn try_recv(&mut self) -> Option<LoadOutcome> {
        match self {
            Self::Background(worker) => worker.try_recv(),
            Self::Inline { ready, .. } => ready.take(),
        }
    }

    /// Stop the worker thread, if there is one.
    pub fn shutdown(&mut self) {
        match self {
            Self::Background(worker) => worker.shutdown(),
            Self::Inline { ready, .. } => *ready = None,
        }
    }
}

/// Background thread that fetches and decodes datasets.
pub struct BackgroundLoader {
    request_tx: mpsc::Sender<LoaderMessage>,
    result_rx: mpsc::Receiver<LoadOutcome>,
    thread: Option<JoinHandle<()>>,
}

impl BackgroundLoader {
    fn spawn(source: SharedSource) -> Result<Self, DccmError> {
        let (request_tx, request_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::channel();

        let thread = std::thread::Builder::new()
            .name("dataset-loader".into())
            .spawn(move || Self::thread_loop(source.as_ref(), &request_rx, &result_tx))
            .map_err(DccmError::ThreadSpawn)?;

        Ok(Self {
            request_tx,
            result_rx,
            thread: Some(thread),
        })
    }

    fn submit(&self, request: LoadRequest) {
        if self.request_tx.send(LoaderMessage::Load(request)).is_err() {
            log::warn!("dataset loader is gone; request dropped");
        }
    }

    fn try_recv(&self) -> Option<LoadOutcome> {
        self.result_rx.try_recv().ok()
    }

    fn shutdown(&mut self) {
        let _ = self.request_tx.send(LoaderMessage::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    fn thread_loop(
        source: &dyn DatasetSource,
        request_rx: &mpsc::Receiver<LoaderMessage>,
        result_tx: &mpsc::Sender<LoadOutcome>,
    ) {
        while let Ok(message) = request_rx.recv() {
            match drain_latest(message, request_rx) {
                LoaderMessage::Shutdown => break,
                LoaderMessage::Load(request) => {
                    let outcome = LoadOutcome::run(source, request);
                    if result_tx.send(outcome).is_err() {
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for BackgroundLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Collapse queued messages to the newest one. Shutdown always wins.
fn drain_latest(
    initial: LoaderMessage,
    rx: &mpsc::Receiver<LoaderMessage>,
) -> LoaderMessage {
    let mut latest = initial;
    while let Ok(newer) = rx.try_recv() {
        if matches!(latest, LoaderMessage::Shutdown) {
            continue;
        }
        latest = newer;
    }
    latest
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::format;
    use crate::source::MemorySource;

    fn source() -> MemorySource {
        let ds = DccmDataset::new(1, 1, vec!["ALA".to_owned()], vec![1.0]).unwrap();
        MemorySource::new().with("a.bin", format::encode(&ds).unwrap())
    }

    fn request(generation: u64, location: &str) -> LoadRequest {
        LoadRequest {
            generation,
            key: DatasetKey::default(),
            location: location.to_owned(),
        }
    }

    fn wait(loader: &mut DatasetLoader) -> LoadOutcome {
        for _ in 0..500 {
            if let Some(outcome) = loader.try_recv() {
                return outcome;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("loader never answered");
    }

    #[test]
    fn inline_answers_on_next_poll() {
        let mut loader = DatasetLoader::inline(source());
        assert!(loader.try_recv().is_none());
        loader.submit(request(1, "a.bin"));
        let outcome = loader.try_recv().unwrap();
        assert_eq!(outcome.generation, 1);
        assert_eq!(outcome.result.unwrap().num_atoms(), 1);
        assert!(loader.try_recv().is_none());
    }

    #[test]
    fn background_reports_failures() {
        let mut loader = DatasetLoader::background(source()).unwrap();
        loader.submit(request(7, "missing.bin"));
        let outcome = wait(&mut loader);
        assert_eq!(outcome.generation, 7);
        assert!(matches!(
            outcome.result,
            Err(DccmError::Fetch { status: 404, .. })
        ));
        loader.shutdown();
    }

    #[test]
    fn drain_keeps_newest_and_shutdown() {
        let (tx, rx) = mpsc::channel();
        tx.send(LoaderMessage::Load(request(2, "a"))).unwrap();
        tx.send(LoaderMessage::Load(request(3, "b"))).unwrap();
        let latest = drain_latest(LoaderMessage::Load(request(1, "z")), &rx);
        assert!(matches!(latest, LoaderMessage::Load(r) if r.generation == 3));

        tx.send(LoaderMessage::Load(request(5, "a"))).unwrap();
        let latest = drain_latest(LoaderMessage::Shutdown, &rx);
        assert!(matches!(latest, LoaderMessage::Shutdown));
    }
}

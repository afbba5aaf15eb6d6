//! Model loading
//!
//! Loaders report completion through callbacks, in the order
//! `load(url, on_load, on_progress, on_error)`. [`load_with`] wraps one
//! such call in a [`PendingLoad`] future that settles exactly once with
//! whichever callback fires first.

pub mod obj;

use std::{
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, PoisonError},
    task::{Context, Poll},
};

use futures::{channel::oneshot, FutureExt};

use crate::{error::LoadError, gfx::scene::ModelObject};

pub use obj::ObjLoader;

pub type OnLoad = Box<dyn FnOnce(ModelObject) + Send>;
pub type OnProgress = Box<dyn FnMut(LoadProgress) + Send>;
pub type OnError = Box<dyn FnOnce(LoadError) + Send>;

/// Progress of a running load, counted in parsed meshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: usize,
    pub total: usize,
}

/// Callback-based model loader.
///
/// Implementations call at most one of `on_load` / `on_error`, from any
/// thread. Dropping both without calling either is reported to the waiting
/// side as [`LoadError::Abandoned`].
pub trait ModelLoader: Send + Sync {
    fn load(&self, url: &str, on_load: OnLoad, on_progress: Option<OnProgress>, on_error: OnError);
}

type LoadResult = Result<ModelObject, LoadError>;
type SharedSender = Arc<Mutex<Option<oneshot::Sender<LoadResult>>>>;

/// A model load that has not settled yet.
pub struct PendingLoad {
    state: PendingState,
}

enum PendingState {
    Ready(Option<LoadResult>),
    Waiting(oneshot::Receiver<LoadResult>),
}

impl PendingLoad {
    fn ready(result: LoadResult) -> Self {
        Self {
            state: PendingState::Ready(Some(result)),
        }
    }

    fn waiting(receiver: oneshot::Receiver<LoadResult>) -> Self {
        Self {
            state: PendingState::Waiting(receiver),
        }
    }
}

impl Future for PendingLoad {
    type Output = LoadResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.state {
            PendingState::Ready(result) => {
                Poll::Ready(result.take().unwrap_or(Err(LoadError::Abandoned)))
            }
            PendingState::Waiting(receiver) => receiver
                .poll_unpin(cx)
                .map(|received| received.unwrap_or(Err(LoadError::Abandoned))),
        }
    }
}

/// Starts loading `url` with `loader`.
///
/// A missing or blank url settles immediately with [`LoadError::MissingUrl`]
/// and never reaches the loader. Progress is not observed.
pub fn load_with(loader: &dyn ModelLoader, url: Option<&str>) -> PendingLoad {
    let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return PendingLoad::ready(Err(LoadError::MissingUrl));
    };

    let (sender, receiver) = oneshot::channel();
    let sender: SharedSender = Arc::new(Mutex::new(Some(sender)));

    let load_sender = sender.clone();
    let load_url = url.to_string();
    let on_load: OnLoad = Box::new(move |object| settle(&load_sender, Ok(object), &load_url));

    let error_url = url.to_string();
    let on_error: OnError = Box::new(move |err| settle(&sender, Err(err), &error_url));

    log::info!("Loading model from {url}");
    loader.load(url, on_load, None, on_error);

    PendingLoad::waiting(receiver)
}

fn settle(slot: &SharedSender, result: LoadResult, url: &str) {
    let sender = slot
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();

    let Some(sender) = sender else {
        log::warn!("Loader reported a second result for {url}; ignoring it");
        return;
    };

    match &result {
        Ok(object) => log::info!(
            "Loaded {url}: {} meshes, {} triangles",
            object.children.len(),
            object.triangle_count()
        ),
        Err(err) => log::error!("Failed to load {url}: {err}"),
    }

    if sender.send(result).is_err() {
        log::debug!("Nobody is waiting for {url} anymore");
    }
}

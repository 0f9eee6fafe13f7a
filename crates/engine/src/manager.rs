//! Converter lifecycle manager.
//!
//! [`ConverterManager`] owns the single engine handle and governs the
//! "idle -> initializing -> ready" state machine. Overlapping
//! `initialize` calls attach to one shared attempt instead of racing
//! independent engine constructions, so the heavyweight engine is built
//! at most once per attempt and every concurrent caller observes the
//! same outcome. A failed attempt resets the manager so the next call
//! starts fresh; there is no automatic retry and no timeout (callers may
//! wrap these futures externally).
//!
//! `destroy()` must not be called concurrently with an in-flight
//! `convert()`; the engine handle is only borrowed for the duration of a
//! conversion and no lock is held across that boundary.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use docbridge_core::progress::total_size_mb;
use docbridge_core::{
    build_progress_message, ConvertError, OutputFormat, ProgressEvent, ProgressPhase,
};

use crate::dispatch::{self, DocumentBlob};
use crate::engine::{ConversionEngine, EngineLoader, EngineProgress, ProgressSink};
use crate::environment::{check_environment, HostContext};

/// Caller-supplied progress observer. Invoked zero or more times during
/// one initialization attempt, never after the attempt settles.
pub type ProgressCallback = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// One in-flight initialization run, shared by every overlapping caller.
struct Attempt {
    /// Late-bindable progress callback: a background preload can start
    /// silently and a later user-facing call supplies the reporter.
    /// Cleared when the attempt settles so no update fires afterwards.
    callback: Mutex<Option<ProgressCallback>>,
    /// Completion signal observed by every subscribed caller.
    outcome: watch::Sender<Option<Result<(), ConvertError>>>,
}

impl Attempt {
    fn emit(&self, event: ProgressEvent) {
        // The callback runs without the lock held; it may call back into
        // the manager.
        let cb = self.callback.lock().clone();
        if let Some(cb) = cb {
            cb(&event);
        }
    }
}

enum Lifecycle {
    Idle,
    Initializing(Arc<Attempt>),
    Ready(Arc<dyn ConversionEngine>),
}

/// Owns zero-or-one live engine instance and coordinates its lifecycle.
///
/// Cheap to clone; all clones share the same engine handle and state.
/// Usually obtained through [`crate::factory::ConverterFactory`].
#[derive(Clone)]
pub struct ConverterManager {
    inner: Arc<Inner>,
}

struct Inner {
    base_url: String,
    host: Arc<dyn HostContext>,
    loader: Arc<dyn EngineLoader>,
    http: reqwest::Client,
    state: Mutex<Lifecycle>,
    /// Bumped by `destroy()`; an attempt that finishes under an older
    /// epoch installs nothing.
    epoch: AtomicU64,
}

impl ConverterManager {
    pub fn new(
        base_url: impl Into<String>,
        host: Arc<dyn HostContext>,
        loader: Arc<dyn EngineLoader>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                base_url: base_url.into(),
                host,
                loader,
                http: reqwest::Client::new(),
                state: Mutex::new(Lifecycle::Idle),
                epoch: AtomicU64::new(0),
            }),
        }
    }

    /// Initialize the engine, attaching to an in-flight attempt if one
    /// exists. Idempotent once ready.
    ///
    /// If `callback` is supplied and the current attempt has none bound,
    /// it becomes the active callback for the remainder of that attempt.
    /// On failure the attempt is cleared, so calling again starts a new
    /// one.
    pub async fn initialize(
        &self,
        mut callback: Option<ProgressCallback>,
    ) -> Result<(), ConvertError> {
        // Invariant: the callback lock is never taken while the state
        // lock is held, so a callback is free to reenter the manager.
        let (joined, mut rx) = {
            let mut state = self.inner.state.lock();
            match &*state {
                Lifecycle::Ready(_) => return Ok(()),
                Lifecycle::Initializing(attempt) => {
                    (Some(Arc::clone(attempt)), attempt.outcome.subscribe())
                }
                Lifecycle::Idle => {
                    let (tx, rx) = watch::channel(None);
                    let attempt = Arc::new(Attempt {
                        callback: Mutex::new(callback.take()),
                        outcome: tx,
                    });
                    *state = Lifecycle::Initializing(Arc::clone(&attempt));

                    let inner = Arc::clone(&self.inner);
                    let epoch = self.inner.epoch.load(Ordering::SeqCst);
                    tokio::spawn(async move { inner.drive_attempt(attempt, epoch).await });
                    (None, rx)
                }
            }
        };

        if let (Some(attempt), Some(cb)) = (joined, callback) {
            let mut bound = attempt.callback.lock();
            if bound.is_none() {
                tracing::debug!("Binding progress callback to in-flight attempt");
                *bound = Some(cb);
            }
        }

        let settled = rx
            .wait_for(|outcome| outcome.is_some())
            .await
            .map_err(|_| ConvertError::Engine("initialization attempt was dropped".into()))?;
        settled.clone().unwrap_or_else(|| {
            Err(ConvertError::Engine("initialization attempt was dropped".into()))
        })
    }

    /// True iff the engine is constructed and ready for conversions.
    pub fn is_ready(&self) -> bool {
        matches!(&*self.inner.state.lock(), Lifecycle::Ready(_))
    }

    /// Convert a document file into `output_format`.
    ///
    /// Fails with [`ConvertError::NotInitialized`] before any file read
    /// when no ready engine exists; there is no auto-initialization. A
    /// failed conversion leaves the engine ready for the next call.
    pub async fn convert(
        &self,
        path: &Path,
        output_format: OutputFormat,
    ) -> Result<DocumentBlob, ConvertError> {
        let engine = {
            match &*self.inner.state.lock() {
                Lifecycle::Ready(engine) => Arc::clone(engine),
                _ => return Err(ConvertError::NotInitialized),
            }
        };
        dispatch::convert_file(engine.as_ref(), path, output_format).await
    }

    /// Convert to PDF.
    pub async fn convert_to_pdf(&self, path: &Path) -> Result<DocumentBlob, ConvertError> {
        self.convert(path, OutputFormat::Pdf).await
    }

    /// Convert to DOCX.
    pub async fn convert_to_docx(&self, path: &Path) -> Result<DocumentBlob, ConvertError> {
        self.convert(path, OutputFormat::Docx).await
    }

    /// Convert to ODT.
    pub async fn convert_to_odt(&self, path: &Path) -> Result<DocumentBlob, ConvertError> {
        self.convert(path, OutputFormat::Odt).await
    }

    /// Convert to HTML.
    pub async fn convert_to_html(&self, path: &Path) -> Result<DocumentBlob, ConvertError> {
        self.convert(path, OutputFormat::Html).await
    }

    /// Release the engine if present and reset to idle. Idempotent; safe
    /// to call when never initialized.
    pub async fn destroy(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        let previous = std::mem::replace(&mut *self.inner.state.lock(), Lifecycle::Idle);
        match previous {
            Lifecycle::Ready(engine) => {
                engine.shutdown().await;
                tracing::info!("Conversion engine destroyed");
            }
            Lifecycle::Initializing(attempt) => {
                attempt.callback.lock().take();
                tracing::warn!("Converter destroyed while an initialization was in flight");
            }
            Lifecycle::Idle => {}
        }
    }
}

impl Inner {
    /// Run one attempt to completion and settle it: install the handle on
    /// success, reset to idle on failure, clear the callback either way,
    /// and deliver the outcome to every subscriber.
    async fn drive_attempt(self: Arc<Self>, attempt: Arc<Attempt>, epoch: u64) {
        let outcome = match self.run_sequence(&attempt).await {
            Ok(engine) => {
                let installed = {
                    let mut state = self.state.lock();
                    if self.epoch.load(Ordering::SeqCst) == epoch {
                        *state = Lifecycle::Ready(Arc::clone(&engine));
                        true
                    } else {
                        false
                    }
                };
                if installed {
                    tracing::info!("Conversion engine ready");
                    attempt.emit(ProgressEvent::new(
                        ProgressPhase::Ready,
                        100,
                        "Conversion engine ready",
                    ));
                    Ok(())
                } else {
                    // destroy() won the race; release the fresh engine.
                    engine.shutdown().await;
                    Err(ConvertError::Engine(
                        "converter was destroyed during initialization".into(),
                    ))
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Engine initialization failed");
                {
                    let mut state = self.state.lock();
                    if matches!(&*state, Lifecycle::Initializing(a) if Arc::ptr_eq(a, &attempt)) {
                        *state = Lifecycle::Idle;
                    }
                }
                Err(e)
            }
        };

        attempt.callback.lock().take();
        let _ = attempt.outcome.send(Some(outcome));
    }

    /// The attempt sequence: environment check, engine construction with
    /// progress relay, readiness.
    async fn run_sequence(
        &self,
        attempt: &Arc<Attempt>,
    ) -> Result<Arc<dyn ConversionEngine>, ConvertError> {
        attempt.emit(ProgressEvent::new(
            ProgressPhase::Loading,
            0,
            build_progress_message(0.0, 0),
        ));

        let total_bytes = check_environment(self.host.as_ref(), &self.http, &self.base_url).await?;

        let message = if total_bytes > 0 {
            format!(
                "Downloading engine assets ({:.1} MB)...",
                total_size_mb(total_bytes)
            )
        } else {
            build_progress_message(5.0, 0)
        };
        attempt.emit(ProgressEvent::new(ProgressPhase::Loading, 5, message));

        // Relay the engine's raw stream only until it reports ready.
        let ready = Arc::new(AtomicBool::new(false));
        let sink: ProgressSink = {
            let ready = Arc::clone(&ready);
            let attempt = Arc::clone(attempt);
            Arc::new(move |raw: EngineProgress| {
                if ready.load(Ordering::SeqCst) {
                    return;
                }
                let percent = raw.percent.clamp(0.0, 100.0);
                attempt.emit(ProgressEvent::new(
                    raw.phase,
                    percent.round() as u8,
                    build_progress_message(percent, total_bytes),
                ));
            })
        };

        let engine = self
            .loader
            .load(&self.base_url, sink)
            .await
            .map_err(|e| ConvertError::Engine(e.to_string()))?;
        ready.store(true, Ordering::SeqCst);

        Ok(Arc::from(engine))
    }
}

//! Sync daemon
//!
//! Each watch target gets its own `notify` watcher feeding a channel and a
//! worker thread draining it. Events for one target are handled in order;
//! the two targets run independently and share nothing but the file system.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::Config;
use crate::error::WebsyncResult;
use crate::transport::Connector;

use super::content::ContentWatcher;
use super::event::{ChangeEvent, DaemonEvent, EventSink};
use super::mirror::MirrorWatcher;

/// How long a worker waits for an event before rechecking the running flag
const RECV_TIMEOUT_MS: u64 = 50;

/// Reacts to changes below a watch root
pub trait EventHandler: Send + Sync {
    /// Short label used in notices and thread names
    fn name(&self) -> &'static str;

    /// Handle one change; failures are reported, never returned
    fn handle(&self, event: &ChangeEvent);
}

/// A root registered with the watch backend and the handler for its events
#[derive(Clone)]
pub struct WatchTarget {
    pub root: PathBuf,
    pub recursive: bool,
    pub handler: Arc<dyn EventHandler>,
}

impl WatchTarget {
    pub fn new(root: PathBuf, recursive: bool, handler: Arc<dyn EventHandler>) -> Self {
        Self {
            root,
            recursive,
            handler,
        }
    }

    fn start(&self, running: Arc<AtomicBool>, sink: EventSink) -> WebsyncResult<RunningTarget> {
        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                let _ = tx.send(res);
            },
            NotifyConfig::default(),
        )?;

        let mode = if self.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(&self.root, mode)?;

        let handler = Arc::clone(&self.handler);
        let worker_sink = Arc::clone(&sink);
        let worker = thread::Builder::new()
            .name(format!("websync-{}", handler.name()))
            .spawn(move || {
                while running.load(Ordering::SeqCst) {
                    match rx.recv_timeout(Duration::from_millis(RECV_TIMEOUT_MS)) {
                        Ok(Ok(event)) => {
                            for change in ChangeEvent::from_notify(&event) {
                                handler.handle(&change);
                            }
                        }
                        Ok(Err(err)) => worker_sink(DaemonEvent::Error {
                            message: format!("{} watcher: {err}", handler.name()),
                        }),
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;

        sink(DaemonEvent::WatchStarted {
            target: self.handler.name().to_string(),
            root: self.root.display().to_string(),
        });

        Ok(RunningTarget {
            name: self.handler.name(),
            watcher,
            worker,
        })
    }
}

struct RunningTarget {
    name: &'static str,
    watcher: RecommendedWatcher,
    worker: JoinHandle<()>,
}

/// Started watchers; dropping without [`DaemonHandle::stop`] leaves workers detached
pub struct DaemonHandle {
    running: Arc<AtomicBool>,
    targets: Vec<RunningTarget>,
    sink: EventSink,
}

impl DaemonHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop event dispatch and wait for every worker to finish.
    ///
    /// An in-flight transfer is not interrupted; the join waits for it.
    pub fn stop(self) {
        self.running.store(false, Ordering::SeqCst);
        for target in self.targets {
            drop(target.watcher);
            if target.worker.join().is_err() {
                (self.sink)(DaemonEvent::Error {
                    message: format!("{} worker panicked", target.name),
                });
            }
        }
        (self.sink)(DaemonEvent::Shutdown);
    }
}

/// Owns the watch targets for the lifetime of the process
pub struct SyncDaemon {
    targets: Vec<WatchTarget>,
    poll_interval: Duration,
    sink: EventSink,
}

impl SyncDaemon {
    pub fn new(targets: Vec<WatchTarget>, poll_interval: Duration, sink: EventSink) -> Self {
        Self {
            targets,
            poll_interval,
            sink,
        }
    }

    /// Source watcher on `source_root`, mirror watcher on `mirror_root`, both recursive
    pub fn from_config(config: &Config, connector: Arc<dyn Connector>, sink: EventSink) -> Self {
        let content = ContentWatcher::new(config.routes.clone(), Arc::clone(&sink));
        let mirror = MirrorWatcher::from_config(config, connector, Arc::clone(&sink));

        Self::new(
            vec![
                WatchTarget::new(config.source_root.clone(), true, Arc::new(content)),
                WatchTarget::new(config.mirror_root.clone(), true, Arc::new(mirror)),
            ],
            config.poll_interval,
            sink,
        )
    }

    pub fn targets(&self) -> &[WatchTarget] {
        &self.targets
    }

    /// Start every target. If one fails to start, those already started are stopped.
    pub fn start(&self, running: Arc<AtomicBool>) -> WebsyncResult<DaemonHandle> {
        let mut handle = DaemonHandle {
            running: Arc::clone(&running),
            targets: Vec::with_capacity(self.targets.len()),
            sink: Arc::clone(&self.sink),
        };

        for target in &self.targets {
            match target.start(Arc::clone(&running), Arc::clone(&self.sink)) {
                Ok(started) => handle.targets.push(started),
                Err(err) => {
                    handle.stop();
                    return Err(err);
                }
            }
        }

        Ok(handle)
    }

    /// Start, idle until `running` is cleared, then stop and join
    pub fn run(&self, running: Arc<AtomicBool>) -> WebsyncResult<()> {
        let handle = self.start(Arc::clone(&running))?;
        while running.load(Ordering::SeqCst) {
            thread::sleep(self.poll_interval);
        }
        handle.stop();
        Ok(())
    }
}

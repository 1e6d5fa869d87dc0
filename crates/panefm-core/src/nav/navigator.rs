//! Per-pane navigation orchestrator.
//!
//! A [`Navigator`] owns "where am I" for one pane. Intents are applied
//! synchronously under a single lock: the generation counter is bumped,
//! history is updated and the new state is published before the call
//! returns. The directory read itself runs on the tokio runtime; when it
//! finishes, its result is applied only if its generation is still the
//! newest one issued, so the last navigation always wins no matter which read
//! resolves first.

use std::ffi::{OsStr, OsString};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;

use crate::config::settings::Config;
use crate::error::{CoreError, CoreResult, ReadError};
use crate::event::{DispatchOutcome, Intent};
use crate::fs::entry::DirectoryEntry;
use crate::fs::listing::DirectoryListing;
use crate::fs::reader::DirectoryReader;
use crate::nav::cache::ListingCache;
use crate::nav::history::NavigationHistory;
use crate::nav::path::PathValue;
use crate::status::{Severity, SilentNotifier, StatusNotifier};
use crate::terminal::TerminalSession;

/// Tunables for a [`Navigator`].
#[derive(Debug, Clone)]
pub struct NavigatorOptions {
    /// Reads still pending after this long resolve as [`ReadError::TimedOut`].
    pub read_timeout: Option<Duration>,
    pub cache_capacity: usize,
    /// Cached listings younger than this are shown while the re-read runs.
    pub cache_ttl: Duration,
    /// Abort the previous read task when a newer intent supersedes it.
    pub cancel_superseded: bool,
    /// Initial terminal visibility.
    pub terminal_visible: bool,
    /// Whether navigation pushes working-directory changes to the terminal.
    pub sync_terminal_cwd: bool,
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl NavigatorOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            read_timeout: config.navigation.read_timeout(),
            cache_capacity: config.navigation.cache_capacity,
            cache_ttl: config.navigation.cache_ttl(),
            cancel_superseded: config.navigation.cancel_superseded,
            terminal_visible: config.terminal.display_at_startup,
            sync_terminal_cwd: config.terminal.sync_cwd,
        }
    }
}

/// What the listing area of a pane shows.
#[derive(Debug, Clone, PartialEq)]
pub enum NavState {
    /// The listing for the current path has been read.
    Idle { listing: Arc<DirectoryListing> },
    /// A read tagged `generation` is pending. `cached` holds a recent listing
    /// of the same path that may be shown meanwhile.
    Loading {
        generation: u64,
        cached: Option<Arc<DirectoryListing>>,
    },
    /// The current path could not be read. The location still changed.
    Error { error: ReadError },
}

/// Everything a pane needs to render, published after every transition.
#[derive(Debug, Clone, PartialEq)]
pub struct NavSnapshot {
    pub path: PathValue,
    pub state: NavState,
    /// Newest generation issued so far.
    pub generation: u64,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub terminal_open: bool,
}

impl NavSnapshot {
    pub fn is_loading(&self) -> bool {
        matches!(self.state, NavState::Loading { .. })
    }

    /// The listing to display: the resolved one, or a cached one while loading.
    pub fn listing(&self) -> Option<&Arc<DirectoryListing>> {
        match &self.state {
            NavState::Idle { listing } => Some(listing),
            NavState::Loading { cached, .. } => cached.as_ref(),
            NavState::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ReadError> {
        match &self.state {
            NavState::Error { error } => Some(error),
            _ => None,
        }
    }
}

/// A pane controller's view of published navigator state.
///
/// Dropping the subscription (or calling [`unsubscribe`](Self::unsubscribe))
/// ends it; each controller holds its own.
#[derive(Debug)]
pub struct Subscription {
    rx: watch::Receiver<NavSnapshot>,
}

impl Subscription {
    /// The most recently published snapshot.
    pub fn latest(&self) -> NavSnapshot {
        self.rx.borrow().clone()
    }

    /// Waits for the next publication. Returns `None` once the navigator is
    /// gone.
    pub async fn changed(&mut self) -> Option<NavSnapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Waits until a published snapshot satisfies `pred`, checking the
    /// current one first.
    pub async fn wait_for(
        &mut self,
        mut pred: impl FnMut(&NavSnapshot) -> bool,
    ) -> Option<NavSnapshot> {
        let snapshot = self.rx.wait_for(|s| pred(s)).await.ok()?;
        Some(snapshot.clone())
    }

    pub fn unsubscribe(self) {}
}

/// Builder for [`Navigator`].
pub struct NavigatorBuilder {
    initial: PathValue,
    reader: Arc<dyn DirectoryReader>,
    options: NavigatorOptions,
    notifier: Arc<dyn StatusNotifier>,
    terminal: Option<Arc<dyn TerminalSession>>,
}

impl NavigatorBuilder {
    pub fn with_options(self, options: NavigatorOptions) -> Self {
        Self { options, ..self }
    }

    pub fn with_status_notifier(self, notifier: Arc<dyn StatusNotifier>) -> Self {
        Self { notifier, ..self }
    }

    pub fn with_terminal(self, terminal: Arc<dyn TerminalSession>) -> Self {
        Self {
            terminal: Some(terminal),
            ..self
        }
    }

    /// Creates the navigator and issues the read of the initial path on
    /// `runtime`.
    pub fn build(self, runtime: Handle) -> Navigator {
        let core = Core {
            history: NavigationHistory::new(self.initial.clone()),
            cache: ListingCache::new(self.options.cache_capacity),
            generation: 0,
            fetch_seq: 0,
            state: NavState::Loading {
                generation: 0,
                cached: None,
            },
            terminal: self.terminal,
            terminal_visible: self.options.terminal_visible,
            in_flight: None,
        };
        let (publisher, _) = watch::channel(core.snapshot());
        let shared = Arc::new(Shared {
            core: Mutex::new(core),
            reader: self.reader,
            notifier: self.notifier,
            options: self.options,
            runtime,
            publisher,
        });

        {
            let mut core = shared.lock();
            shared.begin_load(&mut core, self.initial, true);
            shared.publish(&core);
        }

        Navigator { shared }
    }
}

/// Navigation state machine for one pane.
///
/// All methods return immediately; reads complete in the background and are
/// observed through [`subscribe`](Self::subscribe).
pub struct Navigator {
    shared: Arc<Shared>,
}

impl Navigator {
    pub fn builder(initial: PathValue, reader: Arc<dyn DirectoryReader>) -> NavigatorBuilder {
        NavigatorBuilder {
            initial,
            reader,
            options: NavigatorOptions::default(),
            notifier: Arc::new(SilentNotifier),
            terminal: None,
        }
    }

    /// Applies `intent`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NoHistory`] for `Back`/`Forward` with an empty stack.
    /// - [`CoreError::InvalidPath`] for `Up` at the root.
    ///
    /// A rejected intent leaves the navigator untouched.
    pub fn dispatch(&self, intent: Intent) -> CoreResult<DispatchOutcome> {
        tracing::debug!("dispatch {intent:?}");
        let outcome = match intent {
            Intent::NavigateTo(target) => DispatchOutcome::Loading {
                generation: self.navigate(target),
            },
            Intent::Back => DispatchOutcome::Loading {
                generation: self.back()?,
            },
            Intent::Forward => DispatchOutcome::Loading {
                generation: self.forward()?,
            },
            Intent::Up => DispatchOutcome::Loading {
                generation: self.up()?,
            },
            Intent::Refresh => DispatchOutcome::Loading {
                generation: self.refresh(),
            },
            Intent::ToggleTerminal => self.toggle_terminal(),
        };
        Ok(outcome)
    }

    /// Goes to `target`. The path and history change immediately; the
    /// listing follows when the read resolves. Navigating to the current path
    /// re-reads it without touching history.
    ///
    /// Returns the generation of the issued read.
    pub fn navigate(&self, target: PathValue) -> u64 {
        let mut core = self.shared.lock();
        self.record_and_load(&mut core, target)
    }

    /// Normalizes `raw` and navigates to it.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPath`] before anything changes.
    pub fn navigate_str(&self, raw: &str) -> CoreResult<u64> {
        let target = PathValue::normalize(raw)?;
        Ok(self.navigate(target))
    }

    /// Enters `name` relative to the current path.
    ///
    /// A name matching an entry of the current listing, by its on-disk or its
    /// display form, resolves to that entry's on-disk name. Anything else is
    /// joined as given, so `name` may also be a relative path.
    pub fn enter(&self, name: impl AsRef<OsStr>) -> CoreResult<u64> {
        let name = name.as_ref();
        self.navigate_with(|core| match core.listed_file_name(name) {
            Some(on_disk) => core.history.current().join(on_disk),
            None => core.history.current().join(name),
        })
    }

    pub fn back(&self) -> CoreResult<u64> {
        let shared = &self.shared;
        let mut core = shared.lock();
        let target = core.history.go_back()?;
        let generation = shared.begin_load(&mut core, target, true);
        shared.publish(&core);
        Ok(generation)
    }

    pub fn forward(&self) -> CoreResult<u64> {
        let shared = &self.shared;
        let mut core = shared.lock();
        let target = core.history.go_forward()?;
        let generation = shared.begin_load(&mut core, target, true);
        shared.publish(&core);
        Ok(generation)
    }

    pub fn up(&self) -> CoreResult<u64> {
        self.navigate_with(|core| {
            core.history
                .current()
                .parent()
                .ok_or_else(|| CoreError::InvalidPath("already at the root".to_string()))
        })
    }

    /// Re-reads the current path, bypassing the cached render.
    pub fn refresh(&self) -> u64 {
        let shared = &self.shared;
        let mut core = shared.lock();
        let target = core.history.current().clone();
        let generation = shared.begin_load(&mut core, target, false);
        shared.publish(&core);
        generation
    }

    /// Flips terminal visibility.
    ///
    /// The new visibility is published first; only then, and exactly once,
    /// the dependent effect runs: an opened terminal is pointed at the
    /// current path.
    pub fn toggle_terminal(&self) -> DispatchOutcome {
        let (opened, terminal, path) = {
            let mut core = self.shared.lock();
            let was_open = core.terminal_visible;
            core.terminal_visible = !was_open;
            self.shared.publish(&core);
            let terminal = core.attached_terminal(self.shared.options.sync_terminal_cwd);
            (!was_open, terminal, core.history.current().clone())
        };

        if !opened {
            return DispatchOutcome::TerminalClosed;
        }
        if let Some(terminal) = terminal {
            push_working_directory(terminal.as_ref(), &path);
        }
        DispatchOutcome::TerminalOpened
    }

    /// Binds a terminal. If it is visible it is immediately pointed at the
    /// current path.
    pub fn attach_terminal(&self, terminal: Arc<dyn TerminalSession>) {
        let (attached, path) = {
            let mut core = self.shared.lock();
            core.terminal = Some(terminal);
            (
                core.attached_terminal(self.shared.options.sync_terminal_cwd),
                core.history.current().clone(),
            )
        };
        if let Some(terminal) = attached {
            push_working_directory(terminal.as_ref(), &path);
        }
    }

    pub fn detach_terminal(&self) -> Option<Arc<dyn TerminalSession>> {
        self.shared.lock().terminal.take()
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.shared.publisher.subscribe(),
        }
    }

    /// Snapshot of the current state.
    pub fn current_state(&self) -> NavSnapshot {
        self.shared.publisher.borrow().clone()
    }

    pub fn current_path(&self) -> PathValue {
        self.shared.lock().history.current().clone()
    }

    /// A copy of the history, for breadcrumbs and back/forward menus.
    pub fn history(&self) -> NavigationHistory {
        self.shared.lock().history.clone()
    }

    pub fn cached_listing(&self, path: &PathValue) -> Option<Arc<DirectoryListing>> {
        self.shared.lock().cache.peek(path).cloned()
    }

    /// Resolves a target from the current state and navigates to it without
    /// releasing the lock in between.
    fn navigate_with(
        &self,
        resolve: impl FnOnce(&Core) -> CoreResult<PathValue>,
    ) -> CoreResult<u64> {
        let mut core = self.shared.lock();
        let target = resolve(&*core)?;
        Ok(self.record_and_load(&mut core, target))
    }

    fn record_and_load(&self, core: &mut Core, target: PathValue) -> u64 {
        if !core.history.record_navigation(target.clone()) {
            tracing::debug!("navigate to current path {target}, re-reading");
        }
        let generation = self.shared.begin_load(core, target, true);
        self.shared.publish(core);
        generation
    }
}

impl Drop for Navigator {
    fn drop(&mut self) {
        if let Some(task) = self.shared.lock().in_flight.take() {
            task.abort();
        }
    }
}

struct Shared {
    core: Mutex<Core>,
    reader: Arc<dyn DirectoryReader>,
    notifier: Arc<dyn StatusNotifier>,
    options: NavigatorOptions,
    runtime: Handle,
    publisher: watch::Sender<NavSnapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, core: &Core) {
        self.publisher.send_replace(core.snapshot());
    }

    /// Bumps the generation and spawns the read of `target`. The caller holds
    /// the lock and publishes afterwards.
    fn begin_load(self: &Arc<Self>, core: &mut Core, target: PathValue, use_cache: bool) -> u64 {
        core.generation += 1;
        let generation = core.generation;

        if let Some(previous) = core.in_flight.take() {
            if self.options.cancel_superseded {
                previous.abort();
            }
        }

        let cached = if use_cache {
            core.cache.get_fresh(&target, self.options.cache_ttl)
        } else {
            None
        };
        tracing::debug!(
            "generation {generation}: reading {target}{}",
            if cached.is_some() { " (cached render)" } else { "" }
        );
        core.state = NavState::Loading { generation, cached };

        let weak = Arc::downgrade(self);
        let reader = Arc::clone(&self.reader);
        let timeout = self.options.read_timeout;
        let task = self.runtime.spawn(async move {
            let result = match timeout {
                Some(limit) => tokio::time::timeout(limit, reader.read(&target))
                    .await
                    .unwrap_or(Err(ReadError::TimedOut(limit))),
                None => reader.read(&target).await,
            };
            complete(&weak, generation, target, result);
        });
        core.in_flight = Some(task.abort_handle());

        generation
    }

    /// Applies a finished read if it is still the newest generation.
    fn complete(
        &self,
        generation: u64,
        target: PathValue,
        result: Result<Vec<DirectoryEntry>, ReadError>,
    ) {
        let (terminal, failure) = {
            let mut core = self.lock();
            if generation != core.generation {
                tracing::debug!(
                    "discarding stale result for {target} (generation {generation}, latest {})",
                    core.generation
                );
                return;
            }
            core.in_flight = None;

            let failure = match result {
                Ok(entries) => {
                    core.fetch_seq += 1;
                    let listing = Arc::new(DirectoryListing::new(
                        target.clone(),
                        entries,
                        generation,
                        core.fetch_seq,
                    ));
                    core.cache.put(target.clone(), Arc::clone(&listing));
                    core.state = NavState::Idle { listing };
                    None
                }
                Err(error) => {
                    tracing::warn!("failed to read {target}: {error}");
                    core.state = NavState::Error {
                        error: error.clone(),
                    };
                    Some(error)
                }
            };
            self.publish(&core);
            (core.attached_terminal(self.options.sync_terminal_cwd), failure)
        };

        if let Some(error) = failure {
            let severity = match error {
                ReadError::TimedOut(_) => Severity::Warning,
                _ => Severity::Error,
            };
            self.notifier
                .notify(&format!("cannot read {target}: {error}"), severity);
        }
        if let Some(terminal) = terminal {
            push_working_directory(terminal.as_ref(), &target);
        }
    }
}

fn complete(
    shared: &Weak<Shared>,
    generation: u64,
    target: PathValue,
    result: Result<Vec<DirectoryEntry>, ReadError>,
) {
    match shared.upgrade() {
        Some(shared) => shared.complete(generation, target, result),
        None => tracing::debug!("navigator dropped before read of {target} finished"),
    }
}

fn push_working_directory(terminal: &dyn TerminalSession, path: &PathValue) {
    if let Err(e) = terminal.set_working_directory(path) {
        tracing::warn!("terminal did not take cwd {path}: {e}");
    }
}

struct Core {
    history: NavigationHistory,
    cache: ListingCache,
    generation: u64,
    fetch_seq: u64,
    state: NavState,
    terminal: Option<Arc<dyn TerminalSession>>,
    terminal_visible: bool,
    in_flight: Option<AbortHandle>,
}

impl Core {
    fn snapshot(&self) -> NavSnapshot {
        NavSnapshot {
            path: self.history.current().clone(),
            state: self.state.clone(),
            generation: self.generation,
            can_go_back: self.history.can_go_back(),
            can_go_forward: self.history.can_go_forward(),
            terminal_open: self.terminal_visible,
        }
    }

    /// On-disk name of the entry in the current listing that `name` refers
    /// to.
    fn listed_file_name(&self, name: &OsStr) -> Option<OsString> {
        let current = self.history.current();
        let shown = self
            .state_listing()
            .filter(|listing| listing.path() == current)
            .or_else(|| self.cache.peek(current))?;
        let display = name.to_str();
        shown
            .entries()
            .iter()
            .find(|e| e.file_name() == name)
            .or_else(|| shown.entries().iter().find(|e| Some(e.name()) == display))
            .map(|e| e.file_name().to_os_string())
    }

    fn state_listing(&self) -> Option<&Arc<DirectoryListing>> {
        match &self.state {
            NavState::Idle { listing } => Some(listing),
            NavState::Loading { cached, .. } => cached.as_ref(),
            NavState::Error { .. } => None,
        }
    }

    /// The terminal to notify, if one is bound, visible and syncing.
    fn attached_terminal(&self, sync_cwd: bool) -> Option<Arc<dyn TerminalSession>> {
        if !(sync_cwd && self.terminal_visible) {
            return None;
        }
        self.terminal.clone()
    }
}

//! Engine - main entry point
//!
//! Owns the component set and wires the event entry points together.
//! Single-threaded, event-driven: every entry point runs to completion
//! on the calling thread and walks only its payload; whole-tree work
//! happens once, in [`Engine::attach`]. Each component tags its own
//! concern on a node and nothing else, so the concerns stay orthogonal
//! and every step is idempotent at single-node granularity.

use std::time::{Duration, Instant};

use lectern_content::locate;
use lectern_css::{CONTENT_REGION_CLASS, ReaderSettings, auto_night_active, synthesize};
use lectern_dom::{DocumentTree, MutationBatch, NodeId};
use lectern_filter::{FilterStats, MutationFilter, PatternError};
use lectern_lazy::{Viewport, ViewportLoader, suppress_autoplay};

use crate::debounce::Debounce;
use crate::sink::StyleSink;
use crate::store::{SettingsStore, StoreError};

/// Engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// The reading-enhancement engine
pub struct Engine<S: SettingsStore, K: StyleSink> {
    store: S,
    sink: K,
    settings: ReaderSettings,
    filter: MutationFilter,
    loader: ViewportLoader,
    debounce: Debounce,
    content_region: Option<NodeId>,
    local_hour: Option<u8>,
    attached: bool,
}

impl<S: SettingsStore, K: StyleSink> Engine<S, K> {
    /// Create an engine. The built-in pattern rules compile here; a
    /// malformed rule is fatal at initialization, never at match time.
    pub fn new(store: S, sink: K, debounce_window: Duration) -> Result<Self, EngineError> {
        let filter = MutationFilter::with_default_rules()?;
        let settings = store.get();
        Ok(Self {
            store,
            sink,
            settings,
            filter,
            loader: ViewportLoader::new(),
            debounce: Debounce::new(debounce_window),
            content_region: None,
            local_hour: None,
            attached: false,
        })
    }

    /// One-time initial pass over a freshly available tree: filter scan,
    /// content-region tagging (root fallback), lazy-load setup, autoplay
    /// suppression, and the first synthesis-and-apply.
    pub fn attach<T: DocumentTree>(&mut self, tree: &mut T, viewport: &Viewport) {
        if self.attached {
            tracing::warn!("attach on an attached engine ignored");
            return;
        }
        self.settings = self.store.get();

        if self.settings.enable_ad_block {
            self.filter.scan_initial(tree);
        }

        let region = locate(tree).unwrap_or_else(|| tree.root());
        tree.add_class(region, CONTENT_REGION_CLASS);
        self.content_region = Some(region);

        if self.settings.enable_lazy_load {
            self.loader.initialize(tree, viewport);
        }
        suppress_autoplay(tree);

        self.apply_styles();
        self.attached = true;
        tracing::info!(region = ?region, "engine attached");
    }

    /// Handle one batched tree-change notification. Only the batch
    /// payload is walked, never the whole tree.
    pub fn on_mutation<T: DocumentTree>(&mut self, tree: &mut T, batch: &MutationBatch) {
        if !self.attached {
            return;
        }
        if self.settings.enable_ad_block {
            self.filter.on_mutation(tree, &batch.added);
        }
    }

    /// Handle a batch of visibility-region entry events
    pub fn on_region_entry<T: DocumentTree>(&mut self, tree: &mut T, entered: &[NodeId]) {
        if !self.attached {
            return;
        }
        self.loader.on_enter(tree, entered);
    }

    /// A configuration edit happened somewhere; re-synthesis is deferred
    /// until the quiescence window passes.
    pub fn on_settings_changed(&mut self, now: Instant) {
        self.debounce.notify(now);
    }

    /// Persist a new snapshot and schedule re-synthesis. The write may
    /// fail; styling then keeps following the stored snapshot.
    pub fn update_settings(
        &mut self,
        settings: &ReaderSettings,
        now: Instant,
    ) -> Result<(), EngineError> {
        self.store.set(settings)?;
        self.debounce.notify(now);
        Ok(())
    }

    /// Inform the engine of the local wall-clock hour (auto-night input)
    pub fn on_clock(&mut self, hour: u8, now: Instant) {
        if self.local_hour == Some(hour) {
            return;
        }
        self.local_hour = Some(hour);
        if self.settings.auto_night_mode {
            self.debounce.notify(now);
        }
    }

    /// Drive deferred work: when the debounce window has expired, read
    /// the store and re-apply styles.
    pub fn tick(&mut self, now: Instant) {
        if !self.attached {
            return;
        }
        if self.debounce.fire(now) {
            self.settings = self.store.get();
            self.apply_styles();
        }
    }

    fn apply_styles(&mut self) {
        let mut effective = self.settings.clone();
        if effective.auto_night_mode && self.local_hour.is_some_and(auto_night_active) {
            effective.dark_mode = true;
        }
        let ruleset = synthesize(&effective);
        self.sink.apply(ruleset.as_css());
    }

    /// Tear down watches and bookkeeping (page-navigation equivalent).
    /// Hidden nodes stay hidden; pending media is restored.
    pub fn detach<T: DocumentTree>(&mut self, tree: &mut T) {
        if !self.attached {
            return;
        }
        self.loader.disconnect(tree);
        self.filter.reset();
        self.debounce.disarm();
        self.content_region = None;
        self.attached = false;
        tracing::info!("engine detached");
    }

    /// The node tagged as primary content region, once attached
    pub fn content_region(&self) -> Option<NodeId> {
        self.content_region
    }

    /// The settings snapshot styling currently follows
    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    /// Filtering counters
    pub fn filter_stats(&self) -> FilterStats {
        self.filter.stats()
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

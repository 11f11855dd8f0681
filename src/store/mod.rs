//! Logo and color state.
//!
//! [`LogoStore`] is the single writer of the loaded logo table and of every
//! customization field. Preview and export markup are never stored; they
//! are derived on read from the current inputs (see [`derived`]).
//!
//! Loading is split so the store is never borrowed across an `.await`:
//! [`LogoStore::begin_load`] hands out a [`LoadTicket`], [`fetch_catalog`]
//! fetches every entry concurrently, and [`LogoStore::finish_load`] applies
//! the result unless a newer load has started since.
//!
//! ```
//! use bank_logo_studio::LogoStore;
//! use bank_logo_studio::store::{StaticSource, fetch_catalog};
//!
//! # futures::executor::block_on(async {
//! let source = StaticSource::new()
//!     .with("/logos_bancos/banco-itau.svg", r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#);
//!
//! let mut store = LogoStore::default();
//! let ticket = store.begin_load();
//! let fetched = fetch_catalog(&ticket, &source).await;
//! store.finish_load(fetched, true);
//!
//! assert_eq!(store.selected(), Some("banco-itau"));
//! assert!(store.export_svg().contains(r#"width="24""#));
//! # });
//! ```

pub mod derived;
pub mod source;

pub use derived::{DeriveInputs, DerivedCache};
pub use source::{AssetPaths, DirectorySource, LogoSource, StaticSource};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::color::{self, Background, ThemeColors};
use crate::export::{
    self, ExportFormat, ExportOptions, ExportResult, SaveTarget, download_selected_logos_with,
};
use crate::profile::StyleProfile;
use crate::registry::{
    ColorMap, ColorRegion, DetectedRegion, LogoRegistry, RegionColor, is_default_color_map,
    validate_color_map,
};
use crate::svg;

/// Message recorded when one or more catalog entries fail to load.
pub const LOAD_ERROR_MESSAGE: &str = "Falha ao carregar logos SVG";

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`StyleProfile`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    fn apply_profile(&mut self, profile: &StyleProfile);

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> StyleProfile;
}

// ============================================================================
// Configuration
// ============================================================================

/// Store defaults and limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    pub default_size: u32,
    /// Color used when no logo is selected.
    pub default_color: String,
    /// Fixed size of the preview markup.
    pub preview_size: u32,
    pub min_size: u32,
    pub max_size: u32,
    pub assets: AssetPaths,
    pub export: ExportOptions,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_size: 24,
            default_color: color::WHITE.to_string(),
            preview_size: 120,
            min_size: 24,
            max_size: 256,
            assets: AssetPaths::default(),
            export: ExportOptions::default(),
        }
    }
}

impl StoreConfig {
    /// Parses a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Types
// ============================================================================

/// Whether the UI shows one logo or the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Single,
    Grid,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Single => Self::Grid,
            Self::Grid => Self::Single,
        }
    }
}

/// A successfully loaded catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoAsset {
    pub id: String,
    pub markup: Arc<str>,
    pub display_name: String,
}

/// Identifies one load request. Results carrying an older generation are
/// discarded by [`LogoStore::finish_load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    /// `(id, asset path)` in catalog order.
    entries: Vec<(String, String)>,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }
}

/// Raw fetch results for a [`LoadTicket`], in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedCatalog {
    generation: u64,
    results: Vec<(String, Option<String>)>,
}

impl FetchedCatalog {
    pub fn loaded(&self) -> usize {
        self.results.iter().filter(|(_, markup)| markup.is_some()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.loaded()
    }
}

/// Fetches every entry of `ticket` concurrently.
pub async fn fetch_catalog(ticket: &LoadTicket, source: &dyn LogoSource) -> FetchedCatalog {
    let fetches = ticket.entries.iter().map(|(id, path)| async move {
        let markup = source.fetch(path).await;
        if markup.is_none() {
            warn!(id = id.as_str(), path = path.as_str(), "logo failed to load");
        }
        (id.clone(), markup)
    });

    FetchedCatalog {
        generation: ticket.generation,
        results: futures::future::join_all(fetches).await,
    }
}

// ============================================================================
// LogoStore
// ============================================================================

/// State container for the logo studio.
///
/// Two independent state machines live here: loading
/// (`idle -> loading -> loaded | error`) and selection
/// (`none -> single-color | multi-color`).
#[derive(Debug)]
pub struct LogoStore {
    config: StoreConfig,
    registry: LogoRegistry,

    logos: Vec<LogoAsset>,
    selected: Option<String>,

    size: u32,
    color: String,
    multi_color: bool,
    color_map: ColorMap,
    regions: Arc<[ColorRegion]>,
    /// Regions the selected logo's stylesheet actually binds.
    detected: Vec<ColorRegion>,

    manual_background: Option<Background>,
    comparison: bool,
    view_mode: ViewMode,

    loading: bool,
    error: Option<String>,
    generation: u64,

    derived: DerivedCache,
}

impl Default for LogoStore {
    fn default() -> Self {
        Self::new(LogoRegistry::banks().clone(), StoreConfig::default())
    }
}

impl LogoStore {
    pub fn new(registry: LogoRegistry, config: StoreConfig) -> Self {
        Self {
            size: config.default_size,
            color: config.default_color.clone(),
            config,
            registry,
            logos: Vec::new(),
            selected: None,
            multi_color: false,
            color_map: ColorMap::new(),
            regions: Arc::from(Vec::new()),
            detected: Vec::new(),
            manual_background: None,
            comparison: false,
            view_mode: ViewMode::default(),
            loading: false,
            error: None,
            generation: 0,
            derived: DerivedCache::default(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn registry(&self) -> &LogoRegistry {
        &self.registry
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    /// Starts a load of the whole catalog and returns its ticket.
    ///
    /// Any load still in flight becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;

        let entries = self
            .registry
            .catalog()
            .iter()
            .map(|id| (id.clone(), self.config.assets.catalog_path(id)))
            .collect();

        LoadTicket {
            generation: self.generation,
            entries,
        }
    }

    /// Replaces the logo table with the successfully fetched entries.
    ///
    /// Returns false and changes nothing if `fetched` belongs to a
    /// superseded load. With `auto_select`, the first loaded logo is
    /// selected.
    pub fn finish_load(&mut self, fetched: FetchedCatalog, auto_select: bool) -> bool {
        if fetched.generation != self.generation {
            debug!(
                generation = fetched.generation,
                current = self.generation,
                "ignoring stale catalog load"
            );
            return false;
        }

        let failed = fetched.failed();
        let total = fetched.results.len();

        self.logos = fetched
            .results
            .into_iter()
            .filter_map(|(id, markup)| {
                let markup = markup?;
                Some(LogoAsset {
                    display_name: self.registry.display_name(&id),
                    markup: Arc::from(markup),
                    id,
                })
            })
            .collect();
        self.loading = false;
        self.error = (failed > 0).then(|| LOAD_ERROR_MESSAGE.to_string());

        info!(loaded = self.logos.len(), failed, total, "catalog loaded");

        if self.selected.as_deref().is_some_and(|id| self.logo(id).is_none()) {
            self.clear_selection();
        }

        if auto_select {
            if let Some(first) = self.logos.first().map(|logo| logo.id.clone()) {
                debug!(id = first.as_str(), "auto-selecting first logo");
                self.select(&first);
            }
        }
        true
    }

    /// Loads the whole catalog from `source`.
    pub async fn load_all(&mut self, source: &dyn LogoSource, auto_select: bool) {
        let ticket = self.begin_load();
        let fetched = fetch_catalog(&ticket, source).await;
        self.finish_load(fetched, auto_select);
    }

    /// Fetches the unmodified brand file for `id`, for side-by-side comparison.
    pub async fn load_original(&self, id: &str, source: &dyn LogoSource) -> Option<String> {
        let Some(file_name) = self.registry.original_file_name(id) else {
            warn!(id, "no original logo registered");
            return None;
        };
        source.fetch(&self.config.assets.original_path(file_name)).await
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Collective load error, if any catalog entry failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    /// Selects a loaded logo and resets its colors to the registered defaults.
    ///
    /// Returns false and changes nothing if `id` is not loaded.
    pub fn select(&mut self, id: &str) -> bool {
        let Some(markup) = self.logo(id).map(|logo| logo.markup.clone()) else {
            debug!(id, "ignoring selection of unloaded logo");
            return false;
        };

        self.selected = Some(id.to_string());
        self.manual_background = None;
        self.multi_color = self.registry.has_multiple_colors(id);
        self.color = self.registry.default_logo_color(id).to_string();

        if self.multi_color {
            let regions = self.registry.multi_color_config(id).unwrap_or_default();
            self.color_map = self.registry.default_color_map(id);
            self.detected = svg::detect_colorable_regions(&markup, regions, &self.color_map)
                .into_iter()
                .map(|detected| detected.region)
                .collect();
            self.regions = Arc::from(regions);
        } else {
            self.color_map = ColorMap::new();
            self.detected.clear();
            self.regions = Arc::from(Vec::new());
        }

        debug!(id, multi_color = self.multi_color, "logo selected");
        true
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.multi_color = false;
        self.color_map = ColorMap::new();
        self.detected.clear();
        self.regions = Arc::from(Vec::new());
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_multi_color(&self) -> bool {
        self.multi_color
    }

    // ------------------------------------------------------------------------
    // Size & Color
    // ------------------------------------------------------------------------

    /// Sets the export size, rounded and clamped to the configured range.
    /// NaN is ignored.
    pub fn set_size(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        let (min, max) = (f64::from(self.config.min_size), f64::from(self.config.max_size));
        self.size = value.round().clamp(min, max) as u32;
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Replaces the single color as given. Callers validate.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Sets one region's color. Ignored outside multi-color mode and for
    /// keys the selected logo does not configure.
    pub fn set_element_color(&mut self, key: &str, color: impl Into<RegionColor>) {
        if !self.multi_color || !self.has_region(key) {
            return;
        }
        self.color_map = self.color_map.with(key, color);
    }

    /// Restores one region's default color.
    pub fn reset_element_color(&mut self, key: &str) {
        if !self.multi_color {
            return;
        }
        if let Some(region) = self.regions.iter().find(|region| region.key == key) {
            self.color_map = self.color_map.with(key, region.default_color.clone());
        }
    }

    /// Current color of one region. `None` outside multi-color mode.
    pub fn element_color(&self, key: &str) -> Option<&RegionColor> {
        if !self.multi_color {
            return None;
        }
        self.color_map.get(key)
    }

    pub fn color_map(&self) -> &ColorMap {
        &self.color_map
    }

    /// True unless a multi-color logo has a region changed from its default.
    pub fn is_default_colors(&self) -> bool {
        if !self.multi_color || self.selected.is_none() {
            return true;
        }
        is_default_color_map(&self.color_map, &self.regions)
    }

    /// Configured regions bound by the selected logo, with their current colors.
    pub fn colorable_regions(&self) -> Vec<DetectedRegion> {
        self.detected
            .iter()
            .map(|region| DetectedRegion {
                current_color: self
                    .color_map
                    .get(&region.key)
                    .cloned()
                    .unwrap_or_else(|| region.default_color.clone()),
                region: region.clone(),
            })
            .collect()
    }

    fn has_region(&self, key: &str) -> bool {
        self.regions.iter().any(|region| region.key == key)
    }

    /// Restores default size, the selected logo's default colors (or the
    /// global default color) and automatic background.
    pub fn reset(&mut self) {
        self.size = self.config.default_size;

        match self.selected.as_deref() {
            Some(id) if self.multi_color => self.color_map = self.registry.default_color_map(id),
            Some(id) => self.color = self.registry.default_logo_color(id).to_string(),
            None => self.color = self.config.default_color.clone(),
        }

        self.manual_background = None;
    }

    // ------------------------------------------------------------------------
    // Background
    // ------------------------------------------------------------------------

    /// Cycles the preview background.
    ///
    /// The first press pins the opposite of the automatic choice; later
    /// presses alternate between white and transparent.
    pub fn toggle_background(&mut self) {
        let next = match self.manual_background {
            None => color::contrast_background(&self.color).opposite(),
            Some(current) => current.opposite(),
        };
        self.manual_background = Some(next);
    }

    /// The manual background, or `None` when automatic contrast applies.
    pub fn current_background_color(&self) -> Option<Background> {
        self.manual_background
    }

    pub fn is_manual_background_active(&self) -> bool {
        self.manual_background.is_some()
    }

    /// The background actually shown: manual if pinned, otherwise derived
    /// from the current color.
    pub fn effective_background(&self) -> Background {
        self.manual_background
            .unwrap_or_else(|| color::contrast_background(&self.color))
    }

    // ------------------------------------------------------------------------
    // View State
    // ------------------------------------------------------------------------

    pub fn toggle_comparison(&mut self) {
        self.comparison = !self.comparison;
    }

    pub fn set_comparison(&mut self, show: bool) {
        self.comparison = show;
    }

    pub fn is_comparison(&self) -> bool {
        self.comparison
    }

    pub fn toggle_view_mode(&mut self) {
        self.view_mode = self.view_mode.toggled();
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Page theme for the selected logo's primary brand color.
    pub fn theme(&self) -> ThemeColors {
        let primary = self
            .selected
            .as_deref()
            .map(|id| self.registry.primary_color(id))
            .unwrap_or_default();
        color::theme_colors(primary)
    }

    // ------------------------------------------------------------------------
    // Logo Table
    // ------------------------------------------------------------------------

    pub fn logos(&self) -> &[LogoAsset] {
        &self.logos
    }

    pub fn logo(&self, id: &str) -> Option<&LogoAsset> {
        self.logos.iter().find(|logo| logo.id == id)
    }

    /// Loaded identifiers in catalog order.
    pub fn available_logos(&self) -> Vec<&str> {
        self.logos.iter().map(|logo| logo.id.as_str()).collect()
    }

    /// Unmodified markup of a loaded logo.
    pub fn original_svg(&self, id: &str) -> Option<&str> {
        self.logo(id).map(|logo| &*logo.markup)
    }

    /// Unmodified markup of the selected logo.
    pub fn current_svg_content(&self) -> Option<&str> {
        self.selected.as_deref().and_then(|id| self.original_svg(id))
    }

    // ------------------------------------------------------------------------
    // Derived Markup
    // ------------------------------------------------------------------------

    /// Inputs every derived value is a function of.
    pub fn derive_inputs(&self) -> DeriveInputs {
        DeriveInputs {
            markup: self
                .selected
                .as_deref()
                .and_then(|id| self.logo(id))
                .map(|logo| logo.markup.clone()),
            size: self.size,
            color: self.color.clone(),
            multi_color: self.multi_color,
            color_map: self.color_map.clone(),
            regions: self.regions.clone(),
        }
    }

    /// Customized markup at the preview size. Empty with no selection.
    pub fn preview_svg(&mut self) -> &str {
        let inputs = self.derive_inputs();
        self.derived.preview(&inputs, self.config.preview_size)
    }

    /// Customized markup at the current size. Empty with no selection.
    pub fn export_svg(&mut self) -> &str {
        let inputs = self.derive_inputs();
        self.derived.export(&inputs)
    }

    /// Pretty-printed [`export_svg`](Self::export_svg).
    pub fn formatted_svg(&mut self) -> &str {
        let inputs = self.derive_inputs();
        self.derived.formatted(&inputs)
    }

    /// Embeddable form of [`export_svg`](Self::export_svg).
    pub fn webflow_svg(&mut self) -> &str {
        let inputs = self.derive_inputs();
        self.derived.webflow(&inputs)
    }

    /// Drops memoized markup.
    pub fn clear_cache(&mut self) {
        self.derived.clear();
    }

    // ------------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------------

    /// Exports the selected logo as currently customized.
    pub fn export_current(&mut self, format: ExportFormat, target: &mut dyn SaveTarget) -> ExportResult {
        let Some(id) = self.selected.clone() else {
            warn!("nothing selected to export");
            return ExportResult::failure(0);
        };
        let size = self.size;
        let markup = self.export_svg().to_string();
        export::download_single(&id, &markup, size, format, target)
    }

    /// Exports several loaded logos at the current size.
    ///
    /// The selected logo carries its current customization; the others are
    /// exported from their unmodified markup. Unknown ids are skipped.
    pub fn export_selected(
        &mut self,
        ids: &[&str],
        format: ExportFormat,
        target: &mut dyn SaveTarget,
    ) -> ExportResult {
        let customized = self.export_svg().to_string();
        let selected = self.selected.as_deref();

        let entries: Vec<(&str, &str)> = ids
            .iter()
            .filter_map(|&id| {
                let logo = self.logo(id)?;
                let markup = if selected == Some(id) { customized.as_str() } else { &*logo.markup };
                Some((logo.id.as_str(), markup))
            })
            .collect();

        if entries.len() < ids.len() {
            debug!(requested = ids.len(), found = entries.len(), "skipping unloaded logos");
        }

        download_selected_logos_with(&entries, self.size, format, &self.config.export, target)
    }
}

impl Configurable for LogoStore {
    /// Applies size, color, region colors and background from a profile.
    ///
    /// Size is clamped and region colors are validated against the selected
    /// logo's regions; fields the profile omits are left alone.
    fn apply_profile(&mut self, profile: &StyleProfile) {
        if let Some(size) = profile.size {
            self.set_size(f64::from(size));
        }
        if let Some(color) = &profile.color {
            self.set_color(color.as_str());
        }
        if self.multi_color && !profile.color_map.is_empty() {
            let merged = profile
                .color_map
                .iter()
                .fold(self.color_map.clone(), |map, (key, color)| map.with(key, color.clone()));
            self.color_map = validate_color_map(&merged, &self.regions);
        }
        if profile.background.is_some() {
            self.manual_background = profile.background;
        }
    }

    fn export_profile(&self) -> StyleProfile {
        let profile = StyleProfile::new().with_size(self.size).with_color(self.color.as_str());
        let profile = if self.multi_color {
            profile.with_color_map(self.color_map.clone())
        } else {
            profile
        };
        match self.manual_background {
            Some(background) => profile.with_background(background),
            None => profile,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! bank-logo-studio: recolor, resize and export Brazilian bank logos
//!
//! This crate loads a catalog of SVG logos, lets a caller pick one and change
//! its size and colors (per region for multi-color logos), and exports the
//! result as embeddable SVG or PNG, singly or as a zip archive.
//!
//! # Example
//!
//! ```
//! use bank_logo_studio::{ExportFormat, LogoStore, MemoryTarget, StaticSource};
//!
//! let itau = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><style>.bg{fill:var(--itau-bg-color)}</style><rect class="bg" width="24" height="24"/></svg>"#;
//! let source = StaticSource::new().with("/logos_bancos/banco-itau.svg", itau);
//!
//! let mut store = LogoStore::default();
//! futures::executor::block_on(store.load_all(&source, true));
//!
//! // Only the one logo the source could serve is loaded, and it was auto-selected.
//! assert_eq!(store.available_logos(), ["banco-itau"]);
//! assert!(store.is_multi_color());
//!
//! store.set_size(96.0);
//! store.set_element_color("bg", "#101010");
//!
//! let mut target = MemoryTarget::new();
//! let result = store.export_current(ExportFormat::Svg, &mut target);
//! assert!(result.success);
//! assert_eq!(target.files[0].name, "banco-itau-96px.svg");
//! ```
//!
//! # Serializable Profiles
//!
//! To snapshot and restore settings from a UI layer, use [`StyleProfile`]
//! with the [`Configurable`] trait:
//!
//! ```
//! use bank_logo_studio::{Configurable, LogoStore, StyleProfile};
//!
//! let mut store = LogoStore::default();
//! store.apply_profile(&StyleProfile::new().with_size(64).with_color("#003399"));
//!
//! let json = store.export_profile().to_json().unwrap();
//! assert!(json.contains("\"size\":64"));
//! ```

pub mod color;
pub mod error;
pub mod export;
pub mod profile;
pub mod registry;
pub mod store;
pub mod svg;

pub use color::{Background, ThemeColors};
pub use error::{Error, Result};
pub use export::{
    DirectoryTarget, ExportFile, ExportFormat, ExportOptions, ExportResult, MemoryTarget,
    SaveTarget, download_selected_logos,
};
pub use profile::StyleProfile;
pub use registry::{ColorMap, ColorRegion, LogoRegistry, RegionColor};
pub use store::{
    Configurable, DirectorySource, LogoSource, LogoStore, StaticSource, StoreConfig, ViewMode,
};
pub use svg::Coloring;

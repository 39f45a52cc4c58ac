//! Service layer for business logic
//!
//! This module provides the stores and processors shared between
//! the HTTP API and the CLI.

pub mod analytics;
pub mod bulk;
pub mod generator;
pub mod links;
pub mod presets;
pub mod qr;
pub mod settings;
pub mod shortener;
pub mod templates;

pub use analytics::{AnalyticsService, CampaignData, CampaignMetrics};
pub use bulk::{BATCH_SIZE, BulkAction, BulkProcessor, BulkResult};
pub use generator::{UtmGenerator, should_generate};
pub use links::{GeneratedLink, LINK_META_KEY, LinkRow, LinkSet, LinkStore};
pub use presets::{PRESETS_OPTION, Preset, PresetMap, PresetStore, default_presets};
pub use qr::QrGenerator;
pub use settings::{
    SECRET_MASK, SettingsService, SettingsUpdate, ShortenerProvider, UtmSettings,
};
pub use shortener::{ShortenRequest, UrlShortener};
pub use templates::{TEMPLATES_OPTION, TemplateStore, default_template, validate_template};

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Orchestrator settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Portal structure: URLs, form fields, and field maps
    #[serde(default)]
    pub portal: PortalConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.pipeline.checkpoint_every == 0 {
            return Err(AppError::validation("pipeline.checkpoint_every must be > 0"));
        }
        if self.portal.search_url.trim().is_empty() {
            return Err(AppError::validation("portal.search_url is empty"));
        }
        if self.portal.unit_option_selector.trim().is_empty() {
            return Err(AppError::validation("portal.unit_option_selector is empty"));
        }
        if self.portal.row_selector.trim().is_empty() {
            return Err(AppError::validation("portal.row_selector is empty"));
        }
        if self.portal.listing_fields.is_empty() {
            return Err(AppError::validation("No listing fields defined"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            pipeline: PipelineConfig::default(),
            portal: PortalConfig::default(),
        }
    }
}

/// HTTP client behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay before each request in milliseconds (portal rate limit)
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Orchestrator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Save a checkpoint after this many entities have left the queue
    #[serde(default = "defaults::checkpoint_every")]
    pub checkpoint_every: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            checkpoint_every: defaults::checkpoint_every(),
        }
    }
}

/// A declarative field extraction rule.
///
/// Selects the first element matching `selector`; the value is the named
/// attribute if `attr` is set, otherwise the element's collected text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub selector: String,
    #[serde(default)]
    pub attr: Option<String>,
}

impl FieldSpec {
    pub fn text(name: &str, selector: &str) -> Self {
        Self {
            name: name.to_string(),
            selector: selector.to_string(),
            attr: None,
        }
    }

    pub fn attr(name: &str, selector: &str, attr: &str) -> Self {
        Self {
            name: name.to_string(),
            selector: selector.to_string(),
            attr: Some(attr.to_string()),
        }
    }
}

/// Portal structure configuration.
///
/// Everything here is domain data for the target portal; defaults match a
/// JSF-based faculty directory (department select, search form POST,
/// per-entity profile pages keyed by a query parameter).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Search page URL; units are enumerated here and the listing form
    /// posts back to it
    #[serde(default = "defaults::search_url")]
    pub search_url: String,

    /// Selector matching the unit `<option>` elements
    #[serde(default = "defaults::unit_option_selector")]
    pub unit_option_selector: String,

    /// Option values that mean "no unit selected"
    #[serde(default = "defaults::unit_skip_values")]
    pub unit_skip_values: Vec<String>,

    /// Form field carrying the selected unit id
    #[serde(default = "defaults::unit_form_field")]
    pub unit_form_field: String,

    /// Form field and value for the submit button
    #[serde(default = "defaults::submit_form_field")]
    pub submit_form_field: String,

    #[serde(default = "defaults::submit_form_value")]
    pub submit_form_value: String,

    /// Selector matching one listing row per entity
    #[serde(default = "defaults::row_selector")]
    pub row_selector: String,

    /// Selector for the entity's profile link within a row
    #[serde(default = "defaults::link_selector")]
    pub link_selector: String,

    /// Attribute holding the link target
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,

    /// Query parameter in the profile link carrying the entity id
    #[serde(default = "defaults::id_param")]
    pub id_param: String,

    /// Fields captured from each listing row
    #[serde(default = "defaults::listing_fields")]
    pub listing_fields: Vec<FieldSpec>,

    /// Fields captured from the entity's profile page
    #[serde(default = "defaults::detail_fields")]
    pub detail_fields: Vec<FieldSpec>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            search_url: defaults::search_url(),
            unit_option_selector: defaults::unit_option_selector(),
            unit_skip_values: defaults::unit_skip_values(),
            unit_form_field: defaults::unit_form_field(),
            submit_form_field: defaults::submit_form_field(),
            submit_form_value: defaults::submit_form_value(),
            row_selector: defaults::row_selector(),
            link_selector: defaults::link_selector(),
            link_attr: defaults::link_attr(),
            id_param: defaults::id_param(),
            listing_fields: defaults::listing_fields(),
            detail_fields: defaults::detail_fields(),
        }
    }
}

/// Default values for configuration fields.
mod defaults {
    use super::FieldSpec;

    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; SigrisCrawler/0.1)".to_string()
    }

    pub fn timeout() -> u64 {
        30
    }

    pub fn request_delay() -> u64 {
        2000
    }

    pub fn checkpoint_every() -> usize {
        10
    }

    pub fn search_url() -> String {
        "https://sigaa.unb.br/sigaa/public/docente/busca_docentes.jsf".to_string()
    }

    pub fn unit_option_selector() -> String {
        "select#form\\:departamento option".to_string()
    }

    pub fn unit_skip_values() -> Vec<String> {
        vec![String::new(), "0".to_string()]
    }

    pub fn unit_form_field() -> String {
        "form:departamento".to_string()
    }

    pub fn submit_form_field() -> String {
        "form:buscar".to_string()
    }

    pub fn submit_form_value() -> String {
        "Buscar".to_string()
    }

    pub fn row_selector() -> String {
        "table.listagem tbody tr".to_string()
    }

    pub fn listing_fields() -> Vec<FieldSpec> {
        vec![FieldSpec::text("name", "td:nth-child(2) span.nome")]
    }

    pub fn link_selector() -> String {
        "td:nth-child(2) span.pagina a".to_string()
    }

    pub fn link_attr() -> String {
        "href".to_string()
    }

    pub fn id_param() -> String {
        "siape".to_string()
    }

    pub fn detail_fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("full_name", "#id-docente h3"),
            FieldSpec::text("department", "#id-docente p.departamento"),
            FieldSpec::attr("photo_url", "#left .foto_professor img", "src"),
            FieldSpec::text("email", "#contato dd.email"),
            FieldSpec::text("phone", "#contato dd.telefone"),
            FieldSpec::attr("lattes_url", "#perfil-docente dd a", "href"),
        ]
    }
}

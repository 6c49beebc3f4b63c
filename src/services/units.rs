// src/services/units.rs

//! Unit enumeration service.
//!
//! Fetches the portal's search page once and extracts the department list
//! from the unit `<select>`. Failure to find any unit is fatal: with no
//! units there is nothing to crawl.

use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::{PortalConfig, Unit};
use crate::services::extract::parse_selector;
use crate::services::fetch::{FetchClient, FetchRequest};

/// Result of unit enumeration.
///
/// The raw search page body is kept alongside the units: the per-unit
/// listing form posts back hidden fields (JSF view state) scraped from it.
pub struct UnitEnumeration {
    pub units: Vec<Unit>,
    pub search_page: String,
}

/// Enumerate all units from the portal's search page.
pub async fn enumerate_units(
    fetcher: &dyn FetchClient,
    portal: &PortalConfig,
) -> Result<UnitEnumeration> {
    let response = fetcher
        .fetch(&FetchRequest::get(&portal.search_url))
        .await
        .map_err(|e| AppError::enumeration(format!("search page fetch failed: {e}")))?;

    let units = parse_unit_options(&response.body, portal)?;
    if units.is_empty() {
        return Err(AppError::enumeration(format!(
            "no units found at {} with selector '{}'",
            portal.search_url, portal.unit_option_selector
        )));
    }

    log::info!("Enumerated {} units", units.len());
    Ok(UnitEnumeration {
        units,
        search_page: response.body,
    })
}

/// Parse unit `<option>` elements out of the search page.
pub fn parse_unit_options(body: &str, portal: &PortalConfig) -> Result<Vec<Unit>> {
    let document = Html::parse_document(body);
    let option_sel = parse_selector(&portal.unit_option_selector)?;

    let units = document
        .select(&option_sel)
        .filter_map(|option| {
            let value = option.value().attr("value")?;
            if portal.unit_skip_values.iter().any(|skip| skip == value) {
                return None;
            }

            let name: String = option.text().collect::<String>().trim().to_string();
            if name.is_empty() {
                return None;
            }

            Some(Unit::new(value, name))
        })
        .collect();

    Ok(units)
}

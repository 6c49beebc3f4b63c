// src/services/listings.rs

//! Per-unit entity listing service.
//!
//! Submits the portal's search form for one unit and parses the result
//! table into listing-stage entities. The form submission carries the
//! hidden inputs (JSF view state) scraped from the search page, the way a
//! browser would post the form back.

use scraper::Html;

use crate::error::Result;
use crate::models::{Entity, PortalConfig, Unit};
use crate::services::extract::parse_selector;
use crate::services::fetch::{FetchClient, FetchRequest};
use crate::utils::url::{extract_query_param, resolve};

/// Enumerate entities for a single unit.
///
/// An empty result is not an error; a unit may legitimately have no
/// entities listed.
pub async fn enumerate_entities(
    fetcher: &dyn FetchClient,
    portal: &PortalConfig,
    unit: &Unit,
    search_page: &str,
) -> Result<Vec<Entity>> {
    let form = build_listing_form(search_page, portal, unit)?;
    let response = fetcher
        .fetch(&FetchRequest::post(&portal.search_url, form))
        .await?;

    let entities = parse_listing_rows(&response.body, portal, unit, &response.final_url)?;
    log::info!(
        "Unit {} ({}): {} entities listed",
        unit.unit_id,
        unit.display_name,
        entities.len()
    );

    Ok(entities)
}

/// Build the search form fields for a unit.
///
/// Hidden inputs from the search page are carried over verbatim, then the
/// unit selection and submit button are set on top.
pub fn build_listing_form(
    search_page: &str,
    portal: &PortalConfig,
    unit: &Unit,
) -> Result<Vec<(String, String)>> {
    let document = Html::parse_document(search_page);
    let hidden_sel = parse_selector("input[type=\"hidden\"]")?;

    let mut form: Vec<(String, String)> = document
        .select(&hidden_sel)
        .filter_map(|input| {
            let name = input.value().attr("name")?;
            let value = input.value().attr("value").unwrap_or("");
            Some((name.to_string(), value.to_string()))
        })
        .collect();

    form.push((portal.unit_form_field.clone(), unit.unit_id.clone()));
    form.push((
        portal.submit_form_field.clone(),
        portal.submit_form_value.clone(),
    ));

    Ok(form)
}

/// Parse listing rows into entities.
///
/// Rows where every configured listing field is empty are skipped (header
/// and separator rows). Profile links are resolved against the response
/// URL; the entity id is parsed from the link's query parameter and stays
/// `None` when absent.
pub fn parse_listing_rows(
    body: &str,
    portal: &PortalConfig,
    unit: &Unit,
    base_url: &str,
) -> Result<Vec<Entity>> {
    let document = Html::parse_document(body);
    let row_sel = parse_selector(&portal.row_selector)?;
    let link_sel = parse_selector(&portal.link_selector)?;

    let field_sels = portal
        .listing_fields
        .iter()
        .map(|spec| Ok((spec, parse_selector(&spec.selector)?)))
        .collect::<Result<Vec<_>>>()?;

    let mut entities = Vec::new();

    for row in document.select(&row_sel) {
        let mut listing_fields = std::collections::BTreeMap::new();
        for (spec, sel) in &field_sels {
            let value = row
                .select(sel)
                .next()
                .and_then(|element| match &spec.attr {
                    Some(attr) => element.value().attr(attr).map(str::to_string),
                    None => Some(element.text().collect::<String>()),
                })
                .map(|raw| raw.trim().to_string())
                .filter(|text| !text.is_empty());

            if let Some(value) = value {
                listing_fields.insert(spec.name.clone(), value);
            }
        }

        if listing_fields.is_empty() {
            continue;
        }

        let detail_url = row
            .select(&link_sel)
            .next()
            .and_then(|link| link.value().attr(&portal.link_attr))
            .map(|href| resolve(base_url, href));

        let entity_id = detail_url
            .as_deref()
            .and_then(|url| extract_query_param(url, &portal.id_param));

        entities.push(Entity {
            entity_id,
            unit_id: unit.unit_id.clone(),
            unit_name: unit.display_name.clone(),
            row_index: entities.len(),
            listing_fields,
            detail_url,
        });
    }

    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portal() -> PortalConfig {
        PortalConfig {
            row_selector: "table.results tbody tr".to_string(),
            link_selector: "td.page a".to_string(),
            listing_fields: vec![crate::models::FieldSpec::text("name", "td.name")],
            ..PortalConfig::default()
        }
    }

    fn unit() -> Unit {
        Unit::new("10", "Dept A")
    }

    const LISTING_HTML: &str = r#"
        <table class="results"><tbody>
            <tr><th>Name</th><th>Page</th></tr>
            <tr>
                <td class="name">Alice</td>
                <td class="page"><a href="/profile.jsf?siape=1001">page</a></td>
            </tr>
            <tr>
                <td class="name">Bob</td>
                <td class="page"><a href="/profile.jsf?siape=1002">page</a></td>
            </tr>
            <tr>
                <td class="name">Carol</td>
                <td class="page"></td>
            </tr>
        </tbody></table>
    "#;

    #[test]
    fn test_parse_listing_rows() {
        let entities =
            parse_listing_rows(LISTING_HTML, &portal(), &unit(), "https://portal.test/search.jsf")
                .unwrap();

        assert_eq!(entities.len(), 3);
        assert_eq!(entities[0].entity_id, Some("1001".to_string()));
        assert_eq!(entities[0].listing_fields["name"], "Alice");
        assert_eq!(
            entities[0].detail_url.as_deref(),
            Some("https://portal.test/profile.jsf?siape=1001")
        );
        assert_eq!(entities[1].entity_id, Some("1002".to_string()));
    }

    #[test]
    fn test_row_without_link_has_null_id() {
        let entities =
            parse_listing_rows(LISTING_HTML, &portal(), &unit(), "https://portal.test/search.jsf")
                .unwrap();

        let carol = &entities[2];
        assert_eq!(carol.entity_id, None);
        assert_eq!(carol.detail_url, None);
        assert_eq!(carol.identity(), "10:row2");
    }

    #[test]
    fn test_header_rows_skipped() {
        let entities =
            parse_listing_rows(LISTING_HTML, &portal(), &unit(), "https://portal.test/search.jsf")
                .unwrap();
        assert!(entities.iter().all(|e| !e.listing_fields.is_empty()));
    }

    #[test]
    fn test_empty_listing_is_ok() {
        let entities = parse_listing_rows(
            "<html><body>No results</body></html>",
            &portal(),
            &unit(),
            "https://portal.test/search.jsf",
        )
        .unwrap();
        assert!(entities.is_empty());
    }

    #[test]
    fn test_build_listing_form_carries_hidden_fields() {
        let search_page = r#"
            <form id="form">
                <input type="hidden" name="javax.faces.ViewState" value="j_id42">
                <input type="hidden" name="form" value="form">
                <select id="form:departamento"></select>
            </form>
        "#;

        let form = build_listing_form(search_page, &PortalConfig::default(), &unit()).unwrap();

        assert!(
            form.contains(&("javax.faces.ViewState".to_string(), "j_id42".to_string()))
        );
        assert!(form.contains(&("form:departamento".to_string(), "10".to_string())));
        assert!(form.contains(&("form:buscar".to_string(), "Buscar".to_string())));
    }
}

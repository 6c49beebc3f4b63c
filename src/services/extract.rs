// src/services/extract.rs

//! Declarative field extraction.
//!
//! Maps a raw HTML document to a structured record given a field map. The
//! orchestrator stays agnostic to the selector mechanism; all scraper usage
//! for detail pages lives here.

use std::collections::BTreeMap;

use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::FieldSpec;

/// Extract fields from an HTML body according to a field map.
///
/// Every field name appears in the result; fields whose selector matched
/// nothing (or whose value collapsed to empty after trimming) map to `None`.
pub fn extract_fields(
    html_body: &str,
    field_map: &[FieldSpec],
) -> Result<BTreeMap<String, Option<String>>> {
    let document = Html::parse_document(html_body);
    let mut fields = BTreeMap::new();

    for spec in field_map {
        let selector = parse_selector(&spec.selector)?;
        let value = document
            .select(&selector)
            .next()
            .and_then(|element| match &spec.attr {
                Some(attr) => element.value().attr(attr).map(str::to_string),
                None => Some(element.text().collect::<String>()),
            })
            .map(|raw| raw.trim().to_string())
            .filter(|text| !text.is_empty());

        fields.insert(spec.name.clone(), value);
    }

    Ok(fields)
}

/// Parse a CSS selector, mapping failures to a typed error.
pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_HTML: &str = r#"
        <html><body>
            <div id="id-docente">
                <h3>  Alice Smith  </h3>
                <p class="departamento">Dept A</p>
            </div>
            <div id="contato">
                <dl><dt>Email</dt><dd class="email">a@x.org</dd></dl>
            </div>
            <div id="left">
                <div class="foto_professor"><img src="/fotos/1001.jpg"></div>
            </div>
        </body></html>
    "#;

    #[test]
    fn test_extract_text_fields() {
        let map = vec![
            FieldSpec::text("full_name", "#id-docente h3"),
            FieldSpec::text("email", "#contato dd.email"),
        ];

        let fields = extract_fields(PROFILE_HTML, &map).unwrap();
        assert_eq!(fields["full_name"], Some("Alice Smith".to_string()));
        assert_eq!(fields["email"], Some("a@x.org".to_string()));
    }

    #[test]
    fn test_extract_attr_field() {
        let map = vec![FieldSpec::attr(
            "photo_url",
            "#left .foto_professor img",
            "src",
        )];

        let fields = extract_fields(PROFILE_HTML, &map).unwrap();
        assert_eq!(fields["photo_url"], Some("/fotos/1001.jpg".to_string()));
    }

    #[test]
    fn test_missing_field_is_none() {
        let map = vec![FieldSpec::text("phone", "#contato dd.telefone")];

        let fields = extract_fields(PROFILE_HTML, &map).unwrap();
        assert_eq!(fields["phone"], None);
    }

    #[test]
    fn test_invalid_selector_is_error() {
        let map = vec![FieldSpec::text("bad", "[[nope")];
        assert!(extract_fields(PROFILE_HTML, &map).is_err());
    }
}

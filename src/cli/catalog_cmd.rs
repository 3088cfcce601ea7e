//! Catalog command handler

use serde::Serialize;

use crate::domain::capture::{CapabilityCatalog, CaptureMode, CatalogEntry, Resolution};

use super::presenter::Presenter;

#[derive(Serialize)]
struct CatalogListing {
    modes: Vec<CatalogEntry<CaptureMode>>,
    resolutions: Vec<CatalogEntry<Resolution>>,
}

/// Print recording types and resolutions as text or JSON
pub fn handle_catalog_command(
    catalog: &CapabilityCatalog,
    json: bool,
    presenter: &Presenter,
) -> Result<(), serde_json::Error> {
    if json {
        presenter.output(&render_json(catalog)?);
    } else {
        for line in render_text(catalog) {
            presenter.output(&line);
        }
    }
    Ok(())
}

fn render_json(catalog: &CapabilityCatalog) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CatalogListing {
        modes: catalog.modes(),
        resolutions: catalog.resolutions(),
    })
}

fn render_text(catalog: &CapabilityCatalog) -> Vec<String> {
    let mut lines = vec!["Recording types:".to_string()];
    lines.extend(
        catalog
            .modes()
            .into_iter()
            .map(|entry| format!("  {}  {}", entry.key, entry.label)),
    );
    lines.push("Resolutions:".to_string());
    lines.extend(
        catalog
            .resolutions()
            .into_iter()
            .map(|entry| format!("  {}  {}", entry.key, entry.label)),
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lists_every_key() {
        let lines = render_text(&CapabilityCatalog::default());
        assert_eq!(lines.len(), 1 + 4 + 1 + 5);
        assert_eq!(lines[0], "Recording types:");
        assert!(lines[1].starts_with("  1  "));
        assert_eq!(lines[5], "Resolutions:");
    }

    #[test]
    fn json_has_modes_and_resolutions() {
        let json = render_json(&CapabilityCatalog::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["modes"].as_array().unwrap().len(), 4);
        assert_eq!(value["resolutions"].as_array().unwrap().len(), 5);
        assert_eq!(value["modes"][0]["key"], 1);
    }

    #[test]
    fn json_follows_custom_resolutions() {
        let catalog = CapabilityCatalog::with_resolutions(vec![Resolution::new(800, 600).unwrap()]);
        let json = render_json(&catalog).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let resolutions = value["resolutions"].as_array().unwrap();
        assert_eq!(resolutions.len(), 1);
        assert_eq!(resolutions[0]["value"]["width"], 800);
    }
}

//! `wt popup` -- building labels and per-building metadata.
//!
//! The platform only supports layout-level writes, so a single building
//! edit is a read-modify-write of the entire enclosing layout document.

use serde_json::json;
use whooktown_api::{Building, LayoutDb, LayoutUpdate, WhooktownClient};
use whooktown_config::ConfigStore;

use crate::cli::{DetailFormat, OutputFormat, PopupCommand};
use crate::client::create_client;
use crate::error::CliError;
use crate::output;

pub async fn handle(command: PopupCommand, store: &ConfigStore) -> Result<(), CliError> {
    match command {
        PopupCommand::Labels { layout_id, on, off } => labels(store, &layout_id, on, off).await,
        PopupCommand::Set {
            building_id,
            description,
            tags,
            notes,
            clear_description,
            clear_tags,
            clear_notes,
        } => {
            let edits = MetadataEdits {
                description,
                tags,
                notes,
                clear_description,
                clear_tags,
                clear_notes,
            };
            set(store, &building_id, &edits).await
        }
        PopupCommand::Get {
            building_id,
            format,
        } => get(store, &building_id, format).await,
        PopupCommand::List {
            layout_id,
            format,
            tags,
        } => list(store, &layout_id, format, tags.as_deref()).await,
    }
}

// ── Shared helpers ───────────────────────────────────────────────────

/// Split comma-separated tags, trim each, drop empty segments.
fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Locate a building across all layouts; first match wins.
///
/// Returns the index of the containing layout and of the building within
/// its building array.
fn find_building(layouts: &[LayoutDb], building_id: &str) -> Result<(usize, usize), CliError> {
    for (li, layout) in layouts.iter().enumerate() {
        let Some(buildings) = &layout.data.buildings else {
            continue;
        };
        if let Some(bi) = buildings.iter().position(|b| b.id == building_id) {
            return Ok((li, bi));
        }
    }
    Err(CliError::validation(format!(
        "Building not found: {building_id}"
    )))
}

/// Rebuild the full-document replacement payload for a layout.
fn layout_update(layout: &LayoutDb) -> LayoutUpdate {
    LayoutUpdate {
        id: layout.layout_id.clone(),
        name: layout.data.name.clone().unwrap_or_default(),
        grid: layout.data.grid.unwrap_or_default(),
        buildings: layout.data.buildings.clone().unwrap_or_default(),
        roads: layout.data.roads.clone(),
    }
}

// ── Labels ───────────────────────────────────────────────────────────

async fn labels(
    store: &ConfigStore,
    layout_id: &str,
    on: bool,
    off: bool,
) -> Result<(), CliError> {
    // clap rejects --on together with --off; neither is also an error.
    if !on && !off {
        return Err(CliError::validation("Must specify --on or --off"));
    }

    let client = create_client(store)?;
    client.set_labels_enabled(layout_id, on).await?;

    output::success(&format!(
        "Labels {} for layout",
        if on { "enabled" } else { "disabled" }
    ));
    output::detail(&format!("Layout: {layout_id}"));
    Ok(())
}

// ── Set ──────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct MetadataEdits {
    description: Option<String>,
    tags: Option<String>,
    notes: Option<String>,
    clear_description: bool,
    clear_tags: bool,
    clear_notes: bool,
}

impl MetadataEdits {
    fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.tags.is_none()
            && self.notes.is_none()
            && !self.clear_description
            && !self.clear_tags
            && !self.clear_notes
    }
}

/// Apply set/clear operations field by field. A set and a clear of the
/// same field resolves to the clear, matching flag application order.
fn apply_edits(building: &mut Building, edits: &MetadataEdits) {
    if let Some(description) = &edits.description {
        building.description = Some(description.clone());
    }
    if edits.clear_description {
        building.description = None;
    }
    if let Some(tags) = &edits.tags {
        building.tags = Some(parse_tags(tags));
    }
    if edits.clear_tags {
        building.tags = None;
    }
    if let Some(notes) = &edits.notes {
        building.notes = Some(notes.clone());
    }
    if edits.clear_notes {
        building.notes = None;
    }
}

async fn set(store: &ConfigStore, building_id: &str, edits: &MetadataEdits) -> Result<(), CliError> {
    if edits.is_empty() {
        return Err(CliError::validation_with_hint(
            "At least one field option is required",
            "Use: --description, --tags, --notes, --clear-description, --clear-tags, --clear-notes",
        ));
    }

    let client = create_client(store)?;
    let mut layouts = client.layouts().await?;
    let (li, bi) = find_building(&layouts, building_id)?;

    let layout = &mut layouts[li];
    // find_building only matches layouts that have a building array.
    let buildings = layout.data.buildings.as_mut().ok_or_else(|| {
        CliError::validation(format!("Building not found: {building_id}"))
    })?;
    apply_edits(&mut buildings[bi], edits);
    let building_name = buildings[bi]
        .name
        .clone()
        .unwrap_or_else(|| building_id.to_owned());

    client.update_layout(&layout_update(layout)).await?;

    output::success(&format!("Updated building: {building_name}"));
    if let Some(description) = &edits.description {
        output::detail(&format!("Description: {description}"));
    }
    if let Some(tags) = &edits.tags {
        output::detail(&format!("Tags: {}", parse_tags(tags).join(", ")));
    }
    if let Some(notes) = &edits.notes {
        output::detail(&format!("Notes: {notes}"));
    }
    if edits.clear_description {
        output::detail("Description: cleared");
    }
    if edits.clear_tags {
        output::detail("Tags: cleared");
    }
    if edits.clear_notes {
        output::detail("Notes: cleared");
    }
    Ok(())
}

// ── Get ──────────────────────────────────────────────────────────────

async fn get(store: &ConfigStore, building_id: &str, format: DetailFormat) -> Result<(), CliError> {
    let client = create_client(store)?;
    let layouts = client.layouts().await?;
    let (li, bi) = find_building(&layouts, building_id)?;

    let layout = &layouts[li];
    let building = layout
        .data
        .buildings
        .as_ref()
        .and_then(|b| b.get(bi))
        .ok_or_else(|| CliError::validation(format!("Building not found: {building_id}")))?;

    if format == DetailFormat::Json {
        println!(
            "{}",
            output::format_json(&json!({
                "id": building.id,
                "name": building.name,
                "type": building.building_type,
                "layout_id": layout.layout_id,
                "layout_name": layout.data.name,
                "description": building.description,
                "tags": building.tags.clone().unwrap_or_default(),
                "notes": building.notes,
            }))
        );
        return Ok(());
    }

    let dash = || "-".to_owned();
    println!("Building");
    println!("  ID:          {}", building.id);
    println!("  Name:        {}", building.name.clone().unwrap_or_else(dash));
    println!("  Type:        {}", building.building_type);
    println!(
        "  Layout:      {}",
        layout.data.name.as_deref().unwrap_or(&layout.layout_id)
    );
    println!();
    println!("Metadata");
    println!(
        "  Description: {}",
        building.description.clone().unwrap_or_else(dash)
    );
    println!(
        "  Tags:        {}",
        building
            .tags
            .as_ref()
            .filter(|t| !t.is_empty())
            .map_or_else(dash, |t| t.join(", "))
    );
    println!("  Notes:       {}", building.notes.clone().unwrap_or_else(dash));
    Ok(())
}

// ── List ─────────────────────────────────────────────────────────────

/// Case-insensitive "any match" against a comma-separated filter list.
fn matches_tag_filter(building: &Building, filter: &[String]) -> bool {
    building.tags.as_ref().is_some_and(|tags| {
        tags.iter()
            .any(|t| filter.iter().any(|f| f.eq_ignore_ascii_case(t)))
    })
}

async fn list(
    store: &ConfigStore,
    layout_id: &str,
    format: OutputFormat,
    tag_filter: Option<&str>,
) -> Result<(), CliError> {
    let client: WhooktownClient = create_client(store)?;
    let layouts = client.layouts().await?;
    let layout = layouts
        .iter()
        .find(|l| l.layout_id == layout_id)
        .ok_or_else(|| CliError::validation(format!("Layout not found: {layout_id}")))?;

    let mut buildings: Vec<&Building> = layout
        .data
        .buildings
        .as_deref()
        .unwrap_or_default()
        .iter()
        .collect();

    if let Some(raw) = tag_filter {
        let filter = parse_tags(raw);
        buildings.retain(|b| matches_tag_filter(b, &filter));
    }

    if buildings.is_empty() {
        println!("No buildings found");
        return Ok(());
    }

    if format == OutputFormat::Json {
        let items: Vec<_> = buildings
            .iter()
            .map(|b| {
                json!({
                    "id": b.id,
                    "name": b.name,
                    "type": b.building_type,
                    "description": b.description,
                    "tags": b.tags.clone().unwrap_or_default(),
                    "notes": b.notes,
                })
            })
            .collect();
        println!("{}", output::format_json(&items));
        return Ok(());
    }

    let headers = ["ID", "Name", "Type", "Tags", "Description"];
    let rows: Vec<Vec<String>> = buildings
        .iter()
        .map(|b| {
            vec![
                b.id.clone(),
                output::truncate(b.name.as_deref().unwrap_or("-"), 16),
                output::truncate(&b.building_type, 14),
                output::truncate(
                    &b.tags.as_ref().map_or_else(|| "-".into(), |t| t.join(", ")),
                    16,
                ),
                output::truncate(b.description.as_deref().unwrap_or("-"), 16),
            ]
        })
        .collect();

    println!("{}", output::format_table(&headers, &rows));
    println!("\n{} building(s)", buildings.len());
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use whooktown_api::LayoutData;

    use super::*;

    fn building(id: &str) -> Building {
        Building {
            id: id.into(),
            name: Some(format!("name-{id}")),
            building_type: "server".into(),
            description: None,
            tags: None,
            notes: None,
        }
    }

    fn layout(id: &str, buildings: Vec<Building>) -> LayoutDb {
        LayoutDb {
            layout_id: id.into(),
            data: LayoutData {
                name: Some(format!("layout-{id}")),
                grid: None,
                buildings: Some(buildings),
                roads: Some(json!({"segments": []})),
            },
            received_at: None,
        }
    }

    #[test]
    fn tags_are_split_trimmed_and_emptied() {
        assert_eq!(parse_tags("a, b,,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_tags("  "), Vec::<String>::new());
    }

    #[test]
    fn first_matching_building_wins() {
        let layouts = vec![
            layout("l1", vec![building("b1")]),
            layout("l2", vec![building("b2"), building("b1")]),
        ];
        assert_eq!(find_building(&layouts, "b1").unwrap(), (0, 0));
        assert_eq!(find_building(&layouts, "b2").unwrap(), (1, 0));
        assert!(find_building(&layouts, "nope").is_err());
    }

    #[test]
    fn set_tags_leaves_other_buildings_untouched() {
        let mut layouts = vec![layout("l1", vec![building("b1"), building("b2")])];
        let (li, bi) = find_building(&layouts, "b1").unwrap();
        let edits = MetadataEdits {
            tags: Some("a, b,,c".into()),
            ..MetadataEdits::default()
        };
        apply_edits(
            &mut layouts[li].data.buildings.as_mut().unwrap()[bi],
            &edits,
        );

        let update = layout_update(&layouts[0]);
        assert_eq!(update.id, "l1");
        assert_eq!(update.name, "layout-l1");
        assert_eq!(update.buildings.len(), 2);
        assert_eq!(
            update.buildings[0].tags,
            Some(vec!["a".into(), "b".into(), "c".into()])
        );
        assert_eq!(update.buildings[1].tags, None);
        assert!(update.roads.is_some());
        // Missing grid falls back to the platform default.
        assert_eq!(update.grid.width, 10);
        assert_eq!(update.grid.height, 10);
    }

    #[test]
    fn clear_wins_over_set_for_the_same_field() {
        let mut b = building("b1");
        b.description = Some("old".into());
        let edits = MetadataEdits {
            description: Some("new".into()),
            clear_description: true,
            ..MetadataEdits::default()
        };
        apply_edits(&mut b, &edits);
        assert_eq!(b.description, None);
    }

    #[test]
    fn tag_filter_matches_any_case_insensitively() {
        let mut b = building("b1");
        b.tags = Some(vec!["Prod".into(), "db".into()]);
        assert!(matches_tag_filter(&b, &["prod".into()]));
        assert!(matches_tag_filter(&b, &["missing".into(), "DB".into()]));
        assert!(!matches_tag_filter(&b, &["web".into()]));

        let untagged = building("b2");
        assert!(!matches_tag_filter(&untagged, &["prod".into()]));
    }
}

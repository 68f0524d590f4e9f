//! `wt layout` -- read-only layout listings.

use chrono::Local;
use whooktown_config::ConfigStore;

use crate::cli::{LayoutCommand, OutputFormat};
use crate::client::create_client;
use crate::error::CliError;
use crate::output;

pub async fn handle(command: LayoutCommand, store: &ConfigStore) -> Result<(), CliError> {
    let LayoutCommand::List { format, verbose } = command;

    let client = create_client(store)?;
    let layouts = client.layouts().await?;

    if format == OutputFormat::Json {
        println!("{}", output::format_json(&layouts));
        return Ok(());
    }

    if layouts.is_empty() {
        println!("No layouts found");
        return Ok(());
    }

    let headers = ["ID", "Name", "Buildings", "Received"];
    let rows: Vec<Vec<String>> = layouts
        .iter()
        .map(|l| {
            let count = l.data.buildings.as_ref().map_or(0, Vec::len);
            vec![
                output::truncate(&l.layout_id, 36),
                output::truncate(l.data.name.as_deref().unwrap_or("-"), 20),
                count.to_string(),
                l.received_at.map_or_else(
                    || "-".into(),
                    |ts| {
                        ts.with_timezone(&Local)
                            .format("%Y-%m-%d %H:%M:%S")
                            .to_string()
                    },
                ),
            ]
        })
        .collect();

    println!("{}", output::format_table(&headers, &rows));
    println!("\n{} layout(s)", layouts.len());

    if verbose {
        println!("\n--- Building Details ---\n");
        for layout in &layouts {
            println!(
                "Layout: {}",
                layout.data.name.as_deref().unwrap_or(&layout.layout_id)
            );

            match layout.data.buildings.as_deref() {
                Some(buildings) if !buildings.is_empty() => {
                    let headers = ["ID", "Name", "Type"];
                    let rows: Vec<Vec<String>> = buildings
                        .iter()
                        .map(|b| {
                            vec![
                                b.id.clone(),
                                b.name.clone().unwrap_or_else(|| "-".into()),
                                if b.building_type.is_empty() {
                                    "-".into()
                                } else {
                                    b.building_type.clone()
                                },
                            ]
                        })
                        .collect();
                    println!("{}", output::format_table(&headers, &rows));
                }
                _ => println!("  No buildings"),
            }
            println!();
        }
    }

    Ok(())
}

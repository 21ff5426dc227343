//! Catalog browsing commands

use anyhow::{Context, Result};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use teamdex_core::catalog::{region_name, type_label, CatalogItem, CatalogLoader};
use teamdex_core::filter::{apply_filters, paginate, FilterState, FilterSummary};
use teamdex_core::TeamdexConfig;

/// Table row for catalog entries
#[derive(Tabled)]
struct CatalogRow {
    #[tabled(rename = "No.")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Types")]
    types: String,
    #[tabled(rename = "Gen")]
    generation: String,
}

impl From<&CatalogItem> for CatalogRow {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.formatted_id(),
            name: item.display_name(),
            types: types_display(item),
            generation: format!("{} ({})", item.generation(), region_name(item.generation())),
        }
    }
}

pub fn types_display(item: &CatalogItem) -> String {
    item.types()
        .iter()
        .map(|t| type_label(t))
        .collect::<Vec<_>>()
        .join(" / ")
}

pub fn print_table<T: Tabled>(rows: &[T]) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();
    println!("{table}");
}

/// Resolve `key` as an id when numeric, otherwise as a canonical name
pub async fn resolve(loader: &CatalogLoader, key: &str) -> Result<CatalogItem> {
    let item = match key.trim().parse::<u32>() {
        Ok(id) => loader.get_by_id(id).await,
        Err(_) => loader.find_by_name(key).await,
    }
    .with_context(|| format!("'{key}' not found in the catalog"))?;

    Ok(loader.with_localized_name(item).await)
}

pub async fn execute_list(
    config: &TeamdexConfig,
    filters: &FilterState,
    page: usize,
    per_page: usize,
    json_output: bool,
) -> Result<()> {
    let loader = CatalogLoader::from_config(config.catalog.clone())?;

    eprintln!("Loading catalog ({} entries)...", config.catalog.limit);
    let catalog = loader
        .try_load_all()
        .await
        .context("Failed to load the catalog")?;

    let filtered = apply_filters(&catalog, filters);
    let summary = FilterSummary::of(&catalog, &filtered);
    let page = paginate(&filtered, page, per_page);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&page.items)?);
        return Ok(());
    }

    if page.items.is_empty() {
        println!("No entries match.");
        return Ok(());
    }

    let rows: Vec<CatalogRow> = page.items.iter().map(|item| CatalogRow::from(*item)).collect();
    print_table(&rows);
    println!(
        "\n{} of {} entries, page {}/{}",
        summary.filtered, summary.total, page.number, page.total_pages
    );
    if page.has_more() {
        println!("Next page: --page {}", page.number + 1);
    }

    if !loader.gaps().is_empty() {
        eprintln!("{} entries could not be loaded", loader.gaps().len());
    }

    Ok(())
}

pub async fn execute_show(config: &TeamdexConfig, key: &str, json_output: bool) -> Result<()> {
    let loader = CatalogLoader::from_config(config.catalog.clone())?;
    let item = resolve(&loader, key).await?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&item)?);
        return Ok(());
    }

    println!();
    println!("{} {}", item.formatted_id(), item.display_name());
    println!("Name:       {}", item.name());
    println!("Types:      {}", types_display(&item));
    println!(
        "Generation: {} ({})",
        item.generation(),
        region_name(item.generation())
    );
    println!("Image:      {}", item.image_url());

    Ok(())
}

//! Team and theme commands

use anyhow::{bail, Result};
use tabled::Tabled;

use teamdex_core::catalog::CatalogLoader;
use teamdex_core::share::palettes;
use teamdex_core::store::{CardStyle, ThemeUpdate};
use teamdex_core::{AddOutcome, TeamdexConfig, MAX_TEAM_SIZE};

use crate::catalog_cli::{print_table, resolve, types_display};
use crate::session::Session;

#[derive(Tabled)]
struct TeamRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "No.")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Types")]
    types: String,
    #[tabled(rename = "Added")]
    selected_at: String,
}

#[derive(Tabled)]
struct PaletteRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Background")]
    background: String,
}

pub async fn execute_add(config: &TeamdexConfig, session: &Session, keys: &[String]) -> Result<()> {
    let loader = CatalogLoader::from_config(config.catalog.clone())?;
    let mut store = session.load()?;

    for key in keys {
        let item = resolve(&loader, key).await?;
        let name = item.display_name();
        match store.add(item) {
            AddOutcome::Added => println!("Added {name}"),
            AddOutcome::AlreadySelected => println!("{name} is already in the team"),
            AddOutcome::CapacityExceeded => {
                println!("Team is full ({MAX_TEAM_SIZE}), {name} was not added");
            }
        }
    }

    session.save(&store)?;
    println!("{}/{} selected", store.count(), MAX_TEAM_SIZE);
    Ok(())
}

pub fn execute_remove(session: &Session, id: u32) -> Result<()> {
    let mut store = session.load()?;
    if store.remove(id) {
        session.save(&store)?;
        println!("Removed #{id:03}");
    } else {
        println!("#{id:03} is not in the team");
    }
    Ok(())
}

pub fn execute_clear(session: &Session) -> Result<()> {
    let mut store = session.load()?;
    store.clear();
    session.save(&store)?;
    println!("Team cleared");
    Ok(())
}

pub fn execute_reorder(session: &Session, from: usize, to: usize) -> Result<()> {
    let mut store = session.load()?;
    if !store.reorder(from, to) {
        bail!(
            "Positions must be between 0 and {} (got {from} -> {to})",
            store.count().saturating_sub(1)
        );
    }
    session.save(&store)?;
    print_team(&store);
    Ok(())
}

pub async fn execute_random(config: &TeamdexConfig, session: &Session, count: usize) -> Result<()> {
    let loader = CatalogLoader::from_config(config.catalog.clone())?;
    let mut store = session.load()?;

    let picks = loader.get_random(count.min(MAX_TEAM_SIZE)).await;
    if picks.is_empty() {
        bail!("No random entries could be loaded");
    }

    let mut localized = Vec::with_capacity(picks.len());
    for item in picks {
        localized.push(loader.with_localized_name(item).await);
    }
    store.set_random(localized);

    session.save(&store)?;
    print_team(&store);
    Ok(())
}

pub fn execute_team(session: &Session, json_output: bool) -> Result<()> {
    let store = session.load()?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(store.selection())?);
        return Ok(());
    }

    if store.count() == 0 {
        println!("No team yet. Add entries with `teamdex add <id|name>`.");
        return Ok(());
    }

    print_team(&store);
    println!(
        "\n{}/{} selected, palette: {}, card style: {}",
        store.count(),
        MAX_TEAM_SIZE,
        store.theme().palette,
        store.theme().card_style
    );
    Ok(())
}

fn print_team(store: &teamdex_core::SelectionStore) {
    let rows: Vec<TeamRow> = store
        .selection()
        .iter()
        .enumerate()
        .map(|(position, selected)| TeamRow {
            position,
            id: selected.formatted_id(),
            name: selected.display_name(),
            types: types_display(selected),
            selected_at: selected.selected_at().format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();
    print_table(&rows);
}

pub fn execute_theme(
    session: &Session,
    palette: Option<String>,
    background: Option<String>,
    text: Option<String>,
    card_style: Option<String>,
) -> Result<()> {
    let mut store = session.load()?;

    let palette = match palette {
        Some(name) => match teamdex_core::share::palette_by_name(&name) {
            Some(p) => Some(p.key.to_string()),
            None => bail!("Unknown palette '{name}'. See `teamdex palettes`."),
        },
        None => None,
    };
    let card_style = card_style
        .map(|s| s.parse::<CardStyle>())
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let update = ThemeUpdate {
        background_color: background,
        text_color: text,
        card_style,
        palette,
    };

    if !update.is_empty() {
        store.update_theme(update);
        session.save(&store)?;
    }

    let theme = store.theme();
    println!("Palette:    {}", theme.palette);
    println!("Background: {}", theme.background_color);
    println!("Text:       {}", theme.text_color);
    println!("Card style: {}", theme.card_style);
    Ok(())
}

pub fn execute_palettes() -> Result<()> {
    let rows: Vec<PaletteRow> = palettes()
        .iter()
        .map(|p| PaletteRow {
            key: p.key.to_string(),
            label: p.label.to_string(),
            background: p.background(),
        })
        .collect();
    print_table(&rows);
    Ok(())
}

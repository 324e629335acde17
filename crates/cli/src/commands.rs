//! Command implementations
//!
//! Each command renders its output as a string so `run` decides where it
//! goes.

use adminkit_core::AdminSettings;
use adminkit_filters::{EntityFilter, FilterFactory, FixedClock, SEARCH_PARAM, SystemClock};
use adminkit_meta::{EntityRegistry, KeyCodec, LinkKind, NoFiles, Property};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use colored::Colorize;
use std::collections::HashMap;
use std::fmt::Write;

// ============================================================================
// list / inspect
// ============================================================================

/// One line per entity
pub fn list(registry: &EntityRegistry) -> Result<String> {
    let mut out = String::new();
    for entity in registry.entities() {
        writeln!(
            out,
            "{} {} ({} properties)",
            entity.name.bold(),
            entity.table_name.dimmed(),
            entity.properties.len()
        )?;
    }
    Ok(out)
}

/// Entity metadata as text or JSON
pub fn inspect(registry: &EntityRegistry, name: &str, json: bool) -> Result<String> {
    let entity = registry.entity(name)?;
    if json {
        return Ok(serde_json::to_string_pretty(entity.as_ref())?);
    }

    let mut out = String::new();
    writeln!(out, "{} {}", "Entity:".bold(), entity.name.cyan())?;
    writeln!(out, "  Table:   {}", entity.table_name)?;
    writeln!(
        out,
        "  Labels:  {} / {}",
        entity.verbose.singular, entity.verbose.plural
    )?;
    writeln!(out, "  Key:     {}", entity.joined_key())?;
    writeln!(
        out,
        "  Allow:   add={} edit={} delete={}",
        entity.allow_add, entity.allow_edit, entity.allow_delete
    )?;
    if let Some(format) = &entity.record_display_format {
        writeln!(out, "  Display: {}", format)?;
    }
    for kind in LinkKind::ALL {
        if let Some(template) = entity.links.template(kind) {
            writeln!(out, "  Link:    {} {}", kind, template)?;
        }
    }
    writeln!(out, "{}", "Properties:".bold())?;
    for property in &entity.properties {
        writeln!(out, "  {}", describe_property(registry, property))?;
    }
    for group in &entity.groups {
        let marker = if group.collapsed { " (collapsed)" } else { "" };
        writeln!(
            out,
            "{} {}{}: {}",
            "Group".bold(),
            group.name,
            marker,
            group.properties.join(", ")
        )?;
    }
    Ok(out)
}

fn describe_property(registry: &EntityRegistry, property: &Property) -> String {
    let mut line = format!(
        "{:<20} {:<12} column={}",
        property.name,
        property.type_info.declared.display_name(),
        property.column
    );
    if property.is_key {
        line.push_str(&format!(" {}", "key".yellow()));
    }
    if let Some(target) = registry.foreign_entity(property) {
        line.push_str(&format!(" -> {}", target.name.green()));
    }
    if property.required {
        line.push_str(" required");
    }
    if property.is_searchable {
        line.push_str(" searchable");
    }
    if !property.is_visible {
        line.push_str(" hidden");
    }
    line
}

// ============================================================================
// filter
// ============================================================================

/// Options of the `filter` command
#[derive(Debug, Clone, Default)]
pub struct FilterRequest {
    pub values: Vec<(String, String)>,
    pub search: Option<String>,
    pub alias: String,
    pub today: Option<NaiveDate>,
}

/// Compile filter values into a WHERE clause and its parameters
pub fn filter(registry: &EntityRegistry, name: &str, request: &FilterRequest) -> Result<String> {
    let entity = registry.entity(name)?;
    for (property, _) in &request.values {
        entity.require_property(property)?;
    }

    let factory = match request.today {
        Some(today) => FilterFactory::new(FixedClock::on(today)),
        None => FilterFactory::new(SystemClock),
    };
    let mut fields: HashMap<String, String> = request.values.iter().cloned().collect();
    if let Some(term) = &request.search {
        fields.insert(SEARCH_PARAM.to_string(), term.clone());
    }

    let mut out = String::new();
    for filter in factory.filters(&entity, &fields) {
        writeln!(out, "{}", describe_filter(filter.as_ref()))?;
    }

    let clause = factory.where_clause(&entity, &fields, &request.alias);
    if clause.is_empty() {
        writeln!(out, "{}", "No conditions".dimmed())?;
        return Ok(out);
    }
    writeln!(out, "{}", clause.to_sql().green())?;
    for (index, param) in clause.params.iter().enumerate() {
        writeln!(out, "  @{} = {}", index, param)?;
    }
    Ok(out)
}

fn describe_filter(filter: &dyn EntityFilter) -> String {
    let options: Vec<String> = filter
        .options()
        .iter()
        .map(|o| {
            if o.selected {
                format!("[{}]", o.label)
            } else {
                o.label.clone()
            }
        })
        .collect();
    format!(
        "{} ({}): {}",
        filter.property().name.bold(),
        filter.kind(),
        options.join(" | ")
    )
}

// ============================================================================
// key / bind
// ============================================================================

/// Decode a key string into named key values
pub fn key(registry: &EntityRegistry, name: &str, key: &str) -> Result<String> {
    let entity = registry.entity(name)?;
    let tokens = KeyCodec::new(&entity).decode(key)?;
    let mut out = String::new();
    for (property, token) in entity.key().into_iter().zip(&tokens) {
        writeln!(out, "{} = {}", property.name.bold(), token)?;
    }
    writeln!(out, "{}", KeyCodec::new(&entity).encode_with_names(&tokens))?;
    Ok(out)
}

/// Bind submitted fields into a row and show the bound values
pub fn bind(
    registry: &EntityRegistry,
    settings: &AdminSettings,
    name: &str,
    fields: &[(String, String)],
    key: Option<&str>,
) -> Result<String> {
    let entity = registry.entity(name)?;
    let fields: HashMap<String, String> = fields.iter().cloned().collect();
    let mut row = registry.new_row(name)?;
    let culture = settings.culture();

    let result = match key {
        Some(key) => row.fill_with_key(key, &fields, &NoFiles, &culture)?,
        None => row.fill(&fields, &NoFiles, &culture),
    };

    let mut out = String::new();
    for (property, value) in row.iter() {
        writeln!(out, "{:<20} {}", property.name, value)?;
    }
    for error in &result.errors {
        writeln!(out, "{} {}", "error:".red(), error)?;
    }
    writeln!(out, "{} {}", "Display:".bold(), row.to_display_string())?;

    if result.has_errors() {
        bail!(
            "{}{} binding errors for {}",
            out,
            result.errors.len(),
            entity.verbose.singular
        );
    }
    Ok(out)
}

// ============================================================================
// Tests
// ============================================================================

//! Annotation scanning
//!
//! The scanner turns a descriptor's annotations into an
//! [`EntityConfiguration`]. It is an ordered list of rules, one per
//! concern. Each rule reads only the annotations it owns and writes only
//! its own concern, so rules never depend on each other.

use crate::annotation::Annotation;
use crate::configuration::{EntityConfiguration, GroupSpec, PropertyConfiguration};
use crate::descriptor::{MemberDescriptor, TypeDescriptor};
use adminkit_core::{AdminError, AdminResult, DataType, Validatable};
use tracing::debug;

/// Rule over type-level annotations
type TypeRule = fn(&TypeDescriptor, &mut EntityConfiguration) -> AdminResult<()>;

/// Rule over one member's annotations
type MemberRule = fn(&MemberDescriptor, PropertyConfiguration) -> PropertyConfiguration;

/// Type-level rules in application order
const TYPE_RULES: &[(&str, TypeRule)] = &[
    ("table", table),
    ("search", search_properties),
    ("record_display", record_display),
    ("columns", display_columns),
    ("groups", groups),
    ("verbose", verbose),
    ("links", links),
];

/// Member-level rules in application order
const MEMBER_RULES: &[(&str, MemberRule)] = &[
    ("data_type", data_type),
    ("file", file_options),
    ("image_settings", image_settings),
    ("default_value", default_value),
    ("template", template),
    ("key", key),
    ("on_delete", on_delete),
    ("column", column),
    ("display", display),
    ("display_format", property_display_format),
    ("required", required),
    ("string_length", string_length),
    ("foreign_key", foreign_key),
];

// ============================================================================
// AttributeScanner
// ============================================================================

/// Builds the baseline configuration of an entity from its annotations
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeScanner;

impl AttributeScanner {
    /// Create a scanner
    pub fn new() -> Self {
        Self
    }

    /// Scan a descriptor
    ///
    /// Fails when the descriptor is malformed or a type-level annotation
    /// names a member the type does not have.
    pub fn scan(&self, descriptor: &TypeDescriptor) -> AdminResult<EntityConfiguration> {
        descriptor.validate()?;

        let mut config = EntityConfiguration::new(&descriptor.name);
        for (name, rule) in TYPE_RULES {
            rule(descriptor, &mut config)?;
            debug!("{}: applied type rule '{}'", descriptor.name, name);
        }

        for member in &descriptor.members {
            let rules = MEMBER_RULES
                .iter()
                .fold(PropertyConfiguration::new(), |rules, (_, rule)| {
                    rule(member, rules)
                });
            if rules != PropertyConfiguration::default() {
                config = config.property(&member.name, |_| rules);
            }
        }

        Ok(config)
    }
}

// ============================================================================
// Type Rules
// ============================================================================

fn require_members(descriptor: &TypeDescriptor, names: &[String], directive: &str) -> AdminResult<()> {
    match names.iter().find(|n| !descriptor.has_member(n)) {
        Some(missing) => Err(AdminError::configuration(
            &descriptor.name,
            format!("Unknown property '{}' in {} directive", missing, directive),
        )),
        None => Ok(()),
    }
}

fn table(descriptor: &TypeDescriptor, config: &mut EntityConfiguration) -> AdminResult<()> {
    if let Some((name, schema)) = descriptor.annotations.iter().find_map(|a| match a {
        Annotation::Table { name, schema } => Some((name, schema)),
        _ => None,
    }) {
        config.table = Some((name.clone(), schema.clone()));
    }
    Ok(())
}

fn search_properties(descriptor: &TypeDescriptor, config: &mut EntityConfiguration) -> AdminResult<()> {
    if let Some(names) = descriptor.annotations.iter().find_map(|a| match a {
        Annotation::Search(names) => Some(names),
        _ => None,
    }) {
        require_members(descriptor, names, "search")?;
        config.search_properties = Some(names.clone());
    }
    Ok(())
}

fn record_display(descriptor: &TypeDescriptor, config: &mut EntityConfiguration) -> AdminResult<()> {
    if let Some(format) = descriptor.annotations.iter().find_map(|a| match a {
        Annotation::RecordDisplay(format) => Some(format),
        _ => None,
    }) {
        config.display_format = Some(Some(format.clone()));
    }
    Ok(())
}

fn display_columns(descriptor: &TypeDescriptor, config: &mut EntityConfiguration) -> AdminResult<()> {
    if let Some(names) = descriptor.annotations.iter().find_map(|a| match a {
        Annotation::Columns(names) => Some(names),
        _ => None,
    }) {
        require_members(descriptor, names, "columns")?;
        config.display_properties = Some(names.clone());
    }
    Ok(())
}

fn groups(descriptor: &TypeDescriptor, config: &mut EntityConfiguration) -> AdminResult<()> {
    let Some(raw_groups) = descriptor.annotations.iter().find_map(|a| match a {
        Annotation::Groups(groups) => Some(groups),
        _ => None,
    }) else {
        return Ok(());
    };

    let group_of = |member: &MemberDescriptor| {
        member.annotations.iter().find_map(|a| match a {
            Annotation::Display { group, .. } => group.clone(),
            _ => None,
        })
    };

    let specs = raw_groups
        .iter()
        .map(|raw| {
            let name = raw.trim_end_matches('*');
            let members = descriptor
                .members
                .iter()
                .filter(|m| group_of(*m).as_deref() == Some(name))
                .map(|m| m.name.clone())
                .collect();
            GroupSpec::parse(raw, members)
        })
        .collect();
    config.groups = Some(specs);
    Ok(())
}

fn verbose(descriptor: &TypeDescriptor, config: &mut EntityConfiguration) -> AdminResult<()> {
    if let Some((singular, plural, group)) = descriptor.annotations.iter().find_map(|a| match a {
        Annotation::Verbose {
            singular,
            plural,
            group,
        } => Some((singular, plural, group)),
        _ => None,
    }) {
        config.verbose_singular = singular.clone();
        config.verbose_plural = plural.clone();
        config.verbose_group = group.clone();
    }
    Ok(())
}

fn links(descriptor: &TypeDescriptor, config: &mut EntityConfiguration) -> AdminResult<()> {
    if let Some(links) = descriptor.annotations.iter().find_map(|a| match a {
        Annotation::Links(links) => Some(links),
        _ => None,
    }) {
        config.links = Some(links.clone());
    }
    Ok(())
}

// ============================================================================
// Member Rules
// ============================================================================

/// First matching of data type, enum data type, image settings, file
fn data_type(member: &MemberDescriptor, rules: PropertyConfiguration) -> PropertyConfiguration {
    for annotation in &member.annotations {
        if let Annotation::DataType(source) = annotation {
            return rules.data_type(DataType::from_source(*source));
        }
    }
    for annotation in &member.annotations {
        if let Annotation::EnumDataType { name, variants } = annotation {
            let mut rules = rules.data_type(DataType::Enum);
            rules.enum_type = Some((name.clone(), variants.clone()));
            return rules;
        }
    }
    if member
        .annotations
        .iter()
        .any(|a| matches!(a, Annotation::ImageSettings(_)))
    {
        return rules.data_type(DataType::Image);
    }
    for annotation in &member.annotations {
        if let Annotation::File(options) = annotation {
            let kind = if options.is_image { DataType::Image } else { DataType::File };
            return rules.data_type(kind);
        }
    }
    rules
}

fn file_options(member: &MemberDescriptor, mut rules: PropertyConfiguration) -> PropertyConfiguration {
    if let Some(options) = member.annotations.iter().find_map(|a| match a {
        Annotation::File(options) => Some(options),
        _ => None,
    }) {
        rules.file_options = Some(options.clone());
    }
    rules
}

fn image_settings(member: &MemberDescriptor, rules: PropertyConfiguration) -> PropertyConfiguration {
    member
        .annotations
        .iter()
        .fold(rules, |rules, annotation| match annotation {
            Annotation::ImageSettings(settings) => {
                rules.image(settings.sub_path.clone(), settings.width, settings.height)
            }
            _ => rules,
        })
}

fn default_value(member: &MemberDescriptor, rules: PropertyConfiguration) -> PropertyConfiguration {
    match member.annotations.iter().find_map(|a| match a {
        Annotation::DefaultValue(value) => Some(value),
        _ => None,
    }) {
        Some(value) => rules.default_value(value.clone()),
        None => rules,
    }
}

/// A UI hint sets both halves; a template overrides each non-empty half
fn template(member: &MemberDescriptor, rules: PropertyConfiguration) -> PropertyConfiguration {
    let hint = member.annotations.iter().find_map(|a| match a {
        Annotation::UiHint(hint) => Some(hint.as_str()),
        _ => None,
    });
    let explicit = member.annotations.iter().find_map(|a| match a {
        Annotation::Template { display, editor } => Some((display, editor)),
        _ => None,
    });
    if hint.is_none() && explicit.is_none() {
        return rules;
    }

    let (mut display, mut editor) = (hint, hint);
    if let Some((explicit_display, explicit_editor)) = explicit {
        if let Some(d) = explicit_display.as_deref().filter(|d| !d.is_empty()) {
            display = Some(d);
        }
        if let Some(e) = explicit_editor.as_deref().filter(|e| !e.is_empty()) {
            editor = Some(e);
        }
    }
    rules.template(display, editor)
}

fn key(member: &MemberDescriptor, rules: PropertyConfiguration) -> PropertyConfiguration {
    if member.annotations.contains(&Annotation::Key) {
        rules.id()
    } else {
        rules
    }
}

fn on_delete(member: &MemberDescriptor, rules: PropertyConfiguration) -> PropertyConfiguration {
    match member.annotations.iter().find_map(|a| match a {
        Annotation::OnDelete(option) => Some(*option),
        _ => None,
    }) {
        Some(option) => rules.on_delete(option),
        None => rules,
    }
}

fn column(member: &MemberDescriptor, rules: PropertyConfiguration) -> PropertyConfiguration {
    match member.annotations.iter().find_map(|a| match a {
        Annotation::Column(name) => Some(name),
        _ => None,
    }) {
        Some(name) => rules.column(name.clone()),
        None => rules,
    }
}

fn display(member: &MemberDescriptor, mut rules: PropertyConfiguration) -> PropertyConfiguration {
    if let Some((name, description, group)) = member.annotations.iter().find_map(|a| match a {
        Annotation::Display {
            name,
            description,
            group,
        } => Some((name, description, group)),
        _ => None,
    }) {
        if let Some(name) = name {
            rules.display_name = Some(name.clone());
        }
        rules.description = Some(description.clone());
        rules.group_name = Some(group.clone());
    }
    rules
}

fn property_display_format(member: &MemberDescriptor, rules: PropertyConfiguration) -> PropertyConfiguration {
    match member.annotations.iter().find_map(|a| match a {
        Annotation::DisplayFormat(format) => Some(format),
        _ => None,
    }) {
        Some(format) => rules.format(format.clone()),
        None => rules,
    }
}

fn required(member: &MemberDescriptor, rules: PropertyConfiguration) -> PropertyConfiguration {
    match member.annotations.iter().find_map(|a| match a {
        Annotation::Required { message } => Some(message),
        _ => None,
    }) {
        Some(message) => rules.required(message.as_deref()),
        None => rules,
    }
}

fn string_length(member: &MemberDescriptor, rules: PropertyConfiguration) -> PropertyConfiguration {
    match member.annotations.iter().find_map(|a| match a {
        Annotation::StringLength(max) => Some(*max),
        _ => None,
    }) {
        Some(max) => rules.string_length(max),
        None => rules,
    }
}

fn foreign_key(member: &MemberDescriptor, rules: PropertyConfiguration) -> PropertyConfiguration {
    match member.annotations.iter().find_map(|a| match a {
        Annotation::ForeignKey(target) => Some(target),
        _ => None,
    }) {
        Some(target) => rules.foreign_key(target.clone()),
        None => rules,
    }
}

// ============================================================================
// Tests
// ============================================================================

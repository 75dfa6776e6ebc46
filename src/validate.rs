//! Cross-validation against the reference source
//!
//! The reference source renders the same inventory independently, with its
//! own formatting conventions: craft numbers are absent, crate series
//! suffixes are present, and custom names come back wrapped in quotes. The
//! checks here normalize both sides and compare sets, never exact strings,
//! and report divergences as structured issues.

use rayon::prelude::*;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use crate::item::{Inventory, ItemModel};
use crate::models::{ReferenceItem, ValueType, VALUE_PLACEHOLDER};
use crate::stores::{AssetCatalog, SchemaStore};

/// Reference descriptions from this line on belong to item-set bonuses, not
/// to the item itself.
const SET_BONUS_PREFIX: &str = "Item Set Bonus:";

/// Line the reference source attaches client-side; it never corresponds to a
/// real attribute.
const CONTRIBUTOR_LINE: &str = "Given to valuable Community Contributors";

/// Untranslated localization keys leak into descriptions with this prefix.
const LEAKED_KEY_PREFIX: &str = "Attrib_";

/// Reference-side name prefix of strange-quality items.
const STRANGE_PREFIX: &str = "Strange ";

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// Type of validation issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueType {
    /// A priced catalog entry has no item definition in the schema
    SchemaAssetDrift,
    /// Inventory holds more items than it has cells
    CapacityExceeded,
    /// An item's position points past the last cell
    PositionOutOfRange,
    /// A placeholder loadout pair survived into an equipped map
    EquippedPlaceholder,
    /// A normalized inventory name has no reference counterpart
    NameOnlyInInventory,
    /// A normalized reference name has no inventory counterpart
    NameOnlyInReference,
    /// An inventory item id is absent from the reference listing
    MissingReferenceItem,
    /// Per-item description sets differ between the two sides
    AttributeMismatch,
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueType::SchemaAssetDrift => write!(f, "schema_asset_drift"),
            IssueType::CapacityExceeded => write!(f, "capacity_exceeded"),
            IssueType::PositionOutOfRange => write!(f, "position_out_of_range"),
            IssueType::EquippedPlaceholder => write!(f, "equipped_placeholder"),
            IssueType::NameOnlyInInventory => write!(f, "name_only_in_inventory"),
            IssueType::NameOnlyInReference => write!(f, "name_only_in_reference"),
            IssueType::MissingReferenceItem => write!(f, "missing_reference_item"),
            IssueType::AttributeMismatch => write!(f, "attribute_mismatch"),
        }
    }
}

/// A validation issue found while cross-checking
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity of the issue
    pub severity: Severity,
    /// Type of issue
    pub issue_type: IssueType,
    /// Human-readable message describing the issue
    pub message: String,
    /// Optional suggestion (e.g. "did you mean?")
    pub suggestion: Option<String>,
    /// Additional context (e.g. the diverging description lines)
    pub context: Option<String>,
}

impl ValidationIssue {
    /// Create a new error
    pub fn error(issue_type: IssueType, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            issue_type,
            message: message.into(),
            suggestion: None,
            context: None,
        }
    }

    /// Create a new warning
    pub fn warning(issue_type: IssueType, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            issue_type,
            message: message.into(),
            suggestion: None,
            context: None,
        }
    }

    /// Add a suggestion to this issue
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add context to this issue
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Accumulated issues from one or more checks.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// All issues in the order they were found.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Fold another report's issues into this one.
    pub fn merge(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Warning).count()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Result of normalizing both name lists: whatever failed to line up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameDiff {
    /// Normalized names present only on the inventory side
    pub only_inventory: BTreeSet<String>,
    /// Normalized names present only on the reference side
    pub only_reference: BTreeSet<String>,
}

impl NameDiff {
    /// Whether the two normalized name sets were equal.
    pub fn is_match(&self) -> bool {
        self.only_inventory.is_empty() && self.only_reference.is_empty()
    }
}

fn counter_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" (?:Series )?#\d+$").expect("suffix pattern compiles"))
}

/// Strip a trailing craft-number or crate-series counter for comparison.
/// Stored names keep their suffixes; only comparisons see the stripped form.
fn strip_counter_suffix(name: &str) -> String {
    counter_suffix_regex().replace(name, "").into_owned()
}

/// Normalize both sides' display names and diff the resulting sets.
///
/// Every name-matching heuristic lives here, in one place:
/// - trailing ` #<n>` and ` Series #<n>` counters are insignificant
/// - the reference source wraps custom names in quote characters; ours keeps
///   the owner's characters verbatim, so surrounding quotes are stripped
/// - strange-quality items without a custom name are excluded on both sides
///   (upstream serves them inconsistently; scoped workaround, not a naming
///   rule)
pub fn normalize_and_match(inventory: &Inventory, reference: &[ReferenceItem]) -> NameDiff {
    let mut inventory_names = BTreeSet::new();
    for item in inventory {
        if item.quality.name == "strange" && item.custom_name.is_none() {
            continue;
        }
        inventory_names.insert(strip_counter_suffix(item.name()));
    }

    let mut reference_names = BTreeSet::new();
    for item in reference {
        let name = item.full_name.trim_matches('\'');
        if name.starts_with(STRANGE_PREFIX) {
            continue;
        }
        reference_names.insert(strip_counter_suffix(name));
    }

    NameDiff {
        only_inventory: inventory_names.difference(&reference_names).cloned().collect(),
        only_reference: reference_names.difference(&inventory_names).cloned().collect(),
    }
}

/// Cross-checks a normalized inventory against the reference source.
///
/// Construction compiles the schema's attribute templates into match
/// patterns once; the validator is then reusable across inventories of the
/// same (app, language) pair.
#[derive(Debug)]
pub struct ReferenceValidator<'a> {
    schema: &'a SchemaStore,
    template_patterns: Vec<Regex>,
}

impl<'a> ReferenceValidator<'a> {
    /// Build a validator for one schema, compiling its template patterns.
    pub fn new(schema: &'a SchemaStore) -> Self {
        Self { schema, template_patterns: compile_template_patterns(schema) }
    }

    /// Number of compiled template patterns.
    pub fn pattern_count(&self) -> usize {
        self.template_patterns.len()
    }

    /// Every priced catalog entry must have an item definition in the
    /// schema; membership answers for the same defindex must agree between
    /// the two stores.
    pub fn check_catalog(&self, catalog: &AssetCatalog) -> ValidationReport {
        let mut report = ValidationReport::new();
        for entry in catalog {
            if !self.schema.contains(entry.defindex) {
                report.push(
                    ValidationIssue::error(
                        IssueType::SchemaAssetDrift,
                        format!(
                            "catalog prices defindex {} but the schema does not define it",
                            entry.defindex
                        ),
                    )
                    .with_context(format!("app {}", catalog.app_id())),
                );
            }
        }
        report
    }

    /// Structural inventory checks: capacity, positions, and equipped maps.
    pub fn check_inventory(&self, inventory: &Inventory) -> ValidationReport {
        let mut report = ValidationReport::new();

        if inventory.len() as u32 > inventory.cells_total() {
            report.push(ValidationIssue::error(
                IssueType::CapacityExceeded,
                format!(
                    "{} items in a {}-cell backpack",
                    inventory.len(),
                    inventory.cells_total()
                ),
            ));
        }

        for item in inventory {
            if item.position > inventory.cells_total() {
                report.push(
                    ValidationIssue::error(
                        IssueType::PositionOutOfRange,
                        format!(
                            "item {} sits at cell {} of {}",
                            item.id,
                            item.position,
                            inventory.cells_total()
                        ),
                    )
                    .with_context(item.full_name.clone()),
                );
            }
            // Construction filters placeholder pairs; one surviving here
            // means the model was built some other way
            if item.equipped.contains_key(&0) || item.equipped.values().any(|&s| s == 65535) {
                report.push(
                    ValidationIssue::error(
                        IssueType::EquippedPlaceholder,
                        format!("item {} carries a placeholder loadout entry", item.id),
                    )
                    .with_context(item.full_name.clone()),
                );
            }
        }

        report
    }

    /// Name parity: the normalized name sets of the two sides must be equal.
    pub fn check_names(
        &self,
        inventory: &Inventory,
        reference: &[ReferenceItem],
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        let diff = normalize_and_match(inventory, reference);

        let reference_pool: Vec<&str> =
            diff.only_reference.iter().map(String::as_str).collect();
        for name in &diff.only_inventory {
            let mut issue = ValidationIssue::error(
                IssueType::NameOnlyInInventory,
                format!("'{name}' has no reference counterpart"),
            );
            if let Some(suggestion) = suggest_name(name, &reference_pool) {
                issue = issue.with_suggestion(suggestion);
            }
            report.push(issue);
        }

        let inventory_pool: Vec<&str> =
            diff.only_inventory.iter().map(String::as_str).collect();
        for name in &diff.only_reference {
            let mut issue = ValidationIssue::error(
                IssueType::NameOnlyInReference,
                format!("reference lists '{name}' but the inventory does not"),
            );
            if let Some(suggestion) = suggest_name(name, &inventory_pool) {
                issue = issue.with_suggestion(suggestion);
            }
            report.push(issue);
        }

        report
    }

    /// Attribute parity: per item, the filtered description sets of the two
    /// sides must be exactly equal.
    pub fn check_attributes(
        &self,
        inventory: &Inventory,
        reference: &[ReferenceItem],
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        let reference_sets = self.reference_descriptions(reference);

        for item in inventory {
            let ours = visible_descriptions(item);
            let Some(theirs) = reference_sets.get(&item.id) else {
                report.push(
                    ValidationIssue::error(
                        IssueType::MissingReferenceItem,
                        format!("item {} is missing from the reference listing", item.id),
                    )
                    .with_context(item.full_name.clone()),
                );
                continue;
            };

            if ours != *theirs {
                let only_ours: Vec<&str> =
                    ours.difference(theirs).map(String::as_str).collect();
                let only_theirs: Vec<&str> =
                    theirs.difference(&ours).map(String::as_str).collect();
                report.push(
                    ValidationIssue::error(
                        IssueType::AttributeMismatch,
                        format!("attribute descriptions diverge for item {}", item.id),
                    )
                    .with_context(format!(
                        "only here: {only_ours:?}; only reference: {only_theirs:?}"
                    )),
                );
            }
        }

        report
    }

    /// Run the structural, name, and attribute checks in one pass.
    pub fn cross_check(
        &self,
        inventory: &Inventory,
        reference: &[ReferenceItem],
    ) -> ValidationReport {
        let mut report = self.check_inventory(inventory);
        report.merge(self.check_names(inventory, reference));
        report.merge(self.check_attributes(inventory, reference));
        report
    }

    /// Per reference entry, keep only description lines that look like real
    /// attributes: everything after a set-bonus marker is dropped, the
    /// client-attached contributor line is skipped, and a line counts only
    /// if at least one compiled template pattern matches its head. A listing
    /// may carry the same item id in more than one entry; their surviving
    /// lines accumulate into one set.
    fn reference_descriptions(
        &self,
        reference: &[ReferenceItem],
    ) -> HashMap<u64, BTreeSet<String>> {
        let per_entry: Vec<(u64, BTreeSet<String>)> = reference
            .par_iter()
            .map(|item| {
                let mut set = BTreeSet::new();
                for line in item {
                    let desc = line.value.trim();
                    if desc.is_empty() {
                        continue;
                    }
                    if desc.starts_with(SET_BONUS_PREFIX) {
                        break;
                    }
                    if desc == CONTRIBUTOR_LINE {
                        continue;
                    }
                    if self.template_patterns.iter().any(|p| p.is_match(desc)) {
                        set.insert(desc.to_string());
                    }
                }
                (item.id, set)
            })
            .collect();

        let mut merged: HashMap<u64, BTreeSet<String>> = HashMap::new();
        for (id, set) in per_entry {
            merged.entry(id).or_default().extend(set);
        }
        merged
    }
}

/// The catalog side of attribute parity: formatted descriptions of visible
/// attributes, minus the value types whose rendering is upstream-unreliable
/// and minus leaked localization keys.
fn visible_descriptions(item: &ItemModel) -> BTreeSet<String> {
    item.attributes()
        .filter(|a| {
            !a.hidden
                && !a.formatted_description.starts_with(LEAKED_KEY_PREFIX)
                && !matches!(a.value_type, ValueType::Date | ValueType::ParticleIndex)
        })
        .map(|a| a.formatted_description.clone())
        .collect()
}

/// Compile every non-empty attribute description template into an anchored
/// pattern with the value placeholder widened to `[\d-]+`.
fn compile_template_patterns(schema: &SchemaStore) -> Vec<Regex> {
    schema
        .attributes()
        .par_iter()
        .filter_map(|attr| {
            let desc = attr.description()?.trim();
            if desc.is_empty() {
                return None;
            }
            let pattern =
                format!("^{}", regex::escape(desc).replace(VALUE_PLACEHOLDER, r"[\d-]+"));
            Regex::new(&pattern).ok()
        })
        .collect()
}

/// Suggest the closest known name for an unmatched one.
pub fn suggest_name(unknown: &str, known: &[&str]) -> Option<String> {
    // Only consider names within a small edit distance
    const MAX_DISTANCE: usize = 2;

    let mut best_match: Option<(&str, usize)> = None;

    for candidate in known {
        let distance = levenshtein_distance(unknown, candidate);
        if distance <= MAX_DISTANCE {
            match best_match {
                None => best_match = Some((candidate, distance)),
                Some((_, best_dist)) if distance < best_dist => {
                    best_match = Some((candidate, distance))
                }
                _ => {}
            }
        }
    }

    best_match.map(|(s, _)| s.to_string())
}

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut dp = vec![vec![0usize; b_len + 1]; a_len + 1];

    for i in 0..=a_len {
        dp[i][0] = i;
    }
    for j in 0..=b_len {
        dp[0][j] = j;
    }

    for i in 1..=a_len {
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }

    dp[a_len][b_len]
}

//! `textmods rules` -- view and edit TextReplacer rules.
//!
//! # Examples
//!
//! ```text
//! textmods rules list
//! textmods rules add --name "Reddit" --pattern "www\.reddit\.com" --replacement "old.reddit.com"
//! textmods rules update 2 enabled true
//! textmods rules delete 0
//! textmods rules reset
//! ```

use comfy_table::{Table, presets::UTF8_FULL};

use textmods_plugin_textreplacer::{ReplacerSettings, Rule, RuleFieldUpdate, RuleSet, RuleStore};

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Render rules as a table.
fn rules_table(rules: &RuleSet) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["#", "NAME", "PATTERN", "REPLACEMENT", "ENABLED", "IGNORE CASE", "VALID"]);
    for (i, rule) in rules.iter().enumerate() {
        table.add_row([
            i.to_string(),
            rule.name.clone(),
            rule.pattern.clone(),
            rule.replacement.clone(),
            yes_no(rule.enabled).to_owned(),
            yes_no(rule.case_insensitive).to_owned(),
            yes_no(rule.validate().is_ok()).to_owned(),
        ]);
    }
    table
}

fn print_rules(rules: &RuleSet) {
    if rules.is_empty() {
        println!("No rules configured.");
    } else {
        println!("{}", rules_table(rules));
    }
}

fn warn_if_invalid(rule: &Rule) {
    if let Err(e) = rule.validate() {
        eprintln!("warning: rule '{}' will be skipped: {e}", rule.name);
    }
}

pub fn rules_list(store: &RuleStore, json: bool) -> anyhow::Result<()> {
    let rules = store.load_rules();
    if json {
        let record = ReplacerSettings { regexes: rules };
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_rules(&rules);
    }
    Ok(())
}

pub fn rules_add(
    store: &RuleStore,
    name: String,
    pattern: String,
    replacement: String,
    enabled: bool,
    case_insensitive: bool,
) -> anyhow::Result<()> {
    let rule = Rule {
        name,
        pattern,
        replacement,
        enabled,
        case_insensitive,
    };
    warn_if_invalid(&rule);
    let rules = store.add_rule(rule)?;
    println!("Added rule #{}.", rules.len() - 1);
    print_rules(&rules);
    Ok(())
}

pub fn rules_update(store: &RuleStore, index: usize, field: &str, value: &str) -> anyhow::Result<()> {
    let update = RuleFieldUpdate::parse(field, value)?;
    let rules = store.update_rule_field(index, update)?;
    if let Some(rule) = rules.get(index) {
        warn_if_invalid(rule);
    }
    println!("Updated rule #{index}.");
    print_rules(&rules);
    Ok(())
}

pub fn rules_delete(store: &RuleStore, index: usize) -> anyhow::Result<()> {
    let rules = store.delete_rule(index)?;
    println!("Deleted rule #{index}.");
    print_rules(&rules);
    Ok(())
}

pub fn rules_reset(store: &RuleStore) -> anyhow::Result<()> {
    let rules = store.reset_rules()?;
    println!("Restored {} default rules.", rules.len());
    print_rules(&rules);
    Ok(())
}

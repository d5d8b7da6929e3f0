//! Integration test: the built-in table against a half-migrated project.

use migration_guard_core::{Report, RuleRegistry, Severity, Validator};
use migration_guard_rules::{default_registry, Preset};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MIGRATED: &str = r#"package forms

import (
	"github.com/niiniyare/ruun/views/components/atoms"
	"github.com/niiniyare/ruun/views/components/molecules"
)

templ Login() {
	@molecules.FormField(molecules.FormFieldProps{Label: "Email"})
	@atoms.Button(atoms.ButtonProps{Text: "Sign in"})
}
"#;

const LEGACY: &str = r#"package forms

import "github.com/niiniyare/ruun/views/components/button.templ"

templ Signup() {
	<form hx-post="/signup" class="bg-blue-500">
		@atoms.Button("Submit", "primary")
	</form>
}
"#;

const HANDLER: &str = r#"package handlers

func Color() string {
	return theme.Get("primary")
}
"#;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "views/forms/login.templ", MIGRATED);
    write(tmp.path(), "views/forms/signup.templ", LEGACY);
    write(tmp.path(), "handlers/color.go", HANDLER);
    write(tmp.path(), "migration_backups/old/signup.templ", LEGACY);
    tmp
}

fn scan(root: &Path, registry: RuleRegistry) -> Report {
    Validator::builder()
        .root(root)
        .registry(registry)
        .build()
        .unwrap()
        .validate()
        .unwrap()
}

fn rule_ids(report: &Report) -> Vec<&str> {
    report.issues.iter().map(|i| i.rule_id.as_str()).collect()
}

#[test]
fn recommended_table_finds_every_leftover() {
    let tmp = project();
    let report = scan(tmp.path(), default_registry().unwrap());

    assert_eq!(report.files_checked, 3);
    assert_eq!(
        rule_ids(&report),
        [
            "no-dynamic-theme-lookup",
            "no-legacy-import-path",
            "namespace-import-present",
            "button-props-struct",
            "no-hardcoded-color-class",
            "htmx-via-props",
        ]
    );
    assert_eq!(report.summary.error, 4);
    assert_eq!(report.summary.warning, 2);

    assert!(report
        .passed_rule_ids
        .contains(&"template-generates".to_string()));
    assert!(report
        .passed_rule_ids
        .contains(&"molecules-import-present".to_string()));
    assert!(!report.passed_rule_ids.contains(&"htmx-via-props".to_string()));
}

#[test]
fn strict_preset_turns_warnings_into_errors() {
    let tmp = project();
    let report = scan(
        tmp.path(),
        RuleRegistry::new(Preset::Strict.rules()).unwrap(),
    );
    assert_eq!(report.summary.warning, 0);
    assert_eq!(report.summary.error, 6);
    assert!(report.by_severity(Severity::Error).len() == report.issues.len());
}

#[test]
fn minimal_preset_ignores_component_rules() {
    let tmp = project();
    let report = scan(
        tmp.path(),
        RuleRegistry::new(Preset::Minimal.rules()).unwrap(),
    );
    assert_eq!(
        rule_ids(&report),
        ["no-legacy-import-path", "namespace-import-present"]
    );
}

#[test]
fn migrated_file_alone_is_clean() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "login.templ", MIGRATED);
    let report = scan(tmp.path(), default_registry().unwrap());
    assert!(report.is_passing(), "{:#?}", report.issues);
    assert!(report.format_digest().contains("VALIDATION PASSED"));
}

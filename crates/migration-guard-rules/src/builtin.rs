//! The built-in rule table.

use migration_guard_core::{FileKind, RegistryError, Rule, RuleKind, RuleRegistry};
use tracing::debug;

const ATOMS_IMPORT: &str = r#""github.com/niiniyare/ruun/views/components/atoms""#;
const MOLECULES_IMPORT: &str = r#""github.com/niiniyare/ruun/views/components/molecules""#;

const GO: &[FileKind] = &[FileKind::Go];
const TEMPL: &[FileKind] = &[FileKind::Templ];
const BOTH: &[FileKind] = &[FileKind::Go, FileKind::Templ];

fn pattern(pattern: &str) -> RuleKind {
    RuleKind::Pattern {
        pattern: pattern.to_string(),
    }
}

fn import(usage: &str, declaration: &str) -> RuleKind {
    RuleKind::ImportRequirement {
        pattern: usage.to_string(),
        declaration: declaration.to_string(),
    }
}

/// Returns every built-in rule, in evaluation order.
#[must_use]
pub fn builtin_rules() -> Vec<Rule> {
    let mut rules = syntax_rules();
    rules.extend(import_rules());
    rules.extend(component_rules());
    rules.extend(compilation_rules());
    rules
}

/// Builds a registry over [`builtin_rules`].
///
/// # Errors
///
/// Never fails for the shipped table; the error type is shared with
/// registries built from user configuration.
pub fn default_registry() -> Result<RuleRegistry, RegistryError> {
    let registry = RuleRegistry::new(builtin_rules())?;
    debug!("Built-in registry: {} rules", registry.len());
    Ok(registry)
}

pub(crate) fn syntax_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "valid-structured-syntax",
            "Valid Go Syntax",
            RuleKind::Syntax,
            GO,
            "Go file has syntax errors",
        )
        .description("All Go files should have valid syntax")
        .required(true),
        Rule::new(
            "valid-template-syntax",
            "Valid Templ Syntax",
            RuleKind::Syntax,
            TEMPL,
            "Templ file has syntax errors",
        )
        .description("All templ files should have balanced braces and well-formed components")
        .required(true),
    ]
}

pub(crate) fn import_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "no-legacy-import-path",
            "No Legacy Import Paths",
            pattern(r#"import\s+"[^"]*views/components/[^/"]+\.\w+""#),
            BOTH,
            "Found import of legacy component path - should use atoms/molecules/organisms",
        )
        .description("Should not import old component file paths")
        .required(true)
        .suggested_fix("Update import to use atoms/molecules/organisms package"),
        Rule::new(
            "namespace-import-present",
            "Atoms Import Present",
            import(r"@atoms\.\w+", ATOMS_IMPORT),
            TEMPL,
            "Using atoms components but missing import",
        )
        .description("Files using atoms should import the atoms package")
        .required(true)
        .suggested_fix(format!("Add: import {ATOMS_IMPORT}")),
        Rule::new(
            "molecules-import-present",
            "Molecules Import Present",
            import(r"@molecules\.\w+", MOLECULES_IMPORT),
            TEMPL,
            "Using molecules components but missing import",
        )
        .description("Files using molecules should import the molecules package")
        .required(true)
        .suggested_fix(format!("Add: import {MOLECULES_IMPORT}")),
    ]
}

pub(crate) fn component_rules() -> Vec<Rule> {
    vec![
        // Positional string arguments are the pre-migration call shape.
        Rule::new(
            "button-props-struct",
            "Button Uses Props Struct",
            pattern(r#"@atoms\.Button\(\s*""#),
            TEMPL,
            "Button should use ButtonProps struct",
        )
        .description("Button components should use a props struct")
        .required(true)
        .suggested_fix("Use @atoms.Button(atoms.ButtonProps{...})"),
        Rule::new(
            "form-field-props-struct",
            "FormField Uses Props Struct",
            pattern(r#"@molecules\.FormField\(\s*""#),
            TEMPL,
            "FormField should use FormFieldProps struct",
        )
        .description("FormField components should use a props struct")
        .required(true)
        .suggested_fix("Use @molecules.FormField(molecules.FormFieldProps{...})"),
        Rule::new(
            "input-props-struct",
            "Input Uses Props Struct",
            pattern(r#"@atoms\.Input\(\s*""#),
            TEMPL,
            "Input should use InputProps struct",
        )
        .description("Input components should use a props struct")
        .required(true)
        .suggested_fix("Use @atoms.Input(atoms.InputProps{...})"),
        Rule::new(
            "no-dynamic-theme-lookup",
            "No theme.Get() Calls",
            pattern(r"theme\.Get\("),
            BOTH,
            "Found theme.Get() call - should use compiled CSS classes",
        )
        .description("Should not use dynamic theme.Get() calls")
        .required(true)
        .suggested_fix("Use compiled CSS classes instead of theme.Get()"),
        Rule::new(
            "no-hardcoded-color-class",
            "No Hardcoded Colors",
            pattern(r#"class="[^"]*(?:text-red-|bg-blue-|border-green-)\d+"#),
            TEMPL,
            "Found hardcoded color - should use theme tokens",
        )
        .description("Should not use hardcoded Tailwind color classes")
        .suggested_fix("Use theme tokens like text-error, bg-primary"),
        Rule::new(
            "htmx-via-props",
            "HTMX via Props",
            pattern(r#"hx-(?:post|get|put|delete)=""#),
            TEMPL,
            "HTMX attribute found in template - should pass via props",
        )
        .description("HTMX attributes should be passed via component props")
        .suggested_fix("Pass HTMX attributes via component props"),
        Rule::new(
            "alpine-via-props",
            "Alpine.js via Props",
            pattern(r#"x-(?:data|show|if|for|on)=""#),
            TEMPL,
            "Alpine directive found in template - should pass via props",
        )
        .description("Alpine directives should be passed via component props")
        .suggested_fix("Pass Alpine directives via component props"),
    ]
}

pub(crate) fn compilation_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "template-generates",
            "Templ Files Generate",
            RuleKind::Compilation,
            TEMPL,
            "Templ file failed to generate Go code",
        )
        .description("Templ files should generate Go code successfully")
        .required(true),
        Rule::new(
            "source-builds",
            "Go Code Builds",
            RuleKind::Compilation,
            GO,
            "Go code failed to compile",
        )
        .description("Go code should compile successfully")
        .required(true),
    ]
}

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use snafu::{ensure, ResultExt};

use crate::{diag::Diagnostics, error::*};

lazy_static! {
    // `$$` is an escaped dollar sign and references nothing
    static ref TEMPLATE_REF: Regex =
        Regex::new(r"\$\$|\$\{([^}]+)\}|\$([_0-9A-Za-z]+)").expect("template reference regex");
}

/// Outcome of a single extraction: the element (if any) and the diagnostics
/// raised while finding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub value: Option<String>,
    pub diagnostics: Diagnostics,
}

/// A fixed regex, template and human-readable pattern, checked to agree with
/// each other when constructed.
#[derive(Debug)]
pub struct ElementPattern {
    regex: Regex,
    template: String,
    description: String,
}

impl ElementPattern {
    /// Compile `regex` and check every group `template` refers to exists in it.
    ///
    /// # Arguments
    ///
    /// * `regex` - A regular expression with a named capture group
    /// * `template` - Expansion template referencing that group, e.g. `$ProjectId`
    /// * `description` - Human-readable pattern used in diagnostics, e.g. `projects/{project}/`
    ///
    pub fn new(regex: &str, template: &str, description: &str) -> Result<Self, FunctionError> {
        let compiled = Regex::new(regex).context(InvalidRegex { regex })?;
        check_template(&compiled, template)?;

        Ok(ElementPattern {
            regex: compiled,
            template: template.to_string(),
            description: description.to_string(),
        })
    }

    pub fn extract(&self, input: &str) -> Extraction {
        find_element(input, &self.regex, &self.template, &self.description)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Return the groups referenced by an expansion template, named or numbered.
fn template_refs(template: &str) -> Vec<&str> {
    TEMPLATE_REF
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str())
        .collect()
}

/// Ensure a template references at least one group and that every group it
/// references is defined by the regex.
pub fn check_template(regex: &Regex, template: &str) -> Result<(), FunctionError> {
    let refs = template_refs(template);
    ensure!(
        !refs.is_empty(),
        InvalidTemplate {
            template,
            group: "",
            regex: regex.as_str(),
        }
    );

    for group in refs {
        let defined = match group.parse::<usize>() {
            Ok(index) => index < regex.captures_len(),
            Err(_) => regex.capture_names().any(|name| name == Some(group)),
        };
        ensure!(
            defined,
            InvalidTemplate {
                template,
                group,
                regex: regex.as_str(),
            }
        );
    }

    Ok(())
}

fn expand(caps: &Captures, template: &str) -> String {
    let mut value = String::new();
    caps.expand(template, &mut value);
    value
}

/// Extract the element described by `template` from `input`.
///
/// Every non-overlapping match of `regex` is counted. No match sets an error
/// diagnostic and returns no value. More than one match sets a warning and
/// the left-most match is used.
///
/// # Panics
///
/// Panics if `template` refers to a group `regex` does not define. Regex and
/// template pairs are fixed per function, so this is a programming error.
///
/// # Arguments
///
/// * `input` - A self link or resource id
/// * `regex` - Compiled regex containing the capture group of interest
/// * `template` - Expansion template referencing the capture group
/// * `pattern` - Human-readable pattern included in diagnostics
///
pub fn get_element(input: &str, regex: &Regex, template: &str, pattern: &str) -> Extraction {
    if let Err(e) = check_template(regex, template) {
        panic!("{}", e);
    }

    find_element(input, regex, template, pattern)
}

// the template has already been checked against the regex
fn find_element(input: &str, regex: &Regex, template: &str, pattern: &str) -> Extraction {
    let mut diagnostics = Diagnostics::new();
    let mut matches = regex.captures_iter(input);

    let first = match matches.next() {
        Some(caps) => caps,
        None => {
            debug!("No match for pattern {} in {}", pattern, input);
            diagnostics.add_error(
                "No submatches found in input string",
                format!(
                    "The input string \"{}\" doesn't contain the expected pattern \"{}\".",
                    input, pattern
                ),
            );
            return Extraction {
                value: None,
                diagnostics,
            };
        }
    };

    let value = expand(&first, template);
    let count = 1 + matches.count();
    if count > 1 {
        diagnostics.add_warning(
            "Ambiguous input string could contain more than one match",
            format!(
                "The input string \"{}\" contains {} matches for the pattern \"{}\". The first found match \"{}\" will be used.",
                input, count, pattern, value
            ),
        );
    }
    debug!(
        "Extracted {} from {} using pattern {} ({} match(es))",
        value, input, pattern, count
    );

    Extraction {
        value: Some(value),
        diagnostics,
    }
}

use lazy_static::lazy_static;
use serde::Serialize;

use crate::{diag::Diagnostic, error::FunctionError, utils::ElementPattern};

#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Definition {
    pub name: &'static str,
    pub summary: &'static str,
    pub description: &'static str,
    pub parameter: Parameter,
}

// value returned from a successful function call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionOutput {
    pub result: String,
    pub warnings: Vec<Diagnostic>,
}

/// A function returning one element of a self link or resource id.
#[derive(Debug)]
pub struct ElementFunction {
    definition: Definition,
    pattern: ElementPattern,
}

impl ElementFunction {
    fn new(
        definition: Definition,
        regex: &str,
        template: &str,
        description: &str,
    ) -> ElementFunction {
        // patterns are fixed at compile time, so a bad pair is a bug
        let pattern = ElementPattern::new(regex, template, description)
            .unwrap_or_else(|e| panic!("Invalid pattern for {}: {}", definition.name, e));
        ElementFunction {
            definition,
            pattern,
        }
    }

    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    pub fn pattern(&self) -> &ElementPattern {
        &self.pattern
    }

    /// Extract the element from `input`. Errors stop the call; warnings are
    /// logged and returned alongside the element.
    pub fn run(&self, input: &str) -> Result<FunctionOutput, FunctionError> {
        let extraction = self.pattern.extract(input);
        let diagnostics = extraction.diagnostics;

        match extraction.value {
            Some(result) if !diagnostics.has_error() => {
                let warnings = diagnostics.warnings();
                for warning in &warnings {
                    warn!("{}: {}", self.name(), warning);
                }
                Ok(FunctionOutput { result, warnings })
            }
            _ => Err(FunctionError::NoMatch {
                input: input.to_string(),
                pattern: self.pattern.description().to_string(),
                diagnostics,
            }),
        }
    }
}

lazy_static! {
    static ref FUNCTIONS: Vec<ElementFunction> = vec![
        ElementFunction::new(
            Definition {
                name: "project_id_from_self_link",
                summary: "Returns the project name within the resource self link or id provided as an argument.",
                description: "Takes a single string argument, which should be a self link or id of a resource. Returns the project name from the input string, or raises an error if no project is present. The presence of \"projects/{project}/\" identifies the project name, e.g. \"https://www.googleapis.com/compute/v1/projects/my-project/zones/us-central1-c/instances/my-instance\" returns \"my-project\".",
                parameter: Parameter {
                    name: "self_link",
                    description: "A self link of a resource, or an id. For example, both \"https://www.googleapis.com/compute/v1/projects/my-project/zones/us-central1-c/instances/my-instance\" and \"projects/my-project/zones/us-central1-c/instances/my-instance\" are valid inputs",
                },
            },
            "projects/(?P<ProjectId>[^/]+)/",
            "$ProjectId",
            "projects/{project}/",
        ),
        ElementFunction::new(
            Definition {
                name: "location_from_id",
                summary: "Returns the location name within the resource id or self link provided as an argument.",
                description: "Takes a single string argument, which should be an id or self link of a resource. Returns the location from the input string, or raises an error if no location is present. The presence of \"locations/{location}/\" identifies the location, e.g. \"projects/my-project/locations/us-central1/services/my-service\" returns \"us-central1\".",
                parameter: Parameter {
                    name: "id",
                    description: "An id of a resource, or a self link. For example, both \"projects/my-project/locations/us-central1/services/my-service\" and \"https://run.googleapis.com/v2/projects/my-project/locations/us-central1/services/my-service\" are valid inputs",
                },
            },
            "locations/(?P<Location>[^/]+)/",
            "$Location",
            "locations/{location}/",
        ),
        ElementFunction::new(
            Definition {
                name: "region_from_id",
                summary: "Returns the region name within the resource id or self link provided as an argument.",
                description: "Takes a single string argument, which should be an id or self link of a resource. Returns the region from the input string, or raises an error if no region is present. The presence of \"regions/{region}/\" identifies the region, e.g. \"projects/my-project/regions/us-central1/subnetworks/my-subnet\" returns \"us-central1\".",
                parameter: Parameter {
                    name: "id",
                    description: "An id of a resource, or a self link. For example, both \"projects/my-project/regions/us-central1/subnetworks/my-subnet\" and \"https://www.googleapis.com/compute/v1/projects/my-project/regions/us-central1/subnetworks/my-subnet\" are valid inputs",
                },
            },
            "regions/(?P<Region>[^/]+)/",
            "$Region",
            "regions/{region}/",
        ),
        ElementFunction::new(
            Definition {
                name: "zone_from_id",
                summary: "Returns the zone name within the resource id or self link provided as an argument.",
                description: "Takes a single string argument, which should be an id or self link of a resource. Returns the zone from the input string, or raises an error if no zone is present. The presence of \"zones/{zone}/\" identifies the zone, e.g. \"projects/my-project/zones/us-central1-c/instances/my-instance\" returns \"us-central1-c\".",
                parameter: Parameter {
                    name: "id",
                    description: "An id of a resource, or a self link. For example, both \"projects/my-project/zones/us-central1-c/instances/my-instance\" and \"https://www.googleapis.com/compute/v1/projects/my-project/zones/us-central1-c/instances/my-instance\" are valid inputs",
                },
            },
            "zones/(?P<Zone>[^/]+)/",
            "$Zone",
            "zones/{zone}/",
        ),
        ElementFunction::new(
            Definition {
                name: "name_from_id",
                summary: "Returns the short-form name of a resource within the resource id or self link provided as an argument.",
                description: "Takes a single string argument, which should be an id or self link of a resource. Returns the final path segment of the input string, or raises an error if there is none, e.g. \"projects/my-project/zones/us-central1-c/instances/my-instance\" returns \"my-instance\".",
                parameter: Parameter {
                    name: "id",
                    description: "An id of a resource, or a self link. For example, both \"projects/my-project/zones/us-central1-c/instances/my-instance\" and \"https://www.googleapis.com/compute/v1/projects/my-project/zones/us-central1-c/instances/my-instance\" are valid inputs",
                },
            },
            "/(?P<ResourceName>[^/]+)$",
            "$ResourceName",
            "resourceType/{name}$",
        ),
    ];
}

/// Every function exposed by the service.
pub fn all() -> &'static [ElementFunction] {
    &FUNCTIONS
}

pub fn find(name: &str) -> Option<&'static ElementFunction> {
    all().iter().find(|f| f.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELF_LINK: &str =
        "https://www.googleapis.com/compute/v1/projects/my-project/zones/us-central1-c/instances/my-instance";
    const ID: &str = "projects/my-project/zones/us-central1-c/instances/my-instance";

    fn run(name: &str, input: &str) -> Result<FunctionOutput, FunctionError> {
        find(name).unwrap().run(input)
    }

    #[test]
    fn project_id_from_self_link() {
        let output = run("project_id_from_self_link", SELF_LINK).unwrap();
        assert_eq!(output.result, "my-project");
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn project_id_from_resource_id() {
        let output = run("project_id_from_self_link", ID).unwrap();
        assert_eq!(output.result, "my-project");
    }

    #[test]
    fn project_id_from_repetitive_input_uses_left_most_match() {
        let input = "https://www.googleapis.com/compute/v1/projects/my-project/projects/not-this-1/projects/not-this-2/instances/my-instance";
        let output = run("project_id_from_self_link", input).unwrap();
        assert_eq!(output.result, "my-project");
        assert_eq!(output.warnings.len(), 1);
    }

    #[test]
    fn project_id_missing_is_an_error() {
        let err = run(
            "project_id_from_self_link",
            "zones/us-central1-c/instances/my-instance",
        )
        .unwrap_err();
        match err {
            FunctionError::NoMatch {
                pattern,
                diagnostics,
                ..
            } => {
                assert_eq!(pattern, "projects/{project}/");
                assert_eq!(diagnostics.len(), 1);
                assert!(diagnostics.has_error());
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn sibling_functions_extract_their_element() {
        assert_eq!(run("zone_from_id", SELF_LINK).unwrap().result, "us-central1-c");
        assert_eq!(run("name_from_id", ID).unwrap().result, "my-instance");
        assert_eq!(
            run(
                "region_from_id",
                "projects/my-project/regions/us-central1/subnetworks/my-subnet"
            )
            .unwrap()
            .result,
            "us-central1"
        );
        assert_eq!(
            run(
                "location_from_id",
                "projects/my-project/locations/europe-west1/services/my-service"
            )
            .unwrap()
            .result,
            "europe-west1"
        );
    }

    #[test]
    fn region_missing_is_an_error() {
        assert!(run("region_from_id", ID).is_err());
    }

    #[test]
    fn function_names_are_unique() {
        let mut names: Vec<&str> = all().iter().map(|f| f.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), all().len());
        assert!(find("no_such_function").is_none());
    }

    #[test]
    fn project_pattern_matches_its_description() {
        let pattern = find("project_id_from_self_link").unwrap().pattern();
        assert_eq!(pattern.as_str(), "projects/(?P<ProjectId>[^/]+)/");
        assert_eq!(pattern.template(), "$ProjectId");
        assert_eq!(pattern.description(), "projects/{project}/");
    }
}

//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the pathmux router.
//!
//! ```yaml
//! name: precedence
//! description: static beats wildcard
//! routes:
//!   - { method: GET, pattern: "/:page", handler: page }
//!   - { method: GET, pattern: /favicon.ico, handler: favicon }
//! cases:
//!   - name: static wins
//!     method: GET
//!     path: /favicon.ico
//!     expect: { handler: favicon }
//! ```

use pathmux::{RouteConfig, RouteTableConfig, Router, RouterSettings};
use serde::Deserialize;

use crate::{error_kind, resolve, Outcome};

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub settings: RouterSettings,
    pub routes: Vec<RouteConfig<String>>,
    /// Registration must fail with this error kind (see [`error_kind`]).
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub cases: Vec<TestCase>,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub method: String,
    pub path: String,
    pub expect: Expect,
}

/// Expected outcome. Set exactly one of `handler`, `redirect`,
/// `method_not_allowed` or `not_found`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Expect {
    #[serde(default)]
    pub handler: Option<String>,
    /// Only checked when present.
    #[serde(default)]
    pub route: Option<String>,
    /// Only checked when present. Order matters.
    #[serde(default)]
    pub params: Option<Vec<ExpectParam>>,
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub method_not_allowed: Option<Vec<String>>,
    #[serde(default)]
    pub not_found: bool,
}

#[derive(Debug, Deserialize)]
pub struct ExpectParam {
    pub name: String,
    pub value: String,
}

impl Expect {
    /// Returns `true` if `outcome` satisfies this expectation.
    pub fn matches(&self, outcome: &Outcome) -> bool {
        match outcome {
            Outcome::Found {
                handler,
                route,
                params,
            } => {
                self.handler.as_deref() == Some(handler.as_str())
                    && self.route.as_ref().map_or(true, |r| r == route)
                    && self.params.as_ref().map_or(true, |expected| {
                        expected.len() == params.len()
                            && expected
                                .iter()
                                .zip(params)
                                .all(|(e, (name, value))| &e.name == name && &e.value == value)
                    })
            }
            Outcome::Redirect(location) => self.redirect.as_deref() == Some(location.as_str()),
            Outcome::MethodNotAllowed(allowed) => {
                self.method_not_allowed.as_ref() == Some(allowed)
            }
            Outcome::NotFound => self.not_found,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Parse a fixture from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Register the fixture's routes.
    pub fn build(&self) -> Result<Router<String>, pathmux::RouteError> {
        RouteTableConfig {
            settings: self.settings,
            routes: self.routes.clone(),
        }
        .build()
    }

    /// Run all test cases and return results
    ///
    /// A registration failure is reported as a single case named `build`.
    pub fn run(&self) -> Vec<CaseResult> {
        let router = match (self.build(), &self.error) {
            (Ok(router), None) => router,
            (Err(err), Some(expected)) => {
                return vec![CaseResult {
                    case_name: "build".into(),
                    passed: error_kind(&err) == expected.as_str(),
                    expected: expected.clone(),
                    actual: format!("{} ({err})", error_kind(&err)),
                }];
            }
            (Ok(_), Some(expected)) => {
                return vec![CaseResult {
                    case_name: "build".into(),
                    passed: false,
                    expected: expected.clone(),
                    actual: "routes registered".into(),
                }];
            }
            (Err(err), None) => {
                return vec![CaseResult {
                    case_name: "build".into(),
                    passed: false,
                    expected: "routes registered".into(),
                    actual: err.to_string(),
                }];
            }
        };

        self.cases
            .iter()
            .map(|case| {
                let actual = resolve(&router, &case.method, &case.path);
                CaseResult {
                    case_name: case.name.clone(),
                    passed: case.expect.matches(&actual),
                    expected: format!("{:?}", case.expect),
                    actual: actual.to_string(),
                }
            })
            .collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        let results = self.run();
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {}, got {}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_run_yaml() {
        let yaml = r#"
name: inline
routes:
  - { method: GET, pattern: "/user/:id", handler: user }
cases:
  - name: hit
    method: GET
    path: /user/9
    expect:
      handler: user
      params: [{ name: id, value: "9" }]
  - name: wrong verb
    method: POST
    path: /user/9
    expect: { method_not_allowed: [GET, HEAD] }
"#;
        let fixture = Fixture::from_yaml(yaml).unwrap();
        assert!(fixture.run().iter().all(|r| r.passed));
    }

    #[test]
    fn failing_case_is_reported() {
        let yaml = r#"
name: wrong
routes:
  - { method: GET, pattern: /a, handler: a }
cases:
  - { name: miss, method: GET, path: /a, expect: { not_found: true } }
"#;
        let results = Fixture::from_yaml(yaml).unwrap().run();
        assert_eq!(results.len(), 1);
        assert!(!results[0].passed);
        assert_eq!(results[0].actual, "a route=/a");
    }

    #[test]
    fn expected_registration_error() {
        let json = r#"{
            "name": "conflict",
            "routes": [
                { "method": "GET", "pattern": "/f/*a", "handler": "x" },
                { "method": "GET", "pattern": "/f/*b", "handler": "y" }
            ],
            "error": "catch_all_conflict"
        }"#;
        let fixture = Fixture::from_json(json).unwrap();
        fixture.run_and_assert();
    }

    #[test]
    fn multi_document_yaml() {
        let yaml = "name: one\nroutes: []\n---\nname: two\nroutes: []\n";
        let fixtures = Fixture::from_yaml_multi(yaml).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[1].name, "two");
    }
}

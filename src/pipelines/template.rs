//! WGSL templates with named insertion points.
//!
//! A template is plain WGSL in which some lines are markers of the form
//!
//! ```text
//! //@point(matcap_color)
//! ```
//!
//! Rendering a template replaces every marker line with the code a patch
//! supplies for that point, or with the point's default code. A patch that
//! names a point the template does not declare is rejected, so a changed base
//! shader fails at setup instead of silently dropping the patch.

use std::collections::HashMap;

use crate::error::SetupError;

const MARKER_PREFIX: &str = "//@point(";

fn marker_name(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix(MARKER_PREFIX)?
        .strip_suffix(')')
        .map(str::trim)
}

#[derive(Clone, Debug)]
struct InsertionPoint {
    name: String,
    default: String,
}

#[derive(Clone, Debug)]
pub struct ShaderTemplate {
    label: String,
    source: String,
    points: Vec<InsertionPoint>,
}

impl ShaderTemplate {
    pub fn parse(label: &str, source: &str) -> Result<Self, SetupError> {
        let mut points: Vec<InsertionPoint> = Vec::new();
        for name in source.lines().filter_map(marker_name) {
            if points.iter().any(|point| point.name == name) {
                return Err(SetupError::DuplicateInsertionPoint {
                    template: label.to_string(),
                    point: name.to_string(),
                });
            }
            points.push(InsertionPoint {
                name: name.to_string(),
                default: String::new(),
            });
        }
        Ok(Self {
            label: label.to_string(),
            source: source.to_string(),
            points,
        })
    }

    /// Sets the code a point expands to when no patch targets it.
    pub fn with_default(mut self, point: &str, code: &str) -> Result<Self, SetupError> {
        let label = self.label.clone();
        let slot = self
            .points
            .iter_mut()
            .find(|p| p.name == point)
            .ok_or_else(|| SetupError::MissingInsertionPoint {
                template: label,
                point: point.to_string(),
            })?;
        slot.default = code.to_string();
        Ok(self)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn points(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|point| point.name.as_str())
    }

    pub fn has_point(&self, name: &str) -> bool {
        self.points.iter().any(|point| point.name == name)
    }

    /// Expands the template with `patches` applied.
    pub fn render(&self, patches: &[&ShaderPatch]) -> Result<String, SetupError> {
        let mut overrides: HashMap<&str, &str> = HashMap::new();
        for patch in patches {
            for (point, code) in &patch.insertions {
                if !self.has_point(point) {
                    return Err(SetupError::MissingInsertionPoint {
                        template: self.label.clone(),
                        point: point.clone(),
                    });
                }
                if overrides.insert(point.as_str(), code.as_str()).is_some() {
                    return Err(SetupError::ConflictingPatch {
                        template: self.label.clone(),
                        point: point.clone(),
                    });
                }
            }
        }

        let mut out = String::with_capacity(self.source.len());
        for line in self.source.lines() {
            match marker_name(line) {
                Some(name) => {
                    let code = overrides.get(name).copied().unwrap_or_else(|| {
                        self.points
                            .iter()
                            .find(|point| point.name == name)
                            .map_or("", |point| point.default.as_str())
                    });
                    let indent = &line[..line.len() - line.trim_start().len()];
                    for code_line in code.lines() {
                        if !code_line.trim().is_empty() {
                            out.push_str(indent);
                            out.push_str(code_line);
                        }
                        out.push('\n');
                    }
                }
                None => {
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        Ok(out)
    }
}

/// Code for one or more insertion points of a template.
#[derive(Clone, Debug, Default)]
pub struct ShaderPatch {
    label: String,
    insertions: Vec<(String, String)>,
}

impl ShaderPatch {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            insertions: Vec::new(),
        }
    }

    pub fn insert(mut self, point: &str, code: &str) -> Self {
        self.insertions.push((point.to_string(), code.to_string()));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

use log::debug;
use regex::Regex;
use std::sync::OnceLock;

use crate::config::*;

/// Position of the column that carries the state when the id is a bare number.
pub const JURISDICTION_COLUMN: usize = 7;

/// Tries to recognize one identifier shape.
///
/// Returns `None` when the row does not have this shape at all, so that the next
/// shape can be tried. A row that has the shape but cannot be classified
/// returns an error and stops the search.
pub type ShapeMatcher = fn(&[String]) -> Option<Result<Classification, ClassifyError>>;

#[derive(Clone)]
pub struct RowShape {
    pub name: &'static str,
    pub matcher: ShapeMatcher,
}

/// Finds the state and the list of a row by trying each known shape of
/// identifier in order. The first shape that applies decides.
#[derive(Clone)]
pub struct Classifier {
    shapes: Vec<RowShape>,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::empty()
            .with_shape("prefixed_code", prefixed_code_shape)
            .with_shape("bare_numeric", bare_numeric_shape)
    }
}

impl Classifier {
    /// A classifier that recognizes nothing.
    pub fn empty() -> Classifier {
        Classifier { shapes: Vec::new() }
    }

    /// Adds a shape, tried after all the shapes already registered.
    pub fn with_shape(mut self, name: &'static str, matcher: ShapeMatcher) -> Classifier {
        self.shapes.push(RowShape { name, matcher });
        self
    }

    #[cfg(test)]
    fn shape_names(&self) -> Vec<&'static str> {
        self.shapes.iter().map(|s| s.name).collect()
    }

    pub fn classify(&self, row: &[String]) -> Result<Classification, ClassifyError> {
        let id = row.first().ok_or(ClassifyError::EmptyRow)?;
        for shape in self.shapes.iter() {
            if let Some(res) = (shape.matcher)(row) {
                debug!("classify: id {:?} has shape {}: {:?}", id, shape.name, res);
                return res;
            }
        }
        Err(ClassifyError::UnrecognizedId { id: id.clone() })
    }
}

fn prefixed_code_re() -> &'static Regex {
    static PREFIXED_CODE_RE: OnceLock<Regex> = OnceLock::new();
    PREFIXED_CODE_RE.get_or_init(|| {
        Regex::new(r"^(?:MY[A-Z]-)?([A-Za-z]{2})-(\d+)").expect("valid prefixed code regex")
    })
}

fn bare_numeric_re() -> &'static Regex {
    static BARE_NUMERIC_RE: OnceLock<Regex> = OnceLock::new();
    BARE_NUMERIC_RE.get_or_init(|| Regex::new(r"^\d{1,20}$").expect("valid bare numeric regex"))
}

fn jurisdiction_field_re() -> &'static Regex {
    static JURISDICTION_FIELD_RE: OnceLock<Regex> = OnceLock::new();
    JURISDICTION_FIELD_RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z]{2})[^A-Za-z].+").expect("valid jurisdiction field regex")
    })
}

/// Ids such as `MYV-CA-12345`, `MYC-NY-100000123` or `CA-12345`.
pub fn prefixed_code_shape(row: &[String]) -> Option<Result<Classification, ClassifyError>> {
    let caps = prefixed_code_re().captures(row.first()?)?;
    let van_id = caps[2].to_string();
    Some(Ok(Classification {
        jurisdiction: caps[1].to_string(),
        category: Category::from_van_id(&van_id),
        van_id,
    }))
}

/// Bare numeric ids. The state is the start of the column at `JURISDICTION_COLUMN`,
/// for example `NY1234XYZ`.
pub fn bare_numeric_shape(row: &[String]) -> Option<Result<Classification, ClassifyError>> {
    let id = row.first()?;
    if !bare_numeric_re().is_match(id) {
        return None;
    }
    let res = match row.get(JURISDICTION_COLUMN) {
        None => Err(ClassifyError::MissingJurisdictionColumn {
            index: JURISDICTION_COLUMN,
        }),
        Some(field) => match jurisdiction_field_re().captures(field) {
            Some(caps) => Ok(Classification {
                jurisdiction: caps[1].to_string(),
                category: Category::from_van_id(id),
                van_id: id.clone(),
            }),
            None => Err(ClassifyError::InvalidJurisdiction {
                value: field.clone(),
            }),
        },
    };
    Some(res)
}

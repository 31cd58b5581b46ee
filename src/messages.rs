//! Failure message templates.
//!
//! [`Messages`] is the locale seam: a table of templates keyed by rule code,
//! threaded explicitly through evaluation instead of living in ambient
//! global state. The defaults are English; a caller supplies another
//! language by overriding templates.

use indexmap::IndexMap;

/// Message templates keyed by rule code.
///
/// Templates may use `{attribute}` for the dotted field path and `{param}`
/// for the rule's parameter (the bound of `min`/`max`).
///
/// # Example
///
/// ```rust
/// use gauntlet::Messages;
///
/// let messages = Messages::default()
///     .with_template("required", "Kolom {attribute} wajib diisi.");
///
/// assert_eq!(
///     messages.render("required", "username", None),
///     "Kolom username wajib diisi."
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Messages {
    templates: IndexMap<String, String>,
}

impl Messages {
    /// Replaces or adds the template for a rule code.
    pub fn with_template(mut self, code: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(code.into(), template.into());
        self
    }

    /// Renders the template for a rule code, filling in the attribute and
    /// optional parameter.
    ///
    /// Unknown codes fall back to a generic invalid-field message.
    pub fn render(&self, code: &str, attribute: &str, param: Option<&str>) -> String {
        let template = self
            .templates
            .get(code)
            .map(String::as_str)
            .unwrap_or("The {attribute} field is invalid.");

        let rendered = template.replace("{attribute}", attribute);
        match param {
            Some(param) => rendered.replace("{param}", param),
            None => rendered,
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        let mut templates = IndexMap::new();
        for (code, template) in [
            ("required", "The {attribute} field is required."),
            ("email", "The {attribute} field must be a valid email address."),
            ("numeric", "The {attribute} field must be a number."),
            ("min", "The {attribute} field must be at least {param}."),
            ("max", "The {attribute} field must not be greater than {param}."),
            ("in", "The selected {attribute} is invalid."),
            ("regex", "The {attribute} field format is invalid."),
        ] {
            templates.insert(code.to_string(), template.to_string());
        }
        Self { templates }
    }
}

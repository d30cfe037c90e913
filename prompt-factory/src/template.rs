//! The template store: every agent template, parsed once and shared.

use std::fmt;
use std::path::Path;

use tera::{Context, Tera};
use tracing::debug;

use crate::catalog;
use crate::error::{TemplateError, TemplateResult};

macro_rules! builtin {
    ($name:literal) => {
        ($name, include_str!(concat!("../templates/", $name)))
    };
}

/// Templates compiled into the crate, keyed by their path under `templates/`.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    builtin!("agents/scenario_helper/system_create.tera"),
    builtin!("agents/scenario_helper/user_create.tera"),
    builtin!("agents/scenario_helper/system_edit.tera"),
    builtin!("agents/scenario_helper/user_edit.tera"),
    builtin!("agents/character_helper/system_create.tera"),
    builtin!("agents/character_helper/user_create.tera"),
    builtin!("agents/character_helper/system_edit.tera"),
    builtin!("agents/character_helper/user_edit.tera"),
    builtin!("agents/moderator/system.tera"),
    builtin!("agents/moderator/user.tera"),
    builtin!("agents/character_in_simulation/system.tera"),
    builtin!("agents/character_in_simulation/user.tera"),
    builtin!("agents/scenario_feedback/system.tera"),
];

/// An immutable set of parsed prompt templates.
///
/// Build one at start-up and pass it by reference to the factories. Every
/// constructor checks that the templates named by the catalog are present,
/// so a broken template set fails before the first request.
///
/// # Examples
///
/// ```
/// use prompt_factory::TemplateStore;
///
/// let store = TemplateStore::builtin().unwrap();
/// assert!(store.contains("agents/scenario_helper/user_create.tera"));
/// ```
pub struct TemplateStore {
    tera: Tera,
}

impl fmt::Debug for TemplateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateStore")
            .field("templates", &self.names())
            .finish()
    }
}

impl TemplateStore {
    /// Loads the templates shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Parse`] if a built-in template is invalid.
    pub fn builtin() -> TemplateResult<Self> {
        Self::from_templates(BUILTIN_TEMPLATES.iter().copied())
    }

    /// Loads templates from `(name, source)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Parse`] for invalid template syntax and
    /// [`TemplateError::MissingTemplates`] if a catalog template is absent.
    pub fn from_templates<'a>(
        templates: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> TemplateResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|err| TemplateError::parse(&err))?;
        Self::checked(tera)
    }

    /// Loads every `*.tera` file below `dir` on top of the built-in set.
    ///
    /// Template names are paths relative to `dir`, e.g.
    /// `agents/moderator/system.tera`; a file with a built-in name replaces
    /// the built-in template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Directory`] if `dir` is not a directory and
    /// [`TemplateError::Parse`] for invalid templates.
    pub fn from_dir(dir: impl AsRef<Path>) -> TemplateResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(TemplateError::Directory {
                path: dir.to_path_buf(),
                reason: "not a directory".to_owned(),
            });
        }

        let glob = format!("{}/**/*.tera", dir.display());
        let mut tera = Tera::new(&glob).map_err(|err| TemplateError::parse(&err))?;
        debug!(dir = %dir.display(), count = tera.get_template_names().count(), "loaded templates");

        let builtin = Self::builtin()?;
        tera.extend(&builtin.tera)
            .map_err(|err| TemplateError::parse(&err))?;
        Self::checked(tera)
    }

    fn checked(tera: Tera) -> TemplateResult<Self> {
        let store = Self { tera };
        let missing: Vec<String> = catalog::template_names()
            .filter(|name| !store.contains(name))
            .map(str::to_owned)
            .collect();

        if missing.is_empty() {
            Ok(store)
        } else {
            Err(TemplateError::MissingTemplates { names: missing })
        }
    }

    /// Returns `true` if a template with this name is loaded.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|loaded| loaded == name)
    }

    /// Returns the loaded template names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }

    /// Renders a template. Undefined placeholders are errors, never blanks.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Render`] if the template is unknown or
    /// references a value the context does not contain.
    pub fn render(&self, name: &str, context: &Context) -> TemplateResult<String> {
        self.tera
            .render(name, context)
            .map_err(|err| TemplateError::render(name, &err))
    }
}

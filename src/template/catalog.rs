use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::{
    foundation::error::{StripError, StripResult},
    template::model::{ColorSpec, Template, TemplateKind},
};

/// Id of the template selected on a fresh or reset strip.
pub const DEFAULT_TEMPLATE_ID: &str = "white";

/// Read-only, ordered list of selectable templates.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateCatalog {
    /// The twenty templates shipped with the booth.
    pub fn builtin() -> Self {
        use TemplateKind as K;

        let templates = vec![
            Template::solid("white", "White", K::Solid, "#ffffff"),
            Template::solid("lined", "Lined", K::Lined, "#ffffff"),
            Template::solid("dots", "Dotted", K::Dotted, "#ffffff"),
            Template::solid("black", "Black", K::Solid, "#000000"),
            Template::solid("blue", "Blue", K::Solid, "#cce5ff"),
            Template::solid("pink", "Pink", K::Solid, "#ffddee"),
            Template::solid("grid", "Grid", K::Grid, "#ffffff"),
            Template::gradient("gradient1", "Sunset", "#ff9a9e", "#fad0c4"),
            Template::gradient("gradient2", "Ocean", "#a1c4fd", "#c2e9fb"),
            Template::gradient("gradient3", "Peach", "#fbc2eb", "#a6c1ee"),
            Template::solid("bordered-blue", "Bordered Blue", K::Bordered, "#e6f2ff"),
            Template::solid("bordered-pink", "Bordered Pink", K::Bordered, "#ffe6f0"),
            Template::solid("bordered-green", "Bordered Green", K::Bordered, "#e6ffe6"),
            Template::solid("stars", "Star Dots", K::PatternStars, "#ffffff"),
            Template::solid("diagonal", "Diagonal Lines", K::Diagonal, "#ffffff"),
            Template::solid("light-gray", "Light Gray", K::Solid, "#f0f0f0"),
            Template::solid("canvas", "Canvas Texture", K::CanvasTexture, "#fdf6e3"),
            Template::solid("paper", "Paper Texture", K::Paper, "#fffaf0"),
            Template::solid("retro", "Retro Frame", K::Retro, "#f7e6a3"),
            Template::solid("dots-border", "Dot Border", K::DotBorder, "#ffffff"),
        ];
        Self { templates }
    }

    /// Build a catalog from caller-provided templates.
    pub fn from_templates(templates: Vec<Template>) -> StripResult<Self> {
        let catalog = Self { templates };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse a JSON array of templates.
    pub fn from_json_str(s: &str) -> StripResult<Self> {
        let templates: Vec<Template> = serde_json::from_str(s)
            .map_err(|e| StripError::serde(format!("parse templates: {e}")))?;
        Self::from_templates(templates)
    }

    pub fn from_json_file(path: &Path) -> StripResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open template catalog '{}'", path.display()))?;
        let templates: Vec<Template> = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| StripError::serde(format!("parse templates: {e}")))?;
        Self::from_templates(templates)
    }

    fn validate(&self) -> StripResult<()> {
        if self.templates.is_empty() {
            return Err(StripError::validation("template catalog is empty"));
        }
        let mut seen = std::collections::HashSet::new();
        for t in &self.templates {
            if t.id.trim().is_empty() {
                return Err(StripError::validation("template id must be non-empty"));
            }
            if !seen.insert(t.id.as_str()) {
                return Err(StripError::validation(format!(
                    "duplicate template id \"{}\"",
                    t.id
                )));
            }
            match (t.kind, &t.color) {
                (TemplateKind::Gradient, ColorSpec::Gradient(_)) => {}
                (TemplateKind::Gradient, _) => {
                    return Err(StripError::validation(format!(
                        "template \"{}\": gradient needs a [top, bottom] color pair",
                        t.id
                    )));
                }
                (TemplateKind::Image, ColorSpec::Image(_)) => {}
                (TemplateKind::Image, _) => {
                    return Err(StripError::validation(format!(
                        "template \"{}\": image needs image references",
                        t.id
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// `white` when present, else the first entry.
    pub fn default_template(&self) -> &Template {
        self.get(DEFAULT_TEMPLATE_ID)
            .or_else(|| self.templates.first())
            .unwrap_or_else(|| builtin_white())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn builtin_white() -> &'static Template {
    static WHITE: std::sync::OnceLock<Template> = std::sync::OnceLock::new();
    WHITE.get_or_init(|| Template::solid("white", "White", TemplateKind::Solid, "#ffffff"))
}

/// The default template as an owned value.
pub fn default_template() -> Template {
    builtin_white().clone()
}

#[cfg(test)]
#[path = "../../tests/unit/template/catalog.rs"]
mod tests;

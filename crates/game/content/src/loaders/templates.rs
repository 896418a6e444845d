//! Element starter template loader.

use std::collections::HashMap;
use std::path::Path;

use arena_core::{CreatureTemplate, Element, MoveCatalog};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

const EMBEDDED_TEMPLATES: &str = include_str!("../../data/templates.ron");

/// Template list structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateFile {
    pub templates: Vec<CreatureTemplate>,
}

/// Starter templates keyed by element.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<Element, CreatureTemplate>,
}

impl TemplateRegistry {
    pub fn from_templates(templates: Vec<CreatureTemplate>) -> LoadResult<Self> {
        let mut registry = Self::default();
        for template in templates {
            let element = template.element;
            if registry.templates.insert(element, template).is_some() {
                anyhow::bail!("Duplicate template for element {}", element);
            }
        }
        Ok(registry)
    }

    pub fn get(&self, element: Element) -> Option<&CreatureTemplate> {
        self.templates.get(&element)
    }

    /// Checks that every template move exists in `catalog`.
    pub fn validate(&self, catalog: &dyn MoveCatalog) -> LoadResult<()> {
        for template in self.templates.values() {
            if let Some(unknown) = template
                .moves
                .iter()
                .find(|id| catalog.find_move(id).is_none())
            {
                anyhow::bail!(
                    "Template for {} references unknown move {}",
                    template.element,
                    unknown
                );
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Loader for starter templates from RON files.
pub struct TemplateLoader;

impl TemplateLoader {
    pub fn load(path: &Path) -> LoadResult<TemplateRegistry> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load templates from {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<TemplateRegistry> {
        let file: TemplateFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse template RON: {}", e))?;
        TemplateRegistry::from_templates(file.templates)
    }

    pub fn embedded() -> LoadResult<TemplateRegistry> {
        Self::parse(EMBEDDED_TEMPLATES)
    }
}

#[cfg(test)]
mod tests {
    use arena_core::MoveId;

    use super::*;
    use crate::loaders::MoveLoader;

    #[test]
    fn embedded_templates_cover_all_elements() {
        let registry = TemplateLoader::embedded().expect("embedded templates parse");
        assert_eq!(registry.len(), 3);

        let earth = registry.get(Element::Earth).expect("earth template");
        assert_eq!(earth.stats.max_hp, 150);
        assert_eq!(earth.stats.defense, 80);
        assert_eq!(earth.moves[1], MoveId::from("counter_stance"));

        let fire = registry.get(Element::Fire).expect("fire template");
        assert_eq!(fire.stats.attack, 80);
    }

    #[test]
    fn embedded_templates_reference_known_moves() {
        let templates = TemplateLoader::embedded().expect("templates parse");
        let moves = MoveLoader::embedded().expect("moves parse");
        templates.validate(&moves).expect("all template moves exist");
    }

    #[test]
    fn unknown_template_move_fails_validation() {
        let templates = TemplateLoader::parse(
            r#"(templates: [(
                element: water,
                stats: (attack: 1, defense: 1, speed: 1, intelligence: 1, max_hp: 10, max_energy: 10),
                moves: ["tidal_wave"],
            )])"#,
        )
        .expect("templates parse");
        let moves = MoveLoader::embedded().expect("moves parse");
        let err = templates.validate(&moves).unwrap_err();
        assert!(err.to_string().contains("tidal_wave"));
    }
}

//! Layer panel: categories, the part index and failure scenarios.

use std::fmt;

use baudetail_core::{
    color::Color,
    diagram::{Category, Diagram, Severity},
    identifier::Id,
};

use crate::{markup::MarkupIndex, view::ViewState};

/// A control in the layer panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerAction {
    /// Filter by a category.
    SelectCategory(Id),
    /// Select a part from the index.
    SelectPart(Id),
    /// Activate a failure scenario, or clear it if already active.
    ToggleScenario(Id),
    /// The "show none" entry of the scenario list.
    ClearScenario,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRow {
    id: Id,
    name: String,
    color: Color,
    part_count: usize,
    active: bool,
}

impl CategoryRow {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Number of parts shown at full opacity when this category is active.
    pub fn part_count(&self) -> usize {
        self.part_count
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn action(&self) -> LayerAction {
        LayerAction::SelectCategory(self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartRow {
    id: Id,
    name: String,
    short_name: String,
    din: String,
    bound: bool,
    selected: bool,
}

impl PartRow {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn din(&self) -> &str {
        &self.din
    }

    /// Returns true if the part has a node in the markup.
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn action(&self) -> LayerAction {
        LayerAction::SelectPart(self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioRow {
    id: Id,
    name: String,
    severity: Severity,
    affected_count: usize,
    active: bool,
}

impl ScenarioRow {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Number of distinct bound parts the scenario highlights.
    pub fn affected_count(&self) -> usize {
        self.affected_count
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn action(&self) -> LayerAction {
        LayerAction::ToggleScenario(self.id)
    }
}

/// View model of the layer panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPanel {
    visible: bool,
    categories: Vec<CategoryRow>,
    parts: Vec<PartRow>,
    scenarios: Vec<ScenarioRow>,
    none_active: bool,
}

impl LayerPanel {
    pub fn new(diagram: &Diagram, index: &MarkupIndex, state: &ViewState) -> Self {
        let category_row = |category: &Category| CategoryRow {
            id: category.id(),
            name: category.name().to_string(),
            color: category.color(),
            part_count: if category.is_all() {
                diagram.part_count()
            } else {
                diagram
                    .parts()
                    .filter(|part| part.belongs_to(category.id()))
                    .count()
            },
            active: state.active_category() == category.id(),
        };
        // Always offer "all", even when the payload omits it.
        let implicit_all = (!diagram.categories().iter().any(Category::is_all))
            .then(|| category_row(&Category::all()));
        let categories = implicit_all
            .into_iter()
            .chain(diagram.categories().iter().map(category_row))
            .collect();

        let parts = diagram
            .parts()
            .map(|part| PartRow {
                id: part.id(),
                name: part.name().to_string(),
                short_name: part.short_name().to_string(),
                din: part.din().to_string(),
                bound: index.contains(part.id()),
                selected: state.selected() == Some(part.id()),
            })
            .collect();

        let scenarios = diagram
            .scenarios()
            .iter()
            .map(|scenario| {
                let mut seen = Vec::new();
                for id in scenario.affected() {
                    if diagram.contains_part(*id) && index.contains(*id) && !seen.contains(id) {
                        seen.push(*id);
                    }
                }
                ScenarioRow {
                    id: scenario.id(),
                    name: scenario.name().to_string(),
                    severity: scenario.severity(),
                    affected_count: seen.len(),
                    active: state.active_scenario() == Some(scenario.id()),
                }
            })
            .collect();

        Self {
            visible: state.layer_panel_visible(),
            categories,
            parts,
            scenarios,
            none_active: state.active_scenario().is_none(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn categories(&self) -> &[CategoryRow] {
        &self.categories
    }

    pub fn parts(&self) -> &[PartRow] {
        &self.parts
    }

    pub fn scenarios(&self) -> &[ScenarioRow] {
        &self.scenarios
    }

    /// Returns true if the "show none" scenario entry is the active one.
    pub fn is_none_active(&self) -> bool {
        self.none_active
    }
}

fn mark(active: bool) -> &'static str {
    if active { "[x]" } else { "[ ]" }
}

impl fmt::Display for LayerPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.visible {
            return writeln!(f, "Layers (hidden)");
        }

        writeln!(f, "Layers")?;
        for row in &self.categories {
            writeln!(
                f,
                "  {} {} ({}) {}",
                mark(row.active),
                row.name,
                row.part_count,
                row.color.to_hex()
            )?;
        }

        writeln!(f, "Parts")?;
        for row in &self.parts {
            let cursor = if row.selected { ">" } else { " " };
            write!(f, "  {cursor} {}", row.name)?;
            if !row.short_name.is_empty() {
                write!(f, " [{}]", row.short_name)?;
            }
            if !row.din.is_empty() {
                write!(f, " {}", row.din)?;
            }
            if !row.bound {
                write!(f, " (not in drawing)")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Failure scenarios")?;
        writeln!(f, "  {} none", mark(self.none_active))?;
        for row in &self.scenarios {
            writeln!(
                f,
                "  {} {} <{}> ({})",
                mark(row.active),
                row.name,
                row.severity,
                row.affected_count
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use baudetail_core::{
        diagram::{FailureScenario, Part},
        geometry::Size,
    };

    use super::*;

    fn fixture() -> (Diagram, MarkupIndex) {
        let markup = r#"<svg><g id="wallStud"><rect/></g><g id="board"><rect/></g></svg>"#;
        let diagram = Diagram::new(
            [
                Part::new(Id::new("wallStud"), "Ständer CW 50")
                    .with_short_name("CW50")
                    .with_din("DIN 18182")
                    .with_categories([Id::new("load-bearing")]),
                Part::new(Id::new("board"), "Gipskartonplatte")
                    .with_categories([Id::new("finishing"), Id::new("fire-protection")]),
                Part::new(Id::new("screw"), "Schraube"),
            ],
            Category::defaults(),
            vec![
                FailureScenario::new(Id::new("cracking"), "Rissbildung", Severity::Medium)
                    .with_affected([
                        Id::new("board"),
                        Id::new("board"),
                        Id::new("screw"),
                        Id::new("ghost"),
                    ]),
            ],
            markup,
            Size::new(500.0, 400.0),
        );
        let index = MarkupIndex::parse(markup).unwrap();
        (diagram, index)
    }

    #[test]
    fn test_rows_and_counts() {
        let (diagram, index) = fixture();
        let panel = LayerPanel::new(&diagram, &index, &ViewState::default());

        let counts: Vec<usize> = panel.categories().iter().map(CategoryRow::part_count).collect();
        assert_eq!(counts, [3, 1, 1, 0, 1, 0]);
        assert!(panel.categories()[0].is_active());

        assert_eq!(panel.parts().len(), 3);
        assert!(!panel.parts()[2].is_bound());

        assert_eq!(panel.scenarios()[0].affected_count(), 1);
        assert!(panel.is_none_active());
    }

    #[test]
    fn test_actions_map_to_rows() {
        let (diagram, index) = fixture();
        let panel = LayerPanel::new(&diagram, &index, &ViewState::default());
        assert_eq!(
            panel.parts()[0].action(),
            LayerAction::SelectPart(Id::new("wallStud"))
        );
        assert_eq!(
            panel.scenarios()[0].action(),
            LayerAction::ToggleScenario(Id::new("cracking"))
        );
    }

    #[test]
    fn test_display_marks_active_entries() {
        let (diagram, index) = fixture();
        let mut state = ViewState::default();
        state.set_category(Id::new("finishing"));
        state.toggle_scenario(Id::new("cracking"));
        state.select(Id::new("wallStud"));

        let text = LayerPanel::new(&diagram, &index, &state).to_string();
        assert!(text.contains("[x] Bekleidung (1)"));
        assert!(text.contains("[ ] none"));
        assert!(text.contains("[x] Rissbildung <medium> (1)"));
        assert!(text.contains("> Ständer CW 50 [CW50] DIN 18182"));
        assert!(text.contains("Schraube (not in drawing)"));
    }

    #[test]
    fn test_all_row_is_added_when_missing() {
        let (diagram, index) = fixture();
        let finishing_only = Diagram::new(
            diagram.parts().cloned(),
            vec![Category::new(
                Id::new("finishing"),
                "Bekleidung",
                Color::neutral(),
                "",
            )],
            Vec::new(),
            diagram.markup(),
            diagram.size(),
        );

        let mut state = ViewState::default();
        state.set_category(Id::new("finishing"));
        let panel = LayerPanel::new(&finishing_only, &index, &state);

        let ids: Vec<Id> = panel.categories().iter().map(CategoryRow::id).collect();
        assert_eq!(ids, [Id::new("all"), Id::new("finishing")]);
        assert_eq!(panel.categories()[0].part_count(), 3);
        assert!(!panel.categories()[0].is_active());
        assert_eq!(
            panel.categories()[0].action(),
            LayerAction::SelectCategory(Id::new("all"))
        );

        let defaults = LayerPanel::new(&diagram, &index, &state);
        assert_eq!(defaults.categories().len(), 6);
    }

    #[test]
    fn test_hidden_panel() {
        let (diagram, index) = fixture();
        let mut state = ViewState::default();
        state.toggle_layer_panel();
        let panel = LayerPanel::new(&diagram, &index, &state);
        assert!(!panel.is_visible());
        assert_eq!(panel.to_string(), "Layers (hidden)\n");
    }
}

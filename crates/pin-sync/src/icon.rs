//! Marker icons derived from a pin's category.

use crate::model::Category;

/// Glyph per category; the last entry is the fallback
const CATEGORY_ICONS: [(Category, &str); 5] = [
    (Category::Quest, "fas fa-map-pin"),
    (Category::Hostile, "fas fa-skull"),
    (Category::Clue, "fas fa-question-circle"),
    (Category::Safe, "fas fa-star"),
    (Category::Default, "fas fa-compass"),
];

const ICON_SIZE: u32 = 28;

impl Category {
    /// Font Awesome classes for this category
    pub fn glyph(&self) -> &'static str {
        CATEGORY_ICONS
            .iter()
            .find(|(category, _)| category == self)
            .map(|(_, glyph)| *glyph)
            .unwrap_or(CATEGORY_ICONS[4].1)
    }
}

/// Glyph for a raw category string, falling back to the default glyph
pub fn icon_for(category: Option<&str>) -> &'static str {
    Category::from_opt(category).glyph()
}

/// Everything the map needs to draw a marker's icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerIcon {
    /// CSS classes of the icon container
    pub class_name: String,
    /// Font Awesome classes of the inner glyph
    pub glyph: &'static str,
    pub size: [u32; 2],
    pub anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
}

impl MarkerIcon {
    pub fn for_category(category: Category) -> Self {
        let half = (ICON_SIZE / 2) as i32;
        Self {
            class_name: format!("custom-div-icon {}", category.as_str()),
            glyph: category.glyph(),
            size: [ICON_SIZE, ICON_SIZE],
            anchor: [half, half],
            popup_anchor: [0, -half],
        }
    }

    /// Inner markup of the div icon
    pub fn html(&self) -> String {
        format!(r#"<i class="{}"></i>"#, self.glyph)
    }
}

// src/services/landing.rs
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub suggestions: [&'static str; 3],
}

/// Catch-all used by "Start Shopping".
pub const EXPLORE: &str = "explore";

const DEFAULT_SUGGESTIONS: [&str; 3] = ["White sneakers", "Casual t-shirts", "Minimal style items"];

const CATEGORIES: [Category; 3] = [
    Category {
        id: "sneakers",
        name: "Sneakers",
        description: "Running, casual & lifestyle",
        suggestions: ["White sneakers", "Minimal running shoes", "Black casual sneakers"],
    },
    Category {
        id: "tshirts",
        name: "T-Shirts",
        description: "Casual, minimal & street",
        suggestions: ["Casual cotton t-shirts", "Minimal white tees", "Black oversized shirts"],
    },
    Category {
        id: "accessories",
        name: "Accessories",
        description: "Belts, bags & eyewear",
        suggestions: ["Classic leather belt", "Minimal sunglasses", "Everyday backpack"],
    },
];

pub fn categories() -> &'static [Category] {
    &CATEGORIES
}

fn find(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// Welcome-screen suggestions. Unknown ids and `explore` get the general set.
pub fn suggestions_for(category: Option<&str>) -> [&'static str; 3] {
    category
        .and_then(find)
        .map(|c| c.suggestions)
        .unwrap_or(DEFAULT_SUGGESTIONS)
}

pub fn is_known(id: &str) -> bool {
    id == EXPLORE || find(id).is_some()
}

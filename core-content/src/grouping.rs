//! Document grouping
//!
//! Buckets documents by category for the resources page. Display metadata
//! comes from a closed table; unknown categories get the generic
//! "Other Resources" presentation but keep their own bucket.

use crate::models::Document;
use serde::Serialize;

/// Display metadata for a document category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub title: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

const KNOWN_CATEGORIES: &[(&str, CategoryInfo)] = &[
    (
        "posters",
        CategoryInfo {
            title: "Sign Language Posters",
            description: "Educational posters for learning Rwandan Sign Language",
            color: "blue",
            icon: "📚",
        },
    ),
    (
        "english",
        CategoryInfo {
            title: "English Brochures",
            description: "Educational brochures and guides in English",
            color: "green",
            icon: "📖",
        },
    ),
    (
        "kinyarwanda",
        CategoryInfo {
            title: "Kinyarwanda Brochures",
            description: "Educational materials and guides in Kinyarwanda",
            color: "purple",
            icon: "📋",
        },
    ),
    (
        "training",
        CategoryInfo {
            title: "Training Materials",
            description: "Training guides and educational resources",
            color: "orange",
            icon: "🎓",
        },
    ),
    (
        "health",
        CategoryInfo {
            title: "Health Resources",
            description: "Health education and awareness materials",
            color: "red",
            icon: "🏥",
        },
    ),
];

pub const OTHER_RESOURCES: CategoryInfo = CategoryInfo {
    title: "Other Resources",
    description: "Miscellaneous documents and resources",
    color: "gray",
    icon: "📄",
};

/// Looks up display metadata; never fails.
pub fn category_info(category: &str) -> &'static CategoryInfo {
    KNOWN_CATEGORIES
        .iter()
        .find(|(key, _)| *key == category)
        .map(|(_, info)| info)
        .unwrap_or(&OTHER_RESOURCES)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentGroup {
    /// 1-based position
    pub id: u32,
    pub title: String,
    pub description: String,
    pub color: String,
    pub icon: String,
    /// Source category, even when the presentation is the generic one
    pub category: String,
    pub documents: Vec<Document>,
}

/// Groups documents by category, in order of first appearance.
pub fn group_documents(documents: &[Document]) -> Vec<DocumentGroup> {
    let mut groups: Vec<DocumentGroup> = Vec::new();

    for document in documents {
        let category = &document.record.category;
        match groups.iter_mut().find(|g| &g.category == category) {
            Some(group) => group.documents.push(document.clone()),
            None => {
                let info = category_info(category);
                groups.push(DocumentGroup {
                    id: groups.len() as u32 + 1,
                    title: info.title.to_string(),
                    description: info.description.to_string(),
                    color: info.color.to_string(),
                    icon: info.icon.to_string(),
                    category: category.clone(),
                    documents: vec![document.clone()],
                });
            }
        }
    }

    groups
}

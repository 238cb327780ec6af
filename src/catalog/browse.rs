//! Catalog browsing: display names, search and grouping.

use super::{CatalogEntry, Category, FunctionCatalog, FunctionEntry};

/// Entries of one category, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub category: &'a Category,
    pub entries: Vec<&'a CatalogEntry>,
}

/// Categories sharing a meta category. `None` groups categories without one.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaCategoryGroup<'a> {
    pub meta_category: Option<&'a str>,
    pub categories: Vec<CategoryGroup<'a>>,
}

fn argument_list<'a>(args: impl Iterator<Item = &'a super::Argument>) -> Vec<String> {
    args.map(|arg| {
        if arg.vararg {
            format!("{}...", arg.name)
        } else {
            arg.name.clone()
        }
    })
    .collect()
}

impl FunctionEntry {
    /// Short signature such as `substring(inputString, start, ...)`.
    pub fn display_name(&self, max_args: usize) -> String {
        let shown = argument_list(self.arguments.iter().take(max_args));
        let ellipsis = if self.arguments.len() > max_args {
            ", ..."
        } else {
            ""
        };
        format!("{}({}{})", self.name, shown.join(", "), ellipsis)
    }

    pub fn display_name_with_full_args(&self) -> String {
        format!(
            "{}({})",
            self.name,
            argument_list(self.arguments.iter()).join(", ")
        )
    }
}

impl CatalogEntry {
    /// Name shown in the catalog browser. Functions show two arguments.
    pub fn display_name(&self) -> String {
        match self {
            CatalogEntry::Function(f) => f.display_name(2),
            CatalogEntry::Constant(c) => c.name.clone(),
        }
    }

    /// Case-insensitive substring match on name, keywords and category.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name().to_lowercase().contains(&term)
            || self
                .keywords()
                .iter()
                .any(|keyword| keyword.to_lowercase().contains(&term))
            || self.category().to_lowercase().contains(&term)
    }
}

impl FunctionCatalog {
    /// Group entries by category, keeping category order. Entries whose
    /// category is not declared are left out.
    pub fn group_by_category(&self) -> Vec<CategoryGroup<'_>> {
        self.categories
            .iter()
            .map(|category| CategoryGroup {
                category,
                entries: self
                    .functions
                    .iter()
                    .filter(|entry| entry.category() == category.key())
                    .collect(),
            })
            .collect()
    }

    /// Like [`group_by_category`](Self::group_by_category), keeping only
    /// matching entries and dropping categories left empty.
    pub fn search(&self, term: &str) -> Vec<CategoryGroup<'_>> {
        self.group_by_category()
            .into_iter()
            .map(|mut group| {
                group.entries.retain(|entry| entry.matches_search(term));
                group
            })
            .filter(|group| !group.entries.is_empty())
            .collect()
    }

    /// Nest category groups under their meta category, in order of first
    /// appearance.
    pub fn group_by_meta_category<'a>(
        groups: Vec<CategoryGroup<'a>>,
    ) -> Vec<MetaCategoryGroup<'a>> {
        let mut result: Vec<MetaCategoryGroup<'a>> = Vec::new();
        for group in groups {
            let meta = group.category.meta_category.as_deref();
            match result.iter_mut().find(|m| m.meta_category == meta) {
                Some(existing) => existing.categories.push(group),
                None => result.push(MetaCategoryGroup {
                    meta_category: meta,
                    categories: vec![group],
                }),
            }
        }
        result
    }
}

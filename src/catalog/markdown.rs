//! Markdown documentation for catalog entries, shown in completion details
//! and hovers.

use super::{CatalogEntry, Category};

/// Render the documentation of a function or constant.
pub fn entry_markdown(entry: &CatalogEntry) -> String {
    match entry {
        CatalogEntry::Constant(constant) => format!(
            "Type: ***{}***\n\n###### Description\n\n{}",
            constant.return_type, constant.description
        ),
        CatalogEntry::Function(function) => {
            let arguments = function
                .arguments
                .iter()
                .map(|arg| format!("- **{}**: {}", arg.name, arg.description))
                .collect::<Vec<_>>()
                .join("\n");
            let return_description = match function.return_description.as_deref() {
                Some(text) if !text.is_empty() => format!("  \n{}", text),
                _ => String::new(),
            };

            let mut markdown = format!(
                "\n\n###### Arguments \n{}\n\n###### Return value \n***{}***{}\n\n###### Description \n\n{}",
                arguments, function.return_type, return_description, function.description
            );
            if let Some(examples) = function.examples.as_deref().filter(|e| !e.is_empty()) {
                markdown.push_str("\n\n###### Examples\n\n");
                markdown.push_str(examples);
            }
            markdown
        }
    }
}

pub fn category_markdown(category: &Category) -> String {
    category.description.clone().unwrap_or_default()
}

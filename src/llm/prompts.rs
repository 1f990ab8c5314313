pub const CHANGELOG_SYSTEM: &str =
    "You are a helpful assistant that generates professional and categorized changelogs.";

pub const CHANGELOG_INSTRUCTIONS: &str = r#"Focus only on actual code changes. Ignore comments, formatting adjustments, and unrelated modifications.

Format the changelog with these categories:
- Added: For new features or additions.
- Fixed: For bug fixes or issue resolutions.
- Updated: For changes or improvements.
- Removed: For features or code that were removed.

Use Markdown formatting with bullet points."#;

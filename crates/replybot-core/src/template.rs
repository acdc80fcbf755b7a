/// The sender-name placeholder recognized in reply templates.
pub const USER_PLACEHOLDER: &str = "{user}";

/// Render a reply template against a sender display name.
///
/// Only the FIRST `{user}` occurrence is substituted; any later occurrences
/// stay literal. A template without the placeholder is returned verbatim.
pub fn render(template: &str, display_name: &str) -> String {
    template.replacen(USER_PLACEHOLDER, display_name, 1)
}

/*!
 * Prompt templates for documentation translation.
 *
 * The rendered prompt is sent as a single user message, so the rules,
 * the file identity hint and the document text all live in one string.
 */

/// Prompt template with `{project}`, `{target_language}`, `{file_name}` and
/// `{text}` placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The default prompt for markdown and YAML documentation.
    pub const DOCUMENTATION_TRANSLATOR: &'static str = r#"You're translating a piece of documentation of {project}. Translate the translation input text to {target_language}.

Rules:
- You SHOULD translate texts, code comments, but not code symbols, variables or constants names.
- You MUST NOT translate script-header file names or language names.
- You MUST keep the same file structure, maintaining links targets, headers, codes and page title.
- You SHOULD NOT translate HTML tag names inside Markdown.
- You SHOULD NOT translate markdown warning boxes tags, such as [!TIP] or [!WARNING].
- You MUST keep absolute link targets (eg. links which points to "/spec" or starts with "https://...").
- You SHOULD ONLY translate YAML values, NOT the keys.
- You MUST NOT translate YAML keys.
- You MUST NOT alter the YAML file structure.
- You MUST reply ONLY with the translated text, no greetings, advices or comments.
- The translated text must follow the original input structure.

File name: {file_name}

<translation-input>
{text}
</translation-input>"#;

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default documentation translator template.
    pub fn documentation_translator() -> Self {
        Self::new(Self::DOCUMENTATION_TRANSLATOR)
    }

    /// Render the template for one translation target.
    ///
    /// The document text is substituted last so placeholders that happen to
    /// appear inside it are left alone.
    pub fn render(&self, project: &str, target_language: &str, file_name: &str, text: &str) -> String {
        self.template
            .replace("{project}", project)
            .replace("{target_language}", target_language)
            .replace("{file_name}", file_name)
            .replace("{text}", text)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::documentation_translator()
    }
}

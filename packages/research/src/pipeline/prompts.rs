//! LLM prompts for the research pipeline.
//!
//! User-prompt templates use `{placeholder}` markers filled by the
//! `format_*` functions.

use crate::traits::ai::Message;

/// System prompt for pulling tool names out of comparison articles.
pub const TOOL_EXTRACTION_SYSTEM_PROMPT: &str = r#"You are a technology researcher. Extract specific tool, library, platform, or service names from articles.
Focus on actual products that developers can use, not general concepts or features."#;

/// User prompt for tool extraction.
pub const TOOL_EXTRACTION_PROMPT: &str = r#"Query: {query}
Article content:
{content}

Extract a list of specific tool/service names mentioned in this content that are relevant to "{query}".

Rules:
- Only include actual product names, not generic terms
- Focus on tools developers can directly use or implement
- Include both open source and commercial options
- Limit to the 5 most relevant tools
- Return just the tool names, one per line, no descriptions or numbering"#;

/// System prompt for structured analysis of one company.
pub const TOOL_ANALYSIS_SYSTEM_PROMPT: &str = r#"You are analyzing developer tools and programming technologies.
Focus on extracting information relevant to programmers and software developers.
Pay special attention to programming languages, frameworks, APIs, SDKs, and development workflows.
Only state what the content supports; use null for anything it does not say."#;

/// User prompt for company analysis.
pub const TOOL_ANALYSIS_PROMPT: &str = r#"Company/Tool: {company}
Website content:
{content}

Analyze this content from a developer's perspective and provide:
- pricing_model: One of "Free", "Freemium", "Paid", "Enterprise", or "Unknown"
- is_open_source: true if open source, false if proprietary, null if unclear
- tech_stack: Programming languages, frameworks, databases, APIs, or technologies supported/used
- description: Brief 1-sentence description focusing on what this tool does for developers
- api_available: true if REST API, GraphQL, SDK, or programmatic access is mentioned
- language_support: Programming languages explicitly supported (e.g., Python, JavaScript, Go)
- integration_capabilities: Tools/platforms it integrates with (e.g., GitHub, VS Code, Docker, AWS)"#;

/// System prompt for the final comparison report.
pub const SYNTHESIS_SYSTEM_PROMPT: &str = r#"You are a senior software engineer providing quick, concise tech recommendations.
Keep responses brief and actionable - maximum 3-4 sentences total."#;

/// User prompt for synthesis.
pub const SYNTHESIS_PROMPT: &str = r#"Developer Query: {query}
Tools/Technologies Analyzed: {companies}

Provide a brief recommendation (3-4 sentences max) covering:
- Which tool is best and why
- Key cost/pricing consideration
- Main technical advantage

Be concise and direct - no long explanations needed."#;

/// Format the tool-extraction user prompt.
pub fn format_tool_extraction_prompt(query: &str, content: &str) -> String {
    TOOL_EXTRACTION_PROMPT
        .replace("{query}", query)
        .replace("{content}", content)
}

/// Format the company-analysis user prompt.
pub fn format_tool_analysis_prompt(company: &str, content: &str) -> String {
    TOOL_ANALYSIS_PROMPT
        .replace("{company}", company)
        .replace("{content}", content)
}

/// Format the synthesis user prompt.
pub fn format_synthesis_prompt(query: &str, companies: &str) -> String {
    SYNTHESIS_PROMPT
        .replace("{query}", query)
        .replace("{companies}", companies)
}

/// Messages for tool extraction.
pub fn tool_extraction_messages(query: &str, content: &str) -> Vec<Message> {
    vec![
        Message::system(TOOL_EXTRACTION_SYSTEM_PROMPT),
        Message::user(format_tool_extraction_prompt(query, content)),
    ]
}

/// Messages for company analysis.
pub fn tool_analysis_messages(company: &str, content: &str) -> Vec<Message> {
    vec![
        Message::system(TOOL_ANALYSIS_SYSTEM_PROMPT),
        Message::user(format_tool_analysis_prompt(company, content)),
    ]
}

/// Messages for synthesis.
pub fn synthesis_messages(query: &str, companies: &str) -> Vec<Message> {
    vec![
        Message::system(SYNTHESIS_SYSTEM_PROMPT),
        Message::user(format_synthesis_prompt(query, companies)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ai::Role;

    #[test]
    fn test_extraction_prompt_fills_placeholders() {
        let prompt = format_tool_extraction_prompt("vector databases", "Compare Pinecone.");
        assert!(prompt.contains("Query: vector databases"));
        assert!(prompt.contains("Compare Pinecone."));
        assert!(!prompt.contains("{query}"));
        assert!(!prompt.contains("{content}"));
    }

    #[test]
    fn test_analysis_messages_shape() {
        let messages = tool_analysis_messages("Qdrant", "# Qdrant docs");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.starts_with("Company/Tool: Qdrant"));
    }

    #[test]
    fn test_synthesis_prompt_embeds_company_data() {
        let prompt = format_synthesis_prompt("ci tools", r#"{"name":"Jenkins"}"#);
        assert!(prompt.contains("Developer Query: ci tools"));
        assert!(prompt.contains(r#"{"name":"Jenkins"}"#));
    }
}

//! Prompt construction for model-backed generation

use super::models::GenerationRequest;

/// Build the structured text-to-SQL prompt.
///
/// The model is asked for a bare JSON object with `sql` and `explanation` keys;
/// the dialect is upper-cased and substituted wherever syntax is mentioned.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let dialect = request.dialect.as_str().to_uppercase();

    let mut prompt = format!(
        r#"You are an expert SQL developer. Generate a SQL query based on the following natural language request.

Natural Language Query: "{query}"
SQL Dialect: {dialect}

"#,
        query = request.query,
        dialect = dialect,
    );

    if let Some(schema) = &request.schema {
        prompt.push_str(&format!("Database Schema:\n{}\n\n", schema));
    }

    let naming_rule = if request.schema.is_some() {
        "- Use the exact table and column names from the schema"
    } else {
        "- Use reasonable table and column names based on the query context"
    };

    prompt.push_str(&format!(
        r#"Please provide your response in the following JSON format:
{{
  "sql": "your generated SQL query here",
  "explanation": "a clear explanation of what the query does and how it works"
}}

Requirements:
- Generate syntactically correct {dialect} SQL
- Use proper {dialect} syntax and functions
{naming_rule}
- Provide a clear, concise explanation of the query
- Ensure the query is optimized and follows best practices
- Return ONLY the JSON response, no additional text

If the query is vague, make reasonable assumptions about table and column names based on common database patterns."#,
        dialect = dialect,
        naming_rule = naming_rule,
    ));

    prompt
}

//! SQL generator unit tests

use async_trait::async_trait;
use std::sync::Arc;

use super::heuristic::*;
use super::*;
use crate::services::llm::{LLMClient, LLMError, LLMProviderKind};

fn request(query: &str) -> GenerationRequest {
    GenerationRequest::new(query, "postgresql")
}

fn heuristic_sql(query: &str) -> String {
    HeuristicGenerator::new().generate(&request(query)).sql
}

/// Scripted model client
enum MockClient {
    Reply(&'static str),
    Fail,
    Empty,
}

#[async_trait]
impl LLMClient for MockClient {
    fn provider(&self) -> LLMProviderKind {
        LLMProviderKind::Gemini
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, LLMError> {
        match self {
            Self::Reply(text) => Ok(text.to_string()),
            Self::Fail => Err(LLMError::ApiError("quota exceeded".to_string())),
            Self::Empty => Err(LLMError::EmptyResponse),
        }
    }
}

fn service_with(client: MockClient) -> SqlGeneratorService {
    SqlGeneratorService::new(Some(Arc::new(client)))
}

// ============================================================================
// Table name extraction
// ============================================================================

mod table_tests {
    use super::*;

    #[test]
    fn test_token_after_from() {
        assert_eq!(extract_table_name("show me all records from orders"), "orders");
        assert_eq!(extract_table_name("select everything FROM Users;"), "users");
        assert_eq!(extract_table_name("insert into audit_log a row"), "audit_log");
    }

    #[test]
    fn test_short_token_after_marker_is_skipped() {
        // "it" is too short, nothing else matches either
        assert_eq!(extract_table_name("delete something from it"), FALLBACK_TABLE);
    }

    #[test]
    fn test_known_table_vocabulary() {
        assert_eq!(extract_table_name("list the employees"), "employees");
        assert_eq!(extract_table_name("top products please"), "products");
    }

    #[test]
    fn test_plural_noun() {
        assert_eq!(extract_table_name("get me the widgets"), "widgets");
        assert_eq!(extract_table_name("show invoices!"), "invoices");
    }

    #[test]
    fn test_plural_stoplist_and_fallback() {
        assert_eq!(extract_table_name("what is this"), FALLBACK_TABLE);
        assert_eq!(extract_table_name(""), FALLBACK_TABLE);
    }

    #[test]
    fn test_table_from_schema() {
        assert_eq!(
            table_from_schema("CREATE TABLE accounts (id INT);").as_deref(),
            Some("accounts")
        );
        assert_eq!(
            table_from_schema("create table if not exists \"ledger\" (id int)").as_deref(),
            Some("ledger")
        );
        assert_eq!(
            table_from_schema("CREATE TABLE public.invoices (id INT);").as_deref(),
            Some("public.invoices")
        );
        // First declaration wins
        assert_eq!(
            table_from_schema("CREATE TABLE a1 (id INT);\nCREATE TABLE b2 (id INT);").as_deref(),
            Some("a1")
        );
    }

    #[test]
    fn test_schema_without_create_table() {
        assert_eq!(table_from_schema("accounts(id, balance)"), None);
        assert_eq!(table_from_schema(""), None);
    }
}

// ============================================================================
// Intent classification
// ============================================================================

mod intent_tests {
    use super::*;

    #[test]
    fn test_intents() {
        assert_eq!(classify_intent("show all products"), Intent::Read);
        assert_eq!(classify_intent("add a new customer"), Intent::Insert);
        assert_eq!(classify_intent("update the price"), Intent::Update);
        assert_eq!(classify_intent("delete old orders"), Intent::Delete);
        assert_eq!(classify_intent("join orders and customers"), Intent::Join);
        assert_eq!(classify_intent("sum of sales"), Intent::Aggregate);
        assert_eq!(classify_intent("how many users are there"), Intent::Default);
    }

    #[test]
    fn test_first_rule_wins() {
        // Read keywords are checked before insert keywords
        assert_eq!(classify_intent("show new users"), Intent::Read);
        // Substring match: "fetch" hides inside "prefetched"
        assert_eq!(classify_intent("prefetched rows"), Intent::Read);
    }
}

// ============================================================================
// WHERE clause extraction
// ============================================================================

mod condition_tests {
    use super::*;

    #[test]
    fn test_salary_and_age_in_order() {
        assert_eq!(
            extract_where_conditions("find users with salary above 50000 and age under 30"),
            "salary > 50000 AND age < 30"
        );
    }

    #[test]
    fn test_column_words_match_at_word_start() {
        // "managers" contains "age" but must not open an age clause
        assert_eq!(
            extract_where_conditions("find managers with salary above 50000 and age under 30"),
            "salary > 50000 AND age < 30"
        );
        // "wages" must not end the salary clause or start an age one
        assert_eq!(
            extract_where_conditions("find employees whose salary plus wages is above 50000"),
            "salary > 50000"
        );
        assert_eq!(extract_where_conditions("people aged above 40"), "age > 40");
    }

    #[test]
    fn test_salary_comparisons() {
        assert_eq!(extract_where_conditions("salary less than 40000"), "salary < 40000");
        assert_eq!(extract_where_conditions("salary more than 10"), "salary > 10");
        assert_eq!(extract_where_conditions("salary exactly 70000"), "salary = 70000");
    }

    #[test]
    fn test_trigger_without_phrase_adds_nothing() {
        assert_eq!(extract_where_conditions("show salary information"), "");
        // Phrase present but no number: the first matching comparison decides
        assert_eq!(extract_where_conditions("salary above average"), "");
    }

    #[test]
    fn test_age_comparisons() {
        assert_eq!(extract_where_conditions("users with age older than 25"), "age > 25");
        assert_eq!(extract_where_conditions("users with age younger than 18"), "age < 18");
    }

    #[test]
    fn test_department_and_status() {
        assert_eq!(
            extract_where_conditions("employees where department is 'engineering'"),
            "department = 'engineering'"
        );
        assert_eq!(extract_where_conditions("orders with status pending"), "status = 'pending'");
    }

    #[test]
    fn test_name_patterns() {
        assert_eq!(
            extract_where_conditions("users whose name starts with 'jo'"),
            "name LIKE 'jo%'"
        );
        assert_eq!(
            extract_where_conditions(r#"users whose name contains "smith""#),
            "name LIKE '%smith%'"
        );
        // Unquoted text does not match the pattern
        assert_eq!(extract_where_conditions("users whose name contains smith"), "");
    }

    #[test]
    fn test_date_columns() {
        assert_eq!(
            extract_where_conditions("orders created after 2024-01-15"),
            "created_at > '2024-01-15'"
        );
        assert_eq!(
            extract_where_conditions("records updated since 2023-12-31"),
            "updated_at > '2023-12-31'"
        );
        assert_eq!(extract_where_conditions("orders created recently"), "");
    }

    #[test]
    fn test_fragments_keep_rule_order() {
        let fragments = extract_conditions("status is active and salary above 100");
        let columns: Vec<&str> = fragments.iter().map(|f| f.column.as_str()).collect();
        assert_eq!(columns, vec!["salary", "status"]);
        assert_eq!(fragments[0].to_string(), "salary > 100");
    }

    #[test]
    fn test_rule_names() {
        let names: Vec<String> = get_all_rules().iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, vec!["salary", "age", "department", "name", "status", "date"]);
    }
}

// ============================================================================
// Heuristic rendering
// ============================================================================

mod heuristic_tests {
    use super::*;

    #[test]
    fn test_count() {
        assert_eq!(heuristic_sql("how many users are there"), "SELECT COUNT(*) FROM users;");
    }

    #[test]
    fn test_count_with_condition_on_default_intent() {
        let result =
            HeuristicGenerator::new().generate(&request("count orders where status is shipped"));
        assert_eq!(result.sql, "SELECT COUNT(*) FROM orders WHERE status = 'shipped';");
        assert!(result.explanation.starts_with("This query counts the number of records"));
        assert!(result.explanation.contains("please provide more specific details"));
    }

    #[test]
    fn test_read_shapes() {
        assert_eq!(
            heuristic_sql("find users with salary above 50000 and age under 30"),
            "SELECT * FROM users WHERE salary > 50000 AND age < 30;"
        );
        assert_eq!(heuristic_sql("show all products"), "SELECT * FROM products;");
        assert_eq!(heuristic_sql("show products"), "SELECT * FROM products LIMIT 10;");
    }

    #[test]
    fn test_write_shapes() {
        assert_eq!(
            heuristic_sql("insert into customers a row"),
            "INSERT INTO customers (column1, column2) VALUES ('value1', 'value2');"
        );
        assert_eq!(
            heuristic_sql("update the price of products"),
            "UPDATE products SET column_name = 'new_value' WHERE id = 1;"
        );
        assert_eq!(
            heuristic_sql("delete old orders"),
            "DELETE FROM orders WHERE condition = 'value';"
        );
    }

    #[test]
    fn test_join_ignores_table() {
        assert_eq!(
            heuristic_sql("join orders and customers"),
            "SELECT t1.*, t2.* FROM table1 t1 JOIN table2 t2 ON t1.id = t2.table1_id;"
        );
    }

    #[test]
    fn test_aggregate_shapes() {
        assert_eq!(
            heuristic_sql("sum of sales by region"),
            "SELECT SUM(amount) FROM sales GROUP BY category;"
        );
        assert_eq!(
            heuristic_sql("average price of items"),
            "SELECT AVG(value) FROM items GROUP BY category;"
        );
        assert_eq!(heuristic_sql("max value in inventory"), "SELECT MAX(value) FROM inventory;");
        assert_eq!(
            heuristic_sql("group orders by region"),
            "SELECT category, COUNT(*) FROM orders GROUP BY category;"
        );
    }

    #[test]
    fn test_explanation_names_table() {
        let result = HeuristicGenerator::new().generate(&request("delete old orders"));
        assert_eq!(
            result.explanation,
            "This query deletes records from the orders table based on a condition. Be careful with DELETE operations."
        );
    }

    #[test]
    fn test_generate_is_pure() {
        let generator = HeuristicGenerator::new();
        let req = request("find users with salary above 50000");
        assert_eq!(generator.generate(&req), generator.generate(&req));
    }

    #[test]
    fn test_schema_supplies_table() {
        let generator = HeuristicGenerator::new();
        let req = GenerationRequest::new("how many rows are there", "postgresql")
            .with_schema(Some("CREATE TABLE accounts (id INT);"));
        let result = generator.generate(&req);
        assert_eq!(result.sql, "SELECT COUNT(*) FROM accounts;");
        assert!(result.explanation.contains("accounts"));

        // Schema beats the query's own wording
        let req = GenerationRequest::new("delete from orders", "postgresql")
            .with_schema(Some("CREATE TABLE purchases (id INT);"));
        assert_eq!(
            generator.generate(&req).sql,
            "DELETE FROM purchases WHERE condition = 'value';"
        );
    }

    #[test]
    fn test_schema_without_table_falls_back_to_query() {
        let req = GenerationRequest::new("how many users are there", "postgresql")
            .with_schema(Some("-- no DDL here"));
        let result = HeuristicGenerator::new().generate(&req);
        assert_eq!(result.sql, "SELECT COUNT(*) FROM users;");
    }

    #[test]
    fn test_dialect_does_not_change_output() {
        let generator = HeuristicGenerator::new();
        let pg = generator.generate(&GenerationRequest::new("show all products", "postgresql"));
        let my = generator.generate(&GenerationRequest::new("show all products", "mysql"));
        assert_eq!(pg, my);
    }

    #[test]
    fn test_total_over_odd_inputs() {
        let long = "show me the data ".repeat(5_000);
        let inputs = [
            "",
            "   ",
            long.as_str(),
            "'; DROP TABLE users; --",
            "{{{{}}}}",
            "数据 显示 ✓ salary above ٣",
            "salary above 99999999999999999999999999999",
            "name like '",
        ];
        let generator = HeuristicGenerator::new();
        for input in inputs {
            let result = generator.generate(&request(input));
            assert!(!result.sql.trim().is_empty(), "empty sql for {:?}", input);
            assert!(!result.explanation.trim().is_empty(), "empty explanation for {:?}", input);
        }
    }
}

// ============================================================================
// Response parsing
// ============================================================================

mod parser_tests {
    use super::*;

    #[test]
    fn test_bare_json() {
        let (result, strategy) =
            parse_model_response(r#"  {"sql": "SELECT 1;", "explanation": "one"}  "#).unwrap();
        assert_eq!(strategy, ParseStrategy::BareJson);
        assert_eq!(result, GenerationResult::new("SELECT 1;", "one"));
    }

    #[test]
    fn test_missing_explanation_defaults() {
        let (result, _) = parse_model_response(r#"{"sql": "SELECT 1;"}"#).unwrap();
        assert_eq!(result.explanation, DEFAULT_EXPLANATION);
    }

    #[test]
    fn test_embedded_json() {
        let raw = "```json\n{\"sql\": \"SELECT * FROM t;\", \"explanation\": \"all rows\"}\n```";
        let (result, strategy) = parse_model_response(raw).unwrap();
        assert_eq!(strategy, ParseStrategy::EmbeddedJson);
        assert_eq!(result.sql, "SELECT * FROM t;");
        assert_eq!(result.explanation, "all rows");
    }

    #[test]
    fn test_line_prefixed() {
        let raw = "Sure!\nSQL: SELECT name FROM users;\nEXPLANATION: lists names";
        let (result, strategy) = parse_model_response(raw).unwrap();
        assert_eq!(strategy, ParseStrategy::LinePrefixed);
        assert_eq!(result, GenerationResult::new("SELECT name FROM users;", "lists names"));
    }

    #[test]
    fn test_line_prefixed_without_explanation() {
        let (result, _) = parse_model_response("SQL: SELECT 1;").unwrap();
        assert_eq!(result.explanation, UNPARSED_EXPLANATION);
    }

    #[test]
    fn test_line_prefixed_explanation_only() {
        let raw = "I cannot answer that.\nEXPLANATION: the request does not name any table";
        let (result, strategy) = parse_model_response(raw).unwrap();
        assert_eq!(strategy, ParseStrategy::LinePrefixed);
        assert_eq!(result.sql, UNPARSED_SQL);
        assert_eq!(result.explanation, "the request does not name any table");
    }

    #[test]
    fn test_empty_prefixes_are_unrecognized() {
        assert!(matches!(
            parse_model_response("SQL:\nEXPLANATION:"),
            Err(ResponseParseError::Unrecognized)
        ));
    }

    #[test]
    fn test_failures() {
        assert!(matches!(
            parse_model_response("not json at all"),
            Err(ResponseParseError::Unrecognized)
        ));
        assert!(matches!(
            parse_model_response("{not json}"),
            Err(ResponseParseError::InvalidJson(_))
        ));
        assert!(matches!(
            parse_model_response(r#"{"explanation": "no sql here"}"#),
            Err(ResponseParseError::MissingSql)
        ));
        assert!(matches!(
            parse_model_response(r#"{"sql": "   ", "explanation": "blank"}"#),
            Err(ResponseParseError::MissingSql)
        ));
    }
}

// ============================================================================
// Prompt and dialect
// ============================================================================

mod prompt_tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_query_and_dialect() {
        let prompt = build_prompt(&GenerationRequest::new("list users", "mysql"));
        assert!(prompt.contains(r#"Natural Language Query: "list users""#));
        assert!(prompt.contains("SQL Dialect: MYSQL"));
        assert!(prompt.contains("Generate syntactically correct MYSQL SQL"));
        assert!(prompt.contains("Return ONLY the JSON response"));
        assert!(!prompt.contains("Database Schema:"));
    }

    #[test]
    fn test_prompt_with_schema() {
        let req = GenerationRequest::new("list users", "sqlite")
            .with_schema(Some("CREATE TABLE users (id INTEGER);"));
        let prompt = build_prompt(&req);
        assert!(prompt.contains("Database Schema:\nCREATE TABLE users (id INTEGER);"));
        assert!(prompt.contains("exact table and column names from the schema"));
    }

    #[test]
    fn test_dialect_names() {
        assert_eq!(Dialect::from_name(""), Dialect::PostgreSql);
        assert_eq!(Dialect::from_name("MySQL"), Dialect::MySql);
        assert_eq!(Dialect::from_name("mssql").display_name(), "Microsoft SQL Server");
        assert_eq!(Dialect::from_name("cockroach"), Dialect::Other("cockroach".to_string()));
        assert_eq!(Dialect::from_name("cockroach").as_str(), "cockroach");
        assert_eq!(Dialect::supported().len(), 5);
    }
}

// ============================================================================
// Model path and fallback
// ============================================================================

mod service_tests {
    use super::*;

    #[tokio::test]
    async fn test_no_client_delegates_to_heuristic() {
        let service = SqlGeneratorService::new(None);
        let req = request("how many users are there");
        assert!(!service.is_model_available());
        assert_eq!(service.generate(&req).await, HeuristicGenerator::new().generate(&req));
        assert_eq!(service.generate(&req).await.sql, "SELECT COUNT(*) FROM users;");
    }

    #[tokio::test]
    async fn test_model_success() {
        let service =
            service_with(MockClient::Reply(r#"{"sql": "SELECT 42;", "explanation": "answer"}"#));
        let result = service.generate(&request("anything")).await;
        assert_eq!(result, GenerationResult::new("SELECT 42;", "answer"));
    }

    #[tokio::test]
    async fn test_unparseable_reply_yields_sentinel() {
        let service = service_with(MockClient::Reply("not json at all"));
        let result = service.generate(&request("show all products")).await;
        assert_eq!(result.sql, "-- Unable to parse SQL from response");
        assert_eq!(result.explanation, "Unable to parse explanation from response.");
    }

    #[tokio::test]
    async fn test_explanation_only_reply_keeps_explanation() {
        let service = service_with(MockClient::Reply("EXPLANATION: ambiguous request"));
        let result = service.generate(&request("show all products")).await;
        assert_eq!(result.sql, UNPARSED_SQL);
        assert_eq!(result.explanation, "ambiguous request");
    }

    #[tokio::test]
    async fn test_failed_invocation_falls_back() {
        let req = request("show all products");
        let expected = HeuristicGenerator::new().generate(&req);

        assert_eq!(service_with(MockClient::Fail).generate(&req).await, expected);
        assert_eq!(service_with(MockClient::Empty).generate(&req).await, expected);
    }

    #[tokio::test]
    async fn test_model_outcomes() {
        let generator = ModelGenerator::new(None);
        assert!(matches!(
            generator.generate(&request("x")).await,
            ModelOutcome::Unavailable(UnavailableReason::NotConfigured)
        ));

        let generator = ModelGenerator::new(Some(Arc::new(MockClient::Fail)));
        assert!(matches!(
            generator.generate(&request("x")).await,
            ModelOutcome::Unavailable(UnavailableReason::InvocationFailed(_))
        ));

        let generator = ModelGenerator::new(Some(Arc::new(MockClient::Reply("garbage"))));
        assert!(matches!(generator.generate(&request("x")).await, ModelOutcome::ParseFailed(_)));
    }

    #[test]
    fn test_status() {
        let status = SqlGeneratorService::new(None).status();
        assert!(!status.enabled);
        assert!(status.provider.is_none());

        let status = service_with(MockClient::Fail).status();
        assert!(status.enabled);
        assert_eq!(status.provider.as_deref(), Some("gemini"));
        assert_eq!(status.model.as_deref(), Some("mock-model"));
    }

    #[tokio::test]
    async fn test_service_total_with_any_client() {
        let services = [
            SqlGeneratorService::new(None),
            service_with(MockClient::Fail),
            service_with(MockClient::Reply("")),
            service_with(MockClient::Reply("{")),
        ];
        for service in &services {
            for input in ["", "salary", "?!?!", "DROP TABLE x"] {
                let result = service.generate(&request(input)).await;
                assert!(!result.sql.is_empty());
                assert!(!result.explanation.is_empty());
            }
        }
    }
}

use std::fmt::Write as _;

use crate::criteria::{QueryCriteria, TissueFilter};
use crate::error::QueryFailure;
use crate::schema::{GENES_TABLE, MEASUREMENTS_TABLE, SAMPLES_TABLE};

/// Hard cap on rows returned by one lookup.
pub const MAX_ROWS: u32 = 500;

// Ids, TPM, age and date are cast to the types `ExpressionRow` decodes.
const SELECT_COLUMNS: &str = "SELECT \
     g.gene_id::text AS gene_id, \
     g.gene_symbol, \
     g.description, \
     g.chromosome, \
     e.tpm_value::float8 AS tpm_value, \
     e.sequencing_date::date AS sequencing_date, \
     s.sample_id::text AS sample_id, \
     s.tissue_type, \
     s.condition, \
     s.patient_age::int4 AS patient_age";

fn base_select() -> String {
    format!(
        "{SELECT_COLUMNS} FROM {GENES_TABLE} g \
         JOIN {MEASUREMENTS_TABLE} e ON g.gene_id = e.gene_id \
         JOIN {SAMPLES_TABLE} s ON e.sample_id = s.sample_id"
    )
}

const ORDER_BY: &str = " ORDER BY e.tpm_value DESC, s.sample_id ASC, g.gene_id ASC";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    GeneSymbol,
    TissueType,
}

impl Column {
    pub fn sql(self) -> &'static str {
        match self {
            Column::GeneSymbol => "g.gene_symbol",
            Column::TissueType => "s.tissue_type",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Case-insensitive `LIKE` against a pattern with `\` as the escape character.
    ILike,
    Equals,
}

impl Comparison {
    fn sql(self) -> &'static str {
        match self {
            Comparison::ILike => "ILIKE",
            Comparison::Equals => "=",
        }
    }
}

/// One `WHERE` clause together with the value bound to its placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: Column,
    pub comparison: Comparison,
    pub value: String,
}

impl Predicate {
    fn contains(column: Column, needle: &str) -> Self {
        Self {
            column,
            comparison: Comparison::ILike,
            value: format!("%{}%", escape_like(needle)),
        }
    }

    fn equals(column: Column, value: &str) -> Self {
        Self {
            column,
            comparison: Comparison::Equals,
            value: value.to_string(),
        }
    }
}

/// A parameterized statement. Placeholder `$n` binds `params()[n - 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionQuery {
    sql: String,
    predicates: Vec<Predicate>,
    limit: u32,
}

impl ExpressionQuery {
    pub fn build(criteria: &QueryCriteria) -> Result<Self, QueryFailure> {
        Self::build_with_limit(criteria, MAX_ROWS)
    }

    /// `limit` is clamped to `1..=MAX_ROWS`.
    pub fn build_with_limit(criteria: &QueryCriteria, limit: u32) -> Result<Self, QueryFailure> {
        if criteria.symbol().trim().is_empty() {
            return Err(QueryFailure::InvalidCriteria(
                "gene symbol must not be empty".to_string(),
            ));
        }

        let mut predicates = vec![Predicate::contains(Column::GeneSymbol, criteria.symbol())];
        if let TissueFilter::Only(tissue) = criteria.tissue() {
            predicates.push(Predicate::equals(Column::TissueType, tissue));
        }

        let limit = limit.clamp(1, MAX_ROWS);
        let mut sql = base_select();
        for (idx, predicate) in predicates.iter().enumerate() {
            sql.push_str(if idx == 0 { " WHERE " } else { " AND " });
            // Writing into a String cannot fail.
            let _ = write!(
                sql,
                "{} {} ${}",
                predicate.column.sql(),
                predicate.comparison.sql(),
                idx + 1
            );
        }
        sql.push_str(ORDER_BY);
        let _ = write!(sql, " LIMIT {limit}");

        Ok(Self {
            sql,
            predicates,
            limit,
        })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn params(&self) -> Vec<&str> {
        self.predicates.iter().map(|p| p.value.as_str()).collect()
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

/// Escapes `LIKE` metacharacters so user input only ever matches literally.
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Case-insensitive evaluation of a `LIKE` pattern with `\` escapes.
///
/// Mirrors what Postgres does for `ILIKE` so in-memory stores filter the same
/// way the database would.
pub fn ilike_matches(pattern: &str, value: &str) -> bool {
    #[derive(Clone, Copy)]
    enum Token {
        AnySeq,
        AnyOne,
        Lit(char),
    }

    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '%' => tokens.push(Token::AnySeq),
            '_' => tokens.push(Token::AnyOne),
            '\\' => tokens.push(Token::Lit(chars.next().unwrap_or('\\'))),
            other => tokens.push(Token::Lit(other)),
        }
    }

    let text: Vec<char> = value.chars().flat_map(char::to_lowercase).collect();
    let tokens: Vec<Token> = tokens
        .into_iter()
        .map(|t| match t {
            Token::Lit(c) => Token::Lit(c.to_lowercase().next().unwrap_or(c)),
            other => other,
        })
        .collect();

    // matched[j] == pattern prefix matches text[..j]
    let mut matched = vec![false; text.len() + 1];
    matched[0] = true;
    for token in tokens {
        let mut next = vec![false; text.len() + 1];
        match token {
            Token::AnySeq => {
                let mut seen = false;
                for j in 0..=text.len() {
                    seen |= matched[j];
                    next[j] = seen;
                }
            }
            Token::AnyOne => {
                for j in 1..=text.len() {
                    next[j] = matched[j - 1];
                }
            }
            Token::Lit(c) => {
                for j in 1..=text.len() {
                    next[j] = matched[j - 1] && text[j - 1] == c;
                }
            }
        }
        matched = next;
    }
    matched[text.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(symbol: &str, tissue: &str) -> QueryCriteria {
        QueryCriteria::new(symbol, TissueFilter::parse(tissue)).expect("valid criteria")
    }

    #[test]
    fn all_tissues_binds_only_the_symbol_pattern() {
        let query = ExpressionQuery::build(&criteria("tp53", "All")).expect("build");
        assert_eq!(query.params(), vec!["%TP53%"]);
        assert!(query.sql().contains("WHERE g.gene_symbol ILIKE $1 ORDER BY"));
        assert!(!query.sql().contains("$2"));
        assert!(!query.sql().contains("TP53"));
    }

    #[test]
    fn tissue_filter_adds_second_bound_parameter() {
        let query = ExpressionQuery::build(&criteria("TP53", "Lung")).expect("build");
        assert_eq!(query.params(), vec!["%TP53%", "Lung"]);
        assert!(query.sql().contains("AND s.tissue_type = $2"));
        assert!(!query.sql().contains("Lung"));
    }

    #[test]
    fn statement_joins_the_three_tables_with_pinned_column_types() {
        let query = ExpressionQuery::build(&criteria("TP53", "All")).expect("build");
        let sql = query.sql();
        assert!(sql.contains("FROM genes g JOIN expression_data e ON g.gene_id = e.gene_id"));
        assert!(sql.contains("JOIN sample_info s ON e.sample_id = s.sample_id WHERE"));
        assert!(sql.contains("s.patient_age::int4 AS patient_age"));
        assert!(sql.contains("e.sequencing_date::date AS sequencing_date"));
        assert!(sql.contains("e.tpm_value::float8 AS tpm_value"));
    }

    #[test]
    fn statement_orders_descending_and_caps_rows() {
        let query = ExpressionQuery::build(&criteria("TP53", "All")).expect("build");
        assert!(
            query
                .sql()
                .ends_with("ORDER BY e.tpm_value DESC, s.sample_id ASC, g.gene_id ASC LIMIT 500")
        );
        assert_eq!(query.limit(), MAX_ROWS);
    }

    #[test]
    fn configured_limit_is_clamped() {
        let c = criteria("TP53", "All");
        assert_eq!(ExpressionQuery::build_with_limit(&c, 50).expect("build").limit(), 50);
        assert_eq!(ExpressionQuery::build_with_limit(&c, 0).expect("build").limit(), 1);
        assert_eq!(
            ExpressionQuery::build_with_limit(&c, 10_000)
                .expect("build")
                .limit(),
            MAX_ROWS
        );
    }

    #[test]
    fn hostile_input_never_reaches_statement_text() {
        let hostile = "x'; DROP TABLE genes; --";
        let query = ExpressionQuery::build(&criteria(hostile, "Lung' OR '1'='1")).expect("build");
        assert!(!query.sql().contains("DROP"));
        assert!(!query.sql().contains("OR '1'"));
        assert_eq!(query.params().len(), 2);
        assert_eq!(query.params()[1], "Lung' OR '1'='1");
    }

    #[test]
    fn build_is_deterministic() {
        let c = criteria("brca", "Liver");
        assert_eq!(
            ExpressionQuery::build(&c).expect("build"),
            ExpressionQuery::build(&c).expect("build")
        );
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("A_B%C\\"), "A\\_B\\%C\\\\");
        let query = ExpressionQuery::build(&criteria("HLA_A", "All")).expect("build");
        assert_eq!(query.params(), vec!["%HLA\\_A%"]);
    }

    #[test]
    fn ilike_matches_substrings_case_insensitively() {
        assert!(ilike_matches("%TP53%", "tp53"));
        assert!(ilike_matches("%TP53%", "TP53BP1"));
        assert!(ilike_matches("%TP53%", "ATP53X"));
        assert!(!ilike_matches("%TP53%", "TP5"));
        assert!(ilike_matches("Lung", "lung"));
        assert!(!ilike_matches("Lung", "Lungs"));
    }

    #[test]
    fn ilike_honours_escapes_and_single_wildcards() {
        assert!(ilike_matches("%HLA\\_A%", "HLA_A1"));
        assert!(!ilike_matches("%HLA\\_A%", "HLAXA"));
        assert!(ilike_matches("HLA_A", "HLAXA"));
    }
}

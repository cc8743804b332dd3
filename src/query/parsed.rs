//! Parsed query objects, the input to evaluation.
//!
//! Query-string parsing (quote balancing, operator placement, citation and
//! date extraction, court lookup) happens upstream; the evaluator receives
//! the parser's output as a [`ParsedQuery`]. Operators are read left to
//! right: `And`/`Or` connect the accumulated result with the next operand,
//! `Not` negates the operand that follows it.

use serde::{Deserialize, Serialize};

/// A single operand: a bare term or an ordered phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryTerm {
    /// A normalized term.
    Term(String),
    /// An exact phrase, in order.
    Phrase(Vec<String>),
}

/// A boolean connective or negation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoolOp {
    /// Both operands must match.
    And,
    /// Either operand may match.
    Or,
    /// The following operand must not match.
    Not,
}

/// A query as produced by the external query parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// Operands in query order.
    #[serde(default)]
    pub terms: Vec<QueryTerm>,

    /// Operators in query order (see module docs for how they bind).
    #[serde(default)]
    pub operators: Vec<BoolOp>,

    /// Whether the parser classified this as a boolean query. Free-text
    /// queries are ranked with the vector space model instead.
    #[serde(default)]
    pub is_boolean: bool,

    /// Citation extracted from the raw query, if any.
    #[serde(default)]
    pub citation: Option<String>,

    /// Year extracted from the raw query, if any.
    #[serde(default)]
    pub year: Option<String>,

    /// Full date extracted from the raw query, if any.
    #[serde(default)]
    pub date: Option<String>,

    /// Normalized court abbreviation from the external court lookup.
    #[serde(default)]
    pub court: Option<String>,
}

impl ParsedQuery {
    /// A free-text query over the given terms.
    pub fn free_text<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParsedQuery {
            terms: terms
                .into_iter()
                .map(|t| QueryTerm::Term(t.into()))
                .collect(),
            ..Default::default()
        }
    }

    /// A boolean query from operands and operators.
    pub fn boolean(terms: Vec<QueryTerm>, operators: Vec<BoolOp>) -> Self {
        ParsedQuery {
            terms,
            operators,
            is_boolean: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let query = ParsedQuery::boolean(
            vec![
                QueryTerm::Term("apple".to_string()),
                QueryTerm::Phrase(vec!["fertility".to_string(), "treatment".to_string()]),
            ],
            vec![BoolOp::And, BoolOp::Not],
        );

        let json = serde_json::to_string(&query).unwrap();
        let back: ParsedQuery = serde_json::from_str(&json).unwrap();

        assert!(back.is_boolean);
        assert_eq!(back.terms.len(), 2);
        assert_eq!(back.operators, vec![BoolOp::And, BoolOp::Not]);
    }

    #[test]
    fn test_free_text_constructor() {
        let query = ParsedQuery::free_text(["quiet", "phone", "call"]);
        assert!(!query.is_boolean);
        assert_eq!(query.terms.len(), 3);
        assert!(query.operators.is_empty());
    }
}

//! Boolean query evaluation with deferred negation.
//!
//! Operands evaluate to sorted doc-id lists; AND/OR/NOT combine them with
//! the skip-pointer set algebra. Negation is not materialized eagerly:
//! each intermediate operand carries an `is_negated` flag, and De Morgan
//! rewrites keep combinations in terms of intersect/union/difference. The
//! expensive complement against the universe happens at most once, when the
//! final operand is materialized.

use log::debug;

use crate::error::Result;
use crate::index::IndexReader;
use crate::postings::algebra::{complement, difference, intersect, union};
use crate::postings::DocIdList;
use crate::query::parsed::{BoolOp, ParsedQuery, QueryTerm};
use crate::query::phrase::evaluate_phrase;

/// An evaluated operand with a deferred-negation flag.
#[derive(Debug)]
struct Operand {
    docs: DocIdList,
    negated: bool,
}

/// Evaluate a boolean query to ascending doc ids.
///
/// Structurally invalid operator sequences yield an empty result rather
/// than an error, so a bad query never aborts batch processing.
pub fn evaluate_boolean(reader: &IndexReader, query: &ParsedQuery) -> Result<Vec<u64>> {
    if query.terms.is_empty() {
        return Ok(Vec::new());
    }

    // A pure conjunction is the common case and the one where evaluation
    // order matters: intersecting in ascending document-frequency order
    // keeps every intermediate result as small as the rarest term.
    if is_pure_conjunction(query) {
        return evaluate_conjunction(reader, query);
    }

    let mut ops = query.operators.iter().copied().peekable();
    let mut acc: Option<Operand> = None;

    for term in &query.terms {
        let connective = match &acc {
            None => None,
            Some(_) => match ops.next() {
                Some(op @ (BoolOp::And | BoolOp::Or)) => Some(op),
                _ => {
                    debug!("invalid boolean query: operand without connective");
                    return Ok(Vec::new());
                }
            },
        };

        let mut negated = false;
        while ops.peek() == Some(&BoolOp::Not) {
            ops.next();
            negated = !negated;
        }

        let operand = Operand {
            docs: evaluate_operand(reader, term)?,
            negated,
        };

        acc = Some(match (acc, connective) {
            (None, _) => operand,
            (Some(lhs), Some(op)) => combine(lhs, op, operand),
            (Some(_), None) => unreachable!("connective required after first operand"),
        });
    }

    if ops.next().is_some() {
        debug!("invalid boolean query: trailing operators");
        return Ok(Vec::new());
    }

    let result = acc.expect("at least one operand was evaluated");
    Ok(materialize(reader, result)?.into_vec())
}

/// Whether the query is a plain AND chain with no negation.
fn is_pure_conjunction(query: &ParsedQuery) -> bool {
    query.operators.iter().all(|op| *op == BoolOp::And)
        && query.operators.len() + 1 == query.terms.len()
}

/// Evaluate an AND chain in ascending document-frequency order.
fn evaluate_conjunction(reader: &IndexReader, query: &ParsedQuery) -> Result<Vec<u64>> {
    let mut keyed: Vec<(u32, &QueryTerm)> = Vec::with_capacity(query.terms.len());
    for term in &query.terms {
        let Some(df) = conjunction_key(reader, term) else {
            // A term absent from every document empties the conjunction.
            return Ok(Vec::new());
        };
        keyed.push((df, term));
    }
    keyed.sort_by_key(|(df, _)| *df);

    let mut result: Option<DocIdList> = None;
    for (_, term) in keyed {
        let docs = evaluate_operand(reader, term)?;
        result = Some(match result {
            None => docs,
            Some(acc) => intersect(&acc, &docs),
        });
        if result.as_ref().is_some_and(DocIdList::is_empty) {
            return Ok(Vec::new());
        }
    }

    Ok(result.map(DocIdList::into_vec).unwrap_or_default())
}

/// Ordering key for a conjunction operand; `None` when the operand cannot
/// match any document. Phrases use their rarest-constraining member: the
/// maximum document frequency bounds the phrase's candidate set.
fn conjunction_key(reader: &IndexReader, term: &QueryTerm) -> Option<u32> {
    match term {
        QueryTerm::Term(t) => {
            let df = reader.doc_frequency(t);
            (df > 0).then_some(df)
        }
        QueryTerm::Phrase(terms) => {
            let mut df_max = 0;
            for t in terms {
                let df = reader.doc_frequency(t);
                if df == 0 {
                    return None;
                }
                df_max = df_max.max(df);
            }
            (df_max > 0).then_some(df_max)
        }
    }
}

/// Evaluate a leaf operand to its doc-id list.
fn evaluate_operand(reader: &IndexReader, term: &QueryTerm) -> Result<DocIdList> {
    match term {
        QueryTerm::Term(t) => match reader.read_postings(t)? {
            Some(postings) => Ok(DocIdList::from_sorted(postings.doc_ids())),
            None => Ok(DocIdList::empty()),
        },
        QueryTerm::Phrase(terms) => evaluate_phrase(reader, terms),
    }
}

/// Combine two operands under an AND/OR connective, applying De Morgan
/// rewrites so no complement is materialized here.
fn combine(lhs: Operand, op: BoolOp, rhs: Operand) -> Operand {
    match (op, lhs.negated, rhs.negated) {
        (BoolOp::And, false, false) => Operand {
            docs: intersect(&lhs.docs, &rhs.docs),
            negated: false,
        },
        // X AND NOT Y = X − Y
        (BoolOp::And, false, true) => Operand {
            docs: difference(&lhs.docs, &rhs.docs),
            negated: false,
        },
        (BoolOp::And, true, false) => Operand {
            docs: difference(&rhs.docs, &lhs.docs),
            negated: false,
        },
        // NOT X AND NOT Y = NOT (X OR Y)
        (BoolOp::And, true, true) => Operand {
            docs: union(&lhs.docs, &rhs.docs),
            negated: true,
        },
        (BoolOp::Or, false, false) => Operand {
            docs: union(&lhs.docs, &rhs.docs),
            negated: false,
        },
        // X OR NOT Y = NOT (Y − X)
        (BoolOp::Or, false, true) => Operand {
            docs: difference(&rhs.docs, &lhs.docs),
            negated: true,
        },
        (BoolOp::Or, true, false) => Operand {
            docs: difference(&lhs.docs, &rhs.docs),
            negated: true,
        },
        // NOT X OR NOT Y = NOT (X AND Y)
        (BoolOp::Or, true, true) => Operand {
            docs: intersect(&lhs.docs, &rhs.docs),
            negated: true,
        },
        (BoolOp::Not, _, _) => unreachable!("NOT is not a connective"),
    }
}

/// Realize any deferred negation against the universe.
fn materialize(reader: &IndexReader, operand: Operand) -> Result<DocIdList> {
    if !operand.negated {
        return Ok(operand.docs);
    }
    let universe = reader.universe()?;
    Ok(complement(&operand.docs, &universe))
}

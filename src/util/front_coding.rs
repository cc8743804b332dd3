//! Front-coding for lexicographically sorted term lists.
//!
//! Adjacent terms in a sorted dictionary share long prefixes; each entry
//! stores only the byte length of the prefix shared with the previous term
//! plus the remaining suffix. The coded stream must be decoded strictly in
//! order, since every term depends on the one before it.

/// A single front-coded dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontCodedEntry {
    /// Byte length of the prefix shared with the previous term.
    pub prefix_len: u32,
    /// Remaining suffix after the shared prefix.
    pub suffix: String,
}

/// Length in bytes of the longest common prefix of two strings, aligned to
/// a character boundary so the prefix is always valid UTF-8.
pub fn shared_prefix_len(a: &str, b: &str) -> usize {
    let mut len = 0;
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            break;
        }
        len += ca.len_utf8();
    }
    len
}

/// Front-code a sorted term list. The first term has prefix length 0.
pub fn front_code(terms: &[String]) -> Vec<FrontCodedEntry> {
    let mut entries = Vec::with_capacity(terms.len());
    let mut prev = "";
    for term in terms {
        let prefix_len = shared_prefix_len(prev, term);
        entries.push(FrontCodedEntry {
            prefix_len: prefix_len as u32,
            suffix: term[prefix_len..].to_string(),
        });
        prev = term;
    }
    entries
}

/// Reconstruct the original term list from front-coded entries.
pub fn front_decode(entries: &[FrontCodedEntry]) -> Vec<String> {
    let mut terms: Vec<String> = Vec::with_capacity(entries.len());
    let mut prev = String::new();
    for entry in entries {
        let mut term = prev[..entry.prefix_len as usize].to_string();
        term.push_str(&entry.suffix);
        prev = term.clone();
        terms.push(term);
    }
    terms
}

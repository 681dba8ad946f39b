//! RDF triple (statement)

use crate::Term;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// An RDF triple (subject-predicate-object)
///
/// # Invariants
///
/// - Subject can be IRI or blank node (not literal)
/// - Predicate must be IRI
/// - Object can be IRI, blank node, or literal
///
/// These invariants are not enforced at construction time; the parsers
/// guarantee them for graphs they produce.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject (IRI or blank node)
    pub s: Term,
    /// Predicate (IRI only)
    pub p: Term,
    /// Object (IRI, blank node, or literal)
    pub o: Term,
}

impl Triple {
    /// Create a new triple
    pub fn new(s: Term, p: Term, o: Term) -> Self {
        Self { s, p, o }
    }

    /// True if the predicate is the given IRI
    pub fn has_predicate(&self, iri: &str) -> bool {
        self.p.as_iri() == Some(iri)
    }
}

impl PartialOrd for Triple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Triple {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.s, &self.p, &self.o).cmp(&(&other.s, &other.p, &other.o))
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.s, self.p, self.o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_ordering_spo() {
        let a = Triple::new(Term::iri("http://a"), Term::iri("http://p"), Term::string("x"));
        let b = Triple::new(Term::iri("http://b"), Term::iri("http://p"), Term::string("x"));
        assert!(a < b);

        let c = Triple::new(Term::iri("http://a"), Term::iri("http://q"), Term::string("x"));
        assert!(a < c);
    }

    #[test]
    fn test_triple_display() {
        let t = Triple::new(
            Term::iri("http://s"),
            Term::iri("http://p"),
            Term::string("o"),
        );
        assert_eq!(format!("{}", t), "<http://s> <http://p> \"o\" .");
    }
}

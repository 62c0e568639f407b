//! Connector, expression and disjunct model for the link-grammar parser
//! core. This crate owns the per-sentence string-interning pool and the
//! immutable expression trees dictionary entries compile down from, plus
//! the compiler that turns an expression into a word's flat disjunct
//! list. It has no notion of a dictionary, a sentence, or a parse: those
//! live in `lg-tokenize`, `lg-prune` and `lg-parse`.

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

pub mod connector;
pub mod disjunct;
pub mod expr;
pub mod intern;

pub use connector::{connector_meet, connectors_match, Connector, Direction};
pub use disjunct::{build_clauses, build_disjuncts, dedup_disjuncts, Clause, Disjunct};
pub use expr::{Exp, ExpConnector, ExpKind, SurfaceExp, SurfaceExpKind};
pub use intern::{StringPool, Sym};

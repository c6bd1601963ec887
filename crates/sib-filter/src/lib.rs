//! Filter mini-language for the SIB publicWFS.
//!
//! Users write filters as nested function calls in a spreadsheet-like
//! style, with values always quoted and field names bare:
//!
//! ```text
//! UND(GLEICH(vnk, "123456789"), GROESSERGLEICH(bst, "5"))
//! ```
//!
//! [`compile`] turns such text into an [`Expr`] tree and an OGC
//! `ogc:Filter` document suitable for a `wfs:Query`. [`compile_with`]
//! additionally validates field names through a [`PropertyResolver`].
//!
//! Keywords: `UND`, `ODER`, `NICHT`, `GLEICH`/`IDENTISCH`, `KLEINER`,
//! `KLEINERGLEICH`, `GROESSER`, `GROESSERGLEICH`, `ZWISCHEN`.
//!
//! ```
//! let filter = sib_filter::compile("ZWISCHEN(bst, \"5\", \"20\")").unwrap();
//! assert!(filter.as_xml().starts_with("<ogc:Filter><ogc:PropertyIsBetween>"));
//! ```

pub mod compile;
pub mod error;
pub mod expr;
pub mod render;
pub mod split;

pub use compile::{CompiledFilter, PropertyResolver, Unvalidated, compile, compile_with};
pub use error::{FilterError, Result};
pub use expr::{Arity, Comparison, Connective, Expr, FieldRef, Operator};
pub use render::{FILTER_TAG, LITERAL_TAG, PROPERTY_TAG, render_filter};
pub use split::split_arguments;

//! The counting recursion (§4.I), parse-set construction (§4.J), linkage
//! extraction (§4.K), post-processing (§4.L) and the sentence driver
//! (§4.M) that turn a pruned word graph into ranked, checked linkages.

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

pub mod conn_ref;
pub mod count;
pub mod driver;
pub mod extract;
pub mod options;
pub mod parse_set;
pub mod post_process;

pub use conn_ref::ConnRef;
pub use count::{CountEngine, CountKey, LeftBound};
pub use driver::{DriverError, Linkage, LinkageLink, Sentence};
pub use extract::{ExtractError, Link, RawLinkage};
pub use options::{CostModel, ParseOptions, ResourceLimits};
pub use parse_set::{ParseChoice, ParseSet, ParseSetBuilder};
pub use post_process::{domain_names_per_link, PostProcessOutcome, Postprocessor, PpLink};

//! Natural-language justification of scores.
//!
//! [`explain_single`] renders a fixed template over banded factor values;
//! [`explain_comparative`] contrasts the top and bottom of a ranking.

pub mod bands;
pub mod comparative;
pub mod single;

pub use comparative::explain_comparative;
pub use single::explain_single;

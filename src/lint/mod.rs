//! Rule severities, problems and rule instantiation.
//!
//! # Overview
//!
//! - **Settings** - [`Severity`] and [`RuleSetting`] as written in config documents
//! - **Problems** - [`Problem`] reports routed through a [`UserContext`]
//! - **Instantiation** - [`instantiate_rules`] turns a resolved styleguide
//!   into [`RuleVisitor`](crate::visitor::RuleVisitor)s
//!
//! # Example
//!
//! ```
//! use apistyle::lint::{RuleSetting, Severity};
//!
//! // Severity has ordering
//! assert!(Severity::Off < Severity::Warn);
//! assert!(Severity::Warn < Severity::Error);
//!
//! let setting = RuleSetting::from(Severity::Off);
//! assert!(!setting.severity().is_enabled());
//! ```

pub mod instantiate;
pub mod problem;
pub mod rule;

pub use instantiate::{build_dispatch_table, instantiate_rules};
pub use problem::{Location, Problem, UserContext};
pub use rule::{RuleInstanceConfig, RuleSetting, Severity};

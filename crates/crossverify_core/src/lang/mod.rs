//! Language vocabulary registries.
//!
//! Callers work with stable ids ([`languages::LanguageId`], [`keywords::KeywordId`]) and look up spellings
//! and metadata via the registry tables instead of comparing strings at every call site.
//!
//! ## Examples
//! ```rust
//! use crossverify_core::lang::languages::{self, LanguageId};
//!
//! assert_eq!(languages::from_str("c++"), Some(LanguageId::Cpp));
//! assert_eq!(languages::as_str(LanguageId::Cpp), "cpp");
//! ```

pub mod keywords;
pub mod languages;
pub mod registry;

//! Static reference tables for eligibility review
//!
//! This crate provides the grade scale, department rewrite rules,
//! approved-course lists, and per-major admission policies. Everything
//! here is data; the review engine interprets it.

pub mod approved;
pub mod departments;
pub mod grades;
pub mod policies;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid policy for {major}: {problem}")]
    InvalidPolicy { major: String, problem: String },

    #[error("Duplicate policy for major: {0}")]
    DuplicatePolicy(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

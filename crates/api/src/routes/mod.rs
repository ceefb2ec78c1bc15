//! Route handlers

pub mod assessments;
pub mod catalog;
pub mod report;

mod common;
mod consolidation;

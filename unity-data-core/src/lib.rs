//! Unity Data Core
//!
//! Format-agnostic building blocks shared by the Unity data crates: the
//! materialized value model and the static class-id table.

pub mod constants;
pub mod unity_value;

// Re-export main types
pub use constants::{class_id_of, class_ids, get_class_name};
pub use unity_value::UnityValue;

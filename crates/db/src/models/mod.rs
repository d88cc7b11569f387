//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Query/page types where the repository supports filtered reads

pub mod action_log;
pub mod audit;
pub mod case;
pub mod soft_delete;

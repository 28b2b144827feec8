//! SeaORM entity definitions for the target-store schema.
//!
//! Only tables conveyor owns live here: the migrated domain tables and the
//! `sync_status` control table. Legacy-store rows are read as raw-SQL
//! projections in `domains::*::legacy` and are never modelled as entities.

pub mod member;
pub mod prelude;
pub mod shipping_address;
pub mod sync_state;
pub mod sync_status;

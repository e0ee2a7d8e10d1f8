//! Domain types shared by the db and core layers.

pub mod actor;
pub mod adjustment;
pub mod attendance;
pub mod authorization;
pub mod role;
pub mod setting;
pub mod shift;
pub mod site;
pub mod slot;
pub mod user;

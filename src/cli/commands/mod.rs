pub mod grants;
pub mod nav;
pub mod verify;

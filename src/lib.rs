pub mod cli;
pub mod rotate_files_core;
pub mod rotator;
pub mod util;

#![allow(dead_code)]

pub mod archive;
pub mod install;

pub use archive::zip_bytes;
pub use install::Installation;

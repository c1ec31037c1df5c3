pub mod annotate;
pub mod build;
pub mod css;
pub mod init;

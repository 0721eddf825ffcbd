pub mod build;
pub mod dev;
pub mod html;
pub mod image;
pub mod init;
pub mod readme;

pub mod info;
pub mod redirect;
pub mod shorten;

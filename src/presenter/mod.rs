pub(crate) mod flash;
pub(crate) mod timeline;

pub(crate) mod clock;
pub(crate) mod loops;
pub(crate) mod timer;

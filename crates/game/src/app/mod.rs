pub(crate) mod behavior;
pub(crate) mod bootstrap;
pub(crate) mod frontend;
pub(crate) mod loop_runner;
pub(crate) mod session;

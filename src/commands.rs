pub mod create;
pub mod extract;
pub mod results;
pub mod watch;

pub mod chat;
pub mod equity;
pub mod lenient;
pub mod marker;
pub mod market;
pub mod period;
pub mod push;
pub mod report;
pub mod responses;
pub mod session;
pub mod settings;
pub mod stats;
pub mod strategy;

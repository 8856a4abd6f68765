pub mod ports;
pub mod presenter;
pub mod prober;
pub mod resolver;
pub mod widget;

pub mod coords;
pub mod r2;

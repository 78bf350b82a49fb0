//! 核心：启动器

pub mod launcher;

pub use launcher::Launcher;

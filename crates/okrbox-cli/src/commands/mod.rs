pub mod action;
pub mod board;
pub mod completions;
pub mod config;
pub mod demo;
pub mod drift;
pub mod evidence;
pub mod idea;
pub mod input;
pub mod score;

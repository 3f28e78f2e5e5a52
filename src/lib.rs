//! Orbitone library - iterated-map fractals as image and instrument

pub mod audio;
pub mod camera;
pub mod cli;
pub mod fractal;
pub mod interaction;
pub mod params;
pub mod rendering;

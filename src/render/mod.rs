// Relaybrowser rendering
// Frame presentation and the coordinate transform between remote and local pixel spaces.

pub mod debounce;
pub mod fps;
pub mod mapper;
pub mod renderer;
pub mod surface;

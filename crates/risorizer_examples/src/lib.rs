#![forbid(unsafe_code)]

mod rendering;
mod shapes;

pub use rendering::{
    init_tracing, mark_point, render_outline, render_outline_to_png, RenderConfig,
};
pub use shapes::{letter_h, letter_o, square};

mod computed_style;
mod layout_state;
mod values;

pub use computed_style::*;
pub use layout_state::*;
pub use values::*;

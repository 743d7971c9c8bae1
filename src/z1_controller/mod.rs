pub mod descriptors;
pub mod lights;
pub mod report;
mod z1_controller;
mod z1_state;

pub use descriptors::{
    control_name, ButtonId, ControlDescriptor, SliderId, BUTTONS, KONTROL_Z1_INFO, LED_COUNT,
    SLIDERS,
};
pub use lights::{brightness_status, dual_color_status, LED_BRIGHT, LED_DIM};
pub use z1_controller::KontrolZ1;
pub use z1_state::Z1State;

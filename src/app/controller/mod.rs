pub mod lab_controller;

pub use lab_controller::{LabController, ReportOptions, UiUpdate};
